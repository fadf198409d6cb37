//! LLM Provider Clients and Abstractions
//!
//! This module provides a unified interface for the generative text providers
//! used by the planner and writer stages.
//!
//! # Architecture
//!
//! - [`LLMClient`] - The core trait that all providers implement
//! - [`Provider`] - Runtime provider selection built from configuration
//! - [`LLMClientFactory`] - Creates the client handed to each workflow run
//!
//! # Supported Providers
//!
//! Enable providers via Cargo features:
//! - `ollama` - Local Ollama server (default)
//! - `openai` - OpenAI API and OpenAI-compatible endpoints
//!
//! # Streaming
//!
//! All providers support streaming responses via [`LLMClient::stream`],
//! which returns a [`TextStream`] of text increments.

/// Core LLM client trait and provider selection.
pub mod client;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use client::{LLMClient, LLMClientFactory, Provider, TextStream};
