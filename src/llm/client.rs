//! LLM Client abstractions and provider management
//!
//! This module provides a unified interface for the generative text providers
//! the agent stages talk to:
//! - **Ollama**: local inference with streaming
//! - **OpenAI**: OpenAI API and any OpenAI-compatible endpoint (Gemini, OpenRouter, ...)

use crate::types::{AppError, Result};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed stream of text increments produced by [`LLMClient::stream`]
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Generic LLM client trait for provider abstraction
///
/// All LLM providers implement this trait, allowing for easy swapping
/// between providers (and scripted mocks in tests) without changing the stages.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Stream a completion as text increments
    ///
    /// An `Err` item ends the useful part of the stream; consumers stop at it.
    async fn stream(&self, prompt: &str) -> Result<TextStream>;

    /// Get the model name/identifier
    fn model_name(&self) -> &str;
}

/// Provider enum for runtime selection
///
/// | Provider | Feature | Streaming |
/// |----------|---------|-----------|
/// | Ollama | `ollama` (default) | ✅ |
/// | OpenAI | `openai` | ✅ |
#[derive(Debug, Clone)]
pub enum Provider {
    /// OpenAI API provider (including OpenAI-compatible APIs)
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::OpenAI {
    ///     api_key: "...".to_string(),
    ///     api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
    ///     model: "gemini-2.0-flash".to_string(),
    /// };
    /// ```
    OpenAI {
        api_key: String,
        api_base: String,
        model: String,
    },

    /// Ollama local LLM provider
    ///
    /// # Example
    /// ```rust,ignore
    /// let provider = Provider::Ollama {
    ///     base_url: "http://localhost:11434".to_string(),
    ///     model: "llama3.2".to_string(),
    /// };
    /// ```
    Ollama { base_url: String, model: String },
}

impl Provider {
    /// Create a client instance for this provider
    ///
    /// # Errors
    ///
    /// Returns an error if the provider's cargo feature is not compiled in.
    pub async fn create_client(&self) -> Result<Arc<dyn LLMClient>> {
        match self {
            #[cfg(feature = "openai")]
            Provider::OpenAI {
                api_key,
                api_base,
                model,
            } => Ok(Arc::new(super::openai::OpenAIClient::new(
                api_key.clone(),
                api_base.clone(),
                model.clone(),
            ))),

            #[cfg(feature = "ollama")]
            Provider::Ollama { base_url, model } => Ok(Arc::new(
                super::ollama::OllamaClient::new(base_url.clone(), model.clone()).await?,
            )),

            #[allow(unreachable_patterns)]
            other => Err(AppError::Configuration(format!(
                "{} provider requested but the '{}' feature is not enabled",
                other.name(),
                other.feature()
            ))),
        }
    }

    /// Get a human-readable name for this provider
    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "OpenAI",
            Provider::Ollama { .. } => "Ollama",
        }
    }

    /// The model this provider is configured for
    pub fn model(&self) -> &str {
        match self {
            Provider::OpenAI { model, .. } | Provider::Ollama { model, .. } => model,
        }
    }

    fn feature(&self) -> &'static str {
        match self {
            Provider::OpenAI { .. } => "openai",
            Provider::Ollama { .. } => "ollama",
        }
    }
}

/// Configuration-based client factory
///
/// Holds the provider chosen at startup so every workflow run receives its
/// client by explicit injection rather than through a process-wide global.
pub struct LLMClientFactory {
    default_provider: Provider,
}

impl LLMClientFactory {
    /// Create a new factory with the specified default provider
    pub fn new(default_provider: Provider) -> Self {
        Self { default_provider }
    }

    /// Create a client using the default provider
    pub async fn create_default(&self) -> Result<Arc<dyn LLMClient>> {
        self.default_provider.create_client().await
    }

    /// Get a reference to the default provider
    pub fn default_provider(&self) -> &Provider {
        &self.default_provider
    }
}
