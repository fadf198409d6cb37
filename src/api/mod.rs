//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP layer for Insight, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! - `GET /api/chat/ask?query=...` - Server-Sent Events stream of one research run
//! - `GET /api/health` - Health check endpoint
//! - `GET /` - Welcome message
//! - `GET /api-docs/openapi.json` - OpenAPI document

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
