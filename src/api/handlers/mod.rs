//! API request handlers.

/// Streaming question answering over SSE.
pub mod ask;
/// Health and welcome endpoints.
pub mod health;
