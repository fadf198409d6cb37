//! Configuration and text utilities.

/// Citation markup normalization for streamed answers.
pub mod citations;
/// TOML configuration loading and validation.
pub mod config;
