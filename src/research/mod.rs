//! Web Research
//!
//! This module gathers the evidence the writer answers from.
//!
//! # Architecture
//!
//! - [`search::SearchProvider`] - Search/scrape collaborator (daedra-backed [`search::WebSearch`])
//! - [`aggregator::EvidenceAggregator`] - Fans sub-queries out concurrently and
//!   waits for all of them before numbering sources
//!
//! # Usage
//!
//! ```ignore
//! use insight::research::{EvidenceAggregator, WebSearch};
//! use std::sync::Arc;
//!
//! let aggregator = EvidenceAggregator::new(Arc::new(WebSearch::new()), 2);
//! let evidence = aggregator
//!     .aggregate(&["rust async runtimes".to_string(), "tokio vs smol".to_string()])
//!     .await?;
//!
//! for source in &evidence.sources {
//!     println!("[{}] {}", source.id, source.url);
//! }
//! ```

/// Concurrent fan-out and deduplicated evidence assembly.
pub mod aggregator;
/// Search provider trait and the daedra implementation.
pub mod search;

pub use aggregator::{Evidence, EvidenceAggregator};
pub use search::{SearchProvider, WebSearch};
