//! # Insight - Streaming Research Agent Server
//!
//! Insight answers a natural-language question in three phases and streams
//! its progress to the client as Server-Sent Events:
//!
//! 1. **Planning** - an LLM turns the question into a few web-search queries
//! 2. **Research** - the queries run concurrently; hits are deduplicated and numbered
//! 3. **Writing** - the LLM streams a markdown answer citing the numbered sources
//!
//! ## Library Usage
//!
//! The workflow core needs no network layer; inject any [`LLMClient`] and
//! [`SearchProvider`]:
//!
//! ```rust,ignore
//! use insight::{Provider, WorkflowOrchestrator, research::WebSearch};
//! use std::sync::Arc;
//!
//! let llm = Provider::Ollama {
//!     base_url: "http://localhost:11434".to_string(),
//!     model: "llama3.2".to_string(),
//! }
//! .create_client()
//! .await?;
//!
//! let orchestrator = Arc::new(WorkflowOrchestrator::new(llm, Arc::new(WebSearch::new())));
//! let mut events = orchestrator.spawn("What is the James Webb telescope?");
//! while let Some(event) = events.recv().await {
//!     println!("{}: {}", event.kind, event.payload);
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ollama` | Ollama local inference (default) |
//! | `openai` | OpenAI API and OpenAI-compatible endpoints |
//!
//! ## Modules
//!
//! - [`agents`] - Planner and writer stages
//! - [`api`] - SSE handler and routes
//! - [`llm`] - LLM client implementations
//! - [`research`] - Web search and evidence aggregation
//! - [`workflows`] - Orchestrator state machine and event transport
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration and citation normalization

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Planner and writer agents.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Command-line interface.
pub mod cli;
/// LLM provider clients and abstractions.
pub mod llm;
/// Web search and evidence aggregation.
pub mod research;
/// Core types (requests, sources, errors).
pub mod types;
/// Configuration and citation utilities.
pub mod utils;
/// Workflow orchestration and event streaming.
pub mod workflows;

// Re-export commonly used types
pub use llm::{LLMClient, LLMClientFactory, Provider};
pub use research::SearchProvider;
pub use types::{AppError, Result};
pub use utils::config::InsightConfig;
pub use workflows::{Event, EventKind, WorkflowOrchestrator};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<InsightConfig>,
    /// LLM client shared by every run
    pub llm: Arc<dyn LLMClient>,
    /// Orchestrator that starts one run per request
    pub orchestrator: Arc<WorkflowOrchestrator>,
}

impl AppState {
    /// Wire the orchestrator from injected collaborators
    pub fn new(
        config: InsightConfig,
        llm: Arc<dyn LLMClient>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        let orchestrator = Arc::new(WorkflowOrchestrator::from_config(
            Arc::clone(&llm),
            search,
            &config,
        ));

        Self {
            config: Arc::new(config),
            llm,
            orchestrator,
        }
    }
}
