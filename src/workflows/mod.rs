//! Workflow Orchestration
//!
//! This module runs the research workflow for a single query and streams its
//! progress as typed events.
//!
//! # Event protocol
//!
//! | kind | payload | cardinality |
//! |------|---------|-------------|
//! | `trace` | progress message | 0..N |
//! | `sources` | JSON array of `{id, url, title, content}` | exactly 1, before any `chunk`/`error` |
//! | `chunk` | answer fragment | 0..N |
//! | `error` | failure description | 0..1 |
//! | `done` | terminal status | exactly 1, always last |
//!
//! # Usage
//!
//! ```ignore
//! let orchestrator = Arc::new(WorkflowOrchestrator::new(llm, Arc::new(WebSearch::new())));
//! let mut events = orchestrator.spawn("How do solar panels work?");
//!
//! while let Some(event) = events.recv().await {
//!     println!("{}: {}", event.kind, event.payload);
//! }
//! ```

/// The orchestrator state machine.
pub mod engine;
/// Event kinds, payloads and fixed protocol messages.
pub mod events;
/// Channel pairing a run with its client connection.
pub mod transport;

pub use engine::{RunOutcome, WorkflowOrchestrator};
pub use events::{Event, EventKind};
pub use transport::{EventSink, EventStream};
