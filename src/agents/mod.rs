//! Agent stages of a research run
//!
//! - [`planner::PlannerAgent`] - turns the question into a handful of search queries
//! - [`writer::WriterAgent`] - streams a cited answer grounded in the gathered evidence
//!
//! Both receive their LLM client by injection; neither holds global state.

/// Query planning with JSON-list recovery.
pub mod planner;
/// Streaming, citation-normalized answer synthesis.
pub mod writer;

pub use planner::{PlanParse, PlannerAgent};
pub use writer::WriterAgent;
