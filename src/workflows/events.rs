//! Event protocol streamed to the client
//!
//! One [`Event`] becomes one SSE message: `kind` is the `event:` field and
//! `payload` the `data:` field. Structured payloads (the source list) are
//! JSON-encoded strings.

use crate::types::{AppError, Result, Source};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TRACE_PLANNING: &str = "Planning...";
pub const TRACE_SEARCHING: &str = "Searching...";
pub const TRACE_WRITING: &str = "Reading and Writing...";
pub const NO_INFORMATION: &str =
    "I'm sorry, I couldn't find any relevant information to answer your question.";
pub const DONE_COMPLETE: &str = "Stream complete.";
pub const DONE_FAILED: &str = "Stream failed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Trace,
    Sources,
    Chunk,
    Error,
    Done,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Trace => "trace",
            EventKind::Sources => "sources",
            EventKind::Chunk => "chunk",
            EventKind::Error => "error",
            EventKind::Done => "done",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub payload: String,
}

impl Event {
    pub fn new(kind: EventKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    pub fn trace(message: impl Into<String>) -> Self {
        Self::new(EventKind::Trace, message)
    }

    /// Serialize the numbered sources as a JSON array
    pub fn sources(sources: &[Source]) -> Result<Self> {
        let payload = serde_json::to_string(sources)
            .map_err(|e| AppError::Internal(format!("Failed to encode sources: {}", e)))?;
        Ok(Self::new(EventKind::Sources, payload))
    }

    pub fn chunk(text: impl Into<String>) -> Self {
        Self::new(EventKind::Chunk, text)
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::new(EventKind::Error, description)
    }

    pub fn done(status: impl Into<String>) -> Self {
        Self::new(EventKind::Done, status)
    }

    /// `done` is the last event of every run
    pub fn is_terminal(&self) -> bool {
        self.kind == EventKind::Done
    }
}
