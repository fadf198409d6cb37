//! Workflow Orchestrator
//!
//! Drives one research run through `Start → Planning → Researching → Writing → Done`,
//! with `Failed` reachable from every non-terminal phase, and writes the event
//! protocol into an [`EventSink`].
//!
//! Guarantees:
//! - `sources` is always emitted, and always before any `chunk` or `error`.
//! - Every run that is not disconnected ends with exactly one `done` event.
//!   A panic inside a collaborator ends the run on the failed path too.
//! - A client disconnect halts the run at the next phase boundary or writer
//!   increment, drops in-flight provider and search calls, and emits nothing.

use crate::agents::{PlannerAgent, WriterAgent};
use crate::llm::LLMClient;
use crate::research::{Evidence, EvidenceAggregator, SearchProvider};
use crate::types::{AppError, Result};
use crate::utils::config::InsightConfig;
use crate::workflows::events::{
    DONE_COMPLETE, DONE_FAILED, Event, NO_INFORMATION, TRACE_PLANNING, TRACE_SEARCHING,
    TRACE_WRITING,
};
use crate::workflows::transport::{self, EventSink, EventStream};
use futures::{FutureExt, StreamExt};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info};

const DEFAULT_MAX_QUERIES: usize = 3;
const DEFAULT_MAX_RESULTS: usize = 2;
const DEFAULT_EVENT_BUFFER: usize = 32;

/// Phase of a run, carrying what the next step needs
#[derive(Debug)]
enum Phase {
    Start,
    Planning,
    Researching { queries: Vec<String> },
    Writing { evidence: Evidence },
    Done,
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Planning => "planning",
            Phase::Researching { .. } => "researching",
            Phase::Writing { .. } => "writing",
            Phase::Done => "done",
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `done("Stream complete.")` was delivered
    Completed,
    /// `error` + `done("Stream failed.")` were emitted
    Failed,
    /// The client went away; the run stopped silently
    Disconnected,
}

/// Sequences planner, evidence aggregator and writer for each query.
///
/// Holds no per-run state, so one instance serves any number of concurrent runs.
pub struct WorkflowOrchestrator {
    planner: PlannerAgent,
    aggregator: EvidenceAggregator,
    writer: WriterAgent,
    event_buffer: usize,
}

impl WorkflowOrchestrator {
    /// Create an orchestrator with default limits
    pub fn new(llm: Arc<dyn LLMClient>, search: Arc<dyn SearchProvider>) -> Self {
        Self {
            planner: PlannerAgent::new(Arc::clone(&llm), DEFAULT_MAX_QUERIES),
            aggregator: EvidenceAggregator::new(search, DEFAULT_MAX_RESULTS),
            writer: WriterAgent::new(llm),
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }

    /// Create an orchestrator with limits taken from configuration
    pub fn from_config(
        llm: Arc<dyn LLMClient>,
        search: Arc<dyn SearchProvider>,
        config: &InsightConfig,
    ) -> Self {
        Self {
            planner: PlannerAgent::new(Arc::clone(&llm), config.workflow.max_queries),
            aggregator: EvidenceAggregator::new(search, config.search.max_results),
            writer: WriterAgent::new(llm),
            event_buffer: config.workflow.event_buffer,
        }
    }

    /// Start a run on its own task and return the client side of its event channel.
    ///
    /// Dropping the returned [`EventStream`] disconnects the run.
    pub fn spawn(self: &Arc<Self>, query: impl Into<String>) -> EventStream {
        let (sink, stream) = transport::channel(self.event_buffer);
        let orchestrator = Arc::clone(self);
        let query = query.into();

        tokio::spawn(async move {
            orchestrator.run(&query, sink).await;
        });

        stream
    }

    /// Execute one run to completion, writing every event into `sink`.
    pub async fn run(&self, query: &str, sink: EventSink) -> RunOutcome {
        info!(query, "Workflow started");
        let mut phase = Phase::Start;

        loop {
            if sink.is_cancelled() {
                info!(phase = phase.name(), "Client disconnected, halting workflow");
                return RunOutcome::Disconnected;
            }

            let current = phase.name();
            let stepped = AssertUnwindSafe(self.step(phase, query, &sink))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(AppError::Internal(panic_message(panic.as_ref()))));

            match stepped {
                Ok(Phase::Done) => {
                    info!("Workflow complete");
                    return RunOutcome::Completed;
                }
                Ok(next) => {
                    debug!(from = current, to = next.name(), "Phase transition");
                    phase = next;
                }
                Err(AppError::Cancelled) => {
                    info!(phase = current, "Client disconnected, halting workflow");
                    return RunOutcome::Disconnected;
                }
                Err(e) => {
                    error!(phase = current, error = %e, "Workflow failed");
                    return self.fail(&sink, &e).await;
                }
            }
        }
    }

    async fn fail(&self, sink: &EventSink, e: &AppError) -> RunOutcome {
        let description = format!("An unexpected error occurred in the workflow: {}", e);
        if sink.emit(Event::error(description)).await.is_err()
            || sink.emit(Event::done(DONE_FAILED)).await.is_err()
        {
            return RunOutcome::Disconnected;
        }
        RunOutcome::Failed
    }

    /// Perform one phase's work and emit the events of the transition out of it
    async fn step(&self, phase: Phase, query: &str, sink: &EventSink) -> Result<Phase> {
        match phase {
            Phase::Start => {
                sink.emit(Event::trace(TRACE_PLANNING)).await?;
                Ok(Phase::Planning)
            }

            Phase::Planning => {
                let queries = until_cancelled(sink, self.planner.plan(query)).await?;
                sink.emit(Event::trace(TRACE_SEARCHING)).await?;
                Ok(Phase::Researching { queries })
            }

            Phase::Researching { queries } => {
                let evidence = until_cancelled(sink, self.aggregator.aggregate(&queries)).await??;
                sink.emit(Event::sources(&evidence.sources)?).await?;
                Ok(Phase::Writing { evidence })
            }

            Phase::Writing { evidence } => {
                sink.emit(Event::trace(TRACE_WRITING)).await?;

                if evidence.is_empty() {
                    info!("No evidence found, skipping writer");
                    sink.emit(Event::chunk(NO_INFORMATION)).await?;
                } else {
                    self.relay_answer(query, &evidence, sink).await?;
                }

                sink.emit(Event::done(DONE_COMPLETE)).await?;
                Ok(Phase::Done)
            }

            Phase::Done => Ok(Phase::Done),
        }
    }

    /// Forward every writer event unchanged, checking for disconnects between increments
    async fn relay_answer(&self, query: &str, evidence: &Evidence, sink: &EventSink) -> Result<()> {
        let answer = self.writer.write(query, &evidence.context);
        tokio::pin!(answer);

        while let Some(event) = until_cancelled(sink, answer.next()).await? {
            sink.emit(event).await?;
        }
        Ok(())
    }
}

/// Text of a caught panic payload
fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("Panicked: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("Panicked: {}", message)
    } else {
        "Panicked".to_string()
    }
}

/// Await `fut` unless the client disconnects first; the future is dropped on disconnect
async fn until_cancelled<F: Future>(sink: &EventSink, fut: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = sink.cancelled() => Err(AppError::Cancelled),
        output = fut => Ok(output),
    }
}
