//! Event transport between a running workflow and its client connection
//!
//! A run writes into an [`EventSink`]; the connection reads from the paired
//! [`EventStream`]. The two halves share a cancellation token:
//! - dropping the [`EventStream`] (the client went away) cancels it,
//! - a send that finds the receiver gone cancels it as well,
//!
//! and the workflow checks it at every suspension point.

use crate::types::{AppError, Result};
use crate::workflows::events::Event;
use async_stream::stream;
use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};

/// Create a connected sink/stream pair holding at most `capacity` undelivered events
pub fn channel(capacity: usize) -> (EventSink, EventStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let cancel = CancellationToken::new();

    let sink = EventSink {
        tx,
        cancel: cancel.clone(),
    };
    let stream = EventStream {
        rx,
        cancel: cancel.clone(),
        _guard: cancel.drop_guard(),
    };
    (sink, stream)
}

/// Producer half, owned by the workflow run
#[derive(Debug)]
pub struct EventSink {
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
}

impl EventSink {
    /// Deliver one event, waiting for buffer space.
    ///
    /// Returns [`AppError::Cancelled`] once the client has disconnected; no
    /// event is accepted after that point.
    pub async fn emit(&self, event: Event) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(AppError::Cancelled),
            sent = self.tx.send(event) => sent.map_err(|_| {
                self.cancel.cancel();
                AppError::Cancelled
            }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }

    /// Resolves when the client disconnects
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }
}

/// Consumer half, owned by the client connection
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<Event>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl EventStream {
    /// Next event, `None` once the run has finished and the buffer is drained
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Report that the client is gone without dropping the stream
    pub fn disconnect(&self) {
        self.cancel.cancel();
    }

    /// Adapt into a [`Stream`] that ends right after the terminal `done` event.
    ///
    /// Dropping the returned stream disconnects the run.
    pub fn into_stream(mut self) -> impl Stream<Item = Event> + Send + 'static {
        stream! {
            while let Some(event) = self.recv().await {
                let terminal = event.is_terminal();
                yield event;
                if terminal {
                    break;
                }
            }
        }
    }
}
