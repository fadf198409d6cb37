use crate::{
    AppState,
    types::{AppError, AskParams, Result},
    workflows::Event,
};
use axum::{
    extract::{Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use futures::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tracing::info;

/// Interval between keep-alive comments on an idle stream
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Answer a question as a Server-Sent Events stream
///
/// Streams `trace`, `sources`, `chunk`, `error` and `done` events. The
/// workflow stops as soon as the client closes the connection.
#[utoipa::path(
    get,
    path = "/api/chat/ask",
    params(AskParams),
    responses(
        (status = 200, description = "Event stream", content_type = "text/event-stream", body = String),
        (status = 400, description = "Missing or empty query")
    ),
    tag = "chat"
)]
pub async fn ask(
    State(state): State<AppState>,
    Query(params): Query<AskParams>,
) -> Result<Sse<impl Stream<Item = std::result::Result<SseEvent, Infallible>>>> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter is required.".to_string(),
        ));
    }

    info!(query, "Client connected to ask stream");

    // Dropping this stream (client disconnect) cancels the run
    let events = state
        .orchestrator
        .spawn(query)
        .into_stream()
        .map(|event| Ok(to_sse(event)));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    ))
}

fn to_sse(event: Event) -> SseEvent {
    SseEvent::default()
        .event(event.kind.as_str())
        .data(unify_line_breaks(&event.payload))
}

/// SSE splits `data` on `\n` only; a bare `\r` would reach the client as an extra line break
fn unify_line_breaks(payload: &str) -> String {
    payload.replace("\r\n", "\n").replace('\r', "\n")
}
