use crate::{AppState, types::HealthResponse};
use axum::{Json, extract::State};
use serde_json::{Value, json};

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.llm.model_name().to_string(),
    })
}

/// Root endpoint with a welcome message
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Insight AI API!" }))
}
