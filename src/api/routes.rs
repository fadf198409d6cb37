use crate::AppState;
use crate::types::{HealthResponse, Source};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;

/// OpenAPI document served at `/api-docs/openapi.json`
#[derive(OpenApi)]
#[openapi(
    info(title = "Insight AI API", description = "Streaming research agent"),
    paths(
        crate::api::handlers::ask::ask,
        crate::api::handlers::health::health,
    ),
    components(schemas(Source, HealthResponse)),
    tags(
        (name = "chat", description = "Question answering"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

/// Routes mounted under `/api`
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/chat/ask", get(crate::api::handlers::ask::ask))
        .route("/health", get(crate::api::handlers::health::health))
}

/// Full application: API routes, root endpoint, OpenAPI document, CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(crate::api::handlers::health::root))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api", create_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::CACHE_CONTROL])
}
