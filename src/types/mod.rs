use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// ============= API Request/Response Types =============

/// Query string of `GET /api/chat/ask`
#[derive(Debug, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AskParams {
    /// The user's natural-language question
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
}

// ============= Research Types =============

/// Raw search hit returned by a [`SearchProvider`](crate::research::SearchProvider),
/// before deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub url: String,
    pub title: String,
    pub content: String,
}

impl Snippet {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A deduplicated snippet carrying the 1-based ordinal the writer cites it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Source {
    pub id: usize,
    pub url: String,
    pub title: String,
    pub content: String,
}

impl Source {
    pub fn from_snippet(id: usize, snippet: Snippet) -> Self {
        Self {
            id,
            url: snippet.url,
            title: snippet.title,
            content: snippet.content,
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM error: {0}")]
    LLM(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The client went away; never reported to anyone
    #[error("Run cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::InvalidInput(_) => axum::http::StatusCode::BAD_REQUEST,
            _ => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_source_serializes_with_id_first() {
        let source = Source::from_snippet(1, Snippet::new("https://a.example", "A", "alpha"));
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["url"], "https://a.example");
        assert_eq!(json["title"], "A");
        assert_eq!(json["content"], "alpha");
    }

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let response = AppError::InvalidInput("empty".to_string()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_llm_error_maps_to_server_error() {
        let response = AppError::LLM("down".to_string()).into_response();
        assert_eq!(
            response.status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
