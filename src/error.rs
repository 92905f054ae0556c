//! Error types returned by the aggregation engine

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Errors that abort a search before any cache or history side effect
///
/// Individual source or summarizer failures never surface here; they are
/// reported as outcome entries on the response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregatorError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for AggregatorError {
    fn into_response(self) -> Response {
        let status = match self {
            AggregatorError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AggregatorError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let body = serde_json::json!({
            "error": self.to_string()
        });

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
