//! HTTP boundary error type
//!
//! Pipeline failures collapse into a generic client-visible message at this
//! boundary; the original error is logged server-side only.

use crate::error::Error as CrateError;
use crate::rag::RagError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Error type returned by the request handlers
#[derive(Debug)]
pub enum ApiError {
    /// The request body failed validation; nothing downstream ran
    BadRequest(&'static str),

    /// The retrieval index is not initialized yet
    NotReady(String),

    /// The requested operation conflicts with one already running
    Conflict(String),

    /// A pipeline failure, reported with a generic message
    Internal(&'static str),
}

impl ApiError {
    /// Log the underlying error and return a generic client-visible failure
    pub fn internal(message: &'static str, err: impl Into<CrateError>) -> Self {
        let err = err.into();
        error!(error = %err, "{}", message);
        ApiError::Internal(message)
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::NotReady => ApiError::NotReady(err.to_string()),
            RagError::RebuildInProgress => ApiError::Conflict(err.to_string()),
            _ => ApiError::internal("Failed to process retrieval request", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.to_string()),
            ApiError::NotReady(message) => (StatusCode::SERVICE_UNAVAILABLE, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
