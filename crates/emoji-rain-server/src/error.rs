//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies the failure modes of the annotation endpoint
//! into a single enum that converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{"error": "<message>"}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emoji_rain_annotator::AnnotatorError;
use serde::{Deserialize, Serialize};

/// Message shown to callers when the language model fails.
///
/// Upstream details stay in the server log.
pub const UPSTREAM_FAILURE_MESSAGE: &str =
    "Failed to call the emoji service, please try again later";

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
}

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was missing, malformed, or had empty input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The annotation service failed; nothing was applied.
    #[error("upstream failure: {0}")]
    Upstream(#[from] AnnotatorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Upstream(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                UPSTREAM_FAILURE_MESSAGE.to_owned(),
            ),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
