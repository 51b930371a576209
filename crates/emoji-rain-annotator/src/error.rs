//! Error types for the annotation client.

use std::time::Duration;

/// Errors that can occur while configuring or calling the annotation service.
#[derive(Debug, thiserror::Error)]
pub enum AnnotatorError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status code.
    #[error("upstream returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for the logs.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No answer arrived before the deadline.
    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}
