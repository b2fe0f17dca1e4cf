//! Error types for the alert relay.

use crate::notification::ForwardError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that terminate an alert relay request.
///
/// Every variant is answered with a bare `500 Internal Server Error`.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The inbound body is not a valid alert document.
    #[error("decode alert error: {0}")]
    Decode(#[source] serde_json::Error),

    /// The chat message could not be serialized.
    #[error("marshal error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The chat message could not be delivered to the webhook.
    #[error("forward error: {0}")]
    Forward(#[from] ForwardError),

    /// The response to the caller could not be built.
    #[error("write error: {0}")]
    ResponseWrite(#[from] axum::http::Error),
}

impl RelayError {
    /// A short, stable label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Decode(_) => "decode",
            RelayError::Serialize(_) => "serialize",
            RelayError::Forward(_) => "forward",
            RelayError::ResponseWrite(_) => "response_write",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        tracing::error!(kind = self.kind(), error = %self, "Failed to relay alert");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;
