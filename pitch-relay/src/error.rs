//! Error types for pitch-relay
//!
//! Every failure leaves the relay as `{"error": ...}` JSON with a status that
//! reflects where it came from.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pitch_common::ErrorBody;
use thiserror::Error;
use tracing::error;

/// Relay error type
#[derive(Debug, Error)]
pub enum RelayError {
    /// Anything other than POST or OPTIONS (405)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// POST without an `audio` field (400)
    #[error("No audio file provided")]
    NoAudioFile,

    /// Pitch service answered with a failure; relayed with its own status
    #[error("Pitch service returned {status}")]
    Upstream { status: StatusCode, body: ErrorBody },

    /// Pitch service success body does not match the result shape (502)
    #[error("Pitch service returned an unexpected result shape: {0}")]
    ShapeDrift(#[source] pitch_common::Error),

    /// Request body could not be read as multipart form data (500)
    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    /// Could not reach the pitch service or read its reply (500)
    #[error("Pitch service request failed: {0}")]
    Service(#[from] reqwest::Error),

    /// Pitch service body is not JSON (500)
    #[error("Pitch service returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            RelayError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::new(self.to_string()),
            ),
            RelayError::NoAudioFile => (StatusCode::BAD_REQUEST, ErrorBody::new(self.to_string())),
            RelayError::Upstream { status, body } => (status, body),
            RelayError::ShapeDrift(_) => {
                error!(error = %self, "Rejected pitch service response");
                (StatusCode::BAD_GATEWAY, ErrorBody::new(self.to_string()))
            }
            _ => {
                error!(error = %self, "Relay request failed");
                let message = self.to_string();
                let message = if message.is_empty() {
                    "Internal server error".to_string()
                } else {
                    message
                };
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(message))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for relay handlers
pub type RelayResult<T> = Result<T, RelayError>;
