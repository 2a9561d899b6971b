//! Error types for pitch-client
//!
//! None of these escape `extract_pitch`; they end up as the text of the
//! `error` state.

use thiserror::Error;

/// Shown when a failure carries no message of its own
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug, Error)]
pub enum ClientError {
    /// Endpoint or token missing
    #[error("{0}")]
    Config(String),

    /// Request could not be built from the upload
    #[error("Invalid upload: {0}")]
    Upload(String),

    /// Network failure, or a body that is not the expected JSON
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Relay answered with a failure status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// File could not be read
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Text stored in the `error` state
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_relay_text() {
        let err = ClientError::Rejected {
            status: 400,
            message: "No audio file provided".to_string(),
        };
        assert_eq!(err.user_message(), "No audio file provided");
    }

    #[test]
    fn test_empty_message_falls_back() {
        let err = ClientError::Rejected {
            status: 500,
            message: String::new(),
        };
        assert_eq!(err.user_message(), UNKNOWN_ERROR);
    }
}
