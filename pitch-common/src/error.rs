//! Common error types for the pitch relay and client

use thiserror::Error;

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared by the relay and the client
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pitch extraction payload is not the expected JSON
    #[error("Malformed pitch result: {0}")]
    Json(#[from] serde_json::Error),

    /// Pitch extraction payload breaks a structural invariant
    #[error("Malformed pitch result: {0}")]
    Shape(#[from] ShapeError),
}

/// Violations of the `PitchExtractionResult` invariants
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// The three contour sequences must describe the same sampled instants
    #[error(
        "pitch contour lengths differ (times: {times}, frequencies: {frequencies}, confidence: {confidence})"
    )]
    ContourLengthMismatch {
        times: usize,
        frequencies: usize,
        confidence: usize,
    },

    /// A note ends before it starts
    #[error("note event {index} ends before it starts ({start_time} > {end_time})")]
    NoteOrder {
        index: usize,
        start_time: f64,
        end_time: f64,
    },
}
