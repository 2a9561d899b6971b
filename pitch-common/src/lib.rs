//! # Pitch Common Library
//!
//! Shared code for the pitch relay and the pitch client:
//! - Wire types exchanged with the Basic Pitch service (`PitchExtractionResult`)
//! - The `{"error": ...}` body used on every failure response
//! - Paths, field names and fixed messages both sides agree on
//! - Configuration file loading

pub mod api;
pub mod config;
pub mod error;
pub mod pitch;

pub use api::ErrorBody;
pub use error::{Error, Result, ShapeError};
pub use pitch::{Metadata, NoteEvent, PitchContour, PitchExtractionResult};
