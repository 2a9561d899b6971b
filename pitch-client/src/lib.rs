//! pitch-client library
//!
//! Sends audio to the pitch relay and tracks the outcome of the last
//! extraction as observable state (loading, error, result).
//!
//! ```no_run
//! # async fn demo() -> Result<(), pitch_client::ClientError> {
//! use pitch_client::{AudioUpload, PitchExtractor};
//!
//! let extractor = PitchExtractor::from_env()?;
//! let upload = AudioUpload::new("hum.wav", std::fs::read("hum.wav")?);
//!
//! match extractor.extract_pitch(upload).await {
//!     Some(result) => println!("{} notes", result.note_events.len()),
//!     None => eprintln!("failed: {}", extractor.error().unwrap_or_default()),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod state;
pub mod upload;

pub use crate::config::{ClientConfig, ConfigSource};
pub use crate::error::ClientError;
pub use crate::extractor::PitchExtractor;
pub use crate::state::{ExtractionState, RequestState};
pub use crate::upload::AudioUpload;
pub use pitch_common::PitchExtractionResult;
