//! Pitch extraction payload
//!
//! Shape produced by the Basic Pitch service for `POST /api/pitch`. The relay
//! passes it through untouched; the client decodes it into these types.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::Result;

/// Result of one pitch extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchExtractionResult {
    pub success: bool,
    pub metadata: Metadata,
    pub pitch_contour: PitchContour,
    pub note_events: Vec<NoteEvent>,
    /// Raw MIDI file bytes, when the service rendered one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midi_data: Option<Vec<u8>>,
}

/// Audio metadata reported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub sample_rate: u32,
    pub duration_seconds: f64,
    pub filename: String,
}

/// Frame-wise pitch estimate
///
/// Index `i` of each sequence describes the same sampled instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PitchContour {
    pub times: Vec<f64>,
    pub frequencies: Vec<f64>,
    pub confidence: Vec<f64>,
}

/// A detected note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub start_time: f64,
    pub end_time: f64,
    pub pitch_midi: u8,
    pub velocity: u8,
}

impl PitchContour {
    /// Number of sampled instants, or `None` if the sequences disagree
    pub fn len(&self) -> Option<usize> {
        let n = self.times.len();
        (self.frequencies.len() == n && self.confidence.len() == n).then_some(n)
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty() && self.frequencies.is_empty() && self.confidence.is_empty()
    }
}

impl PitchExtractionResult {
    /// Decode a service payload and check its invariants
    pub fn from_json_checked(json: &str) -> Result<Self> {
        let result: Self = serde_json::from_str(json)?;
        result.validate()?;
        Ok(result)
    }

    /// Check the structural invariants of the payload
    pub fn validate(&self) -> std::result::Result<(), ShapeError> {
        let c = &self.pitch_contour;
        if c.len().is_none() {
            return Err(ShapeError::ContourLengthMismatch {
                times: c.times.len(),
                frequencies: c.frequencies.len(),
                confidence: c.confidence.len(),
            });
        }

        for (index, note) in self.note_events.iter().enumerate() {
            if note.start_time > note.end_time {
                return Err(ShapeError::NoteOrder {
                    index,
                    start_time: note.start_time,
                    end_time: note.end_time,
                });
            }
        }

        Ok(())
    }
}
