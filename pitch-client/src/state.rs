//! Observable extraction state

use pitch_common::PitchExtractionResult;

/// Loading flag, last error, and last successful result
///
/// A failure sets `error` but leaves `result` at whatever the previous
/// success produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionState {
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<PitchExtractionResult>,
}

/// Coarse view of [`ExtractionState`]
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    Success(PitchExtractionResult),
    Error(String),
}

impl ExtractionState {
    pub fn phase(&self) -> RequestState {
        if self.loading {
            return RequestState::Loading;
        }
        match (&self.error, &self.result) {
            (Some(message), _) => RequestState::Error(message.clone()),
            (None, Some(result)) => RequestState::Success(result.clone()),
            (None, None) => RequestState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_common::{Metadata, PitchContour};

    fn result() -> PitchExtractionResult {
        PitchExtractionResult {
            success: true,
            metadata: Metadata {
                sample_rate: 22050,
                duration_seconds: 0.5,
                filename: "a.wav".to_string(),
            },
            pitch_contour: PitchContour::default(),
            note_events: Vec::new(),
            midi_data: None,
        }
    }

    #[test]
    fn test_phase_follows_fields() {
        let mut state = ExtractionState::default();
        assert_eq!(state.phase(), RequestState::Idle);

        state.loading = true;
        assert_eq!(state.phase(), RequestState::Loading);

        state.loading = false;
        state.result = Some(result());
        assert_eq!(state.phase(), RequestState::Success(result()));

        // Error wins over a stale result
        state.error = Some("boom".to_string());
        assert_eq!(state.phase(), RequestState::Error("boom".to_string()));
    }
}
