//! Pitch extraction requests
//!
//! `extract_pitch` never fails outward: it resolves to the result or to
//! `None`, and the reason for a `None` is left in the `error` state.
//!
//! Calls on one extractor run one at a time. A call made while another is in
//! flight waits for it to settle before touching the state.

use pitch_common::api::AUDIO_FIELD;
use pitch_common::{ErrorBody, PitchExtractionResult};
use reqwest::multipart::Form;
use serde_json::Value;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, ConfigSource};
use crate::error::ClientError;
use crate::state::{ExtractionState, RequestState};
use crate::upload::AudioUpload;

const USER_AGENT: &str = concat!("pitch-client/", env!("CARGO_PKG_VERSION"));

/// Client for the pitch relay with observable request state
pub struct PitchExtractor {
    http_client: reqwest::Client,
    config: ConfigSource,
    state: watch::Sender<ExtractionState>,
    in_flight: Mutex<()>,
}

impl PitchExtractor {
    /// No request timeout, no retries.
    pub fn new(config: ConfigSource) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let (state, _) = watch::channel(ExtractionState::default());

        Ok(Self {
            http_client,
            config,
            state,
            in_flight: Mutex::new(()),
        })
    }

    /// Read `PITCH_BACKEND_URL` / `PITCH_BACKEND_TOKEN` on every call
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ConfigSource::Env)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, ClientError> {
        Self::new(ConfigSource::Fixed(config))
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ExtractionState {
        self.state.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn result(&self) -> Option<PitchExtractionResult> {
        self.state.borrow().result.clone()
    }

    pub fn phase(&self) -> RequestState {
        self.state.borrow().phase()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<ExtractionState> {
        self.state.subscribe()
    }

    /// Send `upload` to the relay and record the outcome
    pub async fn extract_pitch(&self, upload: AudioUpload) -> Option<PitchExtractionResult> {
        let _flight = self.in_flight.lock().await;

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        // Clears `loading` even if the caller drops this future mid-request
        let _loading = LoadingGuard(&self.state);

        let filename = upload.filename.clone();
        match self.request(upload).await {
            Ok(result) => {
                info!(
                    file = %filename,
                    notes = result.note_events.len(),
                    duration_seconds = result.metadata.duration_seconds,
                    "Pitch extraction succeeded"
                );
                self.state.send_modify(|state| {
                    state.result = Some(result.clone());
                    state.loading = false;
                });
                Some(result)
            }
            Err(e) => {
                let message = e.user_message();
                warn!(file = %filename, error = %message, "Pitch extraction failed");
                self.state.send_modify(|state| {
                    state.error = Some(message);
                    state.loading = false;
                });
                None
            }
        }
    }

    async fn request(&self, upload: AudioUpload) -> Result<PitchExtractionResult, ClientError> {
        let config = self.config.resolve()?;
        let endpoint = config.endpoint();
        let form = Form::new().part(AUDIO_FIELD, upload.into_part()?);

        debug!(endpoint = %endpoint, "Posting audio to pitch relay");

        let response = self
            .http_client
            .post(&endpoint)
            .bearer_auth(&config.token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await?;
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body),
            });
        }

        Ok(response.json::<PitchExtractionResult>().await?)
    }
}

/// Resets `loading` when an extraction ends, however it ends
struct LoadingGuard<'a>(&'a watch::Sender<ExtractionState>);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_if_modified(|state| std::mem::replace(&mut state.loading, false));
    }
}

/// Text of the relay's `error` field, or the generic failure message
fn rejection_message(body: &Value) -> String {
    let error = ErrorBody::relayed(body).error;
    match error {
        Value::String(message) => message,
        other => other.to_string(),
    }
}
