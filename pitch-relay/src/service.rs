//! Basic Pitch service client
//!
//! Forwards one audio upload to `<service_url>/api/pitch` and hands back the
//! raw reply. Interpreting the reply is left to the handler.

use axum::body::Bytes;
use pitch_common::api::AUDIO_FIELD;
use reqwest::multipart::{Form, Part};
use tracing::{debug, warn};

use crate::error::RelayResult;

const USER_AGENT: &str = concat!("pitch-relay/", env!("CARGO_PKG_VERSION"));

/// Audio field taken from the incoming multipart body
#[derive(Debug, Clone)]
pub struct AudioPart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Status and body as received from the pitch service
#[derive(Debug)]
pub struct ServiceReply {
    pub status: u16,
    pub body: Bytes,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for the pitch service
#[derive(Clone)]
pub struct PitchService {
    http_client: reqwest::Client,
    endpoint: String,
}

impl PitchService {
    /// No request timeout: a slow extraction runs until the service answers.
    pub fn new(endpoint: String) -> RelayResult<Self> {
        let http_client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// POST the audio as a fresh multipart body under the same field name
    pub async fn submit(&self, audio: AudioPart) -> RelayResult<ServiceReply> {
        let size = audio.data.len();
        let form = Form::new().part(AUDIO_FIELD, audio_part(audio));

        debug!(endpoint = %self.endpoint, bytes = size, "Forwarding audio to pitch service");

        let response = self
            .http_client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "Pitch service replied");

        Ok(ServiceReply { status, body })
    }
}

fn audio_part(audio: AudioPart) -> Part {
    let AudioPart {
        file_name,
        content_type,
        data,
    } = audio;

    let with_name = |part: Part| match &file_name {
        Some(name) => part.file_name(name.clone()),
        None => part,
    };

    let part = with_name(Part::bytes(data.to_vec()));
    match content_type {
        Some(mime) => match part.mime_str(&mime) {
            Ok(part) => part,
            Err(e) => {
                warn!(content_type = %mime, error = %e, "Dropping unparseable content type");
                with_name(Part::bytes(data.to_vec()))
            }
        },
        None => part,
    }
}
