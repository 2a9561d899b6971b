//! Pitch extraction relay endpoint
//!
//! `ANY /functions/v1/extract-pitch`
//!
//! - OPTIONS: preflight, answered with `ok` without touching the body
//! - POST: multipart body with an `audio` field, forwarded to the pitch service
//! - anything else: 405

use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    response::{IntoResponse, Response},
};
use pitch_common::{api::AUDIO_FIELD, ErrorBody, PitchExtractionResult};
use serde_json::value::RawValue;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{RelayError, RelayResult};
use crate::service::{AudioPart, ServiceReply};
use crate::AppState;

/// Relay handler
pub async fn extract_pitch(
    State(state): State<AppState>,
    request: Request,
) -> RelayResult<Response> {
    match *request.method() {
        Method::OPTIONS => return Ok((StatusCode::OK, "ok").into_response()),
        Method::POST => {}
        _ => return Err(RelayError::MethodNotAllowed),
    }

    let multipart = Multipart::from_request(request, &state)
        .await
        .map_err(|e| RelayError::Multipart(e.to_string()))?;

    let audio = find_audio(multipart)
        .await?
        .ok_or(RelayError::NoAudioFile)?;

    info!(
        file_name = audio.file_name.as_deref().unwrap_or("-"),
        bytes = audio.data.len(),
        "Relaying audio to pitch service"
    );

    let reply = state.service.submit(audio).await?;
    relay_reply(reply, state.config.validate_response)
}

/// First field named `audio`, read fully into memory
async fn find_audio(mut multipart: Multipart) -> RelayResult<Option<AudioPart>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::Multipart(e.to_string()))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| RelayError::Multipart(e.to_string()))?;

        return Ok(Some(AudioPart {
            file_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

/// Turn the pitch service reply into the relay response
///
/// Failures keep the service's status and its `error` message. Success bodies
/// are relayed as the exact JSON text the service sent.
fn relay_reply(reply: ServiceReply, validate_response: bool) -> RelayResult<Response> {
    if !reply.is_success() {
        let body: Value = serde_json::from_slice(&reply.body)?;
        let status = StatusCode::from_u16(reply.status)
            .map_err(|e| RelayError::Internal(e.to_string()))?;
        let body = ErrorBody::relayed(&body);

        warn!(status = reply.status, error = %body.error, "Pitch service reported failure");
        return Err(RelayError::Upstream { status, body });
    }

    let raw: Box<RawValue> = serde_json::from_slice(&reply.body)?;

    if validate_response {
        PitchExtractionResult::from_json_checked(raw.get()).map_err(RelayError::ShapeDrift)?;
    }

    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "application/json")],
        raw.get().to_string(),
    )
        .into_response())
}
