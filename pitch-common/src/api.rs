//! HTTP contract shared by the relay and the client

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Multipart field carrying the audio file, on both hops
pub const AUDIO_FIELD: &str = "audio";

/// Route of the relay function
pub const RELAY_PATH: &str = "/functions/v1/extract-pitch";

/// Route of the pitch service, appended to its base URL
pub const SERVICE_PATH: &str = "/api/pitch";

/// Used when a failure response does not say what went wrong
pub const EXTRACTION_FAILED: &str = "Failed to extract pitch";

/// Body of every failure response: `{"error": ...}`
///
/// The value is usually a string. It is kept as raw JSON so the relay can
/// hand back whatever the pitch service reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: Value,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: Value::String(message.into()),
        }
    }

    /// Build from a failure body received from the next hop
    ///
    /// Takes its `error` field when that field is set to something meaningful,
    /// otherwise falls back to [`EXTRACTION_FAILED`].
    pub fn relayed(body: &Value) -> Self {
        match reported_error(body) {
            Some(error) => Self {
                error: error.clone(),
            },
            None => Self::new(EXTRACTION_FAILED),
        }
    }

    /// The error as text, if it is a string
    pub fn message(&self) -> Option<&str> {
        self.error.as_str()
    }
}

/// The `error` field of a JSON body, unless it is missing, null, false, zero or empty
pub fn reported_error(body: &Value) -> Option<&Value> {
    let error = body.get("error")?;
    let set = match error {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    set.then_some(error)
}
