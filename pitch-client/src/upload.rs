//! Audio upload handed to the extractor

use std::path::Path;

use reqwest::multipart::Part;

use crate::error::ClientError;

/// An audio file to send, consumed by one extraction
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl AudioUpload {
    pub fn new(filename: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(&filename).map(str::to_string);
        Self {
            filename,
            content_type,
            data,
        }
    }

    /// Read a file from disk; the file name becomes the upload name
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        Ok(Self::new(filename, data))
    }

    pub(crate) fn into_part(self) -> Result<Part, ClientError> {
        let part = Part::bytes(self.data).file_name(self.filename);
        match self.content_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| ClientError::Upload(e.to_string())),
            None => Ok(part),
        }
    }
}

/// MIME type for the formats the pitch service accepts
fn guess_content_type(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "flac" => Some("audio/flac"),
        "ogg" => Some("audio/ogg"),
        "m4a" => Some("audio/mp4"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(AudioUpload::new("a.WAV", vec![]).content_type.as_deref(), Some("audio/wav"));
        assert_eq!(AudioUpload::new("b.mp3", vec![]).content_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(AudioUpload::new("notes.txt", vec![]).content_type, None);
        assert_eq!(AudioUpload::new("noext", vec![]).content_type, None);
    }

    #[test]
    fn test_invalid_content_type_is_upload_error() {
        let upload = AudioUpload {
            filename: "a.wav".to_string(),
            content_type: Some("not a mime".to_string()),
            data: vec![1, 2, 3],
        };
        assert!(matches!(upload.into_part(), Err(ClientError::Upload(_))));
    }

    #[tokio::test]
    async fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take1.flac");
        std::fs::write(&path, b"fLaC").unwrap();

        let upload = AudioUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.filename, "take1.flac");
        assert_eq!(upload.content_type.as_deref(), Some("audio/flac"));
        assert_eq!(upload.data, b"fLaC");
    }
}
