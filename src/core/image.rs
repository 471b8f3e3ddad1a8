use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

use super::error::StudioError;

/// Upload cap enforced before any bytes reach the API.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// An inline image: base64 bytes plus their MIME type. Built once from a
/// user-selected file or an API response part, then never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String, // base64 encoded
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Render as a `data:<mime>;base64,<data>` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Parse a `data:<mime>;base64,<data>` URI back into a payload.
    pub fn from_data_uri(uri: &str) -> Result<Self, StudioError> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| StudioError::InvalidDataUri(uri.to_string()))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| StudioError::InvalidDataUri(uri.to_string()))?;
        if mime_type.is_empty() {
            return Err(StudioError::InvalidDataUri(uri.to_string()));
        }
        Ok(Self::new(mime_type, data))
    }

    /// Decode the base64 data back into raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, StudioError> {
        Ok(BASE64.decode(&self.data)?)
    }
}

/// Reject files over the upload cap. Exactly 5 MiB is still accepted.
pub fn validate_upload_size(size: u64) -> Result<(), StudioError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(StudioError::FileTooLarge { size });
    }
    Ok(())
}

/// Derive a MIME type from the file extension, defaulting to PNG.
pub fn mime_type_for_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Read an image file, enforce the upload cap, and encode it as base64.
pub async fn load_image_payload(path: &Path) -> Result<ImagePayload, StudioError> {
    let metadata = fs::metadata(path).await?;
    validate_upload_size(metadata.len())?;

    let bytes = fs::read(path).await?;
    Ok(ImagePayload::new(
        mime_type_for_path(path),
        BASE64.encode(&bytes),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_round_trip() {
        let payload = ImagePayload::new("image/png", "AAAA");
        let uri = payload.to_data_uri();
        assert_eq!(uri, "data:image/png;base64,AAAA");
        assert_eq!(ImagePayload::from_data_uri(&uri).unwrap(), payload);
    }

    #[test]
    fn data_uri_rejects_undecorated_strings() {
        assert!(ImagePayload::from_data_uri("AAAA").is_err());
        assert!(ImagePayload::from_data_uri("http://example.com/a.png").is_err());
        assert!(ImagePayload::from_data_uri("data:image/png,AAAA").is_err());
        assert!(ImagePayload::from_data_uri("data:;base64,AAAA").is_err());
    }

    #[test]
    fn upload_cap_boundary() {
        assert!(validate_upload_size(MAX_UPLOAD_BYTES).is_ok());

        let err = validate_upload_size(MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(err.to_string().contains("5 MiB"));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_type_for_path(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(mime_type_for_path(Path::new("a.webp")), "image/webp");
        assert_eq!(mime_type_for_path(Path::new("a.gif")), "image/gif");
        assert_eq!(mime_type_for_path(Path::new("a.png")), "image/png");
        assert_eq!(mime_type_for_path(Path::new("noext")), "image/png");
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let payload = ImagePayload::new("image/png", "not base64!!");
        assert!(payload.decode().is_err());
    }

    #[tokio::test]
    async fn load_encodes_and_detects_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"fake jpeg bytes").unwrap();

        let payload = load_image_payload(&path).await.unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(payload.decode().unwrap(), b"fake jpeg bytes");
    }

    #[tokio::test]
    async fn load_rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        let bytes = vec![0u8; (MAX_UPLOAD_BYTES + 1) as usize];
        std::fs::write(&path, &bytes).unwrap();

        let err = load_image_payload(&path).await.unwrap_err();
        assert!(matches!(err, StudioError::FileTooLarge { .. }));
    }
}
