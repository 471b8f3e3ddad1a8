use anyhow::{Context, Result};
use image::GenericImageView;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::core::ImagePayload;

/// A result image written to disk.
#[derive(Debug)]
pub struct SavedImage {
    pub path: PathBuf,
    pub dimensions: Option<(u32, u32)>,
}

fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

/// Decode a result payload and write it under `output_dir` with a
/// timestamped name like `generated-2k-20260829-141502.png`.
pub async fn save_payload(
    payload: &ImagePayload,
    output_dir: &Path,
    prefix: &str,
) -> Result<SavedImage> {
    fs::create_dir_all(output_dir)
        .await
        .context("Failed to create output directory")?;

    let bytes = payload.decode().context("Failed to decode image data")?;

    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let filename = format!(
        "{}-{}.{}",
        prefix,
        timestamp,
        extension_for_mime(&payload.mime_type)
    );
    let path = output_dir.join(filename);

    fs::write(&path, &bytes).await?;
    tracing::info!("Saved image to: {}", path.display());

    let dimensions = image::load_from_memory(&bytes)
        .ok()
        .map(|img| (img.width(), img.height()));

    Ok(SavedImage { path, dimensions })
}

/// Render a saved image inline in the terminal.
pub fn preview_terminal(path: &Path) {
    let conf = viuer::Config {
        width: Some(80),
        height: Some(30),
        absolute_offset: false,
        ..Default::default()
    };

    if let Err(e) = viuer::print_from_file(path, &conf) {
        tracing::debug!("Failed to display image in terminal: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

    #[test]
    fn extension_falls_back_to_png() {
        assert_eq!(extension_for_mime("image/jpeg"), "jpg");
        assert_eq!(extension_for_mime("image/webp"), "webp");
        assert_eq!(extension_for_mime("application/octet-stream"), "png");
    }

    #[tokio::test]
    async fn save_writes_decoded_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let payload = ImagePayload::new("image/png", BASE64.encode(b"not really a png"));

        let saved = save_payload(&payload, dir.path(), "edited").await.unwrap();

        assert!(saved.path.starts_with(dir.path()));
        assert_eq!(saved.path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(std::fs::read(&saved.path).unwrap(), b"not really a png");
        // Bytes are not a decodable image, so no dimensions
        assert!(saved.dimensions.is_none());
    }

    #[tokio::test]
    async fn save_rejects_invalid_base64() {
        let dir = tempfile::tempdir().unwrap();
        let payload = ImagePayload::new("image/png", "!!!!");

        assert!(save_payload(&payload, dir.path(), "generated").await.is_err());
    }
}
