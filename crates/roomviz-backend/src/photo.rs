// SPDX-FileCopyrightText: 2026 Roomviz Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Room photo preparation before upload.
//!
//! Photos larger than the configured byte budget or pixel bound are decoded,
//! downscaled to fit and re-encoded as JPEG. Anything that cannot be decoded
//! is sent as-is and left for the backend to judge.

use std::io::Cursor;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use roomviz_config::model::UploadConfig;
use roomviz_core::{PhotoUpload, RoomvizError};
use tracing::{debug, warn};

const FALLBACK_MIME: &str = "application/octet-stream";

/// Reads `path` and prepares it for `/uploadImage`.
pub async fn load_photo(
    path: &Path,
    product_category: &str,
    config: &UploadConfig,
) -> Result<PhotoUpload, RoomvizError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| RoomvizError::Photo {
        message: format!("failed to read {}: {e}", path.display()),
        source: Some(Box::new(e)),
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    let config = config.clone();
    let category = product_category.to_string();
    tokio::task::spawn_blocking(move || prepare_photo(bytes, &file_name, &category, &config))
        .await
        .map_err(|e| RoomvizError::Internal(format!("photo preparation task failed: {e}")))
}

/// Shrinks `bytes` when they exceed the upload bounds; otherwise passes them through.
pub fn prepare_photo(
    bytes: Vec<u8>,
    file_name: &str,
    product_category: &str,
    config: &UploadConfig,
) -> PhotoUpload {
    let format = image::guess_format(&bytes).ok();
    let mime_type = format
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string());
    let passthrough = |bytes: Vec<u8>, mime_type: String| PhotoUpload {
        file_name: file_name.to_string(),
        mime_type,
        bytes,
        product_category: product_category.to_string(),
    };

    let dimensions = ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .ok()
        .and_then(|r| r.into_dimensions().ok());
    let Some((width, height)) = dimensions else {
        warn!(file = file_name, "photo format not recognized, uploading unchanged");
        return passthrough(bytes, mime_type);
    };

    let too_large = bytes.len() as u64 > config.max_size_bytes;
    let too_wide = width.max(height) > config.max_dimension;
    if !too_large && !too_wide {
        return passthrough(bytes, mime_type);
    }

    match shrink(&bytes, format, config) {
        Ok(jpeg) => {
            debug!(
                file = file_name,
                before = bytes.len(),
                after = jpeg.len(),
                width,
                height,
                "photo compressed for upload"
            );
            PhotoUpload {
                file_name: jpeg_file_name(file_name),
                mime_type: ImageFormat::Jpeg.to_mime_type().to_string(),
                bytes: jpeg,
                product_category: product_category.to_string(),
            }
        }
        Err(e) => {
            warn!(file = file_name, error = %e, "photo compression failed, uploading unchanged");
            passthrough(bytes, mime_type)
        }
    }
}

fn shrink(
    bytes: &[u8],
    format: Option<ImageFormat>,
    config: &UploadConfig,
) -> Result<Vec<u8>, image::ImageError> {
    let decoded = match format {
        Some(f) => image::load_from_memory_with_format(bytes, f)?,
        None => image::load_from_memory(bytes)?,
    };
    let bound = config.max_dimension;
    let resized = if decoded.width().max(decoded.height()) > bound {
        decoded.resize(bound, bound, FilterType::Triangle)
    } else {
        decoded
    };

    let mut out = Vec::new();
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_with_encoder(JpegEncoder::new_with_quality(&mut out, config.jpeg_quality))?;
    Ok(out)
}

fn jpeg_file_name(original: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    format!("{stem}.jpg")
}
