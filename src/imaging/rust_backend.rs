//! Pure Rust image processing backend — zero external dependencies.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image::load_from_memory` |
//! | Cover crop | `image::DynamicImage::resize_to_fill` (Lanczos3) |
//! | Encode → WebP (lossy) | `webp::Encoder` (libwebp) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//!
//! The `image` crate's own WebP encoder is lossless-only, so the labeled
//! quality goes through libwebp instead.
//!
//! Every output is encoded fully in memory, written to a temp file in the
//! destination directory, and atomically renamed into place — an abandoned
//! task never leaves a partial file at an output path.

use super::backend::{BackendError, ImageBackend};
use super::params::{EncodeParams, FitMode, OutputFormat};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};
use std::io::Write;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode to the requested format, fully in memory.
fn encode_bytes(img: &DynamicImage, params: &EncodeParams) -> Result<Vec<u8>, BackendError> {
    // Both encoders want plain RGB8; strips any alpha channel in passing.
    let rgb = img.to_rgb8();
    match params.format {
        OutputFormat::Webp => {
            let encoder = webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height());
            let encoded = encoder.encode(params.quality.value() as f32);
            Ok(encoded.to_vec())
        }
        OutputFormat::Jpeg => {
            let mut buf = Vec::new();
            let mut encoder =
                JpegEncoder::new_with_quality(&mut buf, params.quality.value() as u8);
            encoder
                .encode(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {e}")))?;
            Ok(buf)
        }
    }
}

/// Write bytes to `path` via a temp sibling plus atomic rename.
///
/// The temp file lives in the same directory as the target so the rename
/// never crosses a filesystem boundary. Parent directories are the layout's
/// responsibility; a missing parent is an error here.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), BackendError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).ok_or_else(|| {
        BackendError::Encode(format!("output path has no parent: {}", path.display()))
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path)
        .map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
        image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
        let bytes = match params.fit {
            FitMode::Cover { width, height } => {
                let cropped = image.resize_to_fill(width, height, FilterType::Lanczos3);
                encode_bytes(&cropped, params)?
            }
            FitMode::Original => encode_bytes(image, params)?,
        };
        write_atomic(&params.output, &bytes)
    }
}
