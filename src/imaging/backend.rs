//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait splits the encoder into its two suspension
//! points: decoding source bytes into pixels, and encoding one derivative
//! from an already-decoded image. The split matters for the pipeline's
//! sharing contract — a source is decoded exactly once and the resulting
//! [`DynamicImage`] is borrowed read-only by every variant task derived
//! from it.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend) — pure Rust, everything
//! statically linked into the binary.

use super::params::EncodeParams;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Trait for image processing backends.
///
/// `Sync` because a single backend instance is shared across the rayon pool.
pub trait ImageBackend: Sync {
    /// Decode raw source bytes into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError>;

    /// Produce one derivative file from a decoded image.
    ///
    /// Writes exactly one file at `params.output`; parent directories must
    /// already exist.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{FitMode, OutputFormat, Quality};
    use std::sync::Mutex;

    /// Mock backend that records operations without touching pixels.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// `decode` parses the source bytes as an ASCII `WxH` pair — tests write
    /// `b"4000x3000"` as a source file and get a 4000×3000 image back. This
    /// keeps scripted dimensions deterministic even when sources decode
    /// concurrently in arbitrary order. Anything unparseable is a decode
    /// failure.
    #[derive(Default)]
    pub struct MockBackend {
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Encodes whose output path contains this substring fail.
        pub fail_outputs_containing: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode {
            width: u32,
            height: u32,
        },
        Encode {
            output: String,
            fit: FitMode,
            format: OutputFormat,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_outputs(pattern: &str) -> Self {
            Self {
                operations: Mutex::new(Vec::new()),
                fail_outputs_containing: Some(pattern.to_string()),
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Encode a `WxH` pair as mock source bytes.
        pub fn source_bytes(width: u32, height: u32) -> Vec<u8> {
            format!("{width}x{height}").into_bytes()
        }
    }

    fn parse_dims(bytes: &[u8]) -> Option<(u32, u32)> {
        let text = std::str::from_utf8(bytes).ok()?;
        let (w, h) = text.trim().split_once('x')?;
        Some((w.parse().ok()?, h.parse().ok()?))
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, BackendError> {
            let (width, height) = parse_dims(bytes)
                .ok_or_else(|| BackendError::Decode("not a mock image".to_string()))?;
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode { width, height });
            Ok(DynamicImage::new_rgb8(width, height))
        }

        fn encode(&self, _image: &DynamicImage, params: &EncodeParams) -> Result<(), BackendError> {
            let output = params.output.to_string_lossy().to_string();
            if let Some(pattern) = &self.fail_outputs_containing {
                if output.contains(pattern.as_str()) {
                    return Err(BackendError::Encode(format!("mock failure for {output}")));
                }
            }
            self.operations.lock().unwrap().push(RecordedOp::Encode {
                output,
                fit: params.fit,
                format: params.format,
                quality: params.quality.value(),
            });
            Ok(())
        }
    }

    #[test]
    fn mock_decodes_scripted_dimensions() {
        let backend = MockBackend::new();
        let img = backend.decode(&MockBackend::source_bytes(800, 600)).unwrap();
        assert_eq!((img.width(), img.height()), (800, 600));

        let ops = backend.get_operations();
        assert_eq!(
            ops,
            vec![RecordedOp::Decode {
                width: 800,
                height: 600
            }]
        );
    }

    #[test]
    fn mock_rejects_garbage_bytes() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(b"not an image"),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn mock_records_encode() {
        let backend = MockBackend::new();
        let img = DynamicImage::new_rgb8(10, 10);
        backend
            .encode(
                &img,
                &EncodeParams {
                    output: "/out/600x400-a.webp".into(),
                    fit: FitMode::Cover {
                        width: 600,
                        height: 400,
                    },
                    format: OutputFormat::Webp,
                    quality: Quality::new(90),
                },
            )
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Encode {
                output,
                quality: 90,
                ..
            } if output.ends_with("600x400-a.webp")
        ));
    }

    #[test]
    fn mock_fails_matching_outputs() {
        let backend = MockBackend::failing_outputs("600x400");
        let img = DynamicImage::new_rgb8(10, 10);
        let result = backend.encode(
            &img,
            &EncodeParams {
                output: "/out/600x400-a.webp".into(),
                fit: FitMode::Original,
                format: OutputFormat::Webp,
                quality: Quality::default(),
            },
        );
        assert!(matches!(result, Err(BackendError::Encode(_))));
        assert!(backend.get_operations().is_empty());
    }
}
