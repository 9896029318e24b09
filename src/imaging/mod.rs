//! Image processing — pure Rust, zero external dependencies.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::load_from_memory` |
//! | **Cover crop** | `resize_to_fill` (Lanczos3) |
//! | **WebP encode** | `webp` (libwebp, lossy) |
//! | **JPEG encode** | `image::codecs::jpeg` |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing one encode operation
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use params::{EncodeParams, FitMode, OutputFormat, Quality};
pub use rust_backend::RustBackend;
