//! Orientation classification and variant planning.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! A run produces derivatives according to one of two profiles:
//!
//! - **Multi-size**: four fixed target sizes per source, WebP quality 90.
//!   Portrait sources get the swapped crop box (a labeled 2048×1365 slot is
//!   cropped to 1365×2048) so the crop follows the long axis of the photo;
//!   the label in the file name stays unswapped.
//! - **Full+reel**: one full-resolution WebP re-encode plus one 1080×1920
//!   cover-cropped JPEG reel thumbnail, per source. The reel box is the same
//!   for every orientation.
//!
//! Square sources are planned exactly like landscape ones: the fixed sizes
//! are used unswapped. Equal edges give neither axis priority, so the
//! unswapped list is the deterministic choice.

use crate::imaging::{FitMode, OutputFormat, Quality};
use serde::Serialize;
use std::fmt;

/// Trinary orientation of a decoded source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        };
        f.write_str(s)
    }
}

/// Classify an image by its decoded pixel dimensions.
pub fn classify(width: u32, height: u32) -> Orientation {
    if width > height {
        Orientation::Landscape
    } else if height > width {
        Orientation::Portrait
    } else {
        Orientation::Square
    }
}

/// Which derivative sets a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Four fixed sizes per source. `nested` writes each source's files
    /// into a per-index subfolder instead of label-prefixed flat names.
    MultiSize { nested: bool },
    /// Full-resolution re-encode into a website folder plus a reel
    /// thumbnail into a separate folder.
    FullPlusReel,
}

impl Profile {
    /// Whether sized variants use the per-index subfolder scheme.
    pub fn nested(self) -> bool {
        matches!(self, Profile::MultiSize { nested: true })
    }
}

/// A fixed labeled size pair, as it appears in output file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The four fixed multi-size targets, largest first.
pub const FIXED_SIZES: [TargetSize; 4] = [
    TargetSize {
        width: 2048,
        height: 1365,
    },
    TargetSize {
        width: 1024,
        height: 683,
    },
    TargetSize {
        width: 768,
        height: 512,
    },
    TargetSize {
        width: 600,
        height: 400,
    },
];

/// How one variant's output file is named (see [`crate::naming`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// Labeled fixed size: `2048x1365-stem.webp` or `index/2048x1365.webp`.
    Sized(TargetSize),
    /// Source stem: `stem.webp`.
    Full,
    /// 1-based source index: `3.jpg`.
    Reel,
}

/// One target derivative to produce from a source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeVariant {
    pub kind: VariantKind,
    pub fit: FitMode,
    pub format: OutputFormat,
    pub quality: Quality,
}

impl SizeVariant {
    /// Short label used in progress output and error records.
    pub fn label(&self) -> String {
        match self.kind {
            VariantKind::Sized(size) => size.to_string(),
            VariantKind::Full => "full".to_string(),
            VariantKind::Reel => "reel".to_string(),
        }
    }
}

/// Reel thumbnails are always this box, regardless of source orientation.
const REEL_BOX: (u32, u32) = (1080, 1920);

/// Plan the ordered variant set for one source.
pub fn plan_variants(profile: Profile, orientation: Orientation) -> Vec<SizeVariant> {
    match profile {
        Profile::MultiSize { .. } => FIXED_SIZES
            .iter()
            .map(|&size| {
                let (w, h) = match orientation {
                    Orientation::Portrait => (size.height, size.width),
                    Orientation::Landscape | Orientation::Square => (size.width, size.height),
                };
                SizeVariant {
                    kind: VariantKind::Sized(size),
                    fit: FitMode::Cover {
                        width: w,
                        height: h,
                    },
                    format: OutputFormat::Webp,
                    quality: Quality::new(90),
                }
            })
            .collect(),
        Profile::FullPlusReel => vec![
            SizeVariant {
                kind: VariantKind::Full,
                fit: FitMode::Original,
                format: OutputFormat::Webp,
                quality: Quality::new(90),
            },
            SizeVariant {
                kind: VariantKind::Reel,
                fit: FitMode::Cover {
                    width: REEL_BOX.0,
                    height: REEL_BOX.1,
                },
                format: OutputFormat::Jpeg,
                quality: Quality::new(90),
            },
        ],
    }
}
