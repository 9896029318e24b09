//! Destination folder and derivative file naming.
//!
//! All output names are derived here so the rest of the pipeline never
//! formats a path by hand. Two families of names exist:
//!
//! - **Folder names**: the operator-supplied run name is slugified and, for
//!   the full+reel profile, suffixed with `-website` / `-reel` before
//!   slugification.
//! - **File names**: derivative files are named by their variant kind —
//!   labeled size (`2048x1365-dawn.webp`), per-index subfolder entry
//!   (`3/2048x1365.webp`), source stem (`dawn.webp`), or 1-based reel index
//!   (`3.jpg`).
//!
//! The labeled size in a file name is always the unswapped pair: a portrait
//! source cropped to 1365×2048 still lands in `2048x1365-*.webp`. The label
//! identifies the variant slot, not the pixel dimensions.

use crate::imaging::OutputFormat;
use crate::plan::VariantKind;
use std::path::PathBuf;

/// Which destination root a derivative file belongs under.
///
/// The multi-size profile only ever uses [`RootKind::Primary`]; the
/// full+reel profile writes full re-encodes under `Primary` (the "website"
/// folder) and reel thumbnails under `Reel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Primary,
    Reel,
}

/// Slugify an operator-supplied folder name.
///
/// Lowercases, maps a small set of accented characters to ASCII, turns
/// whitespace and punctuation runs into single dashes, and trims leading or
/// trailing dashes. `"Été à Paris"` becomes `"ete-a-paris"`.
pub fn slugify(name: &str) -> String {
    const ACCENTED: &str = "àáäâèéëêìíïîòóöôùúüûñç";
    const PLAIN: &str = "aaaaeeeeiiiioooouuuunc";

    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if c == '&' {
            slug.push_str("-and-");
        } else if let Some(pos) = ACCENTED.chars().position(|a| a == c) {
            slug.push(PLAIN.chars().nth(pos).unwrap_or('-'));
        } else {
            // Whitespace, separators, and anything non-ASCII collapse to a dash
            slug.push('-');
        }
    }

    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed.trim_matches('-').to_string()
}

/// Filename without its final extension. `"dawn.jpeg"` → `"dawn"`.
pub fn stem(filename: &str) -> String {
    std::path::Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

/// Destination root folder name for the primary output of a profile.
pub fn primary_root_name(name: &str, full_plus_reel: bool) -> String {
    if full_plus_reel {
        slugify(&format!("{name}-website"))
    } else {
        slugify(name)
    }
}

/// Destination root folder name for the reel output (full+reel profile only).
pub fn reel_root_name(name: &str) -> String {
    slugify(&format!("{name}-reel"))
}

/// Relative output path for one variant of one source, under its root.
///
/// `index` is the 0-based enumeration index of the source; file names use
/// the 1-based form. `nested` selects the per-index subfolder scheme for
/// sized variants.
pub fn variant_rel_path(
    kind: &VariantKind,
    format: OutputFormat,
    filename: &str,
    index: usize,
    nested: bool,
) -> PathBuf {
    let ext = format.extension();
    match kind {
        VariantKind::Sized(size) if nested => {
            PathBuf::from(format!("{}", index + 1)).join(format!("{size}.{ext}"))
        }
        VariantKind::Sized(size) => PathBuf::from(format!("{size}-{}.{ext}", stem(filename))),
        VariantKind::Full => PathBuf::from(format!("{}.{ext}", stem(filename))),
        VariantKind::Reel => PathBuf::from(format!("{}.{ext}", index + 1)),
    }
}

/// Root the variant belongs under.
pub fn variant_root(kind: &VariantKind) -> RootKind {
    match kind {
        VariantKind::Reel => RootKind::Reel,
        _ => RootKind::Primary,
    }
}
