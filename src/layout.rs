//! Output directory layout.
//!
//! Computes the destination roots for a run and owns every directory
//! creation. Creation goes through `fs::create_dir_all` exclusively:
//! create-if-absent, no error when the directory already exists, and safe
//! when several encode tasks race to create the same per-index subfolder.
//!
//! Roots are created eagerly by [`RunLayout::prepare`]; the multi-size
//! nested subfolders are created lazily, per source, just before that
//! source's variants are dispatched.

use crate::naming::{self, RootKind};
use crate::plan::Profile;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("cannot create output directory {}: {source}", path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The prepared output directory tree for one run.
#[derive(Debug, Clone)]
pub struct RunLayout {
    primary: PathBuf,
    reel: Option<PathBuf>,
}

fn create_dir(path: &Path) -> Result<(), LayoutError> {
    fs::create_dir_all(path).map_err(|source| LayoutError::Create {
        path: path.to_path_buf(),
        source,
    })
}

impl RunLayout {
    /// Compute and create the destination roots under `dest_base`.
    pub fn prepare(
        profile: Profile,
        dest_base: &Path,
        folder_name: &str,
    ) -> Result<Self, LayoutError> {
        let full_plus_reel = matches!(profile, Profile::FullPlusReel);
        let primary = dest_base.join(naming::primary_root_name(folder_name, full_plus_reel));
        create_dir(&primary)?;

        let reel = if full_plus_reel {
            let reel = dest_base.join(naming::reel_root_name(folder_name));
            create_dir(&reel)?;
            Some(reel)
        } else {
            None
        };

        Ok(Self { primary, reel })
    }

    /// Root directory for the given kind.
    ///
    /// # Panics
    /// Asking for the reel root of a multi-size layout is a programming
    /// error — the planner never emits reel variants for that profile.
    pub fn root(&self, kind: RootKind) -> &Path {
        match kind {
            RootKind::Primary => &self.primary,
            RootKind::Reel => self
                .reel
                .as_deref()
                .expect("reel root requested for a profile without one"),
        }
    }

    /// Ensure the per-index subfolder for a nested multi-size source exists
    /// and return it. Idempotent and safe under concurrent calls.
    pub fn ensure_source_dir(&self, index: usize) -> Result<PathBuf, LayoutError> {
        let dir = self.primary.join(format!("{}", index + 1));
        create_dir(&dir)?;
        Ok(dir)
    }

    /// All roots this layout created, primary first.
    pub fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.primary.clone()];
        roots.extend(self.reel.clone());
        roots
    }
}
