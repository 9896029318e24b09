//! Source directory enumeration and file reads.
//!
//! The catalog is deliberately dumb: it lists one directory (non-recursive,
//! no extension filtering) and reads every entry's bytes up front. Whether
//! the bytes are actually a decodable image is the pipeline's concern — an
//! operator pointing the tool at a folder of text files finds out per file,
//! in the summary, not here.
//!
//! The fetch is all-or-nothing: a listing failure or any single read failure
//! rejects the whole catalog. Per-source partial failure starts at the
//! decode stage, after the catalog has been fully read.
//!
//! Entries are sorted by file name so source indices (which name reel files
//! and nested subfolders) are stable across runs.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("cannot list source directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot read source file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One directory entry, read in full.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// List `dir` and read every entry's bytes, ordered by file name.
pub fn read_sources(dir: &Path) -> Result<Vec<SourceEntry>, CatalogError> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::DirectoryAccess {
            path: dir.to_path_buf(),
            source,
        })?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    log::debug!("catalog: {} entries in {}", names.len(), dir.display());

    let mut sources = Vec::with_capacity(names.len());
    for filename in names {
        let path = dir.join(&filename);
        let bytes = fs::read(&path).map_err(|source| CatalogError::FileRead { path, source })?;
        sources.push(SourceEntry { filename, bytes });
    }
    Ok(sources)
}
