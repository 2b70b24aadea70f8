//! Pack-root discovery.
//!
//! A candidate is any child directory of the packs directory that carries the
//! canonical `manifest.json`. Enumeration is name-sorted so discovery order
//! never leaks platform directory-listing order into diagnostics.

use std::fs;
use std::path::{Path, PathBuf};

use pack_core::PackLoadError;
use pack_content::{ARTIFACT_FILE_NAME, MANIFEST_FILE_NAME};

/// One discovered pack root with its well-known file paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackCandidate {
    pub root: PathBuf,
    pub manifest_path: PathBuf,
    pub artifact_path: PathBuf,
}

impl PackCandidate {
    /// Builds a candidate from a pack root directory.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            manifest_path: root.join(MANIFEST_FILE_NAME),
            artifact_path: root.join(ARTIFACT_FILE_NAME),
            root,
        }
    }
}

/// Enumerates pack candidates under a packs directory, sorted by directory
/// name.
pub fn discover_packs(packs_dir: &Path) -> Result<Vec<PackCandidate>, PackLoadError> {
    let entries = fs::read_dir(packs_dir)
        .map_err(|e| PackLoadError::Io(format!("{}: {e}", packs_dir.display())))?;

    let mut roots = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PackLoadError::Io(format!("{}: {e}", packs_dir.display())))?;
        let path = entry.path();
        if path.is_dir() && path.join(MANIFEST_FILE_NAME).is_file() {
            roots.push(path);
        }
    }
    roots.sort();

    tracing::info!(
        candidates = roots.len(),
        "discovered pack roots under {}",
        packs_dir.display()
    );
    Ok(roots.into_iter().map(PackCandidate::from_root).collect())
}
