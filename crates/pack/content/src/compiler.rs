//! Authoring-time content compiler.
//!
//! Turns a pack's JSON sources into one compiled artifact. The heavy
//! validation (shape checks, in-file id uniqueness, source checksums) runs
//! here, once, at build time; the runtime reader stays a minimal fail-fast
//! binary consumer. Cross-pack and cross-domain reference checks are left to
//! the registry, which sees the full resolved set.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use pack_core::{ContentDomain, IntegrityError, PackManifest, content_hash};

use crate::artifact::{ARTIFACT_FILE_NAME, SectionData, encode_artifact};
use crate::loaders::parse_domain;

/// Errors raised while compiling a pack.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("failed to compile domain '{domain}': {reason}")]
    Domain {
        domain: ContentDomain,
        reason: String,
    },

    /// Source bytes did not match the checksum declared in the manifest.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("artifact encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully compiled pack, ready for artifact encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledPack {
    pub manifest: PackManifest,
    pub sections: Vec<SectionData>,
}

/// Compiles one pack root's JSON sources into a binary artifact.
///
/// # Directory Structure
///
/// ```text
/// pack_root/
/// ├── manifest.json
/// ├── regions.json
/// ├── cards.json
/// └── ...            (one file per domain path the manifest declares)
/// ```
pub struct ContentCompiler {
    pack_root: PathBuf,
}

impl ContentCompiler {
    /// Creates a compiler rooted at a pack directory.
    pub fn new(pack_root: impl Into<PathBuf>) -> Self {
        Self {
            pack_root: pack_root.into(),
        }
    }

    /// Returns the pack root path.
    pub fn pack_root(&self) -> &Path {
        &self.pack_root
    }

    /// Compiles every domain the manifest declares.
    ///
    /// If the manifest carries a checksum for a source path, the raw source
    /// bytes are verified against it before parsing.
    pub fn compile(&self, manifest: &PackManifest) -> Result<CompiledPack, CompileError> {
        let mut sections = Vec::new();

        // The map is keyed by domain, so sections come out in canonical
        // domain order.
        for (&domain, rel_path) in &manifest.domain_paths {
            let path = self.pack_root.join(rel_path);
            let bytes = fs::read(&path)?;

            if let Some(expected) = manifest.checksums.get(rel_path) {
                let actual = content_hash(&bytes);
                if &actual != expected {
                    return Err(IntegrityError::ChecksumMismatch {
                        path: rel_path.to_string(),
                        expected: expected.clone(),
                        actual,
                    }
                    .into());
                }
            }

            let records = parse_domain(domain, &bytes).map_err(|e| CompileError::Domain {
                domain,
                reason: format!("{e:#}"),
            })?;
            tracing::debug!(%domain, records = records.len(), "compiled domain section");

            sections.push(SectionData {
                domain,
                source_path: rel_path.to_string(),
                records,
            });
        }

        Ok(CompiledPack {
            manifest: manifest.clone(),
            sections,
        })
    }

    /// Encodes a compiled pack and writes it atomically.
    pub fn write_artifact(&self, compiled: &CompiledPack, path: &Path) -> Result<(), CompileError> {
        let bytes = encode_artifact(&compiled.manifest, &compiled.sections)
            .map_err(|e| CompileError::Encode(e.to_string()))?;

        let temp_path = path.with_extension("cpak.tmp");
        fs::write(&temp_path, &bytes)?;
        fs::rename(&temp_path, path)?;

        tracing::debug!(
            "Saved artifact for '{}' to {}",
            compiled.manifest.pack_id,
            path.display()
        );
        Ok(())
    }

    /// Compiles and writes the canonical `content.cpak` in the pack root.
    pub fn compile_to_artifact(&self, manifest: &PackManifest) -> Result<PathBuf, CompileError> {
        let compiled = self.compile(manifest)?;
        let path = self.pack_root.join(ARTIFACT_FILE_NAME);
        self.write_artifact(&compiled, &path)?;
        Ok(path)
    }
}
