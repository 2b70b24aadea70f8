//! Runtime binary pack reader.
//!
//! The reader is the trust boundary between the authoring pipeline and the
//! running game: framing is verified first, then every section's checksum,
//! and only then are records decoded. No record from a pack whose artifact
//! fails any check ever reaches the registry.

use std::fs;
use std::path::Path;

use pack_core::{ContentDescriptor, IntegrityError, PackLoadError, content_hash};
use pack_content::PackArtifact;

/// Reads one compiled pack artifact into descriptors.
pub struct BinaryPackReader;

impl BinaryPackReader {
    /// Reads and verifies the artifact at `path`.
    pub fn read(path: &Path) -> Result<Vec<ContentDescriptor>, PackLoadError> {
        let bytes =
            fs::read(path).map_err(|e| PackLoadError::Io(format!("{}: {e}", path.display())))?;
        tracing::debug!("Reading artifact: {}", path.display());
        Self::read_bytes(&bytes)
    }

    /// Verifies framing and checksums, then decodes every section.
    pub fn read_bytes(bytes: &[u8]) -> Result<Vec<ContentDescriptor>, PackLoadError> {
        let artifact = PackArtifact::decode(bytes)?;
        let pack_id = artifact.header().pack_id.clone();

        // Integrity gate first: no section decodes until every section hashes
        // clean.
        for entry in &artifact.header().sections {
            let actual = content_hash(artifact.section_bytes(entry));
            if actual != entry.checksum {
                return Err(IntegrityError::ChecksumMismatch {
                    path: entry.source_path.clone(),
                    expected: entry.checksum.clone(),
                    actual,
                }
                .into());
            }
        }

        let mut descriptors = Vec::new();
        for entry in &artifact.header().sections {
            let records = artifact.decode_section(entry)?;
            descriptors.extend(
                records
                    .into_iter()
                    .map(|record| ContentDescriptor::from_record(pack_id.clone(), record)),
            );
        }

        tracing::debug!(
            pack_id,
            descriptors = descriptors.len(),
            "decoded pack artifact"
        );
        Ok(descriptors)
    }
}
