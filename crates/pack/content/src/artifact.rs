//! Section-framed compiled pack container.
//!
//! # File Format
//!
//! ```text
//! [magic b"CPAK"][u16 format version][u32 header length][bincode header]
//! [section 0 bytes][section 1 bytes]...
//! ```
//!
//! The header carries the pack's manifest and a section table: one entry per
//! populated domain with its payload offset, length, and SHA-256. Offsets are
//! relative to the end of the header, so a section's integrity can be checked
//! by slicing and hashing without decoding anything else in the file.
//!
//! Section bytes are the bincode encoding of that domain's `Vec<DomainRecord>`.

use serde::{Deserialize, Serialize};

use pack_core::{ContentDomain, DomainRecord, IntegrityError, PackManifest, content_hash};

/// Leading magic bytes of a compiled artifact.
pub const ARTIFACT_MAGIC: [u8; 4] = *b"CPAK";

/// Current artifact format version.
pub const ARTIFACT_FORMAT_VERSION: u16 = 1;

/// Canonical artifact filename inside a pack root.
pub const ARTIFACT_FILE_NAME: &str = "content.cpak";

/// Fixed-size prelude: magic + version + header length.
const PRELUDE_LEN: usize = 4 + 2 + 4;

/// One decoded domain section ready for encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionData {
    pub domain: ContentDomain,
    /// Relative source path the section was compiled from.
    pub source_path: String,
    pub records: Vec<DomainRecord>,
}

/// Section table entry in the artifact header.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionEntry {
    pub domain: ContentDomain,
    pub source_path: String,
    /// Byte offset of the section payload, relative to the end of the header.
    pub offset: u64,
    pub len: u64,
    /// Lowercase hex SHA-256 of the section payload bytes.
    pub checksum: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtifactHeader {
    pub pack_id: String,
    pub manifest: PackManifest,
    pub sections: Vec<SectionEntry>,
}

/// Encodes a compiled pack into the artifact byte layout.
pub fn encode_artifact(
    manifest: &PackManifest,
    sections: &[SectionData],
) -> Result<Vec<u8>, bincode::Error> {
    let mut payload = Vec::new();
    let mut entries = Vec::with_capacity(sections.len());

    for section in sections {
        let blob = bincode::serialize(&section.records)?;
        entries.push(SectionEntry {
            domain: section.domain,
            source_path: section.source_path.clone(),
            offset: payload.len() as u64,
            len: blob.len() as u64,
            checksum: content_hash(&blob),
        });
        payload.extend_from_slice(&blob);
    }

    let header = ArtifactHeader {
        pack_id: manifest.pack_id.clone(),
        manifest: manifest.clone(),
        sections: entries,
    };
    let header_bytes = bincode::serialize(&header)?;

    let mut out = Vec::with_capacity(PRELUDE_LEN + header_bytes.len() + payload.len());
    out.extend_from_slice(&ARTIFACT_MAGIC);
    out.extend_from_slice(&ARTIFACT_FORMAT_VERSION.to_le_bytes());
    out.extend_from_slice(&(header_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&header_bytes);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// A decoded artifact: verified framing, sections still raw.
///
/// Checksum verification and record decoding are separate steps on purpose;
/// the runtime reader verifies every section before decoding any of them.
#[derive(Debug)]
pub struct PackArtifact {
    header: ArtifactHeader,
    payload: Vec<u8>,
}

impl PackArtifact {
    /// Decodes the artifact framing. Section payloads are bounds-checked but
    /// not yet hashed or deserialized.
    pub fn decode(bytes: &[u8]) -> Result<Self, IntegrityError> {
        let corrupt = |reason: &str| IntegrityError::CorruptArtifact {
            reason: reason.to_string(),
        };

        if bytes.len() < PRELUDE_LEN {
            return Err(corrupt("file shorter than prelude"));
        }
        if bytes[..4] != ARTIFACT_MAGIC {
            return Err(corrupt("bad magic"));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != ARTIFACT_FORMAT_VERSION {
            return Err(IntegrityError::CorruptArtifact {
                reason: format!("unsupported format version {version}"),
            });
        }
        let header_len = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]) as usize;
        let payload_start = PRELUDE_LEN
            .checked_add(header_len)
            .ok_or_else(|| corrupt("header length overflow"))?;
        if bytes.len() < payload_start {
            return Err(corrupt("truncated header"));
        }

        let header: ArtifactHeader = bincode::deserialize(&bytes[PRELUDE_LEN..payload_start])
            .map_err(|e| IntegrityError::CorruptArtifact {
                reason: format!("undecodable header: {e}"),
            })?;
        let payload = bytes[payload_start..].to_vec();

        for entry in &header.sections {
            let end = entry
                .offset
                .checked_add(entry.len)
                .ok_or_else(|| corrupt("section bounds overflow"))?;
            if end > payload.len() as u64 {
                return Err(IntegrityError::CorruptArtifact {
                    reason: format!("section '{}' out of bounds", entry.source_path),
                });
            }
        }

        Ok(Self { header, payload })
    }

    pub fn header(&self) -> &ArtifactHeader {
        &self.header
    }

    pub fn manifest(&self) -> &PackManifest {
        &self.header.manifest
    }

    /// Raw payload bytes of one section. Bounds were checked at decode time.
    pub fn section_bytes(&self, entry: &SectionEntry) -> &[u8] {
        let start = entry.offset as usize;
        &self.payload[start..start + entry.len as usize]
    }

    /// Deserializes one section's records.
    pub fn decode_section(&self, entry: &SectionEntry) -> Result<Vec<DomainRecord>, IntegrityError> {
        bincode::deserialize(self.section_bytes(entry)).map_err(|e| {
            IntegrityError::CorruptArtifact {
                reason: format!("undecodable section '{}': {e}", entry.source_path),
            }
        })
    }
}
