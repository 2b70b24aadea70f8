//! Error taxonomy for the pack loading pipeline.
//!
//! Every fatal error aborts the whole load session; there is no automatic
//! recovery (no auto-renamed ids, no silently skipped packs). Non-fatal
//! manifest findings are carried as [`ValidationIssue`]s instead of errors so
//! callers can surface them without aborting.

use thiserror::Error;

use crate::domain::ContentDomain;
use crate::registry::RegistryState;
use crate::version::{SemanticVersion, VersionRange};

/// Manifest discovery and parsing failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest not found: {path}")]
    MissingManifest { path: String },

    #[error("invalid manifest: {reason}")]
    InvalidManifest { reason: String },

    #[error("invalid pack id '{pack_id}'")]
    InvalidPackId { pack_id: String },
}

/// Engine-version and capability gating failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompatibilityError {
    #[error(
        "pack '{pack_id}' requires engine version {required}, host engine is {actual}"
    )]
    IncompatibleCoreVersion {
        pack_id: String,
        required: VersionRange,
        actual: SemanticVersion,
    },

    #[error("pack '{pack_id}' requires capability '{capability}' the host does not declare")]
    MissingCapability { pack_id: String, capability: String },
}

/// Dependency-graph resolution failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DependencyError {
    #[error("duplicate pack id '{pack_id}' in discovered set")]
    DuplicatePackId { pack_id: String },

    #[error("pack '{pack_id}' depends on '{dependency_id}', which was not discovered")]
    DependencyNotFound {
        pack_id: String,
        dependency_id: String,
    },

    #[error(
        "pack '{pack_id}' requires '{dependency_id}' {required}, found {actual}"
    )]
    DependencyVersionMismatch {
        pack_id: String,
        dependency_id: String,
        required: VersionRange,
        actual: SemanticVersion,
    },

    #[error("dependency cycle among packs: {}", .members.join(", "))]
    DependencyCycle { members: Vec<String> },
}

/// Compiled artifact integrity failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("checksum mismatch for '{path}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("corrupt artifact: {reason}")]
    CorruptArtifact { reason: String },
}

/// Registry merge and referential-integrity failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error(
        "duplicate content id '{id}' in domain '{domain}': defined by pack \
         '{first_owner}', redefined by pack '{second_owner}'"
    )]
    DuplicateContentId {
        domain: ContentDomain,
        id: String,
        first_owner: String,
        second_owner: String,
    },

    #[error(
        "{domain}/{id} references {referenced_domain}/{referenced_id}, which no pack defines"
    )]
    DanglingReference {
        domain: ContentDomain,
        id: String,
        referenced_domain: ContentDomain,
        referenced_id: String,
    },

    #[error(
        "pack '{pack_id}' entry point references {referenced_domain}/{referenced_id}, \
         which no pack defines"
    )]
    MissingEntryPoint {
        pack_id: String,
        referenced_domain: ContentDomain,
        referenced_id: String,
    },

    #[error("registry is {state}, merges are only accepted while building")]
    NotBuilding { state: RegistryState },
}

/// Resolution failures: dependency graph or compatibility gating.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),
}

/// Umbrella error for a load session. Names the failing family; each variant
/// carries the full context of the underlying failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PackLoadError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Compatibility(#[from] CompatibilityError),

    #[error(transparent)]
    Dependency(#[from] DependencyError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<ResolveError> for PackLoadError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Dependency(e) => Self::Dependency(e),
            ResolveError::Compatibility(e) => Self::Compatibility(e),
        }
    }
}

/// Severity of a non-aborting manifest finding.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IssueSeverity {
    /// Surfaced in the report, never aborts the load.
    Warning,
    /// Aborts the load once validation finishes.
    Error,
}

/// A structural finding from manifest validation.
///
/// Validation returns issues instead of aborting so the caller decides
/// severity handling and can aggregate findings across every pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    pub pack_id: String,
    pub severity: IssueSeverity,
    pub message: String,
}

impl ValidationIssue {
    pub fn warning(pack_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pack_id: pack_id.into(),
            severity: IssueSeverity::Warning,
            message: message.into(),
        }
    }

    pub fn error(pack_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pack_id: pack_id.into(),
            severity: IssueSeverity::Error,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == IssueSeverity::Error
    }
}
