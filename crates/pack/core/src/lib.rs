//! Core types and algorithms for the content pack pipeline.
//!
//! `pack-core` defines the canonical value types (versions, manifests, domain
//! records) and the two pure algorithms every load session runs: dependency
//! resolution and the registry merge with referential-integrity enforcement.
//! It performs no I/O; the authoring compiler and the runtime loader build on
//! the types re-exported here.
pub mod domain;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod registry;
pub mod resolver;
pub mod version;

pub use domain::{
    AbilityDef, AnchorDef, AnchorKind, BalanceTable, CardDef, CardKind, CardRarity,
    ContentDescriptor, ContentDomain, ContentRef, DomainRecord, EnemyDef, EnemyMove, EventChoice,
    EventDef, HeroDef, HeroStats, LocalizationEntry, QuestDef, QuestStage, RegionDef,
};
pub use error::{
    CompatibilityError, DependencyError, IntegrityError, IssueSeverity, ManifestError,
    PackLoadError, RegistryError, ResolveError, ValidationIssue,
};
pub use hash::content_hash;
pub use manifest::{
    LocalizedString, PackDependency, PackManifest, PackType, is_valid_pack_id,
};
pub use registry::{ContentRegistry, RegistryState};
pub use resolver::{DependencyResolver, HostContext};
pub use version::{ParseVersionError, SemanticVersion, VersionRange};
