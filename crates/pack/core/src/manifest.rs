//! Pack manifest model.
//!
//! A [`PackManifest`] is constructed once at discovery time by the manifest
//! parser and is immutable for the rest of the load session. Everything the
//! resolver needs (identity, version, compatibility bounds, dependencies,
//! capabilities) lives here; the per-domain content itself is compiled
//! separately.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ContentDomain;
use crate::version::{SemanticVersion, VersionRange};

/// Opaque localized text token.
///
/// Resolution to display text happens in the localization layer; this core
/// only carries the value through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(pub String);

impl LocalizedString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for LocalizedString {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for LocalizedString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Category of a content pack.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum PackType {
    /// Base content every other pack may build on.
    #[default]
    Core,
    /// A full campaign with its own entry points.
    Campaign,
    /// Additional content layered onto existing campaigns.
    Expansion,
    /// A standalone scenario.
    Scenario,
}

/// A dependency on another pack, with an inclusive version constraint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackDependency {
    pub pack_id: String,
    pub range: VersionRange,
}

impl PackDependency {
    pub fn new(pack_id: impl Into<String>, range: VersionRange) -> Self {
        Self {
            pack_id: pack_id.into(),
            range,
        }
    }
}

/// Parsed, validated-shape manifest of a single content pack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackManifest {
    /// Stable identity, unique across the discovered set.
    pub pack_id: String,
    pub name: LocalizedString,
    pub description: LocalizedString,
    pub version: SemanticVersion,
    pub pack_type: PackType,
    /// Lowest engine version this pack supports (inclusive).
    pub core_version_min: SemanticVersion,
    /// Highest engine version this pack supports (inclusive), if bounded.
    pub core_version_max: Option<SemanticVersion>,
    /// Declaration order is preserved; resolution order is computed from it.
    pub dependencies: Vec<PackDependency>,
    pub required_capabilities: BTreeSet<String>,
    pub entry_region_id: Option<String>,
    pub entry_quest_id: Option<String>,
    pub recommended_heroes: Vec<String>,
    pub author: String,
    pub license: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub supported_locales: Vec<String>,
    /// Relative content path -> expected SHA-256 of the source bytes.
    pub checksums: BTreeMap<String, String>,
    /// Relative source path per domain the pack contributes to.
    pub domain_paths: BTreeMap<ContentDomain, String>,
}

impl PackManifest {
    /// Engine-compatibility predicate. Both bounds inclusive.
    pub fn is_compatible_with_engine(&self, engine_version: SemanticVersion) -> bool {
        engine_version >= self.core_version_min
            && self
                .core_version_max
                .is_none_or(|max| engine_version <= max)
    }

    /// Compatibility bounds as a range, for error reporting.
    pub fn core_version_range(&self) -> VersionRange {
        VersionRange {
            min: self.core_version_min,
            max: self.core_version_max,
        }
    }

    /// Source path declared for a domain, if the pack contributes to it.
    pub fn domain_path(&self, domain: ContentDomain) -> Option<&str> {
        self.domain_paths.get(&domain).map(String::as_str)
    }

    /// Domains this pack contributes to, in artifact section order.
    pub fn populated_domains(&self) -> impl Iterator<Item = ContentDomain> + '_ {
        ContentDomain::ALL
            .into_iter()
            .filter(|domain| self.domain_paths.contains_key(domain))
    }
}

/// Checks the `^[a-z0-9][a-z0-9-]*[a-z0-9]$` pack id shape.
pub fn is_valid_pack_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    let edge = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    edge(bytes[0])
        && edge(bytes[bytes.len() - 1])
        && bytes[1..bytes.len() - 1]
            .iter()
            .all(|&b| edge(b) || b == b'-')
}
