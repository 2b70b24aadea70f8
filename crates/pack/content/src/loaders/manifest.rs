//! Manifest document parser and validator.
//!
//! The wire document (`manifest.json`) is decoded into a raw serde structure
//! first and converted into the typed [`PackManifest`] second, so a parse
//! failure always surfaces as one `InvalidManifest` with the serde reason
//! rather than a half-built manifest.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use pack_core::{
    ContentDomain, LocalizedString, ManifestError, PackDependency, PackManifest, PackType,
    SemanticVersion, ValidationIssue, VersionRange, is_valid_pack_id,
};

/// Canonical manifest filename inside a pack root.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Wire shape of `manifest.json`.
#[derive(Debug, Deserialize)]
struct ManifestDoc {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    version: SemanticVersion,
    #[serde(rename = "type")]
    pack_type: PackType,
    core_version_min: SemanticVersion,
    #[serde(default)]
    core_version_max: Option<SemanticVersion>,
    #[serde(default)]
    dependencies: Vec<DependencyDoc>,
    #[serde(default)]
    required_capabilities: Vec<String>,
    #[serde(default)]
    entry_region: Option<String>,
    #[serde(default)]
    entry_quest: Option<String>,
    #[serde(default)]
    recommended_heroes: Vec<String>,
    #[serde(default)]
    author: String,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    locales: Vec<String>,
    #[serde(default)]
    checksums: BTreeMap<String, String>,
    #[serde(default)]
    regions_path: Option<String>,
    #[serde(default)]
    anchors_path: Option<String>,
    #[serde(default)]
    events_path: Option<String>,
    #[serde(default)]
    quests_path: Option<String>,
    #[serde(default)]
    heroes_path: Option<String>,
    #[serde(default)]
    abilities_path: Option<String>,
    #[serde(default)]
    cards_path: Option<String>,
    #[serde(default)]
    enemies_path: Option<String>,
    #[serde(default)]
    balance_path: Option<String>,
    #[serde(default)]
    localization_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DependencyDoc {
    id: String,
    min_version: SemanticVersion,
    #[serde(default)]
    max_version: Option<SemanticVersion>,
}

/// Decodes and validates pack manifests.
pub struct ManifestParser;

impl ManifestParser {
    /// Decodes a manifest document.
    ///
    /// Accepts `release_date` in either `YYYY-MM-DD` or full ISO-8601 form.
    pub fn parse(bytes: &[u8]) -> Result<PackManifest, ManifestError> {
        let doc: ManifestDoc =
            serde_json::from_slice(bytes).map_err(|e| ManifestError::InvalidManifest {
                reason: e.to_string(),
            })?;

        let release_date = doc
            .release_date
            .as_deref()
            .map(parse_release_date)
            .transpose()?;

        let mut domain_paths = BTreeMap::new();
        let paths = [
            (ContentDomain::Regions, doc.regions_path),
            (ContentDomain::Anchors, doc.anchors_path),
            (ContentDomain::Events, doc.events_path),
            (ContentDomain::Quests, doc.quests_path),
            (ContentDomain::Heroes, doc.heroes_path),
            (ContentDomain::Abilities, doc.abilities_path),
            (ContentDomain::Cards, doc.cards_path),
            (ContentDomain::Enemies, doc.enemies_path),
            (ContentDomain::Balance, doc.balance_path),
            (ContentDomain::Localization, doc.localization_path),
        ];
        for (domain, path) in paths {
            if let Some(path) = path {
                domain_paths.insert(domain, path);
            }
        }

        Ok(PackManifest {
            pack_id: doc.id,
            name: LocalizedString(doc.name),
            description: LocalizedString(doc.description),
            version: doc.version,
            pack_type: doc.pack_type,
            core_version_min: doc.core_version_min,
            core_version_max: doc.core_version_max,
            dependencies: doc
                .dependencies
                .into_iter()
                .map(|dep| PackDependency {
                    pack_id: dep.id,
                    range: VersionRange {
                        min: dep.min_version,
                        max: dep.max_version,
                    },
                })
                .collect(),
            required_capabilities: BTreeSet::from_iter(doc.required_capabilities),
            entry_region_id: doc.entry_region,
            entry_quest_id: doc.entry_quest,
            recommended_heroes: doc.recommended_heroes,
            author: doc.author,
            license: doc.license,
            release_date,
            supported_locales: doc.locales,
            checksums: doc.checksums,
            domain_paths,
        })
    }

    /// Reads and decodes the canonical `manifest.json` of a pack root.
    pub fn parse_file(path: &Path) -> Result<PackManifest, ManifestError> {
        let bytes = std::fs::read(path).map_err(|_| ManifestError::MissingManifest {
            path: path.display().to_string(),
        })?;
        tracing::debug!("Parsing manifest: {}", path.display());
        Self::parse(&bytes)
    }

    /// Structural validation. Non-throwing: returns every finding so the
    /// caller decides severity handling.
    pub fn validate(manifest: &PackManifest) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let pack_id = manifest.pack_id.as_str();

        if pack_id.is_empty() {
            issues.push(ValidationIssue::error(pack_id, "pack id is empty"));
        } else if !is_valid_pack_id(pack_id) {
            issues.push(ValidationIssue::error(
                pack_id,
                format!("pack id '{pack_id}' must match lowercase-hyphen form"),
            ));
        }

        if manifest.name.is_empty() {
            issues.push(ValidationIssue::error(pack_id, "display name is empty"));
        }

        if manifest.supported_locales.is_empty() {
            issues.push(ValidationIssue::error(
                pack_id,
                "at least one supported locale is required",
            ));
        }

        if manifest.recommended_heroes.is_empty() {
            issues.push(ValidationIssue::warning(
                pack_id,
                "no recommended heroes listed",
            ));
        }

        if manifest.pack_type != PackType::Core && manifest.dependencies.is_empty() {
            issues.push(ValidationIssue::warning(
                pack_id,
                "non-core pack declares no dependencies",
            ));
        }

        issues
    }

    /// Pure engine-compatibility predicate. Both bounds inclusive.
    pub fn is_compatible_with_engine(
        manifest: &PackManifest,
        engine_version: SemanticVersion,
    ) -> bool {
        manifest.is_compatible_with_engine(engine_version)
    }
}

fn parse_release_date(raw: &str) -> Result<NaiveDate, ManifestError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| ManifestError::InvalidManifest {
            reason: format!("unparseable release date '{raw}'"),
        })
}
