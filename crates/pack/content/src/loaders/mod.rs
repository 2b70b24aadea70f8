//! Loaders for reading pack data from JSON source files.
//!
//! Each loader converts one domain's JSON catalog into [`DomainRecord`]s and
//! runs domain-local structural checks: field presence and shape via serde,
//! plus unique-within-file id enforcement. Cross-pack and cross-domain
//! reference checks are deferred to the content registry, which sees the
//! full resolved set.

pub mod cards;
pub mod enemies;
pub mod heroes;
pub mod manifest;
pub mod story;
pub mod tables;
pub mod world;

pub use cards::CardLoader;
pub use enemies::EnemyLoader;
pub use heroes::{AbilityLoader, HeroLoader};
pub use manifest::ManifestParser;
pub use story::{EventLoader, QuestLoader};
pub use tables::{BalanceLoader, LocalizationLoader};
pub use world::{AnchorLoader, RegionLoader};

use std::collections::BTreeSet;

use pack_core::{ContentDomain, DomainRecord};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Parses one domain's JSON source bytes into records.
pub fn parse_domain(domain: ContentDomain, bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
    let records = match domain {
        ContentDomain::Regions => RegionLoader::parse(bytes)?,
        ContentDomain::Anchors => AnchorLoader::parse(bytes)?,
        ContentDomain::Events => EventLoader::parse(bytes)?,
        ContentDomain::Quests => QuestLoader::parse(bytes)?,
        ContentDomain::Heroes => HeroLoader::parse(bytes)?,
        ContentDomain::Abilities => AbilityLoader::parse(bytes)?,
        ContentDomain::Cards => CardLoader::parse(bytes)?,
        ContentDomain::Enemies => EnemyLoader::parse(bytes)?,
        ContentDomain::Balance => BalanceLoader::parse(bytes)?,
        ContentDomain::Localization => LocalizationLoader::parse(bytes)?,
    };
    check_ids(domain, &records)?;
    Ok(records)
}

/// Ids must be non-empty and unique within a single source file.
fn check_ids(domain: ContentDomain, records: &[DomainRecord]) -> LoadResult<()> {
    let mut seen = BTreeSet::new();
    for record in records {
        let id = record.id();
        if id.is_empty() {
            anyhow::bail!("{domain} record with empty id");
        }
        if !seen.insert(id) {
            anyhow::bail!("duplicate {domain} id '{id}' in source file");
        }
    }
    Ok(())
}
