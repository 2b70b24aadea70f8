//! Hero and ability catalog loaders.

use pack_core::{AbilityDef, DomainRecord, HeroDef};
use serde::Deserialize;

use crate::loaders::LoadResult;

#[derive(Debug, Deserialize)]
struct HeroCatalog {
    heroes: Vec<HeroDef>,
}

/// Loader for playable heroes.
pub struct HeroLoader;

impl HeroLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: HeroCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse hero catalog: {}", e))?;
        for hero in &catalog.heroes {
            if hero.stats.health == 0 {
                anyhow::bail!("hero '{}' has zero health", hero.id);
            }
        }
        Ok(catalog.heroes.into_iter().map(DomainRecord::Hero).collect())
    }
}

#[derive(Debug, Deserialize)]
struct AbilityCatalog {
    abilities: Vec<AbilityDef>,
}

/// Loader for activated abilities.
pub struct AbilityLoader;

impl AbilityLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: AbilityCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog: {}", e))?;
        Ok(catalog
            .abilities
            .into_iter()
            .map(DomainRecord::Ability)
            .collect())
    }
}
