//! Enemy catalog loader.

use pack_core::{DomainRecord, EnemyDef};
use serde::Deserialize;

use crate::loaders::LoadResult;

#[derive(Debug, Deserialize)]
struct EnemyCatalog {
    enemies: Vec<EnemyDef>,
}

/// Loader for the enemy catalog.
pub struct EnemyLoader;

impl EnemyLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: EnemyCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog: {}", e))?;
        for enemy in &catalog.enemies {
            if enemy.moves.is_empty() {
                anyhow::bail!("enemy '{}' has no moves", enemy.id);
            }
        }
        Ok(catalog.enemies.into_iter().map(DomainRecord::Enemy).collect())
    }
}
