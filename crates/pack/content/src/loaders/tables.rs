//! Balance table and localization loaders.

use pack_core::{BalanceTable, DomainRecord, LocalizationEntry};
use serde::Deserialize;

use crate::loaders::LoadResult;

#[derive(Debug, Deserialize)]
struct BalanceCatalog {
    tables: Vec<BalanceTable>,
}

/// Loader for tunable balance tables.
pub struct BalanceLoader;

impl BalanceLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: BalanceCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse balance tables: {}", e))?;
        Ok(catalog.tables.into_iter().map(DomainRecord::Balance).collect())
    }
}

#[derive(Debug, Deserialize)]
struct LocalizationCatalog {
    strings: Vec<LocalizationEntry>,
}

/// Loader for localization entries.
///
/// Texts are carried through opaquely; locale selection happens in the
/// localization layer outside this pipeline.
pub struct LocalizationLoader;

impl LocalizationLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: LocalizationCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse localization entries: {}", e))?;
        for entry in &catalog.strings {
            if entry.texts.is_empty() {
                anyhow::bail!("localization key '{}' has no texts", entry.id);
            }
        }
        Ok(catalog
            .strings
            .into_iter()
            .map(DomainRecord::Localization)
            .collect())
    }
}
