//! Region and anchor catalog loaders.

use pack_core::{AnchorDef, DomainRecord, RegionDef};
use serde::Deserialize;

use crate::loaders::LoadResult;

/// Region catalog structure for JSON files.
#[derive(Debug, Deserialize)]
struct RegionCatalog {
    regions: Vec<RegionDef>,
}

/// Loader for the region catalog.
pub struct RegionLoader;

impl RegionLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: RegionCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse region catalog: {}", e))?;
        Ok(catalog.regions.into_iter().map(DomainRecord::Region).collect())
    }
}

/// Anchor catalog structure for JSON files.
#[derive(Debug, Deserialize)]
struct AnchorCatalog {
    anchors: Vec<AnchorDef>,
}

/// Loader for region anchors.
pub struct AnchorLoader;

impl AnchorLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: AnchorCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse anchor catalog: {}", e))?;
        Ok(catalog.anchors.into_iter().map(DomainRecord::Anchor).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_region_catalog() {
        let json = br#"{"regions": [
            {"id": "region-mire", "name": "region.mire.name",
             "neighbors": ["region-harbor"], "anchor_ids": ["anchor-old-mill"]}
        ]}"#;

        let records = RegionLoader::parse(json).unwrap();
        assert_eq!(records.len(), 1);
        let DomainRecord::Region(region) = &records[0] else {
            panic!("expected region record");
        };
        assert_eq!(region.id, "region-mire");
        assert_eq!(region.neighbors, vec!["region-harbor"]);
    }

    #[test]
    fn anchor_requires_region_binding() {
        // region_id missing entirely
        let json = br#"{"anchors": [{"id": "anchor-x", "name": "anchor.x", "kind": "dungeon"}]}"#;
        assert!(AnchorLoader::parse(json).is_err());
    }
}
