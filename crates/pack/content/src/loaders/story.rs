//! Narrative event and quest loaders.

use pack_core::{DomainRecord, EventDef, QuestDef};
use serde::Deserialize;

use crate::loaders::LoadResult;

#[derive(Debug, Deserialize)]
struct EventCatalog {
    events: Vec<EventDef>,
}

/// Loader for narrative events.
pub struct EventLoader;

impl EventLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: EventCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse event catalog: {}", e))?;
        for event in &catalog.events {
            if event.weight == 0 {
                anyhow::bail!("event '{}' has zero draw weight", event.id);
            }
        }
        Ok(catalog.events.into_iter().map(DomainRecord::Event).collect())
    }
}

#[derive(Debug, Deserialize)]
struct QuestCatalog {
    quests: Vec<QuestDef>,
}

/// Loader for quest lines.
///
/// A quest with no stages can never progress, so empty stage lists are
/// rejected here rather than surfacing as stuck quests at runtime.
pub struct QuestLoader;

impl QuestLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: QuestCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse quest catalog: {}", e))?;
        for quest in &catalog.quests {
            if quest.stages.is_empty() {
                anyhow::bail!("quest '{}' has no stages", quest.id);
            }
        }
        Ok(catalog.quests.into_iter().map(DomainRecord::Quest).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_with_choices() {
        let json = br#"{"events": [
            {"id": "event-ambush", "title": "event.ambush.title", "text": "event.ambush.text",
             "region_id": "region-mire", "weight": 3,
             "choices": [{"label": "event.ambush.fight"},
                         {"label": "event.ambush.flee", "next_event_id": "event-lost"}]}
        ]}"#;

        let records = EventLoader::parse(json).unwrap();
        let DomainRecord::Event(event) = &records[0] else {
            panic!("expected event record");
        };
        assert_eq!(event.choices.len(), 2);
        assert_eq!(event.choices[1].next_event_id.as_deref(), Some("event-lost"));
    }

    #[test]
    fn zero_weight_event_is_rejected() {
        let json = br#"{"events": [
            {"id": "event-x", "title": "t", "text": "x", "weight": 0}
        ]}"#;
        assert!(EventLoader::parse(json).is_err());
    }

    #[test]
    fn stageless_quest_is_rejected() {
        let json = br#"{"quests": [
            {"id": "quest-x", "title": "t", "entry_region_id": "region-mire", "stages": []}
        ]}"#;
        assert!(QuestLoader::parse(json).is_err());
    }
}
