//! Card catalog loader.

use pack_core::{CardDef, DomainRecord};
use serde::Deserialize;

use crate::loaders::LoadResult;

/// Card catalog structure for JSON files.
#[derive(Debug, Deserialize)]
struct CardCatalog {
    cards: Vec<CardDef>,
}

/// Loader for the card catalog.
pub struct CardLoader;

impl CardLoader {
    pub fn parse(bytes: &[u8]) -> LoadResult<Vec<DomainRecord>> {
        let catalog: CardCatalog = serde_json::from_slice(bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog: {}", e))?;
        Ok(catalog.cards.into_iter().map(DomainRecord::Card).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pack_core::{CardKind, CardRarity};

    #[test]
    fn parses_card_catalog() {
        let json = br#"{"cards": [
            {"id": "card-ember", "name": "card.ember.name", "kind": "attack",
             "cost": 2, "rarity": "rare", "ability_id": "ability-ember",
             "text": "card.ember.text"}
        ]}"#;

        let records = CardLoader::parse(json).unwrap();
        let DomainRecord::Card(card) = &records[0] else {
            panic!("expected card record");
        };
        assert_eq!(card.kind, CardKind::Attack);
        assert_eq!(card.rarity, CardRarity::Rare);
        assert_eq!(card.ability_id.as_deref(), Some("ability-ember"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let json = br#"{"cards": [
            {"id": "card-x", "name": "n", "kind": "sorcery", "cost": 1, "rarity": "common"}
        ]}"#;
        assert!(CardLoader::parse(json).is_err());
    }
}
