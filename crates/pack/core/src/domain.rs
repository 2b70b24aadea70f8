//! Content domain model: domain tags, per-domain definition records, and the
//! descriptors the registry stores.
//!
//! Each gameplay domain (regions, quests, cards, ...) contributes records as
//! an explicit tagged payload rather than a trait-object hierarchy. Consumers
//! dispatch on [`ContentDomain`] and match on [`DomainRecord`]; the registry
//! keys everything by `(domain, id)`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::manifest::LocalizedString;

/// Tag identifying a content domain.
///
/// The snake_case string form doubles as the manifest path key prefix
/// (`regions_path`, `cards_path`, ...) and the artifact section label.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ContentDomain {
    Regions,
    Anchors,
    Events,
    Quests,
    Heroes,
    Abilities,
    Cards,
    Enemies,
    Balance,
    Localization,
}

impl ContentDomain {
    /// All domains, in the order sections are laid out in compiled artifacts.
    pub const ALL: [ContentDomain; 10] = [
        ContentDomain::Regions,
        ContentDomain::Anchors,
        ContentDomain::Events,
        ContentDomain::Quests,
        ContentDomain::Heroes,
        ContentDomain::Abilities,
        ContentDomain::Cards,
        ContentDomain::Enemies,
        ContentDomain::Balance,
        ContentDomain::Localization,
    ];
}

/// A cross-domain reference embedded in a record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentRef {
    pub domain: ContentDomain,
    pub id: String,
}

impl ContentRef {
    pub fn new(domain: ContentDomain, id: impl Into<String>) -> Self {
        Self {
            domain,
            id: id.into(),
        }
    }
}

/// A traversable map region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDef {
    pub id: String,
    pub name: LocalizedString,
    #[serde(default)]
    pub description: LocalizedString,
    /// Region ids reachable from this one.
    #[serde(default)]
    pub neighbors: Vec<String>,
    /// Anchor ids placed inside this region.
    #[serde(default)]
    pub anchor_ids: Vec<String>,
}

/// Kind of location anchor inside a region.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum AnchorKind {
    Settlement,
    Dungeon,
    Landmark,
    Crossroads,
}

/// A named point of interest bound to a region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorDef {
    pub id: String,
    pub name: LocalizedString,
    pub region_id: String,
    pub kind: AnchorKind,
}

/// One selectable choice inside a narrative event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventChoice {
    pub label: LocalizedString,
    /// Follow-up event triggered by taking this choice.
    #[serde(default)]
    pub next_event_id: Option<String>,
}

/// A narrative event drawn during travel or exploration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDef {
    pub id: String,
    pub title: LocalizedString,
    pub text: LocalizedString,
    /// Restricts the event to a region when set.
    #[serde(default)]
    pub region_id: Option<String>,
    #[serde(default = "default_weight")]
    pub weight: u32,
    #[serde(default)]
    pub choices: Vec<EventChoice>,
}

fn default_weight() -> u32 {
    1
}

/// One objective step of a quest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestStage {
    pub id: String,
    pub objective: LocalizedString,
    /// Event fired when the stage completes.
    #[serde(default)]
    pub trigger_event_id: Option<String>,
}

/// A multi-stage quest line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: String,
    pub title: LocalizedString,
    pub entry_region_id: String,
    pub stages: Vec<QuestStage>,
    #[serde(default)]
    pub reward_card_ids: Vec<String>,
}

/// Base stat block for a hero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStats {
    pub health: u32,
    pub will: u32,
    pub courage: u32,
}

/// A playable hero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroDef {
    pub id: String,
    pub name: LocalizedString,
    pub archetype: String,
    pub stats: HeroStats,
    /// Card ids forming the hero's starting deck.
    #[serde(default)]
    pub starting_deck: Vec<String>,
    #[serde(default)]
    pub ability_ids: Vec<String>,
}

/// An activated ability referenced by heroes and cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDef {
    pub id: String,
    pub name: LocalizedString,
    pub cost: u32,
    pub effect: LocalizedString,
}

#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum CardKind {
    Attack,
    Skill,
    Resource,
    Curse,
    Blessing,
}

#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum CardRarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// A playable card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDef {
    pub id: String,
    pub name: LocalizedString,
    pub kind: CardKind,
    pub cost: u32,
    pub rarity: CardRarity,
    /// Ability granted or triggered by playing the card.
    #[serde(default)]
    pub ability_id: Option<String>,
    #[serde(default)]
    pub text: LocalizedString,
}

/// One attack in an enemy's rotation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyMove {
    pub name: LocalizedString,
    pub damage: u32,
}

/// An enemy encountered in events and quests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: LocalizedString,
    pub health: u32,
    pub moves: Vec<EnemyMove>,
    #[serde(default)]
    pub traits: Vec<String>,
}

/// A keyed table of tunable balance values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BalanceTable {
    pub id: String,
    pub entries: BTreeMap<String, f64>,
}

/// A localization key with its per-locale texts.
///
/// Texts are carried opaquely; locale resolution happens outside this core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationEntry {
    pub id: String,
    pub texts: BTreeMap<String, String>,
}

/// Tagged per-domain record payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DomainRecord {
    Region(RegionDef),
    Anchor(AnchorDef),
    Event(EventDef),
    Quest(QuestDef),
    Hero(HeroDef),
    Ability(AbilityDef),
    Card(CardDef),
    Enemy(EnemyDef),
    Balance(BalanceTable),
    Localization(LocalizationEntry),
}

impl DomainRecord {
    /// Domain this record belongs to.
    pub fn domain(&self) -> ContentDomain {
        match self {
            Self::Region(_) => ContentDomain::Regions,
            Self::Anchor(_) => ContentDomain::Anchors,
            Self::Event(_) => ContentDomain::Events,
            Self::Quest(_) => ContentDomain::Quests,
            Self::Hero(_) => ContentDomain::Heroes,
            Self::Ability(_) => ContentDomain::Abilities,
            Self::Card(_) => ContentDomain::Cards,
            Self::Enemy(_) => ContentDomain::Enemies,
            Self::Balance(_) => ContentDomain::Balance,
            Self::Localization(_) => ContentDomain::Localization,
        }
    }

    /// Stable id of the underlying definition.
    pub fn id(&self) -> &str {
        match self {
            Self::Region(def) => &def.id,
            Self::Anchor(def) => &def.id,
            Self::Event(def) => &def.id,
            Self::Quest(def) => &def.id,
            Self::Hero(def) => &def.id,
            Self::Ability(def) => &def.id,
            Self::Card(def) => &def.id,
            Self::Enemy(def) => &def.id,
            Self::Balance(def) => &def.id,
            Self::Localization(def) => &def.id,
        }
    }

    /// Every cross-domain reference embedded in this record.
    ///
    /// The registry walks these after the final merge; each one must resolve
    /// to an existing descriptor in the target domain.
    pub fn references(&self) -> Vec<ContentRef> {
        let mut refs = Vec::new();
        match self {
            Self::Region(def) => {
                refs.extend(
                    def.neighbors
                        .iter()
                        .map(|id| ContentRef::new(ContentDomain::Regions, id.clone())),
                );
                refs.extend(
                    def.anchor_ids
                        .iter()
                        .map(|id| ContentRef::new(ContentDomain::Anchors, id.clone())),
                );
            }
            Self::Anchor(def) => {
                refs.push(ContentRef::new(
                    ContentDomain::Regions,
                    def.region_id.clone(),
                ));
            }
            Self::Event(def) => {
                if let Some(region_id) = &def.region_id {
                    refs.push(ContentRef::new(ContentDomain::Regions, region_id.clone()));
                }
                for choice in &def.choices {
                    if let Some(next) = &choice.next_event_id {
                        refs.push(ContentRef::new(ContentDomain::Events, next.clone()));
                    }
                }
            }
            Self::Quest(def) => {
                refs.push(ContentRef::new(
                    ContentDomain::Regions,
                    def.entry_region_id.clone(),
                ));
                for stage in &def.stages {
                    if let Some(event_id) = &stage.trigger_event_id {
                        refs.push(ContentRef::new(ContentDomain::Events, event_id.clone()));
                    }
                }
                refs.extend(
                    def.reward_card_ids
                        .iter()
                        .map(|id| ContentRef::new(ContentDomain::Cards, id.clone())),
                );
            }
            Self::Hero(def) => {
                refs.extend(
                    def.starting_deck
                        .iter()
                        .map(|id| ContentRef::new(ContentDomain::Cards, id.clone())),
                );
                refs.extend(
                    def.ability_ids
                        .iter()
                        .map(|id| ContentRef::new(ContentDomain::Abilities, id.clone())),
                );
            }
            Self::Card(def) => {
                if let Some(ability_id) = &def.ability_id {
                    refs.push(ContentRef::new(
                        ContentDomain::Abilities,
                        ability_id.clone(),
                    ));
                }
            }
            Self::Ability(_) | Self::Enemy(_) | Self::Balance(_) | Self::Localization(_) => {}
        }
        refs
    }
}

/// One decoded record tagged with its owning pack.
///
/// Produced by the artifact reader, consumed by the registry. Immutable once
/// built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub domain: ContentDomain,
    pub id: String,
    pub pack_id: String,
    pub record: DomainRecord,
}

impl ContentDescriptor {
    /// Wraps a record with its owning pack id.
    pub fn from_record(pack_id: impl Into<String>, record: DomainRecord) -> Self {
        Self {
            domain: record.domain(),
            id: record.id().to_string(),
            pack_id: pack_id.into(),
            record,
        }
    }
}
