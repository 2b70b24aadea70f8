//! End-to-end load session tests.
//!
//! Each test authors real packs on disk (manifest + JSON sources), compiles
//! them with the content compiler, and drives the full runtime pipeline:
//! discovery, resolution, parallel decode, ordered merge, freeze.

use std::fs;
use std::path::{Path, PathBuf};

use pack_core::{
    CompatibilityError, ContentDomain, DependencyError, DomainRecord, HostContext,
    IntegrityError, PackLoadError, RegistryError, RegistryState, SemanticVersion,
};
use pack_content::{ContentCompiler, ManifestParser};
use runtime::{LoadOptions, PackLoader, RegistryHandle};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn host() -> HostContext {
    HostContext::new(SemanticVersion::new(1, 0, 0))
}

fn loader() -> PackLoader {
    PackLoader::new(LoadOptions::new(host()))
}

/// Writes a pack root (manifest + sources) and compiles its artifact.
fn build_pack(packs_dir: &Path, dir_name: &str, manifest_json: &str, sources: &[(&str, &str)]) -> PathBuf {
    let root = packs_dir.join(dir_name);
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("manifest.json"), manifest_json).unwrap();
    for (name, content) in sources {
        fs::write(root.join(name), content).unwrap();
    }

    let manifest = ManifestParser::parse(manifest_json.as_bytes()).unwrap();
    ContentCompiler::new(&root)
        .compile_to_artifact(&manifest)
        .unwrap()
}

const BASE_MANIFEST: &str = r#"{
    "id": "base",
    "name": "pack.base.name",
    "description": "pack.base.description",
    "version": "1.0.0",
    "type": "core",
    "core_version_min": "1.0.0",
    "author": "Twinfall Studio",
    "locales": ["en"],
    "regions_path": "regions.json",
    "anchors_path": "anchors.json",
    "abilities_path": "abilities.json",
    "cards_path": "cards.json",
    "heroes_path": "heroes.json",
    "balance_path": "balance.json",
    "localization_path": "strings.json"
}"#;

const BASE_SOURCES: &[(&str, &str)] = &[
    (
        "regions.json",
        r#"{"regions": [
            {"id": "region-ashlands", "name": "region.ashlands.name",
             "neighbors": ["region-harbor"], "anchor_ids": ["anchor-old-mill"]},
            {"id": "region-harbor", "name": "region.harbor.name",
             "neighbors": ["region-ashlands"]}
        ]}"#,
    ),
    (
        "anchors.json",
        r#"{"anchors": [
            {"id": "anchor-old-mill", "name": "anchor.old_mill.name",
             "region_id": "region-ashlands", "kind": "settlement"}
        ]}"#,
    ),
    (
        "abilities.json",
        r#"{"abilities": [
            {"id": "ability-ward", "name": "ability.ward.name", "cost": 1,
             "effect": "ability.ward.effect"}
        ]}"#,
    ),
    (
        "cards.json",
        r#"{"cards": [
            {"id": "card-strike", "name": "card.strike.name", "kind": "attack",
             "cost": 1, "rarity": "common"},
            {"id": "card-vigil", "name": "card.vigil.name", "kind": "skill",
             "cost": 2, "rarity": "uncommon", "ability_id": "ability-ward"}
        ]}"#,
    ),
    (
        "heroes.json",
        r#"{"heroes": [
            {"id": "hero-warden", "name": "hero.warden.name", "archetype": "guardian",
             "stats": {"health": 30, "will": 4, "courage": 6},
             "starting_deck": ["card-strike", "card-vigil"],
             "ability_ids": ["ability-ward"]}
        ]}"#,
    ),
    (
        "balance.json",
        r#"{"tables": [
            {"id": "combat", "entries": {"crit_multiplier": 1.5, "block_cap": 12}}
        ]}"#,
    ),
    (
        "strings.json",
        r#"{"strings": [
            {"id": "region.ashlands.name", "texts": {"en": "The Ashlands"}}
        ]}"#,
    ),
];

const CAMPAIGN_MANIFEST: &str = r#"{
    "id": "campaign-ashes",
    "name": "pack.campaign_ashes.name",
    "version": "1.0.0",
    "type": "campaign",
    "core_version_min": "1.0.0",
    "dependencies": [{"id": "base", "min_version": "1.0.0"}],
    "entry_region": "region-ashlands",
    "entry_quest": "quest-first-spark",
    "recommended_heroes": ["hero-warden"],
    "author": "Twinfall Studio",
    "locales": ["en"],
    "events_path": "events.json",
    "quests_path": "quests.json",
    "enemies_path": "enemies.json"
}"#;

const CAMPAIGN_SOURCES: &[(&str, &str)] = &[
    (
        "events.json",
        r#"{"events": [
            {"id": "event-ambush", "title": "event.ambush.title",
             "text": "event.ambush.text", "region_id": "region-ashlands",
             "weight": 3,
             "choices": [{"label": "event.ambush.fight"},
                         {"label": "event.ambush.flee"}]}
        ]}"#,
    ),
    (
        "quests.json",
        r#"{"quests": [
            {"id": "quest-first-spark", "title": "quest.first_spark.title",
             "entry_region_id": "region-ashlands",
             "stages": [{"id": "stage-1", "objective": "quest.first_spark.stage1",
                         "trigger_event_id": "event-ambush"}],
             "reward_card_ids": ["card-vigil"]}
        ]}"#,
    ),
    (
        "enemies.json",
        r#"{"enemies": [
            {"id": "enemy-bog-wraith", "name": "enemy.bog_wraith.name", "health": 14,
             "moves": [{"name": "enemy.bog_wraith.claw", "damage": 3}],
             "traits": ["undead"]}
        ]}"#,
    ),
];

#[tokio::test]
async fn full_session_loads_base_and_campaign() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    build_pack(dir.path(), "base", BASE_MANIFEST, BASE_SOURCES);
    build_pack(dir.path(), "campaign-ashes", CAMPAIGN_MANIFEST, CAMPAIGN_SOURCES);

    let loaded = loader().load_dir(dir.path()).await.expect("session should load");
    let registry = &loaded.registry;

    assert_eq!(registry.state(), RegistryState::Frozen);
    assert_eq!(registry.merged_packs(), ["base", "campaign-ashes"]);

    // Cross-pack reference: the campaign quest points at a base region.
    let quest = registry
        .lookup(ContentDomain::Quests, "quest-first-spark")
        .expect("quest present");
    assert_eq!(quest.pack_id, "campaign-ashes");
    let DomainRecord::Quest(quest) = &quest.record else {
        panic!("expected quest record");
    };
    assert!(
        registry
            .lookup(ContentDomain::Regions, &quest.entry_region_id)
            .is_some()
    );

    assert_eq!(registry.domain_len(ContentDomain::Cards), 2);
    assert_eq!(registry.iter_domain(ContentDomain::Regions).count(), 2);

    // Base lists no recommended heroes; that surfaces as a warning, not an
    // error.
    assert!(
        loaded
            .report
            .warnings()
            .any(|issue| issue.pack_id == "base")
    );

    // The frozen registry is installed process-wide by swapping the handle.
    let handle = RegistryHandle::new();
    assert!(handle.swap(loaded.registry.clone()).is_none());
    assert!(handle.current().is_some());
}

#[tokio::test]
async fn flipped_artifact_byte_fails_with_checksum_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    build_pack(dir.path(), "base", BASE_MANIFEST, BASE_SOURCES);
    let artifact = build_pack(dir.path(), "campaign-ashes", CAMPAIGN_MANIFEST, CAMPAIGN_SOURCES);

    // Flip one byte inside the last section's payload.
    let mut bytes = fs::read(&artifact).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    fs::write(&artifact, &bytes).unwrap();

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    let diagnostic = &report.errors[0];
    assert_eq!(diagnostic.pack_id.as_deref(), Some("campaign-ashes"));
    assert!(matches!(
        diagnostic.error,
        PackLoadError::Integrity(IntegrityError::ChecksumMismatch { .. })
    ));
}

#[tokio::test]
async fn duplicate_content_id_across_packs_fails_merge() {
    let dir = tempfile::tempdir().unwrap();
    build_pack(dir.path(), "base", BASE_MANIFEST, BASE_SOURCES);

    // A second pack redefines card-strike.
    let rival_manifest = r#"{
        "id": "rival-deck",
        "name": "pack.rival_deck.name",
        "version": "1.0.0",
        "type": "expansion",
        "core_version_min": "1.0.0",
        "dependencies": [{"id": "base", "min_version": "1.0.0"}],
        "author": "Twinfall Studio",
        "locales": ["en"],
        "cards_path": "cards.json"
    }"#;
    let rival_cards = r#"{"cards": [
        {"id": "card-strike", "name": "card.strike.rival", "kind": "attack",
         "cost": 1, "rarity": "common"}
    ]}"#;
    build_pack(dir.path(), "rival-deck", rival_manifest, &[("cards.json", rival_cards)]);

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    let error = &report.errors[0].error;
    let PackLoadError::Registry(RegistryError::DuplicateContentId {
        domain,
        id,
        first_owner,
        second_owner,
    }) = error
    else {
        panic!("expected duplicate content id, got {error}");
    };
    assert_eq!(*domain, ContentDomain::Cards);
    assert_eq!(id, "card-strike");
    assert_eq!(first_owner, "base");
    assert_eq!(second_owner, "rival-deck");
}

#[tokio::test]
async fn missing_dependency_fails_resolution() {
    let dir = tempfile::tempdir().unwrap();
    build_pack(dir.path(), "campaign-ashes", CAMPAIGN_MANIFEST, CAMPAIGN_SOURCES);

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    assert!(report.errors.iter().any(|d| matches!(
        &d.error,
        PackLoadError::Dependency(DependencyError::DependencyNotFound {
            pack_id,
            dependency_id,
        }) if pack_id == "campaign-ashes" && dependency_id == "base"
    )));
}

#[tokio::test]
async fn dependency_version_below_range_fails_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let old_base = BASE_MANIFEST.replace("\"version\": \"1.0.0\"", "\"version\": \"0.9.0\"");
    build_pack(dir.path(), "base", &old_base, BASE_SOURCES);
    build_pack(dir.path(), "campaign-ashes", CAMPAIGN_MANIFEST, CAMPAIGN_SOURCES);

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    assert!(report.errors.iter().any(|d| matches!(
        &d.error,
        PackLoadError::Dependency(DependencyError::DependencyVersionMismatch { .. })
    )));
}

#[tokio::test]
async fn incompatible_engine_version_fails_gate() {
    let dir = tempfile::tempdir().unwrap();
    let future_base =
        BASE_MANIFEST.replace("\"core_version_min\": \"1.0.0\"", "\"core_version_min\": \"9.0.0\"");
    build_pack(dir.path(), "base", &future_base, BASE_SOURCES);

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    assert!(report.errors.iter().any(|d| matches!(
        &d.error,
        PackLoadError::Compatibility(CompatibilityError::IncompatibleCoreVersion { .. })
    )));
}

#[tokio::test]
async fn dangling_entry_point_fails_after_freeze() {
    let dir = tempfile::tempdir().unwrap();
    build_pack(dir.path(), "base", BASE_MANIFEST, BASE_SOURCES);
    // Quests still define quest-first-spark; the manifest entry point now
    // names a quest nothing defines.
    let bad_campaign =
        CAMPAIGN_MANIFEST.replace("\"entry_quest\": \"quest-first-spark\"", "\"entry_quest\": \"quest-that-never-was\"");
    build_pack(dir.path(), "campaign-ashes", &bad_campaign, CAMPAIGN_SOURCES);

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    assert!(report.errors.iter().any(|d| matches!(
        &d.error,
        PackLoadError::Registry(RegistryError::MissingEntryPoint { .. })
    )));
}

#[tokio::test]
async fn broken_manifests_are_aggregated_not_first_error() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["broken-one", "broken-two"] {
        let root = dir.path().join(name);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("manifest.json"), b"{ not json").unwrap();
    }

    let report = loader().load_dir(dir.path()).await.unwrap_err();
    assert_eq!(report.errors.len(), 2);
    let mut hints: Vec<_> = report
        .errors
        .iter()
        .filter_map(|d| d.pack_id.as_deref())
        .collect();
    hints.sort();
    assert_eq!(hints, vec!["broken-one", "broken-two"]);
}

#[tokio::test]
async fn merge_order_is_deterministic_under_parallel_decode() {
    let dir = tempfile::tempdir().unwrap();

    // Six independent packs, each with its own region; decode runs on two
    // workers, merge order must still be ascending pack id.
    for name in ["oakfen", "briar", "saltmoor", "drift", "embervale", "calder"] {
        let manifest = format!(
            r#"{{
                "id": "{name}",
                "name": "pack.{name}.name",
                "version": "1.0.0",
                "type": "scenario",
                "core_version_min": "1.0.0",
                "author": "Twinfall Studio",
                "locales": ["en"],
                "regions_path": "regions.json"
            }}"#
        );
        let regions = format!(
            r#"{{"regions": [{{"id": "region-{name}", "name": "region.{name}.name"}}]}}"#
        );
        build_pack(dir.path(), name, &manifest, &[("regions.json", &regions)]);
    }

    let options = LoadOptions::new(host()).with_decode_workers(2);
    let loaded = PackLoader::new(options)
        .load_dir(dir.path())
        .await
        .expect("session should load");

    assert_eq!(
        loaded.registry.merged_packs(),
        ["briar", "calder", "drift", "embervale", "oakfen", "saltmoor"]
    );
}
