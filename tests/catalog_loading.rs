//! Catalog loading from disk and waiting on the shared store.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use warband::{
    load_creatures, load_into_store, CatalogStore, EncounterSession, GenerationConfig, LoadState,
    WarbandError, WarbandResult,
};

const WOLVES: &str = r#"[
    {"name": "Wolf", "level": 1, "traits": ["animal"], "description": "Hunts in the forest"},
    {"name": "Dire Wolf", "level": 3, "traits": ["animal"], "description": "A huge forest wolf"}
]"#;

const GOBLIN_PACK: &str = r#"{
    "name": "Goblin Warrior",
    "type": "npc",
    "system": {
        "details": {"level": {"value": -1}},
        "traits": {"value": ["goblin", "humanoid"]}
    }
}"#;

const ITEMS: &str = r#"[
    {"name": "Jade Figurine", "value": 30, "type": "art_object", "category": "treasure"},
    {"name": "Hunting Knife", "value": 3, "type": "weapon"},
    {"name": "Healing Draught", "value": 5, "type": "consumable", "category": "consumables"}
]"#;

fn write(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("write fixture");
    path
}

fn creature_dir() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    write(dir.path(), "wolves.json", WOLVES);
    write(dir.path(), "goblin.json", GOBLIN_PACK);
    write(dir.path(), "broken.json", "{ not json");
    write(dir.path(), "notes.txt", "ignored");
    dir
}

#[tokio::test]
async fn test_directory_load_skips_bad_files() -> WarbandResult<()> {
    let dir = creature_dir();
    let catalog = load_creatures(&[dir.path().to_path_buf()]).await?;
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.find("goblin warrior").map(|c| c.level), Some(-1));
    assert!(catalog.find("Dire Wolf").is_some());
    Ok(())
}

#[tokio::test]
async fn test_missing_items_fall_back() {
    let dir = creature_dir();
    let store = CatalogStore::new();
    load_into_store(&store, &[dir.path().to_path_buf()], &[]).await;

    assert_eq!(store.state().await, LoadState::Ready);
    let snapshot = store.snapshot().await.expect("published snapshot");
    assert!(snapshot.loot_tables.is_fallback());
    assert_eq!(snapshot.creatures.len(), 3);
}

#[tokio::test]
async fn test_all_creature_paths_missing_fails_store() {
    let dir = TempDir::new().expect("temp dir");
    let store = CatalogStore::new();
    let missing = vec![dir.path().join("nowhere"), dir.path().join("gone.json")];
    load_into_store(&store, &missing, &[]).await;
    assert!(matches!(store.state().await, LoadState::Failed(_)));

    let session = EncounterSession::new(store);
    let result = session.generate_encounter(&GenerationConfig::for_testing(1)).await;
    assert!(matches!(result, Err(WarbandError::DataUnavailable(_))));
}

#[tokio::test]
async fn test_missing_files_are_skipped() -> WarbandResult<()> {
    let dir = TempDir::new()?;
    let wolves = write(dir.path(), "wolves.json", WOLVES);
    let items = write(dir.path(), "items.json", ITEMS);
    let creature_paths = vec![wolves, dir.path().join("gone.json")];

    let catalog = load_creatures(&creature_paths).await?;
    assert_eq!(catalog.len(), 2);

    let store = CatalogStore::new();
    load_into_store(&store, &creature_paths, &[dir.path().join("lost.json"), items]).await;
    assert_eq!(store.state().await, LoadState::Ready);
    let snapshot = store.snapshot().await.expect("published snapshot");
    assert_eq!(snapshot.creatures.len(), 2);
    assert!(!snapshot.loot_tables.is_fallback());
    assert!(snapshot.items.find_by_name("Jade Figurine").is_some());
    Ok(())
}

#[tokio::test]
async fn test_loot_waits_for_catalogs() -> WarbandResult<()> {
    let creatures = creature_dir();
    let items = TempDir::new()?;
    let item_file = write(items.path(), "items.json", ITEMS);

    let store = CatalogStore::new();
    let session = EncounterSession::new(store.clone())
        .with_wait(Duration::from_secs(10), Duration::from_millis(5));

    let loader = store.clone();
    let creature_paths = vec![creatures.path().to_path_buf()];
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        load_into_store(&loader, &creature_paths, &[item_file]).await;
    });

    assert_eq!(store.state().await, LoadState::Loading);
    let (encounter, loot) = session
        .generate_with_loot(&GenerationConfig::for_testing(21))
        .await?;

    assert!(!encounter.is_empty());
    let snapshot = store.snapshot().await.expect("published snapshot");
    assert!(!snapshot.loot_tables.is_fallback());
    for item in &loot.items {
        let from_catalog = snapshot.items.find_by_name(&item.name).is_some();
        assert!(from_catalog || item.source == "currency_filler", "{}", item.name);
    }
    Ok(())
}
