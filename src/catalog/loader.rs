//! # Catalog Loader
//!
//! Reads creature and item catalogs from JSON files.
//!
//! A file may hold one record or an array of records. Records come in two
//! shapes: flat records that mirror [`Creature`] and [`LootItem`] directly,
//! and game-system pack records whose fields sit under a `system` block.
//! Files are read concurrently in batches; a file that cannot be read or
//! parsed is logged and skipped rather than failing the whole load.

use crate::catalog::{CatalogSnapshot, CatalogStore, CreatureCatalog, ItemCatalog};
use crate::config;
use crate::creature::{Attack, CombatStats, Creature};
use crate::loot::{ItemCategory, ItemType, LootItem, Rarity};
use crate::{WarbandError, WarbandResult};
use log::{debug, info, warn};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

/// Expands directories into the JSON files they contain, sorted by name.
/// Plain file paths pass through unchanged and missing paths are skipped.
pub async fn expand_paths(paths: &[PathBuf]) -> WarbandResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("Skipping missing catalog file {}", path.display());
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if metadata.is_dir() {
            let mut found = Vec::new();
            let mut entries = tokio::fs::read_dir(path).await?;
            while let Some(entry) = entries.next_entry().await? {
                let entry_path = entry.path();
                if is_catalog_file(&entry_path) {
                    found.push(entry_path);
                }
            }
            found.sort();
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Reads files in batches of [`config::LOADER_BATCH_SIZE`], returning the
/// contents of every file that could be read, in input order.
async fn read_batched(paths: &[PathBuf]) -> Vec<(PathBuf, String)> {
    let mut contents = Vec::with_capacity(paths.len());

    for batch in paths.chunks(config::LOADER_BATCH_SIZE) {
        let mut tasks = JoinSet::new();
        for (index, path) in batch.iter().enumerate() {
            let path = path.clone();
            tasks.spawn(async move {
                let result = tokio::fs::read_to_string(&path).await;
                (index, path, result)
            });
        }

        let mut batch_results = Vec::with_capacity(batch.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, path, Ok(text))) => batch_results.push((index, path, text)),
                Ok((_, path, Err(e))) => warn!("Skipping unreadable catalog file {}: {}", path.display(), e),
                Err(e) => warn!("Catalog read task failed: {}", e),
            }
        }
        batch_results.sort_by_key(|(index, _, _)| *index);
        contents.extend(batch_results.into_iter().map(|(_, path, text)| (path, text)));
    }

    contents
}

/// Loads creatures from the given files and directories.
pub async fn load_creatures(paths: &[PathBuf]) -> WarbandResult<CreatureCatalog> {
    let files = expand_paths(paths).await?;
    let mut creatures = Vec::new();
    for (path, text) in read_batched(&files).await {
        match parse_creature_records(&text) {
            Ok(parsed) => {
                debug!("Read {} creatures from {}", parsed.len(), path.display());
                creatures.extend(parsed);
            }
            Err(e) => warn!("Skipping malformed creature file {}: {}", path.display(), e),
        }
    }
    info!("Loaded {} creatures from {} files", creatures.len(), files.len());
    if creatures.is_empty() {
        return Err(WarbandError::DataUnavailable(
            "no creatures could be loaded".to_string(),
        ));
    }
    Ok(CreatureCatalog::new(creatures))
}

/// Loads items from the given files and directories.
pub async fn load_items(paths: &[PathBuf]) -> WarbandResult<ItemCatalog> {
    let files = expand_paths(paths).await?;
    let mut items = Vec::new();
    for (path, text) in read_batched(&files).await {
        match parse_item_records(&text) {
            Ok(parsed) => items.extend(parsed),
            Err(e) => warn!("Skipping malformed item file {}: {}", path.display(), e),
        }
    }
    info!("Loaded {} items from {} files", items.len(), files.len());
    Ok(ItemCatalog::new(items))
}

/// Loads both catalogs and publishes them into `store`.
///
/// An empty creature catalog marks the store failed. A failed item load only
/// degrades loot to the fallback tables.
pub async fn load_into_store(store: &CatalogStore, creature_paths: &[PathBuf], item_paths: &[PathBuf]) {
    let creatures = match load_creatures(creature_paths).await {
        Ok(creatures) => creatures,
        Err(e) => {
            store.fail(&e.to_string()).await;
            return;
        }
    };
    let items = match load_items(item_paths).await {
        Ok(items) => items,
        Err(e) => {
            warn!("Item catalog unavailable ({}), using fallback items", e);
            ItemCatalog::default()
        }
    };
    store.publish(CatalogSnapshot::new(creatures, items)).await;
}

/// Records in a file: an array, or a single object.
fn records(text: &str) -> WarbandResult<Vec<Value>> {
    Ok(match serde_json::from_str::<Value>(text)? {
        Value::Array(values) => values,
        value => vec![value],
    })
}

fn is_pack_record(value: &Value) -> bool {
    value.get("system").map_or(false, Value::is_object)
}

/// Parses every creature record in a file.
///
/// # Examples
///
/// ```
/// use warband::parse_creature_records;
///
/// let flat = r#"[{"name": "Wolf", "level": 1, "traits": ["animal"]}]"#;
/// assert_eq!(parse_creature_records(flat).unwrap()[0].name, "Wolf");
///
/// let pack = r#"{"name": "Reefclaw", "type": "npc",
///     "system": {"details": {"level": {"value": 1}},
///                "traits": {"value": ["aquatic"]},
///                "attributes": {"speed": {"otherSpeeds": [{"type": "swim"}]}}}}"#;
/// let reefclaw = &parse_creature_records(pack).unwrap()[0];
/// assert_eq!(reefclaw.speeds, vec!["swim".to_string()]);
/// ```
pub fn parse_creature_records(text: &str) -> WarbandResult<Vec<Creature>> {
    let mut creatures = Vec::new();
    for value in records(text)? {
        if is_pack_record(&value) {
            match creature_from_pack(&value) {
                Some(creature) => creatures.push(creature),
                None => debug!("Ignoring pack record without a name"),
            }
        } else {
            creatures.push(serde_json::from_value(value)?);
        }
    }
    Ok(creatures)
}

/// Parses every item record in a file.
pub fn parse_item_records(text: &str) -> WarbandResult<Vec<LootItem>> {
    let mut items = Vec::new();
    for value in records(text)? {
        if is_pack_record(&value) {
            match item_from_pack(&value) {
                Some(item) => items.push(item),
                None => debug!("Ignoring pack record without a name"),
            }
        } else {
            items.push(serde_json::from_value(value)?);
        }
    }
    Ok(items)
}

fn at<'v>(value: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn int_at(value: &Value, path: &[&str]) -> Option<i32> {
    at(value, path).and_then(Value::as_i64).map(|v| v as i32)
}

fn str_at<'v>(value: &'v Value, path: &[&str]) -> Option<&'v str> {
    at(value, path).and_then(Value::as_str)
}

fn strings_at(value: &Value, path: &[&str]) -> Vec<String> {
    at(value, path)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Converts a pack creature record.
pub fn creature_from_pack(value: &Value) -> Option<Creature> {
    let name = str_at(value, &["name"])?;
    let system = value.get("system")?;

    let description = str_at(system, &["details", "publicNotes"])
        .or_else(|| str_at(system, &["details", "description"]))
        .unwrap_or_default();

    let speeds = at(system, &["attributes", "speed", "otherSpeeds"])
        .and_then(Value::as_array)
        .map(|speeds| {
            speeds
                .iter()
                .filter_map(|s| str_at(s, &["type"]))
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default();

    Some(Creature {
        name: name.to_string(),
        level: int_at(system, &["details", "level", "value"]).unwrap_or(1),
        traits: strings_at(system, &["traits", "value"]),
        description: description.to_string(),
        speeds,
        stats: stats_from_pack(value, system),
    })
}

fn stats_from_pack(record: &Value, system: &Value) -> CombatStats {
    let mut stats = CombatStats {
        ac: int_at(system, &["attributes", "ac", "value"]),
        hp: int_at(system, &["attributes", "hp", "max"]).or_else(|| int_at(system, &["attributes", "hp", "value"])),
        perception: int_at(system, &["perception", "mod"])
            .or_else(|| int_at(system, &["attributes", "perception", "value"])),
        fortitude: int_at(system, &["saves", "fortitude", "value"]),
        reflex: int_at(system, &["saves", "reflex", "value"]),
        will: int_at(system, &["saves", "will", "value"]),
        ..CombatStats::default()
    };

    if let Some(abilities) = system.get("abilities").and_then(Value::as_object) {
        for (name, ability) in abilities {
            if let Some(m) = int_at(ability, &["mod"]) {
                stats.abilities.insert(name.clone(), m);
            }
        }
    }
    if let Some(skills) = system.get("skills").and_then(Value::as_object) {
        for (name, skill) in skills {
            if let Some(v) = int_at(skill, &["value"]).or_else(|| int_at(skill, &["base"])) {
                stats.skills.insert(name.clone(), v);
            }
        }
    }
    if let Some(items) = record.get("items").and_then(Value::as_array) {
        for item in items.iter().filter(|i| str_at(i, &["type"]) == Some("melee")) {
            let Some(name) = str_at(item, &["name"]) else {
                continue;
            };
            let damage = at(item, &["system", "damageRolls"])
                .and_then(Value::as_object)
                .map(|rolls| {
                    rolls
                        .values()
                        .filter_map(|roll| {
                            let dice = str_at(roll, &["damage"])?;
                            Some(match str_at(roll, &["damageType"]) {
                                Some(kind) => format!("{} {}", dice, kind),
                                None => dice.to_string(),
                            })
                        })
                        .collect::<Vec<_>>()
                        .join(" plus ")
                })
                .unwrap_or_default();
            stats.attacks.push(Attack {
                name: name.to_string(),
                bonus: int_at(item, &["system", "bonus", "value"]).unwrap_or(0),
                damage,
            });
        }
    }
    stats
}

/// Converts a pack item record.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use warband::{item_from_pack, ItemType, Rarity};
///
/// let record = json!({
///     "_id": "abc", "name": "Longsword", "type": "weapon",
///     "system": {"price": {"value": {"gp": 1}}, "level": {"value": 0},
///                "traits": {"rarity": "common", "value": ["versatile-p"]}}
/// });
/// let item = item_from_pack(&record).unwrap();
/// assert_eq!(item.item_type, ItemType::Weapon);
/// assert_eq!(item.value, 1.0);
/// assert_eq!(item.rarity, Rarity::Common);
/// ```
pub fn item_from_pack(value: &Value) -> Option<LootItem> {
    let name = str_at(value, &["name"])?;
    let system = value.get("system")?;
    let record_type = str_at(value, &["type"]).unwrap_or_default();
    let category = str_at(system, &["category"]);
    let group = str_at(system, &["group"]);
    let traits = strings_at(system, &["traits", "value"]);
    let has_material = at(system, &["material", "type"]).map_or(false, |m| !m.is_null());

    let price = |coin: &str| {
        at(system, &["price", "value", coin])
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };
    let value_gp = price("pp") * 10.0 + price("gp") + price("sp") / 10.0 + price("cp") / 100.0;

    Some(LootItem {
        id: str_at(value, &["_id"]).unwrap_or_default().to_string(),
        name: name.to_string(),
        description: str_at(system, &["description", "value"])
            .unwrap_or_default()
            .to_string(),
        value: value_gp,
        level: int_at(system, &["level", "value"]).unwrap_or(1),
        rarity: Rarity::parse_lenient(str_at(system, &["traits", "rarity"]).unwrap_or("common")),
        item_type: ItemType::determine(name, record_type, category, group, &traits),
        category: ItemCategory::determine(record_type, category, group, has_material, &traits),
        traits,
        source: "equipment_packs".to_string(),
    })
}

/// Whether a path looks like a JSON catalog file.
pub fn is_catalog_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pack_creature_stats() {
        let record = json!({
            "name": "Goblin Warrior",
            "type": "npc",
            "system": {
                "details": {"level": {"value": -1}, "publicNotes": "Goblins live in warrens."},
                "traits": {"value": ["goblin", "humanoid"]},
                "attributes": {"ac": {"value": 16}, "hp": {"max": 6, "value": 6}},
                "perception": {"mod": 2},
                "saves": {"fortitude": {"value": 5}, "reflex": {"value": 7}, "will": {"value": 3}},
                "abilities": {"str": {"mod": 0}, "dex": {"mod": 3}},
                "skills": {"stealth": {"base": 5}}
            },
            "items": [
                {"name": "Dogslicer", "type": "melee",
                 "system": {"bonus": {"value": 8},
                            "damageRolls": {"a": {"damage": "1d6", "damageType": "slashing"}}}}
            ]
        });
        let goblin = creature_from_pack(&record).unwrap();
        assert_eq!(goblin.level, -1);
        assert_eq!(goblin.description, "Goblins live in warrens.");
        assert_eq!(goblin.stats.ac, Some(16));
        assert_eq!(goblin.stats.hp, Some(6));
        assert_eq!(goblin.stats.perception, Some(2));
        assert_eq!(goblin.stats.reflex, Some(7));
        assert_eq!(goblin.stats.abilities["dex"], 3);
        assert_eq!(goblin.stats.skills["stealth"], 5);
        assert_eq!(goblin.stats.attacks[0].damage, "1d6 slashing");
        assert_eq!(goblin.stats.attacks[0].bonus, 8);
    }

    #[test]
    fn test_pack_item_price_and_category() {
        let record = json!({
            "name": "Elixir of Life (Minor)",
            "type": "consumable",
            "system": {
                "price": {"value": {"gp": 3, "sp": 5}},
                "level": {"value": 1},
                "traits": {"rarity": "uncommon", "value": ["alchemical", "elixir"]}
            }
        });
        let item = item_from_pack(&record).unwrap();
        assert_eq!(item.item_type, ItemType::Consumable);
        assert_eq!(item.category, ItemCategory::Consumables);
        assert_eq!(item.value, 3.5);
        assert_eq!(item.rarity, Rarity::Uncommon);
        assert_eq!(item.source, "equipment_packs");
    }

    #[test]
    fn test_flat_item_aliases() {
        let text = r#"{"item_name": "Dagger", "value": 2, "item_level": 1, "type": "weapon"}"#;
        let items = parse_item_records(text).unwrap();
        assert_eq!(items[0].name, "Dagger");
        assert_eq!(items[0].item_type, ItemType::Weapon);
    }

    #[test]
    fn test_malformed_records_error() {
        assert!(parse_creature_records("not json").is_err());
        assert!(parse_creature_records(r#"[{"level": 3}]"#).is_err());
    }

    #[test]
    fn test_is_catalog_file() {
        assert!(is_catalog_file(Path::new("bestiary/wolf.json")));
        assert!(!is_catalog_file(Path::new("notes.txt")));
    }
}
