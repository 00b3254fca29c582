//! # Item Generation
//!
//! Fills an encounter's treasure budget with items from the loot tables.
//!
//! The budget is split evenly between the creature kinds present, then
//! handed out creature by creature. Each creature rolls a few items from its
//! kind's table and the rest of its share is paid out in gems and coins.

use crate::catalog::{LootTable, LootTables};
use crate::config;
use crate::creature::Creature;
use crate::encounter::Encounter;
use crate::generation::{currency_items, GenerationConfig, Generator};
use crate::loot::{LootCategory, LootItem, LootResult, LootTableKind};
use crate::rules::treasure_budget;
use crate::{WarbandError, WarbandResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Cheap clutter never handed out as loot.
pub const NUISANCE_ITEMS: [&str; 15] = [
    "candle",
    "torch",
    "flint",
    "tinder",
    "string",
    "twine",
    "pebble",
    "stone",
    "stick",
    "twig",
    "leaf",
    "feather",
    "small stone",
    "iron spike",
    "chalk",
];

/// Trait or name fragments and the loot kinds they imply.
const CREATURE_LOOT_KINDS: [(&str, LootTableKind); 22] = [
    ("animal", LootTableKind::Animal),
    ("beast", LootTableKind::Animal),
    ("humanoid", LootTableKind::Humanoid),
    ("goblin", LootTableKind::Humanoid),
    ("orc", LootTableKind::Humanoid),
    ("human", LootTableKind::Humanoid),
    ("elf", LootTableKind::Humanoid),
    ("dwarf", LootTableKind::Humanoid),
    ("undead", LootTableKind::Undead),
    ("skeleton", LootTableKind::Undead),
    ("zombie", LootTableKind::Undead),
    ("dragon", LootTableKind::Dragon),
    ("fey", LootTableKind::Fey),
    ("construct", LootTableKind::Construct),
    ("golem", LootTableKind::Construct),
    ("aberration", LootTableKind::Aberration),
    ("elemental", LootTableKind::Elemental),
    ("giant", LootTableKind::Giant),
    ("plant", LootTableKind::Plant),
    ("vermin", LootTableKind::Vermin),
    ("fiend", LootTableKind::Humanoid),
    ("celestial", LootTableKind::Humanoid),
];

/// Name fragments marking animals that think like people.
const INTELLIGENT_ANIMAL_PATTERNS: [&str; 4] = ["awakened", "were", "lycanthrope", "druid"];

/// Whether an item is clutter by name.
pub fn is_nuisance_item(item: &LootItem) -> bool {
    let name = item.name.to_lowercase();
    NUISANCE_ITEMS.iter().any(|n| name.contains(n))
}

/// Loot kinds a creature draws from.
///
/// Traits are matched exactly and names by substring. Animals whose name
/// marks them as intelligent also draw from the humanoid table. A creature
/// matching nothing draws from `Other`.
///
/// # Examples
///
/// ```
/// use warband::{loot_kinds_for, Creature, LootTableKind};
///
/// let wolf = Creature::new("Wolf", 1, &["animal"]);
/// assert_eq!(loot_kinds_for(&wolf), vec![LootTableKind::Animal]);
///
/// let bear = Creature::new("Awakened Bear", 4, &["animal"]);
/// assert_eq!(loot_kinds_for(&bear), vec![LootTableKind::Animal, LootTableKind::Humanoid]);
///
/// let ooze = Creature::new("Gelatinous Cube", 3, &["mindless", "ooze"]);
/// assert_eq!(loot_kinds_for(&ooze), vec![LootTableKind::Other]);
/// ```
pub fn loot_kinds_for(creature: &Creature) -> Vec<LootTableKind> {
    let mut kinds = Vec::new();
    let mut add = |kind: LootTableKind| {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    };

    for t in &creature.traits {
        let lower = t.to_lowercase();
        if let Some((_, kind)) = CREATURE_LOOT_KINDS.iter().find(|(key, _)| *key == lower) {
            add(*kind);
        }
    }
    let name = creature.lower_name();
    for (pattern, kind) in CREATURE_LOOT_KINDS {
        if name.contains(pattern) {
            add(kind);
        }
    }

    let intelligent = INTELLIGENT_ANIMAL_PATTERNS.iter().any(|p| name.contains(p));
    if intelligent && kinds.contains(&LootTableKind::Animal) && !kinds.contains(&LootTableKind::Humanoid) {
        kinds.push(LootTableKind::Humanoid);
    }
    if kinds.is_empty() {
        kinds.push(LootTableKind::Other);
    }
    kinds
}

/// Loot composer over pre-partitioned loot tables.
#[derive(Debug, Clone, Copy)]
pub struct ItemGenerator<'a> {
    tables: &'a LootTables,
    encounter: &'a Encounter,
}

impl<'a> ItemGenerator<'a> {
    pub fn new(tables: &'a LootTables, encounter: &'a Encounter) -> Self {
        Self { tables, encounter }
    }

    /// Creature counts per loot kind, in first-seen order.
    pub fn kind_summary(&self) -> Vec<(LootTableKind, u32)> {
        let mut summary: Vec<(LootTableKind, u32)> = Vec::new();
        for entry in &self.encounter.entries {
            for kind in loot_kinds_for(&entry.creature) {
                match summary.iter_mut().find(|(k, _)| *k == kind) {
                    Some((_, count)) => *count += entry.count,
                    None => summary.push((kind, entry.count)),
                }
            }
        }
        summary
    }

    /// Hands out one kind's share creature by creature.
    fn loot_for_kind(&self, kind: LootTableKind, count: u32, budget: f64, rng: &mut StdRng) -> Vec<LootItem> {
        let Some(table) = self.tables.table(kind) else {
            warn!("No loot table for creature kind {}", kind);
            return Vec::new();
        };

        let mut items = Vec::new();
        let mut remaining = budget;
        for i in 0..count {
            if remaining <= 0.0 {
                break;
            }
            let share = remaining / (count - i) as f64;
            let creature_items = self.items_for_creature(table, share, rng);
            remaining -= creature_items.iter().map(|item| item.value).sum::<f64>();
            items.extend(creature_items);
        }
        items
    }

    /// Rolls items for one creature, then pays out what is left in coins.
    fn items_for_creature(&self, table: &LootTable, budget: f64, rng: &mut StdRng) -> Vec<LootItem> {
        let party_level = self.encounter.party.level;
        let max_items = ((budget / 3.0).floor() as usize + 1).min(config::MAX_ITEMS_PER_CREATURE);
        let mut items = Vec::new();
        let mut remaining = budget;
        let mut attempts = 0;

        while remaining > 1.0 && attempts < config::ITEM_ROLL_ATTEMPTS && items.len() < max_items {
            attempts += 1;

            let mut categories: Vec<LootCategory> = table.buckets().map(|(c, _)| c).collect();
            categories.shuffle(rng);
            let mut added = false;

            for category in categories {
                if remaining <= 1.0 || items.len() >= max_items {
                    break;
                }
                let suitable: Vec<&LootItem> = table
                    .bucket(category)
                    .iter()
                    .filter(|item| affordable(item, remaining, party_level, 1.0))
                    .collect();
                if suitable.is_empty() {
                    continue;
                }
                if rng.gen::<f64>() <= category.chance() {
                    if let Some(&picked) = suitable.choose(rng) {
                        remaining -= picked.value;
                        items.push(drawn(picked, category));
                        added = true;
                        break;
                    }
                }
            }

            if !added && remaining > 10.0 {
                if let Some((category, picked)) = most_valuable(table, remaining, party_level) {
                    debug!("Forcing {} ({} gp) into the pile", picked.name, picked.value);
                    remaining -= picked.value;
                    items.push(drawn(picked, category));
                }
            }
        }

        if remaining > 0.0 {
            items.extend(currency_items(remaining, party_level, rng));
        }
        items
    }
}

/// Level, price and clutter filter applied to every candidate item.
fn affordable(item: &LootItem, remaining: f64, party_level: i32, min_value: f64) -> bool {
    item.level <= party_level + config::ITEM_LEVEL_ALLOWANCE
        && item.value <= remaining
        && item.value >= min_value
        && !is_nuisance_item(item)
}

/// The most valuable affordable item worth at least 5 gp, first in table
/// order on ties.
fn most_valuable<'t>(table: &'t LootTable, remaining: f64, party_level: i32) -> Option<(LootCategory, &'t LootItem)> {
    let mut best: Option<(LootCategory, &LootItem)> = None;
    for (category, items) in table.buckets() {
        for item in items.iter().filter(|i| affordable(i, remaining, party_level, 5.0)) {
            if best.map_or(true, |(_, b)| item.value > b.value) {
                best = Some((category, item));
            }
        }
    }
    best
}

fn drawn(item: &LootItem, category: LootCategory) -> LootItem {
    let mut item = item.clone();
    item.source = category.as_str().to_string();
    item
}

/// Orders loot by rarity, then value, both descending.
pub fn sort_loot(items: &mut [LootItem]) {
    items.sort_by(|a, b| {
        b.rarity
            .rank()
            .cmp(&a.rarity.rank())
            .then_with(|| b.value.total_cmp(&a.value))
    });
}

impl<'a> Generator<LootResult> for ItemGenerator<'a> {
    fn generate(&self, _config: &GenerationConfig, rng: &mut StdRng) -> WarbandResult<LootResult> {
        let party = self.encounter.party;
        let budget = treasure_budget(party.level, party.difficulty, self.encounter.entries.len());
        let summary = self.kind_summary();

        if self.tables.is_fallback() {
            warn!("Generating loot from fallback tables");
        }

        let mut items = Vec::new();
        if !summary.is_empty() {
            let per_kind = budget as f64 / summary.len() as f64;
            for &(kind, count) in &summary {
                let kind_items = self.loot_for_kind(kind, count, per_kind, rng);
                debug!("{} items for {} {} creatures", kind_items.len(), count, kind);
                items.extend(kind_items);
            }
        }
        sort_loot(&mut items);

        let result = LootResult {
            total_value: items.iter().map(|item| item.value).sum(),
            items,
            treasure_budget: budget,
            creature_types: summary.iter().map(|(kind, _)| *kind).collect(),
            terrain: self.encounter.terrain,
        };

        info!(
            "Generated {} loot items worth {:.2} gp of a {} gp budget",
            result.items.len(),
            result.total_value,
            budget
        );
        Ok(result)
    }

    fn validate(&self, result: &LootResult, _config: &GenerationConfig) -> WarbandResult<()> {
        if result.total_value > result.treasure_budget as f64 + 1e-6 {
            return Err(WarbandError::GenerationFailed(format!(
                "loot worth {:.2} gp exceeds the {} gp budget",
                result.total_value, result.treasure_budget
            )));
        }
        if let Some(item) = result.items.iter().find(|i| i.value < 0.0) {
            return Err(WarbandError::GenerationFailed(format!(
                "item '{}' has negative value",
                item.name
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ItemGenerator"
    }
}
