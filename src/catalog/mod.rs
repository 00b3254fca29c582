//! # Catalog Module
//!
//! Immutable snapshots of the creature and item data the generators read.
//!
//! Catalogs are built once, by the [`loader`] or by hand, and then shared
//! read-only. Items are additionally partitioned into per-creature-kind
//! [`LootTables`] at build time.

pub mod loader;
pub mod store;

pub use loader::*;
pub use store::*;

use crate::creature::{Creature, CreatureClassifier, Terrain};
use crate::loot::{ItemCategory, ItemType, LootCategory, LootItem, LootTableKind, Rarity};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The creatures available to the encounter composer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatureCatalog {
    creatures: Vec<Creature>,
}

impl CreatureCatalog {
    pub fn new(creatures: Vec<Creature>) -> Self {
        Self { creatures }
    }

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Looks a creature up by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Number of creatures preferring each terrain.
    pub fn terrain_counts(&self, classifier: &CreatureClassifier) -> BTreeMap<Terrain, usize> {
        classifier.terrain_counts(&self.creatures)
    }
}

/// The items available to the loot composer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemCatalog {
    items: Vec<LootItem>,
}

impl ItemCatalog {
    pub fn new(items: Vec<LootItem>) -> Self {
        Self { items }
    }

    /// The small hand-authored item set used when no item data loads.
    pub fn fallback() -> Self {
        Self::new(fallback_items())
    }

    pub fn items(&self) -> &[LootItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks an item up by name, ignoring case and treating runs of
    /// whitespace as single hyphens.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::ItemCatalog;
    ///
    /// let catalog = ItemCatalog::fallback();
    /// assert_eq!(catalog.find_by_name("chain  mail").map(|i| i.value), Some(150.0));
    /// ```
    pub fn find_by_name(&self, name: &str) -> Option<&LootItem> {
        let wanted = normalize_item_name(name);
        self.items.iter().find(|i| normalize_item_name(&i.name) == wanted)
    }

    /// Items whose normalised name contains `partial`.
    pub fn find_by_partial_name(&self, partial: &str) -> Vec<&LootItem> {
        let wanted = partial.to_lowercase();
        self.items
            .iter()
            .filter(|i| normalize_item_name(&i.name).contains(&wanted))
            .collect()
    }
}

fn normalize_item_name(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// The buckets of one creature kind's loot table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    buckets: BTreeMap<LootCategory, Vec<LootItem>>,
}

impl Default for LootTable {
    fn default() -> Self {
        Self {
            buckets: LootCategory::ALL.iter().map(|&c| (c, Vec::new())).collect(),
        }
    }
}

impl LootTable {
    /// Items in one bucket.
    pub fn bucket(&self, category: LootCategory) -> &[LootItem] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets in fixed category order.
    pub fn buckets(&self) -> impl Iterator<Item = (LootCategory, &[LootItem])> {
        self.buckets.iter().map(|(&c, items)| (c, items.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, item: LootItem) {
        self.buckets.entry(item.loot_category()).or_default().push(item);
    }
}

/// Items partitioned by the kind of creature that could carry them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootTables {
    tables: BTreeMap<LootTableKind, LootTable>,
    fallback: bool,
}

impl LootTables {
    /// Partitions a catalog. One item can land in several tables.
    pub fn from_catalog(catalog: &ItemCatalog) -> Self {
        let mut tables: BTreeMap<LootTableKind, LootTable> = LootTableKind::ALL
            .iter()
            .map(|&k| (k, LootTable::default()))
            .collect();

        for item in catalog.items() {
            for kind in suitable_kinds(item) {
                tables.entry(kind).or_default().push(item.clone());
            }
        }

        for (kind, table) in &tables {
            info!(
                "{}: {} items (weapons: {}, armor: {}, consumables: {}, magical: {})",
                kind,
                table.len(),
                table.bucket(LootCategory::Weapons).len(),
                table.bucket(LootCategory::Armor).len(),
                table.bucket(LootCategory::Consumables).len(),
                table.bucket(LootCategory::MagicalItems).len()
            );
        }

        Self {
            tables,
            fallback: false,
        }
    }

    /// Tables built from the fallback item set.
    pub fn fallback() -> Self {
        let mut tables = Self::from_catalog(&ItemCatalog::fallback());
        tables.fallback = true;
        tables
    }

    pub fn table(&self, kind: LootTableKind) -> Option<&LootTable> {
        self.tables.get(&kind)
    }

    /// Whether these tables came from the fallback item set.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

/// Creature kinds that could plausibly carry an item.
///
/// Animals and plants never receive weapons, armor or shields.
///
/// # Examples
///
/// ```
/// use warband::{suitable_kinds, ItemType, LootItem, LootTableKind};
///
/// let potion = LootItem::new("Healing Potion", 4.0, ItemType::Consumable);
/// assert_eq!(suitable_kinds(&potion).len(), 12);
///
/// let sword = LootItem::new("Longsword", 10.0, ItemType::Weapon);
/// assert!(!suitable_kinds(&sword).contains(&LootTableKind::Animal));
/// ```
pub fn suitable_kinds(item: &LootItem) -> Vec<LootTableKind> {
    use LootTableKind::*;

    if matches!(item.item_type, ItemType::Currency | ItemType::Gem | ItemType::Consumable) {
        return LootTableKind::ALL.to_vec();
    }

    let name = item.name.to_lowercase();
    let mut kinds: Vec<LootTableKind> = Vec::new();
    let mut add = |list: &[LootTableKind]| {
        for kind in list {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
    };

    if item.item_type.is_equipment() {
        add(&[Humanoid, Giant, Fey, Undead, Dragon]);
        if name.contains("golem") || name.contains("automaton") {
            add(&[Construct]);
        }
        if name.contains("mind") || name.contains("intellect") {
            add(&[Aberration]);
        }
    }
    if matches!(item.item_type, ItemType::MundaneGear | ItemType::Tool) {
        add(&[Humanoid, Giant, Fey, Undead, Dragon]);
    }
    if item.has_trait("magical") || item.item_type == ItemType::MagicalItem {
        add(&[Humanoid, Dragon, Fey, Undead, Aberration, Elemental]);
    }
    if item.item_type == ItemType::Rune || name.contains("rune") {
        add(&[Humanoid, Dragon, Fey, Construct, Elemental]);
    }
    if item.has_trait("alchemical") || ["herb", "natural", "potion"].iter().any(|k| name.contains(k)) {
        add(&[Animal, Plant, Fey, Humanoid, Giant]);
    }
    if item.category == ItemCategory::RareMaterials || item.has_trait("precious") {
        add(&[Construct, Elemental, Dragon, Giant]);
    }
    if item.item_type == ItemType::ArtObject || item.category == ItemCategory::Treasure {
        add(&[Humanoid, Dragon, Fey, Undead, Giant]);
    }

    if item.item_type.is_equipment() {
        kinds.retain(|k| !k.is_unarmed());
    }
    if kinds.is_empty() {
        kinds.push(Other);
    }
    kinds
}

fn fallback_item(
    id: &str,
    name: &str,
    value: f64,
    item_type: ItemType,
    level: i32,
    description: &str,
) -> LootItem {
    let category = match item_type {
        ItemType::Consumable => ItemCategory::Consumables,
        ItemType::Currency | ItemType::Gem => ItemCategory::Treasure,
        ItemType::Tool => ItemCategory::MundaneGear,
        _ => ItemCategory::Misc,
    };
    let mut item = LootItem::new(name, value, item_type)
        .with_level(level)
        .with_category(category)
        .with_description(description);
    item.id = format!("fallback-{}", id);
    item.source = "fallback".to_string();
    item
}

/// The hand-authored item set substituted when no item data is available.
pub fn fallback_items() -> Vec<LootItem> {
    use ItemType::*;

    let magic = |item: LootItem| {
        item.with_rarity(Rarity::Uncommon)
            .with_traits(&["magical"])
            .with_category(ItemCategory::MagicalItems)
    };

    vec![
        fallback_item("dagger", "Dagger", 2.0, Weapon, 1, "A simple dagger."),
        fallback_item("club", "Club", 1.0, Weapon, 1, "A simple wooden club."),
        fallback_item("shortbow", "Shortbow", 30.0, Weapon, 1, "A simple shortbow."),
        fallback_item("longsword", "Longsword", 100.0, Weapon, 1, "A well-balanced longsword."),
        fallback_item("leather", "Leather Armor", 20.0, Armor, 1, "Basic leather armor."),
        fallback_item("chain", "Chain Mail", 150.0, Armor, 1, "Interlocking metal rings."),
        fallback_item("plate", "Plate Armor", 1500.0, Armor, 1, "Heavy metal plate armor."),
        fallback_item("healing-minor", "Healing Potion (Minor)", 4.0, Consumable, 1, "Restores 1d8 Hit Points."),
        fallback_item("healing-lesser", "Healing Potion (Lesser)", 12.0, Consumable, 3, "Restores 2d8+5 Hit Points."),
        fallback_item("antidote", "Antidote", 5.0, Consumable, 1, "Counteracts poison."),
        fallback_item("rope", "Rope (50 feet)", 2.0, Tool, 1, "Hemp rope, 50 feet long."),
        fallback_item("torch", "Torch", 1.0, Tool, 1, "Provides light for 1 hour."),
        fallback_item("bedroll", "Bedroll", 1.0, Tool, 1, "Simple sleeping gear."),
        fallback_item("gold", "Gold Coins", 50.0, Currency, 1, "Shiny gold coins."),
        fallback_item("silver", "Silver Coins", 10.0, Currency, 1, "Silver coins."),
        fallback_item("gems", "Small Gems", 25.0, Gem, 1, "Collection of small gems."),
        magic(fallback_item("magic-weapon", "Magic Weapon (+1)", 350.0, Weapon, 2, "A weapon with a +1 enhancement bonus.")),
        magic(fallback_item("magic-armor", "Magic Armor (+1)", 160.0, Armor, 2, "Armor with a +1 enhancement bonus.")),
        fallback_item("scroll", "Scroll of Magic Missile", 15.0, Consumable, 1, "A scroll containing the magic missile spell."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_items() {
        let items = fallback_items();
        assert_eq!(items.len(), 19);
        assert!(items.iter().all(|i| i.value >= 1.0));
        let magic = items.iter().find(|i| i.name == "Magic Weapon (+1)").unwrap();
        assert_eq!(magic.rarity, Rarity::Uncommon);
        assert_eq!(magic.loot_category(), LootCategory::MagicalItems);
    }

    #[test]
    fn test_animal_table_has_no_equipment() {
        let tables = LootTables::fallback();
        assert!(tables.is_fallback());
        let animal = tables.table(LootTableKind::Animal).unwrap();
        assert!(!animal.is_empty());
        for (_, items) in animal.buckets() {
            assert!(items.iter().all(|i| !i.item_type.is_equipment()));
        }
        let humanoid = tables.table(LootTableKind::Humanoid).unwrap();
        assert_eq!(humanoid.bucket(LootCategory::Weapons).len(), 4);
        assert_eq!(humanoid.bucket(LootCategory::Armor).len(), 3);
    }

    #[test]
    fn test_alchemical_weapon_skips_animals() {
        let bomb = LootItem::new("Alchemist's Fire", 3.0, ItemType::Weapon).with_traits(&["alchemical"]);
        let kinds = suitable_kinds(&bomb);
        assert!(!kinds.contains(&LootTableKind::Animal));
        assert!(!kinds.contains(&LootTableKind::Plant));
        assert!(kinds.contains(&LootTableKind::Humanoid));
    }

    #[test]
    fn test_misc_items_go_to_other() {
        let oddity = LootItem::new("Curious Trinket", 3.0, ItemType::Misc);
        assert_eq!(suitable_kinds(&oddity), vec![LootTableKind::Other]);
    }

    #[test]
    fn test_creature_catalog_lookup() {
        let catalog = CreatureCatalog::new(vec![Creature::new("Goblin Warrior", -1, &["goblin"])]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.find("goblin warrior").is_some());
        assert!(catalog.find("Orc").is_none());
    }

    #[test]
    fn test_partial_name_search() {
        let catalog = ItemCatalog::fallback();
        let potions = catalog.find_by_partial_name("healing");
        assert_eq!(potions.len(), 2);
    }
}
