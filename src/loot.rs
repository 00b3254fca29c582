//! # Loot
//!
//! Item records, the vocabularies used to classify them, and the result of a
//! loot generation run.
//!
//! All values are in gold pieces. Coins below a gold piece show up as
//! fractional values (a silver piece is worth 0.1 gp).

use crate::creature::TerrainFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Item rarity, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    #[serde(rename = "very rare")]
    VeryRare,
    Legendary,
}

impl Rarity {
    /// Sort rank used when ordering loot; rarer is higher.
    pub fn rank(self) -> u8 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::VeryRare => 4,
            Rarity::Legendary => 5,
        }
    }

    /// Parses a rarity label. Unknown labels count as common.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::Rarity;
    ///
    /// assert_eq!(Rarity::parse_lenient("Uncommon"), Rarity::Uncommon);
    /// assert_eq!(Rarity::parse_lenient("very rare"), Rarity::VeryRare);
    /// assert_eq!(Rarity::parse_lenient("unique"), Rarity::Common);
    /// ```
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "uncommon" => Rarity::Uncommon,
            "rare" => Rarity::Rare,
            "very rare" | "very_rare" => Rarity::VeryRare,
            "legendary" => Rarity::Legendary,
            _ => Rarity::Common,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::VeryRare => "very rare",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Rune,
    Weapon,
    Armor,
    Shield,
    Consumable,
    Currency,
    Alchemical,
    MagicalItem,
    Gem,
    ArtObject,
    MundaneGear,
    Tool,
    Misc,
}

impl ItemType {
    /// Classifies a pack record.
    ///
    /// `record_type` is the record's own type ("weapon", "consumable", ...),
    /// `category` and `group` come from its system block. Runes win over
    /// everything else; the record type wins over traits.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::ItemType;
    ///
    /// assert_eq!(ItemType::determine("Striking Rune", "equipment", None, None, &[]), ItemType::Rune);
    /// assert_eq!(ItemType::determine("Dagger", "weapon", None, None, &[]), ItemType::Weapon);
    /// assert_eq!(
    ///     ItemType::determine("Smokestick", "equipment", None, None, &["alchemical".to_string()]),
    ///     ItemType::Alchemical
    /// );
    /// ```
    pub fn determine(
        name: &str,
        record_type: &str,
        category: Option<&str>,
        group: Option<&str>,
        traits: &[String],
    ) -> Self {
        let name = name.to_lowercase();
        let has_trait = |t: &str| traits.iter().any(|x| x.eq_ignore_ascii_case(t));

        if name.contains("rune") || category == Some("rune") || record_type == "rune" {
            return ItemType::Rune;
        }
        match record_type {
            "weapon" => return ItemType::Weapon,
            "armor" => return ItemType::Armor,
            "shield" => return ItemType::Shield,
            "consumable" => return ItemType::Consumable,
            _ => {}
        }
        if category == Some("currency") {
            ItemType::Currency
        } else if has_trait("alchemical") {
            ItemType::Alchemical
        } else if has_trait("magical") {
            ItemType::MagicalItem
        } else if group == Some("gem") || name.contains("gem") {
            ItemType::Gem
        } else if group == Some("artObject") {
            ItemType::ArtObject
        } else if category == Some("adventuring-gear") {
            ItemType::MundaneGear
        } else if category == Some("tools") {
            ItemType::Tool
        } else {
            ItemType::Misc
        }
    }

    /// Weapons, armor and shields.
    pub fn is_equipment(self) -> bool {
        matches!(self, ItemType::Weapon | ItemType::Armor | ItemType::Shield)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Rune => "rune",
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Shield => "shield",
            ItemType::Consumable => "consumable",
            ItemType::Currency => "currency",
            ItemType::Alchemical => "alchemical",
            ItemType::MagicalItem => "magical_item",
            ItemType::Gem => "gem",
            ItemType::ArtObject => "art_object",
            ItemType::MundaneGear => "mundane_gear",
            ItemType::Tool => "tool",
            ItemType::Misc => "misc",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad item category used to route items into loot buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Consumables,
    MagicalItems,
    Treasure,
    RareMaterials,
    MundaneGear,
    #[default]
    Misc,
}

impl ItemCategory {
    /// Classifies a pack record.
    pub fn determine(
        record_type: &str,
        category: Option<&str>,
        group: Option<&str>,
        has_material: bool,
        traits: &[String],
    ) -> Self {
        let has_trait = |t: &str| traits.iter().any(|x| x.eq_ignore_ascii_case(t));

        if has_trait("alchemical") || record_type == "consumable" {
            ItemCategory::Consumables
        } else if has_trait("magical") {
            ItemCategory::MagicalItems
        } else if category == Some("currency") || group == Some("gem") {
            ItemCategory::Treasure
        } else if has_trait("precious") || has_material {
            ItemCategory::RareMaterials
        } else if matches!(category, Some("adventuring-gear") | Some("tools")) {
            ItemCategory::MundaneGear
        } else {
            ItemCategory::Misc
        }
    }
}

/// Bucket within a loot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootCategory {
    Consumables,
    MagicalItems,
    Treasure,
    RareMaterials,
    MundaneGear,
    Weapons,
    Armor,
    Runes,
    Gems,
    Misc,
}

impl LootCategory {
    pub const ALL: [LootCategory; 10] = [
        LootCategory::Consumables,
        LootCategory::MagicalItems,
        LootCategory::Treasure,
        LootCategory::RareMaterials,
        LootCategory::MundaneGear,
        LootCategory::Weapons,
        LootCategory::Armor,
        LootCategory::Runes,
        LootCategory::Gems,
        LootCategory::Misc,
    ];

    /// Bucket for an item. A named category wins; otherwise the item type
    /// decides, and anything left over lands in `Misc`.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{ItemCategory, ItemType, LootCategory};
    ///
    /// assert_eq!(LootCategory::for_item(ItemCategory::Misc, ItemType::Shield), LootCategory::Armor);
    /// assert_eq!(LootCategory::for_item(ItemCategory::Treasure, ItemType::Gem), LootCategory::Treasure);
    /// assert_eq!(LootCategory::for_item(ItemCategory::Misc, ItemType::Tool), LootCategory::Misc);
    /// ```
    pub fn for_item(category: ItemCategory, item_type: ItemType) -> Self {
        match category {
            ItemCategory::Consumables => return LootCategory::Consumables,
            ItemCategory::MagicalItems => return LootCategory::MagicalItems,
            ItemCategory::Treasure => return LootCategory::Treasure,
            ItemCategory::RareMaterials => return LootCategory::RareMaterials,
            ItemCategory::MundaneGear => return LootCategory::MundaneGear,
            ItemCategory::Misc => {}
        }
        match item_type {
            ItemType::Weapon => LootCategory::Weapons,
            ItemType::Armor | ItemType::Shield => LootCategory::Armor,
            ItemType::Rune => LootCategory::Runes,
            ItemType::Gem => LootCategory::Gems,
            _ => LootCategory::Misc,
        }
    }

    /// Probability that a pass picks from this bucket when it has candidates.
    pub fn chance(self) -> f64 {
        match self {
            LootCategory::Consumables => 0.8,
            LootCategory::Weapons => 0.6,
            LootCategory::Armor => 0.4,
            LootCategory::MagicalItems => 0.3,
            LootCategory::Treasure => 0.5,
            LootCategory::MundaneGear => 0.3,
            LootCategory::RareMaterials => 0.2,
            LootCategory::Runes => 0.15,
            LootCategory::Gems => 0.4,
            LootCategory::Misc => 0.3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LootCategory::Consumables => "consumables",
            LootCategory::MagicalItems => "magical_items",
            LootCategory::Treasure => "treasure",
            LootCategory::RareMaterials => "rare_materials",
            LootCategory::MundaneGear => "mundane_gear",
            LootCategory::Weapons => "weapons",
            LootCategory::Armor => "armor",
            LootCategory::Runes => "runes",
            LootCategory::Gems => "gems",
            LootCategory::Misc => "misc",
        }
    }
}

impl fmt::Display for LootCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creature grouping that owns a loot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LootTableKind {
    Animal,
    Humanoid,
    Construct,
    Dragon,
    Fey,
    Undead,
    Aberration,
    Elemental,
    Giant,
    Plant,
    Vermin,
    Other,
}

impl LootTableKind {
    pub const ALL: [LootTableKind; 12] = [
        LootTableKind::Animal,
        LootTableKind::Humanoid,
        LootTableKind::Construct,
        LootTableKind::Dragon,
        LootTableKind::Fey,
        LootTableKind::Undead,
        LootTableKind::Aberration,
        LootTableKind::Elemental,
        LootTableKind::Giant,
        LootTableKind::Plant,
        LootTableKind::Vermin,
        LootTableKind::Other,
    ];

    /// Kinds that cannot wield or wear equipment.
    pub fn is_unarmed(self) -> bool {
        matches!(self, LootTableKind::Animal | LootTableKind::Plant)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LootTableKind::Animal => "animal",
            LootTableKind::Humanoid => "humanoid",
            LootTableKind::Construct => "construct",
            LootTableKind::Dragon => "dragon",
            LootTableKind::Fey => "fey",
            LootTableKind::Undead => "undead",
            LootTableKind::Aberration => "aberration",
            LootTableKind::Elemental => "elemental",
            LootTableKind::Giant => "giant",
            LootTableKind::Plant => "plant",
            LootTableKind::Vermin => "vermin",
            LootTableKind::Other => "other",
        }
    }
}

impl fmt::Display for LootTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_item_level() -> i32 {
    1
}

/// An item in a catalog or a loot pile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "item_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in gold pieces
    pub value: f64,
    #[serde(alias = "item_level", default = "default_item_level")]
    pub level: i32,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(alias = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub category: ItemCategory,
    /// Bucket the item was drawn from, or "currency_filler"
    #[serde(default)]
    pub source: String,
}

impl LootItem {
    /// Creates a common, level-1 item with no traits.
    pub fn new(name: &str, value: f64, item_type: ItemType) -> Self {
        Self {
            id: String::new(),
            name: name.to_string(),
            description: String::new(),
            value,
            level: 1,
            rarity: Rarity::Common,
            item_type,
            traits: Vec::new(),
            category: ItemCategory::Misc,
            source: String::new(),
        }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_traits(mut self, traits: &[&str]) -> Self {
        self.traits = traits.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }

    /// Bucket this item belongs in.
    pub fn loot_category(&self) -> LootCategory {
        LootCategory::for_item(self.category, self.item_type)
    }
}

/// Outcome of a loot generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootResult {
    /// Items sorted by rarity, then value, both descending
    pub items: Vec<LootItem>,
    pub total_value: f64,
    pub treasure_budget: u32,
    pub creature_types: Vec<LootTableKind>,
    pub terrain: TerrainFilter,
}

impl LootResult {
    /// Percentage of the treasure budget the items are worth.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{ItemType, LootItem, LootResult, TerrainFilter};
    ///
    /// let result = LootResult {
    ///     items: vec![LootItem::new("9 Gold Pieces", 9.0, ItemType::Currency)],
    ///     total_value: 9.0,
    ///     treasure_budget: 18,
    ///     creature_types: vec![],
    ///     terrain: TerrainFilter::Any,
    /// };
    /// assert_eq!(result.budget_utilization(), 50.0);
    /// ```
    pub fn budget_utilization(&self) -> f64 {
        if self.treasure_budget == 0 {
            0.0
        } else {
            self.total_value / self.treasure_budget as f64 * 100.0
        }
    }

    /// Items grouped by type, keeping their sorted order within each group.
    pub fn grouped_by_type(&self) -> BTreeMap<ItemType, Vec<&LootItem>> {
        let mut groups: BTreeMap<ItemType, Vec<&LootItem>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(item.item_type).or_default().push(item);
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl fmt::Display for LootResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.items.is_empty() {
            return writeln!(f, "No notable loot found.");
        }
        writeln!(
            f,
            "{} items worth {:.2} gp ({:.1}% of {} gp budget)",
            self.items.len(),
            self.total_value,
            self.budget_utilization(),
            self.treasure_budget
        )?;
        for (item_type, items) in self.grouped_by_type() {
            writeln!(f, "  {}:", item_type)?;
            for item in items {
                let rarity = if item.rarity == Rarity::Common {
                    String::new()
                } else {
                    format!(" [{}]", item.rarity)
                };
                writeln!(f, "    {} - {} gp{}", item.name, item.value, rarity)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_type_precedence() {
        let magical = vec!["magical".to_string()];
        assert_eq!(ItemType::determine("Runed Axe", "weapon", None, None, &[]), ItemType::Rune);
        assert_eq!(ItemType::determine("Wand", "equipment", None, None, &magical), ItemType::MagicalItem);
        assert_eq!(ItemType::determine("Bomb", "consumable", None, None, &magical), ItemType::Consumable);
        assert_eq!(ItemType::determine("Coin", "treasure", Some("currency"), None, &[]), ItemType::Currency);
        assert_eq!(ItemType::determine("Jade Cat", "treasure", None, Some("artObject"), &[]), ItemType::ArtObject);
        assert_eq!(ItemType::determine("Amethyst", "treasure", None, Some("gem"), &[]), ItemType::Gem);
        assert_eq!(ItemType::determine("Crowbar", "equipment", Some("tools"), None, &[]), ItemType::Tool);
        assert_eq!(ItemType::determine("Oddity", "equipment", None, None, &[]), ItemType::Misc);
    }

    #[test]
    fn test_item_category() {
        let precious = vec!["precious".to_string()];
        assert_eq!(
            ItemCategory::determine("consumable", None, None, false, &[]),
            ItemCategory::Consumables
        );
        assert_eq!(
            ItemCategory::determine("equipment", None, None, false, &precious),
            ItemCategory::RareMaterials
        );
        assert_eq!(
            ItemCategory::determine("weapon", None, None, true, &[]),
            ItemCategory::RareMaterials
        );
        assert_eq!(
            ItemCategory::determine("equipment", Some("adventuring-gear"), None, false, &[]),
            ItemCategory::MundaneGear
        );
        assert_eq!(ItemCategory::determine("weapon", None, None, false, &[]), ItemCategory::Misc);
    }

    #[test]
    fn test_loot_category_routing() {
        let sword = LootItem::new("Longsword", 1.0, ItemType::Weapon);
        assert_eq!(sword.loot_category(), LootCategory::Weapons);
        let wand = LootItem::new("Wand", 1.0, ItemType::MagicalItem).with_category(ItemCategory::MagicalItems);
        assert_eq!(wand.loot_category(), LootCategory::MagicalItems);
        assert_eq!(LootCategory::Runes.chance(), 0.15);
        assert_eq!(LootCategory::Misc.chance(), 0.3);
    }

    #[test]
    fn test_rarity_order() {
        assert!(Rarity::Legendary.rank() > Rarity::Rare.rank());
        assert!(Rarity::Uncommon > Rarity::Common);
        let json = serde_json::to_string(&Rarity::VeryRare).unwrap();
        assert_eq!(json, "\"very rare\"");
    }

    #[test]
    fn test_grouped_by_type() {
        let result = LootResult {
            items: vec![
                LootItem::new("Longsword", 10.0, ItemType::Weapon),
                LootItem::new("3 Gold Pieces", 3.0, ItemType::Currency),
                LootItem::new("Dagger", 2.0, ItemType::Weapon),
            ],
            total_value: 15.0,
            treasure_budget: 0,
            creature_types: vec![LootTableKind::Humanoid],
            terrain: TerrainFilter::Any,
        };
        let groups = result.grouped_by_type();
        assert_eq!(groups[&ItemType::Weapon].len(), 2);
        assert_eq!(groups[&ItemType::Weapon][0].name, "Longsword");
        assert_eq!(groups[&ItemType::Currency].len(), 1);
        assert_eq!(result.budget_utilization(), 0.0);
    }
}
