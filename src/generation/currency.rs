//! # Currency Fill
//!
//! Turns leftover treasure budget into a gem and a handful of coins.
//!
//! Amounts are counted in whole copper pieces and rounded down, so the coins
//! are never worth more than the budget they fill.

use crate::loot::{ItemCategory, ItemType, LootItem, Rarity};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Gem values a leftover budget can be paid out in.
pub const GEM_VALUES: [u32; 5] = [25, 50, 100, 250, 500];

const GEM_NAMES: [&str; 8] = ["Ruby", "Emerald", "Sapphire", "Diamond", "Pearl", "Opal", "Garnet", "Topaz"];

const CURRENCY_SOURCE: &str = "currency_filler";

/// Coins by denomination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinPurse {
    pub platinum: u64,
    pub gold: u64,
    pub silver: u64,
    pub copper: u64,
}

impl CoinPurse {
    /// Total worth in copper pieces.
    pub fn copper_value(&self) -> u64 {
        self.platinum * 1000 + self.gold * 100 + self.silver * 10 + self.copper
    }

    /// Total worth in gold pieces.
    pub fn gold_value(&self) -> f64 {
        self.copper_value() as f64 / 100.0
    }
}

/// Whole copper pieces in a gold amount, rounded down.
fn to_copper(gold: f64) -> u64 {
    if gold <= 0.0 {
        0
    } else {
        (gold * 100.0 + 1e-6).floor() as u64
    }
}

/// Splits a gold amount into coins.
///
/// Parties of level 5 and up sometimes receive up to 40% of the total as
/// platinum. Gold takes 70% of what is left for parties of level 3 and up and
/// 50% below that; the rest becomes silver and copper. Occasionally a little
/// gold is broken into silver.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use warband::distribute_currency;
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let purse = distribute_currency(12.5, 2, &mut rng);
/// assert_eq!(purse.copper_value(), 1250);
/// ```
pub fn distribute_currency(total_gold: f64, party_level: i32, rng: &mut StdRng) -> CoinPurse {
    let total_cp = to_copper(total_gold);
    let mut remaining = total_cp;
    let mut purse = CoinPurse::default();

    if party_level >= 5 && remaining >= 1000 && rng.gen::<f64>() < 0.3 {
        let affordable = remaining / 1000;
        let cap = total_cp * 4 / 10_000;
        purse.platinum = affordable.min(cap);
        remaining -= purse.platinum * 1000;
    }

    let gold_share = if party_level >= 3 { 0.7 } else { 0.5 };
    purse.gold = (remaining as f64 / 100.0 * gold_share).floor() as u64;
    remaining -= purse.gold * 100;

    purse.silver = remaining / 10;
    purse.copper = remaining % 10;

    if rng.gen::<f64>() < 0.3 && purse.gold > 2 {
        let converted = 2.min((purse.gold as f64 * 0.2).floor() as u64);
        purse.gold -= converted;
        purse.silver += converted * 10;
    }

    purse
}

fn coin_item(count: u64, denomination: &str, value: f64) -> LootItem {
    let name = format!("{} {} Pieces", count, denomination);
    let description = format!("{} {} pieces.", count, denomination.to_lowercase());
    let mut item = LootItem::new(&name, value, ItemType::Currency)
        .with_category(ItemCategory::Treasure)
        .with_description(&description);
    item.source = CURRENCY_SOURCE.to_string();
    item
}

/// Pays out a leftover budget as an optional gem plus coins.
///
/// With at least 25 gp left there is a 40% chance of a gem whose value is
/// drawn from [`GEM_VALUES`] and fits the budget. Whatever remains is split
/// by [`distribute_currency`]. Denominations with no coins are omitted.
pub fn currency_items(remaining: f64, party_level: i32, rng: &mut StdRng) -> Vec<LootItem> {
    let mut items = Vec::new();
    let mut budget = remaining;
    if budget < 0.01 {
        return items;
    }

    if budget >= 25.0 && rng.gen::<f64>() < 0.4 {
        let affordable: Vec<u32> = GEM_VALUES.iter().copied().filter(|&v| v as f64 <= budget).collect();
        if let Some(&value) = affordable.choose(rng) {
            let name = GEM_NAMES.choose(rng).copied().unwrap_or("Ruby");
            let mut gem = LootItem::new(&format!("{} Gem", name), value as f64, ItemType::Gem)
                .with_level((value as i32 / 50).max(1))
                .with_rarity(if value >= 100 { Rarity::Uncommon } else { Rarity::Common })
                .with_category(ItemCategory::Treasure)
                .with_description(&format!(
                    "A valuable {} gem worth {} gold pieces.",
                    name.to_lowercase(),
                    value
                ));
            gem.source = CURRENCY_SOURCE.to_string();
            items.push(gem);
            budget -= value as f64;
        }
    }

    let purse = distribute_currency(budget, party_level, rng);
    if purse.platinum > 0 {
        items.push(coin_item(purse.platinum, "Platinum", purse.platinum as f64 * 10.0));
    }
    if purse.gold > 0 {
        items.push(coin_item(purse.gold, "Gold", purse.gold as f64));
    }
    if purse.silver > 0 {
        items.push(coin_item(purse.silver, "Silver", purse.silver as f64 / 10.0));
    }
    if purse.copper > 0 {
        items.push(coin_item(purse.copper, "Copper", purse.copper as f64 / 100.0));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_low_level_split() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..50 {
            let purse = distribute_currency(10.0, 1, &mut rng);
            assert_eq!(purse.platinum, 0);
            assert_eq!(purse.copper_value(), 1000);
            assert!(purse.gold == 5 || purse.gold == 4);
        }
    }

    #[test]
    fn test_platinum_cap() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut saw_platinum = false;
        for _ in 0..200 {
            let purse = distribute_currency(100.0, 10, &mut rng);
            assert!(purse.platinum <= 4);
            assert_eq!(purse.copper_value(), 10_000);
            saw_platinum |= purse.platinum > 0;
        }
        assert!(saw_platinum);
    }

    #[test]
    fn test_fractional_budget() {
        let mut rng = StdRng::seed_from_u64(2);
        let purse = distribute_currency(0.57, 1, &mut rng);
        assert_eq!(purse.gold, 0);
        assert_eq!(purse.silver, 5);
        assert_eq!(purse.copper, 7);
    }

    #[test]
    fn test_currency_items_never_exceed_budget() {
        let mut rng = StdRng::seed_from_u64(12);
        for i in 0..200 {
            let budget = 0.37 + i as f64 * 3.3;
            let items = currency_items(budget, (i % 20) + 1, &mut rng);
            let total: f64 = items.iter().map(|item| item.value).sum();
            assert!(total <= budget + 1e-6, "{} > {}", total, budget);
            assert!(items.iter().all(|item| item.source == "currency_filler"));
        }
    }

    #[test]
    fn test_gem_properties() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut saw_gem = false;
        for _ in 0..100 {
            for item in currency_items(300.0, 3, &mut rng) {
                if item.item_type == ItemType::Gem {
                    saw_gem = true;
                    assert!(GEM_VALUES.contains(&(item.value as u32)));
                    assert!(item.value <= 300.0);
                    assert_eq!(item.rarity == Rarity::Uncommon, item.value >= 100.0);
                    assert!(item.name.ends_with(" Gem"));
                }
            }
        }
        assert!(saw_gem);
    }

    #[test]
    fn test_coin_names() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = currency_items(3.0, 1, &mut rng);
        assert!(items.iter().any(|i| i.name.ends_with("Gold Pieces")));
    }
}
