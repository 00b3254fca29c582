//! Property tests for the budget tables and the loot bounds.

mod common;

use common::encounter_of;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use warband::{
    creature_xp, currency_items, distribute_currency, utils, xp_budget, Creature, Difficulty,
    EncounterEntry, GenerationConfig, Generator, ItemGenerator, LootTables, Variant,
};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

fn variant() -> impl Strategy<Value = Variant> {
    prop::sample::select(vec![Variant::Weak, Variant::Normal, Variant::Elite])
}

proptest! {
    #[test]
    fn xp_budget_follows_character_adjustment(size in 1u32..=8, difficulty in difficulty()) {
        let raw = difficulty.base_budget() + (size as i32 - 4) * difficulty.character_adjustment();
        let expected = if difficulty == Difficulty::Trivial { raw.clamp(0, 40) } else { raw };
        prop_assert_eq!(xp_budget(size, difficulty), expected);
    }

    #[test]
    fn creature_xp_clamps_level_difference(party in 1i32..=20, diff in -30i32..=30) {
        prop_assert_eq!(
            creature_xp(party + diff, party),
            creature_xp(party + diff.clamp(-4, 4), party)
        );
        prop_assert_eq!(creature_xp(party, party), 40);
    }

    #[test]
    fn variant_change_round_trips(level in -1i32..=20, party in 1i32..=20, count in 1u32..=6, v in variant()) {
        let entry = EncounterEntry::new(Creature::new("Test Beast", level, &["beast"]), count, party);
        let restored = entry.with_variant(v).with_variant(Variant::Normal);
        prop_assert_eq!(restored.adjusted_level, entry.adjusted_level);
        prop_assert_eq!(restored.xp, entry.xp);
        prop_assert!(restored.is_consistent());
    }

    #[test]
    fn coins_conserve_value(gold in 0.0f64..10_000.0, level in 1i32..=20, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let purse = distribute_currency(gold, level, &mut rng);
        prop_assert!(purse.gold_value() <= gold + 1e-6);
        prop_assert!(gold - purse.gold_value() < 0.01 + 1e-6);
    }

    #[test]
    fn currency_fill_never_exceeds_budget(budget in 0.0f64..2_000.0, level in 1i32..=20, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let total: f64 = currency_items(budget, level, &mut rng).iter().map(|i| i.value).sum();
        prop_assert!(total <= budget + 1e-6);
    }

    #[test]
    fn loot_stays_within_treasure_budget(
        seed in any::<u64>(),
        level in 1i32..=20,
        goblins in 1u32..=8,
        wolves in 0u32..=4,
        difficulty in difficulty(),
    ) {
        let mut creatures = vec![(Creature::new("Goblin Warrior", level - 1, &["goblin", "humanoid"]), goblins)];
        if wolves > 0 {
            creatures.push((Creature::new("Wolf", level, &["animal"]), wolves));
        }
        let encounter = encounter_of(&creatures, level, difficulty);
        let tables = LootTables::fallback();
        let generator = ItemGenerator::new(&tables, &encounter);
        let config = GenerationConfig::for_testing(seed);
        let loot = generator.generate(&config, &mut utils::create_rng(&config)).unwrap();

        prop_assert!(loot.total_value >= 0.0);
        prop_assert!(loot.total_value <= loot.treasure_budget as f64 + 1e-6);
        prop_assert!(loot.items.iter().all(|i| i.value >= 0.0));
    }
}
