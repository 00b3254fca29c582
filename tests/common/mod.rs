//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use warband::{
    built_in_templates, CatalogSnapshot, CatalogStore, Creature, CreatureCatalog, Difficulty,
    EcologyValidator, Encounter, EncounterEntry, EncounterTemplate, ItemCatalog, PartyConfig,
    TerrainFilter,
};

/// Two level-1 forest creatures, so every accepted group is worth 80 XP
/// against a level-1 party.
pub fn forest_catalog() -> CreatureCatalog {
    CreatureCatalog::new(vec![
        Creature::new("Wolf", 1, &["animal"]).with_description("Hunts in the forest"),
        Creature::new("Forest Elk", 1, &["animal"]).with_description("A skittish forest elk"),
    ])
}

/// A mixed catalog spanning several levels and creature kinds.
pub fn mixed_catalog() -> CreatureCatalog {
    CreatureCatalog::new(vec![
        Creature::new("Wolf", 1, &["animal"]).with_description("Hunts in the forest"),
        Creature::new("Dire Wolf", 3, &["animal"]).with_description("A huge forest wolf"),
        Creature::new("Goblin Warrior", -1, &["goblin", "humanoid"]),
        Creature::new("Goblin Chief", 1, &["goblin", "humanoid"]),
        Creature::new("Bandit", 0, &["human", "humanoid"]),
        Creature::new("Bandit Captain", 2, &["human", "humanoid"]),
        Creature::new("Skeleton Guard", 0, &["undead", "skeleton", "mindless"]),
        Creature::new("Zombie Shambler", -1, &["undead", "zombie", "mindless"]),
        Creature::new("Orc Brute", 2, &["orc", "humanoid"]),
        Creature::new("Giant Rat", -1, &["animal"]),
    ])
}

pub fn ecology() -> EcologyValidator {
    EcologyValidator::default()
}

pub fn templates() -> Vec<EncounterTemplate> {
    built_in_templates()
}

pub fn ready_store(creatures: CreatureCatalog) -> CatalogStore {
    CatalogStore::with_snapshot(CatalogSnapshot::new(creatures, ItemCatalog::default()))
}

/// Builds an encounter by hand, computing XP for the given party.
pub fn encounter_of(creatures: &[(Creature, u32)], level: i32, difficulty: Difficulty) -> Encounter {
    let party = PartyConfig::new(level, 4, difficulty).expect("valid party");
    let mut encounter = Encounter::new(party, TerrainFilter::Any);
    encounter.entries = creatures
        .iter()
        .map(|(creature, count)| EncounterEntry::new(creature.clone(), *count, level))
        .collect();
    encounter
}
