//! Benchmarks for encounter and loot generation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use warband::{
    built_in_templates, utils, Creature, CreatureCatalog, Difficulty, EcologyValidator,
    EncounterGenerator, GenerationConfig, Generator, ItemGenerator, LootTables, PartyConfig,
    Terrain, TerrainFilter, VariantMode,
};

fn catalog() -> CreatureCatalog {
    let mut creatures = Vec::new();
    for level in -1..=10 {
        creatures.push(Creature::new(&format!("Wolf {}", level), level, &["animal"]).with_description("Hunts in the forest"));
        creatures.push(Creature::new(&format!("Goblin Raider {}", level), level, &["goblin", "humanoid"]));
        creatures.push(Creature::new(&format!("Bandit Captain {}", level), level, &["human", "humanoid"]));
        creatures.push(Creature::new(&format!("Skeleton Guard {}", level), level, &["undead", "skeleton"]));
    }
    CreatureCatalog::new(creatures)
}

fn bench_encounter(c: &mut Criterion) {
    let catalog = catalog();
    let ecology = EcologyValidator::default();
    let templates = built_in_templates();
    let generator = EncounterGenerator::new(&catalog, &ecology, &templates);
    let party = PartyConfig::new(4, 4, Difficulty::Severe).expect("valid party");

    c.bench_function("encounter_any_terrain", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let config = GenerationConfig::new(seed, party).with_variant_mode(VariantMode::Mixed);
            let result = generator.generate(black_box(&config), &mut utils::create_rng(&config));
            black_box(result)
        });
    });

    c.bench_function("encounter_forest_random_only", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let config = GenerationConfig::new(seed, party)
                .with_terrain(TerrainFilter::Only(Terrain::Forest))
                .with_random_only(true);
            let result = generator.generate(black_box(&config), &mut utils::create_rng(&config));
            black_box(result)
        });
    });
}

fn bench_loot(c: &mut Criterion) {
    let catalog = catalog();
    let ecology = EcologyValidator::default();
    let templates = built_in_templates();
    let generator = EncounterGenerator::new(&catalog, &ecology, &templates);
    let config = GenerationConfig::new(7, PartyConfig::new(5, 4, Difficulty::Extreme).expect("valid party"));
    let encounter = generator
        .generate(&config, &mut utils::create_rng(&config))
        .expect("encounter");
    let tables = LootTables::fallback();
    let loot = ItemGenerator::new(&tables, &encounter);

    c.bench_function("loot_fallback_tables", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let config = GenerationConfig::for_testing(seed);
            let result = loot.generate(black_box(&config), &mut utils::create_rng(&config));
            black_box(result)
        });
    });
}

criterion_group!(benches, bench_encounter, bench_loot);
criterion_main!(benches);
