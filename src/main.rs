//! # Warband Command Line
//!
//! Loads creature and item catalogs, composes one encounter for the given
//! party and optionally rolls its treasure.

use clap::Parser;
use log::{error, info, LevelFilter};
use serde::Serialize;
use std::path::PathBuf;
use warband::{
    load_into_store, CatalogStore, ClassifierTables, CreatureClassifier, Difficulty, EcologyTables,
    EcologyValidator, Encounter, EncounterSession, GenerationConfig, LootResult, PartyConfig,
    TerrainFilter, TerrainRelations, VariantMode, WarbandResult,
};

/// Command line arguments for Warband.
#[derive(Parser, Debug)]
#[command(name = "warband")]
#[command(about = "Ecology-aware encounter and treasure budgeting for Pathfinder 2e")]
#[command(version)]
struct Args {
    /// Party level (1-20)
    #[arg(short, long, default_value_t = 1)]
    level: i32,

    /// Number of player characters (1-8)
    #[arg(short = 'n', long, default_value_t = 4)]
    size: u32,

    /// Threat level (trivial, low, moderate, severe, extreme)
    #[arg(short, long, default_value = "moderate")]
    difficulty: Difficulty,

    /// Terrain to draw creatures from, or "any"
    #[arg(short, long, default_value = "any")]
    terrain: TerrainFilter,

    /// Elite/weak variant mode (normal, weak, elite, mixed)
    #[arg(long, default_value = "normal")]
    variant: VariantMode,

    /// Random seed; a fresh one is drawn when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Creature catalog files or directories of JSON files
    #[arg(long, num_args = 1.., required = true)]
    creatures: Vec<PathBuf>,

    /// Item catalog files or directories; fallback items are used when omitted
    #[arg(long, num_args = 1..)]
    items: Vec<PathBuf>,

    /// Also roll treasure for the encounter
    #[arg(long)]
    loot: bool,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Skip narrative templates and compose randomly
    #[arg(long)]
    random_only: bool,

    /// Replacement classifier keyword tables (JSON)
    #[arg(long)]
    classifier_tables: Option<PathBuf>,

    /// Replacement ecology tables (JSON)
    #[arg(long)]
    ecology_tables: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    encounter: &'a Encounter,
    #[serde(skip_serializing_if = "Option::is_none")]
    loot: Option<&'a LootResult>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    if let Err(e) = run(args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> WarbandResult<()> {
    info!("Starting Warband v{}", warband::VERSION);

    let party = PartyConfig::new(args.level, args.size, args.difficulty)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = GenerationConfig::new(seed, party)
        .with_terrain(args.terrain)
        .with_variant_mode(args.variant)
        .with_random_only(args.random_only);
    config.validate()?;

    let session = EncounterSession::new(CatalogStore::new()).with_ecology(build_ecology(&args)?);

    let store = session.store().clone();
    let (creature_paths, item_paths) = (args.creatures.clone(), args.items.clone());
    tokio::spawn(async move {
        load_into_store(&store, &creature_paths, &item_paths).await;
    });

    info!("Generating encounter with seed {}", seed);
    let (encounter, loot) = if args.loot {
        let (encounter, loot) = session.generate_with_loot(&config).await?;
        (encounter, Some(loot))
    } else {
        (session.generate_encounter(&config).await?, None)
    };

    if args.json {
        let report = Report {
            seed,
            encounter: &encounter,
            loot: loot.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", encounter);
        if let Some(loot) = &loot {
            println!();
            print!("{}", loot);
        }
        println!("Seed: {}", seed);
    }

    Ok(())
}

/// Builds the ecology rules, replacing built-in tables from JSON where asked.
fn build_ecology(args: &Args) -> WarbandResult<EcologyValidator> {
    let classifier_tables = match &args.classifier_tables {
        Some(path) => {
            info!("Loading classifier tables from {}", path.display());
            ClassifierTables::from_json_file(path)?
        }
        None => ClassifierTables::default(),
    };
    let ecology_tables = match &args.ecology_tables {
        Some(path) => {
            info!("Loading ecology tables from {}", path.display());
            EcologyTables::from_json_file(path)?
        }
        None => EcologyTables::default(),
    };

    Ok(EcologyValidator::new(
        CreatureClassifier::new(classifier_tables),
        ecology_tables,
        TerrainRelations::default(),
    ))
}

/// Initialize logging based on the specified level.
fn initialize_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .init();
}
