//! # Warband
//!
//! Encounter and treasure budgeting for Pathfinder 2e game masters.
//!
//! ## Architecture Overview
//!
//! Warband turns a party description into a balanced, ecologically plausible
//! group of creatures and then into a pile of treasure worth the official
//! budget. The pipeline is built from a handful of small pieces:
//!
//! - **Rules**: official encounter-budget, creature-XP and treasure tables
//! - **Creature classification**: type, preferred terrain and leadership rank
//!   inferred from names, traits and descriptions by weighted keyword scoring
//! - **Ecology**: veto rules deciding which creatures can appear together
//! - **Generation**: the encounter composer (narrative templates first, random
//!   composition as a fallback) and the loot composer
//! - **Catalogs**: immutable creature/item snapshots, loaded asynchronously and
//!   handed to the generators once ready
//!
//! All randomness flows through an injected, seedable [`rand::rngs::StdRng`] so
//! every generation can be reproduced exactly in tests.

pub mod catalog;
pub mod creature;
pub mod ecology;
pub mod encounter;
pub mod generation;
pub mod loot;
pub mod rules;
pub mod session;

// Core module re-exports
pub use catalog::*;
pub use creature::*;
pub use ecology::*;
pub use encounter::*;
pub use generation::*;
pub use loot::*;
pub use rules::*;
pub use session::*;

/// Core error type for the Warband engine.
#[derive(thiserror::Error, Debug)]
pub enum WarbandError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Party, terrain or variant parameters are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An edit cannot be applied to the encounter
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Catalogs are missing, empty or never finished loading
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// No creature or item satisfies the level/budget/terrain constraints
    #[error("No suitable candidate: {0}")]
    NoSuitableCandidate(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Warband codebase.
pub type WarbandResult<T> = Result<T, WarbandError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation tuning constants.
pub mod config {
    use std::time::Duration;

    /// Number of narrative templates tried before falling back to random composition
    pub const TEMPLATE_ATTEMPTS: u32 = 5;

    /// Maximum additions attempted by the random composer
    pub const RANDOM_ATTEMPTS: u32 = 100;

    /// Creatures more than this many levels from the party are never picked
    pub const LEVEL_WINDOW: i32 = 4;

    /// Lower bound of the accepted XP band for template encounters
    pub const ACCEPT_MIN_RATIO: f64 = 0.8;

    /// Upper bound of the accepted XP band for template encounters
    pub const ACCEPT_MAX_RATIO: f64 = 1.2;

    /// Role groups are shrunk so the running total stays below this ratio
    pub const SHRINK_CEILING_RATIO: f64 = 1.15;

    /// Encounters between this ratio and the acceptance floor get one filler creature
    pub const SUPPLEMENT_MIN_RATIO: f64 = 0.7;

    /// The random composer stops adding creatures above this ratio
    pub const RANDOM_STOP_RATIO: f64 = 0.95;

    /// Longest time a caller waits for catalogs before giving up
    pub const CATALOG_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Interval between catalog readiness checks
    pub const CATALOG_POLL_INTERVAL: Duration = Duration::from_millis(200);

    /// Number of catalog files read concurrently
    pub const LOADER_BATCH_SIZE: usize = 100;

    /// Most items a single creature can carry
    pub const MAX_ITEMS_PER_CREATURE: usize = 5;

    /// Item-roll passes per creature before giving up
    pub const ITEM_ROLL_ATTEMPTS: u32 = 10;

    /// Items may be at most this many levels above the party
    pub const ITEM_LEVEL_ALLOWANCE: i32 = 3;
}
