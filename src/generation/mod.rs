//! # Generation Module
//!
//! Encounter and treasure generation.
//!
//! This module holds the two composers that turn a party description into
//! content: the [`EncounterGenerator`], which picks creatures to match an XP
//! budget, and the [`ItemGenerator`], which fills a treasure budget with
//! items and coins. Both implement the [`Generator`] trait and draw every
//! random decision from an injected [`StdRng`], so a seed fully determines
//! the result.

pub mod currency;
pub mod encounters;
pub mod items;
pub mod leadership;
pub mod templates;
pub mod variants;

pub use currency::*;
pub use encounters::*;
pub use items::*;
pub use leadership::*;
pub use templates::*;
pub use variants::*;

use crate::config;
use crate::creature::TerrainFilter;
use crate::rules::{xp_budget, Difficulty};
use crate::{WarbandError, WarbandResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Lowest supported party level.
pub const MIN_PARTY_LEVEL: i32 = 1;
/// Highest supported party level.
pub const MAX_PARTY_LEVEL: i32 = 20;
/// Smallest supported party.
pub const MIN_PARTY_SIZE: u32 = 1;
/// Largest supported party.
pub const MAX_PARTY_SIZE: u32 = 8;

/// The party an encounter is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyConfig {
    pub level: i32,
    pub size: u32,
    pub difficulty: Difficulty,
}

impl PartyConfig {
    /// Creates a validated party description.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Difficulty, PartyConfig};
    ///
    /// let party = PartyConfig::new(3, 4, Difficulty::Severe).unwrap();
    /// assert_eq!(party.target_xp(), 120);
    /// assert!(PartyConfig::new(0, 4, Difficulty::Low).is_err());
    /// assert!(PartyConfig::new(3, 9, Difficulty::Low).is_err());
    /// ```
    pub fn new(level: i32, size: u32, difficulty: Difficulty) -> WarbandResult<Self> {
        let party = Self {
            level,
            size,
            difficulty,
        };
        party.validate()?;
        Ok(party)
    }

    /// Checks level and size against the supported ranges.
    pub fn validate(&self) -> WarbandResult<()> {
        if !(MIN_PARTY_LEVEL..=MAX_PARTY_LEVEL).contains(&self.level) {
            return Err(WarbandError::InvalidConfig(format!(
                "party level {} outside {}..={}",
                self.level, MIN_PARTY_LEVEL, MAX_PARTY_LEVEL
            )));
        }
        if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&self.size) {
            return Err(WarbandError::InvalidConfig(format!(
                "party size {} outside {}..={}",
                self.size, MIN_PARTY_SIZE, MAX_PARTY_SIZE
            )));
        }
        Ok(())
    }

    /// XP budget for this party.
    pub fn target_xp(&self) -> i32 {
        xp_budget(self.size, self.difficulty)
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            level: 1,
            size: 4,
            difficulty: Difficulty::Moderate,
        }
    }
}

/// Configuration for one generation run.
///
/// Controls the party, the terrain and variant selection, and the search
/// limits of the encounter composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    pub party: PartyConfig,
    pub terrain: TerrainFilter,
    pub variant_mode: VariantMode,
    /// Templates tried before random composition
    pub template_attempts: u32,
    /// Additions attempted by random composition
    pub random_attempts: u32,
    /// Creatures further than this from the party level are never picked
    pub level_window: i32,
    /// Skip templates and compose randomly
    pub random_only: bool,
}

impl GenerationConfig {
    /// Creates a configuration for `party` with default search limits.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{GenerationConfig, PartyConfig, TerrainFilter};
    ///
    /// let config = GenerationConfig::new(42, PartyConfig::default());
    /// assert_eq!(config.terrain, TerrainFilter::Any);
    /// assert_eq!(config.template_attempts, 5);
    /// ```
    pub fn new(seed: u64, party: PartyConfig) -> Self {
        Self {
            seed,
            party,
            terrain: TerrainFilter::Any,
            variant_mode: VariantMode::Normal,
            template_attempts: config::TEMPLATE_ATTEMPTS,
            random_attempts: config::RANDOM_ATTEMPTS,
            level_window: config::LEVEL_WINDOW,
            random_only: false,
        }
    }

    /// Creates a configuration for a moderate level-1 party of four.
    pub fn for_testing(seed: u64) -> Self {
        Self::new(seed, PartyConfig::default())
    }

    pub fn with_terrain(mut self, terrain: TerrainFilter) -> Self {
        self.terrain = terrain;
        self
    }

    pub fn with_variant_mode(mut self, variant_mode: VariantMode) -> Self {
        self.variant_mode = variant_mode;
        self
    }

    pub fn with_random_only(mut self, random_only: bool) -> Self {
        self.random_only = random_only;
        self
    }

    /// XP budget for the configured party.
    pub fn target_xp(&self) -> i32 {
        self.party.target_xp()
    }

    /// Checks the party and search limits.
    pub fn validate(&self) -> WarbandResult<()> {
        self.party.validate()?;
        if self.level_window < 0 {
            return Err(WarbandError::InvalidConfig(format!(
                "level window {} must not be negative",
                self.level_window
            )));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42, PartyConfig::default())
    }
}

/// Trait for content generators.
///
/// Allows different generation algorithms to be used interchangeably while
/// keeping a consistent interface.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WarbandResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> WarbandResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::distributions::{Distribution, WeightedIndex};
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Selection weight favouring creatures close to the party level.
    pub fn level_weight(creature_level: i32, party_level: i32) -> u32 {
        (5 - (creature_level - party_level).abs()).max(1) as u32
    }

    /// Picks one item with probability proportional to its weight.
    ///
    /// Returns `None` for an empty slice or when every weight is zero.
    pub fn weighted_pick<'a, T, F>(items: &'a [T], weight: F, rng: &mut StdRng) -> Option<&'a T>
    where
        F: Fn(&T) -> u32,
    {
        let weights: Vec<u32> = items.iter().map(weight).collect();
        let index = WeightedIndex::new(&weights).ok()?;
        items.get(index.sample(rng))
    }

    /// Whether a level falls within `window` levels of the party.
    pub fn within_window(level: i32, party_level: i32, window: i32) -> bool {
        (party_level - window..=party_level + window).contains(&level)
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_party_validation() {
        assert!(PartyConfig::new(1, 1, Difficulty::Trivial).is_ok());
        assert!(PartyConfig::new(20, 8, Difficulty::Extreme).is_ok());
        assert!(matches!(
            PartyConfig::new(21, 4, Difficulty::Low),
            Err(WarbandError::InvalidConfig(_))
        ));
        assert!(PartyConfig::new(5, 0, Difficulty::Low).is_err());
    }

    #[test]
    fn test_config_presets() {
        let config = GenerationConfig::for_testing(7);
        assert_eq!(config.seed, 7);
        assert_eq!(config.target_xp(), 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_create_rng_is_deterministic() {
        use rand::Rng;
        let config = GenerationConfig::for_testing(1234);
        let a: u64 = create_rng(&config).gen();
        let b: u64 = create_rng(&config).gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_level_weight() {
        assert_eq!(level_weight(3, 3), 5);
        assert_eq!(level_weight(1, 3), 3);
        assert_eq!(level_weight(7, 3), 1);
        assert_eq!(level_weight(-10, 3), 1);
    }

    #[test]
    fn test_weighted_pick() {
        let mut rng = StdRng::seed_from_u64(5);
        let items = [1, 2, 3];
        for _ in 0..50 {
            let picked = weighted_pick(&items, |&i| if i == 2 { 1 } else { 0 }, &mut rng);
            assert_eq!(picked, Some(&2));
        }
        let empty: [i32; 0] = [];
        assert!(weighted_pick(&empty, |_| 1, &mut rng).is_none());
        assert!(weighted_pick(&items, |_| 0, &mut rng).is_none());
    }

    #[test]
    fn test_within_window() {
        assert!(within_window(5, 1, 4));
        assert!(!within_window(6, 1, 4));
        assert!(within_window(-3, 1, 4));
    }
}
