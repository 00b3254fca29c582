//! # Creature Module
//!
//! Creature records as supplied by a bestiary catalog, plus the coarse
//! vocabularies (creature type, terrain) the rest of the engine reasons in.
//!
//! Creature data carries no structured ecology; everything about where a
//! creature lives or who it runs with is inferred from its name, traits and
//! description by the [`CreatureClassifier`].

pub mod classifier;
pub mod tables;

pub use classifier::*;
pub use tables::*;

use crate::{WarbandError, WarbandResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A creature statblock.
///
/// Only `name`, `level`, `traits`, `description` and `speeds` feed decision
/// logic. The combat statistics are carried along so variants can be scaled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Display name, e.g. "Goblin Warrior"
    pub name: String,
    /// Creature level (may be negative)
    pub level: i32,
    /// Trait tags such as "humanoid", "goblin", "aquatic"
    #[serde(default)]
    pub traits: Vec<String>,
    /// Free-text description used for terrain inference
    #[serde(default)]
    pub description: String,
    /// Movement types other than land speed ("swim", "climb", "burrow", ...)
    #[serde(default)]
    pub speeds: Vec<String>,
    /// Combat statistics
    #[serde(default)]
    pub stats: CombatStats,
}

impl Creature {
    /// Creates a creature with no description, speeds or statistics.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::Creature;
    ///
    /// let wolf = Creature::new("Wolf", 1, &["animal"]);
    /// assert_eq!(wolf.level, 1);
    /// assert_eq!(wolf.traits, vec!["animal".to_string()]);
    /// ```
    pub fn new(name: &str, level: i32, traits: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            level,
            traits: traits.iter().map(|t| t.to_string()).collect(),
            description: String::new(),
            speeds: Vec::new(),
            stats: CombatStats::default(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the additional movement types.
    pub fn with_speeds(mut self, speeds: &[&str]) -> Self {
        self.speeds = speeds.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Sets the combat statistics.
    pub fn with_stats(mut self, stats: CombatStats) -> Self {
        self.stats = stats;
        self
    }

    /// Lowercased name.
    pub fn lower_name(&self) -> String {
        self.name.to_lowercase()
    }

    /// All traits joined by spaces and lowercased, for substring matching.
    pub fn trait_string(&self) -> String {
        self.traits.join(" ").to_lowercase()
    }

    /// Whether the creature carries the given trait (case-insensitive).
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.iter().any(|t| t.eq_ignore_ascii_case(name))
    }
}

/// Combat statistics adjusted by elite and weak variants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub ac: Option<i32>,
    pub hp: Option<i32>,
    pub perception: Option<i32>,
    pub fortitude: Option<i32>,
    pub reflex: Option<i32>,
    pub will: Option<i32>,
    /// Ability modifiers keyed by short name ("str", "dex", ...)
    #[serde(default)]
    pub abilities: BTreeMap<String, i32>,
    /// Skill modifiers keyed by skill name
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
}

/// A single strike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    pub bonus: i32,
    /// Damage expression such as "1d8+4 slashing"
    pub damage: String,
}

/// Coarse ecological creature type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureType {
    Humanoid,
    Undead,
    Fiend,
    Fey,
    Dragon,
    Aberration,
    Construct,
    Celestial,
    Elemental,
    Animal,
    Beast,
    Plant,
}

impl CreatureType {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            CreatureType::Humanoid => "humanoid",
            CreatureType::Undead => "undead",
            CreatureType::Fiend => "fiend",
            CreatureType::Fey => "fey",
            CreatureType::Dragon => "dragon",
            CreatureType::Aberration => "aberration",
            CreatureType::Construct => "construct",
            CreatureType::Celestial => "celestial",
            CreatureType::Elemental => "elemental",
            CreatureType::Animal => "animal",
            CreatureType::Beast => "beast",
            CreatureType::Plant => "plant",
        }
    }
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environment a creature prefers or an encounter takes place in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Terrain {
    Forest,
    Desert,
    Arctic,
    Mountain,
    Aquatic,
    Swamp,
    Underground,
    Urban,
    Plains,
    Coastal,
    Volcanic,
}

impl Terrain {
    /// All terrains, in scoring order. Ties in terrain scoring go to the
    /// terrain listed first.
    pub const ALL: [Terrain; 11] = [
        Terrain::Forest,
        Terrain::Desert,
        Terrain::Arctic,
        Terrain::Mountain,
        Terrain::Aquatic,
        Terrain::Swamp,
        Terrain::Underground,
        Terrain::Urban,
        Terrain::Plains,
        Terrain::Coastal,
        Terrain::Volcanic,
    ];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Terrain::Forest => "forest",
            Terrain::Desert => "desert",
            Terrain::Arctic => "arctic",
            Terrain::Mountain => "mountain",
            Terrain::Aquatic => "aquatic",
            Terrain::Swamp => "swamp",
            Terrain::Underground => "underground",
            Terrain::Urban => "urban",
            Terrain::Plains => "plains",
            Terrain::Coastal => "coastal",
            Terrain::Volcanic => "volcanic",
        }
    }

    /// Position in [`Terrain::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Terrain {
    type Err = WarbandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Terrain::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WarbandError::InvalidConfig(format!("unknown terrain '{}'", s)))
    }
}

/// Terrain selection for a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerrainFilter {
    /// No terrain restriction
    Any,
    /// Only creatures and templates fitting this terrain
    Only(Terrain),
}

impl TerrainFilter {
    /// Whether a terrain passes the filter.
    pub fn allows(self, terrain: Terrain) -> bool {
        match self {
            TerrainFilter::Any => true,
            TerrainFilter::Only(t) => t == terrain,
        }
    }

    /// The selected terrain, if any.
    pub fn terrain(self) -> Option<Terrain> {
        match self {
            TerrainFilter::Any => None,
            TerrainFilter::Only(t) => Some(t),
        }
    }
}

impl fmt::Display for TerrainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainFilter::Any => f.write_str("any"),
            TerrainFilter::Only(t) => t.fmt(f),
        }
    }
}

impl FromStr for TerrainFilter {
    type Err = WarbandError;

    fn from_str(s: &str) -> WarbandResult<Self> {
        if s.trim().eq_ignore_ascii_case("any") {
            Ok(TerrainFilter::Any)
        } else {
            s.parse().map(TerrainFilter::Only)
        }
    }
}

static PARENTHETICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*?\)").expect("valid regex"));
static POWER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(Elite|Weak|Greater|Lesser|Young|Ancient|Adult)$").expect("valid regex"));
static POWER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Elite|Weak|Greater|Lesser|Young|Ancient|Adult)\s+").expect("valid regex"));

/// Strips the first parenthetical qualifier and any power-level prefix or
/// suffix from a creature name.
///
/// # Examples
///
/// ```
/// use warband::strip_name_qualifiers;
///
/// assert_eq!(strip_name_qualifiers("Goblin Warrior (Scout)"), "Goblin Warrior");
/// assert_eq!(strip_name_qualifiers("Elite Wolf"), "Wolf");
/// assert_eq!(strip_name_qualifiers("Young Red Dragon"), "Red Dragon");
/// ```
pub fn strip_name_qualifiers(name: &str) -> String {
    let stripped = PARENTHETICAL.replace(name, "");
    let stripped = POWER_SUFFIX.replace(&stripped, "");
    let stripped = POWER_PREFIX.replace(&stripped, "");
    stripped.trim().to_string()
}
