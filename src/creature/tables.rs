//! # Classifier Tables
//!
//! Keyword data driving creature classification. Bestiary records carry no
//! structured ecology, so type, terrain and rank are all read out of names,
//! traits and descriptions against these lists.
//!
//! The built-in tables are exposed as plain data and can be replaced wholesale
//! from JSON, so new catalogs can extend the vocabulary without code changes.

use crate::creature::{CreatureType, Terrain};
use crate::WarbandResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Keywords identifying one creature type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeKeywords {
    pub creature_type: CreatureType,
    pub keywords: Vec<String>,
}

/// Free-text keywords scored against a creature's name and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainKeywords {
    pub terrain: Terrain,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub exclusions: Vec<String>,
}

/// A plain keyword list attached to a terrain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainWords {
    pub terrain: Terrain,
    pub words: Vec<String>,
}

/// Creature types that default to a terrain when scoring finds nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainDefault {
    pub terrain: Terrain,
    pub types: Vec<CreatureType>,
}

/// Name fragment that pulls a creature strongly toward one terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameBoost {
    pub terrain: Terrain,
    pub fragments: Vec<String>,
    /// Score added to `terrain` per matching fragment
    pub bonus: i32,
    /// Score changes applied to other terrains per matching fragment
    pub penalties: Vec<(Terrain, i32)>,
}

/// Leadership keyword and the rank it confers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankKeyword {
    pub keyword: String,
    pub priority: i32,
}

/// Points awarded by each kind of terrain evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainWeights {
    pub primary: i32,
    pub secondary: i32,
    pub exclusion: i32,
    pub trait_hit: i32,
    pub movement: i32,
    /// Extra aquatic score for creatures carrying the "aquatic" trait
    pub aquatic_trait: i32,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            primary: 10,
            secondary: 5,
            exclusion: -15,
            trait_hit: 7,
            movement: 6,
            aquatic_trait: 15,
        }
    }
}

/// Complete keyword data for the [`CreatureClassifier`](crate::CreatureClassifier).
///
/// List order is significant: type groups and rank keywords are first-match,
/// and terrain ties go to the terrain scored first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierTables {
    pub types: Vec<TypeKeywords>,
    pub terrains: Vec<TerrainKeywords>,
    pub trait_keywords: Vec<TerrainWords>,
    pub movement: Vec<TerrainWords>,
    pub name_boosts: Vec<NameBoost>,
    pub type_defaults: Vec<TerrainDefault>,
    pub fallback_terrain: Terrain,
    pub ranks: Vec<RankKeyword>,
    pub weights: TerrainWeights,
}

impl ClassifierTables {
    /// Loads replacement tables from a JSON file.
    pub fn from_json_file(path: &Path) -> WarbandResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn type_group(creature_type: CreatureType, keywords: &[&str]) -> TypeKeywords {
    TypeKeywords {
        creature_type,
        keywords: words(keywords),
    }
}

fn terrain_group(
    terrain: Terrain,
    primary: &[&str],
    secondary: &[&str],
    exclusions: &[&str],
) -> TerrainKeywords {
    TerrainKeywords {
        terrain,
        primary: words(primary),
        secondary: words(secondary),
        exclusions: words(exclusions),
    }
}

fn terrain_words(terrain: Terrain, list: &[&str]) -> TerrainWords {
    TerrainWords {
        terrain,
        words: words(list),
    }
}

fn rank(keyword: &str, priority: i32) -> RankKeyword {
    RankKeyword {
        keyword: keyword.to_string(),
        priority,
    }
}

impl Default for ClassifierTables {
    fn default() -> Self {
        use CreatureType::*;

        let types = vec![
            type_group(
                Humanoid,
                &["humanoid", "human", "elf", "dwarf", "orc", "goblin", "hobgoblin", "merfolk"],
            ),
            type_group(
                Undead,
                &["undead", "zombie", "skeleton", "ghost", "wraith", "lich", "vampire", "mummy"],
            ),
            type_group(
                Fiend,
                &["fiend", "demon", "devil", "daemon", "evil", "balor", "pit fiend"],
            ),
            type_group(
                Fey,
                &["fey", "fairy", "dryad", "satyr", "nymph", "redcap", "hag", "pixie", "sprite"],
            ),
            type_group(
                Dragon,
                &["dragon", "drake", "wyvern", "wyrm", "ancient", "adult", "young"],
            ),
            type_group(
                Aberration,
                &["aberration", "mind flayer", "beholder", "aboleth", "owlbear"],
            ),
            type_group(
                Construct,
                &["construct", "golem", "automaton", "animated", "clockwork"],
            ),
            type_group(
                Celestial,
                &["celestial", "angel", "archon", "azata", "solar", "deva"],
            ),
            type_group(
                Elemental,
                &["elemental", "air", "earth", "fire", "water", "magma", "ice"],
            ),
            type_group(
                Animal,
                &["animal", "wolf", "bear", "lion", "tiger", "shark", "moray", "eagle", "hawk"],
            ),
            type_group(Beast, &["beast", "dire", "giant"]),
            type_group(
                Plant,
                &["plant", "treant", "shambling", "dryad", "leshy", "mandragora"],
            ),
        ];

        let terrains = vec![
            terrain_group(
                Terrain::Forest,
                &["forest", "woodland", "grove", "canopy", "undergrowth", "sylvan"],
                &["tree", "oak", "pine", "birch", "foliage", "thicket", "druid", "ranger"],
                &["dead forest", "petrified forest"],
            ),
            terrain_group(
                Terrain::Desert,
                &["desert", "arid", "wasteland", "badlands", "dunes"],
                &["sand", "oasis", "mirage", "scorching", "parched", "nomad"],
                &["frozen desert", "arctic desert"],
            ),
            terrain_group(
                Terrain::Arctic,
                &["arctic", "tundra", "glacier", "permafrost", "boreal"],
                &["ice", "snow", "frozen", "cold", "frigid", "blizzard", "frost"],
                &["ice cave", "frozen swamp"],
            ),
            terrain_group(
                Terrain::Mountain,
                &["mountain", "peak", "summit", "alpine", "highland"],
                &["cliff", "crag", "precipice", "ridge", "slope", "elevation"],
                &["underwater mountain", "mountain cave"],
            ),
            terrain_group(
                Terrain::Aquatic,
                &["aquatic", "oceanic", "marine", "underwater", "abyssal"],
                &["water", "sea", "ocean", "lake", "river", "current", "depths"],
                &["mountain lake", "desert spring"],
            ),
            terrain_group(
                Terrain::Swamp,
                &["swamp", "marsh", "bog", "wetland", "bayou", "fen"],
                &["murky", "stagnant", "mire", "quagmire", "muddy", "damp"],
                &["frozen swamp", "dried swamp"],
            ),
            terrain_group(
                Terrain::Underground,
                &["underground", "subterranean", "cavern", "tunnel", "depths"],
                &["cave", "deep", "buried", "mining", "vault", "chamber"],
                &["sky vault", "tree cavity"],
            ),
            terrain_group(
                Terrain::Urban,
                &["urban", "city", "metropolis", "settlement", "civilized"],
                &["town", "village", "street", "building", "market", "guard"],
                &["ruined city", "abandoned town"],
            ),
            terrain_group(
                Terrain::Plains,
                &["plains", "grassland", "prairie", "steppe", "savanna"],
                &["field", "meadow", "pasture", "grazing", "open", "rolling"],
                &["salt plains", "ice plains"],
            ),
            terrain_group(
                Terrain::Coastal,
                &["coastal", "shoreline", "seaside", "littoral", "tidal"],
                &["beach", "shore", "bay", "inlet", "reef", "tide", "salt"],
                &["inland sea", "mountain shore"],
            ),
            terrain_group(
                Terrain::Volcanic,
                &["volcanic", "magma", "lava", "molten", "igneous"],
                &["volcano", "crater", "ash", "sulfur", "ember", "fire"],
                &["dormant volcano", "cold lava"],
            ),
        ];

        let trait_keywords = vec![
            terrain_words(Terrain::Aquatic, &["aquatic", "water", "swim"]),
            terrain_words(Terrain::Desert, &["fire", "heat", "arid"]),
            terrain_words(Terrain::Arctic, &["cold", "ice", "frost"]),
            terrain_words(Terrain::Underground, &["earth", "burrow", "tunnel"]),
            terrain_words(Terrain::Volcanic, &["fire", "heat", "lava"]),
            terrain_words(Terrain::Forest, &["plant", "nature", "wood"]),
            terrain_words(Terrain::Mountain, &["air", "climb", "altitude"]),
            terrain_words(Terrain::Swamp, &["poison", "disease", "decay"]),
            terrain_words(Terrain::Urban, &["construct", "civilized", "guard"]),
            terrain_words(Terrain::Plains, &["mounted", "herd", "migration"]),
            terrain_words(Terrain::Coastal, &["salt", "tide", "maritime"]),
        ];

        let movement = vec![
            terrain_words(Terrain::Aquatic, &["swim"]),
            terrain_words(Terrain::Underground, &["burrow"]),
            terrain_words(Terrain::Mountain, &["climb"]),
            terrain_words(Terrain::Desert, &["burrow", "sand"]),
            terrain_words(Terrain::Arctic, &["ice", "snow"]),
            terrain_words(Terrain::Forest, &["climb"]),
            terrain_words(Terrain::Swamp, &["swim"]),
            terrain_words(Terrain::Volcanic, &["lava"]),
            terrain_words(Terrain::Coastal, &["swim"]),
        ];

        let name_boosts = vec![
            NameBoost {
                terrain: Terrain::Aquatic,
                fragments: words(&[
                    "shark", "moray", "eel", "octopus", "squid", "whale", "dolphin", "sea",
                    "ocean", "reef", "deep", "marine", "merfolk", "sahuagin",
                ]),
                bonus: 20,
                penalties: vec![
                    (Terrain::Forest, -10),
                    (Terrain::Desert, -10),
                    (Terrain::Mountain, -10),
                    (Terrain::Plains, -10),
                ],
            },
            NameBoost {
                terrain: Terrain::Forest,
                fragments: words(&[
                    "redcap", "dryad", "treant", "leshy", "woodland", "forest", "grove", "tree",
                ]),
                bonus: 20,
                penalties: vec![(Terrain::Aquatic, -15), (Terrain::Desert, -10)],
            },
        ];

        let type_defaults = vec![
            TerrainDefault {
                terrain: Terrain::Forest,
                types: vec![Animal, Beast, Fey, Plant, Humanoid],
            },
            TerrainDefault {
                terrain: Terrain::Swamp,
                types: vec![Undead, Aberration, Beast, Humanoid],
            },
            TerrainDefault {
                terrain: Terrain::Mountain,
                types: vec![Dragon, Humanoid, Beast, Elemental],
            },
            TerrainDefault {
                terrain: Terrain::Desert,
                types: vec![Undead, Fiend, Humanoid, Elemental],
            },
            TerrainDefault {
                terrain: Terrain::Aquatic,
                types: vec![Beast, Aberration, Elemental, Humanoid],
            },
            TerrainDefault {
                terrain: Terrain::Underground,
                types: vec![Aberration, Undead, Humanoid, Construct],
            },
            TerrainDefault {
                terrain: Terrain::Urban,
                types: vec![Humanoid, Construct, Undead, Fiend],
            },
            TerrainDefault {
                terrain: Terrain::Arctic,
                types: vec![Beast, Elemental, Undead, Humanoid],
            },
            TerrainDefault {
                terrain: Terrain::Plains,
                types: vec![Humanoid, Beast, Animal, Fey],
            },
        ];

        let ranks = vec![
            rank("captain", 100),
            rank("chief", 95),
            rank("warchief", 90),
            rank("champion", 85),
            rank("commander", 80),
            rank("general", 75),
            rank("lord", 70),
            rank("king", 65),
            rank("hobgoblin", 60),
            rank("orc", 55),
            rank("bugbear", 50),
            rank("sergeant", 45),
            rank("veteran", 40),
            rank("elite", 35),
            rank("dire wolf", 30),
            rank("alpha", 25),
            rank("goblin", 20),
            rank("kobold", 15),
            rank("skeleton", 10),
            rank("zombie", 5),
            rank("minion", 1),
        ];

        Self {
            types,
            terrains,
            trait_keywords,
            movement,
            name_boosts,
            type_defaults,
            fallback_terrain: Terrain::Plains,
            ranks,
            weights: TerrainWeights::default(),
        }
    }
}
