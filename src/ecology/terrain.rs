//! # Terrain Relations
//!
//! Which terrains can border each other, and the sensory flavour attached to
//! an encounter in a given terrain.

use crate::creature::Terrain;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Symmetric conflict and adjacency relations between terrains.
///
/// Pairs are unordered: `(a, b)` relates `b` to `a` as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainRelations {
    pub conflicts: Vec<(Terrain, Terrain)>,
    pub adjacent: Vec<(Terrain, Terrain)>,
}

impl TerrainRelations {
    fn contains(pairs: &[(Terrain, Terrain)], a: Terrain, b: Terrain) -> bool {
        pairs
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }

    /// Whether two terrains are listed as opposites.
    pub fn conflict(&self, a: Terrain, b: Terrain) -> bool {
        Self::contains(&self.conflicts, a, b)
    }

    /// Whether two terrains are listed as neighbours.
    pub fn adjacent(&self, a: Terrain, b: Terrain) -> bool {
        Self::contains(&self.adjacent, a, b)
    }

    /// Whether creatures from the two terrains can plausibly meet.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Terrain, TerrainRelations};
    ///
    /// let relations = TerrainRelations::default();
    /// assert!(relations.compatible(Terrain::Forest, Terrain::Plains));
    /// assert!(!relations.compatible(Terrain::Aquatic, Terrain::Desert));
    /// assert!(!relations.compatible(Terrain::Urban, Terrain::Arctic));
    /// ```
    pub fn compatible(&self, a: Terrain, b: Terrain) -> bool {
        if a == b {
            return true;
        }
        if self.conflict(a, b) {
            return false;
        }
        self.adjacent(a, b)
    }
}

impl Default for TerrainRelations {
    fn default() -> Self {
        use Terrain::*;

        Self {
            conflicts: vec![
                (Aquatic, Desert),
                (Aquatic, Volcanic),
                (Aquatic, Arctic),
                (Desert, Swamp),
                (Desert, Arctic),
                (Arctic, Volcanic),
                (Arctic, Swamp),
                (Coastal, Desert),
            ],
            adjacent: vec![
                (Forest, Plains),
                (Forest, Mountain),
                (Forest, Swamp),
                (Forest, Coastal),
                (Plains, Mountain),
                (Plains, Desert),
                (Plains, Coastal),
                (Plains, Urban),
                (Mountain, Arctic),
                (Mountain, Volcanic),
                (Mountain, Desert),
                (Swamp, Coastal),
                (Swamp, Plains),
                (Coastal, Urban),
                (Underground, Mountain),
                (Underground, Swamp),
                (Underground, Volcanic),
                (Aquatic, Coastal),
            ],
        }
    }
}

/// One sensory detail of each kind for an encounter's surroundings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub sight: String,
    pub sound: String,
    pub smell: String,
    pub texture: String,
    pub weather: String,
}

struct SensoryPalette {
    sights: &'static [&'static str],
    sounds: &'static [&'static str],
    smells: &'static [&'static str],
    textures: &'static [&'static str],
    weather: &'static [&'static str],
}

fn palette(terrain: Terrain) -> SensoryPalette {
    match terrain {
        Terrain::Forest => SensoryPalette {
            sights: &["towering trees", "dense undergrowth", "dappled sunlight", "moss-covered logs"],
            sounds: &["rustling leaves", "birdsong", "snapping twigs", "creaking branches"],
            smells: &["damp earth", "pine needles", "wildflowers", "rotting wood"],
            textures: &["soft moss", "rough bark", "tangled roots", "springy leaf litter"],
            weather: &["light mist", "filtered sunlight", "gentle rain", "still air"],
        },
        Terrain::Desert => SensoryPalette {
            sights: &["endless dunes", "shimmering mirages", "bleached bones", "cracked earth"],
            sounds: &["howling wind", "shifting sand", "eerie silence", "distant thunder"],
            smells: &["dry dust", "hot stone", "faint sage", "sun-baked clay"],
            textures: &["burning sand", "coarse grit", "smooth stone", "brittle scrub"],
            weather: &["scorching sun", "sandstorm", "dry heat", "cold desert night"],
        },
        Terrain::Arctic => SensoryPalette {
            sights: &["endless snowfields", "blue glacier ice", "frozen waterfalls", "pale aurora"],
            sounds: &["cracking ice", "howling blizzard", "crunching snow", "muffled silence"],
            smells: &["crisp cold air", "frozen pine", "clean snow", "sharp frost"],
            textures: &["slick ice", "powdery snow", "frozen rock", "biting wind"],
            weather: &["blizzard", "freezing fog", "clear bitter cold", "light snowfall"],
        },
        Terrain::Mountain => SensoryPalette {
            sights: &["jagged peaks", "sheer cliffs", "circling raptors", "narrow switchbacks"],
            sounds: &["echoing calls", "falling rocks", "whistling wind", "distant avalanche"],
            smells: &["thin clean air", "wet granite", "alpine flowers", "cold stone"],
            textures: &["loose scree", "rough granite", "icy ledges", "sparse grass"],
            weather: &["gusting wind", "low clouds", "sudden squall", "bright thin sunlight"],
        },
        Terrain::Aquatic => SensoryPalette {
            sights: &["swaying kelp", "shafts of light", "drifting silt", "darting fish"],
            sounds: &["muffled currents", "whale song", "bubbling vents", "creaking coral"],
            smells: &["brine", "seaweed", "cold salt water", "decaying kelp"],
            textures: &["slick scales", "rough coral", "soft sand", "cold currents"],
            weather: &["strong current", "murky water", "calm depths", "churning surge"],
        },
        Terrain::Swamp => SensoryPalette {
            sights: &["hanging moss", "stagnant pools", "twisted cypress", "will-o'-wisps"],
            sounds: &["croaking frogs", "buzzing insects", "bubbling mud", "splashing water"],
            smells: &["rotting vegetation", "stagnant water", "sulfurous gas", "wet peat"],
            textures: &["sucking mud", "slimy roots", "soggy ground", "clinging vines"],
            weather: &["thick humidity", "hanging fog", "warm drizzle", "oppressive heat"],
        },
        Terrain::Underground => SensoryPalette {
            sights: &["dripping stalactites", "glowing fungi", "narrow passages", "vast caverns"],
            sounds: &["dripping water", "distant echoes", "scuttling claws", "grinding stone"],
            smells: &["damp stone", "mildew", "stale air", "bat guano"],
            textures: &["slick rock", "jagged stone", "cold puddles", "crumbling walls"],
            weather: &["still air", "cold draught", "oppressive darkness", "humid warmth"],
        },
        Terrain::Urban => SensoryPalette {
            sights: &["crowded streets", "leaning buildings", "market stalls", "flickering lanterns"],
            sounds: &["merchant cries", "clattering carts", "tolling bells", "barking dogs"],
            smells: &["wood smoke", "fresh bread", "open sewers", "horse dung"],
            textures: &["worn cobblestones", "rough plaster", "greasy railings", "packed dirt"],
            weather: &["smoky haze", "drizzle on rooftops", "noonday heat", "evening chill"],
        },
        Terrain::Plains => SensoryPalette {
            sights: &["rolling grassland", "wide open sky", "grazing herds", "lone trees"],
            sounds: &["rustling grass", "distant hoofbeats", "chirping crickets", "open wind"],
            smells: &["fresh grass", "wildflowers", "rain on soil", "dry hay"],
            textures: &["tall grass", "soft earth", "dusty tracks", "trampled sod"],
            weather: &["clear skies", "approaching storm", "gentle breeze", "heavy overcast"],
        },
        Terrain::Coastal => SensoryPalette {
            sights: &["crashing waves", "wheeling gulls", "tide pools", "weathered driftwood"],
            sounds: &["breaking surf", "crying gulls", "clinking rigging", "hissing foam"],
            smells: &["salt spray", "drying seaweed", "fish", "tar"],
            textures: &["wet sand", "slippery rocks", "sharp shells", "cold spray"],
            weather: &["sea breeze", "rolling fog", "squall off the water", "bright glare"],
        },
        Terrain::Volcanic => SensoryPalette {
            sights: &["rivers of lava", "black glass fields", "smoking vents", "ash-choked sky"],
            sounds: &["rumbling earth", "hissing steam", "cracking rock", "roaring vents"],
            smells: &["sulfur", "burning stone", "acrid smoke", "scorched air"],
            textures: &["sharp obsidian", "warm ash", "brittle pumice", "searing heat"],
            weather: &["falling ash", "choking smoke", "shimmering heat", "glowing night sky"],
        },
    }
}

fn pick(options: &[&str], rng: &mut StdRng) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

impl Atmosphere {
    /// Draws one sensory detail of each kind for a terrain.
    pub fn for_terrain(terrain: Terrain, rng: &mut StdRng) -> Self {
        let palette = palette(terrain);
        Self {
            sight: pick(palette.sights, rng),
            sound: pick(palette.sounds, rng),
            smell: pick(palette.smells, rng),
            texture: pick(palette.textures, rng),
            weather: pick(palette.weather, rng),
        }
    }

    /// Single-line description.
    pub fn describe(&self) -> String {
        format!(
            "You see {}, hear {}, and smell {}. Underfoot: {}. Weather: {}.",
            self.sight, self.sound, self.smell, self.texture, self.weather
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_relations_are_symmetric() {
        let relations = TerrainRelations::default();
        for a in Terrain::ALL {
            for b in Terrain::ALL {
                assert_eq!(relations.compatible(a, b), relations.compatible(b, a));
            }
        }
    }

    #[test]
    fn test_same_terrain_is_compatible() {
        let relations = TerrainRelations::default();
        for t in Terrain::ALL {
            assert!(relations.compatible(t, t));
        }
    }

    #[test]
    fn test_underground_links() {
        let relations = TerrainRelations::default();
        assert!(relations.compatible(Terrain::Volcanic, Terrain::Underground));
        assert!(relations.compatible(Terrain::Swamp, Terrain::Underground));
        assert!(!relations.compatible(Terrain::Underground, Terrain::Forest));
    }

    #[test]
    fn test_atmosphere_is_drawn_from_terrain() {
        let mut rng = StdRng::seed_from_u64(7);
        let atmosphere = Atmosphere::for_terrain(Terrain::Volcanic, &mut rng);
        assert!(palette(Terrain::Volcanic).smells.contains(&atmosphere.smell.as_str()));
        assert!(atmosphere.describe().starts_with("You see "));
    }

    #[test]
    fn test_every_terrain_has_details() {
        let mut rng = StdRng::seed_from_u64(1);
        for terrain in Terrain::ALL {
            let atmosphere = Atmosphere::for_terrain(terrain, &mut rng);
            assert!(!atmosphere.sight.is_empty());
            assert!(!atmosphere.weather.is_empty());
        }
    }
}
