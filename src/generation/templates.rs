//! # Encounter Templates
//!
//! Narrative encounter shapes: an ordered list of roles, each filled by one of
//! a few named species, with a count range. The composer tries these before
//! falling back to unstructured random composition.

use crate::creature::{Terrain, TerrainFilter};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive creature count range for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
        }
    }

    pub fn exactly(count: u32) -> Self {
        Self::new(count, count)
    }

    /// Draws a count uniformly from the range.
    pub fn roll(self, rng: &mut StdRng) -> u32 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    pub fn contains(self, count: u32) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

/// One role within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSlot {
    pub role: String,
    /// Species names that can fill the role
    pub creatures: Vec<String>,
    pub count: CountRange,
}

/// A narrative encounter shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub terrain: Vec<Terrain>,
    pub structure: Vec<RoleSlot>,
    pub motivation: String,
    pub setup: String,
    #[serde(default)]
    pub mounted: bool,
}

impl EncounterTemplate {
    /// Whether the template can be used under a terrain filter.
    pub fn fits(&self, filter: TerrainFilter) -> bool {
        match filter {
            TerrainFilter::Any => true,
            TerrainFilter::Only(t) => self.terrain.contains(&t),
        }
    }

    /// Role names in order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.structure.iter().map(|slot| slot.role.as_str())
    }

    /// All species named by any role.
    pub fn species(&self) -> impl Iterator<Item = &str> {
        self.structure
            .iter()
            .flat_map(|slot| slot.creatures.iter().map(String::as_str))
    }
}

/// Templates usable under a terrain filter, in catalog order.
pub fn templates_for(templates: &[EncounterTemplate], filter: TerrainFilter) -> Vec<&EncounterTemplate> {
    templates.iter().filter(|t| t.fits(filter)).collect()
}

/// Picks a random template usable under a terrain filter.
pub fn choose_template<'a>(
    templates: &'a [EncounterTemplate],
    filter: TerrainFilter,
    rng: &mut StdRng,
) -> Option<&'a EncounterTemplate> {
    templates_for(templates, filter).choose(rng).copied()
}

fn slot(role: &str, creatures: &[&str], min: u32, max: u32) -> RoleSlot {
    RoleSlot {
        role: role.to_string(),
        creatures: creatures.iter().map(|c| c.to_string()).collect(),
        count: CountRange::new(min, max),
    }
}

fn template(
    id: &str,
    name: &str,
    description: &str,
    terrain: &[Terrain],
    structure: Vec<RoleSlot>,
    motivation: &str,
    setup: &str,
) -> EncounterTemplate {
    EncounterTemplate {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        terrain: terrain.to_vec(),
        structure,
        motivation: motivation.to_string(),
        setup: setup.to_string(),
        mounted: false,
    }
}

/// The built-in template set.
///
/// # Examples
///
/// ```
/// use warband::built_in_templates;
///
/// let templates = built_in_templates();
/// assert!(templates.iter().any(|t| t.id == "goblin_warren"));
/// ```
pub fn built_in_templates() -> Vec<EncounterTemplate> {
    use Terrain::*;

    let mut cavalry = template(
        "cavalry_patrol",
        "Cavalry Patrol",
        "Mounted soldiers on patrol",
        &[Plains, Urban],
        vec![
            slot("captain", &["Human"], 1, 1),
            slot("cavalry", &["Human"], 3, 6),
            slot("mount", &["War Horse"], 4, 7),
        ],
        "patrol",
        "mobile",
    );
    cavalry.mounted = true;

    vec![
        template(
            "bandit_ambush",
            "Bandit Ambush",
            "Bandits lying in wait for travelers",
            &[Forest, Mountain, Plains],
            vec![
                slot("leader", &["Bandit Captain"], 1, 1),
                slot("elite", &["Bandit", "Rogue"], 2, 3),
                slot("minion", &["Bandit"], 3, 6),
            ],
            "robbery",
            "hidden_ambush",
        ),
        template(
            "bandit_camp",
            "Bandit Camp",
            "A fortified bandit encampment",
            &[Forest, Mountain],
            vec![
                slot("leader", &["Bandit Captain"], 1, 1),
                slot("lieutenant", &["Bandit"], 2, 4),
                slot("guard", &["Bandit"], 4, 8),
            ],
            "territorial",
            "fortified",
        ),
        template(
            "wolf_pack_hunting",
            "Wolf Pack Hunt",
            "A pack of wolves on the prowl",
            &[Forest, Mountain, Plains],
            vec![
                slot("alpha", &["Dire Wolf"], 1, 1),
                slot("pack", &["Wolf"], 3, 6),
            ],
            "hunting",
            "stalking",
        ),
        template(
            "dire_wolf_territory",
            "Dire Wolf Territory",
            "Dire wolves defending their territory",
            &[Forest, Mountain],
            vec![
                slot("alpha", &["Dire Wolf"], 1, 2),
                slot("pack", &["Wolf"], 2, 4),
            ],
            "territorial",
            "defending",
        ),
        template(
            "goblin_raid",
            "Goblin Raiding Party",
            "Goblins raiding for supplies",
            &[Forest, Mountain, Plains],
            vec![
                slot("leader", &["Goblin Chief"], 1, 1),
                slot("warrior", &["Goblin"], 2, 4),
                slot("scout", &["Goblin"], 3, 6),
            ],
            "raiding",
            "mobile",
        ),
        template(
            "goblin_warren",
            "Goblin Warren",
            "A goblin settlement under threat",
            &[Forest, Underground, Mountain],
            vec![
                slot("chief", &["Goblin Chief"], 1, 1),
                slot("shaman", &["Goblin"], 1, 1),
                slot("warrior", &["Goblin"], 4, 8),
                slot("civilian", &["Goblin"], 6, 12),
            ],
            "defensive",
            "fortified",
        ),
        template(
            "undead_patrol",
            "Undead Patrol",
            "Undead guardians on patrol",
            &[Swamp, Underground, Urban],
            vec![
                slot("commander", &["Skeleton Champion"], 1, 1),
                slot("guard", &["Skeleton"], 4, 6),
                slot("minion", &["Skeleton"], 6, 10),
            ],
            "patrol",
            "organized",
        ),
        template(
            "zombie_horde",
            "Zombie Horde",
            "A shambling mass of undead",
            &[Swamp, Urban, Plains],
            vec![slot("horde", &["Zombie"], 8, 16)],
            "mindless",
            "wandering",
        ),
        template(
            "forest_guardians",
            "Forest Guardians",
            "Fey protecting their woodland home",
            &[Forest],
            vec![
                slot("guardian", &["Dryad"], 1, 1),
                slot("sprite", &["Pixie"], 4, 8),
                slot("ally", &["Unicorn"], 0, 1),
            ],
            "protection",
            "territorial",
        ),
        template(
            "dragon_lair",
            "Dragon's Lair",
            "A dragon with its servants",
            &[Mountain, Underground, Swamp],
            vec![
                slot("dragon", &["Dragon"], 1, 1),
                slot("servant", &["Kobold"], 6, 12),
                slot("guard", &["Construct"], 2, 4),
            ],
            "territorial",
            "lair",
        ),
        template(
            "territorial_bear",
            "Territorial Bear",
            "A bear protecting its territory",
            &[Forest, Mountain],
            vec![
                slot("guardian", &["Bear"], 1, 1),
                slot("cubs", &["Bear"], 0, 2),
            ],
            "territorial",
            "defending",
        ),
        cavalry,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_count_range_roll() {
        let mut rng = StdRng::seed_from_u64(3);
        let range = CountRange::new(3, 6);
        for _ in 0..100 {
            assert!(range.contains(range.roll(&mut rng)));
        }
        assert_eq!(CountRange::exactly(1).roll(&mut rng), 1);
        assert_eq!(CountRange::new(5, 2), CountRange::new(2, 5));
    }

    #[test]
    fn test_built_in_templates() {
        let templates = built_in_templates();
        assert_eq!(templates.len(), 12);
        let cavalry = templates.iter().find(|t| t.id == "cavalry_patrol").unwrap();
        assert!(cavalry.mounted);
        assert_eq!(cavalry.roles().collect::<Vec<_>>(), vec!["captain", "cavalry", "mount"]);
    }

    #[test]
    fn test_terrain_filtering() {
        let templates = built_in_templates();
        let forest = templates_for(&templates, TerrainFilter::Only(Terrain::Forest));
        assert_eq!(forest.len(), 8);
        assert!(templates_for(&templates, TerrainFilter::Only(Terrain::Aquatic)).is_empty());
        assert_eq!(templates_for(&templates, TerrainFilter::Any).len(), templates.len());
    }

    #[test]
    fn test_choose_template_respects_filter() {
        let templates = built_in_templates();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let chosen = choose_template(&templates, TerrainFilter::Only(Terrain::Swamp), &mut rng).unwrap();
            assert!(chosen.terrain.contains(&Terrain::Swamp));
        }
        assert!(choose_template(&templates, TerrainFilter::Only(Terrain::Desert), &mut rng).is_none());
    }
}
