//! # Creature Classifier
//!
//! Infers creature type, preferred terrain and leadership rank from free text.
//!
//! Every method is a pure function of the creature and the keyword tables, so
//! classification is reproducible and the tables can be swapped in tests.

use crate::creature::{strip_name_qualifiers, ClassifierTables, Creature, CreatureType, Terrain};
use std::collections::BTreeMap;

/// Keyword-driven classifier over a set of [`ClassifierTables`].
#[derive(Debug, Clone, Default)]
pub struct CreatureClassifier {
    tables: ClassifierTables,
}

impl CreatureClassifier {
    /// Creates a classifier over custom keyword tables.
    pub fn new(tables: ClassifierTables) -> Self {
        Self { tables }
    }

    /// The keyword tables in use.
    pub fn tables(&self) -> &ClassifierTables {
        &self.tables
    }

    /// Coarse creature type.
    ///
    /// Name and traits are scanned against the type groups in order and the
    /// first group with a matching keyword wins. Unmatched creatures are
    /// humanoid.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Creature, CreatureClassifier, CreatureType};
    ///
    /// let classifier = CreatureClassifier::default();
    /// let golem = Creature::new("Iron Golem", 13, &["construct", "golem"]);
    /// assert_eq!(classifier.creature_type(&golem), CreatureType::Construct);
    /// ```
    pub fn creature_type(&self, creature: &Creature) -> CreatureType {
        let text = format!("{} {}", creature.lower_name(), creature.trait_string());

        self.tables
            .types
            .iter()
            .find(|group| group.keywords.iter().any(|kw| text.contains(kw.as_str())))
            .map(|group| group.creature_type)
            .unwrap_or(CreatureType::Humanoid)
    }

    /// Score of every terrain for a creature, in [`Terrain::ALL`] order.
    pub fn terrain_scores(&self, creature: &Creature) -> [i32; 11] {
        let weights = self.tables.weights;
        let name = creature.lower_name();
        let description = creature.description.to_lowercase();
        let traits = creature.trait_string();
        let mentions = |kw: &str| name.contains(kw) || description.contains(kw);

        let mut scores = [0i32; 11];

        for group in &self.tables.terrains {
            let score = &mut scores[group.terrain.index()];
            for kw in &group.primary {
                if mentions(kw) {
                    *score += weights.primary;
                }
            }
            for kw in &group.secondary {
                if mentions(kw) {
                    *score += weights.secondary;
                }
            }
            for kw in &group.exclusions {
                if mentions(kw) {
                    *score += weights.exclusion;
                }
            }
        }

        for group in &self.tables.trait_keywords {
            let hits = group
                .words
                .iter()
                .filter(|kw| traits.contains(kw.as_str()))
                .count() as i32;
            scores[group.terrain.index()] += hits * weights.trait_hit;
        }

        for group in &self.tables.movement {
            let hits = group
                .words
                .iter()
                .filter(|kw| creature.speeds.iter().any(|s| s.eq_ignore_ascii_case(kw)))
                .count() as i32;
            scores[group.terrain.index()] += hits * weights.movement;
        }

        if traits.contains("aquatic") {
            scores[Terrain::Aquatic.index()] += weights.aquatic_trait;
        }

        for boost in &self.tables.name_boosts {
            for fragment in &boost.fragments {
                if name.contains(fragment.as_str()) {
                    scores[boost.terrain.index()] += boost.bonus;
                    for (terrain, delta) in &boost.penalties {
                        scores[terrain.index()] += delta;
                    }
                }
            }
        }

        scores
    }

    /// Preferred terrain.
    ///
    /// The highest scoring terrain wins, ties going to the terrain scored
    /// first. When nothing scores above zero the creature type decides.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Creature, CreatureClassifier, Terrain};
    ///
    /// let classifier = CreatureClassifier::default();
    /// let shark = Creature::new("Shark", 2, &["animal", "aquatic"]).with_speeds(&["swim"]);
    /// assert_eq!(classifier.preferred_terrain(&shark), Terrain::Aquatic);
    /// ```
    pub fn preferred_terrain(&self, creature: &Creature) -> Terrain {
        let scores = self.terrain_scores(creature);

        let mut best: Option<Terrain> = None;
        let mut best_score = 0;
        for terrain in Terrain::ALL {
            let score = scores[terrain.index()];
            if score > best_score {
                best_score = score;
                best = Some(terrain);
            }
        }

        match best {
            Some(terrain) => terrain,
            None => self.default_terrain_for(self.creature_type(creature)),
        }
    }

    /// Terrain assumed for a creature type when the text gives no evidence.
    pub fn default_terrain_for(&self, creature_type: CreatureType) -> Terrain {
        self.tables
            .type_defaults
            .iter()
            .find(|default| default.types.contains(&creature_type))
            .map(|default| default.terrain)
            .unwrap_or(self.tables.fallback_terrain)
    }

    /// Leadership rank for a creature name at a given level.
    ///
    /// The first rank keyword found in the name or its base name decides;
    /// otherwise the level is the rank.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::CreatureClassifier;
    ///
    /// let classifier = CreatureClassifier::default();
    /// assert_eq!(classifier.leadership_priority("Bandit Captain", 2), 100);
    /// assert_eq!(classifier.leadership_priority("Wolf", 1), 1);
    /// ```
    pub fn leadership_priority(&self, name: &str, level: i32) -> i32 {
        let lower = name.to_lowercase();
        let base = strip_name_qualifiers(name).to_lowercase();

        self.tables
            .ranks
            .iter()
            .find(|r| lower.contains(r.keyword.as_str()) || base.contains(r.keyword.as_str()))
            .map(|r| r.priority)
            .unwrap_or(level)
    }

    /// Creatures whose preferred terrain is `terrain`.
    pub fn filter_by_terrain<'a>(&self, creatures: &'a [Creature], terrain: Terrain) -> Vec<&'a Creature> {
        creatures
            .iter()
            .filter(|c| self.preferred_terrain(c) == terrain)
            .collect()
    }

    /// Number of creatures preferring each terrain.
    pub fn terrain_counts(&self, creatures: &[Creature]) -> BTreeMap<Terrain, usize> {
        let mut counts = BTreeMap::new();
        for creature in creatures {
            *counts.entry(self.preferred_terrain(creature)).or_insert(0) += 1;
        }
        counts
    }
}
