//! # Ecology Module
//!
//! Veto rules deciding which creatures can plausibly appear together.
//!
//! Every check here is a conjunction of independent vetoes rather than a
//! score: any single rule rejecting a pair rejects it outright.

pub mod relationships;
pub mod terrain;

pub use relationships::*;
pub use terrain::*;

use crate::creature::{strip_name_qualifiers, Creature, CreatureClassifier, CreatureType, Terrain, TerrainFilter};
use crate::encounter::EncounterEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Terrains where domesticated animals are out of place.
const WILD_TERRAINS: [Terrain; 3] = [Terrain::Forest, Terrain::Swamp, Terrain::Mountain];

/// Outcome of [`EcologyValidator::validate_encounter_logic`].
///
/// Warnings never invalidate an encounter; any error does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl ValidationReport {
    fn error(&mut self, message: String) {
        self.errors.push(message);
        self.valid = false;
    }
}

/// Ecology rule engine.
#[derive(Debug, Clone, Default)]
pub struct EcologyValidator {
    classifier: CreatureClassifier,
    tables: EcologyTables,
    terrain: TerrainRelations,
}

impl EcologyValidator {
    pub fn new(classifier: CreatureClassifier, tables: EcologyTables, terrain: TerrainRelations) -> Self {
        Self {
            classifier,
            tables,
            terrain,
        }
    }

    pub fn classifier(&self) -> &CreatureClassifier {
        &self.classifier
    }

    pub fn tables(&self) -> &EcologyTables {
        &self.tables
    }

    pub fn terrain_relations(&self) -> &TerrainRelations {
        &self.terrain
    }

    /// Canonical base name used for every relationship lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::EcologyValidator;
    ///
    /// let ecology = EcologyValidator::default();
    /// assert_eq!(ecology.base_name("Goblin Warrior (Scout)"), "Goblin");
    /// assert_eq!(ecology.base_name("Elite Dire Wolf"), "Dire Wolf");
    /// assert_eq!(ecology.base_name("Gargoyle"), "Gargoyle");
    /// ```
    pub fn base_name(&self, name: &str) -> String {
        self.tables.canonical_name(&strip_name_qualifiers(name))
    }

    /// Relationship entry for a creature, if its base name has one.
    pub fn relationship(&self, creature: &Creature) -> Option<&CreatureRelationship> {
        self.tables.relationship(&self.base_name(&creature.name))
    }

    pub fn is_territorial(&self, creature: &Creature) -> bool {
        self.relationship(creature).map_or(false, |r| r.territorial)
    }

    pub fn is_solitary(&self, creature: &Creature) -> bool {
        self.relationship(creature).map_or(false, |r| r.solitary)
    }

    pub fn is_domesticated(&self, creature: &Creature) -> bool {
        self.relationship(creature).map_or(false, |r| r.domesticated)
    }

    /// Typical group size, `(1, 4)` for unknown creatures.
    pub fn pack_size(&self, creature: &Creature) -> (u32, u32) {
        self.relationship(creature)
            .map_or(DEFAULT_PACK_SIZE, |r| r.pack_size)
    }

    /// Whether either creature lists the other as a pack mate.
    pub fn can_creatures_pack(&self, a: &Creature, b: &Creature) -> bool {
        let (name_a, name_b) = (self.base_name(&a.name), self.base_name(&b.name));
        match (self.tables.relationship(&name_a), self.tables.relationship(&name_b)) {
            (Some(ra), Some(rb)) => ra.packs_with.contains(&name_b) || rb.packs_with.contains(&name_a),
            _ => false,
        }
    }

    /// Whether `leader` can lead `follower`, from either side of the relationship.
    pub fn can_creature_lead(&self, leader: &Creature, follower: &Creature) -> bool {
        let leader_name = self.base_name(&leader.name);
        let follower_name = self.base_name(&follower.name);
        match (
            self.tables.relationship(&leader_name),
            self.tables.relationship(&follower_name),
        ) {
            (Some(rl), Some(rf)) => {
                rl.leader_of.contains(&follower_name) || rf.follows_leader.contains(&leader_name)
            }
            _ => false,
        }
    }

    /// Whether a creature counts as intelligent for alignment purposes.
    pub fn is_intelligent(&self, creature: &Creature) -> bool {
        let name = creature.lower_name();
        self.tables
            .intelligent_types
            .contains(&self.classifier.creature_type(creature))
            || self
                .tables
                .intelligent_name_keywords
                .iter()
                .any(|kw| name.contains(kw.as_str()))
    }

    /// Whether one name reads as good and the other as evil.
    pub fn has_alignment_conflict(&self, a: &Creature, b: &Creature) -> bool {
        let reads_as = |name: &str, keywords: &[String]| keywords.iter().any(|kw| name.contains(kw.as_str()));
        let (name_a, name_b) = (a.lower_name(), b.lower_name());

        let good_a = reads_as(&name_a, &self.tables.good_keywords);
        let evil_a = reads_as(&name_a, &self.tables.evil_keywords);
        let good_b = reads_as(&name_b, &self.tables.good_keywords);
        let evil_b = reads_as(&name_b, &self.tables.evil_keywords);

        (good_a && evil_b) || (evil_a && good_b)
    }

    fn named_conflict(&self, base_a: &str, base_b: &str) -> bool {
        let clashes = |own: &str, other: &str| {
            self.tables
                .conflicts_for(own)
                .iter()
                .any(|enemy| enemy == other || other.contains(enemy.as_str()) || enemy.contains(other))
        };
        clashes(base_a, base_b) || clashes(base_b, base_a)
    }

    fn type_pair_listed(list: &[TypeConflicts], a: CreatureType, b: CreatureType) -> bool {
        let lists = |x: CreatureType, y: CreatureType| {
            list.iter()
                .any(|entry| entry.creature_type == x && entry.conflicts.contains(&y))
        };
        lists(a, b) || lists(b, a)
    }

    /// Whether two creatures can share an encounter.
    ///
    /// Checks run in order and the first decisive one wins: same species,
    /// named ecological conflicts, fundamental type conflicts, rival
    /// territorial species, solitary creatures, then alignment clashes
    /// between intelligent creatures.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Creature, EcologyValidator};
    ///
    /// let ecology = EcologyValidator::default();
    /// let wolf = Creature::new("Wolf", 1, &["animal"]);
    /// let bear = Creature::new("Bear", 2, &["animal"]);
    /// assert!(ecology.can_creatures_coexist(&wolf, &wolf));
    /// assert!(!ecology.can_creatures_coexist(&wolf, &bear));
    /// ```
    pub fn can_creatures_coexist(&self, a: &Creature, b: &Creature) -> bool {
        let base_a = self.base_name(&a.name);
        let base_b = self.base_name(&b.name);

        if base_a == base_b {
            return true;
        }

        if self.named_conflict(&base_a, &base_b) {
            return false;
        }

        let type_a = self.classifier.creature_type(a);
        let type_b = self.classifier.creature_type(b);
        if Self::type_pair_listed(&self.tables.coexistence_type_conflicts, type_a, type_b) {
            return false;
        }

        if self.is_territorial(a) && self.is_territorial(b) {
            return false;
        }

        if self.is_solitary(a) || self.is_solitary(b) {
            return false;
        }

        if self.is_intelligent(a) && self.is_intelligent(b) && self.has_alignment_conflict(a, b) {
            return false;
        }

        true
    }

    /// Whether two terrains can plausibly border each other.
    pub fn are_terrains_compatible(&self, a: Terrain, b: Terrain) -> bool {
        self.terrain.compatible(a, b)
    }

    /// Whether two creature types make reasonable companions.
    pub fn are_creature_types_compatible(&self, a: CreatureType, b: CreatureType) -> bool {
        a == b || !Self::type_pair_listed(&self.tables.type_incompatibilities, a, b)
    }

    /// Whether the names mark the two creatures as sworn enemies.
    pub fn are_specific_enemies(&self, a: &Creature, b: &Creature) -> bool {
        let (name_a, name_b) = (a.lower_name(), b.lower_name());
        let hates = |own: &str, other: &str, entry: &NamedConflicts| {
            own.contains(entry.name.as_str())
                && entry.enemies.iter().any(|enemy| other.contains(enemy.as_str()))
        };

        self.tables
            .specific_enemies
            .iter()
            .any(|entry| hates(&name_a, &name_b, entry) || hates(&name_b, &name_a, entry))
    }

    /// Full compatibility check used to pick companions for a primary creature.
    ///
    /// Requires coexistence, compatible preferred terrains, compatible types,
    /// and no sworn enmity.
    pub fn are_monsters_compatible(&self, a: &Creature, b: &Creature) -> bool {
        if !self.can_creatures_coexist(a, b) {
            return false;
        }

        let terrain_a = self.classifier.preferred_terrain(a);
        let terrain_b = self.classifier.preferred_terrain(b);
        if !self.are_terrains_compatible(terrain_a, terrain_b) {
            return false;
        }

        let type_a = self.classifier.creature_type(a);
        let type_b = self.classifier.creature_type(b);
        if !self.are_creature_types_compatible(type_a, type_b) {
            return false;
        }

        !self.are_specific_enemies(a, b)
    }

    /// Reviews a composed encounter.
    ///
    /// Domesticated creatures in wild terrain and unusual group sizes produce
    /// warnings. Rival territorial species and any pair that cannot coexist
    /// produce errors and mark the report invalid.
    pub fn validate_encounter_logic(&self, entries: &[EncounterEntry], terrain: TerrainFilter) -> ValidationReport {
        let mut report = ValidationReport::default();

        if let Some(t) = terrain.terrain() {
            let domesticated: Vec<&str> = entries
                .iter()
                .filter(|e| self.is_domesticated(&e.creature))
                .map(|e| e.creature.name.as_str())
                .collect();
            if !domesticated.is_empty() && WILD_TERRAINS.contains(&t) {
                report.warnings.push(format!(
                    "Domesticated creatures ({}) unlikely in wild {}",
                    domesticated.join(", "),
                    t
                ));
            }
        }

        let mut territorial_species = BTreeSet::new();
        let mut territorial_names = Vec::new();
        for entry in entries.iter().filter(|e| self.is_territorial(&e.creature)) {
            if territorial_species.insert(self.base_name(&entry.creature.name)) {
                territorial_names.push(entry.creature.name.as_str());
            }
        }
        if territorial_species.len() > 1 {
            report.error(format!(
                "Multiple territorial species cannot coexist: {}",
                territorial_names.join(", ")
            ));
        }

        for entry in entries {
            let (min, max) = self.pack_size(&entry.creature);
            if entry.count < min || entry.count > max {
                report.warnings.push(format!(
                    "{} pack size ({}) unusual (typical: {}-{})",
                    entry.creature.name, entry.count, min, max
                ));
            }
        }

        for (i, first) in entries.iter().enumerate() {
            for second in &entries[i + 1..] {
                if !self.can_creatures_coexist(&first.creature, &second.creature) {
                    report.error(format!(
                        "{} and {} are natural enemies",
                        first.creature.name, second.creature.name
                    ));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ecology() -> EcologyValidator {
        EcologyValidator::default()
    }

    fn entry(creature: Creature, count: u32) -> EncounterEntry {
        EncounterEntry::new(creature, count, 1)
    }

    #[test]
    fn test_same_species_always_coexist() {
        let e = ecology();
        let dragon = Creature::new("Red Dragon", 10, &["dragon", "fire"]);
        let young = Creature::new("Young Red Dragon", 8, &["dragon", "fire"]);
        assert!(e.can_creatures_coexist(&dragon, &young));
    }

    #[test]
    fn test_named_conflict_by_substring() {
        let e = ecology();
        let troll = Creature::new("Forest Troll", 5, &["giant", "troll"]);
        let ogre = Creature::new("Ogre", 3, &["giant"]);
        assert!(!e.can_creatures_coexist(&ogre, &troll));
    }

    #[test]
    fn test_type_conflict() {
        let e = ecology();
        let angel = Creature::new("Astral Deva", 14, &["celestial"]);
        let ghoul = Creature::new("Ghoul", 1, &["undead"]);
        assert!(!e.can_creatures_coexist(&angel, &ghoul));
    }

    #[test]
    fn test_solitary_creature_rejects_companions() {
        let e = ecology();
        let tiger = Creature::new("Tiger", 4, &["animal"]);
        let goblin = Creature::new("Goblin Warrior", 1, &["goblin", "humanoid"]);
        assert!(e.is_solitary(&tiger));
        assert!(!e.can_creatures_coexist(&tiger, &goblin));
        assert!(!e.can_creatures_coexist(&goblin, &tiger));
    }

    #[test]
    fn test_alignment_conflict_requires_intelligence() {
        let e = ecology();
        let paladin = Creature::new("Human Paladin", 3, &["human", "humanoid"]);
        let cultist = Creature::new("Dark Cultist", 2, &["human", "humanoid"]);
        assert!(e.has_alignment_conflict(&paladin, &cultist));
        assert!(!e.can_creatures_coexist(&paladin, &cultist));

        let rat = Creature::new("Dark Rat", 0, &["animal"]);
        assert!(!e.is_intelligent(&rat));
        assert!(e.can_creatures_coexist(&paladin, &rat));
    }

    #[test]
    fn test_goblins_pack_and_follow() {
        let e = ecology();
        let goblin = Creature::new("Goblin Warrior", -1, &["goblin", "humanoid"]);
        let chief = Creature::new("Goblin Chief", 2, &["goblin", "humanoid"]);
        let hobgoblin = Creature::new("Hobgoblin Soldier", 1, &["hobgoblin", "humanoid"]);
        assert!(e.can_creatures_coexist(&goblin, &chief));
        assert!(e.can_creatures_pack(&goblin, &hobgoblin));
        assert!(e.can_creature_lead(&chief, &goblin));
        assert!(!e.can_creature_lead(&goblin, &chief));
    }

    #[test]
    fn test_specific_enemies() {
        let e = ecology();
        let moray = Creature::new("Giant Moray Eel", 5, &["animal", "aquatic"]);
        let redcap = Creature::new("Redcap", 5, &["fey"]);
        assert!(e.are_specific_enemies(&moray, &redcap));
        assert!(e.are_specific_enemies(&redcap, &moray));
        assert!(!e.are_monsters_compatible(&moray, &redcap));
    }

    #[test]
    fn test_monsters_compatible_requires_terrain() {
        let e = ecology();
        let shark = Creature::new("Shark", 2, &["animal", "aquatic"]).with_speeds(&["swim"]);
        let scorpion = Creature::new("Desert Scorpion", 3, &["animal"])
            .with_description("A hunter of the desert dunes.");
        assert!(!e.are_monsters_compatible(&shark, &scorpion));

        let goblin = Creature::new("Goblin Warrior", -1, &["goblin", "humanoid"]);
        let chief = Creature::new("Goblin Chief", 2, &["goblin", "humanoid"]);
        assert!(e.are_monsters_compatible(&goblin, &chief));
    }

    #[test]
    fn test_creature_type_compatibility() {
        let e = ecology();
        assert!(e.are_creature_types_compatible(CreatureType::Animal, CreatureType::Animal));
        assert!(!e.are_creature_types_compatible(CreatureType::Animal, CreatureType::Construct));
        assert!(!e.are_creature_types_compatible(CreatureType::Fey, CreatureType::Aberration));
        assert!(e.are_creature_types_compatible(CreatureType::Humanoid, CreatureType::Dragon));
    }

    #[test]
    fn test_validate_rival_territorial_species() {
        let e = ecology();
        let entries = vec![
            entry(Creature::new("Bear", 2, &["animal"]), 1),
            entry(Creature::new("Lion", 1, &["animal"]), 2),
        ];
        let report = e.validate_encounter_logic(&entries, TerrainFilter::Any);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|m| m.starts_with("Multiple territorial species")));
    }

    #[test]
    fn test_validate_warnings_do_not_invalidate() {
        let e = ecology();
        let entries = vec![
            entry(Creature::new("War Horse", 2, &["animal"]), 2),
            entry(Creature::new("Goblin Warrior", -1, &["goblin", "humanoid"]), 1),
        ];
        let report = e.validate_encounter_logic(&entries, TerrainFilter::Only(Terrain::Forest));
        assert!(report.valid, "{:?}", report.errors);
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_validate_same_territorial_species_is_fine() {
        let e = ecology();
        let entries = vec![
            entry(Creature::new("Wolf", 1, &["animal"]), 3),
            entry(Creature::new("Elite Wolf", 1, &["animal"]), 1),
        ];
        let report = e.validate_encounter_logic(&entries, TerrainFilter::Any);
        assert!(report.valid);
    }
}
