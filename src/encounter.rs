//! # Encounters
//!
//! The composed encounter handed to callers, and the immutable edits a game
//! master can make to it afterwards.

use crate::creature::{strip_name_qualifiers, Creature, TerrainFilter};
use crate::ecology::{Atmosphere, ValidationReport};
use crate::generation::{EncounterTemplate, PartyConfig, Variant};
use crate::rules::creature_xp;
use crate::{WarbandError, WarbandResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A group of identical creatures within an encounter.
///
/// Entries are values: every edit returns a new entry with its XP recomputed,
/// so `xp` always equals `count` times the per-creature XP at the adjusted
/// level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterEntry {
    /// Unadjusted statblock
    pub creature: Creature,
    pub count: u32,
    pub xp: u32,
    pub role: Option<String>,
    pub variant: Variant,
    pub adjusted_level: i32,
    /// Party level the XP was computed against
    pub party_level: i32,
}

impl EncounterEntry {
    /// Creates a normal-variant entry. Counts below one are raised to one.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Creature, EncounterEntry};
    ///
    /// let entry = EncounterEntry::new(Creature::new("Wolf", 1, &["animal"]), 3, 1);
    /// assert_eq!(entry.xp, 120);
    /// ```
    pub fn new(creature: Creature, count: u32, party_level: i32) -> Self {
        let adjusted_level = creature.level;
        let mut entry = Self {
            creature,
            count: count.max(1),
            xp: 0,
            role: None,
            variant: Variant::Normal,
            adjusted_level,
            party_level,
        };
        entry.xp = entry.count * entry.per_creature_xp();
        entry
    }

    /// XP of a single creature in this entry.
    pub fn per_creature_xp(&self) -> u32 {
        creature_xp(self.adjusted_level, self.party_level)
    }

    /// Same creatures under a different variant.
    ///
    /// Switching back to the original variant restores the original level and
    /// XP exactly.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::{Creature, EncounterEntry, Variant};
    ///
    /// let entry = EncounterEntry::new(Creature::new("Ogre", 3, &["giant"]), 1, 3);
    /// let elite = entry.with_variant(Variant::Elite);
    /// assert_eq!(elite.adjusted_level, 5);
    /// assert_eq!(elite.xp, 80);
    /// assert_eq!(elite.with_variant(Variant::Normal), entry);
    /// ```
    pub fn with_variant(&self, variant: Variant) -> Self {
        let mut entry = self.clone();
        entry.variant = variant;
        entry.adjusted_level = variant.adjusted_level(self.creature.level);
        entry.xp = entry.count * entry.per_creature_xp();
        entry
    }

    /// Same creatures in a different number.
    pub fn with_count(&self, count: u32) -> Self {
        let mut entry = self.clone();
        entry.count = count.max(1);
        entry.xp = entry.count * entry.per_creature_xp();
        entry
    }

    /// Same creatures with a role label.
    pub fn with_role(&self, role: &str) -> Self {
        let mut entry = self.clone();
        entry.role = Some(role.to_string());
        entry
    }

    /// Statblock with the variant applied.
    pub fn variant_creature(&self) -> Creature {
        self.variant.apply(&self.creature)
    }

    /// Name with any variant prefix.
    pub fn display_name(&self) -> String {
        format!("{}{}", self.variant.prefix(), self.creature.name)
    }

    /// Whether the entry's XP matches its count and level.
    pub fn is_consistent(&self) -> bool {
        self.count >= 1 && self.xp == self.count * self.per_creature_xp()
    }
}

/// How an encounter came to be.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum EncounterSource {
    /// Built from a narrative template
    Template { id: String, name: String },
    /// Composed by the random fallback
    Random,
    /// Assembled or edited by hand
    Manual,
}

/// A complete encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: Uuid,
    pub party: PartyConfig,
    pub terrain: TerrainFilter,
    pub target_xp: i32,
    pub entries: Vec<EncounterEntry>,
    pub source: EncounterSource,
    pub validation: ValidationReport,
    pub atmosphere: Option<Atmosphere>,
}

impl Encounter {
    /// Creates an empty, manually assembled encounter.
    pub fn new(party: PartyConfig, terrain: TerrainFilter) -> Self {
        Self {
            id: Uuid::new_v4(),
            party,
            terrain,
            target_xp: party.target_xp(),
            entries: Vec::new(),
            source: EncounterSource::Manual,
            validation: ValidationReport::default(),
            atmosphere: None,
        }
    }

    /// Sum of entry XP.
    pub fn total_xp(&self) -> u32 {
        self.entries.iter().map(|e| e.xp).sum()
    }

    /// Number of individual creatures.
    pub fn creature_count(&self) -> u32 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total XP as a fraction of the target budget.
    pub fn budget_ratio(&self) -> f64 {
        if self.target_xp <= 0 {
            0.0
        } else {
            self.total_xp() as f64 / self.target_xp as f64
        }
    }

    /// Copy with `count` more of `creature`.
    ///
    /// An existing entry for the same creature absorbs the count; otherwise a
    /// new normal-variant entry is appended. The copy is marked manual.
    pub fn with_creature_added(&self, creature: &Creature, count: u32) -> WarbandResult<Self> {
        if count == 0 {
            return Err(WarbandError::InvalidAction(
                "cannot add zero creatures".to_string(),
            ));
        }

        let mut encounter = self.clone();
        match encounter
            .entries
            .iter()
            .position(|e| e.creature.name == creature.name)
        {
            Some(index) => {
                let existing = &encounter.entries[index];
                let total = existing.count.checked_add(count).ok_or_else(|| too_many(creature))?;
                total
                    .checked_mul(existing.per_creature_xp())
                    .ok_or_else(|| too_many(creature))?;
                encounter.entries[index] = existing.with_count(total);
            }
            None => {
                count
                    .checked_mul(creature_xp(creature.level, self.party.level))
                    .ok_or_else(|| too_many(creature))?;
                encounter
                    .entries
                    .push(EncounterEntry::new(creature.clone(), count, self.party.level));
            }
        }
        encounter.source = EncounterSource::Manual;
        Ok(encounter)
    }

    /// Copy with one entry switched to a different variant.
    pub fn with_entry_variant(&self, index: usize, variant: Variant) -> WarbandResult<Self> {
        let entry = self.entry(index)?;
        let mut encounter = self.clone();
        encounter.entries[index] = entry.with_variant(variant);
        Ok(encounter)
    }

    /// Copy with one entry removed.
    pub fn without_entry(&self, index: usize) -> WarbandResult<Self> {
        self.entry(index)?;
        let mut encounter = self.clone();
        encounter.entries.remove(index);
        encounter.source = EncounterSource::Manual;
        Ok(encounter)
    }

    fn entry(&self, index: usize) -> WarbandResult<&EncounterEntry> {
        self.entries.get(index).ok_or_else(|| {
            WarbandError::InvalidAction(format!(
                "entry {} out of range ({} entries)",
                index,
                self.entries.len()
            ))
        })
    }

    /// The template this encounter most plausibly came from.
    ///
    /// A template matches when every role label in the encounter is one of the
    /// template's roles and at least one creature overlaps by name with the
    /// species the template calls for.
    pub fn matching_template<'a>(&self, templates: &'a [EncounterTemplate]) -> Option<&'a EncounterTemplate> {
        if self.entries.is_empty() {
            return None;
        }

        let bases: Vec<String> = self
            .entries
            .iter()
            .map(|e| strip_name_qualifiers(&e.creature.name))
            .collect();

        templates.iter().find(|template| {
            let roles_match = self
                .entries
                .iter()
                .filter_map(|e| e.role.as_deref())
                .all(|role| template.roles().any(|r| r == role));

            let creatures_match = bases.iter().any(|base| {
                template
                    .species()
                    .any(|species| base.contains(species) || species.contains(base.as_str()))
            });

            roles_match && creatures_match
        })
    }
}

impl fmt::Display for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Encounter for {} level-{} characters ({}, terrain: {})",
            self.party.size, self.party.level, self.party.difficulty, self.terrain
        )?;
        if let EncounterSource::Template { name, .. } = &self.source {
            writeln!(f, "Template: {}", name)?;
        }
        for entry in &self.entries {
            let role = entry
                .role
                .as_deref()
                .map(|r| format!(" [{}]", r))
                .unwrap_or_default();
            writeln!(
                f,
                "  {} x{} (level {}){} - {} XP",
                entry.display_name(),
                entry.count,
                entry.adjusted_level,
                role,
                entry.xp
            )?;
        }
        writeln!(f, "Total XP: {} / {}", self.total_xp(), self.target_xp)?;
        for warning in &self.validation.warnings {
            writeln!(f, "  warning: {}", warning)?;
        }
        for error in &self.validation.errors {
            writeln!(f, "  error: {}", error)?;
        }
        if let Some(atmosphere) = &self.atmosphere {
            writeln!(f, "{}", atmosphere.describe())?;
        }
        Ok(())
    }
}

fn too_many(creature: &Creature) -> WarbandError {
    WarbandError::InvalidAction(format!("too many {} to count", creature.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::built_in_templates;
    use crate::rules::Difficulty;

    fn party() -> PartyConfig {
        PartyConfig::new(1, 4, Difficulty::Moderate).unwrap()
    }

    #[test]
    fn test_entry_xp_tracks_count_and_variant() {
        let entry = EncounterEntry::new(Creature::new("Goblin Warrior", -1, &["goblin"]), 4, 1);
        assert_eq!(entry.xp, 80);
        assert_eq!(entry.with_count(2).xp, 40);
        let weak = entry.with_variant(Variant::Weak);
        assert_eq!(weak.adjusted_level, -1);
        assert_eq!(weak.xp, 80);
        assert!(weak.is_consistent());
    }

    #[test]
    fn test_variant_round_trip() {
        let entry = EncounterEntry::new(Creature::new("Orc Brute", 2, &["orc"]), 2, 2);
        let back = entry.with_variant(Variant::Weak).with_variant(Variant::Normal);
        assert_eq!(back.adjusted_level, entry.adjusted_level);
        assert_eq!(back.xp, entry.xp);
    }

    #[test]
    fn test_zero_count_is_raised() {
        let entry = EncounterEntry::new(Creature::new("Wolf", 1, &["animal"]), 0, 1);
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn test_with_creature_added_merges() {
        let wolf = Creature::new("Wolf", 1, &["animal"]);
        let encounter = Encounter::new(party(), TerrainFilter::Any)
            .with_creature_added(&wolf, 2)
            .unwrap()
            .with_creature_added(&wolf, 1)
            .unwrap();
        assert_eq!(encounter.entries.len(), 1);
        assert_eq!(encounter.entries[0].count, 3);
        assert_eq!(encounter.total_xp(), 120);
        assert!(Encounter::new(party(), TerrainFilter::Any)
            .with_creature_added(&wolf, 0)
            .is_err());
    }

    #[test]
    fn test_oversized_add_is_rejected() {
        let wolf = Creature::new("Wolf", 1, &["animal"]);
        let empty = Encounter::new(party(), TerrainFilter::Any);
        assert!(matches!(
            empty.with_creature_added(&wolf, u32::MAX),
            Err(WarbandError::InvalidAction(_))
        ));

        let encounter = empty.with_creature_added(&wolf, 2).unwrap();
        assert!(matches!(
            encounter.with_creature_added(&wolf, u32::MAX - 1),
            Err(WarbandError::InvalidAction(_))
        ));
        assert!(matches!(
            encounter.with_creature_added(&wolf, u32::MAX / 40),
            Err(WarbandError::InvalidAction(_))
        ));
        assert_eq!(encounter.entries[0].count, 2);
    }

    #[test]
    fn test_with_entry_variant() {
        let ogre = Creature::new("Ogre", 3, &["giant"]);
        let encounter = Encounter::new(party(), TerrainFilter::Any)
            .with_creature_added(&ogre, 1)
            .unwrap();
        let elite = encounter.with_entry_variant(0, Variant::Elite).unwrap();
        assert_eq!(elite.entries[0].display_name(), "Elite Ogre");
        assert_eq!(elite.total_xp(), 160);
        assert!(matches!(
            encounter.with_entry_variant(3, Variant::Elite),
            Err(WarbandError::InvalidAction(_))
        ));
    }

    #[test]
    fn test_without_entry() {
        let wolf = Creature::new("Wolf", 1, &["animal"]);
        let encounter = Encounter::new(party(), TerrainFilter::Any)
            .with_creature_added(&wolf, 2)
            .unwrap();
        assert!(encounter.without_entry(0).unwrap().is_empty());
        assert!(encounter.without_entry(1).is_err());
    }

    #[test]
    fn test_matching_template() {
        let templates = built_in_templates();
        let wolf = Creature::new("Wolf", 1, &["animal"]);
        let dire = Creature::new("Dire Wolf", 3, &["animal"]);
        let mut encounter = Encounter::new(party(), TerrainFilter::Any);
        encounter.entries = vec![
            EncounterEntry::new(dire, 1, 1).with_role("alpha"),
            EncounterEntry::new(wolf, 3, 1).with_role("pack"),
        ];
        let found = encounter.matching_template(&templates).unwrap();
        assert_eq!(found.id, "wolf_pack_hunting");

        assert!(Encounter::new(party(), TerrainFilter::Any)
            .matching_template(&templates)
            .is_none());
    }

    #[test]
    fn test_display_lists_entries() {
        let wolf = Creature::new("Wolf", 1, &["animal"]);
        let encounter = Encounter::new(party(), TerrainFilter::Any)
            .with_creature_added(&wolf, 2)
            .unwrap();
        let text = encounter.to_string();
        assert!(text.contains("Wolf x2"));
        assert!(text.contains("Total XP: 80 / 80"));
    }
}
