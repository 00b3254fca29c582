//! # Creature Relationships
//!
//! Static ecology data keyed by creature base name: who packs with whom, who
//! leads whom, who defends territory, and which species are natural enemies.

use crate::creature::CreatureType;
use crate::WarbandResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default typical group size for creatures without a relationship entry.
pub const DEFAULT_PACK_SIZE: (u32, u32) = (1, 4);

/// Social behaviour of one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRelationship {
    /// Canonical base name, e.g. "Dire Wolf"
    pub name: String,
    #[serde(default)]
    pub packs_with: Vec<String>,
    #[serde(default)]
    pub leader_of: Vec<String>,
    #[serde(default)]
    pub follows_leader: Vec<String>,
    #[serde(default)]
    pub territorial: bool,
    #[serde(default)]
    pub solitary: bool,
    #[serde(default)]
    pub domesticated: bool,
    /// Typical group size as an inclusive range
    pub pack_size: (u32, u32),
}

impl CreatureRelationship {
    fn new(name: &str, min: u32, max: u32) -> Self {
        Self {
            name: name.to_string(),
            packs_with: Vec::new(),
            leader_of: Vec::new(),
            follows_leader: Vec::new(),
            territorial: false,
            solitary: false,
            domesticated: false,
            pack_size: (min, max),
        }
    }

    fn packs(mut self, names: &[&str]) -> Self {
        self.packs_with = names.iter().map(|n| n.to_string()).collect();
        self
    }

    fn leads(mut self, names: &[&str]) -> Self {
        self.leader_of = names.iter().map(|n| n.to_string()).collect();
        self
    }

    fn follows(mut self, names: &[&str]) -> Self {
        self.follows_leader = names.iter().map(|n| n.to_string()).collect();
        self
    }

    fn territorial(mut self) -> Self {
        self.territorial = true;
        self
    }

    fn solitary(mut self) -> Self {
        self.solitary = true;
        self
    }

    fn domesticated(mut self) -> Self {
        self.domesticated = true;
        self
    }
}

/// A name and the names it clashes with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedConflicts {
    pub name: String,
    pub enemies: Vec<String>,
}

/// A creature type and the types it clashes with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeConflicts {
    pub creature_type: CreatureType,
    pub conflicts: Vec<CreatureType>,
}

/// All ecology data consulted by the [`EcologyValidator`](crate::EcologyValidator).
///
/// Relationship order matters: a base name without an exact entry resolves to
/// the first entry whose name contains it or is contained in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcologyTables {
    pub relationships: Vec<CreatureRelationship>,
    /// Named ecological conflicts (exact or substring, either direction)
    pub conflicts: Vec<NamedConflicts>,
    /// Type pairs that can never share an encounter
    pub coexistence_type_conflicts: Vec<TypeConflicts>,
    /// Type pairs that make poor companions for random composition
    pub type_incompatibilities: Vec<TypeConflicts>,
    /// Lowercase name fragments that are mutual enemies
    pub specific_enemies: Vec<NamedConflicts>,
    pub intelligent_types: Vec<CreatureType>,
    /// Name fragments marking an intelligent creature regardless of type
    pub intelligent_name_keywords: Vec<String>,
    pub good_keywords: Vec<String>,
    pub evil_keywords: Vec<String>,
}

impl EcologyTables {
    /// Loads replacement tables from a JSON file.
    pub fn from_json_file(path: &Path) -> WarbandResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Relationship entry with exactly this name.
    pub fn relationship(&self, name: &str) -> Option<&CreatureRelationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Canonical relationship name for a stripped base name.
    ///
    /// An exact entry wins, then the first entry related by substring in
    /// either direction. Names matching nothing are returned unchanged.
    pub fn canonical_name(&self, base: &str) -> String {
        if base.is_empty() || self.relationship(base).is_some() {
            return base.to_string();
        }

        self.relationships
            .iter()
            .find(|r| base.contains(r.name.as_str()) || r.name.contains(base))
            .map(|r| r.name.clone())
            .unwrap_or_else(|| base.to_string())
    }

    /// Named conflicts for an exact base name.
    pub fn conflicts_for(&self, name: &str) -> &[String] {
        self.conflicts
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.enemies.as_slice())
            .unwrap_or(&[])
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|n| n.to_string()).collect()
}

fn conflict(name: &str, enemies: &[&str]) -> NamedConflicts {
    NamedConflicts {
        name: name.to_string(),
        enemies: names(enemies),
    }
}

fn type_conflict(creature_type: CreatureType, conflicts: &[CreatureType]) -> TypeConflicts {
    TypeConflicts {
        creature_type,
        conflicts: conflicts.to_vec(),
    }
}

fn default_relationships() -> Vec<CreatureRelationship> {
    type R = CreatureRelationship;

    vec![
        R::new("Wolf", 2, 6)
            .packs(&["Dire Wolf", "Winter Wolf", "Worg"])
            .leads(&["Wolf"])
            .territorial(),
        R::new("Dire Wolf", 1, 3)
            .packs(&["Wolf", "Winter Wolf"])
            .leads(&["Wolf"])
            .territorial(),
        R::new("Bear", 1, 2).territorial().solitary(),
        R::new("War Horse", 1, 4).domesticated(),
        R::new("Goblin", 4, 12)
            .packs(&["Goblin", "Hobgoblin", "Bugbear"])
            .follows(&["Goblin Chief", "Hobgoblin", "Bugbear", "Orc"]),
        R::new("Goblin Chief", 1, 2)
            .packs(&["Goblin", "Hobgoblin"])
            .leads(&["Goblin", "Goblin Warrior"])
            .follows(&["Hobgoblin", "Bugbear", "Orc"]),
        R::new("Hobgoblin", 2, 6)
            .packs(&["Hobgoblin", "Goblin", "Bugbear", "Orc"])
            .leads(&["Goblin", "Goblin Chief", "Goblin Warrior"])
            .follows(&["Hobgoblin Captain", "Bugbear", "Orc"]),
        R::new("Bugbear", 1, 4)
            .packs(&["Bugbear", "Goblin", "Hobgoblin", "Orc"])
            .leads(&["Goblin", "Goblin Chief", "Hobgoblin"])
            .follows(&["Bugbear Chief", "Orc Captain"]),
        R::new("Orc", 3, 8)
            .packs(&["Orc", "Ogre"])
            .follows(&["Orc Captain", "Orc Warchief"]),
        R::new("Bandit", 3, 10)
            .packs(&["Bandit", "Rogue"])
            .follows(&["Bandit Captain"]),
        R::new("Bandit Captain", 1, 1)
            .packs(&["Bandit", "Rogue"])
            .leads(&["Bandit"]),
        R::new("Skeleton", 4, 12)
            .packs(&["Skeleton", "Zombie"])
            .follows(&["Skeleton Champion", "Necromancer"]),
        R::new("Zombie", 3, 8)
            .packs(&["Zombie", "Skeleton"])
            .follows(&["Zombie Lord", "Necromancer"]),
        R::new("Dryad", 1, 2).packs(&["Unicorn", "Satyr"]).territorial(),
        R::new("Pixie", 2, 8).packs(&["Pixie", "Sprite"]).territorial(),
        R::new("Dragon", 1, 1).territorial().solitary(),
        R::new("Ancient Dragon", 1, 1).territorial().solitary(),
        R::new("Adult Dragon", 1, 1).territorial().solitary(),
        R::new("Young Dragon", 1, 1).territorial().solitary(),
        R::new("Wyvern", 1, 2).territorial().solitary(),
        R::new("Drake", 1, 1).territorial().solitary(),
        R::new("Owlbear", 1, 2).territorial().solitary(),
        R::new("Tiger", 1, 1).territorial().solitary(),
        R::new("Lion", 2, 6).packs(&["Lion"]).territorial(),
        R::new("Giant", 1, 1).territorial().solitary(),
        R::new("Storm Giant", 1, 1).territorial().solitary(),
        R::new("Cloud Giant", 1, 1).territorial().solitary(),
        R::new("Fire Giant", 1, 3).packs(&["Fire Giant"]).territorial(),
        R::new("Frost Giant", 1, 4).packs(&["Frost Giant"]).territorial(),
        R::new("Lich", 1, 1).territorial().solitary(),
        R::new("Vampire", 1, 1).territorial().solitary(),
        R::new("Kobold", 6, 20)
            .packs(&["Kobold"])
            .follows(&["Kobold Chieftain"]),
    ]
}

fn default_conflicts() -> Vec<NamedConflicts> {
    let dragon_kin = ["Dragon", "Ancient Dragon", "Adult Dragon", "Young Dragon"];
    let giant_kin = ["Storm Giant", "Cloud Giant", "Fire Giant", "Frost Giant"];

    let mut table = vec![conflict(
        "Dragon",
        &["Dragon", "Giant", "Chimera", "Manticore", "Sphinx", "Wyvern", "Drake"],
    )];
    for name in &dragon_kin[1..] {
        table.push(conflict(name, &dragon_kin));
    }
    table.extend([
        conflict("Wyvern", &["Dragon", "Wyvern", "Drake"]),
        conflict("Drake", &["Dragon", "Wyvern", "Drake"]),
        conflict("Bear", &["Wolf", "Dire Wolf", "Owlbear", "Tiger", "Lion", "Bulezau"]),
        conflict("Dire Bear", &["Wolf", "Dire Wolf", "Owlbear", "Tiger", "Lion", "Bear"]),
        conflict("Owlbear", &["Bear", "Wolf", "Dire Wolf", "Giant", "Tiger", "Lion"]),
        conflict("Tiger", &["Bear", "Lion", "Owlbear", "Wolf", "Dire Wolf"]),
        conflict("Lion", &["Bear", "Tiger", "Owlbear", "Wolf", "Dire Wolf"]),
        conflict("Bulezau", &["Bear", "Tiger", "Lion", "Wolf", "Dire Wolf"]),
        conflict("Wolf", &["Bear", "Owlbear", "Tiger", "Lion", "Bulezau"]),
        conflict("Dire Wolf", &["Bear", "Dire Bear", "Owlbear", "Tiger", "Lion"]),
        conflict("Giant", &["Dragon", "Giant", "Ogre", "Cyclops", "Ettin"]),
    ]);
    for name in giant_kin {
        let mut enemies = vec!["Giant"];
        enemies.extend(giant_kin.iter().filter(|other| **other != name));
        table.push(conflict(name, &enemies));
    }
    table.extend([
        conflict("Ogre", &["Giant", "Ogre", "Troll", "Ettin"]),
        conflict("Troll", &["Ogre", "Troll", "Giant"]),
        conflict("Ettin", &["Giant", "Ogre", "Troll"]),
        conflict("Cyclops", &["Giant", "Cyclops"]),
        conflict("Demon", &["Devil", "Angel", "Archon", "Azata"]),
        conflict("Devil", &["Demon", "Angel", "Archon", "Azata"]),
        conflict("Balor", &["Devil", "Pit Fiend", "Angel", "Solar"]),
        conflict("Pit Fiend", &["Demon", "Balor", "Angel", "Solar"]),
        conflict("Angel", &["Demon", "Devil", "Undead", "Fiend"]),
        conflict("Archon", &["Demon", "Devil", "Undead", "Fiend"]),
        conflict("Azata", &["Demon", "Devil", "Undead", "Fiend"]),
        conflict("Solar", &["Balor", "Pit Fiend", "Lich", "Vampire"]),
        conflict("Lich", &["Vampire", "Angel", "Archon", "Solar", "Mummy"]),
        conflict("Vampire", &["Lich", "Angel", "Archon", "Mummy", "Wraith"]),
        conflict("Mummy", &["Vampire", "Lich", "Angel", "Archon"]),
        conflict("Wraith", &["Vampire", "Angel", "Archon"]),
        conflict("Fire Elemental", &["Water Elemental", "Ice Elemental", "Frost Giant"]),
        conflict("Water Elemental", &["Fire Elemental", "Fire Giant"]),
        conflict("Ice Elemental", &["Fire Elemental", "Fire Giant"]),
        conflict("Air Elemental", &["Earth Elemental"]),
        conflict("Earth Elemental", &["Air Elemental"]),
        conflict("Mind Flayer", &["Dragon", "Giant", "Angel", "Demon", "Devil"]),
        conflict("Beholder", &["Dragon", "Giant", "Mind Flayer", "Angel"]),
        conflict("Aboleth", &["Dragon", "Kraken", "Angel", "Solar"]),
        conflict("Golem", &["Rust Monster", "Ooze"]),
        conflict("Animated Object", &["Rust Monster"]),
        conflict("Rust Monster", &["Golem", "Animated Object", "Construct"]),
        conflict("Gelatinous Cube", &["Ooze", "Slime"]),
        conflict("Black Pudding", &["Ooze", "Gelatinous Cube"]),
        conflict("Drow", &["Elf", "Dwarf", "Angel"]),
        conflict("Duergar", &["Dwarf", "Angel", "Archon"]),
        conflict("Orc", &["Elf", "Dwarf"]),
        conflict("Hobgoblin", &["Elf", "Dwarf"]),
        conflict("Hag", &["Angel", "Archon", "Unicorn", "Dryad"]),
        conflict("Redcap", &["Angel", "Archon", "Unicorn", "Good Fey"]),
        conflict("Unicorn", &["Hag", "Undead", "Fiend", "Demon", "Devil"]),
        conflict("Dryad", &["Hag", "Undead", "Fire Elemental"]),
        conflict("Treant", &["Fire Elemental", "Hag", "Undead"]),
    ]);
    table
}

fn default_specific_enemies() -> Vec<NamedConflicts> {
    vec![
        conflict("moray", &["redcap", "dryad", "treant", "leshy", "unicorn"]),
        conflict("redcap", &["moray", "shark", "merfolk", "sea", "aquatic", "water"]),
        conflict("shark", &["redcap", "dryad", "treant", "forest"]),
        conflict("merfolk", &["redcap", "goblin", "orc"]),
        conflict("dryad", &["moray", "shark", "undead", "fiend"]),
        conflict("treant", &["fire", "undead", "aquatic"]),
        conflict("unicorn", &["redcap", "hag", "undead", "fiend"]),
        conflict("angel", &["demon", "devil", "undead", "fiend"]),
        conflict("demon", &["angel", "devil", "celestial"]),
        conflict("devil", &["demon", "angel", "celestial"]),
        conflict("phoenix", &["undead", "ice", "frost"]),
        conflict("lich", &["angel", "paladin", "phoenix"]),
        conflict("vampire", &["angel", "paladin", "phoenix"]),
    ]
}

impl Default for EcologyTables {
    fn default() -> Self {
        use CreatureType::*;

        Self {
            relationships: default_relationships(),
            conflicts: default_conflicts(),
            coexistence_type_conflicts: vec![
                type_conflict(Celestial, &[Fiend, Undead]),
                type_conflict(Fiend, &[Celestial]),
                type_conflict(Undead, &[Celestial]),
                type_conflict(Dragon, &[Dragon]),
            ],
            type_incompatibilities: vec![
                type_conflict(Celestial, &[Fiend, Undead, Aberration]),
                type_conflict(Fiend, &[Celestial]),
                type_conflict(Undead, &[Celestial, Animal, Plant]),
                type_conflict(Aberration, &[Celestial, Animal, Plant, Fey]),
                type_conflict(Construct, &[Animal, Plant]),
                type_conflict(Fey, &[Aberration, Undead]),
                type_conflict(Animal, &[Undead, Aberration, Construct]),
                type_conflict(Plant, &[Undead, Aberration, Construct]),
            ],
            specific_enemies: default_specific_enemies(),
            intelligent_types: vec![Humanoid, Fiend, Celestial, Dragon, Fey],
            intelligent_name_keywords: names(&["captain", "chief", "wizard", "priest"]),
            good_keywords: names(&["angel", "archon", "azata", "paladin", "good"]),
            evil_keywords: names(&["demon", "devil", "undead", "evil", "dark"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_name_prefers_exact_entry() {
        let tables = EcologyTables::default();
        assert_eq!(tables.canonical_name("Dire Wolf"), "Dire Wolf");
        assert_eq!(tables.canonical_name("Goblin Chief"), "Goblin Chief");
        assert_eq!(tables.canonical_name("Owlbear"), "Owlbear");
    }

    #[test]
    fn test_canonical_name_substring_fallback() {
        let tables = EcologyTables::default();
        assert_eq!(tables.canonical_name("Goblin Warrior"), "Goblin");
        assert_eq!(tables.canonical_name("Red Dragon"), "Dragon");
        assert_eq!(tables.canonical_name("Gelatinous Cube"), "Gelatinous Cube");
        assert_eq!(tables.canonical_name(""), "");
    }

    #[test]
    fn test_giant_kin_conflicts() {
        let tables = EcologyTables::default();
        let storm = tables.conflicts_for("Storm Giant");
        assert_eq!(storm, &["Giant", "Cloud Giant", "Fire Giant", "Frost Giant"]);
        let frost = tables.conflicts_for("Frost Giant");
        assert!(!frost.iter().any(|n| n == "Frost Giant"));
    }

    #[test]
    fn test_dragon_kin_conflicts() {
        let tables = EcologyTables::default();
        assert_eq!(tables.conflicts_for("Young Dragon").len(), 4);
        assert_eq!(tables.conflicts_for("Dragon").len(), 7);
    }

    #[test]
    fn test_relationship_flags() {
        let tables = EcologyTables::default();
        let horse = tables.relationship("War Horse").unwrap();
        assert!(horse.domesticated);
        assert!(!horse.territorial);
        let kobold = tables.relationship("Kobold").unwrap();
        assert_eq!(kobold.pack_size, (6, 20));
    }
}
