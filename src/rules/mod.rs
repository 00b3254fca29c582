//! # Rule Tables
//!
//! Official Pathfinder 2e numbers the budgeting engine is built on: the
//! encounter budget table (Table 10-1), creature XP by level relative to the
//! party, and the treasure-per-encounter table.
//!
//! These are pure lookups. Anything that is not in a table falls back to an
//! explicit default rather than failing.

use crate::{WarbandError, WarbandResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encounter threat level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Trivial,
    Low,
    Moderate,
    Severe,
    Extreme,
}

impl Difficulty {
    /// All threat levels in ascending order.
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Trivial,
        Difficulty::Low,
        Difficulty::Moderate,
        Difficulty::Severe,
        Difficulty::Extreme,
    ];

    /// XP budget for a party of four.
    pub fn base_budget(self) -> i32 {
        match self {
            Difficulty::Trivial => 40,
            Difficulty::Low => 60,
            Difficulty::Moderate => 80,
            Difficulty::Severe => 120,
            Difficulty::Extreme => 160,
        }
    }

    /// XP added or removed per character above or below four.
    pub fn character_adjustment(self) -> i32 {
        match self {
            Difficulty::Trivial => 10,
            Difficulty::Low => 20,
            Difficulty::Moderate => 20,
            Difficulty::Severe => 30,
            Difficulty::Extreme => 40,
        }
    }

    /// Lowercase name as used in tables and the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Trivial => "trivial",
            Difficulty::Low => "low",
            Difficulty::Moderate => "moderate",
            Difficulty::Severe => "severe",
            Difficulty::Extreme => "extreme",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = WarbandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WarbandError::InvalidConfig(format!("unknown difficulty '{}'", s)))
    }
}

/// XP awarded for a creature whose level matches the party's.
pub const DEFAULT_CREATURE_XP: u32 = 40;

/// Creature XP and role by level difference (creature level - party level).
const CREATURE_XP_BY_LEVEL: [(i32, u32, &str); 9] = [
    (-4, 10, "Low-threat lackey"),
    (-3, 15, "Low- or moderate-threat lackey"),
    (-2, 20, "Any lackey or standard creature"),
    (-1, 30, "Any standard creature"),
    (0, 40, "Any standard creature or low-threat boss"),
    (1, 60, "Low- or moderate-threat boss"),
    (2, 80, "Moderate- or severe-threat boss"),
    (3, 120, "Severe- or extreme-threat boss"),
    (4, 160, "Extreme-threat solo boss"),
];

/// Treasure per encounter in gp, indexed by party level 1-5.
const TREASURE_BY_LEVEL: [(i32, [u32; 5]); 5] = [
    (1, [5, 13, 18, 26, 35]),
    (2, [8, 23, 30, 45, 60]),
    (3, [13, 38, 50, 75, 100]),
    (4, [22, 65, 85, 130, 170]),
    (5, [34, 100, 135, 200, 270]),
];

/// Encounter XP budget for a party.
///
/// The budget is the base budget for the threat level plus one character
/// adjustment per character above (or minus one per character below) four.
/// Only trivial budgets are clamped, to `0..=40`.
///
/// # Examples
///
/// ```
/// use warband::{xp_budget, Difficulty};
///
/// assert_eq!(xp_budget(4, Difficulty::Moderate), 80);
/// assert_eq!(xp_budget(6, Difficulty::Severe), 180);
/// assert_eq!(xp_budget(8, Difficulty::Trivial), 40);
/// ```
pub fn xp_budget(party_size: u32, difficulty: Difficulty) -> i32 {
    let budget =
        difficulty.base_budget() + (party_size as i32 - 4) * difficulty.character_adjustment();

    if difficulty == Difficulty::Trivial {
        budget.clamp(0, 40)
    } else {
        budget
    }
}

/// Level difference used for table lookups.
///
/// Differences beyond four levels in either direction count as four; this is
/// the table's own convention for badly mismatched creatures.
pub fn relative_level(creature_level: i32, party_level: i32) -> i32 {
    (creature_level - party_level).clamp(-4, 4)
}

/// XP a single creature is worth against a party.
///
/// # Examples
///
/// ```
/// use warband::creature_xp;
///
/// assert_eq!(creature_xp(3, 3), 40);
/// assert_eq!(creature_xp(12, 3), 160);
/// assert_eq!(creature_xp(-1, 5), 10);
/// ```
pub fn creature_xp(creature_level: i32, party_level: i32) -> u32 {
    let diff = relative_level(creature_level, party_level);
    CREATURE_XP_BY_LEVEL
        .iter()
        .find(|(d, _, _)| *d == diff)
        .map(|(_, xp, _)| *xp)
        .unwrap_or(DEFAULT_CREATURE_XP)
}

/// Official role description for a creature of the given level.
pub fn creature_role(creature_level: i32, party_level: i32) -> &'static str {
    let diff = relative_level(creature_level, party_level);
    CREATURE_XP_BY_LEVEL
        .iter()
        .find(|(d, _, _)| *d == diff)
        .map(|(_, _, role)| *role)
        .unwrap_or("Standard creature")
}

/// Scaling applied to the treasure budget for larger encounters.
///
/// Each entry beyond the first adds 10%, up to a maximum of 50%.
pub fn encounter_size_multiplier(encounter_size: usize) -> f64 {
    let extra = encounter_size.saturating_sub(1) as f64;
    (1.0 + extra * 0.1).min(1.5)
}

/// Treasure budget in gp for one encounter.
///
/// Levels above 5 use the level-5 row and levels below 1 use the level-1 row;
/// the table only covers the first five levels.
///
/// # Examples
///
/// ```
/// use warband::{treasure_budget, Difficulty};
///
/// assert_eq!(treasure_budget(1, Difficulty::Moderate, 1), 18);
/// assert_eq!(treasure_budget(1, Difficulty::Moderate, 3), 21);
/// assert_eq!(treasure_budget(12, Difficulty::Extreme, 1), 270);
/// ```
pub fn treasure_budget(party_level: i32, difficulty: Difficulty, encounter_size: usize) -> u32 {
    let row = party_level.clamp(1, 5);
    let base = TREASURE_BY_LEVEL
        .iter()
        .find(|(level, _)| *level == row)
        .map(|(_, budgets)| budgets[difficulty as usize])
        .unwrap_or(TREASURE_BY_LEVEL[0].1[Difficulty::Moderate as usize]);

    (base as f64 * encounter_size_multiplier(encounter_size)).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_budget_party_of_four() {
        for difficulty in Difficulty::ALL {
            assert_eq!(xp_budget(4, difficulty), difficulty.base_budget());
        }
    }

    #[test]
    fn test_xp_budget_size_adjustment() {
        assert_eq!(xp_budget(5, Difficulty::Low), 80);
        assert_eq!(xp_budget(3, Difficulty::Moderate), 60);
        assert_eq!(xp_budget(8, Difficulty::Extreme), 320);
        assert_eq!(xp_budget(1, Difficulty::Low), 0);
    }

    #[test]
    fn test_trivial_budget_is_clamped() {
        assert_eq!(xp_budget(6, Difficulty::Trivial), 40);
        assert_eq!(xp_budget(2, Difficulty::Trivial), 20);
        assert_eq!(xp_budget(1, Difficulty::Trivial), 10);
    }

    #[test]
    fn test_creature_xp_table() {
        assert_eq!(creature_xp(1, 5), 10);
        assert_eq!(creature_xp(2, 5), 15);
        assert_eq!(creature_xp(3, 5), 20);
        assert_eq!(creature_xp(4, 5), 30);
        assert_eq!(creature_xp(5, 5), 40);
        assert_eq!(creature_xp(6, 5), 60);
        assert_eq!(creature_xp(7, 5), 80);
        assert_eq!(creature_xp(8, 5), 120);
        assert_eq!(creature_xp(9, 5), 160);
    }

    #[test]
    fn test_creature_xp_clamps_level_difference() {
        assert_eq!(creature_xp(20, 1), 160);
        assert_eq!(creature_xp(-1, 10), 10);
    }

    #[test]
    fn test_creature_role() {
        assert_eq!(creature_role(1, 1), "Any standard creature or low-threat boss");
        assert_eq!(creature_role(10, 1), "Extreme-threat solo boss");
        assert_eq!(creature_role(-3, 1), "Low-threat lackey");
    }

    #[test]
    fn test_treasure_budget_rows() {
        assert_eq!(treasure_budget(1, Difficulty::Trivial, 1), 5);
        assert_eq!(treasure_budget(3, Difficulty::Severe, 1), 75);
        assert_eq!(treasure_budget(5, Difficulty::Low, 1), 100);
        assert_eq!(treasure_budget(0, Difficulty::Low, 1), 13);
    }

    #[test]
    fn test_treasure_budget_size_scaling() {
        assert_eq!(encounter_size_multiplier(0), 1.0);
        assert_eq!(encounter_size_multiplier(1), 1.0);
        assert!((encounter_size_multiplier(4) - 1.3).abs() < 1e-9);
        assert_eq!(encounter_size_multiplier(20), 1.5);
        assert_eq!(treasure_budget(4, Difficulty::Moderate, 10), 127);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Severe".parse::<Difficulty>().ok(), Some(Difficulty::Severe));
        assert!("deadly".parse::<Difficulty>().is_err());
    }
}
