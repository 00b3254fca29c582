//! # Creature Variants
//!
//! Weak and elite adjustments. A variant shifts a creature two levels and
//! nudges its statistics by the same amount. The stat nudges approximate the
//! official adjustments rather than reproduce them exactly.

use crate::creature::{CombatStats, Creature};
use crate::WarbandError;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::Rng;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest level a variant can reach.
pub const MIN_VARIANT_LEVEL: i32 = -1;
/// Highest level a variant can reach.
pub const MAX_VARIANT_LEVEL: i32 = 25;

/// Power adjustment applied to a creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Weak,
    #[default]
    Normal,
    Elite,
}

impl Variant {
    /// Level shift before clamping.
    pub fn level_delta(self) -> i32 {
        match self {
            Variant::Weak => -2,
            Variant::Normal => 0,
            Variant::Elite => 2,
        }
    }

    /// Level of a creature of `base_level` under this variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use warband::Variant;
    ///
    /// assert_eq!(Variant::Elite.adjusted_level(3), 5);
    /// assert_eq!(Variant::Weak.adjusted_level(0), -1);
    /// assert_eq!(Variant::Normal.adjusted_level(-1), -1);
    /// ```
    pub fn adjusted_level(self, base_level: i32) -> i32 {
        match self {
            Variant::Normal => base_level,
            _ => (base_level + self.level_delta()).clamp(MIN_VARIANT_LEVEL, MAX_VARIANT_LEVEL),
        }
    }

    /// Name prefix, empty for normal creatures.
    pub fn prefix(self) -> &'static str {
        match self {
            Variant::Weak => "Weak ",
            Variant::Normal => "",
            Variant::Elite => "Elite ",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Weak => "weak",
            Variant::Normal => "normal",
            Variant::Elite => "elite",
        }
    }

    /// Returns a copy of `creature` with this variant applied.
    ///
    /// The name gains a prefix, the level shifts, and combat statistics move
    /// by the resulting level difference.
    pub fn apply(self, creature: &Creature) -> Creature {
        let mut adjusted = creature.clone();
        if self == Variant::Normal {
            return adjusted;
        }

        let level = self.adjusted_level(creature.level);
        adjusted.name = format!("{}{}", self.prefix(), creature.name);
        adjusted.level = level;
        adjusted.stats = scale_stats(&creature.stats, level - creature.level);
        adjusted
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = WarbandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weak" => Ok(Variant::Weak),
            "normal" => Ok(Variant::Normal),
            "elite" => Ok(Variant::Elite),
            other => Err(WarbandError::InvalidConfig(format!("unknown variant '{}'", other))),
        }
    }
}

/// How variants are chosen for generated creatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantMode {
    Weak,
    #[default]
    Normal,
    Elite,
    /// Per creature: 25% weak, 50% normal, 25% elite
    Mixed,
}

impl VariantMode {
    /// Chooses a variant for one creature.
    pub fn pick(self, rng: &mut StdRng) -> Variant {
        match self {
            VariantMode::Weak => Variant::Weak,
            VariantMode::Normal => Variant::Normal,
            VariantMode::Elite => Variant::Elite,
            VariantMode::Mixed => {
                let roll: f64 = rng.gen();
                if roll < 0.25 {
                    Variant::Weak
                } else if roll < 0.75 {
                    Variant::Normal
                } else {
                    Variant::Elite
                }
            }
        }
    }
}

impl fmt::Display for VariantMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariantMode::Weak => f.write_str("weak"),
            VariantMode::Normal => f.write_str("normal"),
            VariantMode::Elite => f.write_str("elite"),
            VariantMode::Mixed => f.write_str("mixed"),
        }
    }
}

impl FromStr for VariantMode {
    type Err = WarbandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("mixed") {
            return Ok(VariantMode::Mixed);
        }
        Ok(match s.parse::<Variant>()? {
            Variant::Weak => VariantMode::Weak,
            Variant::Normal => VariantMode::Normal,
            Variant::Elite => VariantMode::Elite,
        })
    }
}

static DAMAGE_DICE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+d\d+)([+-]\d+)?").expect("valid regex"));

/// Shifts the flat bonus of every dice expression in a damage string by one
/// step in the direction of `diff`.
///
/// # Examples
///
/// ```
/// use warband::shift_damage;
///
/// assert_eq!(shift_damage("1d8+4 slashing", 2), "1d8+5 slashing");
/// assert_eq!(shift_damage("2d6 fire", 2), "2d6+1 fire");
/// assert_eq!(shift_damage("1d4+1 piercing", -2), "1d4 piercing");
/// assert_eq!(shift_damage("1d4 piercing", -2), "1d4-1 piercing");
/// ```
pub fn shift_damage(damage: &str, diff: i32) -> String {
    let step = diff.signum();
    if step == 0 {
        return damage.to_string();
    }

    DAMAGE_DICE
        .replace_all(damage, |caps: &Captures| {
            let bonus = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<i32>().ok())
                .unwrap_or(0)
                + step;
            match bonus {
                0 => caps[1].to_string(),
                b if b > 0 => format!("{}+{}", &caps[1], b),
                b => format!("{}{}", &caps[1], b),
            }
        })
        .into_owned()
}

/// Nudges combat statistics by a level difference.
pub fn scale_stats(stats: &CombatStats, diff: i32) -> CombatStats {
    if diff == 0 {
        return stats.clone();
    }

    let shift = |value: Option<i32>| value.map(|v| v + diff);

    CombatStats {
        ac: stats.ac.map(|ac| (ac + diff).max(10)),
        hp: stats.hp.map(|hp| (hp + diff * 10).max(1)),
        perception: shift(stats.perception),
        fortitude: shift(stats.fortitude),
        reflex: shift(stats.reflex),
        will: shift(stats.will),
        abilities: stats
            .abilities
            .iter()
            .map(|(name, m)| (name.clone(), m + diff.div_euclid(2)))
            .collect(),
        skills: stats
            .skills
            .iter()
            .map(|(name, v)| (name.clone(), v + diff))
            .collect(),
        attacks: stats
            .attacks
            .iter()
            .map(|attack| crate::creature::Attack {
                name: attack.name.clone(),
                bonus: attack.bonus + diff,
                damage: shift_damage(&attack.damage, diff),
            })
            .collect(),
    }
}
