//! # Leadership
//!
//! Orders encounter entries by rank and hands out cosmetic role labels.
//! Nothing here touches counts, levels or XP.

use crate::creature::{strip_name_qualifiers, CreatureClassifier};
use crate::encounter::EncounterEntry;
use std::cmp::Reverse;

/// Sorts entries by leadership rank and labels each one.
///
/// The highest-ranked entry leads. Every other entry is labelled by how close
/// its level is to the leader's and by keywords in its name.
///
/// # Examples
///
/// ```
/// use warband::{apply_leadership, Creature, CreatureClassifier, EncounterEntry};
///
/// let entries = vec![
///     EncounterEntry::new(Creature::new("Goblin Warrior", -1, &["goblin"]), 3, 1),
///     EncounterEntry::new(Creature::new("Goblin War Chief", 1, &["goblin"]), 1, 1),
/// ];
/// let ordered = apply_leadership(entries, &CreatureClassifier::default());
/// assert_eq!(ordered[0].creature.name, "Goblin War Chief");
/// assert_eq!(ordered[0].role.as_deref(), Some("leader"));
/// assert_eq!(ordered[1].role.as_deref(), Some("warrior"));
/// ```
pub fn apply_leadership(mut entries: Vec<EncounterEntry>, classifier: &CreatureClassifier) -> Vec<EncounterEntry> {
    if entries.is_empty() {
        return entries;
    }

    entries.sort_by_key(|e| {
        Reverse((
            classifier.leadership_priority(&strip_name_qualifiers(&e.creature.name), e.adjusted_level),
            e.adjusted_level,
        ))
    });

    let lead_level = entries[0].adjusted_level;
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let role = if i == 0 {
                leader_role(&entry.creature.name)
            } else {
                subordinate_role(&entry.creature.name, entry.adjusted_level, lead_level)
            };
            entry.with_role(role)
        })
        .collect()
}

/// Label for the top-ranked entry.
pub fn leader_role(name: &str) -> &'static str {
    let lower = name.to_lowercase();
    if ["captain", "chief", "commander"].iter().any(|k| lower.contains(k)) {
        "leader"
    } else if ["champion", "sergeant", "veteran"].iter().any(|k| lower.contains(k)) {
        "lieutenant"
    } else if ["dire", "alpha"].iter().any(|k| lower.contains(k)) {
        "alpha"
    } else {
        "leader"
    }
}

/// Label for an entry below the leader.
pub fn subordinate_role(name: &str, level: i32, lead_level: i32) -> &'static str {
    let lower = name.to_lowercase();
    let has = |keys: &[&str]| keys.iter().any(|k| lower.contains(k));

    if (level - lead_level).abs() <= 1 && level >= lead_level - 1 {
        if has(&["warrior", "guard", "soldier"]) {
            "elite"
        } else {
            "lieutenant"
        }
    } else if has(&["warrior", "guard"]) {
        "warrior"
    } else if has(&["scout", "skulker"]) {
        "scout"
    } else if has(&["shaman", "priest"]) {
        "shaman"
    } else {
        "minion"
    }
}
