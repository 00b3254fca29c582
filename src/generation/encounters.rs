//! # Encounter Generation
//!
//! Composes a group of creatures whose XP matches the party's budget.
//!
//! Narrative templates are tried first. Each template lists roles in order,
//! and every role is filled with a matching creature near the party level.
//! When no template produces an acceptable, ecologically valid group, a
//! random composer builds one around a single primary creature instead.

use crate::catalog::CreatureCatalog;
use crate::config;
use crate::creature::{Creature, Terrain, TerrainFilter};
use crate::ecology::{Atmosphere, EcologyValidator};
use crate::encounter::{Encounter, EncounterEntry, EncounterSource};
use crate::generation::{
    apply_leadership, templates_for, utils, EncounterTemplate, GenerationConfig, Generator,
};
use crate::rules::creature_xp;
use crate::{WarbandError, WarbandResult};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Template-first encounter composer.
///
/// Reads immutable catalog snapshots and writes only to the encounter it
/// returns.
#[derive(Debug, Clone, Copy)]
pub struct EncounterGenerator<'a> {
    creatures: &'a CreatureCatalog,
    ecology: &'a EcologyValidator,
    templates: &'a [EncounterTemplate],
}

impl<'a> EncounterGenerator<'a> {
    pub fn new(
        creatures: &'a CreatureCatalog,
        ecology: &'a EcologyValidator,
        templates: &'a [EncounterTemplate],
    ) -> Self {
        Self {
            creatures,
            ecology,
            templates,
        }
    }

    /// Tries up to `template_attempts` random templates.
    ///
    /// Returns the first candidate that lands in the accepted XP band and
    /// passes ecology validation.
    fn generate_from_templates(
        &self,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Option<(Vec<EncounterEntry>, &'a EncounterTemplate)> {
        let usable = templates_for(self.templates, config.terrain);
        if usable.is_empty() {
            debug!("No templates fit terrain {}", config.terrain);
            return None;
        }

        for attempt in 1..=config.template_attempts {
            let Some(&template) = usable.choose(rng) else {
                return None;
            };

            match self.compose_template(template, config, rng) {
                Some(entries) => {
                    let report = self.ecology.validate_encounter_logic(&entries, config.terrain);
                    if report.valid {
                        debug!("Template '{}' accepted on attempt {}", template.id, attempt);
                        return Some((entries, template));
                    }
                    debug!(
                        "Template '{}' rejected by ecology: {}",
                        template.id,
                        report.errors.join("; ")
                    );
                }
                None => debug!("Template '{}' missed the XP band on attempt {}", template.id, attempt),
            }
        }

        None
    }

    /// Fills every role of a template, then checks the XP band.
    fn compose_template(
        &self,
        template: &EncounterTemplate,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Option<Vec<EncounterEntry>> {
        let party_level = config.party.level;
        let target = config.target_xp() as f64;
        let ceiling = target * config::SHRINK_CEILING_RATIO;
        let mut entries = Vec::new();
        let mut current = 0u32;

        for slot in &template.structure {
            let count = slot.count.roll(rng);
            if count == 0 {
                continue;
            }

            let candidates: Vec<&Creature> = self
                .creatures
                .creatures()
                .iter()
                .filter(|c| utils::within_window(c.level, party_level, config.level_window))
                .filter(|c| slot.creatures.iter().any(|species| self.matches_species(c, species)))
                .collect();
            let Some(&base) = candidates.choose(rng) else {
                debug!("No creature fills role '{}' of '{}'", slot.role, template.id);
                continue;
            };

            let variant = config.variant_mode.pick(rng);
            let entry = EncounterEntry::new(base.clone(), count, party_level)
                .with_variant(variant)
                .with_role(&slot.role);

            if (current + entry.xp) as f64 > ceiling {
                let per = entry.per_creature_xp();
                let room = ceiling - current as f64;
                let max_count = if per == 0 {
                    count
                } else if room <= 0.0 {
                    0
                } else {
                    (room / per as f64).floor() as u32
                };
                if max_count > 0 {
                    let shrunk = entry.with_count(max_count);
                    current += shrunk.xp;
                    entries.push(shrunk);
                }
                continue;
            }

            current += entry.xp;
            entries.push(entry);
        }

        if entries.is_empty() {
            return None;
        }

        let mut entries = apply_leadership(entries, self.ecology.classifier());

        let low = target * config::ACCEPT_MIN_RATIO;
        let high = target * config::ACCEPT_MAX_RATIO;
        let current = current as f64;
        if current >= low && current <= high {
            return Some(entries);
        }

        if current >= target * config::SUPPLEMENT_MIN_RATIO && current < low {
            let remaining = target - current;
            if let Some(small) = self.find_small_creature(remaining, party_level) {
                let variant = config.variant_mode.pick(rng);
                let filler = EncounterEntry::new(small.clone(), 1, party_level)
                    .with_variant(variant)
                    .with_role("minion");
                if current + filler.xp as f64 <= high {
                    entries.push(filler);
                    return Some(entries);
                }
            }
        }

        None
    }

    /// Name match between a catalog creature and a species a role asks for.
    fn matches_species(&self, creature: &Creature, species: &str) -> bool {
        let base = self.ecology.base_name(&creature.name);
        if base.is_empty() {
            return false;
        }
        let species_lower = species.to_lowercase();
        base == species
            || creature.lower_name().contains(&species_lower)
            || species_lower.contains(&base.to_lowercase())
    }

    /// Largest creature at least a level below the party that fits `remaining`.
    fn find_small_creature(&self, remaining: f64, party_level: i32) -> Option<&'a Creature> {
        let mut best: Option<(&Creature, u32)> = None;
        for creature in self.creatures.creatures() {
            let xp = creature_xp(creature.level, party_level);
            let fits = creature.level <= party_level - 1 && xp as f64 <= remaining;
            if fits && best.map_or(true, |(_, best_xp)| xp > best_xp) {
                best = Some((creature, xp));
            }
        }
        best.map(|(creature, _)| creature)
    }

    /// Builds an encounter around one weighted-random primary creature.
    fn generate_random(&self, config: &GenerationConfig, rng: &mut StdRng) -> WarbandResult<Vec<EncounterEntry>> {
        let party_level = config.party.level;
        let target = config.target_xp() as f64;
        let all: Vec<&Creature> = self.creatures.creatures().iter().collect();

        let pool: Vec<&Creature> = match config.terrain {
            TerrainFilter::Any => all.clone(),
            TerrainFilter::Only(terrain) => self
                .ecology
                .classifier()
                .filter_by_terrain(self.creatures.creatures(), terrain),
        };
        if pool.is_empty() {
            return Err(WarbandError::NoSuitableCandidate(format!(
                "no creatures found for {} terrain",
                config.terrain
            )));
        }

        let base_primary = self.pick_near_level(&pool, config, rng).ok_or_else(|| {
            WarbandError::NoSuitableCandidate(format!(
                "no creatures near level {} in {} terrain",
                party_level, config.terrain
            ))
        })?;

        let primary = EncounterEntry::new(base_primary.clone(), 1, party_level)
            .with_variant(config.variant_mode.pick(rng));
        let mut current = primary.xp;
        let mut entries = vec![primary];
        let mut attempts = 0;

        while (current as f64) < target * config::RANDOM_STOP_RATIO && attempts < config.random_attempts {
            attempts += 1;

            let mut compatible: Vec<&Creature> = pool
                .iter()
                .copied()
                .filter(|c| self.ecology.are_monsters_compatible(base_primary, c))
                .collect();
            if compatible.is_empty() && config.terrain != TerrainFilter::Any {
                compatible = all
                    .iter()
                    .copied()
                    .filter(|c| self.ecology.are_monsters_compatible(base_primary, c))
                    .collect();
            }
            if compatible.is_empty() {
                break;
            }

            let Some(base_next) = self.pick_near_level(&compatible, config, rng) else {
                break;
            };
            let next = EncounterEntry::new(base_next.clone(), 1, party_level)
                .with_variant(config.variant_mode.pick(rng));
            let per = next.per_creature_xp();
            let remaining = target - current as f64;

            let fit = if per == 0 {
                1
            } else {
                ((remaining / per as f64).floor() as u32).max(1)
            };
            let wanted = if rng.gen::<f64>() < 0.7 { 1 } else { rng.gen_range(1..=3) };
            let count = fit.min(wanted);

            if (current + per * count) as f64 <= target * config::SHRINK_CEILING_RATIO {
                let entry = next.with_count(count);
                current += entry.xp;
                merge_entry(&mut entries, entry);
            }

            if current as f64 >= target {
                break;
            }
        }

        debug!("Random composition finished after {} attempts at {} XP", attempts, current);
        Ok(entries)
    }

    /// Weighted pick of a creature within the level window.
    fn pick_near_level(
        &self,
        pool: &[&'a Creature],
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> Option<&'a Creature> {
        let party_level = config.party.level;
        let near: Vec<&'a Creature> = pool
            .iter()
            .copied()
            .filter(|c| utils::within_window(c.level, party_level, config.level_window))
            .collect();
        utils::weighted_pick(&near, |c| utils::level_weight(c.level, party_level), rng).copied()
    }

    /// Terrain the atmosphere is drawn for.
    fn scene_terrain(&self, config: &GenerationConfig, entries: &[EncounterEntry]) -> Terrain {
        match config.terrain {
            TerrainFilter::Only(terrain) => terrain,
            TerrainFilter::Any => entries
                .first()
                .map(|e| self.ecology.classifier().preferred_terrain(&e.creature))
                .unwrap_or(Terrain::Plains),
        }
    }
}

/// Adds `entry` to the list, merging with an entry of the same creature and
/// variant.
fn merge_entry(entries: &mut Vec<EncounterEntry>, entry: EncounterEntry) {
    match entries
        .iter_mut()
        .find(|e| e.creature.name == entry.creature.name && e.variant == entry.variant)
    {
        Some(existing) => *existing = existing.with_count(existing.count + entry.count),
        None => entries.push(entry),
    }
}

impl<'a> Generator<Encounter> for EncounterGenerator<'a> {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WarbandResult<Encounter> {
        config.validate()?;
        if self.creatures.is_empty() {
            return Err(WarbandError::DataUnavailable(
                "no creature catalog loaded".to_string(),
            ));
        }

        let (entries, source) = match (!config.random_only)
            .then(|| self.generate_from_templates(config, rng))
            .flatten()
        {
            Some((entries, template)) => (
                entries,
                EncounterSource::Template {
                    id: template.id.clone(),
                    name: template.name.clone(),
                },
            ),
            None => {
                if !config.random_only {
                    debug!("Falling back to random composition");
                }
                (self.generate_random(config, rng)?, EncounterSource::Random)
            }
        };

        let mut encounter = Encounter::new(config.party, config.terrain);
        encounter.validation = self.ecology.validate_encounter_logic(&entries, config.terrain);
        encounter.atmosphere = Some(Atmosphere::for_terrain(self.scene_terrain(config, &entries), rng));
        encounter.entries = entries;
        encounter.source = source;

        if !encounter.validation.valid {
            warn!(
                "Encounter has ecology errors: {}",
                encounter.validation.errors.join("; ")
            );
        }

        self.validate(&encounter, config)?;

        info!(
            "Generated encounter: {} creatures, {} / {} XP",
            encounter.creature_count(),
            encounter.total_xp(),
            encounter.target_xp
        );
        Ok(encounter)
    }

    fn validate(&self, encounter: &Encounter, config: &GenerationConfig) -> WarbandResult<()> {
        if encounter.is_empty() {
            return Err(WarbandError::GenerationFailed(
                "encounter has no creatures".to_string(),
            ));
        }
        if let Some(entry) = encounter.entries.iter().find(|e| !e.is_consistent()) {
            return Err(WarbandError::GenerationFailed(format!(
                "entry '{}' has {} XP for {} creatures at level {}",
                entry.creature.name, entry.xp, entry.count, entry.adjusted_level
            )));
        }
        if encounter
            .entries
            .iter()
            .any(|e| e.party_level != config.party.level)
        {
            return Err(WarbandError::GenerationFailed(
                "entry XP computed against a different party level".to_string(),
            ));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "EncounterGenerator"
    }
}
