//! # Encounter Session
//!
//! The async entry point used by the CLI.
//!
//! A session owns the rule data (ecology tables, classifier, templates) and a
//! handle to the [`CatalogStore`]. Each request waits for the catalogs to be
//! published, then runs the synchronous generators on the snapshot.

use crate::catalog::{CatalogSnapshot, CatalogStore};
use crate::config;
use crate::ecology::EcologyValidator;
use crate::encounter::Encounter;
use crate::generation::{
    built_in_templates, utils, EncounterGenerator, EncounterTemplate, GenerationConfig, Generator,
    ItemGenerator,
};
use crate::loot::LootResult;
use crate::WarbandResult;
use log::debug;
use rand::rngs::StdRng;
use std::time::Duration;

/// Generates encounters and loot against a shared catalog store.
#[derive(Debug, Clone)]
pub struct EncounterSession {
    store: CatalogStore,
    ecology: EcologyValidator,
    templates: Vec<EncounterTemplate>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl EncounterSession {
    /// Creates a session with the built-in ecology rules and templates.
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            ecology: EcologyValidator::default(),
            templates: built_in_templates(),
            wait_timeout: config::CATALOG_WAIT_TIMEOUT,
            poll_interval: config::CATALOG_POLL_INTERVAL,
        }
    }

    pub fn with_ecology(mut self, ecology: EcologyValidator) -> Self {
        self.ecology = ecology;
        self
    }

    pub fn with_templates(mut self, templates: Vec<EncounterTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Overrides how long requests wait for the catalogs.
    pub fn with_wait(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.wait_timeout = timeout;
        self.poll_interval = poll_interval;
        self
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn ecology(&self) -> &EcologyValidator {
        &self.ecology
    }

    async fn ready_snapshot(&self) -> WarbandResult<CatalogSnapshot> {
        self.store
            .wait_until_ready_with(self.wait_timeout, self.poll_interval)
            .await
    }

    fn compose_encounter(
        &self,
        snapshot: &CatalogSnapshot,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> WarbandResult<Encounter> {
        let generator = EncounterGenerator::new(&snapshot.creatures, &self.ecology, &self.templates);
        debug!("Running {} with seed {}", generator.generator_type(), config.seed);
        generator.generate(config, rng)
    }

    fn compose_loot(
        &self,
        snapshot: &CatalogSnapshot,
        encounter: &Encounter,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> WarbandResult<LootResult> {
        let generator = ItemGenerator::new(&snapshot.loot_tables, encounter);
        let loot = generator.generate(config, rng)?;
        generator.validate(&loot, config)?;
        Ok(loot)
    }

    /// Waits for the catalogs and composes an encounter.
    pub async fn generate_encounter(&self, config: &GenerationConfig) -> WarbandResult<Encounter> {
        let snapshot = self.ready_snapshot().await?;
        let mut rng = utils::create_rng(config);
        self.compose_encounter(&snapshot, config, &mut rng)
    }

    /// Waits for the catalogs and composes loot for an existing encounter.
    pub async fn generate_loot(&self, encounter: &Encounter, seed: u64) -> WarbandResult<LootResult> {
        let snapshot = self.ready_snapshot().await?;
        let config = GenerationConfig::new(seed, encounter.party).with_terrain(encounter.terrain);
        let mut rng = utils::create_rng(&config);
        self.compose_loot(&snapshot, encounter, &config, &mut rng)
    }

    /// Composes an encounter and its loot from one random stream.
    pub async fn generate_with_loot(&self, config: &GenerationConfig) -> WarbandResult<(Encounter, LootResult)> {
        let snapshot = self.ready_snapshot().await?;
        let mut rng = utils::create_rng(config);
        let encounter = self.compose_encounter(&snapshot, config, &mut rng)?;
        let loot = self.compose_loot(&snapshot, &encounter, config, &mut rng)?;
        Ok((encounter, loot))
    }
}
