//! # Catalog Store
//!
//! Shared load state for catalogs that arrive asynchronously.
//!
//! Loaders publish finished catalogs into a [`CatalogStore`]; callers wait on
//! it before generating. The wait polls the load state at a fixed interval
//! and gives up after a timeout, reporting the catalogs as unavailable. A
//! caller never sees a partially populated catalog: snapshots are published
//! whole.

use crate::catalog::{CreatureCatalog, ItemCatalog, LootTables};
use crate::config;
use crate::{WarbandError, WarbandResult};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Where a store is in its load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing published yet
    Loading,
    /// Catalogs are available
    Ready,
    /// Loading failed for good
    Failed(String),
}

/// Immutable catalogs handed to the generators.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub creatures: Arc<CreatureCatalog>,
    pub items: Arc<ItemCatalog>,
    pub loot_tables: Arc<LootTables>,
}

impl CatalogSnapshot {
    /// Builds a snapshot, partitioning the items into loot tables.
    ///
    /// An empty item catalog is replaced by the fallback item set.
    pub fn new(creatures: CreatureCatalog, items: ItemCatalog) -> Self {
        let (items, loot_tables) = if items.is_empty() {
            warn!("Item catalog is empty, using fallback loot tables");
            (ItemCatalog::fallback(), LootTables::fallback())
        } else {
            let tables = LootTables::from_catalog(&items);
            (items, tables)
        };

        Self {
            creatures: Arc::new(creatures),
            items: Arc::new(items),
            loot_tables: Arc::new(loot_tables),
        }
    }
}

#[derive(Debug)]
struct StoreInner {
    state: LoadState,
    snapshot: Option<CatalogSnapshot>,
}

/// Cloneable handle to the shared catalog state.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    /// Creates a store in the loading state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                state: LoadState::Loading,
                snapshot: None,
            })),
        }
    }

    /// Creates a store that is already ready.
    pub fn with_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                state: LoadState::Ready,
                snapshot: Some(snapshot),
            })),
        }
    }

    pub async fn state(&self) -> LoadState {
        self.inner.read().await.state.clone()
    }

    /// Publishes finished catalogs and marks the store ready.
    pub async fn publish(&self, snapshot: CatalogSnapshot) {
        info!(
            "Catalogs ready: {} creatures, {} items",
            snapshot.creatures.len(),
            snapshot.items.len()
        );
        let mut inner = self.inner.write().await;
        inner.snapshot = Some(snapshot);
        inner.state = LoadState::Ready;
    }

    /// Marks the load as failed. Waiting callers stop at their next poll.
    pub async fn fail(&self, reason: &str) {
        warn!("Catalog loading failed: {}", reason);
        self.inner.write().await.state = LoadState::Failed(reason.to_string());
    }

    /// The published snapshot, if any.
    pub async fn snapshot(&self) -> Option<CatalogSnapshot> {
        self.inner.read().await.snapshot.clone()
    }

    /// Waits with the default timeout and poll interval.
    pub async fn wait_until_ready(&self) -> WarbandResult<CatalogSnapshot> {
        self.wait_until_ready_with(config::CATALOG_WAIT_TIMEOUT, config::CATALOG_POLL_INTERVAL)
            .await
    }

    /// Polls until catalogs are published, loading fails or `timeout` passes.
    pub async fn wait_until_ready_with(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> WarbandResult<CatalogSnapshot> {
        let start = Instant::now();
        loop {
            {
                let inner = self.inner.read().await;
                match (&inner.state, &inner.snapshot) {
                    (LoadState::Ready, Some(snapshot)) => return Ok(snapshot.clone()),
                    (LoadState::Failed(reason), _) => {
                        return Err(WarbandError::DataUnavailable(format!(
                            "catalog loading failed: {}",
                            reason
                        )))
                    }
                    _ => {}
                }
            }

            if start.elapsed() > timeout {
                warn!("Timed out after {:?} waiting for catalogs", timeout);
                return Err(WarbandError::DataUnavailable(format!(
                    "catalogs not loaded after {:?}",
                    timeout
                )));
            }
            debug!("Catalogs still loading, waiting");
            tokio::time::sleep(poll_interval).await;
        }
    }
}
