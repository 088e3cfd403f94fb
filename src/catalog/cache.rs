//! CachedCatalog: TTL snapshot cache over a `CatalogSource`.
//!
//! Copy-on-read: readers clone the current `Arc<Catalogs>` and keep it for
//! as long as they like. A refresh builds a complete new snapshot off-lock
//! and swaps it in, so it never waits on readers and readers never see a
//! half-refreshed catalog.
//!
//! A category that fails to load keeps its previously cached list, or the
//! static fallback list when nothing was cached yet.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use instant::Instant;
use serde::{Deserialize, Serialize};

use super::{CatalogProvider, CatalogSource, Catalogs, EntityCategory};

// =============================================================================
// Config
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a loaded snapshot stays fresh. Default: 300
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_ttl_secs() -> u64 {
    300
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

// =============================================================================
// CachedCatalog
// =============================================================================

struct CacheSlot {
    catalogs: Arc<Catalogs>,
    loaded_at: Instant,
}

pub struct CachedCatalog<S> {
    source: S,
    fallback: Catalogs,
    ttl: Duration,
    slot: RwLock<Option<CacheSlot>>,
    hits: AtomicU64,
    refreshes: AtomicU64,
    failures: AtomicU64,
}

impl<S: CatalogSource> CachedCatalog<S> {
    pub fn new(source: S, fallback: Catalogs, config: &CacheConfig) -> Self {
        Self::with_ttl(source, fallback, config.ttl())
    }

    pub fn with_ttl(source: S, fallback: Catalogs, ttl: Duration) -> Self {
        Self {
            source,
            fallback,
            ttl,
            slot: RwLock::new(None),
            hits: AtomicU64::new(0),
            refreshes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Reload every category now and publish the result
    pub fn refresh(&self) -> Arc<Catalogs> {
        self.refreshes.fetch_add(1, Ordering::Relaxed);

        let previous = self.read_slot().as_ref().map(|slot| Arc::clone(&slot.catalogs));
        let mut next = Catalogs::default();

        for category in EntityCategory::ALL {
            let entities = match self.source.load(category) {
                Ok(entities) => entities,
                Err(_e) => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    #[cfg(target_arch = "wasm32")]
                    web_sys::console::warn_1(&format!(
                        "[CachedCatalog] {} load failed, serving cached data: {}",
                        category, _e
                    ).into());

                    match &previous {
                        Some(prev) => prev.list(category).to_vec(),
                        None => self.fallback.list(category).to_vec(),
                    }
                }
            };
            next.set_list(category, entities);
        }

        let next = Arc::new(next);
        *self.write_slot() = Some(CacheSlot {
            catalogs: Arc::clone(&next),
            loaded_at: Instant::now(),
        });
        next
    }

    /// Mark the cached snapshot stale; the next `snapshot()` reloads
    pub fn invalidate(&self) {
        *self.write_slot() = None;
    }

    /// Snapshots served from cache without reloading
    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Category loads that fell back to cached or static data
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Option<CacheSlot>> {
        self.slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Option<CacheSlot>> {
        self.slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<S: CatalogSource> CatalogProvider for CachedCatalog<S> {
    fn snapshot(&self) -> Arc<Catalogs> {
        if let Some(slot) = self.read_slot().as_ref() {
            if slot.loaded_at.elapsed() < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Arc::clone(&slot.catalogs);
            }
        }
        self.refresh()
    }
}

// =============================================================================
// Tests
// =============================================================================
