//! CatalogProvider: the single capability the annotation layer needs from
//! the catalog side - "give me the current snapshot".

use std::sync::Arc;

use super::{Catalogs, CatalogError, EntityCategory, Entity};

/// Hands out immutable catalog snapshots.
///
/// Implementations may refresh their data at any time; callers hold the
/// returned `Arc` for the duration of one annotation and never observe a
/// refresh mid-call.
pub trait CatalogProvider: Send + Sync {
    fn snapshot(&self) -> Arc<Catalogs>;
}

impl CatalogProvider for Arc<Catalogs> {
    fn snapshot(&self) -> Arc<Catalogs> {
        Arc::clone(self)
    }
}

/// Backing store for one category of records (database, JSON export, ...)
pub trait CatalogSource: Send + Sync {
    fn load(&self, category: EntityCategory) -> Result<Vec<Entity>, CatalogError>;
}

/// A provider over a fixed snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    catalogs: Arc<Catalogs>,
}

impl StaticCatalog {
    pub fn new(catalogs: Catalogs) -> Self {
        Self {
            catalogs: Arc::new(catalogs),
        }
    }
}

impl CatalogProvider for StaticCatalog {
    fn snapshot(&self) -> Arc<Catalogs> {
        Arc::clone(&self.catalogs)
    }
}

/// A source that serves lists out of a snapshot. Used as the static
/// fallback data and in tests.
impl CatalogSource for Catalogs {
    fn load(&self, category: EntityCategory) -> Result<Vec<Entity>, CatalogError> {
        Ok(self.list(category).to_vec())
    }
}
