//! Shared catalog snapshot
//!
//! Requests take an `Arc` snapshot once and compile against it; a reload
//! swaps the whole catalog so readers see either the old or the new one.

use std::path::Path;
use std::sync::{Arc, RwLock};

use super::errors::CatalogResult;
use super::loader::CatalogLoader;
use super::types::FieldCatalog;

/// Process-wide handle to the current catalog
#[derive(Debug, Clone)]
pub struct CatalogHandle {
    current: Arc<RwLock<Arc<FieldCatalog>>>,
}

impl CatalogHandle {
    pub fn new(catalog: FieldCatalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// Loads the initial catalog from disk
    pub fn open(path: &Path) -> CatalogResult<Self> {
        Ok(Self::new(CatalogLoader::load(path)?))
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> Arc<FieldCatalog> {
        // A poisoned lock still holds a complete Arc; the swap is a single store.
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Replaces the catalog for all subsequent snapshots.
    pub fn replace(&self, catalog: FieldCatalog) {
        let next = Arc::new(catalog);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Reloads from disk. On failure the current snapshot stays in place.
    pub fn reload(&self, path: &Path) -> CatalogResult<Arc<FieldCatalog>> {
        let catalog = CatalogLoader::load(path)?;
        self.replace(catalog);
        tracing::info!(path = %path.display(), "catalog reloaded");
        Ok(self.snapshot())
    }
}
