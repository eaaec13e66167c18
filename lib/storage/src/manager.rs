use crate::loader::CatalogLoader;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use vmatch_core::{Catalog, Error, Result};

/// Process-wide holder of the current catalog.
///
/// [`CatalogStore::snapshot`] takes a shared read lock only long enough to
/// clone the `Arc`; ranking then runs on the snapshot with no lock held.
/// Reloads build a new [`Catalog`] off to the side and replace the pointer
/// under a brief write lock. A catalog is never modified in place.
pub struct CatalogStore {
    current: RwLock<Arc<Catalog>>,
    loader: Option<CatalogLoader>,
}

impl CatalogStore {
    /// Open the catalog file. Load failures leave the store with an empty catalog.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let loader = CatalogLoader::new(path);
        let catalog = loader.load_or_empty();
        Self {
            current: RwLock::new(Arc::new(catalog)),
            loader: Some(loader),
        }
    }

    /// Store over an in-memory catalog with no backing file
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
            loader: None,
        }
    }

    /// Current catalog
    #[inline]
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().clone()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.loader.as_ref().map(|l| l.path())
    }

    /// Swap in a new catalog, returning the previous one
    pub fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        std::mem::replace(&mut *self.current.write(), next)
    }

    /// Re-read the backing file and swap it in.
    ///
    /// On failure the current catalog stays active. Returns the new product count.
    pub fn reload(&self) -> Result<usize> {
        let loader = self.loader.as_ref().ok_or_else(|| {
            Error::InvalidConfig("catalog has no backing file to reload from".to_string())
        })?;

        match loader.load() {
            Ok(catalog) => {
                let count = catalog.len();
                let previous = self.replace(catalog);
                info!("Catalog reloaded: {} -> {} products", previous.len(), count);
                Ok(count)
            }
            Err(e) => {
                warn!("Catalog reload failed, keeping {} products: {}", self.len(), e);
                Err(e)
            }
        }
    }
}
