use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use meridian::catalog::{Catalog, CatalogError, CatalogResult};
use meridian::definition::IndexDefinition;

/// Catalog whose every call fails as unavailable.
pub struct UnavailableCatalog;

#[async_trait]
impl Catalog for UnavailableCatalog {
    async fn current_version(&self, _name: &str) -> CatalogResult<Option<u32>> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }

    async fn publish(&self, _definition: &IndexDefinition) -> CatalogResult<()> {
        Err(CatalogError::Unavailable("catalog offline".to_string()))
    }
}

/// Reports no published versions but rejects every publish, as if another
/// definer won the race between lookup and publish.
pub struct RacingCatalog;

#[async_trait]
impl Catalog for RacingCatalog {
    async fn current_version(&self, _name: &str) -> CatalogResult<Option<u32>> {
        Ok(None)
    }

    async fn publish(&self, definition: &IndexDefinition) -> CatalogResult<()> {
        Err(CatalogError::Conflict {
            name: definition.name().to_string(),
        })
    }
}

/// Fails every version lookup and counts publish attempts, to assert that
/// a failed lookup aborts the flow before any publish.
#[derive(Default)]
pub struct LookupFailCatalog {
    pub publishes: AtomicUsize,
}

#[async_trait]
impl Catalog for LookupFailCatalog {
    async fn current_version(&self, _name: &str) -> CatalogResult<Option<u32>> {
        Err(CatalogError::Unavailable("lookup timeout".to_string()))
    }

    async fn publish(&self, _definition: &IndexDefinition) -> CatalogResult<()> {
        self.publishes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Reports every name as already at the last representable version, and
/// counts publish attempts to assert none get through.
#[derive(Default)]
pub struct ExhaustedCatalog {
    pub publishes: AtomicUsize,
}

#[async_trait]
impl Catalog for ExhaustedCatalog {
    async fn current_version(&self, _name: &str) -> CatalogResult<Option<u32>> {
        Ok(Some(u32::MAX))
    }

    async fn publish(&self, _definition: &IndexDefinition) -> CatalogResult<()> {
        self.publishes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
