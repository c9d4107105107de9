use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::definition::IndexDefinition;

/// Errors surfaced by catalog projections. The definer maps these into
/// core error kinds at the boundary.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("version conflict publishing index: {name}")]
    Conflict { name: String },
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Boundary to the system of record for published definitions.
///
/// Implementations must serialize concurrent publishes of one name and
/// reject any publish whose version is not the next one for that name; the
/// definer surfaces the conflict to the caller for a full retry.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Latest published version for `name`, or `None` if never defined.
    async fn current_version(&self, name: &str) -> CatalogResult<Option<u32>>;

    /// Durably record a freshly built definition.
    async fn publish(&self, definition: &IndexDefinition) -> CatalogResult<()>;
}

#[async_trait]
impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    async fn current_version(&self, name: &str) -> CatalogResult<Option<u32>> {
        (**self).current_version(name).await
    }

    async fn publish(&self, definition: &IndexDefinition) -> CatalogResult<()> {
        (**self).publish(definition).await
    }
}

/// One published definition plus its catalog bookkeeping.
#[derive(Debug, Clone)]
struct PublishedRecord {
    definition: IndexDefinition,
    published_at: DateTime<Utc>,
}

/// In-memory catalog projection for embedding and tests.
///
/// Keeps the full version history per name so prior versions stay readable
/// for point-in-time lookups. Publishes for one name are serialized by the
/// map's per-entry lock.
#[derive(Default)]
pub struct MemoryCatalog {
    indexes: DashMap<String, Vec<PublishedRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            indexes: DashMap::new(),
        }
    }

    /// Latest published definition for `name`.
    pub fn latest(&self, name: &str) -> Option<IndexDefinition> {
        self.indexes
            .get(name)
            .and_then(|history| history.last().map(|r| r.definition.clone()))
    }

    /// Point-in-time lookup of one published version.
    pub fn at_version(&self, name: &str, version: u32) -> Option<IndexDefinition> {
        self.indexes.get(name).and_then(|history| {
            history
                .iter()
                .find(|r| r.definition.version() == version)
                .map(|r| r.definition.clone())
        })
    }

    /// When `version` of `name` was published.
    pub fn published_at(&self, name: &str, version: u32) -> Option<DateTime<Utc>> {
        self.indexes.get(name).and_then(|history| {
            history
                .iter()
                .find(|r| r.definition.version() == version)
                .map(|r| r.published_at)
        })
    }

    /// Published versions of `name`, ascending.
    pub fn versions(&self, name: &str) -> Vec<u32> {
        self.indexes
            .get(name)
            .map(|history| history.iter().map(|r| r.definition.version()).collect())
            .unwrap_or_default()
    }

    /// All index names with at least one published version.
    pub fn names(&self) -> Vec<String> {
        self.indexes.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Drop every version of `name`. Returns whether anything was removed.
    /// A later re-definition of the name starts over at version 0.
    pub fn drop_index(&self, name: &str) -> bool {
        self.indexes.remove(name).is_some()
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn current_version(&self, name: &str) -> CatalogResult<Option<u32>> {
        Ok(self
            .indexes
            .get(name)
            .and_then(|history| history.last().map(|r| r.definition.version())))
    }

    async fn publish(&self, definition: &IndexDefinition) -> CatalogResult<()> {
        let record = PublishedRecord {
            definition: definition.clone(),
            published_at: Utc::now(),
        };
        // The entry guard holds the shard lock, so the check-and-append is
        // atomic per name.
        match self.indexes.entry(definition.name().to_string()) {
            Entry::Occupied(mut entry) => {
                let expected = entry
                    .get()
                    .last()
                    .and_then(|r| r.definition.version().checked_add(1));
                if expected != Some(definition.version()) {
                    return Err(CatalogError::Conflict {
                        name: definition.name().to_string(),
                    });
                }
                entry.get_mut().push(record);
            }
            Entry::Vacant(entry) => {
                if definition.version() != 0 {
                    return Err(CatalogError::Conflict {
                        name: definition.name().to_string(),
                    });
                }
                entry.insert(vec![record]);
            }
        }
        debug!(
            index = definition.name(),
            version = definition.version(),
            "published index definition"
        );
        Ok(())
    }
}
