use tracing::{debug, info, instrument, warn};

use crate::catalog::Catalog;
use crate::definition::IndexDefinition;
use crate::error::{MeridianError, Result};
use crate::parameter::IndexParameter;
use crate::partition::PartitionStrategy;

/// Builds and publishes index definitions.
///
/// The only mutation entry point: resolution, validation, version
/// assignment and publishing happen inside one call, and no partially
/// built state is observable outside it. The catalog is an explicit
/// collaborator so resolution and validation stay testable without one.
pub struct IndexDefiner<C> {
    catalog: C,
}

impl<C: Catalog> IndexDefiner<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// The catalog this definer publishes through.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Define (or re-define) the index `name`.
    ///
    /// Resolves the partition rule, validates the parameter against the
    /// resolved partition count, assigns the next version for `name` and
    /// publishes the record through the catalog.
    ///
    /// # Errors
    /// Input and semantic rejections (`InvalidName`, `InvalidReplica`,
    /// resolver and validator kinds) are permanent for the given inputs.
    /// `CatalogUnavailable` and `VersionRaceDetected` are retryable; a race
    /// means another definer won the version, so callers re-run the whole
    /// call rather than re-publishing the stale record.
    #[instrument(skip(self, strategy, parameter))]
    pub async fn define_index(
        &self,
        name: &str,
        strategy: &PartitionStrategy,
        replica: u32,
        parameter: IndexParameter,
    ) -> Result<IndexDefinition> {
        let index_type = parameter.index_type().to_string();
        let result = self
            .build_and_publish(name, strategy, replica, parameter)
            .await;

        match &result {
            Ok(definition) => {
                let strategy_kind = match strategy {
                    PartitionStrategy::Range { .. } => "range",
                    PartitionStrategy::Hash { .. } => "hash",
                };
                crate::metrics::DEFINES_TOTAL
                    .with_label_values(&[index_type.as_str(), "ok"])
                    .inc();
                crate::metrics::RESOLVED_PARTITIONS
                    .with_label_values(&[strategy_kind])
                    .observe(definition.partitions().len() as f64);
                info!(
                    version = definition.version(),
                    partitions = definition.partitions().len(),
                    replica,
                    index_type = %definition.index_type(),
                    "index definition published"
                );
            }
            Err(e) => {
                let status = match e {
                    MeridianError::VersionRaceDetected { .. } => {
                        crate::metrics::CATALOG_CONFLICTS_TOTAL
                            .with_label_values(&[name])
                            .inc();
                        "conflict"
                    }
                    MeridianError::CatalogUnavailable(_) => "unavailable",
                    _ => "invalid",
                };
                crate::metrics::DEFINES_TOTAL
                    .with_label_values(&[index_type.as_str(), status])
                    .inc();
                warn!(error = %e, "index definition rejected");
            }
        }

        result
    }

    async fn build_and_publish(
        &self,
        name: &str,
        strategy: &PartitionStrategy,
        replica: u32,
        parameter: IndexParameter,
    ) -> Result<IndexDefinition> {
        // Cheap shape checks before any resolution work.
        if name.is_empty() {
            return Err(MeridianError::InvalidName {
                name: name.to_string(),
            });
        }
        if replica == 0 {
            return Err(MeridianError::InvalidReplica { replica });
        }

        let partitions = strategy.resolve()?;
        parameter.validate(partitions.len())?;

        let version = match self.catalog.current_version(name).await? {
            Some(current) => current.checked_add(1).ok_or_else(|| {
                MeridianError::Internal(format!("version space exhausted for index: {name}"))
            })?,
            None => 0,
        };

        debug!(version, partitions = partitions.len(), "resolved index definition");

        let definition =
            IndexDefinition::new(name.to_string(), version, partitions, replica, parameter);
        self.catalog.publish(&definition).await?;

        Ok(definition)
    }
}
