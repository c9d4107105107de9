use thiserror::Error;

use crate::catalog::CatalogError;
use crate::types::DistanceMetric;

#[derive(Error, Debug)]
pub enum MeridianError {
    // Definition shape errors
    #[error("invalid index name: {name:?}")]
    InvalidName { name: String },

    #[error("invalid replica count: {replica}")]
    InvalidReplica { replica: u32 },

    // Partition rule errors
    #[error("invalid partition bounds: {detail}")]
    InvalidPartitionBounds { detail: String },

    #[error("invalid hash bucket count: {count}")]
    InvalidBucketCount { count: u32 },

    // Parameter errors
    #[error("vector dimension out of range: {dimension}")]
    InvalidDimension { dimension: u32 },

    #[error("unsupported distance metric: {metric}")]
    UnsupportedMetric { metric: DistanceMetric },

    #[error("unsupported vector algorithm: {detail}")]
    UnsupportedAlgorithm { detail: String },

    #[error("unsupported scalar encoding: {detail}")]
    UnsupportedEncoding { detail: String },

    #[error("insufficient partitions: algorithm requires {required}, rule resolved {actual}")]
    InsufficientPartitions { required: usize, actual: usize },

    #[error("index parameter mismatch: {detail}")]
    ParameterMismatch { detail: String },

    // Catalog boundary errors
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("version race detected for index: {name}")]
    VersionRaceDetected { name: String },

    // Serialization errors
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Internal
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CatalogError> for MeridianError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::Unavailable(detail) => MeridianError::CatalogUnavailable(detail),
            CatalogError::Conflict { name } => MeridianError::VersionRaceDetected { name },
        }
    }
}

pub type Result<T> = std::result::Result<T, MeridianError>;

impl MeridianError {
    /// Whether the caller may retry the whole define call. Everything else
    /// rejects the request itself and will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MeridianError::CatalogUnavailable(_) | MeridianError::VersionRaceDetected { .. }
        )
    }
}
