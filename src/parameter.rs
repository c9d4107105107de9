use serde::{Deserialize, Serialize};

use crate::error::{MeridianError, Result};
use crate::types::{Collation, DistanceMetric, IndexType, KeyEncoding, NullPolicy};

/// Hard cap on vector dimensionality.
pub const MAX_DIMENSION: u32 = 32_768;

/// Vector index algorithm plus its tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorAlgorithm {
    /// Exact brute-force scan; no tuning.
    Flat,
    IvfFlat {
        ncentroids: u32,
    },
    IvfPq {
        ncentroids: u32,
        nsubvector: u32,
        nbits_per_idx: u32,
    },
    Hnsw {
        ef_construction: u32,
        nlinks: u32,
        max_elements: u64,
    },
    Diskann {
        max_degree: u32,
        search_list_size: u32,
    },
}

impl VectorAlgorithm {
    /// Smallest partition count the algorithm can be built on.
    pub fn min_partitions(&self) -> usize {
        match self {
            VectorAlgorithm::Diskann { .. } => 2,
            _ => 1,
        }
    }

    fn check(&self, dimension: u32) -> Result<()> {
        match *self {
            VectorAlgorithm::Flat => {}
            VectorAlgorithm::IvfFlat { ncentroids } => {
                if ncentroids == 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: "ivf_flat ncentroids must be >= 1".to_string(),
                    });
                }
            }
            VectorAlgorithm::IvfPq {
                ncentroids,
                nsubvector,
                nbits_per_idx,
            } => {
                if ncentroids == 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: "ivf_pq ncentroids must be >= 1".to_string(),
                    });
                }
                if nsubvector == 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: "ivf_pq nsubvector must be >= 1".to_string(),
                    });
                }
                if dimension % nsubvector != 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: format!(
                            "ivf_pq nsubvector {nsubvector} must divide dimension {dimension}"
                        ),
                    });
                }
                if !(1..=16).contains(&nbits_per_idx) {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: format!("ivf_pq nbits_per_idx {nbits_per_idx} must be 1..=16"),
                    });
                }
            }
            VectorAlgorithm::Hnsw {
                ef_construction,
                nlinks,
                max_elements,
            } => {
                if ef_construction == 0 || nlinks == 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: "hnsw ef_construction and nlinks must be >= 1".to_string(),
                    });
                }
                if max_elements == 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: "hnsw max_elements must be >= 1".to_string(),
                    });
                }
            }
            VectorAlgorithm::Diskann {
                max_degree,
                search_list_size,
            } => {
                if max_degree == 0 || search_list_size == 0 {
                    return Err(MeridianError::UnsupportedAlgorithm {
                        detail: "diskann max_degree and search_list_size must be >= 1".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parameters for a vector similarity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorIndexParams {
    pub dimension: u32,
    #[serde(default)]
    pub metric: DistanceMetric,
    pub algorithm: VectorAlgorithm,
}

/// Parameters for an ordered scalar/secondary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarIndexParams {
    #[serde(default)]
    pub encoding: KeyEncoding,
    #[serde(default)]
    pub nulls: NullPolicy,
    #[serde(default)]
    pub collation: Collation,
}

/// Tagged union of index parameters.
///
/// The active variant always matches the declared index type; wire payloads
/// that disagree with their tag are rejected at decode time, so a vector
/// payload can never be read off a scalar-tagged definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ParameterRepr", into = "ParameterRepr")]
pub enum IndexParameter {
    None,
    Vector(VectorIndexParams),
    Scalar(ScalarIndexParams),
}

impl IndexParameter {
    /// The wire tag for this variant.
    pub fn index_type(&self) -> IndexType {
        match self {
            IndexParameter::None => IndexType::None,
            IndexParameter::Vector(_) => IndexType::Vector,
            IndexParameter::Scalar(_) => IndexType::Scalar,
        }
    }

    /// Vector payload, if this is a vector parameter.
    pub fn as_vector(&self) -> Option<&VectorIndexParams> {
        match self {
            IndexParameter::Vector(params) => Some(params),
            _ => None,
        }
    }

    /// Scalar payload, if this is a scalar parameter.
    pub fn as_scalar(&self) -> Option<&ScalarIndexParams> {
        match self {
            IndexParameter::Scalar(params) => Some(params),
            _ => None,
        }
    }

    /// Validate the parameter against the resolved partition count.
    ///
    /// `None` is always valid and short-circuits. The match is exhaustive
    /// over the closed set of kinds: adding a kind is a compile-time
    /// visible change everywhere definitions are handled.
    pub fn validate(&self, partition_count: usize) -> Result<()> {
        match self {
            IndexParameter::None => Ok(()),
            IndexParameter::Vector(params) => validate_vector(params, partition_count),
            IndexParameter::Scalar(params) => validate_scalar(params),
        }
    }
}

fn validate_vector(params: &VectorIndexParams, partition_count: usize) -> Result<()> {
    if params.dimension == 0 || params.dimension > MAX_DIMENSION {
        return Err(MeridianError::InvalidDimension {
            dimension: params.dimension,
        });
    }
    if params.metric == DistanceMetric::Unspecified {
        return Err(MeridianError::UnsupportedMetric {
            metric: params.metric,
        });
    }
    params.algorithm.check(params.dimension)?;

    let required = params.algorithm.min_partitions();
    if partition_count < required {
        return Err(MeridianError::InsufficientPartitions {
            required,
            actual: partition_count,
        });
    }
    Ok(())
}

fn validate_scalar(params: &ScalarIndexParams) -> Result<()> {
    if params.encoding == KeyEncoding::Unspecified {
        return Err(MeridianError::UnsupportedEncoding {
            detail: "key encoding not specified".to_string(),
        });
    }
    if params.nulls == NullPolicy::Unspecified {
        return Err(MeridianError::UnsupportedEncoding {
            detail: "null ordering not specified".to_string(),
        });
    }
    Ok(())
}

/// Raw wire shape: explicit tag plus optional payloads. `TryFrom` enforces
/// that exactly the payload matching the tag is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParameterRepr {
    index_type: IndexType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vector_params: Option<VectorIndexParams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scalar_params: Option<ScalarIndexParams>,
}

impl From<IndexParameter> for ParameterRepr {
    fn from(parameter: IndexParameter) -> Self {
        match parameter {
            IndexParameter::None => ParameterRepr {
                index_type: IndexType::None,
                vector_params: None,
                scalar_params: None,
            },
            IndexParameter::Vector(params) => ParameterRepr {
                index_type: IndexType::Vector,
                vector_params: Some(params),
                scalar_params: None,
            },
            IndexParameter::Scalar(params) => ParameterRepr {
                index_type: IndexType::Scalar,
                vector_params: None,
                scalar_params: Some(params),
            },
        }
    }
}

impl TryFrom<ParameterRepr> for IndexParameter {
    type Error = MeridianError;

    fn try_from(repr: ParameterRepr) -> Result<Self> {
        match (repr.index_type, repr.vector_params, repr.scalar_params) {
            (IndexType::None, None, None) => Ok(IndexParameter::None),
            (IndexType::Vector, Some(params), None) => Ok(IndexParameter::Vector(params)),
            (IndexType::Scalar, None, Some(params)) => Ok(IndexParameter::Scalar(params)),
            (index_type, vector, scalar) => Err(MeridianError::ParameterMismatch {
                detail: format!(
                    "index_type {index_type} with vector_params {} and scalar_params {}",
                    presence(vector.is_some()),
                    presence(scalar.is_some()),
                ),
            }),
        }
    }
}

fn presence(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "absent"
    }
}
