use serde::{Deserialize, Serialize};

/// Stable ordinal identifier for a partition within one definition.
pub type PartitionId = u32;

/// The kind of index a definition declares. Doubles as the wire tag that
/// discriminates which parameter payload is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexType {
    /// Placeholder/disabled index; carries no parameter payload.
    #[default]
    None,
    Vector,
    Scalar,
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexType::None => write!(f, "none"),
            IndexType::Vector => write!(f, "vector"),
            IndexType::Scalar => write!(f, "scalar"),
        }
    }
}

/// Distance metric for vector comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Zero value carried by unset or unrecognized wire fields.
    /// Never valid in a published definition.
    #[default]
    Unspecified,
    L2,
    Cosine,
    InnerProduct,
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DistanceMetric::Unspecified => write!(f, "unspecified"),
            DistanceMetric::L2 => write!(f, "l2"),
            DistanceMetric::Cosine => write!(f, "cosine"),
            DistanceMetric::InnerProduct => write!(f, "inner_product"),
        }
    }
}

/// Physical layout of scalar index keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
    #[default]
    Unspecified,
    FixedWidth,
    VariableLength,
}

/// Where NULL keys sort in a scalar index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    #[default]
    Unspecified,
    NullsFirst,
    NullsLast,
    RejectNulls,
}

/// Key comparison rule for scalar indexes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    #[default]
    Binary,
    CaseInsensitive,
}
