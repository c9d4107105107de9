use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{MeridianError, Result};
use crate::parameter::IndexParameter;
use crate::partition::{check_partition_map, locate, Partition};
use crate::types::IndexType;

/// The validated, immutable contract for one logical index.
///
/// Built only by [`IndexDefiner::define_index`], or by decoding a
/// previously published record (which re-checks the structural invariants).
/// Fields are read through getters; re-definition produces a new record
/// with a bumped version instead of mutating this one.
///
/// [`IndexDefiner::define_index`]: crate::definer::IndexDefiner::define_index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DefinitionRepr", into = "DefinitionRepr")]
pub struct IndexDefinition {
    name: String,
    version: u32,
    partitions: Vec<Partition>,
    replica: u32,
    parameter: IndexParameter,
}

impl IndexDefinition {
    /// Assemble a record whose parts already passed resolution and
    /// validation.
    pub(crate) fn new(
        name: String,
        version: u32,
        partitions: Vec<Partition>,
        replica: u32,
        parameter: IndexParameter,
    ) -> Self {
        Self {
            name,
            version,
            partitions,
            replica,
            parameter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Resolved partition map, ascending by key/bucket.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn replica(&self) -> u32 {
        self.replica
    }

    pub fn parameter(&self) -> &IndexParameter {
        &self.parameter
    }

    /// The wire tag of the parameter variant. Downstream consumers dispatch
    /// on this before touching the payload.
    pub fn index_type(&self) -> IndexType {
        self.parameter.index_type()
    }

    /// Map a key to its owning partition. Always `Some`: definer-built and
    /// decoded records alike carry an exhaustive partition map.
    pub fn partition_for(&self, key: &[u8]) -> Option<&Partition> {
        locate(&self.partitions, key)
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let json = serde_json::to_vec_pretty(self)?;
        Ok(Bytes::from(json))
    }

    /// Deserialize from JSON bytes, re-checking the structural invariants.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Raw wire shape of a definition. The parameter payload is flattened so
/// the encoded form carries `index_type` plus exactly one params field at
/// the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DefinitionRepr {
    name: String,
    version: u32,
    partitions: Vec<Partition>,
    replica: u32,
    #[serde(flatten)]
    parameter: IndexParameter,
}

impl From<IndexDefinition> for DefinitionRepr {
    fn from(definition: IndexDefinition) -> Self {
        DefinitionRepr {
            name: definition.name,
            version: definition.version,
            partitions: definition.partitions,
            replica: definition.replica,
            parameter: definition.parameter,
        }
    }
}

impl TryFrom<DefinitionRepr> for IndexDefinition {
    type Error = MeridianError;

    fn try_from(repr: DefinitionRepr) -> Result<Self> {
        if repr.name.is_empty() {
            return Err(MeridianError::InvalidName { name: repr.name });
        }
        if repr.replica == 0 {
            return Err(MeridianError::InvalidReplica {
                replica: repr.replica,
            });
        }
        check_partition_map(&repr.partitions)?;
        Ok(IndexDefinition {
            name: repr.name,
            version: repr.version,
            partitions: repr.partitions,
            replica: repr.replica,
            parameter: repr.parameter,
        })
    }
}
