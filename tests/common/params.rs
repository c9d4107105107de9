use meridian::parameter::{
    IndexParameter, ScalarIndexParams, VectorAlgorithm, VectorIndexParams,
};
use meridian::partition::{KeyBound, KeyRange, PartitionStrategy};
use meridian::types::{Collation, DistanceMetric, KeyEncoding, NullPolicy};

/// Range strategy from a fence-post list of split keys:
/// `[a, b, c]` declares the ranges `[a, b)` and `[b, c)`.
pub fn range_strategy(posts: &[&[u8]]) -> PartitionStrategy {
    let ranges = posts
        .windows(2)
        .map(|pair| {
            KeyRange::new(
                KeyBound::Key(pair[0].to_vec()),
                KeyBound::Key(pair[1].to_vec()),
            )
        })
        .collect();
    PartitionStrategy::Range { ranges }
}

pub fn hash_strategy(buckets: u32) -> PartitionStrategy {
    PartitionStrategy::Hash { buckets }
}

/// The common vector fixture: 128-dim cosine HNSW.
pub fn base_vector_params() -> VectorIndexParams {
    VectorIndexParams {
        dimension: 128,
        metric: DistanceMetric::Cosine,
        algorithm: VectorAlgorithm::Hnsw {
            ef_construction: 200,
            nlinks: 16,
            max_elements: 1_000_000,
        },
    }
}

pub fn hnsw_vector_params() -> IndexParameter {
    IndexParameter::Vector(base_vector_params())
}

pub fn flat_vector_params(dimension: u32) -> IndexParameter {
    IndexParameter::Vector(VectorIndexParams {
        dimension,
        metric: DistanceMetric::L2,
        algorithm: VectorAlgorithm::Flat,
    })
}

pub fn base_scalar_params() -> ScalarIndexParams {
    ScalarIndexParams {
        encoding: KeyEncoding::FixedWidth,
        nulls: NullPolicy::NullsLast,
        collation: Collation::Binary,
    }
}

pub fn scalar_params() -> IndexParameter {
    IndexParameter::Scalar(base_scalar_params())
}
