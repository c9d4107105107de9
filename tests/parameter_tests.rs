mod common;

use common::params::{base_scalar_params, base_vector_params};

use meridian::error::MeridianError;
use meridian::parameter::{IndexParameter, VectorAlgorithm, MAX_DIMENSION};
use meridian::types::{DistanceMetric, IndexType, KeyEncoding, NullPolicy};

// ─── Vector validation tests ───

#[test]
fn test_vector_params_valid() {
    let parameter = IndexParameter::Vector(base_vector_params());
    assert!(parameter.validate(2).is_ok());
}

#[test]
fn test_vector_rejects_zero_dimension() {
    let mut params = base_vector_params();
    params.dimension = 0;
    match IndexParameter::Vector(params).validate(2).unwrap_err() {
        MeridianError::InvalidDimension { dimension } => assert_eq!(dimension, 0),
        other => panic!("expected InvalidDimension, got: {other}"),
    }
}

#[test]
fn test_vector_rejects_oversize_dimension() {
    let mut params = base_vector_params();
    params.dimension = MAX_DIMENSION + 1;
    match IndexParameter::Vector(params).validate(2).unwrap_err() {
        MeridianError::InvalidDimension { dimension } => {
            assert_eq!(dimension, MAX_DIMENSION + 1);
        }
        other => panic!("expected InvalidDimension, got: {other}"),
    }
}

#[test]
fn test_vector_rejects_unspecified_metric() {
    let mut params = base_vector_params();
    params.metric = DistanceMetric::Unspecified;
    match IndexParameter::Vector(params).validate(2).unwrap_err() {
        MeridianError::UnsupportedMetric { metric } => {
            assert_eq!(metric, DistanceMetric::Unspecified);
        }
        other => panic!("expected UnsupportedMetric, got: {other}"),
    }
}

#[test]
fn test_ivf_flat_rejects_zero_centroids() {
    let mut params = base_vector_params();
    params.algorithm = VectorAlgorithm::IvfFlat { ncentroids: 0 };
    assert!(matches!(
        IndexParameter::Vector(params).validate(2).unwrap_err(),
        MeridianError::UnsupportedAlgorithm { .. }
    ));
}

#[test]
fn test_ivf_pq_rejects_nonaligned_subvectors() {
    let mut params = base_vector_params();
    params.algorithm = VectorAlgorithm::IvfPq {
        ncentroids: 256,
        nsubvector: 7,
        nbits_per_idx: 8,
    };
    match IndexParameter::Vector(params).validate(2).unwrap_err() {
        MeridianError::UnsupportedAlgorithm { detail } => {
            assert!(detail.contains("divide"), "got: {detail}");
        }
        other => panic!("expected UnsupportedAlgorithm, got: {other}"),
    }
}

#[test]
fn test_ivf_pq_rejects_nbits_out_of_range() {
    for nbits in [0, 17] {
        let mut params = base_vector_params();
        params.algorithm = VectorAlgorithm::IvfPq {
            ncentroids: 256,
            nsubvector: 16,
            nbits_per_idx: nbits,
        };
        match IndexParameter::Vector(params).validate(2).unwrap_err() {
            MeridianError::UnsupportedAlgorithm { detail } => {
                assert!(detail.contains("nbits_per_idx"), "got: {detail}");
            }
            other => panic!("expected UnsupportedAlgorithm, got: {other}"),
        }
    }
}

#[test]
fn test_hnsw_rejects_zero_links() {
    let mut params = base_vector_params();
    params.algorithm = VectorAlgorithm::Hnsw {
        ef_construction: 200,
        nlinks: 0,
        max_elements: 1000,
    };
    assert!(matches!(
        IndexParameter::Vector(params).validate(2).unwrap_err(),
        MeridianError::UnsupportedAlgorithm { .. }
    ));
}

#[test]
fn test_diskann_requires_two_partitions() {
    let mut params = base_vector_params();
    params.algorithm = VectorAlgorithm::Diskann {
        max_degree: 64,
        search_list_size: 100,
    };
    let parameter = IndexParameter::Vector(params);

    match parameter.validate(1).unwrap_err() {
        MeridianError::InsufficientPartitions { required, actual } => {
            assert_eq!(required, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected InsufficientPartitions, got: {other}"),
    }
    assert!(parameter.validate(2).is_ok());
}

#[test]
fn test_diskann_rejects_zero_tuning() {
    for (max_degree, search_list_size) in [(0, 100), (64, 0)] {
        let mut params = base_vector_params();
        params.algorithm = VectorAlgorithm::Diskann {
            max_degree,
            search_list_size,
        };
        match IndexParameter::Vector(params).validate(2).unwrap_err() {
            MeridianError::UnsupportedAlgorithm { detail } => {
                assert!(detail.contains("diskann"), "got: {detail}");
            }
            other => panic!("expected UnsupportedAlgorithm, got: {other}"),
        }
    }
}

// ─── Scalar validation tests ───

#[test]
fn test_scalar_params_valid() {
    let parameter = IndexParameter::Scalar(base_scalar_params());
    assert!(parameter.validate(1).is_ok());
}

#[test]
fn test_scalar_rejects_unspecified_encoding() {
    let mut params = base_scalar_params();
    params.encoding = KeyEncoding::Unspecified;
    match IndexParameter::Scalar(params).validate(1).unwrap_err() {
        MeridianError::UnsupportedEncoding { detail } => {
            assert!(detail.contains("encoding"), "got: {detail}");
        }
        other => panic!("expected UnsupportedEncoding, got: {other}"),
    }
}

#[test]
fn test_scalar_rejects_unspecified_nulls() {
    let mut params = base_scalar_params();
    params.nulls = NullPolicy::Unspecified;
    match IndexParameter::Scalar(params).validate(1).unwrap_err() {
        MeridianError::UnsupportedEncoding { detail } => {
            assert!(detail.contains("null"), "got: {detail}");
        }
        other => panic!("expected UnsupportedEncoding, got: {other}"),
    }
}

#[test]
fn test_none_always_valid() {
    assert!(IndexParameter::None.validate(1).is_ok());
    assert_eq!(IndexParameter::None.index_type(), IndexType::None);
}

// ─── Wire tag tests ───

#[test]
fn test_parameter_wire_shape_vector() {
    let parameter = IndexParameter::Vector(base_vector_params());
    let value = serde_json::to_value(&parameter).unwrap();
    let expected = serde_json::json!({
        "index_type": "vector",
        "vector_params": {
            "dimension": 128,
            "metric": "cosine",
            "algorithm": {
                "kind": "hnsw",
                "ef_construction": 200,
                "nlinks": 16,
                "max_elements": 1_000_000u64
            }
        }
    });
    assert_eq!(value, expected);
}

#[test]
fn test_parameter_wire_shape_none() {
    let value = serde_json::to_value(&IndexParameter::None).unwrap();
    assert_eq!(value, serde_json::json!({ "index_type": "none" }));
}

#[test]
fn test_parameter_rejects_mismatched_payload() {
    let raw = serde_json::json!({
        "index_type": "vector",
        "scalar_params": { "encoding": "fixed_width", "nulls": "nulls_last" }
    });
    let err = serde_json::from_value::<IndexParameter>(raw).unwrap_err();
    assert!(err.to_string().contains("mismatch"), "got: {err}");
}

#[test]
fn test_parameter_rejects_missing_payload() {
    let raw = serde_json::json!({ "index_type": "scalar" });
    let err = serde_json::from_value::<IndexParameter>(raw).unwrap_err();
    assert!(err.to_string().contains("mismatch"), "got: {err}");
}

#[test]
fn test_parameter_rejects_double_payload() {
    let raw = serde_json::json!({
        "index_type": "none",
        "vector_params": {
            "dimension": 8,
            "metric": "l2",
            "algorithm": { "kind": "flat" }
        },
        "scalar_params": { "encoding": "fixed_width", "nulls": "nulls_last" }
    });
    let err = serde_json::from_value::<IndexParameter>(raw).unwrap_err();
    assert!(err.to_string().contains("mismatch"), "got: {err}");
}

#[test]
fn test_parameter_roundtrip_preserves_tag() {
    let parameter = IndexParameter::Scalar(base_scalar_params());
    let value = serde_json::to_value(&parameter).unwrap();
    let back: IndexParameter = serde_json::from_value(value).unwrap();
    assert_eq!(back.index_type(), IndexType::Scalar);
    assert!(back.as_scalar().is_some());
    assert!(back.as_vector().is_none());
    assert_eq!(back, parameter);
}

#[test]
fn test_metric_defaults_to_unspecified_on_wire() {
    let raw = serde_json::json!({
        "index_type": "vector",
        "vector_params": {
            "dimension": 64,
            "algorithm": { "kind": "flat" }
        }
    });
    let parameter: IndexParameter = serde_json::from_value(raw).unwrap();
    let vector = parameter.as_vector().unwrap();
    assert_eq!(vector.metric, DistanceMetric::Unspecified);
    assert!(matches!(
        parameter.validate(1).unwrap_err(),
        MeridianError::UnsupportedMetric { .. }
    ));
}
