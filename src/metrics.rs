use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

lazy_static::lazy_static! {
    pub static ref DEFINES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "meridian_defines_total", "Index define calls", &["index_type", "status"]
    ).unwrap();
    pub static ref CATALOG_CONFLICTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "meridian_catalog_conflicts_total", "Publishes rejected by version conflict", &["index"]
    ).unwrap();
    pub static ref RESOLVED_PARTITIONS: HistogramVec = register_histogram_vec!(
        "meridian_resolved_partitions", "Partitions per resolved rule", &["strategy"],
        vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0, 64.0, 256.0, 1024.0, 4096.0, 16384.0, 65536.0]
    ).unwrap();
}

pub fn init() {
    lazy_static::initialize(&DEFINES_TOTAL);
    lazy_static::initialize(&CATALOG_CONFLICTS_TOTAL);
    lazy_static::initialize(&RESOLVED_PARTITIONS);
}
