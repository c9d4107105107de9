//! Meridian: index definition resolution and validation for a partitioned
//! vector/scalar store.

pub mod catalog;
pub mod definer;
pub mod definition;
pub mod error;
pub mod metrics;
pub mod parameter;
pub mod partition;
pub mod types;
