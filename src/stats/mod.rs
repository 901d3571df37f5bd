//! Latency statistics for a single run.

mod aggregator;
mod models;
mod tdigest_utils;

pub use aggregator::*;
pub use models::*;
