//! Structured (JSON) run report.

use serde::Serialize;

use crate::config::RunConfig;
use crate::stats::RunningStats;

/// Machine-readable summary of a run.
///
/// Minimum and maximum are `null` when no probe succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredReport {
    pub domain: String,
    pub port: String,
    pub running_time: u64,
    pub response_times: Vec<f64>,
    pub maximum_response_time: Option<f64>,
    pub minimum_response_time: Option<f64>,
}

impl StructuredReport {
    pub fn build(config: &RunConfig, stats: &RunningStats) -> Self {
        Self {
            domain: config.target.host.clone(),
            port: config.target.port.to_string(),
            running_time: config.running_time,
            response_times: stats.latencies(),
            maximum_response_time: stats.max,
            minimum_response_time: stats.min,
        }
    }

    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
