//! Statistics model types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::tdigest_utils::estimate_percentile;

/// A single successful probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// Tick index the probe was fired on (0-based).
    pub index: u64,
    /// Round-trip latency in milliseconds.
    pub latency_ms: f64,
    pub started_at: DateTime<Utc>,
}

/// Running statistics over every successful probe of a run.
///
/// `min` and `max` are `None` until the first sample arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningStats {
    pub count: u64,
    pub samples: Vec<Sample>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample. Min and max only move on a strict improvement.
    pub fn add_sample(&mut self, sample: Sample) {
        let latency = sample.latency_ms;

        match self.max {
            Some(max) if latency <= max => {}
            _ => self.max = Some(latency),
        }
        match self.min {
            Some(min) if latency >= min => {}
            _ => self.min = Some(latency),
        }

        self.samples.push(sample);
        self.count += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Latencies in insertion order.
    pub fn latencies(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.latency_ms).collect()
    }

    pub fn sum(&self) -> f64 {
        self.samples.iter().map(|s| s.latency_ms).sum()
    }

    /// Mean latency, or `None` when nothing succeeded.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum() / self.count as f64)
        }
    }

    /// Estimated latency at quantile `q` (0.0..=1.0).
    pub fn percentile(&self, q: f64) -> Option<f64> {
        estimate_percentile(&self.latencies(), q)
    }
}
