//! Shared handle over a run's statistics.

use std::sync::Arc;
use tokio::sync::Mutex;

use super::models::{RunningStats, Sample};

/// Thread-safe statistics aggregator.
///
/// Appends and snapshots are serialized through one lock, so a snapshot never
/// observes a half-applied sample.
#[derive(Clone, Default)]
pub struct Aggregator {
    stats: Arc<Mutex<RunningStats>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful probe.
    pub async fn append(&self, sample: Sample) {
        let mut stats = self.stats.lock().await;
        tracing::debug!(
            index = sample.index,
            latency_ms = sample.latency_ms,
            "Recording sample"
        );
        stats.add_sample(sample);
    }

    /// Copy of the current statistics.
    pub async fn snapshot(&self) -> RunningStats {
        self.stats.lock().await.clone()
    }
}
