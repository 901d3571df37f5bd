//! One run: the tick loop wired to the probe executor and the aggregator.

use tokio::sync::broadcast;

use super::{run_loop, TerminationReason};
use crate::config::RunConfig;
use crate::probe::{run_probe, ProbeConfig, ProbeOutcome};
use crate::report::Narrator;
use crate::stats::{Aggregator, RunningStats};

/// Final state of a run, ready for reporting.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reason: TerminationReason,
    pub stats: RunningStats,
}

/// Source of probe outcomes for a session.
///
/// The real implementation sends HTTP requests; tests substitute scripted
/// outcomes.
pub trait Prober: Send + Sync {
    fn probe(
        &self,
        index: u64,
    ) -> impl std::future::Future<Output = ProbeOutcome> + Send;
}

/// Prober that issues real HTTP requests.
pub struct HttpProber {
    config: ProbeConfig,
}

impl HttpProber {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }
}

impl Prober for HttpProber {
    async fn probe(&self, index: u64) -> ProbeOutcome {
        run_probe(&self.config, index).await
    }
}

/// Drives probes for one run and feeds their results into the aggregator.
pub struct ProbeSession<P> {
    config: RunConfig,
    prober: P,
    aggregator: Aggregator,
    narrator: Narrator,
}

impl<P: Prober> ProbeSession<P> {
    pub fn new(config: RunConfig, prober: P, narrator: Narrator) -> Self {
        Self {
            config,
            prober,
            aggregator: Aggregator::new(),
            narrator,
        }
    }

    /// Run until the budget is exhausted or `stop_rx` fires.
    pub async fn run(&self, stop_rx: broadcast::Receiver<()>) -> RunSummary {
        tracing::info!(
            endpoint = %self.config.target,
            method = %self.config.http_method,
            interval = self.config.interval,
            running_time = self.config.running_time,
            "Starting probe run"
        );

        let reason = run_loop(
            self.config.interval_duration(),
            self.config.running_time_duration(),
            stop_rx,
            |index| self.tick(index),
        )
        .await;

        if reason == TerminationReason::Cancelled {
            self.narrator.finish_line();
        }

        let stats = self.aggregator.snapshot().await;
        tracing::info!(?reason, samples = stats.count, "Probe run finished");

        RunSummary { reason, stats }
    }

    /// Probe once and record the outcome. Failures never leave this function.
    async fn tick(&self, index: u64) {
        match self.prober.probe(index).await {
            ProbeOutcome::Sample(sample) => {
                self.narrator.sample(index, sample.latency_ms);
                self.aggregator.append(sample).await;
            }
            ProbeOutcome::Failed(e) => {
                tracing::warn!(
                    "Probe {} against {} failed: {}",
                    index + 1,
                    self.config.target,
                    e
                );
                self.narrator.failure(&e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use crate::stats::Sample;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays a fixed list of outcomes; `None` entries fail.
    struct ScriptedProber {
        latencies: Vec<Option<f64>>,
        fired: Mutex<Vec<u64>>,
    }

    impl ScriptedProber {
        fn new(latencies: Vec<Option<f64>>) -> Self {
            Self {
                latencies,
                fired: Mutex::new(Vec::new()),
            }
        }
    }

    impl Prober for ScriptedProber {
        async fn probe(&self, index: u64) -> ProbeOutcome {
            self.fired.lock().unwrap().push(index);
            match self.latencies.get(index as usize).copied().flatten() {
                Some(latency_ms) => ProbeOutcome::Sample(Sample {
                    index,
                    latency_ms,
                    started_at: Utc::now(),
                }),
                None => ProbeOutcome::Failed(ProbeError::Connect("connection refused".into())),
            }
        }
    }

    fn config(interval: u64, running_time: u64) -> RunConfig {
        RunConfig {
            interval,
            running_time,
            silent: true,
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_probes_succeed() {
        let session = ProbeSession::new(
            config(1, 3),
            ScriptedProber::new(vec![Some(10.0), Some(20.0), Some(30.0)]),
            Narrator::disabled(),
        );
        let (_stop_tx, stop_rx) = broadcast::channel(1);

        let summary = session.run(stop_rx).await;

        assert_eq!(summary.reason, TerminationReason::Completed);
        assert_eq!(summary.stats.count, 3);
        assert_eq!(summary.stats.latencies(), vec![10.0, 20.0, 30.0]);
        assert_eq!(summary.stats.min, Some(10.0));
        assert_eq!(summary.stats.max, Some(30.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_probe_when_budget_below_interval() {
        let session = ProbeSession::new(
            config(5, 2),
            ScriptedProber::new(vec![Some(15.0), Some(25.0)]),
            Narrator::disabled(),
        );
        let (_stop_tx, stop_rx) = broadcast::channel(1);

        let summary = session.run(stop_rx).await;

        assert_eq!(summary.reason, TerminationReason::Completed);
        assert_eq!(*session.prober.fired.lock().unwrap(), vec![0]);
        assert_eq!(summary.stats.count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_probes_fail() {
        let session = ProbeSession::new(
            config(1, 4),
            ScriptedProber::new(vec![None, None, None, None]),
            Narrator::disabled(),
        );
        let (_stop_tx, stop_rx) = broadcast::channel(1);

        let summary = session.run(stop_rx).await;

        assert_eq!(summary.reason, TerminationReason::Completed);
        assert_eq!(session.prober.fired.lock().unwrap().len(), 4);
        assert!(summary.stats.is_empty());
        assert_eq!(summary.stats.min, None);
        assert_eq!(summary.stats.max, None);
        assert_eq!(summary.stats.average(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_do_not_touch_stats() {
        let session = ProbeSession::new(
            config(1, 5),
            ScriptedProber::new(vec![Some(12.0), None, Some(8.0), None, Some(10.0)]),
            Narrator::disabled(),
        );
        let (_stop_tx, stop_rx) = broadcast::channel(1);

        let summary = session.run(stop_rx).await;

        assert_eq!(summary.stats.latencies(), vec![12.0, 8.0, 10.0]);
        let indices: Vec<u64> = summary.stats.samples.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 2, 4]);
        assert_eq!(summary.stats.min, Some(8.0));
        assert_eq!(summary.stats.max, Some(12.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait_keeps_completed_samples() {
        let session = ProbeSession::new(
            config(1, 10),
            ScriptedProber::new(vec![Some(11.0), Some(22.0), Some(33.0)]),
            Narrator::disabled(),
        );
        let (stop_tx, stop_rx) = broadcast::channel(1);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            let _ = stop_tx.send(());
        });

        let summary = session.run(stop_rx).await;

        assert_eq!(summary.reason, TerminationReason::Cancelled);
        assert_eq!(summary.stats.latencies(), vec![11.0, 22.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_counts_only_successful_ticks() {
        let session = ProbeSession::new(
            config(1, 10),
            ScriptedProber::new(vec![Some(5.0), None, Some(7.0), None]),
            Narrator::disabled(),
        );
        let (stop_tx, stop_rx) = broadcast::channel(1);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            let _ = stop_tx.send(());
        });

        let summary = session.run(stop_rx).await;

        assert_eq!(summary.reason, TerminationReason::Cancelled);
        assert_eq!(session.prober.fired.lock().unwrap().len(), 4);
        assert_eq!(summary.stats.latencies(), vec![5.0, 7.0]);
    }
}
