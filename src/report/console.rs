//! Human-readable console output: header, per-probe narration and summary.

use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::RunConfig;
use crate::probe::ProbeError;
use crate::stats::RunningStats;

/// Startup banner describing the run.
pub fn render_header(config: &RunConfig) -> String {
    let mut out = String::new();
    writeln!(out, "[INFO] Testing endpoint `{}`.", config.target).ok();
    writeln!(out, "[INFO] HTTP method is {}.", config.http_method).ok();
    writeln!(out, "[INFO] Probing every {} seconds.", config.interval).ok();
    writeln!(out, "[INFO] Total running time is {} seconds.", config.running_time).ok();
    out
}

pub fn print_header(config: &RunConfig) {
    print!("{}", render_header(config));
}

/// Summary of response times.
///
/// Values are printed with three decimals, or `n/a` when no probe succeeded.
pub fn render_console_summary(stats: &RunningStats, verbose: bool) -> String {
    let mut out = String::new();
    out.push_str("\n===============\n");
    out.push_str("RESPONSE TIMES:\n");
    out.push_str("===============\n");
    writeln!(out, "Average: {}", format_ms(stats.average())).ok();
    writeln!(out, "Maximum: {}", format_ms(stats.max)).ok();
    writeln!(out, "Minimum: {}", format_ms(stats.min)).ok();

    if verbose {
        writeln!(out, "Samples: {}", stats.count).ok();
        for (label, q) in [("P50", 0.5), ("P90", 0.9), ("P99", 0.99)] {
            writeln!(out, "{}: {}", label, format_ms(stats.percentile(q))).ok();
        }
    }

    out
}

fn format_ms(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.3}", v),
        None => "n/a".to_string(),
    }
}

/// Per-probe progress line fragment. `tick` is 1-based.
pub fn format_progress(tick: u64, latency_ms: f64, verbose: bool) -> String {
    if verbose {
        format!("{}..{:.3}ms\n", tick, latency_ms)
    } else {
        format!("{}..", tick)
    }
}

/// Writes per-probe progress to stdout while a run is in flight.
#[derive(Debug, Default)]
pub struct Narrator {
    enabled: bool,
    verbose: bool,
    /// A non-verbose progress fragment is waiting for its line break.
    open_line: AtomicBool,
}

impl Narrator {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            enabled: config.narrates(),
            verbose: config.verbose,
            open_line: AtomicBool::new(false),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn sample(&self, index: u64, latency_ms: f64) {
        if !self.enabled {
            return;
        }
        emit(&format_progress(index + 1, latency_ms, self.verbose));
        self.open_line.store(!self.verbose, Ordering::Relaxed);
    }

    pub fn failure(&self, error: &ProbeError) {
        if !self.enabled {
            return;
        }
        self.finish_line();
        emit(&format!("{}\n", error));
    }

    /// Terminate a pending `N..` progress line.
    pub fn finish_line(&self) {
        if self.open_line.swap(false, Ordering::Relaxed) {
            emit("\n");
        }
    }
}

fn emit(text: &str) {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
        tracing::debug!("Failed to write progress to stdout: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Sample;
    use chrono::Utc;

    fn stats_with(latencies: &[f64]) -> RunningStats {
        let mut stats = RunningStats::new();
        for (i, &latency_ms) in latencies.iter().enumerate() {
            stats.add_sample(Sample {
                index: i as u64,
                latency_ms,
                started_at: Utc::now(),
            });
        }
        stats
    }

    #[test]
    fn test_header() {
        let header = render_header(&RunConfig::default());
        assert_eq!(
            header,
            "[INFO] Testing endpoint `gitlab.com:443`.\n\
             [INFO] HTTP method is GET.\n\
             [INFO] Probing every 10 seconds.\n\
             [INFO] Total running time is 300 seconds.\n"
        );
    }

    #[test]
    fn test_summary() {
        let summary = render_console_summary(&stats_with(&[10.0, 20.0, 30.5]), false);
        assert_eq!(
            summary,
            "\n===============\nRESPONSE TIMES:\n===============\n\
             Average: 20.167\nMaximum: 30.500\nMinimum: 10.000\n"
        );
    }

    #[test]
    fn test_summary_without_samples() {
        let summary = render_console_summary(&RunningStats::new(), true);
        assert!(summary.contains("Average: n/a\n"));
        assert!(summary.contains("Maximum: n/a\n"));
        assert!(summary.contains("Minimum: n/a\n"));
        assert!(summary.contains("Samples: 0\n"));
        assert!(summary.contains("P99: n/a\n"));
    }

    #[test]
    fn test_verbose_summary_lists_percentiles() {
        let summary = render_console_summary(&stats_with(&[5.0, 5.0, 5.0]), true);
        assert!(summary.contains("Samples: 3\n"));
        assert!(summary.contains("P50: 5.000\n"));
    }

    #[test]
    fn test_progress() {
        assert_eq!(format_progress(1, 12.3456, false), "1..");
        assert_eq!(format_progress(7, 12.3456, true), "7..12.346ms\n");
    }

    #[test]
    fn test_disabled_narrator_keeps_no_open_line() {
        let narrator = Narrator::disabled();
        narrator.sample(0, 1.0);
        assert!(!narrator.open_line.load(Ordering::Relaxed));
    }
}
