//! TDigest helpers for latency percentiles.

use tdigests::TDigest;

/// Compression used when summarizing a run's samples.
const COMPRESSION: usize = 100;

/// Build a compressed TDigest from raw latencies.
pub fn build_tdigest(values: &[f64]) -> Option<TDigest> {
    if values.is_empty() {
        return None;
    }

    let mut td = TDigest::from_values(values.to_vec());
    td.compress(COMPRESSION);
    Some(td)
}

/// Estimate the latency at quantile `q`, or `None` without data.
pub fn estimate_percentile(values: &[f64], q: f64) -> Option<f64> {
    let q = q.clamp(0.0, 1.0);
    build_tdigest(values).map(|td| td.estimate_quantile(q))
}
