//! HTTP probe implementation.

use std::time::{Duration, Instant};

use super::{HttpMethod, ProbeError};

/// Run an HTTP probe against the given URL.
///
/// Returns latency in milliseconds, measured from just before the request is
/// sent until the response body has been read.
pub async fn run_http_probe(
    url: &str,
    method: HttpMethod,
    timeout: Duration,
) -> Result<f64, ProbeError> {
    // A fresh client per probe, so every sample includes connection setup.
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("responder/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ProbeError::Network(e.to_string()))?;

    let start = Instant::now();

    let response = client
        .request(method.into(), url)
        .send()
        .await
        .map_err(|e| classify(e, timeout))?;

    tracing::trace!("{} {} -> {}", method, url, response.status());

    let _body = response.bytes().await.map_err(|e| classify(e, timeout))?;

    Ok(start.elapsed().as_secs_f64() * 1000.0)
}

fn classify(e: reqwest::Error, timeout: Duration) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout(timeout)
    } else if e.is_connect() {
        ProbeError::Connect(e.to_string())
    } else if e.is_body() || e.is_decode() || e.is_request() {
        ProbeError::Protocol(e.to_string())
    } else {
        ProbeError::Network(e.to_string())
    }
}
