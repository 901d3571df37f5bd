//! Probe module for HTTP latency measurement.
//!
//! A probe is a single timed request/response exchange. Failures are classified
//! here and never escape as anything other than a [`ProbeOutcome`].

mod http;

pub use http::*;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::stats::Sample;

/// Read/response timeout applied to every probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Host probed by the command line tool.
pub const DEFAULT_HOST: &str = "gitlab.com";

/// Port probed by the command line tool.
pub const DEFAULT_PORT: u16 = 443;

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("network error: {0}")]
    Network(String),
}

/// HTTP methods a probe may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "HEAD" => Ok(HttpMethod::Head),
            other => Err(format!(
                "unsupported HTTP method '{}' (expected GET or HEAD)",
                other
            )),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// The endpoint a probe is sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub scheme: String,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scheme: "https".to_string(),
        }
    }
}

impl Target {
    /// URL of the root path on this target.
    pub fn url(&self) -> String {
        format!("{}://{}:{}/", self.scheme, self.host, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Result of one tick's probe.
#[derive(Debug)]
pub enum ProbeOutcome {
    Sample(Sample),
    Failed(ProbeError),
}

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub target: Target,
    pub method: HttpMethod,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(target: Target, method: HttpMethod) -> Self {
        Self {
            target,
            method,
            timeout: PROBE_TIMEOUT,
        }
    }
}

/// Run a probe with the given configuration.
///
/// Any response counts as a sample regardless of its status code.
pub async fn run_probe(config: &ProbeConfig, index: u64) -> ProbeOutcome {
    let started_at = chrono::Utc::now();

    match run_http_probe(&config.target.url(), config.method, config.timeout).await {
        Ok(latency_ms) => ProbeOutcome::Sample(Sample {
            index,
            latency_ms,
            started_at,
        }),
        Err(e) => ProbeOutcome::Failed(e),
    }
}
