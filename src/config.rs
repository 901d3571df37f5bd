//! Configuration module for responder.
//!
//! Parses the command line (with environment variable fallbacks) and
//! validates it into an immutable [`RunConfig`] before any probe runs.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::probe::{HttpMethod, ProbeConfig, Target};

pub const DEFAULT_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_RUNNING_TIME_SECS: u64 = 300;

/// Periodically measures HTTP response times of a fixed endpoint.
#[derive(Parser, Debug, Clone)]
#[command(name = "responder", version)]
pub struct CliArgs {
    /// Print the effective configuration before running
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Seconds between probes
    #[arg(
        short = 'i',
        long = "interval",
        value_name = "SECONDS",
        env = "RESPONDER_INTERVAL",
        default_value_t = DEFAULT_INTERVAL_SECS
    )]
    pub interval: u64,

    /// Supports either GET or HEAD
    #[arg(
        short = 'm',
        long = "http_method",
        value_name = "METHOD",
        env = "RESPONDER_HTTP_METHOD",
        default_value = "GET",
        value_parser = parse_method
    )]
    pub http_method: HttpMethod,

    /// Don't print the header
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Write the final report to FILE instead of stdout
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "FILE",
        env = "RESPONDER_OUTFILE"
    )]
    pub outfile: Option<PathBuf>,

    /// Suppress per-probe output and emit a JSON report
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Total time of the test in seconds
    #[arg(
        short = 't',
        long = "running_time",
        value_name = "SECONDS",
        env = "RESPONDER_RUNNING_TIME",
        default_value_t = DEFAULT_RUNNING_TIME_SECS
    )]
    pub running_time: u64,

    /// Print every response time in ms
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

fn parse_method(s: &str) -> Result<HttpMethod, String> {
    s.parse()
}

/// Configuration errors detected before the run starts.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("interval must be greater than zero")]
    ZeroInterval,
    #[error("running time must be greater than zero")]
    ZeroRunningTime,
}

/// Where the final report is written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn is_stdout(&self) -> bool {
        matches!(self, Output::Stdout)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout => f.write_str("STDOUT"),
            Output::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Validated run configuration.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    pub target: Target,
    pub http_method: HttpMethod,
    /// Seconds between probes.
    pub interval: u64,
    /// Total running budget in seconds.
    pub running_time: u64,
    pub outfile: Output,
    pub debug: bool,
    pub silent: bool,
    pub verbose: bool,
    pub no_header: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            http_method: HttpMethod::Get,
            interval: DEFAULT_INTERVAL_SECS,
            running_time: DEFAULT_RUNNING_TIME_SECS,
            outfile: Output::Stdout,
            debug: false,
            silent: false,
            verbose: false,
            no_header: false,
        }
    }
}

impl RunConfig {
    /// Validate parsed arguments into a run configuration.
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let cfg = Self {
            target: Target::default(),
            http_method: args.http_method,
            interval: args.interval,
            running_time: args.running_time,
            outfile: args.outfile.map_or(Output::Stdout, Output::File),
            debug: args.debug,
            silent: args.silent,
            verbose: args.verbose,
            no_header: args.no_header,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.running_time == 0 {
            return Err(ConfigError::ZeroRunningTime);
        }
        if self.running_time < self.interval {
            tracing::warn!(
                "Running time ({}s) is shorter than the interval ({}s); only one probe will run",
                self.running_time,
                self.interval
            );
        }
        Ok(())
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn running_time_duration(&self) -> Duration {
        Duration::from_secs(self.running_time)
    }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig::new(self.target.clone(), self.http_method)
    }

    /// Per-probe console output is only written when the run is interactive.
    pub fn narrates(&self) -> bool {
        !self.silent && self.outfile.is_stdout()
    }

    pub fn shows_header(&self) -> bool {
        !self.silent && !self.no_header
    }
}
