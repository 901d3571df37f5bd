//! Report module: chooses and writes the final report of a run.

mod console;
mod json;

pub use console::*;
pub use json::*;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{Output, RunConfig};
use crate::scheduler::{RunSummary, TerminationReason};

/// Report error types.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Which final report a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Console,
    Structured,
}

impl ReportKind {
    /// Silent and cancelled runs always produce the structured report.
    pub fn select(config: &RunConfig, reason: TerminationReason) -> Self {
        if config.silent || reason == TerminationReason::Cancelled {
            ReportKind::Structured
        } else {
            ReportKind::Console
        }
    }
}

/// Render the final report for a finished run.
pub fn render_report(config: &RunConfig, summary: &RunSummary) -> Result<String, ReportError> {
    match ReportKind::select(config, summary.reason) {
        ReportKind::Console => Ok(render_console_summary(&summary.stats, config.verbose)),
        ReportKind::Structured => {
            let mut text = StructuredReport::build(config, &summary.stats).to_pretty_json()?;
            text.push('\n');
            Ok(text)
        }
    }
}

/// Write a rendered report to the configured destination.
pub fn write_report(output: &Output, contents: &str) -> Result<(), ReportError> {
    match output {
        Output::Stdout => {
            print!("{}", contents);
            Ok(())
        }
        Output::File(path) => {
            std::fs::write(path, contents).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Report written to {}", path.display());
            Ok(())
        }
    }
}

/// Render and write the final report.
pub fn emit_report(config: &RunConfig, summary: &RunSummary) -> Result<(), ReportError> {
    let contents = render_report(config, summary)?;
    write_report(&config.outfile, &contents)
}
