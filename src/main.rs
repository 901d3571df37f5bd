//! responder - periodic HTTP latency prober.
//!
//! Sends one request to a fixed endpoint every interval for a bounded running
//! time, then reports minimum, maximum and average response times.

mod config;
mod error;
mod probe;
mod report;
mod scheduler;
mod stats;

use anyhow::Context;
use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CliArgs, RunConfig};
use error::{ExitCode, RunError};
use report::Narrator;
use scheduler::{HttpProber, ProbeSession};

#[tokio::main]
async fn main() {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    if let Err(e) = init_logging(args.debug) {
        eprintln!("failed to initialize logging: {}", e);
    }

    match run(args).await {
        Ok(()) => std::process::exit(ExitCode::Success.as_i32()),
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    }
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let level = if debug { "debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("responder={}", level).parse()?),
        )
        .try_init()?;

    Ok(())
}

async fn run(args: CliArgs) -> Result<(), RunError> {
    let cfg = RunConfig::from_args(args).map_err(|e| RunError::InvalidInput(e.into()))?;

    if cfg.debug {
        let echo = serde_json::to_string_pretty(&cfg)
            .context("failed to serialize configuration")
            .map_err(RunError::RuntimeError)?;
        println!("{}", echo);
    }

    if cfg.shows_header() {
        report::print_header(&cfg);
    }

    let (stop_tx, stop_rx) = broadcast::channel(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Received interrupt, stopping after the current probe");
                let _ = stop_tx.send(());
            }
            Err(e) => tracing::error!("Failed to install Ctrl-C handler: {}", e),
        }
    });

    let narrator = Narrator::new(&cfg);
    let session = ProbeSession::new(cfg.clone(), HttpProber::new(cfg.probe_config()), narrator);
    let summary = session.run(stop_rx).await;

    report::emit_report(&cfg, &summary)
        .context("failed to emit report")
        .map_err(RunError::RuntimeError)
}
