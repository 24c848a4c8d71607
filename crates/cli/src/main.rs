//! Roster CLI - bulk user and enrollment administration.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Search the provider and run confirmed batches through the engine crate.
//! - Render results as tables or JSON and map outcomes to exit codes.
//!
//! Does NOT handle:
//! - Batch semantics or REST calls (see `crates/engine` and `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide clap defaults.
//! - Logs go to stderr; stdout carries only command output.
//! - With `--metrics-file`, metrics are written once the command has finished,
//!   whatever its exit code.

mod args;
mod cancellation;
mod commands;
mod config_context;
mod dispatch;
mod error;
mod formatters;
mod interactive;
mod progress;

use args::Cli;
use cancellation::{CancellationToken, is_cancelled_error, print_cancelled_message};
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use roster_client::MetricsExporter;
use roster_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {}", e);
        std::process::exit(ExitCode::GeneralError.as_i32());
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match config_context::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    let metrics_exporter = match cli.metrics_file.as_deref().map(MetricsExporter::install) {
        Some(Ok(exporter)) => Some(exporter),
        Some(Err(e)) => {
            eprintln!("Failed to start metrics exporter: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
        None => None,
    };

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        cancel_clone.cancel();
    });

    let exit_code = match run_command(cli, config, &cancel).await {
        Ok(code) => code,
        Err(e) if is_cancelled_error(&e) => {
            print_cancelled_message();
            ExitCode::Interrupted
        }
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    if let Some(exporter) = metrics_exporter
        && let Err(e) = exporter.flush()
    {
        eprintln!("{:#}", anyhow::Error::from(e));
    }

    std::process::exit(exit_code.as_i32());
}
