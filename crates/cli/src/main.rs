//! trading-settings - load and validate the settings of one trading service.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Snapshot the environment (seeded from `.env` unless disabled) and run the settings loader.
//! - Print a summary or redacted JSON on success, the error chain and a structured exit code on failure.
//!
//! Does NOT handle:
//! - Assembly, validation or derivation of settings (see `crates/config`).
//!
//! Invariants:
//! - Logs go to stderr so stdout carries only the report.
//! - The process environment is never modified; `.env` values only enter the snapshot.

mod args;
mod error;
mod report;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use error::{ExitCode, ExitCodeExt};
use trading_config::{EnvSnapshot, SettingsLoader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            std::process::exit(ExitCode::Success.as_i32());
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(e.exit_code().as_i32());
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let env = if cli.no_dotenv {
        EnvSnapshot::capture()
    } else {
        EnvSnapshot::capture_with_dotenv(&cli.env_file).context("Failed to load environment")?
    };

    let mut loader = SettingsLoader::new().with_env(env);
    if let Some(dir) = &cli.config_dir {
        loader = loader.with_config_dir(dir);
    }
    if let Some(name) = cli.service_name() {
        loader = loader.with_service_name(name);
    }

    let settings = loader.load().context("Failed to load settings")?;
    tracing::debug!(service = %settings.service_name(), "Settings ready for reporting");

    if cli.json {
        report::json(&settings)
    } else {
        Ok(report::summary(&settings))
    }
}
