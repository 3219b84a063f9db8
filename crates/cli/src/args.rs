//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//!
//! Non-responsibilities:
//! - Does not read the environment or configuration documents (see `main`).

use clap::Parser;
use std::path::PathBuf;

use trading_config::constants::DOTENV_FILE;

#[derive(Parser, Debug)]
#[command(name = "trading-settings")]
#[command(about = "Load and validate the settings of a trading platform service", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  trading-settings --service executor\n  trading-settings --service receiver --config-dir /etc/trading --json\n  DOTENV_DISABLED=1 trading-settings\n"
)]
pub struct Cli {
    /// Service identity to load (overrides SERVICE_NAME)
    #[arg(short, long)]
    pub service: Option<String>,

    /// Directory holding business_logic.toml and <service>.toml (overrides CONFIG_DIR)
    #[arg(short, long)]
    pub config_dir: Option<PathBuf>,

    /// Path of the .env file used to seed the environment
    #[arg(long, default_value = DOTENV_FILE)]
    pub env_file: PathBuf,

    /// Do not read the .env file
    #[arg(long)]
    pub no_dotenv: bool,

    /// Print the validated settings as JSON with secrets redacted
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Service name given on the command line, ignoring blank values.
    pub fn service_name(&self) -> Option<&str> {
        self.service
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
