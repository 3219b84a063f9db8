//! Shared test utilities for trading-settings integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory that prevents dotenv loading.
//! - Write configuration directories and secret files into temp directories.
//!
//! Invariants / Assumptions:
//! - All integration tests using this helper are hermetic by default.
//! - Host variables the loader reads are cleared so they cannot leak in.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// Variables read by the loader that must not leak in from the host.
const LOADER_VARS: &[&str] = &[
    "SERVICE_NAME",
    "ENVIRONMENT",
    "CONFIG_DIR",
    "REDIS_URL",
    "REDIS_DB",
    "REDIS_PASSWORD",
    "POSTGRES_USER",
    "POSTGRES_PASSWORD",
    "POSTGRES_PASSWORD_FILE",
    "POSTGRES_HOST",
    "POSTGRES_PORT",
    "POSTGRES_DB",
    "DERIBIT_CLIENT_ID_FILE",
    "DERIBIT_CLIENT_SECRET_FILE",
    "OCI_DSN_FILE",
    "OCI_USER_FILE",
    "OCI_PASSWORD_FILE",
    "OCI_WALLET_DIR",
];

/// Returns a hermetic `trading-settings` command for integration testing.
///
/// It ensures:
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - Loader variables and `EXCHANGES__*` variables are cleared.
pub fn settings_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("trading-settings");

    // Hermeticity: prevent loading local .env
    cmd.env("DOTENV_DISABLED", "1");
    cmd.env_remove("RUST_LOG");

    for var in LOADER_VARS {
        cmd.env_remove(var);
    }
    for (key, _) in std::env::vars() {
        if key.to_ascii_uppercase().starts_with("EXCHANGES__") {
            cmd.env_remove(&key);
        }
    }

    cmd
}

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
