//! Tests for the settings loader.
//!
//! Responsibilities:
//! - Exercise the full load pipeline end to end over in-memory files.
//! - Test secret resolution for required infrastructure.
//! - Test document layering, exchange merging and derived fields.
//! - Test `.env` seeding and process environment capture.
//!
//! Does NOT handle:
//! - Individual field readers (tested in `validation::reader`).
//!
//! Invariants:
//! - Tests that touch process state use `serial_test` and `env_lock()`.
//! - All other tests build an explicit `EnvSnapshot` and `MemoryFiles`.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::loader::env::EnvSnapshot;
use crate::loader::secrets::MemoryFiles;

pub mod dotenv_tests;

/// Returns the global test lock for environment variable isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

pub const CONFIG_DIR: &str = "/etc/trading";

/// Path of a document inside the test configuration directory.
pub fn doc(name: &str) -> PathBuf {
    PathBuf::from(CONFIG_DIR).join(name)
}

/// Snapshot for `service` with a Postgres password and the test config dir.
pub fn service_env(service: &str) -> EnvSnapshot {
    EnvSnapshot::from_pairs([
        ("SERVICE_NAME", service),
        ("ENVIRONMENT", "test"),
        ("CONFIG_DIR", CONFIG_DIR),
        ("POSTGRES_PASSWORD", "pg-pass"),
    ])
}

/// Executor snapshot with every Oracle input pointing at a secret file.
pub fn executor_env() -> EnvSnapshot {
    service_env("executor")
        .with_var("OCI_DSN_FILE", "/run/secrets/oci_dsn")
        .with_var("OCI_USER_FILE", "/run/secrets/oci_user")
        .with_var("OCI_PASSWORD_FILE", "/run/secrets/oci_password")
        .with_var("OCI_WALLET_DIR", "/opt/oracle/wallet")
}

/// Secret files matching `executor_env`.
pub fn oracle_files() -> MemoryFiles {
    MemoryFiles::new()
        .with_file(
            "/run/secrets/oci_dsn",
            "oracle+oracledb://admin:pw@trading_high?retry_count=3\n",
        )
        .with_file("/run/secrets/oci_user", "admin\n")
        .with_file("/run/secrets/oci_password", "oracle-pass\n")
}
