//! Integration tests for structured exit codes.
//!
//! These tests verify that trading-settings returns the correct exit code
//! for each failure class, so supervisors can react without parsing stderr.

mod common;

use common::{settings_cmd, write_file};
use predicates::prelude::*;
use tempfile::TempDir;

/// Test that a successful load returns exit code 0.
#[test]
fn test_success_returns_exit_code_0() {
    let temp_dir = TempDir::new().unwrap();

    settings_cmd()
        .current_dir(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("service=unknown"));
}

/// Test that an unparseable environment variable returns exit code 2.
#[test]
fn test_invalid_env_value_returns_exit_code_2() {
    let temp_dir = TempDir::new().unwrap();

    settings_cmd()
        .current_dir(temp_dir.path())
        .env("REDIS_DB", "abc")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("REDIS_DB"));
}

/// Test that a service name that cannot name a document returns exit code 2.
#[test]
fn test_invalid_service_name_returns_exit_code_2() {
    let temp_dir = TempDir::new().unwrap();

    settings_cmd()
        .current_dir(temp_dir.path())
        .args(["--service", "../executor"])
        .assert()
        .code(2);
}

/// Test that a malformed document returns exit code 3.
#[test]
fn test_malformed_document_returns_exit_code_3() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir.path().join("config"),
        "business_logic.toml",
        "[maintenance\npruning_interval_s = 600\n",
    );

    settings_cmd()
        .current_dir(temp_dir.path())
        .assert()
        .code(3)
        .stderr(predicate::str::contains("business_logic.toml"));
}

/// Test that a database service without a password returns exit code 4.
#[test]
fn test_missing_postgres_password_returns_exit_code_4() {
    let temp_dir = TempDir::new().unwrap();

    settings_cmd()
        .current_dir(temp_dir.path())
        .args(["--service", "janitor"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("janitor"))
        .stderr(predicate::str::contains("POSTGRES_PASSWORD_FILE"));
}

/// Test that an executor without Oracle secrets returns exit code 4 naming every input.
#[test]
fn test_missing_oracle_secrets_returns_exit_code_4() {
    let temp_dir = TempDir::new().unwrap();

    let output = settings_cmd()
        .current_dir(temp_dir.path())
        .env("POSTGRES_PASSWORD", "pg-secret")
        .args(["--service", "executor"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    for var in [
        "OCI_DSN_FILE",
        "OCI_USER_FILE",
        "OCI_PASSWORD_FILE",
        "OCI_WALLET_DIR",
    ] {
        assert!(stderr.contains(var), "{var} not named: {stderr}");
    }
}

/// Test that schema violations return exit code 5 and are all listed.
#[test]
fn test_validation_failure_returns_exit_code_5() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        &temp_dir.path().join("config"),
        "business_logic.toml",
        r#"
[analyzer]
anomaly_check_interval_s = 0

[backfill]
batch_size = -5
"#,
    );

    settings_cmd()
        .current_dir(temp_dir.path())
        .env("POSTGRES_PASSWORD", "pg-secret")
        .args(["--service", "analyzer"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("2 violations"))
        .stderr(predicate::str::contains("analyzer.anomaly_check_interval_s"))
        .stderr(predicate::str::contains("backfill.batch_size"))
        .stderr(predicate::str::contains("pg-secret").not());
}
