//! Tests for dotenv seeding of the environment snapshot.
//!
//! Responsibilities:
//! - Test that missing `.env` files are silently ignored.
//! - Test that invalid `.env` files return errors without leaking secrets.
//! - Test that `DOTENV_DISABLED=1`/`true` skips dotenv loading.
//! - Test that process variables win over `.env` entries.
//!
//! Invariants / Assumptions:
//! - Tests use `env_lock()` and `serial` to prevent cross-test contamination.
//! - Error messages must never contain secret values from `.env` files.
//! - The process environment is never written by the code under test.

use serial_test::serial;
use std::fs;
use tempfile::TempDir;

use super::env_lock;
use crate::loader::builder::SettingsLoader;
use crate::loader::env::EnvSnapshot;
use crate::loader::error::ConfigError;
use crate::loader::secrets::MemoryFiles;

fn write_dotenv(temp_dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = temp_dir.path().join(".env");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn test_missing_dotenv_is_ok() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();

    temp_env::with_var("DOTENV_DISABLED", None::<&str>, || {
        let result = EnvSnapshot::capture_with_dotenv(temp_dir.path().join(".env"));
        assert!(
            result.is_ok(),
            "Missing .env file should be silently ignored"
        );
    });
}

#[test]
#[serial]
fn test_dotenv_values_enter_snapshot_only() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = write_dotenv(
        &temp_dir,
        "TRADING_DOTENV_ONLY_VAR=from-file\nSERVICE_NAME=janitor\n",
    );

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None::<&str>),
            ("TRADING_DOTENV_ONLY_VAR", None),
        ],
        || {
            let env = EnvSnapshot::capture_with_dotenv(&path).unwrap();

            assert_eq!(env.get("TRADING_DOTENV_ONLY_VAR"), Some("from-file"));
            assert!(
                std::env::var("TRADING_DOTENV_ONLY_VAR").is_err(),
                "The process environment must not be modified"
            );
        },
    );
}

#[test]
#[serial]
fn test_process_variables_win_over_dotenv() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = write_dotenv(&temp_dir, "ENVIRONMENT=from-file\n");

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None::<&str>),
            ("ENVIRONMENT", Some("from-process")),
        ],
        || {
            let env = EnvSnapshot::capture_with_dotenv(&path).unwrap();
            assert_eq!(env.get("ENVIRONMENT"), Some("from-process"));
        },
    );
}

#[test]
#[serial]
fn test_invalid_dotenv_returns_parse_error() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = write_dotenv(&temp_dir, "INVALID_LINE_WITHOUT_EQUALS");

    temp_env::with_var("DOTENV_DISABLED", None::<&str>, || {
        match EnvSnapshot::capture_with_dotenv(&path) {
            Err(ConfigError::DotenvParse { .. }) => {}
            Err(other) => panic!("Invalid .env should return DotenvParse error, got {other}"),
            Ok(_) => panic!("Invalid .env should return DotenvParse error, got Ok"),
        }
    });
}

#[test]
#[serial]
fn test_dotenv_parse_error_does_not_leak_secrets() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let secret_value = "supersecret_password_12345";
    let path = write_dotenv(
        &temp_dir,
        &format!("POSTGRES_PASSWORD={secret_value}\nINVALID_LINE_WITHOUT_EQUALS"),
    );

    temp_env::with_var("DOTENV_DISABLED", None::<&str>, || {
        let result = SettingsLoader::new().load_dotenv(&path);

        match &result {
            Err(e) => {
                let error_string = e.to_string();
                assert!(
                    !error_string.contains(secret_value),
                    "Error message should NOT contain the secret value: {error_string}"
                );
                assert!(
                    error_string.contains(".env"),
                    "Error message should mention .env file: {error_string}"
                );
                assert!(
                    error_string.contains("DOTENV_DISABLED"),
                    "Error should hint about DOTENV_DISABLED: {error_string}"
                );
            }
            Ok(_) => panic!("Expected error for invalid .env file, got Ok"),
        }
    });
}

#[test]
#[serial]
fn test_dotenv_disabled_skips_invalid_file() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = write_dotenv(&temp_dir, "INVALID_LINE_WITHOUT_EQUALS");

    for value in ["1", "true"] {
        temp_env::with_var("DOTENV_DISABLED", Some(value), || {
            assert!(
                EnvSnapshot::capture_with_dotenv(&path).is_ok(),
                "DOTENV_DISABLED={value} should skip .env loading even if file is invalid"
            );
        });
    }
}

#[test]
#[serial]
fn test_dotenv_seeds_settings() {
    let _lock = env_lock().lock().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = write_dotenv(
        &temp_dir,
        "SERVICE_NAME=backfill\nPOSTGRES_PASSWORD=from-dotenv\nCONFIG_DIR=/nowhere\n",
    );

    temp_env::with_vars(
        [
            ("DOTENV_DISABLED", None::<&str>),
            ("SERVICE_NAME", None),
            ("POSTGRES_PASSWORD", None),
            ("POSTGRES_PASSWORD_FILE", None),
            ("CONFIG_DIR", None),
        ],
        || {
            let settings = SettingsLoader::new()
                .load_dotenv(&path)
                .unwrap()
                .with_files(MemoryFiles::new())
                .load()
                .unwrap();

            assert_eq!(settings.service_name(), "backfill");
            assert!(settings.postgres().is_some());
        },
    );
}
