//! Environment snapshot and the typed environment reader.
//!
//! Responsibilities:
//! - Capture the process environment (optionally seeded from `.env`) into an owned snapshot.
//! - Read the fixed set of platform variables from a snapshot into `EnvSettings`, applying defaults.
//!
//! Does NOT handle:
//! - `EXCHANGES__<name>__<field>` variables (see exchanges.rs).
//! - Reading secret files named by `*_FILE` variables (see secrets.rs).
//!
//! Invariants:
//! - The process environment is never mutated; `.env` values only enter the snapshot.
//! - Process variables take precedence over `.env` entries.
//! - Empty or whitespace-only values are treated as unset; returned values are trimmed.
//! - Invalid numeric values return ConfigError::InvalidValue.
//! - Secret values are wrapped in `SecretString` as soon as they are read.

use secrecy::SecretString;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use crate::constants::*;

/// Owned, ordered copy of environment variables taken at startup.
///
/// Every loader stage reads from a snapshot instead of the live process
/// environment, so a load is deterministic for a given snapshot.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn capture() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    /// Snapshot the process environment on top of the entries of a `.env` file.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1" in the process environment,
    /// the file is not read (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file exists but has invalid syntax (`ConfigError::DotenvParse`)
    /// - The file exists but cannot be read due to I/O errors (`ConfigError::DotenvIo`)
    ///
    /// A missing file is silently ignored.
    ///
    /// SAFETY: Error messages never include raw .env line contents to prevent secret leakage.
    pub fn capture_with_dotenv(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut vars = BTreeMap::new();

        if !dotenv_disabled() {
            match dotenvy::from_path_iter(path.as_ref()) {
                Ok(entries) => {
                    for entry in entries {
                        let (key, value) = entry.map_err(dotenv_error)?;
                        vars.insert(key, value);
                    }
                    tracing::debug!(path = %path.as_ref().display(), "Seeded environment from dotenv file");
                }
                Err(e) if is_not_found(&e) => {}
                Err(e) => return Err(dotenv_error(e)),
            }
        }

        vars.extend(Self::capture().vars);
        Ok(Self { vars })
    }

    /// Build a snapshot from explicit key/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Return a copy of this snapshot with `key` set to `value`.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Return a copy of this snapshot with `key` removed.
    pub fn without_var(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }

    /// Raw value of `key`, exactly as captured.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Read a variable, returning None if unset, empty, or whitespace-only.
    /// Returns the trimmed value if present.
    pub fn var_or_none(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Iterate over all captured variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl fmt::Debug for EnvSnapshot {
    // Values may be secrets; only names are shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Check if dotenv loading is disabled via environment variable.
fn dotenv_disabled() -> bool {
    matches!(
        std::env::var(ENV_DOTENV_DISABLED).ok().as_deref(),
        Some("true") | Some("1")
    )
}

/// Check if a dotenv error indicates the file was not found.
fn is_not_found(err: &dotenvy::Error) -> bool {
    matches!(
        err,
        dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
    )
}

fn dotenv_error(err: dotenvy::Error) -> ConfigError {
    match err {
        dotenvy::Error::LineParse(_, idx) => ConfigError::DotenvParse { error_index: idx },
        dotenvy::Error::Io(io_err) => ConfigError::DotenvIo {
            kind: io_err.kind(),
        },
        _ => ConfigError::DotenvUnknown,
    }
}

/// Typed, defaulted view of the fixed platform environment variables.
#[derive(Debug, Clone)]
pub struct EnvSettings {
    pub service_name: String,
    pub environment: String,
    pub config_dir: Option<PathBuf>,

    pub redis_url: String,
    pub redis_db: u32,
    pub redis_password: Option<SecretString>,

    pub postgres_user: String,
    pub postgres_password: Option<SecretString>,
    pub postgres_password_file: Option<PathBuf>,
    pub postgres_host: String,
    pub postgres_port: u16,
    pub postgres_db: String,

    pub deribit_client_id_file: Option<PathBuf>,
    pub deribit_client_secret_file: Option<PathBuf>,

    pub oci_dsn_file: Option<PathBuf>,
    pub oci_user_file: Option<PathBuf>,
    pub oci_password_file: Option<PathBuf>,
    pub oci_wallet_dir: Option<String>,
}

impl EnvSettings {
    /// Read the fixed platform variables from a snapshot.
    ///
    /// Unknown variables are ignored. Every field has a default except
    /// secrets and secret-file paths, which default to absent.
    pub fn from_snapshot(env: &EnvSnapshot) -> Result<Self, ConfigError> {
        let text = |key: &str, default: &str| {
            env.var_or_none(key)
                .unwrap_or_else(|| default.to_string())
        };
        let secret = |key: &str| env.var_or_none(key).map(|v| SecretString::new(v.into()));
        let path = |key: &str| env.var_or_none(key).map(PathBuf::from);

        let redis_db = match env.var_or_none(ENV_REDIS_DB) {
            Some(db) => db.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_REDIS_DB.to_string(),
                message: "must be a non-negative integer".to_string(),
            })?,
            None => DEFAULT_REDIS_DB,
        };

        let postgres_port = match env.var_or_none(ENV_POSTGRES_PORT) {
            Some(port) => match port.parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: ENV_POSTGRES_PORT.to_string(),
                        message: "must be a port number between 1 and 65535".to_string(),
                    });
                }
            },
            None => DEFAULT_POSTGRES_PORT,
        };

        Ok(Self {
            service_name: text(ENV_SERVICE_NAME, DEFAULT_SERVICE_NAME),
            environment: text(ENV_ENVIRONMENT, DEFAULT_ENVIRONMENT),
            config_dir: path(ENV_CONFIG_DIR),
            redis_url: text(ENV_REDIS_URL, DEFAULT_REDIS_URL),
            redis_db,
            redis_password: secret(ENV_REDIS_PASSWORD),
            postgres_user: text(ENV_POSTGRES_USER, DEFAULT_POSTGRES_USER),
            postgres_password: secret(ENV_POSTGRES_PASSWORD),
            postgres_password_file: path(ENV_POSTGRES_PASSWORD_FILE),
            postgres_host: text(ENV_POSTGRES_HOST, DEFAULT_POSTGRES_HOST),
            postgres_port,
            postgres_db: text(ENV_POSTGRES_DB, DEFAULT_POSTGRES_DB),
            deribit_client_id_file: path(ENV_DERIBIT_CLIENT_ID_FILE),
            deribit_client_secret_file: path(ENV_DERIBIT_CLIENT_SECRET_FILE),
            oci_dsn_file: path(ENV_OCI_DSN_FILE),
            oci_user_file: path(ENV_OCI_USER_FILE),
            oci_password_file: path(ENV_OCI_PASSWORD_FILE),
            oci_wallet_dir: env.var_or_none(ENV_OCI_WALLET_DIR),
        })
    }
}
