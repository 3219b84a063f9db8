//! Settings loader and assembly orchestration.
//!
//! Responsibilities:
//! - Provide a builder-pattern `SettingsLoader` over an environment snapshot and a file source.
//! - Run the ordered stages: read-environment, load-documents, merge-raw, validate, derive.
//! - Fail fast with a named error when a required infrastructure secret cannot be resolved.
//!
//! Does NOT handle:
//! - Parsing individual variables (see env.rs and exchanges.rs).
//! - Schema rules (see the `validation` module).
//! - Holding the result; callers own the returned `Settings`.
//!
//! Invariants / Assumptions:
//! - Each stage runs only when the previous one succeeded; there are no retries.
//! - Environment-derived infrastructure replaces document keys of the same name.
//! - Environment exchange fields override document exchange fields one field at a time.
//! - Exchange names are case-insensitive and stored lower-cased.
//! - Builder values take precedence over the environment snapshot.

use secrecy::{ExposeSecret, SecretString};
use std::path::{Path, PathBuf};
use toml::{Table, Value};

use super::documents::{Document, load_documents};
use super::env::{EnvSettings, EnvSnapshot};
use super::error::ConfigError;
use super::exchanges::ExchangeVars;
use super::secrets::{FileSource, OsFileSource, resolve_secret};
use crate::constants::{
    DEFAULT_CONFIG_DIR, DOTENV_FILE, ENV_OCI_DSN_FILE, ENV_OCI_PASSWORD_FILE, ENV_OCI_USER_FILE,
    ENV_OCI_WALLET_DIR, ENV_SERVICE_NAME,
};
use crate::types::{ServiceIdentity, Settings};
use crate::validation::validate;

/// Builds `Settings` for one service from an environment snapshot and a file source.
pub struct SettingsLoader {
    env: Option<EnvSnapshot>,
    files: Box<dyn FileSource>,
    config_dir: Option<PathBuf>,
    service_name: Option<String>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Create a loader over the real filesystem.
    ///
    /// Without `with_env` or `load_dotenv`, the process environment is
    /// captured when `load` runs.
    pub fn new() -> Self {
        Self {
            env: None,
            files: Box::new(OsFileSource),
            config_dir: None,
            service_name: None,
        }
    }

    /// Capture the process environment on top of a `.env` file.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", the file is not read.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DotenvParse` or `ConfigError::DotenvIo` when the
    /// file exists but cannot be used. A missing file is silently ignored.
    pub fn load_dotenv(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let env = EnvSnapshot::capture_with_dotenv(path)?;
        Ok(self.with_env(env))
    }

    /// Use an explicit environment snapshot instead of the process environment.
    pub fn with_env(mut self, env: EnvSnapshot) -> Self {
        self.env = Some(env);
        self
    }

    /// Read documents and secret files through `files`.
    pub fn with_files(mut self, files: impl FileSource + 'static) -> Self {
        self.files = Box::new(files);
        self
    }

    /// Directory holding the configuration documents. Overrides `CONFIG_DIR`.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    /// Service identity to load. Overrides `SERVICE_NAME`.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Run every stage and return the validated settings.
    pub fn load(self) -> Result<Settings, ConfigError> {
        let mut env = self.env.unwrap_or_else(EnvSnapshot::capture);
        if let Some(name) = self.service_name {
            env = env.with_var(ENV_SERVICE_NAME, name);
        }
        assemble(&env, self.files.as_ref(), self.config_dir.as_deref())
    }
}

/// Load settings from an environment snapshot and a file source.
///
/// Documents are read from `CONFIG_DIR`, or `config` when it is unset.
pub fn load(env: &EnvSnapshot, files: &dyn FileSource) -> Result<Settings, ConfigError> {
    assemble(env, files, None)
}

/// Load settings for the running process: `.env` plus process environment, real filesystem.
pub fn load_from_process() -> Result<Settings, ConfigError> {
    let env = EnvSnapshot::capture_with_dotenv(DOTENV_FILE)?;
    load(&env, &OsFileSource)
}

fn assemble(
    env: &EnvSnapshot,
    files: &dyn FileSource,
    config_dir: Option<&Path>,
) -> Result<Settings, ConfigError> {
    tracing::info!("Loading application configuration...");

    tracing::debug!(stage = "read-environment", "Configuration stage");
    let env_settings = EnvSettings::from_snapshot(env)?;
    let identity = ServiceIdentity::parse(&env_settings.service_name);
    let mut exchange_vars = ExchangeVars::from_snapshot(env);
    exchange_vars.apply_secret_files(&env_settings, files);
    let secrets = resolve_infrastructure(&env_settings, &identity, files)?;

    tracing::debug!(stage = "load-documents", "Configuration stage");
    let dir = config_dir
        .map(Path::to_path_buf)
        .or_else(|| env_settings.config_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR));
    let document = load_documents(files, &dir, &env_settings.service_name)?;

    tracing::debug!(stage = "merge-raw", "Configuration stage");
    let raw = merge_raw(document, &env_settings, &exchange_vars, &secrets);

    tracing::debug!(stage = "validate", "Configuration stage");
    let settings = validate(&raw)?;

    tracing::debug!(
        stage = "derive",
        hedged_currencies = settings.hedged_currencies().len(),
        strategies = settings.strategy_map().len(),
        markets = settings.market_map().len(),
        "Configuration stage"
    );
    tracing::info!(
        "Configuration for '{}' loaded and validated",
        settings.service_name()
    );
    Ok(settings)
}

/// Infrastructure secrets resolved for the active identity.
#[derive(Default)]
struct InfrastructureSecrets {
    postgres_password: Option<SecretString>,
    oci: Option<OracleSecrets>,
}

struct OracleSecrets {
    dsn: SecretString,
    user: SecretString,
    password: SecretString,
    wallet_dir: String,
}

/// Resolve the secrets the identity cannot start without, naming whatever is missing.
fn resolve_infrastructure(
    env: &EnvSettings,
    identity: &ServiceIdentity,
    files: &dyn FileSource,
) -> Result<InfrastructureSecrets, ConfigError> {
    let mut secrets = InfrastructureSecrets::default();

    if identity.requires_database() {
        let password = resolve_secret(
            files,
            env.postgres_password.clone(),
            env.postgres_password_file.as_deref(),
        )
        .ok_or_else(|| ConfigError::MissingPostgresPassword {
            service: identity.to_string(),
        })?;
        secrets.postgres_password = Some(password);
    }

    if identity.requires_oracle() {
        let dsn = resolve_secret(files, None, env.oci_dsn_file.as_deref());
        let user = resolve_secret(files, None, env.oci_user_file.as_deref());
        let password = resolve_secret(files, None, env.oci_password_file.as_deref());
        let wallet_dir = env.oci_wallet_dir.clone();

        let missing: Vec<&'static str> = [
            (dsn.is_none(), ENV_OCI_DSN_FILE),
            (user.is_none(), ENV_OCI_USER_FILE),
            (password.is_none(), ENV_OCI_PASSWORD_FILE),
            (wallet_dir.is_none(), ENV_OCI_WALLET_DIR),
        ]
        .into_iter()
        .filter_map(|(absent, var)| absent.then_some(var))
        .collect();

        match (dsn, user, password, wallet_dir) {
            (Some(dsn), Some(user), Some(password), Some(wallet_dir)) => {
                secrets.oci = Some(OracleSecrets {
                    dsn,
                    user,
                    password,
                    wallet_dir,
                });
            }
            _ => {
                return Err(ConfigError::MissingOracleSecrets {
                    service: identity.to_string(),
                    missing,
                });
            }
        }
    }

    Ok(secrets)
}

/// Fold environment-derived sections into the merged document.
fn merge_raw(
    mut raw: Document,
    env: &EnvSettings,
    exchanges: &ExchangeVars,
    secrets: &InfrastructureSecrets,
) -> Table {
    raw.insert(
        "service_name".to_string(),
        Value::String(env.service_name.clone()),
    );
    raw.insert(
        "environment".to_string(),
        Value::String(env.environment.clone()),
    );

    let mut redis = Table::new();
    redis.insert("url".to_string(), Value::String(env.redis_url.clone()));
    redis.insert("db".to_string(), Value::Integer(i64::from(env.redis_db)));
    if let Some(password) = &env.redis_password {
        redis.insert(
            "password".to_string(),
            Value::String(password.expose_secret().to_string()),
        );
    }
    raw.insert("redis".to_string(), Value::Table(redis));

    if let Some(password) = &secrets.postgres_password {
        let mut postgres = Table::new();
        postgres.insert("user".to_string(), Value::String(env.postgres_user.clone()));
        postgres.insert(
            "password".to_string(),
            Value::String(password.expose_secret().to_string()),
        );
        postgres.insert("host".to_string(), Value::String(env.postgres_host.clone()));
        postgres.insert(
            "port".to_string(),
            Value::Integer(i64::from(env.postgres_port)),
        );
        postgres.insert(
            "database".to_string(),
            Value::String(env.postgres_db.clone()),
        );
        raw.insert("postgres".to_string(), Value::Table(postgres));
    }

    if let Some(oci) = &secrets.oci {
        let mut table = Table::new();
        table.insert(
            "user".to_string(),
            Value::String(oci.user.expose_secret().to_string()),
        );
        table.insert(
            "password".to_string(),
            Value::String(oci.password.expose_secret().to_string()),
        );
        table.insert(
            "dsn".to_string(),
            Value::String(oci.dsn.expose_secret().to_string()),
        );
        table.insert(
            "wallet_dir".to_string(),
            Value::String(oci.wallet_dir.clone()),
        );
        raw.insert("oci".to_string(), Value::Table(table));
    }

    merge_exchanges(&mut raw, exchanges);
    raw
}

fn merge_exchanges(raw: &mut Table, exchanges: &ExchangeVars) {
    if let Some(Value::Table(documented)) = raw.get_mut("exchanges") {
        fold_exchange_names(documented);
    }
    if exchanges.is_empty() {
        return;
    }

    let entry = raw
        .entry("exchanges")
        .or_insert(Value::Table(Table::new()));
    // A non-table is left for validation to report.
    let Value::Table(documented) = entry else {
        return;
    };

    for (name, fields) in exchanges.iter() {
        let exchange = documented
            .entry(name)
            .or_insert(Value::Table(Table::new()));
        let Value::Table(exchange) = exchange else {
            continue;
        };
        for (field, value) in fields {
            exchange.insert(field.clone(), Value::String(value.clone()));
        }
    }
}

/// Lower-cases document exchange names to match environment-derived ones.
/// Tables whose names differ only by case are merged field by field.
fn fold_exchange_names(documented: &mut Table) {
    for (name, value) in std::mem::take(documented) {
        let key = name.to_ascii_lowercase();
        if let (Some(Value::Table(existing)), Value::Table(fields)) =
            (documented.get_mut(&key), &value)
        {
            existing.extend(fields.clone());
            continue;
        }
        documented.insert(key, value);
    }
}
