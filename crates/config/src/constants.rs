//! Centralized constants for the trading platform configuration.
//!
//! This module contains environment variable names, default values, document
//! file names and the fixed service-identity sets, so that the loader stages
//! never embed magic strings.

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_SERVICE_NAME: &str = "SERVICE_NAME";
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENV_CONFIG_DIR: &str = "CONFIG_DIR";
pub const ENV_DOTENV_DISABLED: &str = "DOTENV_DISABLED";

pub const ENV_REDIS_URL: &str = "REDIS_URL";
pub const ENV_REDIS_DB: &str = "REDIS_DB";
pub const ENV_REDIS_PASSWORD: &str = "REDIS_PASSWORD";

pub const ENV_POSTGRES_USER: &str = "POSTGRES_USER";
pub const ENV_POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const ENV_POSTGRES_PASSWORD_FILE: &str = "POSTGRES_PASSWORD_FILE";
pub const ENV_POSTGRES_HOST: &str = "POSTGRES_HOST";
pub const ENV_POSTGRES_PORT: &str = "POSTGRES_PORT";
pub const ENV_POSTGRES_DB: &str = "POSTGRES_DB";

pub const ENV_DERIBIT_CLIENT_ID_FILE: &str = "DERIBIT_CLIENT_ID_FILE";
pub const ENV_DERIBIT_CLIENT_SECRET_FILE: &str = "DERIBIT_CLIENT_SECRET_FILE";

pub const ENV_OCI_DSN_FILE: &str = "OCI_DSN_FILE";
pub const ENV_OCI_USER_FILE: &str = "OCI_USER_FILE";
pub const ENV_OCI_PASSWORD_FILE: &str = "OCI_PASSWORD_FILE";
pub const ENV_OCI_WALLET_DIR: &str = "OCI_WALLET_DIR";

/// Leading segment of `EXCHANGES__<name>__<field>` variables.
pub const EXCHANGES_PREFIX: &str = "EXCHANGES";

/// Separator between segments of dynamic environment keys.
pub const ENV_KEY_SEPARATOR: &str = "__";

// =============================================================================
// Environment Defaults
// =============================================================================

pub const DEFAULT_SERVICE_NAME: &str = "unknown";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_REDIS_DB: u32 = 0;
pub const DEFAULT_POSTGRES_USER: &str = "trading_app";
pub const DEFAULT_POSTGRES_HOST: &str = "postgres";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_DB: &str = "trading";

/// Directory searched for configuration documents when neither the builder
/// nor `CONFIG_DIR` names one.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Dotenv file read into the environment snapshot.
pub const DOTENV_FILE: &str = ".env";

// =============================================================================
// Documents
// =============================================================================

/// Shared business-logic defaults, loaded for every service.
pub const BASE_DOCUMENT: &str = "business_logic.toml";

/// Extension of the per-service document (`<service>.toml`).
pub const SERVICE_DOCUMENT_EXTENSION: &str = "toml";

// =============================================================================
// Service Identity Sets
// =============================================================================

/// Services that cannot start without a PostgreSQL connection.
pub const DATABASE_SERVICES: &[&str] = &[
    "distributor",
    "executor",
    "janitor",
    "receiver",
    "analyzer",
    "backfill",
    "maintenance",
];

/// Services that cannot start without an Oracle (OCI) connection.
pub const ORACLE_SERVICES: &[&str] = &["executor"];

/// Exchanges whose client credentials are mandatory for trading services.
pub const CREDENTIALED_EXCHANGES: &[&str] = &["deribit"];

/// Exchange that receives file-based client id/secret overrides.
pub const DERIBIT: &str = "deribit";

// =============================================================================
// Section Defaults
// =============================================================================

pub const DEFAULT_STREAM_MAX_RETRIES: u32 = 3;

pub const DEFAULT_INSTRUMENT_SYNC_INTERVAL_SECS: u64 = 3600;
pub const DEFAULT_ANOMALY_CHECK_INTERVAL_SECS: u64 = 15;

pub const DEFAULT_BACKFILL_LOOKBACK_DAYS: u32 = 30;
pub const DEFAULT_BACKFILL_BATCH_SIZE: u32 = 1000;

/// Default pruning cadence (one day).
pub const DEFAULT_PRUNING_INTERVAL_SECS: u64 = 86_400;
pub const DEFAULT_RETENTION_DAYS: u32 = 90;

pub const DEFAULT_PUBLISH_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_DISTRIBUTOR_MAX_BATCH_SIZE: u32 = 500;

/// Contract size assumed for market definitions that omit it.
pub const DEFAULT_CONTRACT_SIZE: f64 = 1.0;

/// Placeholder used whenever a secret is rendered.
pub const REDACTED: &str = "[REDACTED]";
