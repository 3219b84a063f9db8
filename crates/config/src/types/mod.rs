//! Configuration type definitions for the trading platform.
//!
//! Responsibilities:
//! - Define infrastructure connection types (exchanges, Redis, PostgreSQL, Oracle).
//! - Define business sections, market definitions and strategy descriptors.
//! - Define the root `Settings` aggregate and the per-service `ServiceConfig` variant.
//! - Provide serialization helpers that redact secrets.
//!
//! Does NOT handle:
//! - Loading values from the environment or documents (see `loader` module).
//! - Type and range validation of raw input (see `validation` module).
//!
//! Invariants:
//! - All secret types use `secrecy::SecretString` to prevent accidental logging.
//! - Serializing any type in this module never emits a secret value.

mod connection;
mod market;
mod sections;
mod settings;

pub use connection::{
    ExchangeConnection, OracleConnection, PostgresConnection, RedisConnection, parse_tns_alias,
};
pub use market::{MarketDefinition, StrategyDescriptor, TradableItem};
pub use sections::{
    AnalyzerSettings, BackfillSettings, DistributorSettings, ExecutorServiceSettings,
    MaintenanceSettings, ReconciliationSettings, RedisStreamSettings, RegimeParameterSettings,
    RiskManagementSettings, ServiceSettings,
};
pub use settings::{ServiceConfig, ServiceIdentity, Settings};
pub(crate) use settings::SettingsParts;

/// Serde helpers that render secrets as a fixed placeholder.
pub(crate) mod redacted {
    use secrecy::SecretString;
    use serde::Serializer;

    use crate::constants::REDACTED;

    pub fn serialize<S>(_value: &SecretString, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(REDACTED)
    }

    pub fn option<S>(value: &Option<SecretString>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(_) => serializer.serialize_some(REDACTED),
            None => serializer.serialize_none(),
        }
    }
}
