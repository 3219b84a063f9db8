//! Configuration assembly and validation for trading platform services.
//!
//! This crate builds one immutable [`Settings`] value per service from
//! environment variables, secret files and layered TOML documents, and
//! computes the fields derived from them (hedged currencies, strategy map,
//! hydrated market map).

pub mod constants;
pub mod derive;
mod loader;
pub mod types;
mod validation;

pub use loader::{
    ConfigError, Document, EnvSettings, EnvSnapshot, ExchangeVars, FieldViolation, FileSource,
    MemoryFiles, OsFileSource, SettingsLoader, ValidationErrors, load, load_documents,
    load_from_process, merge_shallow, resolve_secret,
};
pub use types::{
    ExchangeConnection, MarketDefinition, OracleConnection, PostgresConnection, RedisConnection,
    ServiceConfig, ServiceIdentity, Settings, StrategyDescriptor, TradableItem, parse_tns_alias,
};
