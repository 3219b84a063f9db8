//! The root `Settings` aggregate and service identities.
//!
//! Responsibilities:
//! - Define service identities and the per-identity required infrastructure (`ServiceConfig`).
//! - Define the immutable `Settings` value handed to the rest of the process.
//! - Compute derived fields exactly once, at construction.
//!
//! Does NOT handle:
//! - Validating raw input (see `validation` module).
//! - The derivation rules themselves (see `derive` module).
//!
//! Invariants:
//! - `Settings` can only be built inside this crate; fields are read through accessors.
//! - A database-requiring identity always carries a `PostgresConnection`.
//! - The executor identity always carries an `OracleConnection`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::connection::{ExchangeConnection, OracleConnection, PostgresConnection, RedisConnection};
use super::market::{MarketDefinition, StrategyDescriptor, TradableItem};
use super::sections::*;
use crate::constants::{DATABASE_SERVICES, ORACLE_SERVICES};
use crate::derive;

/// Identity of the service whose configuration is being loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceIdentity {
    Distributor,
    Executor,
    Janitor,
    Receiver,
    Analyzer,
    Backfill,
    Maintenance,
    /// Any service without required infrastructure sections.
    Other(String),
}

impl ServiceIdentity {
    pub fn parse(name: &str) -> Self {
        match name {
            "distributor" => Self::Distributor,
            "executor" => Self::Executor,
            "janitor" => Self::Janitor,
            "receiver" => Self::Receiver,
            "analyzer" => Self::Analyzer,
            "backfill" => Self::Backfill,
            "maintenance" => Self::Maintenance,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Distributor => "distributor",
            Self::Executor => "executor",
            Self::Janitor => "janitor",
            Self::Receiver => "receiver",
            Self::Analyzer => "analyzer",
            Self::Backfill => "backfill",
            Self::Maintenance => "maintenance",
            Self::Other(name) => name,
        }
    }

    /// Whether this service cannot start without PostgreSQL.
    pub fn requires_database(&self) -> bool {
        DATABASE_SERVICES.contains(&self.as_str())
    }

    /// Whether this service cannot start without Oracle (OCI).
    pub fn requires_oracle(&self) -> bool {
        ORACLE_SERVICES.contains(&self.as_str())
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required infrastructure, one case per service identity.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum ServiceConfig {
    Distributor {
        postgres: PostgresConnection,
    },
    Executor {
        postgres: PostgresConnection,
        oci: OracleConnection,
    },
    Janitor {
        postgres: PostgresConnection,
    },
    Receiver {
        postgres: PostgresConnection,
    },
    Analyzer {
        postgres: PostgresConnection,
    },
    Backfill {
        postgres: PostgresConnection,
    },
    Maintenance {
        postgres: PostgresConnection,
    },
    Other {
        name: String,
    },
}

impl ServiceConfig {
    pub fn identity(&self) -> ServiceIdentity {
        match self {
            Self::Distributor { .. } => ServiceIdentity::Distributor,
            Self::Executor { .. } => ServiceIdentity::Executor,
            Self::Janitor { .. } => ServiceIdentity::Janitor,
            Self::Receiver { .. } => ServiceIdentity::Receiver,
            Self::Analyzer { .. } => ServiceIdentity::Analyzer,
            Self::Backfill { .. } => ServiceIdentity::Backfill,
            Self::Maintenance { .. } => ServiceIdentity::Maintenance,
            Self::Other { name } => ServiceIdentity::Other(name.clone()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Distributor { .. } => "distributor",
            Self::Executor { .. } => "executor",
            Self::Janitor { .. } => "janitor",
            Self::Receiver { .. } => "receiver",
            Self::Analyzer { .. } => "analyzer",
            Self::Backfill { .. } => "backfill",
            Self::Maintenance { .. } => "maintenance",
            Self::Other { name } => name,
        }
    }

    pub fn postgres(&self) -> Option<&PostgresConnection> {
        match self {
            Self::Distributor { postgres }
            | Self::Executor { postgres, .. }
            | Self::Janitor { postgres }
            | Self::Receiver { postgres }
            | Self::Analyzer { postgres }
            | Self::Backfill { postgres }
            | Self::Maintenance { postgres } => Some(postgres),
            Self::Other { .. } => None,
        }
    }

    pub fn oci(&self) -> Option<&OracleConnection> {
        match self {
            Self::Executor { oci, .. } => Some(oci),
            _ => None,
        }
    }
}

/// Validated, non-derived parts of `Settings`.
pub(crate) struct SettingsParts {
    pub service: ServiceConfig,
    pub environment: String,
    pub exchanges: BTreeMap<String, ExchangeConnection>,
    pub redis: RedisConnection,
    pub redis_streams: RedisStreamSettings,
    pub risk_management: Option<RiskManagementSettings>,
    pub services: Option<ServiceSettings>,
    pub regime_parameters: BTreeMap<String, RegimeParameterSettings>,
    pub analyzer: Option<AnalyzerSettings>,
    pub backfill: Option<BackfillSettings>,
    pub maintenance: Option<MaintenanceSettings>,
    pub distributor: Option<DistributorSettings>,
    pub tradable: Vec<TradableItem>,
    pub strategies: Vec<StrategyDescriptor>,
    pub market_definitions: Vec<MarketDefinition>,
    pub warnings: Vec<String>,
}

/// Fully validated configuration of one service.
///
/// Constructed once by the loader and never mutated afterwards; share it
/// by reference or behind an `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    #[serde(flatten)]
    service: ServiceConfig,
    environment: String,
    exchanges: BTreeMap<String, ExchangeConnection>,
    redis: RedisConnection,
    redis_streams: RedisStreamSettings,
    risk_management: Option<RiskManagementSettings>,
    services: Option<ServiceSettings>,
    regime_parameters: BTreeMap<String, RegimeParameterSettings>,
    analyzer: Option<AnalyzerSettings>,
    backfill: Option<BackfillSettings>,
    maintenance: Option<MaintenanceSettings>,
    distributor: Option<DistributorSettings>,
    tradable: Vec<TradableItem>,
    strategies: Vec<StrategyDescriptor>,
    market_definitions: Vec<MarketDefinition>,
    hedged_currencies: Vec<String>,
    strategy_map: BTreeMap<String, StrategyDescriptor>,
    market_map: BTreeMap<String, MarketDefinition>,
    #[serde(skip)]
    warnings: Vec<String>,
}

impl Settings {
    pub(crate) fn from_parts(parts: SettingsParts) -> Self {
        let hedged_currencies = derive::hedged_currencies(&parts.tradable);
        let strategy_map = derive::strategy_map(&parts.strategies);
        let markets = derive::market_map(&parts.market_definitions, &parts.exchanges);

        let mut warnings = parts.warnings;
        warnings.extend(markets.unresolved.iter().map(|(market_id, exchange)| {
            format!("market '{market_id}' dropped: exchange '{exchange}' is not configured")
        }));

        Self {
            service: parts.service,
            environment: parts.environment,
            exchanges: parts.exchanges,
            redis: parts.redis,
            redis_streams: parts.redis_streams,
            risk_management: parts.risk_management,
            services: parts.services,
            regime_parameters: parts.regime_parameters,
            analyzer: parts.analyzer,
            backfill: parts.backfill,
            maintenance: parts.maintenance,
            distributor: parts.distributor,
            tradable: parts.tradable,
            strategies: parts.strategies,
            market_definitions: parts.market_definitions,
            hedged_currencies,
            strategy_map,
            market_map: markets.markets,
            warnings,
        }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub fn identity(&self) -> ServiceIdentity {
        self.service.identity()
    }

    pub fn service(&self) -> &ServiceConfig {
        &self.service
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn exchanges(&self) -> &BTreeMap<String, ExchangeConnection> {
        &self.exchanges
    }

    pub fn exchange(&self, name: &str) -> Option<&ExchangeConnection> {
        self.exchanges.get(name)
    }

    pub fn redis(&self) -> &RedisConnection {
        &self.redis
    }

    pub fn redis_streams(&self) -> &RedisStreamSettings {
        &self.redis_streams
    }

    pub fn postgres(&self) -> Option<&PostgresConnection> {
        self.service.postgres()
    }

    pub fn oci(&self) -> Option<&OracleConnection> {
        self.service.oci()
    }

    pub fn risk_management(&self) -> Option<&RiskManagementSettings> {
        self.risk_management.as_ref()
    }

    pub fn services(&self) -> Option<&ServiceSettings> {
        self.services.as_ref()
    }

    pub fn regime_parameters(&self) -> &BTreeMap<String, RegimeParameterSettings> {
        &self.regime_parameters
    }

    pub fn analyzer(&self) -> Option<&AnalyzerSettings> {
        self.analyzer.as_ref()
    }

    pub fn backfill(&self) -> Option<&BackfillSettings> {
        self.backfill.as_ref()
    }

    pub fn maintenance(&self) -> Option<&MaintenanceSettings> {
        self.maintenance.as_ref()
    }

    pub fn distributor(&self) -> Option<&DistributorSettings> {
        self.distributor.as_ref()
    }

    pub fn tradable(&self) -> &[TradableItem] {
        &self.tradable
    }

    /// Raw strategy descriptors in document order, labelled or not.
    pub fn strategies(&self) -> &[StrategyDescriptor] {
        &self.strategies
    }

    /// Market definitions as read from documents, without endpoints.
    pub fn market_definitions(&self) -> &[MarketDefinition] {
        &self.market_definitions
    }

    /// Sorted, duplicate-free union of every `tradable[].spot` entry.
    pub fn hedged_currencies(&self) -> &[String] {
        &self.hedged_currencies
    }

    /// Labelled strategy descriptors keyed by `strategy_label`.
    pub fn strategy_map(&self) -> &BTreeMap<String, StrategyDescriptor> {
        &self.strategy_map
    }

    /// Market definitions hydrated with exchange endpoints, keyed by market id.
    pub fn market_map(&self) -> &BTreeMap<String, MarketDefinition> {
        &self.market_map
    }

    pub fn market(&self, market_id: &str) -> Option<&MarketDefinition> {
        self.market_map.get(market_id)
    }

    /// Non-fatal problems noticed while building these settings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}
