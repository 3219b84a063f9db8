//! Business-logic sections read from configuration documents.
//!
//! Responsibilities:
//! - Define the per-service and shared business sections (risk, reconciliation, regimes, ...).
//! - Provide defaults for fields that documents may omit.
//!
//! Does NOT handle:
//! - Range checks (see `validation` module).
//! - Interpreting the economic meaning of any value.
//!
//! Invariants:
//! - Default values come from `constants`, not magic numbers.

use serde::Serialize;

use crate::constants::*;

/// Redis stream consumer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedisStreamSettings {
    pub max_retries: u32,
}

impl Default for RedisStreamSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_STREAM_MAX_RETRIES,
        }
    }
}

/// Order and position limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskManagementSettings {
    pub max_order_notional_usd: f64,
    pub max_position_notional_usd: f64,
    pub price_deviation_tolerance_pct: f64,
    pub equity_dust_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationSettings {
    pub interval_seconds: u64,
    pub initial_delay_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutorServiceSettings {
    pub reconciliation: ReconciliationSettings,
}

/// Operational settings grouped under the `services` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceSettings {
    pub executor: Option<ExecutorServiceSettings>,
}

/// Execution parameters for one market regime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeParameterSettings {
    pub hedge_ratio: f64,
    pub execution_horizon_minutes: u32,
    pub order_type: String,
    pub time_in_force: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerSettings {
    pub instrument_sync_interval_s: u64,
    pub anomaly_check_interval_s: u64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            instrument_sync_interval_s: DEFAULT_INSTRUMENT_SYNC_INTERVAL_SECS,
            anomaly_check_interval_s: DEFAULT_ANOMALY_CHECK_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackfillSettings {
    pub lookback_days: u32,
    pub batch_size: u32,
}

impl Default for BackfillSettings {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_BACKFILL_LOOKBACK_DAYS,
            batch_size: DEFAULT_BACKFILL_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaintenanceSettings {
    pub pruning_interval_s: u64,
    pub retention_days: u32,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            pruning_interval_s: DEFAULT_PRUNING_INTERVAL_SECS,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributorSettings {
    pub publish_interval_ms: u64,
    pub max_batch_size: u32,
}

impl Default for DistributorSettings {
    fn default() -> Self {
        Self {
            publish_interval_ms: DEFAULT_PUBLISH_INTERVAL_MS,
            max_batch_size: DEFAULT_DISTRIBUTOR_MAX_BATCH_SIZE,
        }
    }
}
