//! Per-section schema rules.
//!
//! Each function reads one section of the merged mapping, records every
//! violation it finds, and returns the typed section when it is usable.

use secrecy::SecretString;
use std::collections::BTreeMap;
use toml::Value;

use super::reader::{Bound, Section, Validator};
use crate::constants::*;
use crate::types::*;

const WS_SCHEMES: &[&str] = &["ws", "wss"];
const HTTP_SCHEMES: &[&str] = &["http", "https"];
const REDIS_SCHEMES: &[&str] = &["redis", "rediss"];

/// Fields of an exchange table with a fixed meaning; everything else is `extra`.
const EXCHANGE_FIELDS: &[&str] = &["account_id", "ws_url", "rest_url", "client_id", "client_secret"];

fn secret(value: String) -> SecretString {
    SecretString::new(value.into())
}

pub(super) fn redis(v: &mut Validator, root: &Section<'_>) -> Option<RedisConnection> {
    let section = root.required_table(v, "redis")?;
    let url = section.required_url(v, "url", REDIS_SCHEMES);
    let db = section.required_int(v, "db", Bound::NonNegative);
    let password = section.optional_str(v, "password").map(secret);
    Some(RedisConnection {
        url: url?,
        db: db?,
        password,
    })
}

pub(super) fn redis_streams(v: &mut Validator, root: &Section<'_>) -> RedisStreamSettings {
    let Some(section) = root.optional_table(v, "redis_streams") else {
        return RedisStreamSettings::default();
    };
    RedisStreamSettings {
        max_retries: section
            .optional_int(v, "max_retries", Bound::NonNegative)
            .unwrap_or(DEFAULT_STREAM_MAX_RETRIES),
    }
}

pub(super) fn exchanges(
    v: &mut Validator,
    root: &Section<'_>,
) -> BTreeMap<String, ExchangeConnection> {
    let mut exchanges = BTreeMap::new();
    let Some(section) = root.optional_table(v, "exchanges") else {
        return exchanges;
    };

    for name in section.table().keys() {
        let Some(table) = section.optional_table(v, name) else {
            continue;
        };
        exchanges.insert(name.clone(), exchange(v, &table));
    }
    exchanges
}

fn exchange(v: &mut Validator, section: &Section<'_>) -> ExchangeConnection {
    let mut exchange = ExchangeConnection {
        account_id: section.optional_str(v, "account_id"),
        ws_url: section.optional_url(v, "ws_url", WS_SCHEMES),
        rest_url: section.optional_url(v, "rest_url", HTTP_SCHEMES),
        client_id: section.optional_str(v, "client_id"),
        client_secret: section.optional_str(v, "client_secret").map(secret),
        extra: BTreeMap::new(),
    };

    for (key, value) in section.table() {
        if EXCHANGE_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            other => {
                v.violation(
                    section.field(key),
                    format!("expected a string, number or boolean, found {}", other.type_str()),
                );
                continue;
            }
        };
        exchange.extra.insert(key.clone(), text);
    }

    exchange
}

/// Trading services must be able to authenticate against credentialed exchanges.
pub(super) fn exchange_credentials(
    v: &mut Validator,
    service: &str,
    exchanges: &BTreeMap<String, ExchangeConnection>,
) {
    for name in CREDENTIALED_EXCHANGES {
        let Some(exchange) = exchanges.get(*name) else {
            continue;
        };
        if exchange.client_id.is_none() {
            v.violation(
                format!("exchanges.{name}.client_id"),
                format!("is required for service '{service}'"),
            );
        }
        if exchange.client_secret.is_none() {
            v.violation(
                format!("exchanges.{name}.client_secret"),
                format!("is required for service '{service}'"),
            );
        }
    }
}

pub(super) fn postgres(v: &mut Validator, root: &Section<'_>) -> Option<PostgresConnection> {
    let section = root.optional_table(v, "postgres")?;
    let user = section.required_str(v, "user");
    let password = section.required_str(v, "password");
    let host = section.required_str(v, "host");
    let port = section.required_int(v, "port", Bound::Positive);
    let database = section.required_str(v, "database");

    match PostgresConnection::new(user?, secret(password?), host?, port?, database?) {
        Ok(connection) => Some(connection),
        Err(message) => {
            v.violation(section.path(), message);
            None
        }
    }
}

pub(super) fn oci(v: &mut Validator, root: &Section<'_>) -> Option<OracleConnection> {
    let section = root.optional_table(v, "oci")?;
    let user = section.required_str(v, "user");
    let password = section.required_str(v, "password");
    let dsn = section.required_str(v, "dsn");
    let wallet_dir = section.required_str(v, "wallet_dir");

    let dsn = dsn?;
    if parse_tns_alias(&dsn).is_empty() {
        v.violation(section.field("dsn"), "does not contain a connection alias");
        return None;
    }
    Some(OracleConnection::new(user?, secret(password?), &dsn, wallet_dir?))
}

pub(super) fn risk_management(
    v: &mut Validator,
    root: &Section<'_>,
) -> Option<RiskManagementSettings> {
    let section = root.optional_table(v, "risk_management")?;
    let max_order = section.required_float(v, "max_order_notional_usd", Bound::Positive);
    let max_position = section.required_float(v, "max_position_notional_usd", Bound::Positive);
    let tolerance = section.required_float(v, "price_deviation_tolerance_pct", Bound::NonNegative);
    let dust = section.required_float(v, "equity_dust_threshold", Bound::NonNegative);
    Some(RiskManagementSettings {
        max_order_notional_usd: max_order?,
        max_position_notional_usd: max_position?,
        price_deviation_tolerance_pct: tolerance?,
        equity_dust_threshold: dust?,
    })
}

pub(super) fn services(v: &mut Validator, root: &Section<'_>) -> Option<ServiceSettings> {
    let section = root.optional_table(v, "services")?;
    let executor = match section.optional_table(v, "executor") {
        Some(executor) => {
            let reconciliation = executor.required_table(v, "reconciliation")?;
            let interval = reconciliation.required_int(v, "interval_seconds", Bound::Positive);
            let delay = reconciliation.required_int(v, "initial_delay_seconds", Bound::NonNegative);
            Some(ExecutorServiceSettings {
                reconciliation: ReconciliationSettings {
                    interval_seconds: interval?,
                    initial_delay_seconds: delay?,
                },
            })
        }
        None => None,
    };
    Some(ServiceSettings { executor })
}

pub(super) fn regime_parameters(
    v: &mut Validator,
    root: &Section<'_>,
) -> BTreeMap<String, RegimeParameterSettings> {
    let mut regimes = BTreeMap::new();
    let Some(section) = root.optional_table(v, "regime_parameters") else {
        return regimes;
    };

    for name in section.table().keys() {
        let Some(regime) = section.optional_table(v, name) else {
            continue;
        };
        let hedge_ratio = regime.required_float(v, "hedge_ratio", Bound::Positive);
        let horizon = regime.required_int(v, "execution_horizon_minutes", Bound::Positive);
        let order_type = regime.required_str(v, "order_type");
        let time_in_force = regime.required_str(v, "time_in_force");
        let ttl = regime.required_int(v, "ttl_seconds", Bound::Positive);

        if let (Some(hedge_ratio), Some(horizon), Some(order_type), Some(time_in_force), Some(ttl)) =
            (hedge_ratio, horizon, order_type, time_in_force, ttl)
        {
            regimes.insert(
                name.clone(),
                RegimeParameterSettings {
                    hedge_ratio,
                    execution_horizon_minutes: horizon,
                    order_type,
                    time_in_force,
                    ttl_seconds: ttl,
                },
            );
        }
    }
    regimes
}

pub(super) fn tradable(v: &mut Validator, root: &Section<'_>) -> Vec<TradableItem> {
    root.optional_table_array(v, "tradable")
        .iter()
        .filter_map(|item| item.required_str_array(v, "spot"))
        .map(|spot| TradableItem { spot })
        .collect()
}

pub(super) fn strategies(v: &mut Validator, root: &Section<'_>) -> Vec<StrategyDescriptor> {
    root.optional_table_array(v, "strategies")
        .into_iter()
        .filter_map(|strategy| {
            if strategy.contains("strategy_label") {
                strategy.optional_str(v, "strategy_label")?;
            }
            Some(StrategyDescriptor::new(strategy.table().clone()))
        })
        .collect()
}

pub(super) fn market_definitions(v: &mut Validator, root: &Section<'_>) -> Vec<MarketDefinition> {
    root.optional_table_array(v, "market_definitions")
        .iter()
        .filter_map(|market| {
            let market_id = market.required_str(v, "market_id");
            let exchange = market.required_str(v, "exchange");
            let symbol = market.required_str(v, "symbol");
            let market_type = market.required_str(v, "market_type");
            let base_asset = market.required_str(v, "base_asset");
            let quote_asset = market.required_str(v, "quote_asset");
            let tick_size = market.required_float(v, "tick_size", Bound::Positive);
            let contract_size = if market.contains("contract_size") {
                market.optional_float(v, "contract_size", Bound::Positive)
            } else {
                Some(DEFAULT_CONTRACT_SIZE)
            };

            Some(MarketDefinition {
                market_id: market_id?,
                exchange: exchange?,
                symbol: symbol?,
                market_type: market_type?,
                base_asset: base_asset?,
                quote_asset: quote_asset?,
                tick_size: tick_size?,
                contract_size: contract_size?,
                ws_base_url: None,
                rest_base_url: None,
            })
        })
        .collect()
}

pub(super) fn analyzer(v: &mut Validator, root: &Section<'_>) -> Option<AnalyzerSettings> {
    let section = root.optional_table(v, "analyzer")?;
    let defaults = AnalyzerSettings::default();
    Some(AnalyzerSettings {
        instrument_sync_interval_s: section
            .optional_int(v, "instrument_sync_interval_s", Bound::Positive)
            .unwrap_or(defaults.instrument_sync_interval_s),
        anomaly_check_interval_s: section
            .optional_int(v, "anomaly_check_interval_s", Bound::Positive)
            .unwrap_or(defaults.anomaly_check_interval_s),
    })
}

pub(super) fn backfill(v: &mut Validator, root: &Section<'_>) -> Option<BackfillSettings> {
    let section = root.optional_table(v, "backfill")?;
    let defaults = BackfillSettings::default();
    Some(BackfillSettings {
        lookback_days: section
            .optional_int(v, "lookback_days", Bound::Positive)
            .unwrap_or(defaults.lookback_days),
        batch_size: section
            .optional_int(v, "batch_size", Bound::Positive)
            .unwrap_or(defaults.batch_size),
    })
}

pub(super) fn maintenance(v: &mut Validator, root: &Section<'_>) -> Option<MaintenanceSettings> {
    let section = root.optional_table(v, "maintenance")?;
    let defaults = MaintenanceSettings::default();
    Some(MaintenanceSettings {
        pruning_interval_s: section
            .optional_int(v, "pruning_interval_s", Bound::Positive)
            .unwrap_or(defaults.pruning_interval_s),
        retention_days: section
            .optional_int(v, "retention_days", Bound::Positive)
            .unwrap_or(defaults.retention_days),
    })
}

pub(super) fn distributor(v: &mut Validator, root: &Section<'_>) -> Option<DistributorSettings> {
    let section = root.optional_table(v, "distributor")?;
    let defaults = DistributorSettings::default();
    Some(DistributorSettings {
        publish_interval_ms: section
            .optional_int(v, "publish_interval_ms", Bound::Positive)
            .unwrap_or(defaults.publish_interval_ms),
        max_batch_size: section
            .optional_int(v, "max_batch_size", Bound::Positive)
            .unwrap_or(defaults.max_batch_size),
    })
}
