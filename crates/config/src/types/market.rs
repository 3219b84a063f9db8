//! Market, tradable and strategy descriptors.
//!
//! Responsibilities:
//! - Define market definitions as read from documents and as hydrated with exchange endpoints.
//! - Define tradable items and opaque strategy descriptors.
//!
//! Does NOT handle:
//! - Computing the hydrated market map (see `derive` module).
//!
//! Invariants:
//! - `ws_base_url`/`rest_base_url` are `None` on definitions parsed from documents.
//! - Strategy descriptors are kept verbatim; only `strategy_label` is interpreted.

use serde::Serialize;

/// One tradable market on one exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketDefinition {
    pub market_id: String,
    /// Name of the exchange, a key of `Settings::exchanges`.
    pub exchange: String,
    pub symbol: String,
    pub market_type: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub tick_size: f64,
    pub contract_size: f64,
    /// WebSocket endpoint of the exchange, set only in the hydrated view.
    pub ws_base_url: Option<String>,
    /// REST endpoint of the exchange, set only in the hydrated view.
    pub rest_base_url: Option<String>,
}

/// A group of spot currencies traded together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradableItem {
    pub spot: Vec<String>,
}

/// Raw strategy configuration, passed through to strategy code untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StrategyDescriptor(toml::Table);

impl StrategyDescriptor {
    pub fn new(table: toml::Table) -> Self {
        Self(table)
    }

    /// The `strategy_label` field, when present and a string.
    pub fn label(&self) -> Option<&str> {
        self.0.get("strategy_label").and_then(toml::Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.0.get(key)
    }

    pub fn as_table(&self) -> &toml::Table {
        &self.0
    }
}
