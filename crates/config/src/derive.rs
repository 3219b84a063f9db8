//! Derived fields computed from validated settings.
//!
//! Responsibilities:
//! - Compute the hedged currency set from tradable items.
//! - Index labelled strategy descriptors by label.
//! - Hydrate market definitions with their exchange's endpoints and index them by market id.
//!
//! Does NOT handle:
//! - Validating the inputs (they are already validated when these run).
//! - Storing the results (see `Settings::from_parts`).
//!
//! Invariants:
//! - Every function is pure and idempotent over its inputs.
//! - A market whose exchange is not configured is left out of the map, never an error.
//! - Later market definitions with a duplicate market id replace earlier ones.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ExchangeConnection, MarketDefinition, StrategyDescriptor, TradableItem};

/// Sorted, duplicate-free union of every `spot` list.
pub fn hedged_currencies(tradable: &[TradableItem]) -> Vec<String> {
    tradable
        .iter()
        .flat_map(|item| item.spot.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Map each labelled strategy descriptor to its label.
///
/// Descriptors without a `strategy_label` are skipped. A repeated label keeps
/// the last descriptor.
pub fn strategy_map(strategies: &[StrategyDescriptor]) -> BTreeMap<String, StrategyDescriptor> {
    strategies
        .iter()
        .filter_map(|strategy| {
            strategy
                .label()
                .map(|label| (label.to_string(), strategy.clone()))
        })
        .collect()
}

/// Result of hydrating market definitions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketMap {
    /// Hydrated definitions keyed by market id.
    pub markets: BTreeMap<String, MarketDefinition>,
    /// `(market_id, exchange)` pairs dropped because the exchange is not configured.
    pub unresolved: Vec<(String, String)>,
}

/// Hydrate market definitions with exchange endpoints, keyed by market id.
pub fn market_map(
    definitions: &[MarketDefinition],
    exchanges: &BTreeMap<String, ExchangeConnection>,
) -> MarketMap {
    let mut result = MarketMap::default();

    for definition in definitions {
        let Some(exchange) = exchanges.get(&definition.exchange) else {
            tracing::warn!(
                market_id = %definition.market_id,
                exchange = %definition.exchange,
                "Market definition references an unconfigured exchange, skipping"
            );
            result
                .unresolved
                .push((definition.market_id.clone(), definition.exchange.clone()));
            continue;
        };

        let mut hydrated = definition.clone();
        hydrated.ws_base_url = exchange.ws_url.clone();
        hydrated.rest_base_url = exchange.rest_url.clone();

        if result
            .markets
            .insert(definition.market_id.clone(), hydrated)
            .is_some()
        {
            tracing::debug!(market_id = %definition.market_id, "Duplicate market id, later definition wins");
        }
    }

    result
}
