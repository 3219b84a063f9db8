//! Property-based tests for derived fields and alias parsing.
//!
//! These tests use randomly generated inputs to check the invariants that
//! hold for every configuration, not just the fixtures used elsewhere.
//!
//! Test coverage:
//! - Hedged currencies: sorted, duplicate-free set union of every spot list
//! - Oracle aliases: parsing is idempotent and strips credentials and queries
//! - Market map: only configured exchanges, last duplicate wins
//! - Strategy map: keys are exactly the labels present

use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use trading_config::derive::{hedged_currencies, market_map, strategy_map};
use trading_config::{
    ExchangeConnection, MarketDefinition, StrategyDescriptor, TradableItem, parse_tns_alias,
};

fn currency_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("BTC"),
        Just("ETH"),
        Just("SOL"),
        Just("USDC"),
        Just("XRP"),
    ]
    .prop_map(str::to_string)
}

fn tradable_strategy() -> impl Strategy<Value = Vec<TradableItem>> {
    prop::collection::vec(
        prop::collection::vec(currency_strategy(), 0..5).prop_map(|spot| TradableItem { spot }),
        0..6,
    )
}

/// Text that may contain credentials before `@` and a query after `?`.
fn raw_alias_strategy() -> impl Strategy<Value = String> {
    (
        prop::option::of("[a-z]{1,6}:[a-z@]{0,6}@"),
        "[a-z_]{1,12}",
        prop::option::of("\\?[a-z=&]{0,10}"),
    )
        .prop_map(|(credentials, alias, query)| {
            format!(
                "{}{alias}{}",
                credentials.unwrap_or_default(),
                query.unwrap_or_default()
            )
        })
}

fn market(id: &str, exchange: &str, symbol: String) -> MarketDefinition {
    MarketDefinition {
        market_id: id.to_string(),
        exchange: exchange.to_string(),
        symbol,
        market_type: "perpetual".to_string(),
        base_asset: "BTC".to_string(),
        quote_asset: "USD".to_string(),
        tick_size: 0.5,
        contract_size: 1.0,
        ws_base_url: None,
        rest_base_url: None,
    }
}

fn markets_strategy() -> impl Strategy<Value = Vec<MarketDefinition>> {
    prop::collection::vec(
        (
            prop_oneof![Just("btc-perp"), Just("eth-perp"), Just("sol-perp")],
            prop_oneof![Just("deribit"), Just("binance"), Just("okx")],
            "[A-Z]{3,8}",
        )
            .prop_map(|(id, exchange, symbol)| market(id, exchange, symbol)),
        0..10,
    )
}

fn exchanges_strategy() -> impl Strategy<Value = BTreeMap<String, ExchangeConnection>> {
    prop::collection::btree_set(
        prop_oneof![Just("deribit"), Just("binance"), Just("kraken")],
        0..3,
    )
    .prop_map(|names| {
        names
            .into_iter()
            .map(|name| {
                (
                    name.to_string(),
                    ExchangeConnection {
                        ws_url: Some(format!("wss://{name}.example/ws")),
                        ..Default::default()
                    },
                )
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_hedged_currencies_sorted_unique_union(tradable in tradable_strategy()) {
        let hedged = hedged_currencies(&tradable);

        prop_assert!(hedged.windows(2).all(|w| w[0] < w[1]), "not strictly sorted: {hedged:?}");

        let expected: BTreeSet<&String> = tradable.iter().flat_map(|t| &t.spot).collect();
        let actual: BTreeSet<&String> = hedged.iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_alias_parsing_is_idempotent(raw in raw_alias_strategy()) {
        let once = parse_tns_alias(&raw);
        prop_assert!(!once.contains('@'));
        prop_assert!(!once.contains('?'));
        prop_assert_eq!(parse_tns_alias(once), once);
    }

    #[test]
    fn test_market_map_only_configured_exchanges(
        definitions in markets_strategy(),
        exchanges in exchanges_strategy(),
    ) {
        let map = market_map(&definitions, &exchanges);

        for (id, market) in &map.markets {
            prop_assert_eq!(id, &market.market_id);
            let exchange = exchanges.get(&market.exchange);
            prop_assert!(exchange.is_some());
            prop_assert_eq!(&market.ws_base_url, &exchange.and_then(|e| e.ws_url.clone()));
        }

        let dropped = definitions
            .iter()
            .filter(|d| !exchanges.contains_key(&d.exchange))
            .count();
        prop_assert_eq!(map.unresolved.len(), dropped);
    }

    #[test]
    fn test_market_map_last_duplicate_wins(
        definitions in markets_strategy(),
        exchanges in exchanges_strategy(),
    ) {
        let map = market_map(&definitions, &exchanges);

        let mut expected: BTreeMap<&str, &str> = BTreeMap::new();
        for definition in &definitions {
            if exchanges.contains_key(&definition.exchange) {
                expected.insert(&definition.market_id, &definition.symbol);
            }
        }

        let actual: BTreeMap<&str, &str> = map
            .markets
            .iter()
            .map(|(id, m)| (id.as_str(), m.symbol.as_str()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn test_strategy_map_keys_are_labels(
        labels in prop::collection::vec(prop::option::of("[a-z_]{1,10}"), 0..8),
    ) {
        let strategies: Vec<StrategyDescriptor> = labels
            .iter()
            .map(|label| {
                let mut table = toml::Table::new();
                if let Some(label) = label {
                    table.insert("strategy_label".to_string(), toml::Value::String(label.clone()));
                }
                StrategyDescriptor::new(table)
            })
            .collect();

        let map = strategy_map(&strategies);
        let expected: BTreeSet<&String> = labels.iter().flatten().collect();
        let actual: BTreeSet<&String> = map.keys().collect();
        prop_assert_eq!(actual, expected);
    }
}
