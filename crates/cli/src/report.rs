//! Rendering of validated settings for stdout.
//!
//! Responsibilities:
//! - Render a one-line `key=value` summary of a `Settings` value.
//! - Render the full settings as pretty JSON.
//!
//! Invariants:
//! - Output never contains secret values. The summary only reads non-secret
//!   fields, and JSON goes through the redacting `Serialize` impl of `Settings`.

use anyhow::{Context, Result};
use trading_config::Settings;

/// One line describing what was loaded, suitable for startup logs and scripts.
pub fn summary(settings: &Settings) -> String {
    let mut parts = vec![
        format!("service={}", settings.service_name()),
        format!("environment={}", settings.environment()),
    ];

    if let Some(pg) = settings.postgres() {
        parts.push(format!(
            "postgres={}@{}:{}/{}",
            pg.user(),
            pg.host(),
            pg.port(),
            pg.database()
        ));
    }
    if let Some(oci) = settings.oci() {
        parts.push(format!("oci={}", oci.dsn()));
    }

    let exchanges: Vec<&str> = settings.exchanges().keys().map(String::as_str).collect();
    parts.push(format!("exchanges={}", list(&exchanges)));
    parts.push(format!("markets={}", settings.market_map().len()));
    parts.push(format!("hedged={}", list(settings.hedged_currencies())));
    parts.push(format!("strategies={}", settings.strategy_map().len()));
    parts.push(format!("warnings={}", settings.warnings().len()));

    parts.join(" ")
}

/// Pretty JSON with every secret rendered as `[REDACTED]`.
pub fn json(settings: &Settings) -> Result<String> {
    serde_json::to_string_pretty(settings).context("Failed to serialize settings")
}

fn list<S: AsRef<str>>(items: &[S]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}
