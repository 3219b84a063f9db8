//! Exchange connection variables of the form `EXCHANGES__<name>__<field>`.
//!
//! Responsibilities:
//! - Tokenize environment variable names into exchange name and field name.
//! - Layer file-based credential overrides for well-known exchanges on top.
//!
//! Does NOT handle:
//! - Validating field values (see the `validation` module).
//! - Merging with exchange tables from documents (see builder.rs).
//!
//! Invariants:
//! - Matching is case-insensitive; names and fields are stored lowercase.
//! - Only names with exactly three `__`-separated, non-empty segments are considered.
//! - A file override only replaces a field when it resolves to a value.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

use super::env::{EnvSettings, EnvSnapshot};
use super::secrets::{FileSource, resolve_secret};
use crate::constants::{DERIBIT, ENV_KEY_SEPARATOR, EXCHANGES_PREFIX};

/// Exchange fields extracted from the environment, keyed by exchange then field.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExchangeVars {
    exchanges: BTreeMap<String, BTreeMap<String, String>>,
}

impl ExchangeVars {
    /// Scan a snapshot for `EXCHANGES__<name>__<field>` variables.
    pub fn from_snapshot(env: &EnvSnapshot) -> Self {
        let mut vars = Self::default();

        for (key, value) in env.iter() {
            let Some((name, field)) = split_exchange_key(key) else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            vars.exchanges
                .entry(name)
                .or_default()
                .insert(field, value.to_string());
        }

        vars
    }

    /// Value of `field` for `exchange`, if present.
    pub fn field(&self, exchange: &str, field: &str) -> Option<&str> {
        self.exchanges
            .get(exchange)
            .and_then(|fields| fields.get(field))
            .map(String::as_str)
    }

    /// Replace `exchange.field` with `value` when it is present.
    ///
    /// Returns whether the field was written.
    pub fn override_field(
        &mut self,
        exchange: &str,
        field: &str,
        value: Option<SecretString>,
    ) -> bool {
        let Some(value) = value else {
            return false;
        };
        self.exchanges
            .entry(exchange.to_string())
            .or_default()
            .insert(field.to_string(), value.expose_secret().to_string());
        true
    }

    /// Iterate over exchanges and their fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.exchanges.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    /// Apply file-based credential overrides for exchanges that support them.
    pub(crate) fn apply_secret_files(&mut self, env: &EnvSettings, files: &dyn FileSource) {
        let client_id = resolve_secret(files, None, env.deribit_client_id_file.as_deref());
        if self.override_field(DERIBIT, "client_id", client_id) {
            tracing::debug!(exchange = DERIBIT, "Client id loaded from secret file");
        }

        let client_secret =
            resolve_secret(files, None, env.deribit_client_secret_file.as_deref());
        if self.override_field(DERIBIT, "client_secret", client_secret) {
            tracing::debug!(exchange = DERIBIT, "Client secret loaded from secret file");
        }
    }
}

impl fmt::Debug for ExchangeVars {
    // Field values include client secrets; only names are shown.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape: BTreeMap<&str, Vec<&str>> = self
            .exchanges
            .iter()
            .map(|(name, fields)| (name.as_str(), fields.keys().map(String::as_str).collect()))
            .collect();
        f.debug_struct("ExchangeVars")
            .field("exchanges", &shape)
            .finish()
    }
}

/// Split `EXCHANGES__<name>__<field>` into lowercase `(name, field)`.
fn split_exchange_key(key: &str) -> Option<(String, String)> {
    let mut segments = key.split(ENV_KEY_SEPARATOR);
    let prefix = segments.next()?;
    let name = segments.next()?;
    let field = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    if !prefix.eq_ignore_ascii_case(EXCHANGES_PREFIX) || name.is_empty() || field.is_empty() {
        return None;
    }
    Some((name.to_ascii_lowercase(), field.to_ascii_lowercase()))
}
