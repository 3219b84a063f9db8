//! Settings schema validation.
//!
//! Responsibilities:
//! - Turn the merged, untyped mapping into a typed `Settings` value.
//! - Apply type and range rules per field and collect every violation.
//! - Enforce per-service required sections by matching on the service identity.
//!
//! Does NOT handle:
//! - Resolving secrets or reporting which secret input is missing (see `loader::builder`).
//! - Computing derived fields (see `derive` module, run by `Settings::from_parts`).
//!
//! Invariants:
//! - Validation either yields `Settings` or every violation found, never a partial value.
//! - A `postgres`/`oci` section is kept only for identities that require it.
//! - Violation messages never contain configuration values.

mod reader;
mod sections;

use toml::Table;

use crate::constants::DEFAULT_SERVICE_NAME;
use crate::loader::ValidationErrors;
use crate::types::{
    OracleConnection, PostgresConnection, ServiceConfig, ServiceIdentity, Settings, SettingsParts,
};
use reader::{Section, Validator};

/// Top-level keys the schema reads. Anything else is ignored.
const KNOWN_KEYS: &[&str] = &[
    "service_name",
    "environment",
    "exchanges",
    "redis",
    "redis_streams",
    "postgres",
    "oci",
    "risk_management",
    "services",
    "regime_parameters",
    "tradable",
    "strategies",
    "market_definitions",
    "analyzer",
    "backfill",
    "maintenance",
    "distributor",
];

/// Validate a merged mapping into `Settings`.
pub(crate) fn validate(raw: &Table) -> Result<Settings, ValidationErrors> {
    let mut v = Validator::default();
    let root = Section::root(raw);

    for key in raw.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
        tracing::debug!(key = %key, "Ignoring unknown configuration key");
    }

    let service_name = root.required_str(&mut v, "service_name");
    let environment = root.required_str(&mut v, "environment");
    let label = service_name
        .clone()
        .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
    let identity = ServiceIdentity::parse(&label);

    let exchanges = sections::exchanges(&mut v, &root);
    if identity == ServiceIdentity::Executor {
        sections::exchange_credentials(&mut v, &label, &exchanges);
    }

    let redis = sections::redis(&mut v, &root);
    let service = service_config(&mut v, &root, identity);
    let redis_streams = sections::redis_streams(&mut v, &root);
    let risk_management = sections::risk_management(&mut v, &root);
    let services = sections::services(&mut v, &root);
    let regime_parameters = sections::regime_parameters(&mut v, &root);
    let analyzer = sections::analyzer(&mut v, &root);
    let backfill = sections::backfill(&mut v, &root);
    let maintenance = sections::maintenance(&mut v, &root);
    let distributor = sections::distributor(&mut v, &root);
    let tradable = sections::tradable(&mut v, &root);
    let strategies = sections::strategies(&mut v, &root);
    let market_definitions = sections::market_definitions(&mut v, &root);

    let (violations, warnings) = v.into_parts();

    // Every `None` below is paired with a recorded violation.
    match (service, environment, redis) {
        (Some(service), Some(environment), Some(redis)) if violations.is_empty() => {
            Ok(Settings::from_parts(SettingsParts {
                service,
                environment,
                exchanges,
                redis,
                redis_streams,
                risk_management,
                services,
                regime_parameters,
                analyzer,
                backfill,
                maintenance,
                distributor,
                tradable,
                strategies,
                market_definitions,
                warnings,
            }))
        }
        _ => Err(ValidationErrors::new(label, violations)),
    }
}

/// Build the per-identity infrastructure, requiring exactly the sections the identity needs.
fn service_config(
    v: &mut Validator,
    root: &Section<'_>,
    identity: ServiceIdentity,
) -> Option<ServiceConfig> {
    let name = identity.to_string();

    match identity {
        ServiceIdentity::Executor => {
            let postgres = required_postgres(v, root, &name);
            let oci = required_oci(v, root, &name);
            Some(ServiceConfig::Executor {
                postgres: postgres?,
                oci: oci?,
            })
        }
        ServiceIdentity::Distributor => {
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Distributor {
                postgres: required_postgres(v, root, &name)?,
            })
        }
        ServiceIdentity::Janitor => {
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Janitor {
                postgres: required_postgres(v, root, &name)?,
            })
        }
        ServiceIdentity::Receiver => {
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Receiver {
                postgres: required_postgres(v, root, &name)?,
            })
        }
        ServiceIdentity::Analyzer => {
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Analyzer {
                postgres: required_postgres(v, root, &name)?,
            })
        }
        ServiceIdentity::Backfill => {
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Backfill {
                postgres: required_postgres(v, root, &name)?,
            })
        }
        ServiceIdentity::Maintenance => {
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Maintenance {
                postgres: required_postgres(v, root, &name)?,
            })
        }
        ServiceIdentity::Other(name) => {
            ignore_section(v, root, "postgres", &name);
            ignore_section(v, root, "oci", &name);
            Some(ServiceConfig::Other { name })
        }
    }
}

fn required_postgres(
    v: &mut Validator,
    root: &Section<'_>,
    service: &str,
) -> Option<PostgresConnection> {
    if !root.contains("postgres") {
        v.violation("postgres", format!("section is required for service '{service}'"));
        return None;
    }
    sections::postgres(v, root)
}

fn required_oci(
    v: &mut Validator,
    root: &Section<'_>,
    service: &str,
) -> Option<OracleConnection> {
    if !root.contains("oci") {
        v.violation("oci", format!("section is required for service '{service}'"));
        return None;
    }
    sections::oci(v, root)
}

fn ignore_section(v: &mut Validator, root: &Section<'_>, key: &str, service: &str) {
    if root.contains(key) {
        v.warn(format!(
            "'{key}' section ignored: service '{service}' does not use it"
        ));
    }
}
