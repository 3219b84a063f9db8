//! Error types for configuration loading.
//!
//! Responsibilities:
//! - Define error variants for every fatal configuration failure.
//! - Aggregate schema violations so a single error reports all of them.
//!
//! Does NOT handle:
//! - Unreadable secret files (these resolve to an absent value, see `secrets.rs`).
//! - Missing optional documents (a logged, non-error path, see `documents.rs`).
//!
//! Invariants:
//! - All error variants include context for debugging (variable names, paths, service).
//! - Messages never include secret values, raw `.env` lines or full URLs.
//! - `ValidationErrors` is never constructed empty by the loader.

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Service name '{name}' cannot be used to locate a configuration document")]
    InvalidServiceName { name: String },

    #[error("Failed to read configuration document at {path}: {source}")]
    DocumentRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration document at {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(
        "PostgreSQL password could not be loaded for service '{service}'. Set POSTGRES_PASSWORD or POSTGRES_PASSWORD_FILE."
    )]
    MissingPostgresPassword { service: String },

    #[error("Service '{service}' requires OCI secrets but could not load: {}", missing.join(", "))]
    MissingOracleSecrets {
        service: String,
        missing: Vec<&'static str>,
    },

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// Failed to parse the `.env` file due to invalid syntax.
    ///
    /// SAFETY: This error only includes the byte index of the parse failure,
    /// NOT the offending line content, to prevent leaking secrets.
    #[error(
        "Failed to parse .env file at position {error_index}. Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    /// Failed to read the `.env` file due to an I/O error.
    #[error("Failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants from dotenvy crate).
    #[error("Failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

/// A single schema violation, addressed by its dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path of the offending field, e.g. `market_definitions[2].tick_size`.
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found while validating the settings of one service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    service: String,
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new(service: impl Into<String>, violations: Vec<FieldViolation>) -> Self {
        Self {
            service: service.into(),
            violations,
        }
    }

    /// Service identity whose configuration failed validation.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Whether any violation is reported against `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration for service '{}' is invalid ({} violation{}):",
            self.service,
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for (i, violation) in self.violations.iter().enumerate() {
            write!(f, "\n  {}: {violation}", i + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
