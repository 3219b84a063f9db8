//! CLI exit codes for scripting and deployment tooling.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish failure classes.
//! - Map ConfigError variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-5 are reserved for specific error categories.

use trading_config::ConfigError;

/// Structured exit codes for trading-settings.
///
/// A supervisor can tell an environment problem from a broken document or a
/// missing secret without parsing stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - settings loaded and validated.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Environment error - an unparseable variable or `.env` file.
    ///
    /// Fix the deployment environment; retrying will not help.
    EnvironmentError = 2,

    /// Document error - a configuration document could not be read or parsed.
    DocumentError = 3,

    /// Missing secret - a required PostgreSQL or Oracle secret did not resolve.
    ///
    /// Check the secret mounts and the `*_FILE` variables.
    MissingSecret = 4,

    /// Validation error - the merged configuration violates the schema.
    ValidationError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            // Environment errors (exit code 2)
            ConfigError::InvalidValue { .. } => ExitCode::EnvironmentError,
            ConfigError::InvalidServiceName { .. } => ExitCode::EnvironmentError,
            ConfigError::DotenvParse { .. } => ExitCode::EnvironmentError,
            ConfigError::DotenvIo { .. } => ExitCode::EnvironmentError,
            ConfigError::DotenvUnknown => ExitCode::EnvironmentError,

            // Document errors (exit code 3)
            ConfigError::DocumentRead { .. } => ExitCode::DocumentError,
            ConfigError::DocumentParse { .. } => ExitCode::DocumentError,

            // Missing secrets (exit code 4)
            ConfigError::MissingPostgresPassword { .. } => ExitCode::MissingSecret,
            ConfigError::MissingOracleSecrets { .. } => ExitCode::MissingSecret,

            // Validation errors (exit code 5)
            ConfigError::Validation(_) => ExitCode::ValidationError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no ConfigError is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<ConfigError>())
            .map(ExitCode::from)
            .unwrap_or(ExitCode::GeneralError)
    }
}
