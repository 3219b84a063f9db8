//! Configuration loader for environment variables, secret files and documents.
//!
//! Responsibilities:
//! - Snapshot the process environment, optionally seeded from a `.env` file.
//! - Resolve secrets that may be given directly or through a file path.
//! - Load and merge the layered TOML documents.
//! - Provide the `SettingsLoader` builder and the `load` entry point.
//!
//! Does NOT handle:
//! - Schema rules (see the `validation` module).
//! - Derived fields (see the `derive` module).
//!
//! Invariants / Assumptions:
//! - The process environment is never mutated.
//! - The `DOTENV_DISABLED` variable is checked before any `.env` file is read.
//! - Every file access goes through a `FileSource`.

mod builder;
mod documents;
mod env;
mod error;
mod exchanges;
mod secrets;

#[cfg(test)]
mod tests;

pub use builder::{SettingsLoader, load, load_from_process};
pub use documents::{Document, load_documents, merge_shallow};
pub use env::{EnvSettings, EnvSnapshot};
pub use error::{ConfigError, FieldViolation, ValidationErrors};
pub use exchanges::ExchangeVars;
pub use secrets::{FileSource, MemoryFiles, OsFileSource, resolve_secret};
