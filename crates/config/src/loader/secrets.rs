//! Filesystem seam and secret resolution.
//!
//! Responsibilities:
//! - Define the `FileSource` trait through which every loader stage touches files.
//! - Provide the real filesystem (`OsFileSource`) and an in-memory one (`MemoryFiles`).
//! - Resolve a secret that may come from a literal value or from a file path.
//!
//! Does NOT handle:
//! - Deciding whether a missing secret is fatal (see builder.rs).
//! - Parsing configuration documents (see documents.rs).
//!
//! Invariants:
//! - A secret file that exists but cannot be read resolves to `None`, never to the direct value.
//! - So does a secret path whose existence cannot be checked.
//! - A secret file path that does not exist falls back to the direct value.
//! - Secret file contents are trimmed; blank contents count as absent.
//! - Failures are logged with the path only, never the contents.

use secrecy::SecretString;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only view of a filesystem.
pub trait FileSource {
    /// Whether `path` refers to an existing file.
    ///
    /// Errors when existence cannot be determined, e.g. an unsearchable
    /// parent directory.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read the whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSource;

impl FileSource for OsFileSource {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

#[derive(Debug, Clone)]
enum MemoryFile {
    Contents(String),
    Unreadable(io::ErrorKind),
    Unstatable(io::ErrorKind),
}

/// In-memory filesystem, including files that exist but fail to read.
#[derive(Debug, Clone, Default)]
pub struct MemoryFiles {
    files: BTreeMap<PathBuf, MemoryFile>,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a readable file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.files
            .insert(path.into(), MemoryFile::Contents(contents.into()));
        self
    }

    /// Add a file that exists but fails to read with `kind`.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.files.insert(path.into(), MemoryFile::Unreadable(kind));
        self
    }

    /// Add a path whose existence cannot be checked, failing with `kind`.
    pub fn with_unstatable(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.files.insert(path.into(), MemoryFile::Unstatable(kind));
        self
    }
}

impl FileSource for MemoryFiles {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match self.files.get(path) {
            Some(MemoryFile::Unstatable(kind)) => Err(io::Error::from(*kind)),
            Some(_) => Ok(true),
            None => Ok(false),
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        match self.files.get(path) {
            Some(MemoryFile::Contents(contents)) => Ok(contents.clone()),
            Some(MemoryFile::Unreadable(kind) | MemoryFile::Unstatable(kind)) => {
                Err(io::Error::from(*kind))
            }
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }
}

/// Resolve a secret from a direct value or a file.
///
/// - No `file_path`: returns `direct` unchanged (which may be `None`).
/// - `file_path` does not exist: returns `direct`.
/// - `file_path` exists and reads: returns the trimmed contents.
/// - `file_path` exists but reading fails: logs the failure and returns `None`.
/// - Existence of `file_path` cannot be checked: logs the failure and returns `None`.
pub fn resolve_secret(
    files: &dyn FileSource,
    direct: Option<SecretString>,
    file_path: Option<&Path>,
) -> Option<SecretString> {
    let Some(path) = file_path else {
        return direct;
    };

    match files.exists(path) {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(path = %path.display(), "Secret file not found, using direct value");
            return direct;
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to check secret file");
            return None;
        }
    }

    match files.read_to_string(path) {
        Ok(contents) => {
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                tracing::warn!(path = %path.display(), "Secret file is empty");
                None
            } else {
                Some(SecretString::new(trimmed.into()))
            }
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read secret from file");
            None
        }
    }
}
