//! Layered TOML document loading.
//!
//! Responsibilities:
//! - Load the shared base document and the service-specific document from a directory.
//! - Merge them with a shallow, top-level override.
//!
//! Does NOT handle:
//! - Interpreting document contents (see the `validation` module).
//! - Environment-derived sections (see builder.rs).
//!
//! Invariants:
//! - A missing document is not an error; it is logged and treated as empty.
//! - A document whose existence cannot be checked is `ConfigError::DocumentRead`.
//! - A document that exists but fails to parse is always fatal (`ConfigError::DocumentParse`).
//! - The service document is applied after the base document, so it wins on conflict.
//! - Nested tables are replaced wholesale, never deep-merged.

use std::io;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::secrets::FileSource;
use crate::constants::{BASE_DOCUMENT, SERVICE_DOCUMENT_EXTENSION};

/// Untyped document mapping as produced by the TOML parser.
pub type Document = toml::Table;

/// Path of the service-specific document for `service` inside `dir`.
pub fn service_document_path(dir: &Path, service: &str) -> Result<PathBuf, ConfigError> {
    let usable = !service.is_empty()
        && !service.contains(['/', '\\'])
        && !service.contains("..");
    if !usable {
        return Err(ConfigError::InvalidServiceName {
            name: service.to_string(),
        });
    }
    Ok(dir.join(format!("{service}.{SERVICE_DOCUMENT_EXTENSION}")))
}

/// Load and merge the base and service documents from `dir`.
///
/// Either, both or neither document may exist.
pub fn load_documents(
    files: &dyn FileSource,
    dir: &Path,
    service: &str,
) -> Result<Document, ConfigError> {
    let service_path = service_document_path(dir, service)?;

    let base = load_document(files, &dir.join(BASE_DOCUMENT))?.unwrap_or_default();
    let overlay = load_document(files, &service_path)?.unwrap_or_default();

    Ok(merge_shallow(base, overlay))
}

/// Read and parse one document, returning `None` when it does not exist.
pub fn load_document(files: &dyn FileSource, path: &Path) -> Result<Option<Document>, ConfigError> {
    let exists = files
        .exists(path)
        .map_err(|source| ConfigError::DocumentRead {
            path: path.to_path_buf(),
            source,
        })?;
    if !exists {
        tracing::info!(path = %path.display(), "No configuration document found, this may be normal");
        return Ok(None);
    }

    let content = match files.read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Configuration document disappeared before it was read");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::DocumentRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let document = toml::from_str::<Document>(&content).map_err(|source| {
        ConfigError::DocumentParse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::info!(path = %path.display(), keys = document.len(), "Loaded configuration document");
    Ok(Some(document))
}

/// Shallow merge: every top-level key of `overlay` replaces or is inserted into `base`.
pub fn merge_shallow(mut base: Document, overlay: Document) -> Document {
    for (key, value) in overlay {
        base.insert(key, value);
    }
    base
}
