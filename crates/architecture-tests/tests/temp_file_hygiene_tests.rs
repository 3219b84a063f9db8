//! Purpose: Enforce deterministic temp file cleanup patterns in tests.
//!
//! Tests that write configuration documents, secret files or `.env` files must
//! use the tempfile crate's RAII types rather than std::env::temp_dir() with
//! manual cleanup, so a failing assertion never leaves secrets on disk.
//!
//! Non-scope: This test does not verify runtime behavior; it only checks
//! source code patterns. Files are analyzed statically.
//!
//! Invariants:
//! - No std::env::temp_dir() or hardcoded /tmp paths in files containing tests
//! - Temp directories are bound to a named variable for the test's lifetime

mod common;

use common::{find_workspace_root, rust_files};
use std::fs;
use std::path::PathBuf;

/// Files containing `#[test]`, with their contents.
fn test_sources() -> Vec<(PathBuf, String)> {
    let crates_dir = find_workspace_root().join("crates");
    rust_files(&crates_dir)
        .into_iter()
        .filter_map(|path| {
            let content = fs::read_to_string(&path).ok()?;
            content.contains("#[test]").then_some((path, content))
        })
        .collect()
}

#[test]
fn test_no_manual_temp_dir_usage() {
    let sources = test_sources();
    assert!(!sources.is_empty(), "No test sources found under crates/");

    let mut violations = Vec::new();
    for (path, content) in &sources {
        if content.contains("std::env::temp_dir()") {
            violations.push(format!(
                "{}: uses std::env::temp_dir() - prefer tempfile::TempDir for RAII cleanup",
                path.display()
            ));
        }
        if content.contains("\"/tmp") {
            violations.push(format!(
                "{}: contains hardcoded /tmp path - prefer tempfile crate",
                path.display()
            ));
        }
        if content.contains("fs::remove_file") && !content.contains("tempfile") {
            violations.push(format!(
                "{}: removes files manually without tempfile - prefer NamedTempFile",
                path.display()
            ));
        }
    }

    assert!(
        violations.is_empty(),
        "Found manual temp file patterns (not panic-safe):\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_tempfile_bindings_retained() {
    let mut violations = Vec::new();

    for (path, content) in test_sources() {
        for (i, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }

            let dropped = trimmed.starts_with("let _ = TempDir::new()")
                || trimmed.starts_with("let _ = tempfile::")
                || trimmed.starts_with("let _ = NamedTempFile");
            let unbound = (trimmed.starts_with("TempDir::new()")
                || trimmed.starts_with("tempfile::tempdir()"))
                && trimmed.ends_with(';');

            if dropped || unbound {
                violations.push(format!(
                    "{}:{}: temp directory dropped immediately - bind it to a named variable",
                    path.display(),
                    i + 1
                ));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "Found tempfile instances not properly retained:\n{}",
        violations.join("\n")
    );
}
