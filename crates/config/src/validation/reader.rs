//! Typed field readers over an untyped TOML table.
//!
//! Responsibilities:
//! - Read required and optional fields with type and range checks.
//! - Record every failure as a `FieldViolation` addressed by its dotted path.
//!
//! Does NOT handle:
//! - Which fields a section has (see `sections.rs`).
//!
//! Invariants:
//! - Readers never stop at the first failure; they record and return `None`.
//! - Violation messages name the expected and found types, never the value.

use toml::{Table, Value};

use crate::loader::FieldViolation;

/// Accumulates violations and warnings for one validation run.
#[derive(Debug, Default)]
pub(crate) struct Validator {
    violations: Vec<FieldViolation>,
    warnings: Vec<String>,
}

impl Validator {
    pub fn violation(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    /// Record a non-fatal problem and log it.
    pub fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    #[cfg(test)]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    pub fn into_parts(self) -> (Vec<FieldViolation>, Vec<String>) {
        (self.violations, self.warnings)
    }
}

/// Lower bound enforced on numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Positive,
    NonNegative,
}

/// A table being read, together with its dotted path.
#[derive(Debug, Clone)]
pub(crate) struct Section<'a> {
    path: String,
    table: &'a Table,
}

impl<'a> Section<'a> {
    pub fn root(table: &'a Table) -> Self {
        Self {
            path: String::new(),
            table,
        }
    }

    pub fn new(path: impl Into<String>, table: &'a Table) -> Self {
        Self {
            path: path.into(),
            table,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Dotted path of `key` inside this section.
    pub fn field(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn required(&self, v: &mut Validator, key: &str) -> Option<&'a Value> {
        let value = self.table.get(key);
        if value.is_none() {
            v.violation(self.field(key), "is required");
        }
        value
    }

    pub fn required_str(&self, v: &mut Validator, key: &str) -> Option<String> {
        let value = self.required(v, key)?;
        self.as_str(v, key, value)
    }

    pub fn optional_str(&self, v: &mut Validator, key: &str) -> Option<String> {
        let value = self.table.get(key)?;
        self.as_str(v, key, value)
    }

    fn as_str(&self, v: &mut Validator, key: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) if s.trim().is_empty() => {
                v.violation(self.field(key), "must not be empty");
                None
            }
            Value::String(s) => Some(s.clone()),
            other => {
                v.violation(self.field(key), type_mismatch("a string", other));
                None
            }
        }
    }

    pub fn required_int<T: TryFrom<i64>>(
        &self,
        v: &mut Validator,
        key: &str,
        bound: Bound,
    ) -> Option<T> {
        let value = self.required(v, key)?;
        self.as_int(v, key, value, bound)
    }

    pub fn optional_int<T: TryFrom<i64>>(
        &self,
        v: &mut Validator,
        key: &str,
        bound: Bound,
    ) -> Option<T> {
        let value = self.table.get(key)?;
        self.as_int(v, key, value, bound)
    }

    fn as_int<T: TryFrom<i64>>(
        &self,
        v: &mut Validator,
        key: &str,
        value: &Value,
        bound: Bound,
    ) -> Option<T> {
        let Value::Integer(n) = value else {
            v.violation(self.field(key), type_mismatch("an integer", value));
            return None;
        };
        let in_bound = match bound {
            Bound::Positive => *n > 0,
            Bound::NonNegative => *n >= 0,
        };
        if !in_bound {
            let message = match bound {
                Bound::Positive => "must be a positive integer",
                Bound::NonNegative => "must be a non-negative integer",
            };
            v.violation(self.field(key), message);
            return None;
        }
        match T::try_from(*n) {
            Ok(n) => Some(n),
            Err(_) => {
                v.violation(self.field(key), "is out of range");
                None
            }
        }
    }

    pub fn required_float(&self, v: &mut Validator, key: &str, bound: Bound) -> Option<f64> {
        let value = self.required(v, key)?;
        self.as_float(v, key, value, bound)
    }

    pub fn optional_float(&self, v: &mut Validator, key: &str, bound: Bound) -> Option<f64> {
        let value = self.table.get(key)?;
        self.as_float(v, key, value, bound)
    }

    fn as_float(&self, v: &mut Validator, key: &str, value: &Value, bound: Bound) -> Option<f64> {
        let n = match value {
            Value::Float(f) => *f,
            Value::Integer(i) => *i as f64,
            other => {
                v.violation(self.field(key), type_mismatch("a number", other));
                return None;
            }
        };
        if !n.is_finite() {
            v.violation(self.field(key), "must be a finite number");
            return None;
        }
        let in_bound = match bound {
            Bound::Positive => n > 0.0,
            Bound::NonNegative => n >= 0.0,
        };
        if !in_bound {
            let message = match bound {
                Bound::Positive => "must be greater than zero",
                Bound::NonNegative => "must not be negative",
            };
            v.violation(self.field(key), message);
            return None;
        }
        Some(n)
    }

    /// Optional URL whose scheme must be one of `schemes`.
    pub fn optional_url(&self, v: &mut Validator, key: &str, schemes: &[&str]) -> Option<String> {
        let raw = self.optional_str(v, key)?;
        self.check_url(v, key, raw, schemes)
    }

    /// Required URL whose scheme must be one of `schemes`.
    pub fn required_url(&self, v: &mut Validator, key: &str, schemes: &[&str]) -> Option<String> {
        let raw = self.required_str(v, key)?;
        self.check_url(v, key, raw, schemes)
    }

    fn check_url(
        &self,
        v: &mut Validator,
        key: &str,
        raw: String,
        schemes: &[&str],
    ) -> Option<String> {
        match url::Url::parse(&raw) {
            Ok(parsed) if schemes.contains(&parsed.scheme()) => Some(raw),
            Ok(_) => {
                v.violation(
                    self.field(key),
                    format!("must use one of the schemes: {}", schemes.join(", ")),
                );
                None
            }
            Err(_) => {
                v.violation(self.field(key), "is not a valid URL");
                None
            }
        }
    }

    pub fn optional_table(&self, v: &mut Validator, key: &str) -> Option<Section<'a>> {
        let value = self.table.get(key)?;
        self.as_table(v, key, value)
    }

    pub fn required_table(&self, v: &mut Validator, key: &str) -> Option<Section<'a>> {
        let value = self.required(v, key)?;
        self.as_table(v, key, value)
    }

    fn as_table(&self, v: &mut Validator, key: &str, value: &'a Value) -> Option<Section<'a>> {
        match value {
            Value::Table(table) => Some(Section::new(self.field(key), table)),
            other => {
                v.violation(self.field(key), type_mismatch("a table", other));
                None
            }
        }
    }

    /// Optional array of tables, each yielded with its indexed path.
    ///
    /// Elements that are not tables are recorded as violations and skipped.
    pub fn optional_table_array(&self, v: &mut Validator, key: &str) -> Vec<Section<'a>> {
        let Some(value) = self.table.get(key) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            v.violation(self.field(key), type_mismatch("an array", value));
            return Vec::new();
        };

        let mut sections = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{}[{i}]", self.field(key));
            match item {
                Value::Table(table) => sections.push(Section::new(path, table)),
                other => v.violation(path, type_mismatch("a table", other)),
            }
        }
        sections
    }

    pub fn required_str_array(&self, v: &mut Validator, key: &str) -> Option<Vec<String>> {
        let value = self.required(v, key)?;
        let Value::Array(items) = value else {
            v.violation(self.field(key), type_mismatch("an array", value));
            return None;
        };

        let mut strings = Vec::with_capacity(items.len());
        let mut valid = true;
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => strings.push(s.clone()),
                other => {
                    v.violation(
                        format!("{}[{i}]", self.field(key)),
                        type_mismatch("a string", other),
                    );
                    valid = false;
                }
            }
        }
        valid.then_some(strings)
    }
}

fn type_mismatch(expected: &str, found: &Value) -> String {
    format!("expected {expected}, found {}", found.type_str())
}
