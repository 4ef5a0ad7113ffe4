//! Tabular dataset model shared by all validation rules.
//!
//! A [`Dataset`] is an ordered sequence of [`Row`]s plus an ordered column
//! list. Rules borrow datasets immutably and correlate per-row verdicts by
//! position, so row order is stable by construction.
//!
//! # Null Handling
//!
//! Absent keys and explicit nulls are equivalent: [`Row::get`] returns
//! [`Value::Null`] for both. This keeps validation semantics well defined
//! for sparse rows without padding every row to the full column set.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// A single cell value.
///
/// Values are loosely typed; no schema is enforced. Serialization is the
/// natural JSON form: `null`, string, number, or ISO date string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value marker.
    Null,
    /// Free-form text.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Convenience constructor for text values.
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Returns true for the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The value's textual representation, or `None` for null.
    ///
    /// Numbers use Rust's shortest `f64` form, so integral values render
    /// without a fractional part (`75001`, not `75001.0`). Dates render
    /// as ISO `YYYY-MM-DD`.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Date(d) => Some(d.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d),
        }
    }
}

/// A single dataset row: column name to value.
///
/// Backed by an ordered map so serialized rows are byte-stable across
/// identical runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from (column, value) pairs.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            values: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Set a column value, replacing any existing one.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        self.values.insert(column.into(), value);
    }

    /// Get a column value; absent keys read as [`Value::Null`].
    pub fn get(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&Value::Null)
    }

    /// Column names present in this row.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// An in-memory table: ordered column list plus rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Create a dataset from an explicit column list and rows.
    ///
    /// The column list is authoritative: a loader that read a header-only
    /// file produces zero rows but keeps its columns addressable.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create an empty dataset with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from rows alone, deriving the column list in
    /// first-seen order.
    ///
    /// Sparse rows are fine: absent keys read as [`Value::Null`], so every
    /// column behaves as if padded to the full row count.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for name in row.columns() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// All rows in order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Iterate a column's values in row order, or `None` if the column
    /// does not exist.
    pub fn column_values<'a>(
        &'a self,
        name: &'a str,
    ) -> Option<impl Iterator<Item = &'a Value>> {
        if !self.has_column(name) {
            return None;
        }
        Some(self.rows.iter().map(move |row| row.get(name)))
    }

    /// Clone the subset of rows whose verdict flag is set.
    ///
    /// Positions beyond the verdict's length are treated as not flagged.
    pub fn rows_matching(&self, verdict: &[bool]) -> Vec<Row> {
        self.rows
            .iter()
            .zip(verdict.iter().copied())
            .filter_map(|(row, flagged)| flagged.then(|| row.clone()))
            .collect()
    }
}
