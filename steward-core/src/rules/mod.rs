//! Validation rules and the contract they share.
//!
//! Each rule implements [`Rule`]: borrow a [`Dataset`], return a
//! [`RuleResult`] or a [`RuleError`]. Rules never mutate their input and
//! never read each other's output, so the engine can evaluate them in any
//! order.
//!
//! # Rules
//!
//! - `freshness` - Flag rows whose date value is older than a threshold
//! - `completeness` - Count missing values per required column
//! - `postal_code` - Flag rows whose postal code fails a fixed-length check
//! - `phone_number` - Flag rows whose phone value fails an E.164-like pattern
//!
//! # Null Handling
//!
//! - `freshness` treats nulls as unknown dates, which are never obsolete
//! - `completeness` counts nulls (including absent keys) as missing
//! - `postal_code` and `phone_number` treat nulls as always invalid

mod completeness;
mod freshness;
mod phone;
mod postal_code;

pub use completeness::{ColumnCompleteness, CompletenessRule};
pub use freshness::{FreshnessBucket, FreshnessRule, DEFAULT_THRESHOLD_YEARS};
pub use phone::{PhoneNumberRule, PHONE_PATTERN};
pub use postal_code::{PostalCodeRule, DEFAULT_VALID_LENGTH};

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Dataset;

/// Identifies one of the audit's rule slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    /// Date-age rule.
    Freshness,
    /// Missing-value rule.
    Completeness,
    /// Postal-code format rule.
    PostalCode,
    /// Phone-number format rule.
    PhoneNumber,
}

impl RuleName {
    /// Stable snake_case name for report keys and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::Freshness => "freshness",
            RuleName::Completeness => "completeness",
            RuleName::PostalCode => "postal_code",
            RuleName::PhoneNumber => "phone_number",
        }
    }
}

impl std::fmt::Display for RuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors raised while evaluating a single rule.
///
/// A rule error is fatal for that rule only; the engine records it and
/// continues with the remaining rules.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum RuleError {
    /// The configured column does not exist in the dataset.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound {
        /// Name of the missing column.
        column: String,
    },
}

/// Shared capability implemented by every validation rule.
///
/// The engine iterates boxed rules uniformly; adding a rule means
/// implementing this trait and registering it in the engine's slot list,
/// with no orchestration changes.
pub trait Rule {
    /// Stable rule name used for report keys and logging.
    fn name(&self) -> RuleName;

    /// Evaluate the rule against a dataset, producing per-row verdicts and
    /// aggregate statistics. Must not mutate the dataset.
    fn evaluate(&self, dataset: &Dataset) -> Result<RuleResult, RuleError>;
}

/// Outcome data from a single rule evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleResult {
    /// Per-row violation flags, aligned with dataset row order; `true`
    /// means the row violates the rule. `None` for rules that aggregate
    /// per column rather than per row.
    pub verdict: Option<Vec<bool>>,

    /// Number of violations found: flagged rows, or missing cells for
    /// per-column rules.
    pub violation_count: usize,

    /// Rule-specific aggregate statistics.
    pub stats: RuleStats,
}

impl RuleResult {
    /// Build a per-row result. The violation count is derived from the
    /// verdict so the two cannot disagree.
    pub fn per_row(verdict: Vec<bool>, stats: RuleStats) -> Self {
        let violation_count = verdict.iter().filter(|flagged| **flagged).count();
        Self {
            verdict: Some(verdict),
            violation_count,
            stats,
        }
    }

    /// Build a per-column result with no verdict array.
    pub fn per_column(violation_count: usize, stats: RuleStats) -> Self {
        Self {
            verdict: None,
            violation_count,
            stats,
        }
    }
}

/// Rule-specific statistics attached to a [`RuleResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleStats {
    /// Freshness breakdown.
    Freshness {
        /// Rows whose date value could not be parsed. Unknown dates are
        /// never counted obsolete; this tally keeps them visible.
        unparsable_rows: usize,
        /// Frequency of each (obsolete, parsed date) pair, most common
        /// first. Unparsable rows do not appear here.
        buckets: Vec<FreshnessBucket>,
    },

    /// Per-column missing-value breakdown.
    Completeness {
        /// Column name to completeness figures.
        columns: BTreeMap<String, ColumnCompleteness>,
    },

    /// Frequency of invalid postal-code values, most common first.
    PostalCode {
        /// Distinct invalid values with row counts; nulls are counted in
        /// the violation total but not listed here.
        invalid_values: Vec<ValueCount>,
    },

    /// Frequency of invalid phone-number values, most common first.
    PhoneNumber {
        /// Distinct invalid values with row counts; nulls are counted in
        /// the violation total but not listed here.
        invalid_values: Vec<ValueCount>,
    },
}

/// A distinct value and how many rows carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    /// The value's textual representation.
    pub value: String,
    /// Number of rows with this value.
    pub rows: usize,
}

/// Tally distinct values into a frequency table sorted by count
/// descending, then value ascending for a deterministic order.
pub(crate) fn frequency_table<I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut table: Vec<ValueCount> = counts
        .into_iter()
        .map(|(value, rows)| ValueCount { value, rows })
        .collect();
    table.sort_by(|a, b| b.rows.cmp(&a.rows).then_with(|| a.value.cmp(&b.value)));
    table
}
