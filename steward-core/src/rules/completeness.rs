//! Completeness rule: per-column missing-value counts and percentages.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::dataset::Dataset;
use crate::rules::{Rule, RuleError, RuleName, RuleResult, RuleStats};

/// Missing-value figures for a single required column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCompleteness {
    /// Rows where the value is null or the key is absent.
    pub missing_count: usize,
    /// `missing_count / row_count * 100`, 0 for an empty dataset.
    pub missing_percentage: f64,
}

/// Reports missing values for each required column.
///
/// This rule aggregates per column rather than per row, so its result has
/// no verdict array; `violation_count` is the total number of missing
/// cells across the required columns.
#[derive(Debug, Clone)]
pub struct CompletenessRule {
    required_columns: Vec<String>,
}

impl CompletenessRule {
    /// Create a rule over the given required columns. Duplicates are
    /// dropped, keeping first-seen order.
    ///
    /// The engine never constructs this rule with an empty selection; it
    /// skips the slot with a `NoColumnsSelected` advisory instead.
    pub fn new<I, S>(required_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        for column in required_columns {
            let column = column.into();
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        Self {
            required_columns: columns,
        }
    }
}

impl Rule for CompletenessRule {
    fn name(&self) -> RuleName {
        RuleName::Completeness
    }

    fn evaluate(&self, dataset: &Dataset) -> Result<RuleResult, RuleError> {
        let row_count = dataset.row_count();
        let mut columns: BTreeMap<String, ColumnCompleteness> = BTreeMap::new();
        let mut total_missing = 0usize;

        for column in &self.required_columns {
            let values = dataset.column_values(column).ok_or_else(|| {
                RuleError::ColumnNotFound {
                    column: column.clone(),
                }
            })?;
            let missing_count = values.filter(|value| value.is_null()).count();
            let missing_percentage = if row_count > 0 {
                (missing_count as f64 / row_count as f64) * 100.0
            } else {
                0.0
            };
            total_missing += missing_count;
            columns.insert(
                column.clone(),
                ColumnCompleteness {
                    missing_count,
                    missing_percentage,
                },
            );
        }

        debug!(
            columns = self.required_columns.len(),
            missing_cells = total_missing,
            "evaluated completeness"
        );

        Ok(RuleResult::per_column(
            total_missing,
            RuleStats::Completeness { columns },
        ))
    }
}
