//! Postal-code rule: fixed-length check on the value's text form.

use tracing::debug;

use crate::dataset::Dataset;
use crate::rules::{frequency_table, Rule, RuleError, RuleName, RuleResult, RuleStats};

/// Default expected postal-code length in characters.
pub const DEFAULT_VALID_LENGTH: usize = 5;

/// Flags rows whose postal code is null or whose textual representation
/// is not exactly `valid_length` characters long.
///
/// Null is always invalid: a missing code cannot be validated. Length is
/// counted in characters, not bytes.
#[derive(Debug, Clone)]
pub struct PostalCodeRule {
    postal_column: String,
    valid_length: usize,
}

impl PostalCodeRule {
    /// Create a rule for the given column and expected length.
    pub fn new(postal_column: impl Into<String>, valid_length: usize) -> Self {
        Self {
            postal_column: postal_column.into(),
            valid_length,
        }
    }
}

impl Rule for PostalCodeRule {
    fn name(&self) -> RuleName {
        RuleName::PostalCode
    }

    fn evaluate(&self, dataset: &Dataset) -> Result<RuleResult, RuleError> {
        let values = dataset.column_values(&self.postal_column).ok_or_else(|| {
            RuleError::ColumnNotFound {
                column: self.postal_column.clone(),
            }
        })?;

        let mut verdict = Vec::with_capacity(dataset.row_count());
        let mut invalid_texts = Vec::new();

        for value in values {
            match value.to_text() {
                Some(text) => {
                    let invalid = text.chars().count() != self.valid_length;
                    if invalid {
                        invalid_texts.push(text);
                    }
                    verdict.push(invalid);
                }
                // Nulls count as violations but stay out of the table.
                None => verdict.push(true),
            }
        }

        debug!(
            column = %self.postal_column,
            valid_length = self.valid_length,
            "evaluated postal code format"
        );

        Ok(RuleResult::per_row(
            verdict,
            RuleStats::PostalCode {
                invalid_values: frequency_table(invalid_texts),
            },
        ))
    }
}
