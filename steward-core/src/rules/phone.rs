//! Phone-number rule: E.164-like pattern match.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::dataset::Dataset;
use crate::rules::{frequency_table, Rule, RuleError, RuleName, RuleResult, RuleStats};

/// E.164-like phone pattern: optional leading `+`, a first digit in 1-9,
/// then 1 to 14 more digits (15 digits total at most, 2 at least).
/// Anchored at both ends, so trailing characters after a valid prefix
/// make the value invalid.
pub const PHONE_PATTERN: &str = r"^\+?[1-9]\d{1,14}$";

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("Invalid phone regex"));

/// Flags rows whose phone value is null or does not match
/// [`PHONE_PATTERN`] in full.
#[derive(Debug, Clone)]
pub struct PhoneNumberRule {
    phone_column: String,
}

impl PhoneNumberRule {
    /// Create a rule for the given column.
    pub fn new(phone_column: impl Into<String>) -> Self {
        Self {
            phone_column: phone_column.into(),
        }
    }
}

impl Rule for PhoneNumberRule {
    fn name(&self) -> RuleName {
        RuleName::PhoneNumber
    }

    fn evaluate(&self, dataset: &Dataset) -> Result<RuleResult, RuleError> {
        let values = dataset.column_values(&self.phone_column).ok_or_else(|| {
            RuleError::ColumnNotFound {
                column: self.phone_column.clone(),
            }
        })?;

        let mut verdict = Vec::with_capacity(dataset.row_count());
        let mut invalid_texts = Vec::new();

        for value in values {
            match value.to_text() {
                Some(text) => {
                    let invalid = !PHONE_REGEX.is_match(&text);
                    if invalid {
                        invalid_texts.push(text);
                    }
                    verdict.push(invalid);
                }
                // Nulls count as violations but stay out of the table.
                None => verdict.push(true),
            }
        }

        debug!(column = %self.phone_column, "evaluated phone number format");

        Ok(RuleResult::per_row(
            verdict,
            RuleStats::PhoneNumber {
                invalid_values: frequency_table(invalid_texts),
            },
        ))
    }
}
