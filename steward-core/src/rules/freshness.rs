//! Freshness rule: flags rows whose date value is older than a threshold.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::debug;

use crate::dataset::{Dataset, Value};
use crate::rules::{Rule, RuleError, RuleName, RuleResult, RuleStats};

/// Default obsolescence threshold in years.
pub const DEFAULT_THRESHOLD_YEARS: u32 = 2;

/// Days per threshold year. Calendar years are not normalized; the age
/// cutoff is exactly `threshold_years * 365` days.
const DAYS_PER_YEAR: i64 = 365;

/// Text date formats accepted, tried in order. Time-of-day components are
/// parsed and discarded; slash dates are read month-first.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d",
    "%m/%d/%Y",
];

/// One (obsolete, date) group in the freshness breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FreshnessBucket {
    /// Whether rows in this group exceeded the age threshold.
    pub obsolete: bool,
    /// The parsed date shared by the group.
    pub date: NaiveDate,
    /// Number of rows in the group.
    pub rows: usize,
}

/// Flags rows whose date is more than `threshold_years * 365` days before
/// the rule's reference date.
///
/// Values that cannot be parsed as dates are *unknown*: they are never
/// counted obsolete, and are tallied separately in the result's
/// `unparsable_rows` so they stay visible as a quality signal.
#[derive(Debug, Clone)]
pub struct FreshnessRule {
    date_column: String,
    threshold_years: u32,
    today: NaiveDate,
}

impl FreshnessRule {
    /// Create a rule evaluating against the current UTC date.
    pub fn new(date_column: impl Into<String>, threshold_years: u32) -> Self {
        Self::as_of(date_column, threshold_years, Utc::now().date_naive())
    }

    /// Create a rule with a pinned reference date.
    ///
    /// The engine captures "today" once per run and shares it, so every
    /// row in a run ages against the same date; tests pin it to make the
    /// threshold boundary exact.
    pub fn as_of(
        date_column: impl Into<String>,
        threshold_years: u32,
        today: NaiveDate,
    ) -> Self {
        Self {
            date_column: date_column.into(),
            threshold_years,
            today,
        }
    }

    fn max_age_days(&self) -> i64 {
        i64::from(self.threshold_years) * DAYS_PER_YEAR
    }
}

impl Rule for FreshnessRule {
    fn name(&self) -> RuleName {
        RuleName::Freshness
    }

    fn evaluate(&self, dataset: &Dataset) -> Result<RuleResult, RuleError> {
        let values = dataset.column_values(&self.date_column).ok_or_else(|| {
            RuleError::ColumnNotFound {
                column: self.date_column.clone(),
            }
        })?;

        let max_age_days = self.max_age_days();
        let mut verdict = Vec::with_capacity(dataset.row_count());
        let mut parsed_dates: Vec<Option<NaiveDate>> = Vec::with_capacity(dataset.row_count());

        for value in values {
            let parsed = parse_date(value);
            let obsolete = parsed
                .map(|date| (self.today - date).num_days() > max_age_days)
                .unwrap_or(false);
            verdict.push(obsolete);
            parsed_dates.push(parsed);
        }

        let unparsable_rows = parsed_dates.iter().filter(|date| date.is_none()).count();
        let buckets = bucket_by_date(&verdict, &parsed_dates);

        debug!(
            column = %self.date_column,
            threshold_years = self.threshold_years,
            unparsable_rows,
            "evaluated freshness"
        );

        Ok(RuleResult::per_row(
            verdict,
            RuleStats::Freshness {
                unparsable_rows,
                buckets,
            },
        ))
    }
}

/// Parse a cell as a calendar date, or `None` for the unknown-date
/// sentinel (nulls, numbers, and text in no recognized format).
fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::Text(text) => {
            let trimmed = text.trim();
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        }
        Value::Number(_) | Value::Null => None,
    }
}

/// Tally (obsolete, date) pairs for parsed rows, most common first; ties
/// break on date for a deterministic order.
fn bucket_by_date(verdict: &[bool], parsed: &[Option<NaiveDate>]) -> Vec<FreshnessBucket> {
    let mut counts: HashMap<(bool, NaiveDate), usize> = HashMap::new();
    for (flagged, date) in verdict.iter().zip(parsed) {
        if let Some(date) = date {
            *counts.entry((*flagged, *date)).or_insert(0) += 1;
        }
    }

    let mut buckets: Vec<FreshnessBucket> = counts
        .into_iter()
        .map(|((obsolete, date), rows)| FreshnessBucket {
            obsolete,
            date,
            rows,
        })
        .collect();
    buckets.sort_by(|a, b| b.rows.cmp(&a.rows).then_with(|| a.date.cmp(&b.date)));
    buckets
}
