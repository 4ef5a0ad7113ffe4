//! Stateless audit engine: builds the configured rule set and runs it.

use std::time::Instant;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::Dataset;
use crate::report::{Advisory, Report, RuleExecution};
use crate::rules::{
    CompletenessRule, FreshnessRule, PhoneNumberRule, PostalCodeRule, Rule, RuleName,
    DEFAULT_THRESHOLD_YEARS, DEFAULT_VALID_LENGTH,
};

/// Column selections and rule parameters for one audit run.
///
/// Unset columns skip their rule slot with an advisory rather than
/// failing the run. Defaults follow the rule contracts: a 2-year
/// freshness threshold and 5-character postal codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Column holding the record date, for the freshness rule.
    #[serde(default)]
    pub date_column: Option<String>,

    /// Column holding postal codes.
    #[serde(default)]
    pub postal_column: Option<String>,

    /// Column holding phone numbers.
    #[serde(default)]
    pub phone_column: Option<String>,

    /// Columns that must be populated, for the completeness rule.
    #[serde(default)]
    pub required_columns: Vec<String>,

    /// Freshness cutoff in years.
    #[serde(default = "default_threshold_years")]
    pub threshold_years: u32,

    /// Expected postal-code length in characters.
    #[serde(default = "default_valid_length")]
    pub valid_length: usize,
}

fn default_threshold_years() -> u32 {
    DEFAULT_THRESHOLD_YEARS
}

fn default_valid_length() -> usize {
    DEFAULT_VALID_LENGTH
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            date_column: None,
            postal_column: None,
            phone_column: None,
            required_columns: Vec::new(),
            threshold_years: DEFAULT_THRESHOLD_YEARS,
            valid_length: DEFAULT_VALID_LENGTH,
        }
    }
}

impl AuditConfig {
    /// Create a config with no columns selected and default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the date column for the freshness rule.
    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    /// Select the postal-code column.
    pub fn postal_column(mut self, column: impl Into<String>) -> Self {
        self.postal_column = Some(column.into());
        self
    }

    /// Select the phone-number column.
    pub fn phone_column(mut self, column: impl Into<String>) -> Self {
        self.phone_column = Some(column.into());
        self
    }

    /// Select the required columns for the completeness rule.
    pub fn required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Override the freshness threshold in years.
    pub fn threshold_years(mut self, years: u32) -> Self {
        self.threshold_years = years;
        self
    }

    /// Override the expected postal-code length.
    pub fn valid_length(mut self, length: usize) -> Self {
        self.valid_length = length;
        self
    }
}

/// One slot in the engine's fixed rule order.
enum RuleSlot {
    Configured(Box<dyn Rule>),
    Skipped { rule: RuleName, advisory: Advisory },
}

impl RuleSlot {
    fn skipped(rule: RuleName, advisory: Advisory) -> Self {
        RuleSlot::Skipped { rule, advisory }
    }
}

/// The audit engine.
///
/// Stateless and reentrant: each run borrows a dataset and a config, and
/// every output is newly allocated. Nothing is carried between runs.
#[derive(Debug, Clone, Copy)]
pub struct ValidationEngine;

impl ValidationEngine {
    /// Run the configured rules against a dataset, using the current UTC
    /// date as the freshness reference.
    pub fn run(dataset: &Dataset, config: &AuditConfig) -> Report {
        Self::run_at(dataset, config, Utc::now().date_naive())
    }

    /// Run with a pinned reference date.
    ///
    /// Output depends only on the arguments, so repeated calls yield
    /// identical reports.
    pub fn run_at(dataset: &Dataset, config: &AuditConfig, today: NaiveDate) -> Report {
        let started = Instant::now();
        let mut report = Report::new(dataset.row_count());

        for slot in Self::rule_slots(config, today) {
            match slot {
                RuleSlot::Skipped { rule, advisory } => {
                    debug!(rule = %rule, advisory = %advisory, "rule skipped");
                    report.add(RuleExecution::skipped(rule, advisory));
                }
                RuleSlot::Configured(rule) => {
                    let name = rule.name();
                    let rule_started = Instant::now();
                    match rule.evaluate(dataset) {
                        Ok(result) => {
                            let violations = result
                                .verdict
                                .as_deref()
                                .map(|verdict| dataset.rows_matching(verdict))
                                .unwrap_or_default();
                            info!(
                                rule = %name,
                                violations = result.violation_count,
                                duration_ms = rule_started.elapsed().as_millis() as u64,
                                "rule evaluated"
                            );
                            report.add(RuleExecution::succeeded(name, result, violations));
                        }
                        Err(error) => {
                            warn!(rule = %name, error = %error, "rule failed");
                            report.add(RuleExecution::failed(name, error));
                        }
                    }
                }
            }
        }

        info!(
            rows = report.row_count,
            succeeded = report.succeeded,
            skipped = report.skipped,
            failed = report.failed,
            violations = report.total_violations(),
            duration_ms = started.elapsed().as_millis() as u64,
            "audit completed"
        );
        report
    }

    /// Build the rule slots in their fixed order: freshness,
    /// completeness, postal code, phone number.
    fn rule_slots(config: &AuditConfig, today: NaiveDate) -> Vec<RuleSlot> {
        let mut slots = Vec::with_capacity(4);

        slots.push(match &config.date_column {
            Some(column) => RuleSlot::Configured(Box::new(FreshnessRule::as_of(
                column.clone(),
                config.threshold_years,
                today,
            ))),
            None => RuleSlot::skipped(RuleName::Freshness, Advisory::ColumnNotSelected),
        });

        slots.push(if config.required_columns.is_empty() {
            RuleSlot::skipped(RuleName::Completeness, Advisory::NoColumnsSelected)
        } else {
            RuleSlot::Configured(Box::new(CompletenessRule::new(
                config.required_columns.clone(),
            )))
        });

        slots.push(match &config.postal_column {
            Some(column) => RuleSlot::Configured(Box::new(PostalCodeRule::new(
                column.clone(),
                config.valid_length,
            ))),
            None => RuleSlot::skipped(RuleName::PostalCode, Advisory::ColumnNotSelected),
        });

        slots.push(match &config.phone_column {
            Some(column) => {
                RuleSlot::Configured(Box::new(PhoneNumberRule::new(column.clone())))
            }
            None => RuleSlot::skipped(RuleName::PhoneNumber, Advisory::ColumnNotSelected),
        });

        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Row, Value};
    use crate::report::RuleStatus;

    fn sample_data() -> Dataset {
        Dataset::from_rows(vec![
            Row::from_pairs([
                ("last_purchase", Value::text("2024-01-15")),
                ("postal", Value::text("75001")),
                ("phone", Value::text("+14155552671")),
            ]),
            Row::from_pairs([
                ("last_purchase", Value::text("2019-03-02")),
                ("postal", Value::text("750")),
                ("phone", Value::Null),
            ]),
        ])
    }

    fn pinned_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_default_config_skips_every_slot() {
        let report = ValidationEngine::run_at(&sample_data(), &AuditConfig::new(), pinned_today());

        assert_eq!(report.skipped, 4);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 0);

        let rules: Vec<RuleName> = report.results.iter().map(|execution| execution.rule).collect();
        assert_eq!(
            rules,
            vec![
                RuleName::Freshness,
                RuleName::Completeness,
                RuleName::PostalCode,
                RuleName::PhoneNumber,
            ]
        );
        assert_eq!(
            report.get(RuleName::Completeness).unwrap().status,
            RuleStatus::Skipped {
                advisory: Advisory::NoColumnsSelected,
            }
        );
        assert_eq!(
            report.get(RuleName::Freshness).unwrap().status,
            RuleStatus::Skipped {
                advisory: Advisory::ColumnNotSelected,
            }
        );
    }

    #[test]
    fn test_full_config_runs_every_slot() {
        let config = AuditConfig::new()
            .date_column("last_purchase")
            .postal_column("postal")
            .phone_column("phone")
            .required_columns(["postal", "phone"]);
        let report = ValidationEngine::run_at(&sample_data(), &config, pinned_today());

        assert_eq!(report.succeeded, 4);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.failed, 0);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_misnamed_column_fails_only_its_slot() {
        let config = AuditConfig::new()
            .postal_column("zip_code")
            .phone_column("phone");
        let report = ValidationEngine::run_at(&sample_data(), &config, pinned_today());

        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 1);
        assert!(report.has_failures());
        assert!(report.get(RuleName::PostalCode).unwrap().status.is_failure());
        assert!(report.get(RuleName::PhoneNumber).unwrap().status.is_success());
    }

    #[test]
    fn test_violating_rows_are_extracted() {
        let config = AuditConfig::new().postal_column("postal");
        let report = ValidationEngine::run_at(&sample_data(), &config, pinned_today());

        let postal = report.get(RuleName::PostalCode).unwrap();
        assert_eq!(postal.violations.len(), 1);
        assert_eq!(postal.violations[0].get("postal"), &Value::text("750"));
    }

    #[test]
    fn test_completeness_has_no_violation_rows() {
        let config = AuditConfig::new().required_columns(["phone"]);
        let report = ValidationEngine::run_at(&sample_data(), &config, pinned_today());

        let completeness = report.get(RuleName::Completeness).unwrap();
        assert!(completeness.status.is_success());
        assert_eq!(completeness.violation_count(), 1);
        assert!(completeness.violations.is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = AuditConfig::new();
        assert_eq!(config.threshold_years, 2);
        assert_eq!(config.valid_length, 5);
        assert!(config.date_column.is_none());
        assert!(config.required_columns.is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AuditConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AuditConfig::default());

        let config: AuditConfig =
            serde_json::from_str(r#"{"postal_column": "zip", "valid_length": 4}"#).unwrap();
        assert_eq!(config.postal_column.as_deref(), Some("zip"));
        assert_eq!(config.valid_length, 4);
        assert_eq!(config.threshold_years, 2);
    }
}
