//! # Steward Core
//!
//! Rule-evaluation engine for tabular data-quality audits: freshness,
//! completeness, postal-code format, and phone-number format rules over an
//! in-memory [`Dataset`], aggregated into a per-rule [`Report`].
//!
//! The engine is pure and stateless. Rules borrow the dataset, never mutate
//! it, and never read each other's output; a rule that cannot evaluate
//! (for example because its column is missing) fails alone while the
//! remaining rules still run.
//!
//! # Example
//!
//! ```
//! use steward_core::{AuditConfig, Dataset, Row, RuleName, ValidationEngine, Value};
//!
//! let dataset = Dataset::from_rows(vec![
//!     Row::from_pairs([("postal", Value::text("75001"))]),
//!     Row::from_pairs([("postal", Value::text("750"))]),
//!     Row::from_pairs([("postal", Value::Null)]),
//! ]);
//!
//! let config = AuditConfig::new().postal_column("postal");
//! let report = ValidationEngine::run(&dataset, &config);
//!
//! let postal = report.get(RuleName::PostalCode).unwrap();
//! assert_eq!(postal.violation_count(), 2);
//! ```

pub mod dataset;
pub mod engine;
pub mod report;
pub mod rules;

// Re-export commonly used types
pub use dataset::{Dataset, Row, Value};
pub use engine::{AuditConfig, ValidationEngine};
pub use report::{Advisory, Report, RuleExecution, RuleStatus};
pub use rules::{
    ColumnCompleteness, CompletenessRule, FreshnessBucket, FreshnessRule, PhoneNumberRule,
    PostalCodeRule, Rule, RuleError, RuleName, RuleResult, RuleStats, ValueCount,
    DEFAULT_THRESHOLD_YEARS, DEFAULT_VALID_LENGTH, PHONE_PATTERN,
};
