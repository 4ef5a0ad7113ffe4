//! Audit report types.
//!
//! A [`Report`] holds one [`RuleExecution`] per rule slot in slot order,
//! with tallied outcome counters. Per-rule failures are isolated: one
//! slot's error never prevents the other slots from being recorded.

use std::fmt;

use serde::Serialize;

use crate::dataset::Row;
use crate::rules::{RuleError, RuleName, RuleResult};

/// Why a rule slot was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// The rule had no column selected.
    ColumnNotSelected,
    /// Completeness had no required columns selected.
    NoColumnsSelected,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::ColumnNotSelected => write!(f, "no column selected"),
            Advisory::NoColumnsSelected => write!(f, "no required columns selected"),
        }
    }
}

/// Outcome of one rule slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleStatus {
    /// The rule ran and produced a result.
    Succeeded,

    /// The rule was not configured to run.
    Skipped {
        /// Why the slot was skipped.
        advisory: Advisory,
    },

    /// The rule was configured but could not evaluate.
    Failed {
        /// What went wrong.
        error: RuleError,
    },
}

impl RuleStatus {
    /// Returns true if the rule ran and produced a result.
    pub fn is_success(&self) -> bool {
        matches!(self, RuleStatus::Succeeded)
    }

    /// Returns true if the rule was configured but could not evaluate.
    pub fn is_failure(&self) -> bool {
        matches!(self, RuleStatus::Failed { .. })
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Succeeded => write!(f, "succeeded"),
            RuleStatus::Skipped { .. } => write!(f, "skipped"),
            RuleStatus::Failed { .. } => write!(f, "failed"),
        }
    }
}

/// One rule slot's full record in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleExecution {
    /// Which rule this record belongs to.
    pub rule: RuleName,

    /// How the slot ended.
    pub status: RuleStatus,

    /// The rule's result, present only on success.
    pub result: Option<RuleResult>,

    /// Rows that violated the rule, cloned from the dataset for caller
    /// display. Empty for skipped and failed slots, and for per-column
    /// rules that produce no verdict array.
    pub violations: Vec<Row>,
}

impl RuleExecution {
    /// Record a successful evaluation.
    pub fn succeeded(rule: RuleName, result: RuleResult, violations: Vec<Row>) -> Self {
        Self {
            rule,
            status: RuleStatus::Succeeded,
            result: Some(result),
            violations,
        }
    }

    /// Record a skipped slot.
    pub fn skipped(rule: RuleName, advisory: Advisory) -> Self {
        Self {
            rule,
            status: RuleStatus::Skipped { advisory },
            result: None,
            violations: Vec::new(),
        }
    }

    /// Record a failed evaluation.
    pub fn failed(rule: RuleName, error: RuleError) -> Self {
        Self {
            rule,
            status: RuleStatus::Failed { error },
            result: None,
            violations: Vec::new(),
        }
    }

    /// Violation count, 0 when no result is present.
    pub fn violation_count(&self) -> usize {
        self.result
            .as_ref()
            .map(|result| result.violation_count)
            .unwrap_or(0)
    }
}

/// Aggregated output of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Report {
    /// Number of rows in the audited dataset.
    pub row_count: usize,

    /// Rule slots that ran and produced results.
    pub succeeded: usize,

    /// Rule slots skipped as unconfigured.
    pub skipped: usize,

    /// Rule slots that were configured but could not evaluate.
    pub failed: usize,

    /// Per-slot records, in slot order.
    pub results: Vec<RuleExecution>,
}

impl Report {
    /// Create an empty report for a dataset of the given size.
    pub fn new(row_count: usize) -> Self {
        Self {
            row_count,
            ..Default::default()
        }
    }

    /// Add an execution record, updating the tallies.
    pub fn add(&mut self, execution: RuleExecution) {
        match execution.status {
            RuleStatus::Succeeded => self.succeeded += 1,
            RuleStatus::Skipped { .. } => self.skipped += 1,
            RuleStatus::Failed { .. } => self.failed += 1,
        }
        self.results.push(execution);
    }

    /// Look up a rule's record.
    pub fn get(&self, rule: RuleName) -> Option<&RuleExecution> {
        self.results.iter().find(|execution| execution.rule == rule)
    }

    /// Returns true if any configured rule could not evaluate.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Total violations across all successful rules.
    pub fn total_violations(&self) -> usize {
        self.results.iter().map(RuleExecution::violation_count).sum()
    }
}
