//! End-to-end audit scenarios across the full rule set.

use chrono::NaiveDate;
use steward_core::{
    AuditConfig, Dataset, Row, RuleName, RuleStats, Value, ValidationEngine,
};

fn pinned_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

/// Four customers: one clean, one stale with bad formats, one with
/// unparsable freshness data and nulls, one fresh-unknown but well formed.
fn customers() -> Dataset {
    Dataset::from_rows(vec![
        Row::from_pairs([
            ("name", Value::text("Alice")),
            ("email", Value::text("alice@example.com")),
            ("last_purchase", Value::text("2026-01-10")),
            ("postal", Value::text("75001")),
            ("phone", Value::text("+14155552671")),
        ]),
        Row::from_pairs([
            ("name", Value::text("Bob")),
            ("email", Value::Null),
            ("last_purchase", Value::text("2019-03-02")),
            ("postal", Value::text("750")),
            ("phone", Value::text("0014155552671")),
        ]),
        Row::from_pairs([
            ("name", Value::Null),
            ("email", Value::text("carol@example.com")),
            ("last_purchase", Value::text("soon")),
            ("postal", Value::Null),
            ("phone", Value::Null),
        ]),
        Row::from_pairs([
            ("name", Value::text("Dave")),
            ("email", Value::Null),
            ("last_purchase", Value::Null),
            ("postal", Value::text("13006")),
            ("phone", Value::text("+33122334455")),
        ]),
    ])
}

fn full_config() -> AuditConfig {
    AuditConfig::new()
        .date_column("last_purchase")
        .postal_column("postal")
        .phone_column("phone")
        .required_columns(["email", "name"])
}

#[test]
fn test_full_audit_counts() {
    let report = ValidationEngine::run_at(&customers(), &full_config(), pinned_today());

    assert_eq!(report.row_count, 4);
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.failed, 0);

    assert_eq!(report.get(RuleName::Freshness).unwrap().violation_count(), 1);
    assert_eq!(report.get(RuleName::Completeness).unwrap().violation_count(), 3);
    assert_eq!(report.get(RuleName::PostalCode).unwrap().violation_count(), 2);
    assert_eq!(report.get(RuleName::PhoneNumber).unwrap().violation_count(), 2);
    assert_eq!(report.total_violations(), 8);
}

#[test]
fn test_verdict_counts_agree_for_every_rule() {
    let report = ValidationEngine::run_at(&customers(), &full_config(), pinned_today());

    for execution in &report.results {
        let result = execution.result.as_ref().unwrap();
        if let Some(verdict) = &result.verdict {
            assert_eq!(verdict.len(), report.row_count, "{}", execution.rule);
            let flagged = verdict.iter().filter(|flag| **flag).count();
            assert_eq!(flagged, result.violation_count, "{}", execution.rule);
        }
    }
}

#[test]
fn test_postal_code_scenario() {
    let dataset = Dataset::from_rows(vec![
        Row::from_pairs([("postal", Value::text("75001"))]),
        Row::from_pairs([("postal", Value::text("750"))]),
        Row::from_pairs([("postal", Value::Null)]),
    ]);
    let config = AuditConfig::new().postal_column("postal");
    let report = ValidationEngine::run_at(&dataset, &config, pinned_today());

    let postal = report.get(RuleName::PostalCode).unwrap();
    assert_eq!(postal.violation_count(), 2);
    assert_eq!(
        postal.result.as_ref().unwrap().verdict.as_deref(),
        Some(&[false, true, true][..])
    );
    assert_eq!(postal.violations.len(), 2);
}

#[test]
fn test_phone_number_scenarios() {
    let dataset = Dataset::from_rows(vec![
        Row::from_pairs([("phone", Value::text("+14155552671"))]),
        Row::from_pairs([("phone", Value::text("0014155552671"))]),
        Row::from_pairs([("phone", Value::text(""))]),
        Row::from_pairs([("phone", Value::Null)]),
        Row::from_pairs([("phone", Value::text("+1415555267112345"))]),
    ]);
    let config = AuditConfig::new().phone_column("phone");
    let report = ValidationEngine::run_at(&dataset, &config, pinned_today());

    let phone = report.get(RuleName::PhoneNumber).unwrap();
    assert_eq!(
        phone.result.as_ref().unwrap().verdict.as_deref(),
        Some(&[false, true, true, true, true][..])
    );
    assert_eq!(phone.violation_count(), 4);
}

#[test]
fn test_freshness_boundary_dates() {
    let today = pinned_today();
    let threshold_days = 2 * 365;
    let dataset = Dataset::from_rows(vec![
        Row::from_pairs([(
            "last_purchase",
            Value::Date(today - chrono::Duration::days(threshold_days)),
        )]),
        Row::from_pairs([(
            "last_purchase",
            Value::Date(today - chrono::Duration::days(threshold_days + 1)),
        )]),
    ]);
    let config = AuditConfig::new().date_column("last_purchase");
    let report = ValidationEngine::run_at(&dataset, &config, today);

    let freshness = report.get(RuleName::Freshness).unwrap();
    assert_eq!(
        freshness.result.as_ref().unwrap().verdict.as_deref(),
        Some(&[false, true][..])
    );
}

#[test]
fn test_unparsable_dates_surface_in_stats() {
    let report = ValidationEngine::run_at(&customers(), &full_config(), pinned_today());

    let freshness = report.get(RuleName::Freshness).unwrap();
    match &freshness.result.as_ref().unwrap().stats {
        RuleStats::Freshness {
            unparsable_rows,
            buckets,
        } => {
            assert_eq!(*unparsable_rows, 2);
            // Only the two parsed dates appear in the breakdown.
            assert_eq!(buckets.iter().map(|bucket| bucket.rows).sum::<usize>(), 2);
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let dataset = customers();
    let config = full_config();
    let today = pinned_today();

    let first = ValidationEngine::run_at(&dataset, &config, today);
    let second = ValidationEngine::run_at(&dataset, &config, today);

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_misnamed_column_does_not_abort_the_run() {
    let config = AuditConfig::new()
        .date_column("last_purchase")
        .postal_column("zip_code")
        .phone_column("phone");
    let report = ValidationEngine::run_at(&customers(), &config, pinned_today());

    assert_eq!(report.failed, 1);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.skipped, 1);
    assert!(report.get(RuleName::PostalCode).unwrap().status.is_failure());
    assert!(report.get(RuleName::Freshness).unwrap().status.is_success());
    assert!(report.get(RuleName::PhoneNumber).unwrap().status.is_success());
}

#[test]
fn test_empty_dataset_is_all_zeroes() {
    let columns = vec![
        "last_purchase".to_string(),
        "postal".to_string(),
        "phone".to_string(),
        "email".to_string(),
        "name".to_string(),
    ];
    let dataset = Dataset::new(columns, vec![]);
    let report = ValidationEngine::run_at(&dataset, &full_config(), pinned_today());

    assert_eq!(report.row_count, 0);
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.total_violations(), 0);

    let completeness = report.get(RuleName::Completeness).unwrap();
    match &completeness.result.as_ref().unwrap().stats {
        RuleStats::Completeness { columns } => {
            for stats in columns.values() {
                assert_eq!(stats.missing_count, 0);
                assert_eq!(stats.missing_percentage, 0.0);
            }
        }
        other => panic!("unexpected stats: {:?}", other),
    }
}

#[test]
fn test_report_serialization_shape() {
    let report = ValidationEngine::run_at(&customers(), &full_config(), pinned_today());
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["row_count"], 4);
    assert_eq!(json["results"][0]["rule"], "freshness");
    assert_eq!(json["results"][0]["status"]["outcome"], "succeeded");
    assert_eq!(json["results"][0]["result"]["stats"]["rule"], "freshness");
    assert_eq!(json["results"][0]["result"]["stats"]["unparsable_rows"], 2);

    // Violating rows serialize as plain column-to-value objects.
    assert_eq!(json["results"][2]["rule"], "postal_code");
    assert_eq!(json["results"][2]["violations"][0]["postal"], "750");
    assert_eq!(json["results"][2]["violations"][0]["email"], serde_json::Value::Null);
}
