//! Terminal and JSON rendering for audit reports.
//!
//! The table renderer prints a per-rule summary followed by detail
//! sections. Reports carry full violating-row subsets; only the display
//! is truncated here.

use steward_core::{Dataset, Report, Row, RuleExecution, RuleName, RuleStats, RuleStatus};

const TABLE_WIDTH: usize = 82;

/// Detail sections list at most this many entries.
const MAX_DETAIL_ROWS: usize = 10;

/// At most this many violating rows are shown per rule.
const MAX_PREVIEW_ROWS: usize = 5;

/// Print the report as pretty JSON.
pub fn print_json(report: &Report) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Print the report as a formatted table with per-rule detail sections.
pub fn print_table(report: &Report) {
    println!("Audit Report");
    println!("{}", "=".repeat(TABLE_WIDTH));
    println!("Rows audited: {}", report.row_count);
    println!();
    println!(
        "{:<16} {:<12} {:<12} {}",
        "RULE", "OUTCOME", "VIOLATIONS", "DETAILS"
    );
    println!("{}", "-".repeat(TABLE_WIDTH));

    for execution in &report.results {
        let violations = match execution.status {
            RuleStatus::Succeeded => execution.violation_count().to_string(),
            _ => "-".to_string(),
        };
        println!(
            "{:<16} {:<12} {:<12} {}",
            execution.rule.as_str(),
            execution.status.to_string(),
            violations,
            truncate(&summary_details(execution), 40),
        );
    }

    println!("{}", "-".repeat(TABLE_WIDTH));
    println!(
        "Summary: {} succeeded, {} skipped, {} failed, {} total violations",
        report.succeeded,
        report.skipped,
        report.failed,
        report.total_violations()
    );

    for execution in &report.results {
        print_rule_details(execution);
    }
}

/// Print the first `rows` rows of a dataset.
pub fn print_preview(dataset: &Dataset, rows: usize) {
    println!("Columns: {}", dataset.columns().join(", "));
    println!("Rows: {}", dataset.row_count());
    for row in dataset.rows().iter().take(rows) {
        println!("  {}", render_row(row));
    }
    if dataset.row_count() > rows {
        println!("  ... and {} more", dataset.row_count() - rows);
    }
}

/// One-line detail for the summary table.
fn summary_details(execution: &RuleExecution) -> String {
    match &execution.status {
        RuleStatus::Skipped { advisory } => advisory.to_string(),
        RuleStatus::Failed { error } => error.to_string(),
        RuleStatus::Succeeded => match &execution.result {
            Some(result) => match &result.stats {
                RuleStats::Freshness {
                    unparsable_rows, ..
                } => format!("{} unparsable date(s)", unparsable_rows),
                RuleStats::Completeness { columns } => {
                    format!("{} column(s) checked", columns.len())
                }
                RuleStats::PostalCode { invalid_values }
                | RuleStats::PhoneNumber { invalid_values } => {
                    format!("{} distinct invalid value(s)", invalid_values.len())
                }
            },
            None => String::new(),
        },
    }
}

fn print_rule_details(execution: &RuleExecution) {
    if let RuleStatus::Failed { error } = &execution.status {
        println!("\n{}", section_title(execution.rule));
        println!("  Error: {}", error);
        return;
    }
    let Some(result) = &execution.result else {
        return;
    };

    match &result.stats {
        RuleStats::Freshness {
            unparsable_rows,
            buckets,
        } => {
            let obsolete: Vec<_> = buckets.iter().filter(|bucket| bucket.obsolete).collect();
            if obsolete.is_empty() && *unparsable_rows == 0 {
                return;
            }
            println!("\n{}", section_title(execution.rule));
            if *unparsable_rows > 0 {
                println!("  Unparsable dates: {} row(s)", unparsable_rows);
            }
            if !obsolete.is_empty() {
                println!("  {:<14} {}", "OBSOLETE DATE", "ROWS");
                for bucket in obsolete.iter().take(MAX_DETAIL_ROWS) {
                    println!("  {:<14} {}", bucket.date.to_string(), bucket.rows);
                }
                if obsolete.len() > MAX_DETAIL_ROWS {
                    println!("  ... and {} more", obsolete.len() - MAX_DETAIL_ROWS);
                }
            }
        }
        RuleStats::Completeness { columns } => {
            if columns.is_empty() {
                return;
            }
            println!("\n{}", section_title(execution.rule));
            println!("  {:<24} {:<10} {}", "COLUMN", "MISSING", "PERCENT");
            for (column, stats) in columns {
                println!(
                    "  {:<24} {:<10} {}",
                    truncate(column, 22),
                    stats.missing_count,
                    format!("{:.1}%", stats.missing_percentage),
                );
            }
        }
        RuleStats::PostalCode { invalid_values } | RuleStats::PhoneNumber { invalid_values } => {
            let total = execution.violation_count();
            if total == 0 {
                return;
            }
            println!("\n{}", section_title(execution.rule));
            println!("  {:<24} {}", "INVALID VALUE", "ROWS");
            for entry in invalid_values.iter().take(MAX_DETAIL_ROWS) {
                println!("  {:<24} {}", truncate(&entry.value, 22), entry.rows);
            }
            if invalid_values.len() > MAX_DETAIL_ROWS {
                println!("  ... and {} more", invalid_values.len() - MAX_DETAIL_ROWS);
            }
            let listed: usize = invalid_values.iter().map(|entry| entry.rows).sum();
            if total > listed {
                println!("  Null values: {} row(s)", total - listed);
            }
        }
    }

    print_violation_preview(&execution.violations);
}

fn print_violation_preview(violations: &[Row]) {
    if violations.is_empty() {
        return;
    }
    println!("  Violating rows ({} total):", violations.len());
    for row in violations.iter().take(MAX_PREVIEW_ROWS) {
        println!("    {}", render_row(row));
    }
    if violations.len() > MAX_PREVIEW_ROWS {
        println!("    ... and {} more", violations.len() - MAX_PREVIEW_ROWS);
    }
}

fn section_title(rule: RuleName) -> &'static str {
    match rule {
        RuleName::Freshness => "Freshness",
        RuleName::Completeness => "Completeness",
        RuleName::PostalCode => "Postal codes",
        RuleName::PhoneNumber => "Phone numbers",
    }
}

/// Render a row as `column=value` pairs in column order.
fn render_row(row: &Row) -> String {
    let parts: Vec<String> = row
        .columns()
        .map(|column| format!("{}={}", column, row.get(column)))
        .collect();
    parts.join(", ")
}

/// Truncate a string for display.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{}...", cut)
    }
}
