//! Steward CLI tool

use std::path::Path;

use clap::{Parser, Subcommand};
use steward_core::{AuditConfig, ValidationEngine, DEFAULT_THRESHOLD_YEARS, DEFAULT_VALID_LENGTH};

mod loader;
mod render;

#[derive(Parser)]
#[command(name = "steward")]
#[command(author, version, about = "Data-quality audits for tabular datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a CSV file against the configured rules
    Audit {
        /// Path to the CSV file to audit
        file: String,

        /// Column holding last-modified dates (enables the freshness rule)
        #[arg(long)]
        date_column: Option<String>,

        /// Column holding postal codes (enables the postal-code rule)
        #[arg(long)]
        postal_column: Option<String>,

        /// Column holding phone numbers (enables the phone-number rule)
        #[arg(long)]
        phone_column: Option<String>,

        /// Comma-separated required columns (enables the completeness rule)
        #[arg(long, value_delimiter = ',')]
        required: Vec<String>,

        /// Age in years past which a dated row counts as obsolete
        #[arg(long, default_value_t = DEFAULT_THRESHOLD_YEARS)]
        threshold_years: u32,

        /// Number of characters a valid postal code must have
        #[arg(long, default_value_t = DEFAULT_VALID_LENGTH)]
        postal_length: usize,

        /// Field delimiter; detected from the header line when omitted
        #[arg(long)]
        delimiter: Option<char>,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the columns and first rows of a CSV file
    Preview {
        /// Path to the CSV file to preview
        file: String,

        /// Number of rows to show
        #[arg(long, default_value = "10")]
        rows: usize,

        /// Field delimiter; detected from the header line when omitted
        #[arg(long)]
        delimiter: Option<char>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Audit {
            file,
            date_column,
            postal_column,
            phone_column,
            required,
            threshold_years,
            postal_length,
            delimiter,
            format,
        } => {
            let dataset = loader::load_csv(Path::new(&file), delimiter)?;

            let mut config = AuditConfig::new()
                .threshold_years(threshold_years)
                .valid_length(postal_length)
                .required_columns(required);
            if let Some(column) = date_column {
                config = config.date_column(column);
            }
            if let Some(column) = postal_column {
                config = config.postal_column(column);
            }
            if let Some(column) = phone_column {
                config = config.phone_column(column);
            }

            let report = ValidationEngine::run(&dataset, &config);

            match format.as_str() {
                "table" => render::print_table(&report),
                "json" => render::print_json(&report)?,
                other => anyhow::bail!("Unknown output format '{}', expected table or json", other),
            }

            // Violations do not affect the exit code; rule failures do.
            if report.has_failures() {
                std::process::exit(1);
            }
        }
        Commands::Preview {
            file,
            rows,
            delimiter,
        } => {
            let dataset = loader::load_csv(Path::new(&file), delimiter)?;
            render::print_preview(&dataset, rows);
        }
    }

    Ok(())
}
