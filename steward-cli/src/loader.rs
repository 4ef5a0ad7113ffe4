//! CSV loading with delimiter auto-detection.
//!
//! Turns a delimited text file into a [`Dataset`]. Cells are typed
//! conservatively: empty cells become nulls, cells that look like plain
//! numbers become numbers, and everything else stays text. Leading zeros
//! and a leading `+` both disqualify a cell from numeric parsing so that
//! identifiers like postal codes and phone numbers survive loading intact.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use steward_core::{Dataset, Row, Value};
use thiserror::Error;
use tracing::debug;

/// Delimiters considered during auto-detection.
const CANDIDATE_DELIMITERS: [char; 4] = [',', ';', '\t', '|'];

/// Matches cells that can safely be read as numbers. Leading zeros and a
/// leading `+` are excluded so identifier-like values stay textual.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:0|[1-9]\d*)(?:\.\d+)?$").expect("Invalid number regex"));

/// Errors that can occur while loading a dataset from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file format '{0}', expected a .csv file")]
    UnsupportedFormat(String),

    #[error("Failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    #[error("Duplicate column header: {0}")]
    DuplicateHeader(String),

    #[error("Delimiter must be a single ASCII character")]
    InvalidDelimiter,

    #[error("File contains no header row")]
    Empty,
}

/// Load a dataset from a CSV file.
///
/// Only `.csv` files are accepted. When `delimiter` is `None` the
/// delimiter is detected from the header line.
pub fn load_csv(path: &Path, delimiter: Option<char>) -> Result<Dataset, LoadError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => {}
        other => return Err(LoadError::UnsupportedFormat(other.unwrap_or("").to_string())),
    }

    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => c,
        Some(_) => return Err(LoadError::InvalidDelimiter),
        None => detect_delimiter(&contents),
    };
    debug!(
        path = %path.display(),
        delimiter = %delimiter.escape_debug(),
        "loading csv"
    );

    parse_csv(&contents, delimiter)
}

/// Parse CSV text that has already been read into memory.
///
/// Short records are allowed; their missing cells read as nulls. Records
/// consisting solely of empty cells are skipped.
pub fn parse_csv(contents: &str, delimiter: char) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|header| header.is_empty()) {
        return Err(LoadError::Empty);
    }

    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(LoadError::DuplicateHeader(header.clone()));
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let mut row = Row::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), parse_cell(cell));
        }
        rows.push(row);
    }

    Ok(Dataset::new(headers, rows))
}

/// Pick the delimiter that appears most often in the header line.
fn detect_delimiter(contents: &str) -> char {
    let first_line = contents.lines().next().unwrap_or("");
    let mut best = ',';
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count = first_line.matches(candidate).count();
        if count > best_count {
            best_count = count;
            best = candidate;
        }
    }
    best
}

/// Type a single cell.
fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if NUMBER_PATTERN.is_match(trimmed) {
        if let Ok(number) = trimmed.parse::<f64>() {
            if number.is_finite() {
                return Value::Number(number);
            }
        }
    }
    Value::text(trimmed)
}
