//! CSV/TSV loader with delimiter detection and type inference.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{Result, ScourError};

use super::frame::Table;
use super::source::SourceMetadata;
use super::value::Value;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Cell contents read as missing values (compared trimmed, case-insensitive).
const NULL_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "#n/a", "<na>"];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Infer integer/float/boolean columns instead of keeping text.
    pub infer_types: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: None,
            quote: b'"',
            infer_types: true,
        }
    }
}

/// Loads delimited files into a [`Table`].
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a file and return the table and its source metadata.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| ScourError::io(path, e))?;
        let size_bytes = file.metadata().map_err(|e| ScourError::io(path, e))?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| ScourError::io(path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded table"
        );

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, source))
    }

    /// Parse delimited bytes into a table.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.trim().to_string()).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(ScourError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); expected_cols];

        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            // Short rows are padded with missing values, long rows truncated.
            for (col_idx, column) in raw_columns.iter_mut().enumerate() {
                column.push(record.get(col_idx).unwrap_or("").to_string());
            }
        }

        let columns = headers.into_iter().zip(raw_columns).map(|(name, raw)| {
            let values = if self.config.infer_types {
                infer_column(&raw)
            } else {
                raw.into_iter()
                    .map(|s| if is_null_token(&s) { Value::Null } else { Value::Text(s) })
                    .collect()
            };
            (name, values)
        });

        Table::from_columns(columns)
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a raw cell represents a missing value.
pub fn is_null_token(value: &str) -> bool {
    let trimmed = value.trim();
    NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Convert raw cells into typed values, choosing one type for the column.
fn infer_column(raw: &[String]) -> Vec<Value> {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !is_null_token(s))
        .collect();

    let convert: fn(&str) -> Value = if present.is_empty() {
        |s| Value::Text(s.to_string())
    } else if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        |s| s.trim().parse::<i64>().map_or(Value::Null, Value::Int)
    } else if present.iter().all(|s| is_float_literal(s)) {
        |s| s.trim().parse::<f64>().map_or(Value::Null, Value::Float)
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        |s| parse_bool(s.trim()).map_or(Value::Null, Value::Bool)
    } else {
        |s| Value::Text(s.to_string())
    };

    raw.iter()
        .map(|s| if is_null_token(s) { Value::Null } else { convert(s) })
        .collect()
}

/// Floats as they appear in data files; rejects `inf`/`nan` spellings.
fn is_float_literal(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(f64::is_finite)
        && s.bytes().any(|b| b.is_ascii_digit())
}

fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(std::result::Result::ok)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ScourError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>()
            / counts.len() as f64;

        // Tab gets a slight bonus as it rarely appears inside values.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
