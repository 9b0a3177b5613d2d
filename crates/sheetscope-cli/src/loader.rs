//! Load datasets from CSV/TSV or JSON files.
//!
//! Delimited files become text cells (the profiler infers types from text);
//! JSON keeps native numbers, booleans and nulls.

use std::error::Error;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use sheetscope::{Dataset, Row, Value};
use tracing::debug;

type LoadResult<T> = Result<T, Box<dyn Error>>;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Metadata about the loaded file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, json, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

/// Load a dataset, detecting the format from the extension and contents.
pub fn load_dataset(path: &Path, delimiter: Option<char>) -> LoadResult<(Dataset, SourceMetadata)> {
    let contents = fs::read(path).map_err(|e| format!("Cannot read {}: {}", path.display(), e))?;

    let mut hasher = Sha256::new();
    hasher.update(&contents);
    let hash = format!("sha256:{:x}", hasher.finalize());

    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let (dataset, format) = if is_json {
        (parse_json(&contents)?, "json".to_string())
    } else {
        let delimiter = match delimiter {
            Some(c) if c.is_ascii() => c as u8,
            Some(c) => return Err(format!("Delimiter must be an ASCII character, got '{}'", c).into()),
            None => detect_delimiter(&contents)?,
        };
        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        };
        (parse_delimited(&contents, delimiter)?, format.to_string())
    };

    let file = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let metadata = SourceMetadata {
        file,
        path: path.to_path_buf(),
        hash,
        size_bytes: contents.len() as u64,
        format,
        row_count: dataset.row_count(),
        column_count: dataset.column_count(),
        loaded_at: Utc::now(),
    };

    debug!(
        file = %metadata.file,
        format = %metadata.format,
        rows = metadata.row_count,
        columns = metadata.column_count,
        "loaded dataset"
    );

    Ok((dataset, metadata))
}

/// Parse delimited text with a header row; short rows are padded with nulls.
fn parse_delimited(bytes: &[u8], delimiter: u8) -> LoadResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err("No columns found".into());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<Value> = record.iter().map(Value::text).collect();
        row.resize(headers.len(), Value::Null);
        rows.push(row);
    }

    Ok(Dataset::from_positional(headers, rows))
}

/// Parse `{"headers": [...], "rows": [...]}` or an array of records.
fn parse_json(bytes: &[u8]) -> LoadResult<Dataset> {
    let document: serde_json::Value = serde_json::from_slice(bytes)?;

    match document {
        serde_json::Value::Object(ref map) if map.contains_key("headers") => {
            Ok(serde_json::from_value::<Dataset>(document)?)
        }
        serde_json::Value::Array(records) => {
            let rows = records
                .into_iter()
                .map(serde_json::from_value::<Row>)
                .collect::<Result<Vec<_>, _>>()?;

            // Headers in first-seen key order across all records
            let mut headers: Vec<String> = Vec::new();
            for row in &rows {
                for key in row.keys() {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }
            Ok(Dataset::new(headers, rows))
        }
        _ => Err("JSON input must be an array of records or an object with \"headers\" and \"rows\"".into()),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> LoadResult<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(Result::ok)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err("File is empty".into());
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
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        // Consistent counts dominate; tab wins ties since it rarely appears in data
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
