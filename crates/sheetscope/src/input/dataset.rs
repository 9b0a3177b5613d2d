//! The headers + rows input shared by every component.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::InputLimits;
use crate::error::{Result, SheetscopeError};

use super::value::Value;

/// One row record. Keys are expected to be a subset of the headers.
pub type Row = IndexMap<String, Value>;

static NULL: Value = Value::Null;

/// Look up a cell, treating a missing key as `Null`.
pub fn cell<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&NULL)
}

/// A tabular dataset: ordered headers plus row records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Column headers, in display order.
    pub headers: Vec<String>,
    /// Row records.
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Create a new dataset.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Build a dataset from positional rows, pairing values with headers.
    ///
    /// Short rows are padded with `Null`; surplus cells are dropped. When a
    /// header repeats, the row keeps the cell of its first occurrence.
    pub fn from_positional(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|values| {
                let mut values = values.into_iter();
                let mut row = Row::with_capacity(headers.len());
                for header in &headers {
                    let value = values.next().unwrap_or(Value::Null);
                    row.entry(header.clone()).or_insert(value);
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate over one column's values in row order.
    pub fn column_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| cell(row, name))
    }

    /// Check the input contract.
    pub fn validate(&self, limits: &InputLimits) -> Result<()> {
        validate_shape(&self.headers, &self.rows, limits)
    }
}

/// Check the headers/rows contract without requiring an owned [`Dataset`].
pub fn validate_shape(headers: &[String], rows: &[Row], limits: &InputLimits) -> Result<()> {
    if headers.is_empty() {
        return Err(SheetscopeError::EmptyHeaders);
    }

    let keyed_rows: Vec<&Row> = rows.iter().filter(|r| !r.is_empty()).collect();
    if keyed_rows.is_empty() {
        return Ok(());
    }

    let unmatched = keyed_rows
        .iter()
        .filter(|row| !row.keys().any(|k| headers.iter().any(|h| h == k)))
        .count();

    let ratio = unmatched as f64 / keyed_rows.len() as f64;
    if ratio > limits.max_unmatched_row_ratio {
        return Err(SheetscopeError::KeyMismatch {
            unmatched,
            total: keyed_rows.len(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_missing_key_reads_null() {
        let r = row(&[("a", Value::Number(1.0))]);
        assert_eq!(cell(&r, "b"), &Value::Null);
    }

    #[test]
    fn test_from_positional_pads() {
        let ds = Dataset::from_positional(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Number(1.0)]],
        );
        assert_eq!(ds.rows[0].get("b"), Some(&Value::Null));
    }

    #[test]
    fn test_repeated_header_keeps_first_cell() {
        let ds = Dataset::from_positional(
            vec!["a".into(), "a".into()],
            vec![vec![Value::Number(1.0), Value::text("zzz")]],
        );
        assert_eq!(ds.rows[0].len(), 1);
        assert_eq!(ds.rows[0]["a"], Value::Number(1.0));
    }

    #[test]
    fn test_validate_empty_headers() {
        let ds = Dataset::new(vec![], vec![]);
        assert!(matches!(
            ds.validate(&InputLimits::default()),
            Err(SheetscopeError::EmptyHeaders)
        ));
    }

    #[test]
    fn test_validate_mismatched_keys() {
        let ds = Dataset::new(
            vec!["a".into()],
            vec![
                row(&[("x", Value::Number(1.0))]),
                row(&[("y", Value::Number(2.0))]),
            ],
        );
        assert!(matches!(
            ds.validate(&InputLimits::default()),
            Err(SheetscopeError::KeyMismatch { unmatched: 2, total: 2 })
        ));
    }

    #[test]
    fn test_validate_tolerates_extra_keys() {
        let ds = Dataset::new(
            vec!["a".into()],
            vec![row(&[("a", Value::Number(1.0)), ("extra", Value::Null)])],
        );
        assert!(ds.validate(&InputLimits::default()).is_ok());
    }
}
