//! Cell values of an untyped row record.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// Source rows are loosely typed records, so a column may hold any mix of
/// these variants. Inference pattern-matches on this closed set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    #[default]
    Null,
    /// Native boolean.
    Boolean(bool),
    /// Native number.
    Number(f64),
    /// Text, possibly holding a number, date or boolean word.
    Text(String),
}

impl Value {
    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Returns true for `Null`, or text matching one of the null tokens
    /// (compared trimmed and case-insensitively).
    pub fn is_missing(&self, null_tokens: &[String]) -> bool {
        match self {
            Value::Null => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(s) => {
                let trimmed = s.trim();
                null_tokens
                    .iter()
                    .any(|token| trimmed.eq_ignore_ascii_case(token.trim()))
            }
            Value::Boolean(_) => false,
        }
    }

    /// Canonical key used for distinct-value counting.
    ///
    /// Numbers and numeric text share a key, so `1`, `1.0` and `"1"` count
    /// as the same value.
    pub fn key(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => format_number(n),
                    _ => trimmed.to_string(),
                }
            }
        }
    }

    /// Convert to a JSON value for chart payloads.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Format a number without a trailing `.0` for integral values.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// JSON number, falling back to null for non-finite values.
pub(crate) fn number_to_json(n: f64) -> serde_json::Value {
    serde_json::Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}
