//! Per-value classification: number, boolean, date or text.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::Value;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Cheap shape checks run before any chrono parse attempt.

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}").unwrap(),          // ISO date / datetime
        Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").unwrap(),         // Alt ISO
        Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(),         // US date
        Regex::new(r"^\d{1,2}[-.]\d{1,2}[-.]\d{4}$").unwrap(),   // European date
        Regex::new(r"^\d{4}-\d{2}$").unwrap(),                   // Year-month
        Regex::new(r"(?i)^[a-z]{3,9}\.? \d{1,2},? \d{4}$").unwrap(), // Jan 5, 2024
        Regex::new(r"(?i)^\d{1,2} [a-z]{3,9}\.? \d{4}$").unwrap(),   // 5 Jan 2024
    ]
});

static THOUSANDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-+]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%b %d, %Y",
    "%B %d, %Y", "%b %d %Y", "%B %d %Y", "%d %b %Y", "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥'];

const BOOLEAN_WORDS: &[&str] = &["true", "false", "yes", "no", "y", "n"];

/// Boolean-like pairs recognized as a two-element domain.
pub(crate) const BOOLEAN_PAIRS: &[(&str, &str)] =
    &[("true", "false"), ("yes", "no"), ("y", "n"), ("1", "0")];

/// Kind of a single non-null value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Boolean,
    Date,
    Text,
}

impl ValueKind {
    pub(crate) const ALL: [ValueKind; 4] = [
        ValueKind::Number,
        ValueKind::Boolean,
        ValueKind::Date,
        ValueKind::Text,
    ];

    fn index(self) -> usize {
        match self {
            ValueKind::Number => 0,
            ValueKind::Boolean => 1,
            ValueKind::Date => 2,
            ValueKind::Text => 3,
        }
    }
}

/// Tally of value kinds over a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    counts: [usize; 4],
}

impl KindCounts {
    pub fn add(&mut self, kind: ValueKind) {
        self.counts[kind.index()] += 1;
    }

    pub fn get(&self, kind: ValueKind) -> usize {
        self.counts[kind.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of a kind among all counted values (0 when nothing was counted).
    pub fn share(&self, kind: ValueKind) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.get(kind) as f64 / total as f64
        }
    }

    /// Most common kind; ties go to the earlier kind in [`ValueKind::ALL`].
    pub fn plurality(&self) -> Option<ValueKind> {
        let mut best: Option<ValueKind> = None;
        for kind in ValueKind::ALL {
            let count = self.get(kind);
            if count > 0 && best.is_none_or(|b| count > self.get(b)) {
                best = Some(kind);
            }
        }
        best
    }
}

/// Classify a non-null value.
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Number(_) => ValueKind::Number,
        Value::Boolean(_) => ValueKind::Boolean,
        Value::Null => ValueKind::Text,
        Value::Text(s) => {
            let trimmed = s.trim();
            if parse_number_text(trimmed).is_some() {
                ValueKind::Number
            } else if is_boolean_word(trimmed) {
                ValueKind::Boolean
            } else if parse_date_text(trimmed).is_some() {
                ValueKind::Date
            } else {
                ValueKind::Text
            }
        }
    }
}

/// Numeric reading of a value, if any.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::Text(s) => parse_number_text(s.trim()),
        _ => None,
    }
}

/// Calendar-date reading of a value, normalized to UTC.
pub fn as_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Text(s) => parse_date_text(s.trim()),
        _ => None,
    }
}

/// Boolean reading of a value, if any.
pub fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Number(n) if *n == 1.0 => Some(true),
        Value::Number(n) if *n == 0.0 => Some(false),
        Value::Text(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Lowercase token used by the boolean-pair rule.
pub fn boolean_token(value: &Value) -> String {
    match value {
        Value::Text(s) => {
            let lower = s.trim().to_lowercase();
            match lower.parse::<f64>() {
                Ok(n) if n.is_finite() => crate::input::format_number(n),
                _ => lower,
            }
        }
        other => other.key(),
    }
}

fn is_boolean_word(value: &str) -> bool {
    BOOLEAN_WORDS.iter().any(|w| value.eq_ignore_ascii_case(w))
}

/// Parse a number from text, accepting thousands separators and a leading
/// currency symbol. Non-finite spellings (`inf`, `NaN`) are rejected.
pub fn parse_number_text(value: &str) -> Option<f64> {
    let value = value.trim();
    let stripped = value
        .strip_prefix(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .unwrap_or(value)
        .trim_start();

    if !stripped.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let candidate = if THOUSANDS.is_match(stripped) {
        stripped.replace(',', "")
    } else {
        stripped.to_string()
    };

    candidate.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Returns true when text carries a leading currency symbol.
pub fn is_currency_text(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.starts_with(|c: char| CURRENCY_SYMBOLS.contains(&c))
        && parse_number_text(trimmed).is_some()
}

/// Returns true for date-like text with a time-of-day component.
pub fn has_time_component(value: &str) -> bool {
    let trimmed = value.trim();
    parse_date_text(trimmed).is_some() && trimmed.contains(':')
}

/// Parse a date-like string to a UTC calendar date.
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    if !DATE_PATTERNS.iter().any(|p| p.is_match(value)) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    if let Some(date) = value.strip_suffix('Z').and_then(parse_naive_datetime) {
        return Some(date);
    }

    if let Some(date) = parse_naive_datetime(value) {
        return Some(date);
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    {
        return Some(date);
    }

    // Year-month values read as the first day of the month
    if value.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok();
    }

    None
}

fn parse_naive_datetime(value: &str) -> Option<NaiveDate> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.and_utc().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_numbers() {
        assert_eq!(classify(&Value::Number(3.0)), ValueKind::Number);
        assert_eq!(classify(&Value::text("42")), ValueKind::Number);
        assert_eq!(classify(&Value::text(" -1.5e3 ")), ValueKind::Number);
        assert_eq!(classify(&Value::text("1,234.50")), ValueKind::Number);
        assert_eq!(classify(&Value::text("$1,200")), ValueKind::Number);
        assert_eq!(classify(&Value::text("inf")), ValueKind::Text);
    }

    #[test]
    fn test_classify_booleans() {
        assert_eq!(classify(&Value::Boolean(true)), ValueKind::Boolean);
        assert_eq!(classify(&Value::text("Yes")), ValueKind::Boolean);
        assert_eq!(classify(&Value::text("FALSE")), ValueKind::Boolean);
    }

    #[test]
    fn test_classify_dates() {
        assert_eq!(classify(&Value::text("2024-01-15")), ValueKind::Date);
        assert_eq!(classify(&Value::text("01/15/2024")), ValueKind::Date);
        assert_eq!(classify(&Value::text("2024-03")), ValueKind::Date);
        assert_eq!(classify(&Value::text("Jan 5, 2024")), ValueKind::Date);
        assert_eq!(classify(&Value::text("2024-01-15T10:30:00Z")), ValueKind::Date);
        assert_eq!(classify(&Value::text("2024-13-45")), ValueKind::Text);
    }

    #[test]
    fn test_dates_normalize_to_utc() {
        // 23:30 at UTC-05:00 is already the next day in UTC
        assert_eq!(
            parse_date_text("2024-01-15T23:30:00-05:00"),
            NaiveDate::from_ymd_opt(2024, 1, 16)
        );
        assert_eq!(
            parse_date_text("2024-01-15 08:00:00"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_date_text("2024-02"), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_currency_and_time_signals() {
        assert!(is_currency_text("$19.99"));
        assert!(!is_currency_text("19.99"));
        assert!(has_time_component("2024-01-15 08:00:00"));
        assert!(!has_time_component("2024-01-15"));
    }

    #[test]
    fn test_kind_counts_plurality() {
        let mut counts = KindCounts::default();
        assert_eq!(counts.plurality(), None);
        counts.add(ValueKind::Text);
        counts.add(ValueKind::Number);
        assert_eq!(counts.plurality(), Some(ValueKind::Number));
        counts.add(ValueKind::Text);
        assert_eq!(counts.plurality(), Some(ValueKind::Text));
        assert_eq!(counts.share(ValueKind::Text), 2.0 / 3.0);
    }
}
