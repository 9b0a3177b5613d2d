//! Structured health issues.

use serde::{Deserialize, Serialize};

/// Severity of a health issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor, worth a look.
    Low,
    /// Should be reviewed.
    Medium,
    /// Should be fixed before relying on the data.
    High,
}

impl Severity {
    /// Severity from how far a metric falls below its acceptable threshold,
    /// relative to the threshold: at least half → high, a fifth → medium.
    pub fn from_shortfall(metric: f64, threshold: f64) -> Self {
        if threshold <= 0.0 {
            return Severity::Low;
        }
        let shortfall = ((threshold - metric) / threshold).max(0.0);
        if shortfall >= 0.5 {
            Severity::High
        } else if shortfall >= 0.2 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// What pulled a health sub-score down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCategory {
    /// The dataset has no rows at all.
    EmptyDataset,
    /// A column holds no non-null value.
    EmptyColumn,
    /// A column has a high share of missing values.
    MissingValues,
    /// Values of a column disagree on their type.
    TypeInconsistency,
    /// An identifier-like column repeats values.
    DuplicateValues,
    /// A header is empty, duplicated, generic or malformed.
    HeaderQuality,
    /// A numeric column carries many outliers.
    Outliers,
}

impl IssueCategory {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueCategory::EmptyDataset => "Empty Dataset",
            IssueCategory::EmptyColumn => "Empty Column",
            IssueCategory::MissingValues => "Missing Values",
            IssueCategory::TypeInconsistency => "Type Inconsistency",
            IssueCategory::DuplicateValues => "Duplicate Values",
            IssueCategory::HeaderQuality => "Header Quality",
            IssueCategory::Outliers => "Outliers",
        }
    }
}

/// A single condition that lowered the health score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthIssue {
    pub category: IssueCategory,
    pub severity: Severity,
    /// Affected column, when the issue is column-specific.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub column: Option<String>,
    /// Observed metric in `[0, 1]`.
    pub metric: f64,
    /// Acceptable threshold the metric fell below.
    pub threshold: f64,
    /// Short structured description.
    pub message: String,
    /// Number of affected rows, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub affected_rows: Option<usize>,
}

impl HealthIssue {
    /// Create an issue whose severity follows from its metric and threshold.
    pub fn new(
        category: IssueCategory,
        metric: f64,
        threshold: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity: Severity::from_shortfall(metric, threshold),
            column: None,
            metric,
            threshold,
            message: message.into(),
            affected_rows: None,
        }
    }

    /// Set the affected column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Override the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the number of affected rows.
    pub fn with_affected_rows(mut self, rows: usize) -> Self {
        self.affected_rows = Some(rows);
        self
    }
}
