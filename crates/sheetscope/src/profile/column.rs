//! Per-column profile produced by the column profiler.

use serde::{Deserialize, Serialize};

use crate::input::Value;

use super::types::{CoarseType, InferredType, OutlierMethod};

/// Quality sub-scores of a column, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColumnQuality {
    /// Share of non-null values.
    pub completeness: f64,
    /// Share of non-null values agreeing with the inferred type.
    pub consistency: f64,
    /// Distinct non-null values over non-null values.
    pub uniqueness: f64,
}

/// Outliers flagged in a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierSummary {
    /// Total number of flagged values.
    pub count: usize,
    /// Flagged values in row order, capped.
    pub values: Vec<f64>,
    /// Detection method.
    pub method: OutlierMethod,
}

/// One entry of a category frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// Share of non-null values, in percent.
    pub percentage: f64,
}

/// Calendar range of a date column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Earliest date (ISO `YYYY-MM-DD`, UTC).
    pub min: String,
    /// Latest date (ISO `YYYY-MM-DD`, UTC).
    pub max: String,
    /// Whole days between `min` and `max`.
    pub span: i64,
}

/// Statistics for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericDetail {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub standard_deviation: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub outliers: Option<OutlierSummary>,
}

/// Frequency table for category columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub top_categories: Vec<CategoryCount>,
}

/// Range of date columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDetail {
    pub date_range: DateRange,
}

/// Counts for boolean columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanDetail {
    pub true_count: usize,
    pub false_count: usize,
}

/// Length statistics for free-text columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDetail {
    pub min_length: usize,
    pub max_length: usize,
    pub avg_length: f64,
}

/// Type-specific part of a column profile, tagged by the inferred type.
///
/// Outliers, top categories and the date range each live in exactly one
/// variant, so a profile can never carry more than one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "inferredType", rename_all = "lowercase")]
pub enum ColumnDetail {
    Numeric(NumericDetail),
    Date(DateDetail),
    Category(CategoryDetail),
    Text(TextDetail),
    Boolean(BooleanDetail),
    Mixed,
}

impl ColumnDetail {
    /// The inferred type this detail belongs to.
    pub fn inferred_type(&self) -> InferredType {
        match self {
            ColumnDetail::Numeric(_) => InferredType::Numeric,
            ColumnDetail::Date(_) => InferredType::Date,
            ColumnDetail::Category(_) => InferredType::Category,
            ColumnDetail::Text(_) => InferredType::Text,
            ColumnDetail::Boolean(_) => InferredType::Boolean,
            ColumnDetail::Mixed => InferredType::Mixed,
        }
    }
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedColumnStats {
    /// Column header.
    pub name: String,
    /// Coarse storage type.
    #[serde(rename = "type")]
    pub coarse_type: CoarseType,
    /// Total number of values (rows), including nulls.
    pub count: usize,
    /// Distinct non-null values.
    pub unique_values: usize,
    /// Null/missing values.
    pub null_count: usize,
    /// Most frequent non-null value; ties go to the first seen.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub mode: Option<Value>,
    /// Quality sub-scores.
    pub quality: ColumnQuality,
    /// Type-specific statistics.
    #[serde(flatten)]
    pub detail: ColumnDetail,
}

impl EnhancedColumnStats {
    /// The inferred semantic type.
    pub fn inferred_type(&self) -> InferredType {
        self.detail.inferred_type()
    }

    /// Number of non-null values.
    pub fn non_null_count(&self) -> usize {
        self.count - self.null_count
    }

    /// Numeric statistics, for numeric columns.
    pub fn numeric(&self) -> Option<&NumericDetail> {
        match &self.detail {
            ColumnDetail::Numeric(detail) => Some(detail),
            _ => None,
        }
    }

    /// Outlier summary, for numeric columns with enough samples.
    pub fn outliers(&self) -> Option<&OutlierSummary> {
        self.numeric().and_then(|n| n.outliers.as_ref())
    }

    /// Top categories, for category columns.
    pub fn top_categories(&self) -> Option<&[CategoryCount]> {
        match &self.detail {
            ColumnDetail::Category(detail) => Some(&detail.top_categories),
            _ => None,
        }
    }

    /// Date range, for date columns.
    pub fn date_range(&self) -> Option<&DateRange> {
        match &self.detail {
            ColumnDetail::Date(detail) => Some(&detail.date_range),
            _ => None,
        }
    }

    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.count as f64) * 100.0
        }
    }
}

/// Find a profile by column name; the first occurrence wins.
pub fn find_column<'a>(
    stats: &'a [EnhancedColumnStats],
    name: &str,
) -> Option<&'a EnhancedColumnStats> {
    stats.iter().find(|c| c.name == name)
}
