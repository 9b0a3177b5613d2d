//! Core type definitions for column profiles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type inferred for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferredType {
    /// Numbers dominate.
    Numeric,
    /// Date-like strings dominate.
    Date,
    /// Short, repeated labels.
    Category,
    /// Long or high-cardinality strings.
    Text,
    /// A two-element boolean-like domain.
    Boolean,
    /// No kind reached the confidence threshold.
    Mixed,
}

impl InferredType {
    /// Coarse storage type reported alongside the semantic type.
    pub fn coarse(&self) -> CoarseType {
        match self {
            InferredType::Numeric => CoarseType::Number,
            InferredType::Date => CoarseType::Date,
            InferredType::Category | InferredType::Text => CoarseType::String,
            InferredType::Boolean => CoarseType::Boolean,
            InferredType::Mixed => CoarseType::Mixed,
        }
    }

    /// Lowercase label, matching the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            InferredType::Numeric => "numeric",
            InferredType::Date => "date",
            InferredType::Category => "category",
            InferredType::Text => "text",
            InferredType::Boolean => "boolean",
            InferredType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoarseType {
    String,
    Number,
    Date,
    Boolean,
    Mixed,
}

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    /// Interquartile-range fences.
    Iqr,
    /// Distance from the mean in standard deviations.
    Zscore,
    /// Isolation-based scoring.
    Isolation,
}
