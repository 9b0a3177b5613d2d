//! Thresholds and weights shared by the analysis components.
//!
//! Every component takes its section of [`AnalysisConfig`] explicitly, so tests
//! and callers can override individual thresholds. All sections deserialize
//! with defaults, which lets a partial JSON document override a single value.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetscopeError};

/// Configuration for the whole analysis pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Input contract tolerances.
    pub input: InputLimits,
    /// Column profiler thresholds.
    pub profiler: ProfilerConfig,
    /// Health score weights and thresholds.
    pub health: HealthConfig,
    /// Chart generator caps.
    pub charts: ChartSettings,
    /// Dataset classifier settings.
    pub classifier: ClassifierConfig,
}

impl AnalysisConfig {
    /// Parse a (possibly partial) configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check ratios and weights.
    pub fn validate(&self) -> Result<()> {
        check_ratio("input.max_unmatched_row_ratio", self.input.max_unmatched_row_ratio)?;
        check_ratio("profiler.type_confidence", self.profiler.type_confidence)?;
        check_ratio("profiler.category_unique_ratio", self.profiler.category_unique_ratio)?;
        if self.profiler.iqr_multiplier < 0.0 {
            return Err(SheetscopeError::Config(
                "profiler.iqr_multiplier must be non-negative".to_string(),
            ));
        }
        self.health.weights.validate()?;
        check_ratio("health.acceptable_completeness", self.health.acceptable_completeness)?;
        check_ratio("health.acceptable_consistency", self.health.acceptable_consistency)?;
        check_ratio("health.acceptable_uniqueness", self.health.acceptable_uniqueness)?;
        if self.charts.max_histogram_bins == 0 {
            return Err(SheetscopeError::Config(
                "charts.max_histogram_bins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_ratio(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SheetscopeError::Config(format!(
            "{name} must be within [0, 1], got {value}"
        )))
    }
}

/// Tolerances applied when validating the headers/rows shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    /// Maximum share of non-empty rows allowed to share no key with the headers.
    pub max_unmatched_row_ratio: f64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_unmatched_row_ratio: 0.5,
        }
    }
}

/// Column profiler thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Share of non-null values that must agree for a type to win.
    pub type_confidence: f64,
    /// Maximum unique/non-null ratio for a text column to be a category.
    pub category_unique_ratio: f64,
    /// Maximum average length of category labels.
    pub category_max_length: f64,
    /// Minimum numeric values before outlier detection runs.
    pub min_outlier_samples: usize,
    /// Maximum outlier values reported per column.
    pub outlier_sample_cap: usize,
    /// IQR fence multiplier.
    pub iqr_multiplier: f64,
    /// Number of categories kept in `topCategories`.
    pub top_categories: usize,
    /// Text values treated as missing (trimmed, case-insensitive).
    pub null_tokens: Vec<String>,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            type_confidence: 0.9,
            category_unique_ratio: 0.5,
            category_max_length: 40.0,
            min_outlier_samples: 4,
            outlier_sample_cap: 10,
            iqr_multiplier: 1.5,
            top_categories: 10,
            null_tokens: ["", "na", "n/a", "null", "nan", "none", "nil", "-"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Weights of the five health sub-scores. Must sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthWeights {
    pub completeness: f64,
    pub consistency: f64,
    pub uniqueness: f64,
    pub header_quality: f64,
    pub anomaly: f64,
}

impl HealthWeights {
    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.completeness + self.consistency + self.uniqueness + self.header_quality + self.anomaly
    }

    /// Weights must be non-negative and sum to 1.
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.completeness,
            self.consistency,
            self.uniqueness,
            self.header_quality,
            self.anomaly,
        ];
        if all.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(SheetscopeError::Config(
                "health weights must be finite and non-negative".to_string(),
            ));
        }
        let total = self.total();
        if (total - 1.0).abs() > 1e-6 {
            return Err(SheetscopeError::Config(format!(
                "health weights must sum to 1, got {total}"
            )));
        }
        Ok(())
    }
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            completeness: 0.30,
            consistency: 0.25,
            uniqueness: 0.15,
            header_quality: 0.10,
            anomaly: 0.20,
        }
    }
}

/// Health score calculator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Sub-score weights.
    pub weights: HealthWeights,
    /// Acceptable completeness; shortfall below it sets `missing_values` severity.
    pub acceptable_completeness: f64,
    /// Acceptable consistency; shortfall below it sets `type_inconsistency` severity.
    pub acceptable_consistency: f64,
    /// Acceptable distinct share of identifier columns; sets `duplicate_values` severity.
    pub acceptable_uniqueness: f64,
    /// Multiplier on the outlier-per-cell rate for the anomaly penalty.
    pub anomaly_penalty_factor: f64,
    /// Acceptable outlier rate per column; sets `outliers` severity.
    pub acceptable_outlier_rate: f64,
    /// Headers longer than this are penalized.
    pub max_header_length: usize,
    /// Pattern for identifier header names; only these columns are scored for uniqueness.
    pub identifier_pattern: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            weights: HealthWeights::default(),
            acceptable_completeness: 0.95,
            acceptable_consistency: 0.95,
            acceptable_uniqueness: 0.99,
            anomaly_penalty_factor: 1.0,
            acceptable_outlier_rate: 0.05,
            max_header_length: 64,
            identifier_pattern: r"(?i)(^id$|^id[_\s-]|[_\s-]id$|uuid|guid|identifier|^key$)"
                .to_string(),
        }
    }
}

/// Chart generator caps and palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Maximum distinct values for a category chart.
    pub category_chart_cap: usize,
    /// Category charts with at most this many slices are pies, larger are bars.
    pub pie_max_slices: usize,
    /// Upper bound on histogram bins.
    pub max_histogram_bins: usize,
    /// Maximum numeric series in the combined time-series chart.
    pub max_series: usize,
    /// Maximum points in a scatter chart.
    pub max_scatter_points: usize,
    /// Minimum pairwise-complete rows for a correlation to count.
    pub min_correlation_pairs: usize,
    /// Colors assigned to series and slices, in order.
    pub palette: Vec<String>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            category_chart_cap: 12,
            pie_max_slices: 6,
            max_histogram_bins: 20,
            max_series: 5,
            max_scatter_points: 500,
            min_correlation_pairs: 3,
            palette: [
                "#4f46e5", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#ec4899",
                "#84cc16",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Dataset classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Rows inspected by [`crate::DatasetClassifier::classify_sample`].
    pub sample_rows: usize,
    /// Minimum domain score before a non-general category is reported.
    pub min_score: f64,
    /// Score added per matching shape signal.
    pub signal_weight: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_rows: 5,
            min_score: 1.0,
            signal_weight: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
        assert!((HealthWeights::default().total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_override() {
        let config = AnalysisConfig::from_json(r#"{"profiler": {"top_categories": 3}}"#).unwrap();
        assert_eq!(config.profiler.top_categories, 3);
        assert_eq!(config.profiler.min_outlier_samples, 4);
        assert_eq!(config.charts.category_chart_cap, 12);
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let result = AnalysisConfig::from_json(r#"{"health": {"weights": {"anomaly": 0.5}}}"#);
        assert!(matches!(result, Err(SheetscopeError::Config(_))));
    }

    #[test]
    fn test_rejects_out_of_range_ratio() {
        let mut config = AnalysisConfig::default();
        config.profiler.type_confidence = 1.5;
        assert!(config.validate().is_err());
    }
}
