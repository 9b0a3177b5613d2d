//! Main Sheetscope struct and public API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn};

use crate::chart::{ChartConfig, ChartGenerator};
use crate::classify::{Classification, DatasetClassifier};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::health::{HealthScoreCalculator, HealthScoreResult, Severity};
use crate::input::Dataset;
use crate::profile::{ColumnProfiler, EnhancedColumnStats};

/// Result of analyzing a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// One profile per header, in header order.
    pub columns: Vec<EnhancedColumnStats>,
    /// Composite health score.
    pub health: HealthScoreResult,
    /// Ready-to-render charts.
    pub charts: Vec<ChartConfig>,
    /// Domain classification; absent when the classifier failed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub classification: Option<Classification>,
    /// Summary counts.
    pub summary: AnalysisSummary,
}

/// Summary of the analysis results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    /// Total number of rows.
    pub total_rows: usize,
    /// Total number of columns.
    pub total_columns: usize,
    /// Columns by inferred type label.
    pub columns_by_type: BTreeMap<String, usize>,
    /// Issues by severity.
    pub issues_by_severity: IssueCounts,
    /// Overall health score (0-100).
    pub health_score: f64,
}

/// Counts of issues by severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// The main analysis pipeline.
#[derive(Debug, Clone, Default)]
pub struct Sheetscope {
    config: AnalysisConfig,
}

impl Sheetscope {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Profile the dataset's columns.
    pub fn profile(&self, dataset: &Dataset) -> Result<Vec<EnhancedColumnStats>> {
        self.profiler().profile_dataset(dataset)
    }

    /// Classify the dataset from a row sample.
    pub fn classify(&self, dataset: &Dataset) -> Result<Classification> {
        self.classifier().classify_sample(&dataset.headers, &dataset.rows)
    }

    /// Run the full pipeline.
    ///
    /// The classifier runs on its own thread alongside the profiler. A
    /// profiler failure aborts the analysis; a classifier failure only drops
    /// the classification.
    pub fn analyze(&self, dataset: &Dataset) -> Result<AnalysisReport> {
        let span = info_span!("analyze", rows = dataset.row_count(), columns = dataset.column_count());
        let _guard = span.enter();

        self.config.validate()?;

        let classifier = self.classifier();
        let (columns, classification) = std::thread::scope(|scope| {
            let handle = scope.spawn(|| classifier.classify_sample(&dataset.headers, &dataset.rows));
            let columns = self.profile(dataset);
            let classification = match handle.join() {
                Ok(Ok(classification)) => Some(classification),
                Ok(Err(e)) => {
                    warn!(error = %e, "classification failed");
                    None
                }
                Err(_) => {
                    warn!("classifier thread panicked");
                    None
                }
            };
            (columns, classification)
        });
        let columns = columns?;

        let health = HealthScoreCalculator::with_config(self.config.health.clone()).calculate(
            &columns,
            dataset.row_count(),
            &dataset.headers,
        )?;
        let charts = ChartGenerator::with_config(self.config.charts.clone()).generate(&columns, &dataset.rows);

        let summary = summarize(&columns, &health, dataset.row_count());
        debug!(
            health = summary.health_score,
            charts = charts.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            columns,
            health,
            charts,
            classification,
            summary,
        })
    }

    fn profiler(&self) -> ColumnProfiler {
        ColumnProfiler::with_config(self.config.profiler.clone()).with_limits(self.config.input.clone())
    }

    fn classifier(&self) -> DatasetClassifier {
        DatasetClassifier::with_config(self.config.classifier.clone())
            .with_limits(self.config.input.clone())
    }
}

fn summarize(columns: &[EnhancedColumnStats], health: &HealthScoreResult, rows: usize) -> AnalysisSummary {
    let mut columns_by_type = BTreeMap::new();
    for column in columns {
        *columns_by_type
            .entry(column.inferred_type().label().to_string())
            .or_insert(0) += 1;
    }

    AnalysisSummary {
        total_rows: rows,
        total_columns: columns.len(),
        columns_by_type,
        issues_by_severity: IssueCounts {
            high: health.count_by_severity(Severity::High),
            medium: health.count_by_severity(Severity::Medium),
            low: health.count_by_severity(Severity::Low),
        },
        health_score: health.breakdown.overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetscopeError;
    use crate::input::Value;

    fn sample() -> Dataset {
        Dataset::from_positional(
            vec!["employee".to_string(), "salary".to_string(), "department".to_string()],
            (0..8)
                .map(|i| {
                    vec![
                        Value::from(format!("E{i}")),
                        Value::from(50_000.0 + 1_000.0 * i as f64),
                        Value::from(if i % 2 == 0 { "eng" } else { "ops" }),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn test_analyze_produces_full_report() {
        let report = Sheetscope::new().analyze(&sample()).unwrap();
        assert_eq!(report.columns.len(), 3);
        assert_eq!(report.summary.total_rows, 8);
        assert_eq!(report.summary.columns_by_type.get("numeric"), Some(&1));
        assert!(!report.charts.is_empty());
        assert_eq!(
            report.classification.map(|c| c.category),
            Some(crate::classify::DatasetCategory::Hr)
        );
    }

    #[test]
    fn test_profiler_failure_is_fatal() {
        let dataset = Dataset::new(vec![], vec![]);
        let err = Sheetscope::new().analyze(&dataset).unwrap_err();
        assert!(matches!(err, SheetscopeError::EmptyHeaders));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.profiler.type_confidence = 1.5;
        let err = Sheetscope::with_config(config).analyze(&sample()).unwrap_err();
        assert!(matches!(err, SheetscopeError::Config(_)));
    }
}
