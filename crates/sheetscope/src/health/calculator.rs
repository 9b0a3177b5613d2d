//! Health score calculation.
//!
//! Turns column profiles into a 0-100 score with five weighted sub-scores,
//! plus the structured issues and recommendations explaining the deductions.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnalysisConfig, HealthConfig};
use crate::error::{Result, SheetscopeError};
use crate::profile::EnhancedColumnStats;

use super::headers::{HeaderAssessment, assess_headers};
use super::issue::{HealthIssue, IssueCategory, Severity};
use super::recommendations::RecommendationEngine;

/// Sub-scores and overall score, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBreakdown {
    pub completeness: f64,
    pub uniqueness: f64,
    pub consistency: f64,
    pub header_quality: f64,
    pub anomaly_score: f64,
    pub overall: f64,
}

/// Result of a health calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    pub breakdown: HealthBreakdown,
    /// Issues sorted by severity (highest first), then column order.
    pub issues: Vec<HealthIssue>,
    /// One recommendation per issue category.
    pub recommendations: Vec<String>,
}

impl HealthScoreResult {
    /// Number of issues with the given severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Calculate the health score of profiled columns with the given configuration.
pub fn calculate_health_score(
    stats: &[EnhancedColumnStats],
    row_count: usize,
    headers: &[String],
    config: &AnalysisConfig,
) -> Result<HealthScoreResult> {
    HealthScoreCalculator::with_config(config.health.clone()).calculate(stats, row_count, headers)
}

/// Calculates dataset health from column profiles.
#[derive(Debug, Clone, Default)]
pub struct HealthScoreCalculator {
    config: HealthConfig,
}

impl HealthScoreCalculator {
    /// Create a calculator with default weights and thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a calculator with custom weights and thresholds.
    pub fn with_config(config: HealthConfig) -> Self {
        Self { config }
    }

    /// Score the dataset.
    ///
    /// `stats` and `headers` must be parallel (one profile per header).
    pub fn calculate(
        &self,
        stats: &[EnhancedColumnStats],
        row_count: usize,
        headers: &[String],
    ) -> Result<HealthScoreResult> {
        self.config.weights.validate()?;
        if headers.is_empty() {
            return Err(SheetscopeError::EmptyHeaders);
        }
        if stats.len() != headers.len() {
            return Err(SheetscopeError::ColumnCountMismatch {
                stats: stats.len(),
                headers: headers.len(),
            });
        }
        let identifier = Regex::new(&self.config.identifier_pattern)?;

        let assessments = assess_headers(headers, self.config.max_header_length);
        let named_identifier: Vec<bool> = stats
            .iter()
            .map(|c| identifier.is_match(c.name.trim()))
            .collect();

        // Agreement and distinctness are counted against all rows, so a value
        // going missing can lower these sub-scores but never raise them
        let completeness = mean(stats.iter().map(|c| c.quality.completeness));
        let consistency = mean(stats.iter().map(|c| row_share(agreeing_values(c), c.count)));
        let uniqueness = mean(stats.iter().zip(&named_identifier).map(|(c, &named)| {
            if named && c.count > 0 {
                row_share(c.unique_values, c.count)
            } else {
                1.0
            }
        }));
        let header_quality = mean(assessments.iter().map(|h| h.score));

        // Outliers per cell
        let total_outliers: usize = stats.iter().filter_map(|c| c.outliers()).map(|o| o.count).sum();
        let cells = row_count * stats.len();
        let anomaly = if cells == 0 {
            1.0
        } else {
            1.0 - self.config.anomaly_penalty_factor * total_outliers as f64 / cells as f64
        };

        let weights = &self.config.weights;
        let breakdown = {
            let completeness = to_score(completeness);
            let uniqueness = to_score(uniqueness);
            let consistency = to_score(consistency);
            let header_quality = to_score(header_quality);
            let anomaly_score = to_score(anomaly);
            let overall = (weights.completeness * completeness
                + weights.consistency * consistency
                + weights.uniqueness * uniqueness
                + weights.header_quality * header_quality
                + weights.anomaly * anomaly_score)
                .round()
                .clamp(0.0, 100.0);

            HealthBreakdown {
                completeness,
                uniqueness,
                consistency,
                header_quality,
                anomaly_score,
                overall,
            }
        };

        let mut issues = Vec::new();
        if row_count == 0 {
            issues.push(
                HealthIssue::new(IssueCategory::EmptyDataset, 0.0, 1.0, "Dataset has no rows")
                    .with_severity(Severity::High),
            );
        }
        for (column, &named) in stats.iter().zip(&named_identifier) {
            self.column_issues(column, named, &mut issues);
        }
        header_issues(&assessments, headers, &mut issues);

        // Stable sort keeps column order within a severity
        issues.sort_by(|a, b| b.severity.cmp(&a.severity));

        let recommendations = RecommendationEngine::generate(&issues);

        debug!(
            overall = breakdown.overall,
            issues = issues.len(),
            "calculated health score"
        );

        Ok(HealthScoreResult {
            breakdown,
            issues,
            recommendations,
        })
    }

    fn column_issues(
        &self,
        column: &EnhancedColumnStats,
        named_identifier: bool,
        issues: &mut Vec<HealthIssue>,
    ) {
        let name = column.name.as_str();
        let quality = &column.quality;

        if column.count == 0 {
            return;
        }

        if column.non_null_count() == 0 {
            issues.push(
                HealthIssue::new(
                    IssueCategory::EmptyColumn,
                    0.0,
                    self.config.acceptable_completeness,
                    format!("Column '{name}' contains no data"),
                )
                .with_column(name)
                .with_severity(Severity::High)
                .with_affected_rows(column.count),
            );
            return;
        }

        if column.null_count > 0 {
            issues.push(
                HealthIssue::new(
                    IssueCategory::MissingValues,
                    quality.completeness,
                    self.config.acceptable_completeness,
                    format!("Column '{name}' is {:.0}% empty", column.null_percentage()),
                )
                .with_column(name)
                .with_affected_rows(column.null_count),
            );
        }

        let agreeing = agreeing_values(column);
        if agreeing < column.non_null_count() {
            issues.push(
                HealthIssue::new(
                    IssueCategory::TypeInconsistency,
                    quality.consistency,
                    self.config.acceptable_consistency,
                    format!(
                        "Column '{name}' mixes value types (only {:.0}% agree on {})",
                        quality.consistency * 100.0,
                        column.inferred_type()
                    ),
                )
                .with_column(name)
                .with_affected_rows(column.non_null_count() - agreeing),
            );
        }

        if named_identifier && column.unique_values < column.count {
            let repeated = column.count - column.unique_values;
            issues.push(
                HealthIssue::new(
                    IssueCategory::DuplicateValues,
                    row_share(column.unique_values, column.count),
                    self.config.acceptable_uniqueness,
                    format!(
                        "Identifier column '{name}' has {} distinct value(s) in {} rows",
                        column.unique_values, column.count
                    ),
                )
                .with_column(name)
                .with_affected_rows(repeated),
            );
        }

        if let Some(outliers) = column.outliers().filter(|o| o.count > 0) {
            let rate = outliers.count as f64 / column.non_null_count() as f64;
            issues.push(
                HealthIssue::new(
                    IssueCategory::Outliers,
                    1.0 - rate,
                    1.0 - self.config.acceptable_outlier_rate,
                    format!(
                        "Column '{name}' has {} outlier(s) ({:.0}% of values)",
                        outliers.count,
                        rate * 100.0
                    ),
                )
                .with_column(name)
                .with_affected_rows(outliers.count),
            );
        }
    }
}

fn header_issues(assessments: &[HeaderAssessment], headers: &[String], issues: &mut Vec<HealthIssue>) {
    for assessment in assessments.iter().filter(|h| !h.problems.is_empty()) {
        let label = assessment.label(headers);
        let problems = assessment
            .problems
            .iter()
            .map(|p| p.describe())
            .collect::<Vec<_>>()
            .join(" and ");

        issues.push(
            HealthIssue::new(
                IssueCategory::HeaderQuality,
                assessment.score,
                1.0,
                format!("Header '{label}' {problems}"),
            )
            .with_column(label),
        );
    }
}

/// Non-null values agreeing with the inferred type.
fn agreeing_values(column: &EnhancedColumnStats) -> usize {
    (column.quality.consistency * column.non_null_count() as f64).round() as usize
}

fn row_share(part: usize, rows: usize) -> f64 {
    if rows == 0 { 0.0 } else { part as f64 / rows as f64 }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Scale a ratio to `[0, 100]`, rounded to two decimals.
fn to_score(ratio: f64) -> f64 {
    ((ratio * 100.0).clamp(0.0, 100.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthWeights;
    use crate::input::{Dataset, Value};
    use crate::profile::ColumnProfiler;

    fn dataset(headers: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
        Dataset::from_positional(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    fn score(dataset: &Dataset) -> HealthScoreResult {
        let stats = ColumnProfiler::new().profile_dataset(dataset).unwrap();
        HealthScoreCalculator::new()
            .calculate(&stats, dataset.row_count(), &dataset.headers)
            .unwrap()
    }

    fn clean() -> Dataset {
        dataset(
            &["order_id", "region", "amount"],
            (0..20)
                .map(|i| {
                    vec![
                        Value::from(i as i64),
                        Value::from(if i % 2 == 0 { "north" } else { "south" }),
                        Value::from(10.0 + i as f64),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn test_clean_dataset_scores_full() {
        let result = score(&clean());
        assert_eq!(result.breakdown.overall, 100.0);
        assert!(result.issues.is_empty());
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_category_repeats_do_not_cost_uniqueness() {
        let result = score(&clean());
        assert_eq!(result.breakdown.uniqueness, 100.0);
    }

    #[test]
    fn test_missing_values_lower_score() {
        let mut data = clean();
        for row in data.rows.iter_mut().take(8) {
            row.insert("amount".to_string(), Value::Null);
        }
        let result = score(&data);
        assert!(result.breakdown.completeness < 100.0);
        assert!(result.breakdown.overall < 100.0);

        let issue = &result.issues[0];
        assert_eq!(issue.category, IssueCategory::MissingValues);
        assert_eq!(issue.column.as_deref(), Some("amount"));
        assert_eq!(issue.severity, Severity::Medium);
        assert_eq!(issue.affected_rows, Some(8));
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_empty_column_is_high_severity() {
        let mut data = clean();
        data.headers.push("notes".to_string());
        let result = score(&data);
        let issue = &result.issues[0];
        assert_eq!(issue.category, IssueCategory::EmptyColumn);
        assert_eq!(issue.severity, Severity::High);
        assert!(!result.issues.iter().any(|i| i.category == IssueCategory::MissingValues));
    }

    #[test]
    fn test_duplicate_identifiers() {
        let mut data = clean();
        for row in data.rows.iter_mut().take(10) {
            row.insert("order_id".to_string(), Value::from(1i64));
        }
        let result = score(&data);
        assert!(result.breakdown.uniqueness < 100.0);
        assert!(result.issues.iter().any(|i| i.category == IssueCategory::DuplicateValues));
    }

    #[test]
    fn test_outliers_reduce_anomaly_score() {
        let mut data = clean();
        data.rows[0].insert("amount".to_string(), Value::from(10_000.0));
        data.rows[1].insert("amount".to_string(), Value::from(-10_000.0));
        let result = score(&data);
        // 2 outliers over 20 rows x 3 columns
        assert_eq!(result.breakdown.anomaly_score, 96.67);
        assert!(result.issues.iter().any(|i| i.category == IssueCategory::Outliers));
    }

    #[test]
    fn test_single_outlier_raises_low_issue() {
        let mut rows: Vec<Vec<Value>> = (0..40).map(|i| vec![Value::from(10.0 + i as f64)]).collect();
        rows[0] = vec![Value::from(10_000.0)];
        let result = score(&dataset(&["amount"], rows));

        assert_eq!(result.breakdown.anomaly_score, 97.5);
        let issue = &result.issues[0];
        assert_eq!(issue.category, IssueCategory::Outliers);
        assert_eq!(issue.severity, Severity::Low);
        assert_eq!(issue.affected_rows, Some(1));
    }

    #[test]
    fn test_small_gaps_still_raise_issues() {
        let mut data = clean();
        data.rows[3].insert("amount".to_string(), Value::Null);
        data.rows[5].insert("region".to_string(), Value::from(42.0));
        data.rows[7].insert("order_id".to_string(), Value::from(8i64));
        let result = score(&data);

        assert!(result.breakdown.completeness < 100.0);
        assert!(result.breakdown.consistency < 100.0);
        assert!(result.breakdown.uniqueness < 100.0);
        let categories: Vec<IssueCategory> = result.issues.iter().map(|i| i.category).collect();
        assert!(categories.contains(&IssueCategory::MissingValues));
        assert!(categories.contains(&IssueCategory::TypeInconsistency));
        assert!(categories.contains(&IssueCategory::DuplicateValues));
        assert!(result.issues.iter().all(|i| i.severity == Severity::Low));
    }

    #[test]
    fn test_blanking_mismatched_values_does_not_raise_score() {
        let values: Vec<Value> = (1..=5)
            .map(|i| Value::from(i as i64))
            .chain((0..5).map(|_| Value::from("x")))
            .collect();
        let before = score(&dataset(&["id"], values.iter().cloned().map(|v| vec![v]).collect()));

        let blanked: Vec<Vec<Value>> = values
            .into_iter()
            .map(|v| vec![if v == Value::from("x") { Value::Null } else { v }])
            .collect();
        let after = score(&dataset(&["id"], blanked));

        assert!(after.breakdown.completeness < before.breakdown.completeness);
        assert!(after.breakdown.consistency <= before.breakdown.consistency);
        assert!(after.breakdown.uniqueness <= before.breakdown.uniqueness);
        assert!(after.breakdown.overall < before.breakdown.overall);
    }

    #[test]
    fn test_text_columns_are_not_scored_for_uniqueness() {
        let rows = (0..10)
            .map(|i| vec![Value::from(format!("a fairly long free-text remark number {}", i % 6))])
            .collect();
        let result = score(&dataset(&["remarks"], rows));
        assert_eq!(result.breakdown.uniqueness, 100.0);
        assert!(!result.issues.iter().any(|i| i.category == IssueCategory::DuplicateValues));
    }

    #[test]
    fn test_bad_headers() {
        let data = dataset(&["Column1", "name", "Name"], vec![vec![1i64.into(), "a".into(), "b".into()]]);
        let result = score(&data);
        assert!((result.breakdown.header_quality - 66.67).abs() < 0.01);
        let header_issues: Vec<_> = result
            .issues
            .iter()
            .filter(|i| i.category == IssueCategory::HeaderQuality)
            .collect();
        assert_eq!(header_issues.len(), 2);
    }

    #[test]
    fn test_zero_rows() {
        let data = dataset(&["a", "b"], vec![]);
        let result = score(&data);
        assert_eq!(result.breakdown.anomaly_score, 100.0);
        assert_eq!(result.breakdown.completeness, 0.0);
        assert_eq!(result.issues[0].category, IssueCategory::EmptyDataset);
    }

    #[test]
    fn test_mismatched_lengths() {
        let data = clean();
        let stats = ColumnProfiler::new().profile_dataset(&data).unwrap();
        let err = HealthScoreCalculator::new()
            .calculate(&stats[..2], data.row_count(), &data.headers)
            .unwrap_err();
        assert!(matches!(err, SheetscopeError::ColumnCountMismatch { stats: 2, headers: 3 }));
    }

    #[test]
    fn test_invalid_weights() {
        let data = clean();
        let stats = ColumnProfiler::new().profile_dataset(&data).unwrap();
        let calculator = HealthScoreCalculator::with_config(HealthConfig {
            weights: HealthWeights {
                completeness: 0.9,
                ..HealthWeights::default()
            },
            ..HealthConfig::default()
        });
        let err = calculator.calculate(&stats, data.row_count(), &data.headers).unwrap_err();
        assert!(matches!(err, SheetscopeError::Config(_)));
    }

    #[test]
    fn test_issues_sorted_by_severity() {
        let mut data = clean();
        data.headers.push("notes".to_string());
        for row in data.rows.iter_mut().take(2) {
            row.insert("amount".to_string(), Value::Null);
        }
        let result = score(&data);
        let severities: Vec<Severity> = result.issues.iter().map(|i| i.severity).collect();
        let mut sorted = severities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(severities, sorted);
    }
}
