//! Anomaly records handed to the narrative layer.
//!
//! The core only maps structured health issues to this shape; any prose is
//! written downstream.

use serde::{Deserialize, Serialize};

use crate::health::{HealthIssue, HealthScoreResult, IssueCategory, Severity};

/// Kind of anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    Outlier,
    Missing,
    UnusualPattern,
    DataQuality,
}

impl From<IssueCategory> for AnomalyType {
    fn from(category: IssueCategory) -> Self {
        match category {
            IssueCategory::Outliers => AnomalyType::Outlier,
            IssueCategory::MissingValues | IssueCategory::EmptyColumn => AnomalyType::Missing,
            IssueCategory::TypeInconsistency => AnomalyType::UnusualPattern,
            IssueCategory::DuplicateValues
            | IssueCategory::HeaderQuality
            | IssueCategory::EmptyDataset => AnomalyType::DataQuality,
        }
    }
}

/// A single anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anomaly {
    /// Affected column; empty for dataset-wide anomalies.
    pub column: String,
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub severity: Severity,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub affected_rows: Option<usize>,
}

impl Anomaly {
    /// Build an anomaly carrying the issue's structured message.
    pub fn from_issue(issue: &HealthIssue) -> Self {
        Self {
            column: issue.column.clone().unwrap_or_default(),
            anomaly_type: issue.category.into(),
            severity: issue.severity,
            description: issue.message.clone(),
            affected_rows: issue.affected_rows,
        }
    }
}

/// All anomalies of a health result, in issue order.
pub fn anomalies_from_health(result: &HealthScoreResult) -> Vec<Anomaly> {
    result.issues.iter().map(Anomaly::from_issue).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_issue() {
        let issue = HealthIssue::new(IssueCategory::Outliers, 0.8, 0.95, "Column 'x' has 4 outlier(s) (20% of values)")
            .with_column("x")
            .with_affected_rows(4);
        let anomaly = Anomaly::from_issue(&issue);

        assert_eq!(anomaly.column, "x");
        assert_eq!(anomaly.anomaly_type, AnomalyType::Outlier);
        assert_eq!(anomaly.severity, issue.severity);
        assert_eq!(anomaly.description, issue.message);
        assert_eq!(anomaly.affected_rows, Some(4));
    }

    #[test]
    fn test_serialized_shape() {
        let issue = HealthIssue::new(IssueCategory::EmptyDataset, 0.0, 1.0, "Dataset has no rows");
        let value = serde_json::to_value(Anomaly::from_issue(&issue)).unwrap();
        assert_eq!(value["type"], "data_quality");
        assert_eq!(value["column"], "");
        assert!(value.get("affectedRows").is_none());
    }
}
