//! Rule-based recommendations from health issues.
//!
//! Issues are grouped by category; each category yields one sentence, so a
//! problem spread over many columns reads as a single recommendation.

use indexmap::IndexMap;

use super::issue::{HealthIssue, IssueCategory, Severity};

/// Generates recommendations from health issues.
pub struct RecommendationEngine;

impl RecommendationEngine {
    /// One recommendation per issue category, highest severity first, then
    /// by first appearance.
    pub fn generate(issues: &[HealthIssue]) -> Vec<String> {
        let mut groups: IndexMap<IssueCategory, Vec<&HealthIssue>> = IndexMap::new();
        for issue in issues {
            groups.entry(issue.category).or_default().push(issue);
        }

        let mut ranked: Vec<(Severity, IssueCategory, Vec<&HealthIssue>)> = groups
            .into_iter()
            .map(|(category, members)| {
                let worst = members
                    .iter()
                    .map(|i| i.severity)
                    .max()
                    .unwrap_or(Severity::Low);
                (worst, category, members)
            })
            .collect();

        // Stable: equal severities keep first-appearance order
        ranked.sort_by(|a, b| b.0.cmp(&a.0));

        ranked
            .into_iter()
            .map(|(_, category, members)| Self::recommend(category, &members))
            .collect()
    }

    fn recommend(category: IssueCategory, issues: &[&HealthIssue]) -> String {
        let action = Self::action(category);

        let mut columns: Vec<&str> = Vec::new();
        for column in issues.iter().filter_map(|i| i.column.as_deref()) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }

        if columns.len() <= 1 {
            return format!("{}; {}.", issues[0].message, action);
        }

        format!(
            "{} {} {}: {}; {}.",
            columns.len(),
            Self::noun(category),
            Self::plural_phrase(category),
            columns.join(", "),
            action
        )
    }

    fn noun(category: IssueCategory) -> &'static str {
        match category {
            IssueCategory::HeaderQuality => "headers",
            IssueCategory::DuplicateValues => "identifier columns",
            _ => "columns",
        }
    }

    fn plural_phrase(category: IssueCategory) -> &'static str {
        match category {
            IssueCategory::EmptyDataset => "are empty",
            IssueCategory::EmptyColumn => "contain no data",
            IssueCategory::MissingValues => "have high null rates",
            IssueCategory::TypeInconsistency => "mix value types",
            IssueCategory::DuplicateValues => "contain duplicate values",
            IssueCategory::HeaderQuality => "need attention",
            IssueCategory::Outliers => "have many outliers",
        }
    }

    fn action(category: IssueCategory) -> &'static str {
        match category {
            IssueCategory::EmptyDataset => "load a file that contains data rows",
            IssueCategory::EmptyColumn => "remove empty columns or check the export",
            IssueCategory::MissingValues => "impute missing values or drop sparse columns",
            IssueCategory::TypeInconsistency => {
                "standardize formats so every value parses as the same type"
            }
            IssueCategory::DuplicateValues => "deduplicate rows or choose a unique key",
            IssueCategory::HeaderQuality => "rename columns with unique, descriptive names",
            IssueCategory::Outliers => "review extreme values for entry errors",
        }
    }
}
