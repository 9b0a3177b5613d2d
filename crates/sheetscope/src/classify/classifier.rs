//! Heuristic dataset domain classification.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ClassifierConfig, InputLimits};
use crate::error::Result;
use crate::input::{Row, Value, cell, validate_shape};
use crate::profile::values::{has_time_component, is_currency_text};

use super::vocabulary::{DOMAINS, DatasetCategory, DomainVocabulary};

/// Confidence reported when no domain shows enough evidence.
const NO_EVIDENCE_CONFIDENCE: f64 = 0.1;
/// Confidence reported when the leading domains tie.
const TIE_CONFIDENCE: f64 = 0.3;

/// Score of one candidate domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainScore {
    pub category: DatasetCategory,
    pub score: f64,
}

/// Result of classifying a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub category: DatasetCategory,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Every candidate domain, highest score first.
    pub scores: Vec<DomainScore>,
    /// Vocabulary keywords found in the headers for the chosen domain.
    pub matched_keywords: Vec<String>,
}

/// Evidence gathered from the values of one column.
#[derive(Debug, Default)]
struct ColumnSignals {
    currency: bool,
    timestamp: bool,
    tokens: HashSet<String>,
}

impl ColumnSignals {
    fn gather(header: &str, rows: &[Row]) -> Self {
        let mut signals = Self::default();
        for row in rows {
            if let Value::Text(text) = cell(row, header) {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                signals.currency |= is_currency_text(trimmed);
                signals.timestamp |= has_time_component(trimmed);
                signals.tokens.insert(trimmed.to_lowercase());
            }
        }
        signals
    }

    fn hits_hints(&self, domain: &DomainVocabulary) -> bool {
        domain.value_hints.iter().any(|hint| self.tokens.contains(*hint))
    }
}

/// Classifies datasets into a business domain from headers and values.
#[derive(Debug, Clone, Default)]
pub struct DatasetClassifier {
    config: ClassifierConfig,
    limits: InputLimits,
}

impl DatasetClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with custom settings.
    pub fn with_config(config: ClassifierConfig) -> Self {
        Self {
            config,
            limits: InputLimits::default(),
        }
    }

    /// Override the input contract tolerances.
    pub fn with_limits(mut self, limits: InputLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Classify using only the first `sample_rows` rows.
    pub fn classify_sample(&self, headers: &[String], rows: &[Row]) -> Result<Classification> {
        let end = rows.len().min(self.config.sample_rows);
        self.classify(headers, &rows[..end])
    }

    /// Classify a dataset.
    ///
    /// Each domain earns one point per header containing one of its keywords
    /// and `signal_weight` per column showing one of its value signals.
    pub fn classify(&self, headers: &[String], rows: &[Row]) -> Result<Classification> {
        validate_shape(headers, rows, &self.limits)?;

        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let signals: Vec<ColumnSignals> = headers
            .iter()
            .map(|h| ColumnSignals::gather(h, rows))
            .collect();

        let mut scored: Vec<(DomainScore, usize, Vec<String>)> = DOMAINS
            .iter()
            .map(|domain| self.score_domain(domain, &lowered, &signals))
            .collect();

        // Stable: equal scores keep vocabulary order
        scored.sort_by(|a, b| b.0.score.total_cmp(&a.0.score));

        let best = scored.first().map(|s| s.0.score).unwrap_or(0.0);
        let second = scored.get(1).map(|s| s.0.score).unwrap_or(0.0);

        let (category, confidence, matched_keywords) = if best < self.config.min_score {
            (DatasetCategory::General, NO_EVIDENCE_CONFIDENCE, Vec::new())
        } else if best == second {
            (DatasetCategory::General, TIE_CONFIDENCE, Vec::new())
        } else {
            let (winner, matched_headers, keywords) = &scored[0];
            let coverage = *matched_headers as f64 / headers.len() as f64;
            let margin = (best - second) / best;
            let confidence = (0.5 * coverage + 0.5 * margin).clamp(0.05, 0.99);
            (winner.category, round3(confidence), keywords.clone())
        };

        debug!(
            category = %category,
            confidence,
            best_score = best,
            rows = rows.len(),
            "classified dataset"
        );

        Ok(Classification {
            category,
            confidence,
            scores: scored.into_iter().map(|(score, _, _)| score).collect(),
            matched_keywords,
        })
    }

    /// Score one domain; also returns matched header count and keywords.
    fn score_domain(
        &self,
        domain: &DomainVocabulary,
        headers: &[String],
        signals: &[ColumnSignals],
    ) -> (DomainScore, usize, Vec<String>) {
        let mut score = 0.0;
        let mut matched_headers = 0;
        let mut keywords: Vec<String> = Vec::new();

        for header in headers {
            if let Some(keyword) = domain.keywords.iter().find(|k| header.contains(*k)) {
                score += 1.0;
                matched_headers += 1;
                if !keywords.iter().any(|k| k == keyword) {
                    keywords.push(keyword.to_string());
                }
            }
        }

        let weight = self.config.signal_weight;
        for column in signals {
            if domain.currency_signal && column.currency {
                score += weight;
            }
            if domain.timestamp_signal && column.timestamp {
                score += weight;
            }
            if column.hits_hints(domain) {
                score += weight;
            }
        }

        (
            DomainScore {
                category: domain.category,
                score,
            },
            matched_headers,
            keywords,
        )
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetscopeError;
    use crate::input::Dataset;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn dataset(names: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
        Dataset::from_positional(headers(names), rows)
    }

    #[test]
    fn test_unknown_headers_are_general() {
        let data = dataset(&["x", "y", "z"], vec![vec![1i64.into(), 2i64.into(), 3i64.into()]]);
        let result = DatasetClassifier::new().classify(&data.headers, &data.rows).unwrap();
        assert_eq!(result.category, DatasetCategory::General);
        assert!(result.confidence <= 0.1);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_sales_dataset() {
        let data = dataset(
            &["date", "revenue", "region"],
            vec![
                vec!["2024-01-01".into(), 100.0.into(), "north".into()],
                vec!["2024-02-01".into(), 120.0.into(), "south".into()],
            ],
        );
        let result = DatasetClassifier::new().classify(&data.headers, &data.rows).unwrap();
        assert_eq!(result.category, DatasetCategory::Sales);
        assert!(result.confidence > 0.5 && result.confidence <= 0.99);
        assert_eq!(result.matched_keywords, vec!["revenue", "region"]);
        assert_eq!(result.scores[0].category, DatasetCategory::Sales);
    }

    #[test]
    fn test_log_data_from_values() {
        let data = dataset(
            &["timestamp", "level", "message"],
            vec![
                vec!["2024-03-01T10:00:00Z".into(), "INFO".into(), "started".into()],
                vec!["2024-03-01T10:00:05Z".into(), "ERROR".into(), "failed".into()],
            ],
        );
        let result = DatasetClassifier::new().classify(&data.headers, &data.rows).unwrap();
        assert_eq!(result.category, DatasetCategory::LogData);
        assert_eq!(result.scores[0].score, 4.0);
    }

    #[test]
    fn test_tie_falls_back_to_general() {
        // One keyword each for healthcare and hr
        let data = dataset(&["patient", "salary"], vec![]);
        let result = DatasetClassifier::new().classify(&data.headers, &data.rows).unwrap();
        assert_eq!(result.category, DatasetCategory::General);
        assert_eq!(result.confidence, 0.3);
    }

    #[test]
    fn test_sample_matches_full_classification() {
        let rows: Vec<Vec<Value>> = (0..50)
            .map(|i| {
                vec![
                    format!("E{i}").into(),
                    (40_000.0 + i as f64).into(),
                    (if i % 2 == 0 { "Engineering" } else { "Sales" }).into(),
                ]
            })
            .collect();
        let data = dataset(&["employee", "salary", "department"], rows);
        let classifier = DatasetClassifier::new();
        let sample = classifier.classify_sample(&data.headers, &data.rows).unwrap();
        let full = classifier.classify(&data.headers, &data.rows).unwrap();
        assert_eq!(sample.category, DatasetCategory::Hr);
        assert_eq!(sample.category, full.category);
    }

    #[test]
    fn test_currency_values_count_as_evidence() {
        let data = dataset(
            &["amount", "balance"],
            vec![vec!["$1,200.00".into(), "$300".into()]],
        );
        let result = DatasetClassifier::new().classify(&data.headers, &data.rows).unwrap();
        assert_eq!(result.category, DatasetCategory::Financial);
        let financial = result
            .scores
            .iter()
            .find(|s| s.category == DatasetCategory::Financial)
            .unwrap();
        assert_eq!(financial.score, 2.0);
    }

    #[test]
    fn test_empty_headers_error() {
        let err = DatasetClassifier::new().classify(&[], &[]).unwrap_err();
        assert!(matches!(err, SheetscopeError::EmptyHeaders));
    }
}
