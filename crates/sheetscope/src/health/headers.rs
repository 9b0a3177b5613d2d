//! Header quality scoring.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder names left behind by spreadsheet exports.
static GENERIC_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:column|col|field|var|attr|header|unnamed)[\s_:\-]*)?\d+$|^(?:untitled|unknown)$")
        .unwrap()
});

/// Something wrong with a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProblem {
    Empty,
    Duplicate,
    Generic,
    ParseArtifact,
    TooLong,
}

impl HeaderProblem {
    /// Score deduction for this problem.
    pub fn penalty(&self) -> f64 {
        match self {
            HeaderProblem::Empty => 1.0,
            HeaderProblem::Duplicate => 0.5,
            HeaderProblem::Generic => 0.5,
            HeaderProblem::ParseArtifact => 0.3,
            HeaderProblem::TooLong => 0.2,
        }
    }

    /// Short description used in issue messages.
    pub fn describe(&self) -> &'static str {
        match self {
            HeaderProblem::Empty => "is empty",
            HeaderProblem::Duplicate => "is duplicated",
            HeaderProblem::Generic => "is a generic placeholder",
            HeaderProblem::ParseArtifact => "contains parse artifacts",
            HeaderProblem::TooLong => "is too long",
        }
    }
}

/// Quality assessment of a single header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderAssessment {
    /// Position in the header list.
    pub index: usize,
    /// Score in `[0, 1]`.
    pub score: f64,
    pub problems: Vec<HeaderProblem>,
}

impl HeaderAssessment {
    /// Label for messages; blank headers are referred to by position.
    pub fn label(&self, headers: &[String]) -> String {
        let header = headers[self.index].as_str();
        if header.trim().is_empty() {
            format!("column #{}", self.index + 1)
        } else {
            header.to_string()
        }
    }
}

/// Assess every header. Later occurrences of a repeated header
/// (case-insensitive, trimmed) are marked as duplicates.
pub fn assess_headers(headers: &[String], max_length: usize) -> Vec<HeaderAssessment> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let normalized = header.trim().to_lowercase();
            let mut problems = Vec::new();

            if normalized.is_empty() {
                problems.push(HeaderProblem::Empty);
            } else {
                let occurrences = seen.entry(normalized.clone()).or_insert(0);
                *occurrences += 1;
                if *occurrences > 1 {
                    problems.push(HeaderProblem::Duplicate);
                }
                if GENERIC_HEADER.is_match(header.trim()) {
                    problems.push(HeaderProblem::Generic);
                }
                if has_parse_artifacts(header) {
                    problems.push(HeaderProblem::ParseArtifact);
                }
                if header.chars().count() > max_length {
                    problems.push(HeaderProblem::TooLong);
                }
            }

            let penalty: f64 = problems.iter().map(HeaderProblem::penalty).sum();
            HeaderAssessment {
                index,
                score: (1.0 - penalty).clamp(0.0, 1.0),
                problems,
            }
        })
        .collect()
}

fn has_parse_artifacts(header: &str) -> bool {
    header.chars().any(|c| c.is_control() || c == '\u{FEFF}' || c == '\u{FFFD}')
        || header.trim() != header
        || header.contains("__EMPTY")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_headers_score_one() {
        let result = assess_headers(&headers(&["date", "revenue", "region"]), 64);
        assert!(result.iter().all(|h| h.score == 1.0 && h.problems.is_empty()));
    }

    #[test]
    fn test_empty_header_scores_zero() {
        let result = assess_headers(&headers(&["name", "  "]), 64);
        assert_eq!(result[1].score, 0.0);
        assert_eq!(result[1].problems, vec![HeaderProblem::Empty]);
        assert_eq!(result[1].label(&headers(&["name", "  "])), "column #2");
    }

    #[test]
    fn test_duplicate_marks_later_occurrence() {
        let result = assess_headers(&headers(&["Amount", " amount"]), 64);
        assert!(result[0].problems.is_empty());
        assert!(result[1].problems.contains(&HeaderProblem::Duplicate));
        assert!(result[1].problems.contains(&HeaderProblem::ParseArtifact));
        assert!((result[1].score - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_generic_headers() {
        for name in ["Column1", "field_2", "Unnamed: 3", "42", "col 7"] {
            let result = assess_headers(&headers(&[name]), 64);
            assert_eq!(result[0].problems, vec![HeaderProblem::Generic], "{name}");
        }
        let result = assess_headers(&headers(&["column_name"]), 64);
        assert!(result[0].problems.is_empty());
    }

    #[test]
    fn test_artifacts_and_length() {
        let result = assess_headers(&headers(&["\u{FEFF}id", "__EMPTY_1"]), 64);
        assert_eq!(result[0].problems, vec![HeaderProblem::ParseArtifact]);
        assert!(result[1].problems.contains(&HeaderProblem::ParseArtifact));

        let long = "x".repeat(70);
        let result = assess_headers(&[long], 64);
        assert_eq!(result[0].problems, vec![HeaderProblem::TooLong]);
        assert!((result[0].score - 0.8).abs() < 1e-9);
    }
}
