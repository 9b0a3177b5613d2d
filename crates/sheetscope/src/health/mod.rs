//! Dataset health scoring.
//!
//! Combines completeness, consistency, uniqueness, header quality and
//! anomaly sub-scores into one weighted score, and explains the deductions
//! through structured issues and aggregated recommendations.

mod calculator;
mod headers;
mod issue;
mod recommendations;

pub use calculator::{HealthBreakdown, HealthScoreCalculator, HealthScoreResult, calculate_health_score};
pub use headers::{HeaderAssessment, HeaderProblem, assess_headers};
pub use issue::{HealthIssue, IssueCategory, Severity};
pub use recommendations::RecommendationEngine;
