//! Sheetscope: deterministic profiling core for tabular datasets.
//!
//! Sheetscope takes headers plus untyped row records and produces per-column
//! profiles with inferred semantic types, a composite health score, a domain
//! classification and ready-to-render chart specifications.
//!
//! # Core Principles
//!
//! - **Total**: degenerate data (no rows, all-null columns) never fails
//! - **Deterministic**: identical input yields identical output
//! - **Non-destructive**: inputs are never modified
//!
//! # Example
//!
//! ```
//! use sheetscope::{Dataset, Sheetscope, Value};
//!
//! let dataset = Dataset::from_positional(
//!     vec!["date".into(), "revenue".into()],
//!     vec![
//!         vec![Value::from("2024-01-01"), Value::from(100.0)],
//!         vec![Value::from("2024-02-01"), Value::from(120.0)],
//!     ],
//! );
//!
//! let report = Sheetscope::new().analyze(&dataset).unwrap();
//! println!("Health: {}", report.health.breakdown.overall);
//! println!("Charts: {}", report.charts.len());
//! ```

pub mod anomaly;
pub mod chart;
pub mod classify;
pub mod config;
pub mod context;
pub mod error;
pub mod health;
pub mod input;
pub mod profile;

mod sheetscope;

pub use crate::sheetscope::{AnalysisReport, AnalysisSummary, IssueCounts, Sheetscope};
pub use anomaly::{Anomaly, AnomalyType};
pub use chart::{AxisKey, ChartConfig, ChartGenerator, ChartType, generate_charts};
pub use classify::{Classification, DatasetCategory, DatasetClassifier};
pub use config::AnalysisConfig;
pub use context::narrative_context;
pub use error::{Result, SheetscopeError};
pub use health::{
    HealthBreakdown, HealthIssue, HealthScoreCalculator, HealthScoreResult, IssueCategory,
    Severity, calculate_health_score,
};
pub use input::{Dataset, Row, Value};
pub use profile::{ColumnProfiler, EnhancedColumnStats, InferredType, profile_all_columns};
