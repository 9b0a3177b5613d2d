//! Column profiling: semantic type inference and per-column statistics.

mod column;
mod profiler;
pub mod statistics;
mod types;
pub mod values;

pub use column::{
    BooleanDetail, CategoryCount, CategoryDetail, ColumnDetail, ColumnQuality, DateDetail,
    DateRange, EnhancedColumnStats, NumericDetail, OutlierSummary, TextDetail, find_column,
};
pub use profiler::{ColumnProfiler, profile_all_columns};
pub use types::{CoarseType, InferredType, OutlierMethod};
