//! Chart specification generation from column profiles and rows.

mod generator;
mod spec;

pub use generator::{ChartGenerator, generate_charts};
pub use spec::{AxisKey, ChartConfig, ChartRecord, ChartType};
