//! Chart selection and data materialization.
//!
//! One pass over the column profiles picks a chart per column; cross-column
//! charts (time series, strongest correlation, correlation matrix) follow.
//! A chart whose data would be empty or degenerate is never emitted.

use chrono::NaiveDate;
use serde_json::json;
use tracing::debug;

use crate::config::{AnalysisConfig, ChartSettings};
use crate::input::{Row, cell, format_number, number_to_json};
use crate::profile::statistics::pearson;
use crate::profile::values::{as_date, as_number};
use crate::profile::{CategoryCount, ColumnDetail, EnhancedColumnStats, InferredType};

use super::spec::{ChartConfig, ChartRecord, ChartType};

/// Generate charts with the given configuration.
pub fn generate_charts(
    stats: &[EnhancedColumnStats],
    rows: &[Row],
    config: &AnalysisConfig,
) -> Vec<ChartConfig> {
    ChartGenerator::with_config(config.charts.clone()).generate(stats, rows)
}

/// Picks chart types for profiled columns and builds their data.
#[derive(Debug, Clone, Default)]
pub struct ChartGenerator {
    settings: ChartSettings,
}

impl ChartGenerator {
    /// Create a generator with default caps and palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator with custom caps and palette.
    pub fn with_config(settings: ChartSettings) -> Self {
        Self { settings }
    }

    /// Generate charts in column order, cross-column charts last.
    pub fn generate(&self, stats: &[EnhancedColumnStats], rows: &[Row]) -> Vec<ChartConfig> {
        let date_column = stats
            .iter()
            .find(|c| c.inferred_type() == InferredType::Date)
            .map(|c| c.name.as_str());
        // Repeated headers resolve to the first column of that name
        let distinct: Vec<&EnhancedColumnStats> = stats
            .iter()
            .enumerate()
            .filter(|(i, c)| stats[..*i].iter().all(|p| p.name != c.name))
            .map(|(_, c)| c)
            .collect();
        let numeric: Vec<&EnhancedColumnStats> =
            distinct.iter().copied().filter(|c| has_range(c)).collect();

        let mut charts = Vec::new();

        for column in distinct {
            let chart = match &column.detail {
                ColumnDetail::Numeric(_) if has_range(column) => match date_column {
                    Some(date) => self.line_chart(date, &column.name, rows),
                    None => self.histogram(&column.name, rows),
                },
                ColumnDetail::Category(detail) => self.category_chart(column, &detail.top_categories),
                ColumnDetail::Boolean(detail) if detail.true_count > 0 && detail.false_count > 0 => {
                    Some(self.boolean_chart(&column.name, detail.true_count, detail.false_count))
                }
                _ => None,
            };
            charts.extend(chart);
        }

        if let Some(date) = date_column {
            charts.extend(self.time_series(date, &numeric, rows));
        }
        charts.extend(self.strongest_scatter(&numeric, rows));
        if numeric.len() >= 3 {
            charts.extend(self.correlation_heatmap(&numeric, rows));
        }

        debug!(charts = charts.len(), "generated charts");
        charts
    }

    // ========================================================================
    // Per-column charts
    // ========================================================================

    fn line_chart(&self, date: &str, column: &str, rows: &[Row]) -> Option<ChartConfig> {
        let points = sorted_by_date(rows, date, |row| as_number(cell(row, column)));
        if !has_spread(points.iter().map(|(_, value)| *value)) {
            return None;
        }

        let data = points
            .iter()
            .map(|(day, value)| {
                record([(date, date_json(day)), (column, number_to_json(*value))])
            })
            .collect();

        Some(
            ChartConfig::new(ChartType::Line, format!("{column} over time"), data)
                .with_x_axis(date)
                .with_y_axis(column)
                .with_colors(self.colors(1))
                .with_explanation(format!("{} points ordered by {date}", points.len())),
        )
    }

    fn histogram(&self, column: &str, rows: &[Row]) -> Option<ChartConfig> {
        let values: Vec<f64> = rows.iter().filter_map(|r| as_number(cell(r, column))).collect();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() || min >= max {
            return None;
        }

        // Sturges' rule
        let bins = ((values.len() as f64).log2().ceil() as usize + 1)
            .clamp(1, self.settings.max_histogram_bins.max(1));
        let width = (max - min) / bins as f64;

        let mut counts = vec![0usize; bins];
        for value in &values {
            let index = (((value - min) / width).floor() as usize).min(bins - 1);
            counts[index] += 1;
        }

        let data = counts
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let start = min + width * i as f64;
                let end = if i + 1 == bins { max } else { start + width };
                record([
                    ("range", json!(format!("{}-{}", label(start), label(end)))),
                    ("start", number_to_json(round2(start))),
                    ("end", number_to_json(round2(end))),
                    ("count", json!(count)),
                ])
            })
            .collect();

        Some(
            ChartConfig::new(ChartType::Histogram, format!("Distribution of {column}"), data)
                .with_x_axis("range")
                .with_y_axis("count")
                .with_colors(self.colors(1))
                .with_explanation(format!("{} values in {bins} bins", values.len())),
        )
    }

    fn category_chart(
        &self,
        column: &EnhancedColumnStats,
        categories: &[CategoryCount],
    ) -> Option<ChartConfig> {
        let distinct = column.unique_values;
        if distinct < 2 || distinct > self.settings.category_chart_cap || categories.is_empty() {
            return None;
        }

        let name = column.name.as_str();
        let key = label_key(name);
        let chart_type = if distinct <= self.settings.pie_max_slices {
            ChartType::Pie
        } else {
            ChartType::Bar
        };

        let data = categories
            .iter()
            .map(|c| {
                record([
                    (key.as_str(), json!(c.value)),
                    ("count", json!(c.count)),
                    ("percentage", number_to_json(c.percentage)),
                ])
            })
            .collect();

        let colors = match chart_type {
            ChartType::Pie => self.colors(categories.len()),
            _ => self.colors(1),
        };

        Some(
            ChartConfig::new(chart_type, format!("{name} breakdown"), data)
                .with_x_axis(key.as_str())
                .with_y_axis("count")
                .with_colors(colors)
                .with_explanation(format!(
                    "{} of {distinct} categories",
                    categories.len()
                )),
        )
    }

    fn boolean_chart(&self, column: &str, true_count: usize, false_count: usize) -> ChartConfig {
        let key = label_key(column);
        let data = vec![
            record([(key.as_str(), json!("true")), ("count", json!(true_count))]),
            record([(key.as_str(), json!("false")), ("count", json!(false_count))]),
        ];

        ChartConfig::new(ChartType::Pie, format!("{column} split"), data)
            .with_x_axis(key.as_str())
            .with_y_axis("count")
            .with_colors(self.colors(2))
    }

    // ========================================================================
    // Cross-column charts
    // ========================================================================

    fn time_series(
        &self,
        date: &str,
        numeric: &[&EnhancedColumnStats],
        rows: &[Row],
    ) -> Option<ChartConfig> {
        // Only series that move across the dated rows
        let series: Vec<&str> = numeric
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| {
                let dated = sorted_by_date(rows, date, |row| as_number(cell(row, name)));
                has_spread(dated.into_iter().map(|(_, value)| value))
            })
            .take(self.settings.max_series)
            .collect();
        if series.is_empty() {
            return None;
        }

        let points = sorted_by_date(rows, date, |row| {
            let values: Vec<Option<f64>> = series.iter().map(|s| as_number(cell(row, s))).collect();
            values.iter().any(Option::is_some).then_some(values)
        });
        if points.is_empty() {
            return None;
        }

        let data = points
            .iter()
            .map(|(day, values)| {
                let mut rec = ChartRecord::new();
                rec.insert(date.to_string(), date_json(day));
                for (name, value) in series.iter().zip(values) {
                    rec.insert(
                        name.to_string(),
                        value.map(number_to_json).unwrap_or(serde_json::Value::Null),
                    );
                }
                rec
            })
            .collect();

        let names: Vec<String> = series.iter().map(|s| s.to_string()).collect();
        Some(
            ChartConfig::new(ChartType::Area, format!("Trends by {date}"), data)
                .with_x_axis(date)
                .with_y_axis(names)
                .with_colors(self.colors(series.len()))
                .with_explanation(format!("{} series over {} dates", series.len(), points.len())),
        )
    }

    fn strongest_scatter(&self, numeric: &[&EnhancedColumnStats], rows: &[Row]) -> Option<ChartConfig> {
        let mut best: Option<(f64, &str, &str, Vec<(f64, f64)>)> = None;

        for (i, a) in numeric.iter().enumerate() {
            for b in &numeric[i + 1..] {
                let pairs = paired_values(rows, &a.name, &b.name);
                if pairs.len() < self.settings.min_correlation_pairs {
                    continue;
                }
                let Some(r) = pearson(&pairs) else { continue };
                if best.as_ref().is_none_or(|(top, ..)| r.abs() > top.abs()) {
                    best = Some((r, a.name.as_str(), b.name.as_str(), pairs));
                }
            }
        }

        let (r, x, y, pairs) = best?;
        let data = pairs
            .iter()
            .take(self.settings.max_scatter_points)
            .map(|(vx, vy)| record([(x, number_to_json(*vx)), (y, number_to_json(*vy))]))
            .collect();

        Some(
            ChartConfig::new(ChartType::Scatter, format!("{y} vs {x}"), data)
                .with_x_axis(x)
                .with_y_axis(y)
                .with_colors(self.colors(1))
                .with_explanation(format!("Pearson r = {:.3} over {} rows", r, pairs.len())),
        )
    }

    fn correlation_heatmap(&self, numeric: &[&EnhancedColumnStats], rows: &[Row]) -> Option<ChartConfig> {
        let mut data = Vec::with_capacity(numeric.len() * numeric.len());
        for a in numeric {
            for b in numeric {
                let r = pearson(&paired_values(rows, &a.name, &b.name));
                data.push(record([
                    ("x", json!(a.name)),
                    ("y", json!(b.name)),
                    ("value", r.map(|r| number_to_json(round3(r))).unwrap_or(serde_json::Value::Null)),
                ]));
            }
        }
        if data.is_empty() {
            return None;
        }

        Some(
            ChartConfig::new(ChartType::Heatmap, "Correlation matrix", data)
                .with_x_axis("x")
                .with_y_axis("y")
                .with_colors(self.colors(2))
                .with_explanation(format!("Pearson correlation of {} numeric columns", numeric.len())),
        )
    }

    /// First `n` palette colors, cycling when the palette is shorter.
    fn colors(&self, n: usize) -> Vec<String> {
        self.settings.palette.iter().cycle().take(n).cloned().collect()
    }
}

/// Numeric column whose profiled values are not all equal.
fn has_range(column: &EnhancedColumnStats) -> bool {
    column.numeric().is_some_and(|n| n.min < n.max)
}

/// At least two different values.
fn has_spread(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.any(|v| v != first),
        None => false,
    }
}

/// Record key for category labels; renamed when the column name would clash
/// with the `count` or `percentage` fields.
fn label_key(name: &str) -> String {
    match name {
        "count" | "percentage" => format!("{name} value"),
        _ => name.to_string(),
    }
}

/// Rows with a parseable date and a value from `extract`, in ascending date
/// order; rows sharing a date keep their original order.
fn sorted_by_date<T>(
    rows: &[Row],
    date: &str,
    extract: impl Fn(&Row) -> Option<T>,
) -> Vec<(NaiveDate, T)> {
    let mut points: Vec<(NaiveDate, T)> = rows
        .iter()
        .filter_map(|row| Some((as_date(cell(row, date))?, extract(row)?)))
        .collect();
    points.sort_by_key(|(day, _)| *day);
    points
}

/// Pairs of numbers from rows where both columns hold one, in row order.
fn paired_values(rows: &[Row], x: &str, y: &str) -> Vec<(f64, f64)> {
    rows.iter()
        .filter_map(|row| Some((as_number(cell(row, x))?, as_number(cell(row, y))?)))
        .collect()
}

fn record<'a, const N: usize>(fields: [(&'a str, serde_json::Value); N]) -> ChartRecord {
    fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn date_json(day: &NaiveDate) -> serde_json::Value {
    json!(day.format("%Y-%m-%d").to_string())
}

fn label(value: f64) -> String {
    format_number(round2(value))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
