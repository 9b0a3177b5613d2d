//! Column profiler: type inference, statistics, outliers and quality.

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::{AnalysisConfig, InputLimits, ProfilerConfig};
use crate::error::Result;
use crate::input::{Dataset, Row, Value, cell, format_number, validate_shape};

use super::column::{
    BooleanDetail, CategoryCount, CategoryDetail, ColumnDetail, ColumnQuality, DateDetail,
    DateRange, EnhancedColumnStats, NumericDetail, OutlierSummary, TextDetail,
};
use super::statistics::{self, IqrFences};
use super::types::{InferredType, OutlierMethod};
use super::values::{self, BOOLEAN_PAIRS, KindCounts, ValueKind};

/// Profile every column of a dataset with the given configuration.
pub fn profile_all_columns(
    headers: &[String],
    rows: &[Row],
    config: &AnalysisConfig,
) -> Result<Vec<EnhancedColumnStats>> {
    ColumnProfiler::with_config(config.profiler.clone())
        .with_limits(config.input.clone())
        .profile_all_columns(headers, rows)
}

/// Profiles the columns of a dataset.
#[derive(Debug, Clone, Default)]
pub struct ColumnProfiler {
    config: ProfilerConfig,
    limits: InputLimits,
}

impl ColumnProfiler {
    /// Create a new profiler with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler with custom thresholds.
    pub fn with_config(config: ProfilerConfig) -> Self {
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

    /// Profile all columns, one entry per header, in header order.
    ///
    /// Fails only on malformed input (no headers, rows keyed by unknown
    /// names). Degenerate data never fails.
    pub fn profile_all_columns(
        &self,
        headers: &[String],
        rows: &[Row],
    ) -> Result<Vec<EnhancedColumnStats>> {
        validate_shape(headers, rows, &self.limits)?;
        debug!(columns = headers.len(), rows = rows.len(), "profiling dataset");

        let stats = headers
            .iter()
            .map(|name| self.profile_column(name, rows.iter().map(|row| cell(row, name))))
            .collect::<Vec<_>>();

        Ok(stats)
    }

    /// Profile all columns of a dataset.
    pub fn profile_dataset(&self, dataset: &Dataset) -> Result<Vec<EnhancedColumnStats>> {
        self.profile_all_columns(&dataset.headers, &dataset.rows)
    }

    /// Profile a single column from its values in row order.
    pub fn profile_column<'a>(
        &self,
        name: &str,
        column_values: impl IntoIterator<Item = &'a Value>,
    ) -> EnhancedColumnStats {
        let mut count = 0;
        let mut non_null: Vec<&Value> = Vec::new();
        for value in column_values {
            count += 1;
            if !value.is_missing(&self.config.null_tokens) {
                non_null.push(value);
            }
        }
        let null_count = count - non_null.len();

        let mut kinds = KindCounts::default();
        for value in &non_null {
            kinds.add(values::classify(value));
        }

        // Distinct values keyed canonically, first-seen order
        let mut distinct: IndexMap<String, (usize, String)> = IndexMap::new();
        for value in &non_null {
            let entry = distinct
                .entry(value.key())
                .or_insert_with(|| (0, value.to_string().trim().to_string()));
            entry.0 += 1;
        }
        let unique_values = distinct.len();

        let (inferred, consistency) = self.infer_type(&non_null, &kinds, unique_values);
        let (detail, mode) = self.build_detail(inferred, &non_null, &distinct);

        let quality = ColumnQuality {
            completeness: ratio(non_null.len(), count),
            consistency,
            uniqueness: ratio(unique_values, non_null.len()),
        };

        debug!(
            column = name,
            inferred_type = %detail.inferred_type(),
            null_count,
            unique_values,
            "profiled column"
        );

        EnhancedColumnStats {
            name: name.to_string(),
            coarse_type: detail.inferred_type().coarse(),
            count,
            unique_values,
            null_count,
            mode,
            quality,
            detail,
        }
    }

    /// Decide the semantic type and the share of values agreeing with it.
    fn infer_type(
        &self,
        non_null: &[&Value],
        kinds: &KindCounts,
        unique_values: usize,
    ) -> (InferredType, f64) {
        if non_null.is_empty() {
            return (InferredType::Mixed, 0.0);
        }

        if is_boolean_pair(non_null) {
            return (InferredType::Boolean, 1.0);
        }

        let threshold = self.config.type_confidence;
        let wins = |kind: ValueKind| kinds.get(kind) > 0 && kinds.share(kind) >= threshold;

        if wins(ValueKind::Number) {
            return (InferredType::Numeric, kinds.share(ValueKind::Number));
        }
        if wins(ValueKind::Date) {
            return (InferredType::Date, kinds.share(ValueKind::Date));
        }
        if wins(ValueKind::Boolean) {
            return (InferredType::Boolean, kinds.share(ValueKind::Boolean));
        }
        if wins(ValueKind::Text) {
            let share = kinds.share(ValueKind::Text);
            let unique_ratio = ratio(unique_values, non_null.len());
            let avg_length = non_null
                .iter()
                .map(|v| v.to_string().trim().chars().count())
                .sum::<usize>() as f64
                / non_null.len() as f64;

            if unique_ratio <= self.config.category_unique_ratio
                && avg_length <= self.config.category_max_length
            {
                return (InferredType::Category, share);
            }
            return (InferredType::Text, share);
        }

        let plurality = kinds.plurality().map(|k| kinds.share(k)).unwrap_or(0.0);
        (InferredType::Mixed, plurality)
    }

    /// Build the type-specific detail and the mode.
    fn build_detail(
        &self,
        inferred: InferredType,
        non_null: &[&Value],
        distinct: &IndexMap<String, (usize, String)>,
    ) -> (ColumnDetail, Option<Value>) {
        let generic_mode = || {
            distinct
                .values()
                .fold(None::<&(usize, String)>, |best, entry| match best {
                    Some(b) if b.0 >= entry.0 => Some(b),
                    _ => Some(entry),
                })
                .map(|(_, display)| Value::Text(display.clone()))
        };

        match inferred {
            InferredType::Numeric => {
                let numbers: Vec<f64> = non_null.iter().filter_map(|v| values::as_number(v)).collect();
                match self.numeric_detail(&numbers) {
                    Some(detail) => {
                        let mode = mode_of(numbers.iter().map(|n| (format_number(*n), *n)))
                            .map(Value::Number);
                        (ColumnDetail::Numeric(detail), mode)
                    }
                    None => (ColumnDetail::Mixed, generic_mode()),
                }
            }
            InferredType::Date => {
                let dates: Vec<_> = non_null.iter().filter_map(|v| values::as_date(v)).collect();
                match (dates.iter().min(), dates.iter().max()) {
                    (Some(min), Some(max)) => {
                        let detail = DateDetail {
                            date_range: DateRange {
                                min: min.format("%Y-%m-%d").to_string(),
                                max: max.format("%Y-%m-%d").to_string(),
                                span: (*max - *min).num_days(),
                            },
                        };
                        (ColumnDetail::Date(detail), generic_mode())
                    }
                    _ => (ColumnDetail::Mixed, generic_mode()),
                }
            }
            InferredType::Category => {
                let mut table: Vec<(&String, usize)> =
                    distinct.values().map(|(count, display)| (display, *count)).collect();
                // Stable sort keeps first-seen order among equal counts
                table.sort_by(|a, b| b.1.cmp(&a.1));

                let top_categories = table
                    .into_iter()
                    .take(self.config.top_categories)
                    .map(|(value, count)| CategoryCount {
                        value: value.clone(),
                        count,
                        percentage: round2(100.0 * ratio(count, non_null.len())),
                    })
                    .collect();

                (
                    ColumnDetail::Category(CategoryDetail { top_categories }),
                    generic_mode(),
                )
            }
            InferredType::Boolean => {
                let flags: Vec<bool> = non_null.iter().filter_map(|v| values::as_boolean(v)).collect();
                let true_count = flags.iter().filter(|b| **b).count();
                let detail = BooleanDetail {
                    true_count,
                    false_count: flags.len() - true_count,
                };
                let mode = mode_of(flags.iter().map(|b| (*b, *b))).map(Value::Boolean);
                (ColumnDetail::Boolean(detail), mode)
            }
            InferredType::Text => {
                let lengths: Vec<usize> = non_null
                    .iter()
                    .map(|v| v.to_string().trim().chars().count())
                    .collect();
                let detail = TextDetail {
                    min_length: lengths.iter().copied().min().unwrap_or(0),
                    max_length: lengths.iter().copied().max().unwrap_or(0),
                    avg_length: round2(
                        lengths.iter().sum::<usize>() as f64 / lengths.len().max(1) as f64,
                    ),
                };
                (ColumnDetail::Text(detail), generic_mode())
            }
            InferredType::Mixed => (ColumnDetail::Mixed, generic_mode()),
        }
    }

    /// Numeric statistics plus IQR outliers.
    fn numeric_detail(&self, numbers: &[f64]) -> Option<NumericDetail> {
        let sorted = statistics::sorted(numbers);
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let mean = statistics::mean(numbers)?;
        let median = statistics::median_sorted(&sorted)?;
        let standard_deviation = statistics::std_dev(numbers)?;

        let outliers = if numbers.len() >= self.config.min_outlier_samples {
            IqrFences::from_sample(numbers, self.config.iqr_multiplier).map(|fences| {
                let flagged: Vec<f64> = numbers
                    .iter()
                    .copied()
                    .filter(|n| fences.is_outlier(*n))
                    .collect();
                OutlierSummary {
                    count: flagged.len(),
                    values: flagged
                        .into_iter()
                        .take(self.config.outlier_sample_cap)
                        .collect(),
                    method: OutlierMethod::Iqr,
                }
            })
        } else {
            None
        };

        Some(NumericDetail {
            min,
            max,
            mean,
            median,
            standard_deviation,
            outliers,
        })
    }
}

/// All values fall in one boolean-like pair. For `0/1` both must occur, so a
/// constant numeric column is not mistaken for a flag.
fn is_boolean_pair(non_null: &[&Value]) -> bool {
    let tokens: Vec<String> = non_null.iter().map(|v| values::boolean_token(v)).collect();

    BOOLEAN_PAIRS.iter().any(|(yes, no)| {
        let all_in_pair = tokens.iter().all(|t| t == yes || t == no);
        if !all_in_pair {
            return false;
        }
        if *yes == "1" {
            tokens.iter().any(|t| t == yes) && tokens.iter().any(|t| t == no)
        } else {
            true
        }
    })
}

/// Most frequent value by key; ties go to the first key seen.
fn mode_of<K: Hash + Eq, V>(items: impl Iterator<Item = (K, V)>) -> Option<V> {
    let mut counts: IndexMap<K, (usize, V)> = IndexMap::new();
    for (key, value) in items {
        counts.entry(key).or_insert((0, value)).0 += 1;
    }
    let mut best: Option<(usize, V)> = None;
    for (_, (count, value)) in counts {
        if best.as_ref().is_none_or(|(b, _)| count > *b) {
            best = Some((count, value));
        }
    }
    best.map(|(_, value)| value)
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::find_column;

    fn profile(values: Vec<Value>) -> EnhancedColumnStats {
        ColumnProfiler::new().profile_column("col", values.iter())
    }

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|v| Value::Number(*v)).collect()
    }

    fn texts(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::text(*v)).collect()
    }

    #[test]
    fn test_repeated_header_profiles_first_column() {
        let dataset = Dataset::from_positional(
            vec!["a".to_string(), "a".to_string()],
            vec![vec![Value::Number(1.0), Value::text("zzz")]],
        );
        let stats = ColumnProfiler::new().profile_dataset(&dataset).unwrap();

        assert_eq!(stats.len(), 2);
        for column in &stats {
            assert_eq!(column.inferred_type(), InferredType::Numeric);
            assert_eq!(column.mode, Some(Value::Number(1.0)));
        }
        let first = find_column(&stats, "a").unwrap();
        assert!(std::ptr::eq(first, &stats[0]));
    }

    #[test]
    fn test_infer_numeric_type() {
        let stats = profile(texts(&["1", "2", "3", "100"]));
        assert_eq!(stats.inferred_type(), InferredType::Numeric);
        assert_eq!(stats.quality.consistency, 1.0);
    }

    #[test]
    fn test_numeric_statistics() {
        let stats = profile(numbers(&[4.0, 1.0, 3.0, 2.0]));
        let numeric = stats.numeric().unwrap();
        assert_eq!(numeric.min, 1.0);
        assert_eq!(numeric.max, 4.0);
        assert_eq!(numeric.mean, 2.5);
        assert_eq!(numeric.median, 2.5);
        assert!((numeric.standard_deviation - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_iqr_flags_single_outlier() {
        let stats = profile(numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]));
        let outliers = stats.outliers().unwrap();
        assert_eq!(outliers.count, 1);
        assert_eq!(outliers.values, vec![100.0]);
        assert_eq!(outliers.method, OutlierMethod::Iqr);
    }

    #[test]
    fn test_outliers_skipped_for_small_samples() {
        let stats = profile(numbers(&[1.0, 2.0, 300.0]));
        assert_eq!(stats.inferred_type(), InferredType::Numeric);
        assert!(stats.outliers().is_none());
    }

    #[test]
    fn test_outlier_sample_is_capped() {
        let mut values: Vec<f64> = vec![10.0; 40];
        values.extend([1000.0; 12]);
        let profiler = ColumnProfiler::with_config(ProfilerConfig {
            outlier_sample_cap: 10,
            ..ProfilerConfig::default()
        });
        let column = numbers(&values);
        let stats = profiler.profile_column("col", column.iter());
        let outliers = stats.outliers().unwrap();
        assert_eq!(outliers.count, 12);
        assert_eq!(outliers.values.len(), 10);
    }

    #[test]
    fn test_mode_ties_go_to_first_seen() {
        let stats = profile(numbers(&[3.0, 1.0, 1.0, 3.0, 2.0]));
        assert_eq!(stats.mode, Some(Value::Number(3.0)));
    }

    #[test]
    fn test_detect_category() {
        let stats = profile(texts(&["A", "B", "A", "C", "B", "A"]));
        assert_eq!(stats.inferred_type(), InferredType::Category);
        let top = stats.top_categories().unwrap();
        assert_eq!(top[0].value, "A");
        assert_eq!(top[0].count, 3);
        assert_eq!(top[0].percentage, 50.0);
        assert_eq!(top[1].value, "B");
        assert_eq!(top[2].value, "C");
    }

    #[test]
    fn test_category_ties_keep_first_seen_order() {
        let stats = profile(texts(&["red", "blue", "blue", "red", "green", "green"]));
        let order: Vec<&str> = stats
            .top_categories()
            .unwrap()
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(order, vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_detect_text() {
        let stats = profile(texts(&[
            "The quick brown fox",
            "jumps over",
            "the lazy dog",
            "and keeps running",
        ]));
        assert_eq!(stats.inferred_type(), InferredType::Text);
        assert!(stats.top_categories().is_none());
    }

    #[test]
    fn test_detect_boolean_words_and_flags() {
        let words = profile(texts(&["yes", "no", "Yes", "no"]));
        assert_eq!(words.inferred_type(), InferredType::Boolean);

        let flags = profile(numbers(&[1.0, 0.0, 1.0, 1.0]));
        assert_eq!(flags.inferred_type(), InferredType::Boolean);
        assert_eq!(flags.mode, Some(Value::Boolean(true)));

        let constant = profile(numbers(&[1.0, 1.0, 1.0]));
        assert_eq!(constant.inferred_type(), InferredType::Numeric);
    }

    #[test]
    fn test_date_range_in_days() {
        let stats = profile(texts(&["2024-01-31", "2024-01-01", "2024-03-01"]));
        assert_eq!(stats.inferred_type(), InferredType::Date);
        let range = stats.date_range().unwrap();
        assert_eq!(range.min, "2024-01-01");
        assert_eq!(range.max, "2024-03-01");
        assert_eq!(range.span, 60);
    }

    #[test]
    fn test_mixed_when_no_type_dominates() {
        let stats = profile(texts(&["1", "apple", "2024-01-01", "2", "banana"]));
        assert_eq!(stats.inferred_type(), InferredType::Mixed);
        assert_eq!(stats.quality.consistency, 0.4);
    }

    #[test]
    fn test_all_null_column() {
        let stats = profile(vec![Value::Null, Value::text(""), Value::text("NA")]);
        assert_eq!(stats.inferred_type(), InferredType::Mixed);
        assert_eq!(stats.null_count, 3);
        assert_eq!(stats.quality.completeness, 0.0);
        assert_eq!(stats.quality.uniqueness, 0.0);
        assert_eq!(stats.mode, None);
    }

    #[test]
    fn test_consistency_reflects_minority_values() {
        let mut values = numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        values.push(Value::text("oops"));
        let stats = profile(values);
        assert_eq!(stats.inferred_type(), InferredType::Numeric);
        assert_eq!(stats.quality.consistency, 0.9);
    }

    #[test]
    fn test_empty_headers_rejected() {
        let result = ColumnProfiler::new().profile_all_columns(&[], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_rows_profiles_every_header() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let stats = ColumnProfiler::new().profile_all_columns(&headers, &[]).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].count, 0);
        assert_eq!(stats[0].quality.completeness, 0.0);
    }
}
