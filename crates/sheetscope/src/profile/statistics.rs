//! Descriptive statistics over numeric samples.
//!
//! Conventions used across the crate:
//! - standard deviation is the population form (divide by `n`);
//! - quantiles interpolate linearly between closest ranks at `p * (n - 1)`;
//! - the median of an even-length sample averages the middle pair.

use std::cmp::Ordering;

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty sample.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    Some(variance.sqrt())
}

/// Copy and sort a sample ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Quantile `p` in `[0, 1]` of an already sorted sample.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        n => {
            let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let weight = pos - lower as f64;
            Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
        }
    }
}

/// Median of an already sorted sample.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Lower and upper IQR fences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFences {
    /// Compute fences `[Q1 - k*IQR, Q3 + k*IQR]`.
    pub fn from_sample(values: &[f64], multiplier: f64) -> Option<Self> {
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25)?;
        let q3 = quantile_sorted(&sorted, 0.75)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        })
    }

    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Check whether a value falls outside the fences.
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Pearson correlation coefficient of paired samples.
///
/// Returns `None` when fewer than two pairs exist or either side has zero
/// variance.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_population_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(std_dev(&values), Some(2.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median_sorted(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median_sorted(&[]), None);
    }

    #[test]
    fn test_quartiles_linear_interpolation() {
        let sample = sorted(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
        assert_eq!(quantile_sorted(&sample, 0.25), Some(2.25));
        assert_eq!(quantile_sorted(&sample, 0.75), Some(4.75));
    }

    #[test]
    fn test_iqr_fences_flag_extreme_value() {
        let fences = IqrFences::from_sample(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], 1.5).unwrap();
        assert_eq!(fences.iqr(), 2.5);
        assert_eq!(fences.upper, 8.5);
        assert!(fences.is_outlier(100.0));
        assert!(!fences.is_outlier(5.0));
        assert!(!fences.is_outlier(1.0));
    }

    #[test]
    fn test_pearson() {
        let perfect: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        assert!((pearson(&perfect).unwrap() - 1.0).abs() < 1e-12);

        let inverse: Vec<(f64, f64)> = (0..5).map(|i| (i as f64, -(i as f64))).collect();
        assert!((pearson(&inverse).unwrap() + 1.0).abs() < 1e-12);

        let flat = [(1.0, 3.0), (2.0, 3.0), (3.0, 3.0)];
        assert_eq!(pearson(&flat), None);
    }
}
