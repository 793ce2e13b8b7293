//! Summary statistics: pure functions over a series of values.
//!
//! Same conventions as a spreadsheet/data-frame `describe`: missing values
//! are skipped, standard deviation is the sample (n - 1) estimate and
//! quantiles interpolate linearly between order statistics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Describe the defined values of a series. `None` if there are none.
    pub fn describe(values: &[Option<f64>]) -> Option<Self> {
        let defined: Vec<f64> = values.iter().flatten().copied().collect();
        Self::describe_defined(&defined)
    }

    /// Describe a fully-defined series. NaN entries are skipped.
    pub fn describe_defined(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = mean(&sorted);
        Some(Self {
            count,
            mean,
            std: sample_std(&sorted, mean),
            min: sorted[0],
            p25: quantile_sorted(&sorted, 0.25),
            median: quantile_sorted(&sorted, 0.5),
            p75: quantile_sorted(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation around a precomputed mean.
pub fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolation quantile of an ascending, non-empty slice.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_hand_computation() {
        let s = SummaryStats::describe_defined(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        // sample variance = 5/3
        assert!((s.std.unwrap() - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(s.min, 1.0);
        assert!((s.p25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.p75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn missing_values_are_skipped() {
        let s = SummaryStats::describe(&[None, Some(10.0), None, Some(20.0)]).unwrap();
        assert_eq!(s.count, 2);
        assert!((s.mean - 15.0).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_no_std() {
        let s = SummaryStats::describe(&[Some(7.0)]).unwrap();
        assert_eq!(s.std, None);
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn all_missing_is_none() {
        assert!(SummaryStats::describe(&[None, None]).is_none());
        assert!(SummaryStats::describe_defined(&[]).is_none());
    }

    #[test]
    fn unsorted_input() {
        let s = SummaryStats::describe_defined(&[-23.59, 64.02, 7.0]).unwrap();
        assert_eq!(s.min, -23.59);
        assert_eq!(s.max, 64.02);
        assert_eq!(s.median, 7.0);
    }

    #[test]
    fn all_nan_is_none() {
        assert!(SummaryStats::describe_defined(&[f64::NAN, f64::NAN]).is_none());
        assert!(SummaryStats::describe(&[Some(f64::NAN)]).is_none());
    }

    #[test]
    fn quantile_endpoints() {
        let v = [1.0, 5.0, 9.0];
        assert_eq!(quantile_sorted(&v, 0.0), 1.0);
        assert_eq!(quantile_sorted(&v, 1.0), 9.0);
        assert_eq!(quantile_sorted(&v, 0.5), 5.0);
    }
}
