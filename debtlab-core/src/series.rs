//! Derived series over the monthly total-debt view.
//!
//! Growth is the annualized continuously-compounded rate between consecutive
//! months, in percent:
//!
//! ```text
//! growth[t] = ln(total[t] / total[t-1]) * 12 * 100
//! ```
//!
//! positive when debt increases. Each value belongs to the later month of
//! its pair, so the oldest month has no value (`None`), never zero.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::normalize::to_trillions;
use crate::domain::DebtRecord;
use crate::views::total_only;

/// Months per year.
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// One month of the total-debt series with its derived columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalPoint {
    pub record_date: NaiveDate,
    pub total_amt_trillions: f64,
    pub public_trillions: f64,
    pub intragov_trillions: f64,
    pub annualized_growth_pct: Option<f64>,
}

/// Build the ascending total-debt series with growth rates.
pub fn total_series(records: &[DebtRecord]) -> Vec<TotalPoint> {
    let totals = total_only(records);
    let trillions: Vec<f64> = totals.iter().map(|r| r.total_amt_trillions).collect();
    let growth = annualized_growth_pct(&trillions);

    totals
        .iter()
        .zip(growth)
        .map(|(r, g)| TotalPoint {
            record_date: r.record_date,
            total_amt_trillions: r.total_amt_trillions,
            public_trillions: to_trillions(r.debt_held_public_amt),
            intragov_trillions: to_trillions(r.intragov_hold_amt),
            annualized_growth_pct: g,
        })
        .collect()
}

/// Annualized log growth for an ascending series of levels.
///
/// Output has the same length as the input; index 0 is always `None`.
/// A pair involving a non-positive level has no defined log and yields
/// `None` as well.
pub fn annualized_growth_pct(ascending: &[f64]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(ascending.len());
    if ascending.is_empty() {
        return out;
    }
    out.push(None);
    for pair in ascending.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let g = if prev > 0.0 && curr > 0.0 {
            Some((curr.ln() - prev.ln()) * PERIODS_PER_YEAR * 100.0)
        } else {
            None
        };
        out.push(g);
    }
    out
}

/// Trailing rolling mean.
///
/// `out[i]` is the mean of `values[i + 1 - window ..= i]` when all of those
/// are defined; otherwise `None`. A window of 0 yields all `None`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice.iter().try_fold(0.0, |acc, &v| v.map(|x| acc + x))?;
            Some(sum / window as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SecurityType;

    fn total(date: (i32, u32, u32), millions: f64) -> DebtRecord {
        DebtRecord {
            record_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            security_type: SecurityType::TotalPublicDebtOutstanding,
            security_class: None,
            debt_held_public_amt: millions * 0.75,
            intragov_hold_amt: millions * 0.25,
            total_amt: millions,
            total_amt_trillions: millions / 1e6,
        }
    }

    #[test]
    fn growth_boundary_two_months() {
        let g = annualized_growth_pct(&[33.87868, 34.00149]);
        assert_eq!(g[0], None);
        let expected = (34.00149_f64 / 33.87868).ln() * 1200.0;
        assert!((g[1].unwrap() - expected).abs() < 1e-9);
        assert!((g[1].unwrap() - 4.342).abs() < 0.01);
    }

    #[test]
    fn growth_sign_follows_direction() {
        let g = annualized_growth_pct(&[100.0, 110.0, 105.0]);
        assert!(g[1].unwrap() > 0.0);
        assert!(g[2].unwrap() < 0.0);
        assert!((g[1].unwrap() - (1.1_f64).ln() * 1200.0).abs() < 1e-9);
    }

    #[test]
    fn growth_of_empty_and_single() {
        assert!(annualized_growth_pct(&[]).is_empty());
        assert_eq!(annualized_growth_pct(&[5.0]), vec![None]);
    }

    #[test]
    fn growth_with_zero_level_is_missing() {
        let g = annualized_growth_pct(&[0.0, 1.0, 2.0]);
        assert_eq!(g[1], None);
        assert!(g[2].is_some());
    }

    #[test]
    fn total_series_sorts_before_differencing() {
        // Wire order: newest first.
        let records = vec![
            total((2023, 12, 31), 34_001_490.0),
            total((2023, 11, 30), 33_878_680.0),
            total((2023, 10, 31), 33_697_000.0),
        ];
        let series = total_series(&records);
        assert_eq!(series.len(), 3);
        assert!(series.windows(2).all(|w| w[0].record_date < w[1].record_date));
        assert_eq!(series[0].annualized_growth_pct, None);
        let dec = series[2].annualized_growth_pct.unwrap();
        assert!((dec - (34.00149_f64 / 33.87868).ln() * 1200.0).abs() < 1e-9);
        assert!((series[2].public_trillions + series[2].intragov_trillions - 34.00149).abs() < 1e-9);
    }

    #[test]
    fn rolling_mean_waits_for_full_window() {
        let values = [None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let r = rolling_mean(&values, 2);
        assert_eq!(r, vec![None, None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn rolling_mean_window_one_is_identity() {
        let values = [None, Some(1.0), Some(2.0)];
        assert_eq!(rolling_mean(&values, 1), values.to_vec());
    }

    #[test]
    fn rolling_mean_zero_window() {
        assert_eq!(rolling_mean(&[Some(1.0)], 0), vec![None]);
    }

    #[test]
    fn rolling_mean_window_longer_than_series() {
        assert_eq!(rolling_mean(&[Some(1.0), Some(2.0)], 3), vec![None, None]);
    }
}
