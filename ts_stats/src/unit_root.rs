//! Augmented Dickey-Fuller unit-root test
//!
//! Constant-only regression with the lag order chosen by AIC:
//!
//! ```text
//! Δy_t = c + γ y_{t-1} + Σ_{i=1}^{k} δ_i Δy_{t-i} + e_t
//! ```
//!
//! The reported statistic is the t value of γ. P-values use the MacKinnon
//! (1994) response surface and critical values the MacKinnon (2010) tables,
//! both for a single series with a constant.

use crate::regression::ols;
use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Above this statistic the p-value is 1
const TAU_MAX: f64 = 2.74;
/// Below this statistic the p-value is 0
const TAU_MIN: f64 = -18.83;
/// Switch point between the small-p and large-p polynomials
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Response-surface coefficients for the 1%, 5% and 10% critical values,
/// polynomial in `1 / nobs`.
const TAU_CRIT_2010: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];

/// Critical values of the ADF statistic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

/// Outcome of an Augmented Dickey-Fuller test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdfResult {
    /// t statistic of the lagged level coefficient
    pub statistic: f64,
    /// MacKinnon approximate p-value
    pub p_value: f64,
    /// Number of lagged differences in the final regression
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
    /// Critical values at 1%, 5% and 10%
    pub critical_values: CriticalValues,
}

fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate p-value of an ADF statistic (constant, one series).
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let z = if statistic <= TAU_STAR {
        polyval(&TAU_SMALL_P, statistic)
    } else {
        polyval(&TAU_LARGE_P, statistic)
    };

    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(z),
        Err(_) => f64::NAN,
    }
}

/// Finite-sample critical values for a regression with `nobs` observations.
pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs as f64;
    CriticalValues {
        one_percent: polyval(&TAU_CRIT_2010[0], inv),
        five_percent: polyval(&TAU_CRIT_2010[1], inv),
        ten_percent: polyval(&TAU_CRIT_2010[2], inv),
    }
}

/// Largest lag order considered for a series of `n` observations, or `None`
/// when the sample is too short for a constant-only regression.
pub fn max_lag(n: usize) -> Option<usize> {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let cap = (n / 2).checked_sub(2)?;
    Some(schwert.min(cap))
}

/// Build the ADF regression with `lags` lagged differences.
///
/// Rows cover `xdiff[start..]`; columns are `[y_{t-1}, Δy_{t-1}, .., Δy_{t-lags}, 1]`.
fn design(levels: &[f64], xdiff: &[f64], lags: usize, start: usize) -> (Vec<f64>, Vec<Vec<f64>>) {
    let mut y = Vec::with_capacity(xdiff.len() - start);
    let mut rows = Vec::with_capacity(xdiff.len() - start);

    for t in start..xdiff.len() {
        let mut row = Vec::with_capacity(lags + 2);
        row.push(levels[t]);
        for i in 1..=lags {
            row.push(xdiff[t - i]);
        }
        row.push(1.0);
        rows.push(row);
        y.push(xdiff[t]);
    }

    (y, rows)
}

/// Run the Augmented Dickey-Fuller test on `data`.
///
/// A regression that cannot be solved (for instance a constant series)
/// yields a NaN statistic and p-value rather than an error.
pub fn adf_test(data: &[f64]) -> Result<AdfResult> {
    let n = data.len();
    if data.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Series contains NaN or infinite values".to_string(),
        ));
    }
    let max_lag = max_lag(n).ok_or_else(|| {
        MathError::InsufficientData(format!(
            "Sample size {} is too short for the ADF regression with a constant (need at least 4)",
            n
        ))
    })?;

    let xdiff = crate::differencing::difference(data);

    // Lag selection over a common sample that drops the first max_lag rows
    let mut best: Option<(usize, f64)> = None;
    for lags in 0..=max_lag {
        let (y, rows) = design(data, &xdiff, lags, max_lag);
        let aic = match ols(&y, &rows) {
            Ok(fit) => fit.aic,
            Err(MathError::CalculationError(_)) => continue,
            Err(e) => return Err(e),
        };
        if best.map_or(true, |(_, current)| aic < current) {
            best = Some((lags, aic));
        }
    }

    let used_lag = best.map_or(0, |(lags, _)| lags);
    let (y, rows) = design(data, &xdiff, used_lag, used_lag);
    let nobs = y.len();

    let statistic = match ols(&y, &rows) {
        Ok(fit) => fit.t_value(0),
        Err(MathError::CalculationError(_)) => f64::NAN,
        Err(e) => return Err(e),
    };

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        nobs,
        critical_values: mackinnon_critical_values(nobs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_p_value_bounds() {
        assert_eq!(mackinnon_p_value(3.0), 1.0);
        assert_eq!(mackinnon_p_value(-20.0), 0.0);
        assert!(mackinnon_p_value(f64::NAN).is_nan());
    }

    #[test]
    fn test_p_value_reference_points() {
        // cdf(1.7339) at a zero statistic
        assert_abs_diff_eq!(mackinnon_p_value(0.0), 0.9585, epsilon = 1e-3);
        // The two polynomials meet near the switch point
        let below = mackinnon_p_value(TAU_STAR);
        let above = mackinnon_p_value(TAU_STAR + 1e-9);
        assert_abs_diff_eq!(below, above, epsilon = 1e-3);
        // 5% critical value maps to roughly 5%
        assert_abs_diff_eq!(mackinnon_p_value(-2.86), 0.05, epsilon = 0.01);
    }

    #[test]
    fn test_p_value_is_monotonic() {
        let stats = [-6.0, -4.0, -3.0, -2.0, -1.0, 0.0, 1.0, 2.0];
        let p: Vec<f64> = stats.iter().map(|&s| mackinnon_p_value(s)).collect();
        assert!(p.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_critical_values_large_sample() {
        let cv = mackinnon_critical_values(100_000);
        assert_abs_diff_eq!(cv.one_percent, -3.430, epsilon = 1e-3);
        assert_abs_diff_eq!(cv.five_percent, -2.862, epsilon = 1e-3);
        assert_abs_diff_eq!(cv.ten_percent, -2.567, epsilon = 1e-3);
    }

    #[test]
    fn test_max_lag() {
        assert_eq!(max_lag(3), None);
        assert_eq!(max_lag(4), Some(0));
        assert_eq!(max_lag(5), Some(0));
        assert_eq!(max_lag(20), Some(8));
        assert_eq!(max_lag(100), Some(12));
    }

    #[test]
    fn test_adf_rejects_short_series() {
        assert!(matches!(
            adf_test(&[1.0, 2.0, 3.0]),
            Err(MathError::InsufficientData(_))
        ));
    }

    fn noise(n: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..n)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 33) as f64 / (1u64 << 31) as f64 - 0.5
            })
            .collect()
    }

    #[test]
    fn test_adf_white_noise_is_stationary() {
        let data: Vec<f64> = noise(80, 42).iter().map(|e| 50.0 + 10.0 * e).collect();
        let result = adf_test(&data).unwrap();
        assert!(result.p_value < 0.05, "p = {}", result.p_value);
    }

    #[test]
    fn test_adf_trending_series_is_not_stationary() {
        let data: Vec<f64> = noise(60, 7)
            .iter()
            .enumerate()
            .map(|(t, e)| 100.0 + 5.0 * t as f64 + 3.0 * e)
            .collect();
        let result = adf_test(&data).unwrap();
        assert!(result.p_value > 0.05, "p = {}", result.p_value);
    }

    #[test]
    fn test_adf_constant_series_has_nan_statistic() {
        let result = adf_test(&[7.0; 10]).unwrap();
        assert!(result.statistic.is_nan());
        assert!(result.p_value.is_nan());
    }

    #[test]
    fn test_adf_is_deterministic() {
        let data = [100.0, 110.0, 105.0, 120.0, 130.0];
        let first = adf_test(&data).unwrap();
        let second = adf_test(&data).unwrap();
        assert_eq!(first.statistic, second.statistic);
        assert_eq!(first.used_lag, 0);
        assert_eq!(first.nobs, 4);
    }
}
