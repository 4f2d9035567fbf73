//! Stationarity check gating the differencing branch

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use ts_stats::{adf_test, CriticalValues, MathError};

/// P-values at or below this reject the unit-root hypothesis
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Outcome of the Augmented Dickey-Fuller test on the raw series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationarityVerdict {
    /// ADF t statistic
    pub statistic: f64,
    /// MacKinnon approximate p-value
    pub p_value: f64,
    /// `p_value <= SIGNIFICANCE_LEVEL`
    pub is_stationary: bool,
    /// Lagged differences selected by AIC
    pub used_lag: usize,
    /// Observations in the test regression
    pub nobs: usize,
    /// Critical values at 1%, 5% and 10%
    pub critical_values: CriticalValues,
}

/// Run the ADF test on `values` and decide stationarity.
///
/// A NaN p-value (constant input) compares false and so counts as
/// non-stationary.
pub fn test_stationarity(values: &[f64]) -> Result<StationarityVerdict> {
    let adf = adf_test(values).map_err(|e| match e {
        MathError::InsufficientData(msg) => ForecastError::InsufficientDataError(msg),
        other => ForecastError::DataLoadError(other.to_string()),
    })?;

    Ok(StationarityVerdict {
        statistic: adf.statistic,
        p_value: adf.p_value,
        is_stationary: adf.p_value <= SIGNIFICANCE_LEVEL,
        used_lag: adf.used_lag,
        nobs: adf.nobs,
        critical_values: adf.critical_values,
    })
}
