//! Sample autocorrelation and partial autocorrelation
//!
//! Both use the biased (divide by `n`) autocovariance estimator, so the
//! partial autocorrelations are the Yule-Walker MLE estimates obtained from
//! the Durbin-Levinson recursion.

use crate::{MathError, Result};

/// Biased sample autocovariances for lags `0..=nlags`.
fn autocovariance(data: &[f64], nlags: usize) -> Vec<f64> {
    let n = data.len();
    let mean = data.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = data.iter().map(|x| x - mean).collect();

    (0..=nlags)
        .map(|k| {
            let sum: f64 = (k..n).map(|t| centered[t] * centered[t - k]).sum();
            sum / n as f64
        })
        .collect()
}

/// Sample autocorrelation function for lags `0..=nlags`.
///
/// A series with zero variance has no defined correlation; it is reported
/// as `1.0` at lag 0 and `0.0` elsewhere.
pub fn acf(data: &[f64], nlags: usize) -> Result<Vec<f64>> {
    if data.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute autocorrelation of an empty series".to_string(),
        ));
    }
    if nlags >= data.len() {
        return Err(MathError::InvalidInput(format!(
            "Number of lags ({}) must be smaller than the series length ({})",
            nlags,
            data.len()
        )));
    }

    let acov = autocovariance(data, nlags);
    if acov[0].abs() < 1e-12 {
        let mut flat = vec![0.0; nlags + 1];
        flat[0] = 1.0;
        return Ok(flat);
    }

    Ok(acov.iter().map(|c| c / acov[0]).collect())
}

/// Durbin-Levinson recursion over autocorrelations `rho[0..=order]`.
///
/// Returns the partial autocorrelations (index 0 is 1.0) and the AR
/// coefficients of the final order.
fn durbin_levinson(rho: &[f64], order: usize) -> (Vec<f64>, Vec<f64>) {
    let mut partial = vec![1.0];
    let mut phi: Vec<f64> = Vec::with_capacity(order);

    for k in 1..=order {
        let numerator = rho[k] - (0..k - 1).map(|j| phi[j] * rho[k - 1 - j]).sum::<f64>();
        let denominator = 1.0 - (0..k - 1).map(|j| phi[j] * rho[j + 1]).sum::<f64>();

        let phi_kk = if denominator.abs() < 1e-12 {
            0.0
        } else {
            numerator / denominator
        };

        let previous = phi.clone();
        for j in 0..k - 1 {
            phi[j] = previous[j] - phi_kk * previous[k - 2 - j];
        }
        phi.push(phi_kk);
        partial.push(phi_kk);
    }

    (partial, phi)
}

/// Sample partial autocorrelation function for lags `0..=nlags`.
///
/// `nlags` must be below half the sample size, the same limit the usual
/// Yule-Walker estimator imposes.
pub fn pacf(data: &[f64], nlags: usize) -> Result<Vec<f64>> {
    if nlags > 0 && nlags >= data.len() / 2 {
        return Err(MathError::InvalidInput(format!(
            "PACF lags must be below half the sample size ({} >= {})",
            nlags,
            data.len() / 2
        )));
    }

    let rho = acf(data, nlags)?;
    let (partial, _) = durbin_levinson(&rho, nlags);
    Ok(partial)
}

/// Yule-Walker estimate of AR(`order`) coefficients.
pub fn yule_walker(data: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(Vec::new());
    }
    if data.len() <= order {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations for an AR({}) fit, got {}",
            order,
            order,
            data.len()
        )));
    }

    let rho = acf(data, order)?;
    let (_, phi) = durbin_levinson(&rho, order);
    Ok(phi)
}

/// Half-widths of the confidence band around each autocorrelation.
///
/// Uses Bartlett's formula: the variance at lag `k` is
/// `(1 + 2 * sum(r_j^2 for j in 1..k)) / n`, and lag 0 has no band.
/// `z` is the normal quantile (1.96 for 95%).
pub fn bartlett_bands(acf: &[f64], n: usize, z: f64) -> Vec<f64> {
    let mut bands = Vec::with_capacity(acf.len());
    let mut cumulative = 0.0;
    for (k, r) in acf.iter().enumerate() {
        if k == 0 {
            bands.push(0.0);
            continue;
        }
        bands.push(z * ((1.0 + 2.0 * cumulative) / n as f64).sqrt());
        cumulative += r * r;
    }
    bands
}

/// Half-widths of the white-noise band around each partial autocorrelation,
/// `z / sqrt(n)` for every lag after 0.
pub fn white_noise_bands(lags: usize, n: usize, z: f64) -> Vec<f64> {
    let half_width = z / (n as f64).sqrt();
    (0..lags)
        .map(|k| if k == 0 { 0.0 } else { half_width })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_acf_lag_zero_is_one() {
        let data = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let result = acf(&data, 3).unwrap();
        assert_eq!(result.len(), 4);
        assert_abs_diff_eq!(result[0], 1.0);
        assert!(result.iter().all(|r| r.abs() <= 1.0 + 1e-12));
    }

    #[test]
    fn test_acf_alternating_series() {
        let data = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let result = acf(&data, 1).unwrap();
        // Biased estimator: 5 products of -1 over 6 observations
        assert_abs_diff_eq!(result[1], -5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_acf_constant_series() {
        let result = acf(&[4.0; 5], 2).unwrap();
        assert_eq!(result, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_pacf_first_lag_matches_acf() {
        let data = [2.0, 4.0, 3.0, 6.0, 5.0, 7.0, 6.0, 9.0, 8.0, 10.0];
        let rho = acf(&data, 4).unwrap();
        let partial = pacf(&data, 4).unwrap();
        assert_eq!(partial.len(), 5);
        assert_abs_diff_eq!(partial[1], rho[1], epsilon = 1e-12);
    }

    #[test]
    fn test_pacf_lag_limit() {
        let data = [1.0, 2.0, 1.5, 3.0];
        assert!(pacf(&data, 2).is_err());
        assert_eq!(pacf(&data, 1).unwrap().len(), 2);
    }

    #[test]
    fn test_yule_walker_ar1() {
        // x_t = 0.6 x_{t-1} impulse response
        let data: Vec<f64> = (0..60).map(|t| 0.6f64.powi(t)).collect();
        let phi = yule_walker(&data, 1).unwrap();
        assert_eq!(phi.len(), 1);
        assert!(phi[0] > 0.0 && phi[0] < 1.0);
    }

    #[test]
    fn test_bartlett_bands_widen_with_lag() {
        let rho = [1.0, 0.5, 0.25, 0.0];
        let bands = bartlett_bands(&rho, 100, 1.96);

        assert_eq!(bands.len(), 4);
        assert_eq!(bands[0], 0.0);
        assert_abs_diff_eq!(bands[1], 0.196, epsilon = 1e-12);
        assert_abs_diff_eq!(bands[2], 1.96 * (1.5f64 / 100.0).sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(bands[3], 1.96 * (1.625f64 / 100.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_white_noise_bands_are_flat() {
        let bands = white_noise_bands(3, 25, 1.96);
        assert_eq!(bands, vec![0.0, 0.392, 0.392]);
    }
}
