//! Ordinary least squares
//!
//! Small dense solver used by the unit-root test. Designs are tiny (a
//! handful of regressors), so the normal equations are inverted directly.

use crate::{MathError, Result};

/// Result of an OLS fit
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// Estimated coefficients, one per design column
    pub params: Vec<f64>,
    /// Standard errors of the coefficients
    pub std_errors: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    /// Number of observations
    pub nobs: usize,
    /// Akaike information criterion (Gaussian log-likelihood)
    pub aic: f64,
}

impl OlsFit {
    /// t statistic of coefficient `index`
    pub fn t_value(&self, index: usize) -> f64 {
        match (self.params.get(index), self.std_errors.get(index)) {
            (Some(beta), Some(se)) if *se > 0.0 => beta / se,
            _ => f64::NAN,
        }
    }
}

/// Invert a square matrix with Gauss-Jordan elimination and partial pivoting.
fn invert(matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
    let k = matrix.len();
    let scale = matrix
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut inv: Vec<Vec<f64>> = (0..k)
        .map(|i| (0..k).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for col in 0..k {
        let pivot = (col..k)
            .max_by(|&x, &y| a[x][col].abs().total_cmp(&a[y][col].abs()))
            .unwrap_or(col);

        if a[pivot][col].abs() < 1e-12 * scale {
            return Err(MathError::CalculationError(
                "Design matrix is singular".to_string(),
            ));
        }

        a.swap(col, pivot);
        inv.swap(col, pivot);

        let diag = a[col][col];
        for j in 0..k {
            a[col][j] /= diag;
            inv[col][j] /= diag;
        }

        let pivot_row = a[col].clone();
        let pivot_inv = inv[col].clone();
        for row in 0..k {
            if row != col {
                let factor = a[row][col];
                if factor != 0.0 {
                    for j in 0..k {
                        a[row][j] -= factor * pivot_row[j];
                        inv[row][j] -= factor * pivot_inv[j];
                    }
                }
            }
        }
    }

    Ok(inv)
}

/// Fit `y = X b + e` by ordinary least squares.
///
/// `design` is row-major: one row per observation, one column per regressor.
pub fn ols(y: &[f64], design: &[Vec<f64>]) -> Result<OlsFit> {
    let n = y.len();
    if design.len() != n {
        return Err(MathError::InvalidInput(format!(
            "Design has {} rows but response has {} observations",
            design.len(),
            n
        )));
    }
    let k = design.first().map(|row| row.len()).unwrap_or(0);
    if k == 0 {
        return Err(MathError::InvalidInput(
            "Design matrix has no columns".to_string(),
        ));
    }
    if n <= k {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations for {} regressors, got {}",
            k, k, n
        )));
    }

    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];
    for (row, &target) in design.iter().zip(y) {
        for i in 0..k {
            xty[i] += row[i] * target;
            for j in 0..k {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }

    let xtx_inv = invert(&xtx)?;
    let params: Vec<f64> = (0..k)
        .map(|i| (0..k).map(|j| xtx_inv[i][j] * xty[j]).sum())
        .collect();

    let ssr: f64 = design
        .iter()
        .zip(y)
        .map(|(row, &target)| {
            let fitted: f64 = row.iter().zip(&params).map(|(x, b)| x * b).sum();
            (target - fitted).powi(2)
        })
        .sum();

    let sigma2 = ssr / (n - k) as f64;
    let std_errors = (0..k)
        .map(|i| (sigma2 * xtx_inv[i][i]).max(0.0).sqrt())
        .collect();

    let nf = n as f64;
    let llf = -nf / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (ssr / nf).ln() + 1.0);
    let aic = -2.0 * llf + 2.0 * k as f64;

    Ok(OlsFit {
        params,
        std_errors,
        ssr,
        nobs: n,
        aic,
    })
}
