//! Differencing and its inverse
//!
//! `difference_n` removes `order` unit roots from a series; `integrate`
//! undoes it for values projected past the end of the series.

use crate::{MathError, Result};

/// First difference of a series, dropping the undefined leading element.
///
/// The output has `data.len() - 1` elements (or none for inputs shorter than 2).
pub fn difference(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Apply first differencing `order` times.
pub fn difference_n(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = difference(&result);
    }
    result
}

/// Integrate values forecast on the `order`-times differenced scale back to
/// the scale of `history`.
///
/// Each differencing level is anchored at the last observed value of that
/// level, so the output continues `history` directly.
pub fn integrate(forecasts: &[f64], history: &[f64], order: usize) -> Result<Vec<f64>> {
    if order == 0 {
        return Ok(forecasts.to_vec());
    }
    if history.len() < order {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} observations to undo {} differences, got {}",
            order,
            order,
            history.len()
        )));
    }

    // Last value of each differencing level 0..order-1
    let mut anchors = Vec::with_capacity(order);
    let mut level = history.to_vec();
    for _ in 0..order {
        match level.last() {
            Some(&last) => anchors.push(last),
            None => {
                return Err(MathError::InsufficientData(
                    "Differencing level is empty".to_string(),
                ))
            }
        }
        level = difference(&level);
    }

    let mut result = forecasts.to_vec();
    for &anchor in anchors.iter().rev() {
        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    Ok(result)
}
