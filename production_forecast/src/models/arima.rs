//! ARIMA models for the production series
//!
//! The model differences its input `d` times and fits an ARMA(p, q) without
//! constant to the result by conditional sum of squares: pre-sample values
//! and innovations are taken as zero and the squared one-step errors are
//! minimised with Nelder-Mead. Coefficients are searched in an unconstrained
//! space mapped onto the stationary (AR) and invertible (MA) regions.

use crate::differencing::FittingSeries;
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_stats::{difference_n, integrate, yule_walker, NelderMead};

/// Search bound on unconstrained parameters; keeps partial autocorrelations
/// within about ±0.995
const PARAMETER_BOUND: f64 = 10.0;

/// Structural order (p, d, q) of an ARIMA model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order
    pub p: usize,
    /// Differencing order
    pub d: usize,
    /// MA order
    pub q: usize,
}

impl ArimaOrder {
    pub const fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    /// Structural order
    order: ArimaOrder,
    /// Minimiser used for the CSS objective
    optimizer: NelderMead,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    /// Structural order
    order: ArimaOrder,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Innovation variance estimate
    sigma2: f64,
    /// Conditional sum of squares at the optimum
    css: f64,
    /// Optimiser iterations
    iterations: usize,
    /// Series the model was fitted on
    historical_data: Vec<f64>,
    /// Series after the model's own differencing
    differenced_data: Vec<f64>,
    /// One-step residuals on the differenced scale
    residuals: Vec<f64>,
}

/// Map unconstrained values to coefficients of a stationary AR polynomial.
///
/// Each value becomes a partial autocorrelation in (-1, 1) and the
/// Durbin-Levinson recursion turns those into AR coefficients.
fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let mut coefficients: Vec<f64> = Vec::with_capacity(unconstrained.len());
    for (k, &u) in unconstrained.iter().enumerate() {
        let u = u.clamp(-PARAMETER_BOUND, PARAMETER_BOUND);
        let r = u / (1.0 + u * u).sqrt();
        let previous = coefficients.clone();
        for j in 0..k {
            coefficients[j] = previous[j] - r * previous[k - 1 - j];
        }
        coefficients.push(r);
    }
    coefficients
}

/// Inverse of [`constrain_stationary`] for coefficients inside the region.
fn unconstrain_stationary(coefficients: &[f64]) -> Vec<f64> {
    let p = coefficients.len();
    let mut current = coefficients.to_vec();
    let mut partials = vec![0.0; p];

    for k in (0..p).rev() {
        let r = current[k].clamp(-0.99, 0.99);
        partials[k] = r;
        let denominator = 1.0 - r * r;
        let previous = current.clone();
        for j in 0..k {
            current[j] = (previous[j] + r * previous[k - 1 - j]) / denominator;
        }
        current.truncate(k);
    }

    partials
        .iter()
        .map(|r| r / (1.0 - r * r).sqrt())
        .collect()
}

/// One-step errors of an ARMA recursion with zero pre-sample values
fn css_residuals(data: &[f64], ar: &[f64], ma: &[f64]) -> Vec<f64> {
    let mut residuals = Vec::with_capacity(data.len());
    for t in 0..data.len() {
        let mut prediction = 0.0;
        for (i, phi) in ar.iter().enumerate() {
            if t > i {
                prediction += phi * data[t - 1 - i];
            }
        }
        for (j, theta) in ma.iter().enumerate() {
            if t > j {
                prediction += theta * residuals[t - 1 - j];
            }
        }
        residuals.push(data[t] - prediction);
    }
    residuals
}

impl ArimaModel {
    /// Create a new ARIMA model with the default optimiser
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
            optimizer: NelderMead::new().with_max_iterations(5000),
        }
    }

    /// Replace the optimiser (iteration budget, tolerances)
    pub fn with_optimizer(mut self, optimizer: NelderMead) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Split a parameter vector into (AR, MA) coefficients
    fn coefficients(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let ar = constrain_stationary(&params[..self.order.p]);
        let ma = constrain_stationary(&params[self.order.p..])
            .into_iter()
            .map(|c| -c)
            .collect();
        (ar, ma)
    }

    fn validate(&self, values: &[f64]) -> Result<()> {
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFitError(
                "Fitting series contains NaN or infinite values".to_string(),
            ));
        }
        if values.len() <= self.order.d {
            return Err(ForecastError::ModelFitError(format!(
                "{} needs more than {} observations, got {}",
                self.name,
                self.order.d,
                values.len()
            )));
        }
        let first = values[0];
        if values.iter().all(|&v| v == first) {
            return Err(ForecastError::ModelFitError(
                "Fitting series is constant".to_string(),
            ));
        }
        Ok(())
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &FittingSeries) -> Result<TrainedArimaModel> {
        let values = data.values();
        self.validate(values)?;

        let differenced = difference_n(values, self.order.d);

        let ar_start = match yule_walker(&differenced, self.order.p) {
            Ok(coefficients) => unconstrain_stationary(&coefficients),
            Err(_) => vec![0.0; self.order.p],
        };
        let mut start = ar_start;
        start.extend(std::iter::repeat(0.0).take(self.order.q));

        let objective = |params: &[f64]| {
            let (ar, ma) = self.coefficients(params);
            css_residuals(&differenced, &ar, &ma)
                .iter()
                .map(|e| e * e)
                .sum::<f64>()
        };

        let minimum = self
            .optimizer
            .minimize(objective, &start)
            .map_err(|e| ForecastError::ModelFitError(e.to_string()))?;

        if !minimum.converged {
            return Err(ForecastError::ModelFitError(format!(
                "{} optimiser did not converge after {} iterations",
                self.name, minimum.iterations
            )));
        }
        if !minimum.fx.is_finite() {
            return Err(ForecastError::ModelFitError(
                "Conditional sum of squares is not finite".to_string(),
            ));
        }

        let (ar_coefficients, ma_coefficients) = self.coefficients(&minimum.x);
        let residuals = css_residuals(&differenced, &ar_coefficients, &ma_coefficients);
        let sigma2 = minimum.fx / differenced.len() as f64;

        tracing::debug!(
            model = %self.name,
            ar = ?ar_coefficients,
            ma = ?ma_coefficients,
            sigma2,
            iterations = minimum.iterations,
            "fitted model"
        );

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            ar_coefficients,
            ma_coefficients,
            sigma2,
            css: minimum.fx,
            iterations: minimum.iterations,
            historical_data: values.to_vec(),
            differenced_data: differenced,
            residuals,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if self.historical_data.is_empty() {
            return Err(ForecastError::ForecastingError(
                "Model has not been fitted to data".to_string(),
            ));
        }

        let n = self.differenced_data.len();
        let mut extended = self.differenced_data.clone();
        let mut innovations = self.residuals.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut forecast = 0.0;
            for (i, phi) in self.ar_coefficients.iter().enumerate() {
                if t > i {
                    forecast += phi * extended[t - 1 - i];
                }
            }
            for (j, theta) in self.ma_coefficients.iter().enumerate() {
                if t > j {
                    forecast += theta * innovations[t - 1 - j];
                }
            }
            extended.push(forecast);
            // Future innovations have zero expectation
            innovations.push(0.0);
        }

        integrate(&extended[n..], &self.historical_data, self.order.d)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Innovation variance estimate (CSS / observations)
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Conditional sum of squares at the optimum
    pub fn css(&self) -> f64 {
        self.css
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Series after the model's internal differencing
    pub fn differenced_data(&self) -> &[f64] {
        &self.differenced_data
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }
}
