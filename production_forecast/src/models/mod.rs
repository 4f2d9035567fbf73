//! Forecasting models for the production series

use crate::differencing::FittingSeries;
use crate::error::Result;
use std::fmt::Debug;

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Real-valued point forecasts for the next `horizon` periods
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a fitting series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the fitting series
    fn train(&self, data: &FittingSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;

pub use arima::{ArimaModel, ArimaOrder, TrainedArimaModel};
