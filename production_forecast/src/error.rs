//! Error types for the production_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the forecasting pipeline.
///
/// Any of these aborts the whole invocation; no partial forecast is returned.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Source file missing, unreadable or lacking the required columns
    #[error("Data load error: {0}")]
    DataLoadError(String),

    /// Series too short for the stationarity test
    #[error("Insufficient data: {0}")]
    InsufficientDataError(String),

    /// Degenerate fitting series or optimiser non-convergence
    #[error("Model fit error: {0}")]
    ModelFitError(String),

    /// Invalid horizon or unusable prediction
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Chart rendering failed
    #[error("Chart error: {0}")]
    ChartError(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::DataLoadError(err.to_string())
    }
}

impl From<config::ConfigError> for ForecastError {
    fn from(err: config::ConfigError) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::IoError(std::io::Error::new(std::io::ErrorKind::Other, err))
    }
}
