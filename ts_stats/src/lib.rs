//! # TS Stats
//!
//! Numeric building blocks for univariate time series work.
//! This crate provides differencing and integration, sample autocorrelation
//! and partial autocorrelation, ordinary least squares, the Augmented
//! Dickey-Fuller unit-root test and a small Nelder-Mead minimiser.
//!
//! Everything here operates on plain `&[f64]` slices and performs no I/O.

use thiserror::Error;

pub mod correlation;
pub mod differencing;
pub mod optimize;
pub mod regression;
pub mod unit_root;

pub use correlation::{acf, bartlett_bands, pacf, white_noise_bands, yule_walker};
pub use differencing::{difference, difference_n, integrate};
pub use optimize::{Minimum, NelderMead};
pub use regression::{ols, OlsFit};
pub use unit_root::{
    adf_test, mackinnon_critical_values, mackinnon_p_value, AdfResult, CriticalValues,
};

/// Errors that can occur in statistical calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for statistical operations
pub type Result<T> = std::result::Result<T, MathError>;
