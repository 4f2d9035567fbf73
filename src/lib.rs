//! # Production Forecast Workspace
//!
//! Umbrella crate for the production forecasting workspace.
//!
//! - [`stats`]: numerical building blocks (differencing, correlograms, OLS,
//!   the augmented Dickey-Fuller test, Nelder-Mead)
//! - [`forecast`]: the loading, testing, fitting and charting pipeline
//!
//! ## Example
//!
//! ```
//! use production_forecast_workspace::stats::difference;
//!
//! assert_eq!(difference(&[100.0, 110.0, 105.0]), vec![10.0, -5.0]);
//! ```

pub use production_forecast as forecast;
pub use ts_stats as stats;
