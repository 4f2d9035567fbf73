//! # Production Forecast
//!
//! Yearly production forecasting with an ARIMA(1,3,1) model.
//!
//! ## Features
//!
//! - CSV loading of a `Tahun` / `Produksi` series (column names configurable)
//! - Augmented Dickey-Fuller stationarity test at the 5% level
//! - First differencing of non-stationary input, with differenced/ACF/PACF charts
//! - ARIMA fitting by conditional sum of squares
//! - Integer forecasts labelled with the years following the history
//! - SVG forecast chart, JSON and CSV output
//!
//! ## Quick Start
//!
//! ```no_run
//! use production_forecast::charts::DirectorySink;
//! use production_forecast::config::ForecastConfig;
//! use production_forecast::pipeline::Pipeline;
//!
//! let config = ForecastConfig::default();
//! let mut sink = DirectorySink::new("static");
//! let outcome = Pipeline::new(&config).run("data1.csv", 5, &mut sink)?;
//!
//! for point in outcome.forecast.points() {
//!     println!("{}: {}", point.year, point.forecast);
//! }
//! # Ok::<(), production_forecast::ForecastError>(())
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod differencing;
pub mod error;
pub mod forecast;
pub mod models;
pub mod pipeline;
pub mod stationarity;

// Re-export commonly used types
pub use crate::charts::{ChartKind, ChartRenderer, ChartSink, DirectorySink, MemorySink};
pub use crate::config::ForecastConfig;
pub use crate::data::{DataLoader, TimeSeriesData};
pub use crate::differencing::{Diagnostics, FittingSeries};
pub use crate::error::ForecastError;
pub use crate::forecast::{ForecastPoint, ForecastResult};
pub use crate::models::{ArimaModel, ArimaOrder, ForecastModel, TrainedForecastModel};
pub use crate::pipeline::{forecast, ForecastOutcome, Pipeline, PipelineOptions};
pub use crate::stationarity::StationarityVerdict;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
