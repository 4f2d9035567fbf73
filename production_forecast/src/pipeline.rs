//! The forecasting pipeline
//!
//! Loader → stationarity test → (differencing + diagnostics) → ARIMA fit →
//! forecast → forecast chart. Each invocation reloads the data and refits
//! from scratch; every failure aborts the whole run.

use crate::charts::{ChartKind, ChartRenderer, ChartSink, DirectorySink};
use crate::config::ForecastConfig;
use crate::data::{DataLoader, TimeSeriesData};
use crate::differencing::{Diagnostics, Differencer, FittingSeries};
use crate::error::Result;
use crate::forecast::{validate_steps, ForecastResult};
use crate::models::{
    ArimaModel, ArimaOrder, ForecastModel, TrainedArimaModel, TrainedForecastModel,
};
use crate::stationarity::{test_stationarity, StationarityVerdict};
use std::path::Path;

/// Model order used for production forecasts
pub const PRODUCTION_ORDER: ArimaOrder = ArimaOrder::new(1, 3, 1);

/// Structural knobs of the pipeline.
///
/// The model's own differencing (`order.d`) and the manual first difference
/// applied to non-stationary input are independent, so with the defaults a
/// non-stationary series is differenced four times in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Order of the fitted model
    pub order: ArimaOrder,
    /// First-difference the series before fitting when the ADF test fails
    pub difference_when_nonstationary: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            order: PRODUCTION_ORDER,
            difference_when_nonstationary: true,
        }
    }
}

/// Everything one invocation produced
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub verdict: StationarityVerdict,
    pub fitting: FittingSeries,
    pub model: TrainedArimaModel,
    pub forecast: ForecastResult,
    pub diagnostics: Diagnostics,
}

impl ForecastOutcome {
    /// Differences applied between the raw series and the ARMA recursion:
    /// the manual step (0 or 1) plus the model's `d`.
    pub fn total_differencing(&self) -> usize {
        self.model.order().d + usize::from(self.fitting.is_differenced())
    }
}

/// Forecasting pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    loader: DataLoader,
    renderer: ChartRenderer,
    options: PipelineOptions,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&ForecastConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            loader: DataLoader::new(&config.columns),
            renderer: ChartRenderer::new(&config.chart),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Load `path` and forecast `steps` periods, writing charts into `sink`.
    ///
    /// `steps` is checked before anything is read or rendered.
    pub fn run<P: AsRef<Path>>(
        &self,
        path: P,
        steps: i64,
        sink: &mut dyn ChartSink,
    ) -> Result<ForecastOutcome> {
        let steps = validate_steps(steps)?;
        let series = self.loader.from_csv(path.as_ref())?;
        tracing::info!(
            path = %path.as_ref().display(),
            observations = series.len(),
            "loaded production series"
        );
        self.forecast_series(&series, steps, sink)
    }

    /// Run the pipeline on an already loaded series
    pub fn run_series(
        &self,
        series: &TimeSeriesData,
        steps: i64,
        sink: &mut dyn ChartSink,
    ) -> Result<ForecastOutcome> {
        let steps = validate_steps(steps)?;
        self.forecast_series(series, steps, sink)
    }

    fn forecast_series(
        &self,
        series: &TimeSeriesData,
        steps: usize,
        sink: &mut dyn ChartSink,
    ) -> Result<ForecastOutcome> {
        let verdict = test_stationarity(series.values())?;
        tracing::info!(
            statistic = verdict.statistic,
            p_value = verdict.p_value,
            is_stationary = verdict.is_stationary,
            "stationarity test"
        );

        let (fitting, diagnostics) =
            if !verdict.is_stationary && self.options.difference_when_nonstationary {
                let differencer = Differencer::new(self.renderer.clone());
                let (fitting, report) = differencer.apply(series, sink)?;
                (fitting, Diagnostics::Rendered(report))
            } else {
                tracing::info!("series is stationary, differencing skipped");
                (FittingSeries::raw(series), Diagnostics::Skipped)
            };

        let model = ArimaModel::new(self.options.order).train(&fitting)?;
        tracing::info!(
            model = model.name(),
            fitting_len = fitting.len(),
            differenced = fitting.is_differenced(),
            "model fitted"
        );

        let predictions = model.forecast(steps)?;
        let forecast = ForecastResult::from_predictions(series.last_period(), &predictions)?;

        let chart = self.renderer.render_forecast(series, &forecast)?;
        sink.write_chart(ChartKind::Forecast, &chart)?;
        tracing::info!(steps, "forecast complete");

        Ok(ForecastOutcome {
            verdict,
            fitting,
            model,
            forecast,
            diagnostics,
        })
    }
}

/// Forecast `steps` years from the CSV at `file_path`.
///
/// Configuration comes from [`ForecastConfig::load`]; charts are written to
/// its `output_dir`.
pub fn forecast<P: AsRef<Path>>(file_path: P, steps: i64) -> Result<ForecastResult> {
    let config = ForecastConfig::load()?;
    let mut sink = DirectorySink::new(&config.output_dir);
    Pipeline::new(&config)
        .run(file_path, steps, &mut sink)
        .map(|outcome| outcome.forecast)
}
