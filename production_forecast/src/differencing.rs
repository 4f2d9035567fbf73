//! Series selection for model fitting
//!
//! A stationary series is fitted as is. A non-stationary one is replaced by
//! its first difference, and the differencing step also produces the
//! diagnostic charts (differenced series, ACF, PACF).

use crate::charts::{ChartKind, ChartRenderer, ChartSink};
use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use ts_stats::{acf, bartlett_bands, difference, pacf, white_noise_bands};

/// Normal quantile for the 95% correlogram bands
const BAND_QUANTILE: f64 = 1.96;

/// The series actually handed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittingSeries {
    periods: Vec<i64>,
    values: Vec<f64>,
    differenced: bool,
}

impl FittingSeries {
    /// Use the raw series unchanged
    pub fn raw(series: &TimeSeriesData) -> Self {
        Self {
            periods: series.periods().to_vec(),
            values: series.values().to_vec(),
            differenced: false,
        }
    }

    /// First difference; the first period has no predecessor and is dropped
    pub fn first_difference(series: &TimeSeriesData) -> Self {
        Self {
            periods: series.periods().iter().skip(1).copied().collect(),
            values: difference(series.values()),
            differenced: true,
        }
    }

    pub fn periods(&self) -> &[i64] {
        &self.periods
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Whether the pipeline differenced this series before fitting
    pub fn is_differenced(&self) -> bool {
        self.differenced
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Correlograms computed on the differenced series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    /// Autocorrelations for lags 0..=n
    pub acf: Vec<f64>,
    /// Partial autocorrelations for lags 0..=m
    pub pacf: Vec<f64>,
    /// 95% band half-widths per ACF lag (Bartlett)
    pub acf_bands: Vec<f64>,
    /// 95% band half-widths per PACF lag, 1.96 / sqrt(n)
    pub pacf_bands: Vec<f64>,
    /// Charts written to the sink
    pub charts: Vec<ChartKind>,
}

/// Whether the diagnostic charts were produced on this invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostics {
    /// Series was stationary; nothing rendered
    Skipped,
    /// Series was differenced and diagnostics rendered
    Rendered(DiagnosticReport),
}

impl Diagnostics {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Diagnostics::Rendered(_))
    }

    pub fn report(&self) -> Option<&DiagnosticReport> {
        match self {
            Diagnostics::Rendered(report) => Some(report),
            Diagnostics::Skipped => None,
        }
    }
}

/// Lags shown in the correlograms for a series of length `n`: `ceil(10 log10 n)`
/// capped at `n - 1` for the ACF and below `n / 2` for the PACF.
pub fn diagnostic_lags(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let wanted = (10.0 * (n as f64).log10()).ceil().max(0.0) as usize;
    let acf_lags = wanted.min(n - 1);
    let pacf_lags = wanted.min((n / 2).saturating_sub(1));
    (acf_lags, pacf_lags)
}

/// Differences the series and renders the diagnostic charts into `sink`
#[derive(Debug, Clone)]
pub struct Differencer {
    renderer: ChartRenderer,
}

impl Differencer {
    pub fn new(renderer: ChartRenderer) -> Self {
        Self { renderer }
    }

    /// First-difference `series` and write the three diagnostic charts.
    pub fn apply(
        &self,
        series: &TimeSeriesData,
        sink: &mut dyn ChartSink,
    ) -> Result<(FittingSeries, DiagnosticReport)> {
        let fitting = FittingSeries::first_difference(series);
        if fitting.is_empty() {
            return Err(ForecastError::InsufficientDataError(
                "Differencing needs at least two observations".to_string(),
            ));
        }

        let (acf_lags, pacf_lags) = diagnostic_lags(fitting.len());
        let diagnostic_error = |e: ts_stats::MathError| ForecastError::ChartError(e.to_string());
        let acf_values = acf(fitting.values(), acf_lags).map_err(diagnostic_error)?;
        let pacf_values = pacf(fitting.values(), pacf_lags).map_err(diagnostic_error)?;
        let acf_bands = bartlett_bands(&acf_values, fitting.len(), BAND_QUANTILE);
        let pacf_bands = white_noise_bands(pacf_values.len(), fitting.len(), BAND_QUANTILE);
        tracing::debug!(acf_lags, pacf_lags, "computed correlograms");

        let differenced = self
            .renderer
            .render_differenced(fitting.periods(), fitting.values())?;
        sink.write_chart(ChartKind::Differenced, &differenced)?;

        let acf_chart = self
            .renderer
            .render_correlogram("ACF", &acf_values, &acf_bands)?;
        sink.write_chart(ChartKind::Autocorrelation, &acf_chart)?;

        let pacf_chart = self
            .renderer
            .render_correlogram("PACF", &pacf_values, &pacf_bands)?;
        sink.write_chart(ChartKind::PartialAutocorrelation, &pacf_chart)?;

        let report = DiagnosticReport {
            acf: acf_values,
            pacf: pacf_values,
            acf_bands,
            pacf_bands,
            charts: vec![
                ChartKind::Differenced,
                ChartKind::Autocorrelation,
                ChartKind::PartialAutocorrelation,
            ],
        };

        Ok((fitting, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::MemorySink;

    fn sample() -> TimeSeriesData {
        TimeSeriesData::from_pairs(&[
            (2018, 100.0),
            (2019, 110.0),
            (2020, 105.0),
            (2021, 120.0),
            (2022, 130.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_first_difference_drops_first_period() {
        let fitting = FittingSeries::first_difference(&sample());
        assert_eq!(fitting.len(), 4);
        assert_eq!(fitting.periods(), &[2019, 2020, 2021, 2022]);
        assert_eq!(fitting.values(), &[10.0, -5.0, 15.0, 10.0]);
        assert!(fitting.is_differenced());
    }

    #[test]
    fn test_raw_keeps_series() {
        let series = sample();
        let fitting = FittingSeries::raw(&series);
        assert_eq!(fitting.values(), series.values());
        assert!(!fitting.is_differenced());
    }

    #[test]
    fn test_diagnostic_lags() {
        assert_eq!(diagnostic_lags(4), (3, 1));
        assert_eq!(diagnostic_lags(100), (20, 20));
        assert_eq!(diagnostic_lags(1), (0, 0));
    }

    #[test]
    fn test_apply_writes_three_charts() {
        let mut sink = MemorySink::new();
        let differencer = Differencer::new(ChartRenderer::default());
        let (fitting, report) = differencer.apply(&sample(), &mut sink).unwrap();

        assert_eq!(fitting.len(), 4);
        assert_eq!(report.acf.len(), 4);
        assert_eq!(report.pacf.len(), 2);
        assert_eq!(report.acf_bands.len(), report.acf.len());
        assert_eq!(report.pacf_bands.len(), report.pacf.len());
        assert!(report.acf_bands.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(report.pacf_bands[1], 1.96 / 2.0);
        assert_eq!(
            sink.kinds(),
            vec![
                ChartKind::Differenced,
                ChartKind::Autocorrelation,
                ChartKind::PartialAutocorrelation
            ]
        );
    }
}
