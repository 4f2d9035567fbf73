//! Chart rendering and artifact sinks
//!
//! Charts are rendered to SVG documents in memory and handed to a
//! [`ChartSink`]. The sink decides where they end up, so independent
//! invocations can write to separate destinations.

use crate::config::ChartConfig;
use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use crate::forecast::ForecastResult;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// The charts the pipeline can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChartKind {
    /// First-differenced series (non-stationary branch only)
    Differenced,
    /// Autocorrelation of the differenced series
    Autocorrelation,
    /// Partial autocorrelation of the differenced series
    PartialAutocorrelation,
    /// History overlaid with the forecast
    Forecast,
}

impl ChartKind {
    /// File name used by [`DirectorySink`]
    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Differenced => "differenced_data.svg",
            ChartKind::Autocorrelation => "acf_plot.svg",
            ChartKind::PartialAutocorrelation => "pacf_plot.svg",
            ChartKind::Forecast => "forecast_plot.svg",
        }
    }
}

/// Destination for rendered charts
pub trait ChartSink {
    /// Store `document` as the latest chart of `kind`, replacing any previous one
    fn write_chart(&mut self, kind: ChartKind, document: &str) -> Result<()>;
}

/// Writes each chart to a fixed file name inside one directory.
///
/// Files are truncated and rewritten on every call, so the latest run wins.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a chart of `kind` is written to
    pub fn path_for(&self, kind: ChartKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl ChartSink for DirectorySink {
    fn write_chart(&mut self, kind: ChartKind, document: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(kind);
        fs::write(&path, document)?;
        tracing::debug!(path = %path.display(), ?kind, "wrote chart");
        Ok(())
    }
}

/// Keeps charts in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    charts: BTreeMap<ChartKind, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ChartKind) -> Option<&str> {
        self.charts.get(&kind).map(String::as_str)
    }

    /// Kinds written so far, in a stable order
    pub fn kinds(&self) -> Vec<ChartKind> {
        self.charts.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

impl ChartSink for MemorySink {
    fn write_chart(&mut self, kind: ChartKind, document: &str) -> Result<()> {
        self.charts.insert(kind, document.to_string());
        Ok(())
    }
}

fn chart_error<E: std::fmt::Display>(err: E) -> ForecastError {
    ForecastError::ChartError(err.to_string())
}

/// Value range padded so flat or single-point data still draws
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * 0.1).max(max.abs().max(1.0) * 0.05);
    (min - pad, max + pad)
}

/// Renders the pipeline charts as SVG
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(&ChartConfig::default())
    }
}

impl ChartRenderer {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    /// Line chart of a differenced series against its period labels
    pub fn render_differenced(&self, periods: &[i64], values: &[f64]) -> Result<String> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let x_min = periods.first().copied().unwrap_or(0);
            let x_max = periods.last().copied().unwrap_or(0).max(x_min + 1);
            let (y_min, y_max) = padded_range(values.iter().copied());

            let mut chart = ChartBuilder::on(&root)
                .caption("Data Setelah Differencing", ("sans-serif", 24))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .x_desc("Tahun")
                .y_desc("Perubahan Produksi (Ton)")
                .draw()
                .map_err(chart_error)?;

            let points: Vec<(i64, f64)> =
                periods.iter().copied().zip(values.iter().copied()).collect();
            chart
                .draw_series(LineSeries::new(points.iter().copied(), ORANGE.stroke_width(2)))
                .map_err(chart_error)?;
            chart
                .draw_series(points.iter().map(|&p| Circle::new(p, 4, ORANGE.filled())))
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }
        Ok(document)
    }

    /// Stem plot of correlations by lag, shaded with the per-lag band
    /// half-widths in `bands` (one per lag, non-finite entries skipped)
    pub fn render_correlogram(
        &self,
        title: &str,
        correlations: &[f64],
        bands: &[f64],
    ) -> Result<String> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let max_lag = correlations.len().saturating_sub(1) as f64;
            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 24))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(-0.5..max_lag + 0.5, -1.1f64..1.1f64)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .x_desc("Lag")
                .disable_x_mesh()
                .draw()
                .map_err(chart_error)?;

            let upper: Vec<(f64, f64)> = bands
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_finite())
                .map(|(lag, &b)| (lag as f64, b))
                .collect();
            if upper.len() > 1 {
                let outline: Vec<(f64, f64)> = upper
                    .iter()
                    .copied()
                    .chain(upper.iter().rev().map(|&(lag, b)| (lag, -b)))
                    .collect();
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        outline,
                        BLUE.mix(0.15).filled(),
                    )))
                    .map_err(chart_error)?;
            }

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(-0.5, 0.0), (max_lag + 0.5, 0.0)],
                    BLACK,
                )))
                .map_err(chart_error)?;

            chart
                .draw_series(correlations.iter().enumerate().map(|(lag, &r)| {
                    PathElement::new(vec![(lag as f64, 0.0), (lag as f64, r)], BLUE)
                }))
                .map_err(chart_error)?;
            chart
                .draw_series(
                    correlations
                        .iter()
                        .enumerate()
                        .map(|(lag, &r)| Circle::new((lag as f64, r), 4, BLUE.filled())),
                )
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }
        Ok(document)
    }

    /// History (solid line with markers) overlaid with the forecast
    pub fn render_forecast(
        &self,
        history: &TimeSeriesData,
        forecast: &ForecastResult,
    ) -> Result<String> {
        let mut document = String::new();
        {
            let root = SVGBackend::with_string(&mut document, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let historical: Vec<(i64, f64)> = history
                .periods()
                .iter()
                .copied()
                .zip(history.values().iter().copied())
                .collect();
            let projected: Vec<(i64, f64)> = forecast
                .points()
                .iter()
                .map(|p| (p.year, p.forecast as f64))
                .collect();

            let x_min = history.periods()[0];
            let x_max = forecast
                .years()
                .last()
                .copied()
                .unwrap_or_else(|| history.last_period())
                .max(x_min + 1);
            let (y_min, y_max) =
                padded_range(historical.iter().chain(projected.iter()).map(|&(_, v)| v));

            let mut chart = ChartBuilder::on(&root)
                .caption("Peramalan Produksi", ("sans-serif", 24))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .x_desc("Tahun")
                .y_desc("Produksi (Ton)")
                .draw()
                .map_err(chart_error)?;

            chart
                .draw_series(LineSeries::new(historical.iter().copied(), BLUE.stroke_width(2)))
                .map_err(chart_error)?
                .label("Data Historis")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
            chart
                .draw_series(historical.iter().map(|&p| Circle::new(p, 4, BLUE.filled())))
                .map_err(chart_error)?;

            chart
                .draw_series(LineSeries::new(projected.iter().copied(), RED.stroke_width(2)))
                .map_err(chart_error)?
                .label(format!("Forecast ({} tahun)", forecast.len()))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
            chart
                .draw_series(projected.iter().map(|&p| Circle::new(p, 4, RED.filled())))
                .map_err(chart_error)?;

            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range_handles_flat_data() {
        let (lo, hi) = padded_range([5.0, 5.0].into_iter());
        assert!(lo < 5.0 && hi > 5.0);
        assert_eq!(padded_range(std::iter::empty()), (-1.0, 1.0));
    }

    #[test]
    fn test_memory_sink_replaces_previous_chart() {
        let mut sink = MemorySink::new();
        sink.write_chart(ChartKind::Forecast, "<svg>a</svg>").unwrap();
        sink.write_chart(ChartKind::Forecast, "<svg>b</svg>").unwrap();
        assert_eq!(sink.get(ChartKind::Forecast), Some("<svg>b</svg>"));
        assert_eq!(sink.kinds(), vec![ChartKind::Forecast]);
    }

    #[test]
    fn test_correlogram_is_svg() {
        let renderer = ChartRenderer::default();
        let svg = renderer
            .render_correlogram("ACF", &[1.0, 0.4, -0.2], &[0.0, 0.5, 0.6])
            .unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("ACF"));
    }
}
