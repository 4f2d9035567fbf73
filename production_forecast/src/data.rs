//! Time series data handling for forecasting

use crate::config::ColumnConfig;
use crate::error::{ForecastError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Yearly series of (period, value) pairs with strictly increasing periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesData {
    /// Period labels (years)
    periods: Vec<i64>,
    /// Observed values
    values: Vec<f64>,
}

/// Data loader for the two-column production series
#[derive(Debug, Clone)]
pub struct DataLoader {
    period_column: String,
    value_column: String,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(&ColumnConfig::default())
    }
}

impl DataLoader {
    /// Create a loader reading the given column names
    pub fn new(columns: &ColumnConfig) -> Self {
        Self {
            period_column: columns.period.clone(),
            value_column: columns.value.clone(),
        }
    }

    /// Name of the period column
    pub fn period_column(&self) -> &str {
        &self.period_column
    }

    /// Name of the value column
    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    /// Load time series data from a CSV file. Every call re-reads the file.
    pub fn from_csv<P: AsRef<Path>>(&self, path: P) -> Result<TimeSeriesData> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ForecastError::DataLoadError(format!("Cannot open '{}': {}", path.display(), e))
        })?;

        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        tracing::debug!(rows = df.height(), path = %path.display(), "read CSV source");
        self.from_dataframe(&df)
    }

    /// Create time series data from an existing DataFrame
    pub fn from_dataframe(&self, df: &DataFrame) -> Result<TimeSeriesData> {
        let periods = self.period_values(df)?;
        let values = self.column_as_f64(df, &self.value_column)?;
        TimeSeriesData::new(periods, values)
    }

    fn required_column<'a>(&self, df: &'a DataFrame, name: &str) -> Result<&'a Series> {
        df.column(name).map_err(|_| {
            ForecastError::DataLoadError(format!(
                "Required column '{}' not found (available: {})",
                name,
                df.get_column_names().join(", ")
            ))
        })
    }

    fn period_values(&self, df: &DataFrame) -> Result<Vec<i64>> {
        let col = self.required_column(df, &self.period_column)?;
        let cast = col.cast(&DataType::Int64)?;
        cast.i64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| {
                    ForecastError::DataLoadError(format!(
                        "Column '{}' has a missing or non-integer value at row {}",
                        self.period_column,
                        row + 1
                    ))
                })
            })
            .collect()
    }

    /// Helper method to get a column as f64 values
    fn column_as_f64(&self, df: &DataFrame, column_name: &str) -> Result<Vec<f64>> {
        let col = self.required_column(df, column_name)?;
        let cast = col.cast(&DataType::Float64)?;
        cast.f64()?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if v.is_finite() => Ok(v),
                _ => Err(ForecastError::DataLoadError(format!(
                    "Column '{}' has a missing or non-numeric value at row {}",
                    column_name,
                    row + 1
                ))),
            })
            .collect()
    }
}

impl TimeSeriesData {
    /// Create a series, checking lengths match and periods strictly increase
    pub fn new(periods: Vec<i64>, values: Vec<f64>) -> Result<Self> {
        if periods.len() != values.len() {
            return Err(ForecastError::DataLoadError(format!(
                "Period count ({}) doesn't match value count ({})",
                periods.len(),
                values.len()
            )));
        }
        if periods.is_empty() {
            return Err(ForecastError::DataLoadError(
                "Time series is empty".to_string(),
            ));
        }
        if let Some(w) = periods.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ForecastError::DataLoadError(format!(
                "Periods must be strictly increasing ({} followed by {})",
                w[0], w[1]
            )));
        }

        Ok(Self { periods, values })
    }

    /// Build a series from (period, value) pairs
    pub fn from_pairs(pairs: &[(i64, f64)]) -> Result<Self> {
        let (periods, values) = pairs.iter().copied().unzip();
        Self::new(periods, values)
    }

    /// Get the period labels
    pub fn periods(&self) -> &[i64] {
        &self.periods
    }

    /// Get the observed values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last historical period
    pub fn last_period(&self) -> i64 {
        // Construction guarantees at least one element
        self.periods[self.periods.len() - 1]
    }

    /// Check if the time series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the length of the time series
    pub fn len(&self) -> usize {
        self.values.len()
    }
}
