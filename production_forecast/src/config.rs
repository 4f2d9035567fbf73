//! Runtime configuration
//!
//! Values come from an optional `forecast.toml` in the working directory,
//! then from `FORECAST__*` environment variables (for example
//! `FORECAST__COLUMNS__VALUE=Production`). Every field has a default, so an
//! empty environment yields a working configuration.

use crate::error::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// CSV file read when the caller does not name one
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    /// Directory receiving chart artifacts
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Horizon used when the caller does not give one
    #[serde(default = "default_steps")]
    pub default_steps: i64,
    #[serde(default)]
    pub columns: ColumnConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    #[serde(default = "default_period_column")]
    pub period: String,
    #[serde(default = "default_value_column")]
    pub value: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data1.csv")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("static")
}
fn default_steps() -> i64 {
    10
}
fn default_period_column() -> String {
    "Tahun".to_string()
}
fn default_value_column() -> String {
    "Produksi".to_string()
}
fn default_chart_width() -> u32 {
    1000
}
fn default_chart_height() -> u32 {
    600
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            period: default_period_column(),
            value: default_value_column(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            output_dir: default_output_dir(),
            default_steps: default_steps(),
            columns: ColumnConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Load from `forecast.toml` (optional) and `FORECAST__*` variables.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("forecast").required(false))
            .add_source(config::Environment::with_prefix("FORECAST").separator("__"))
            .build()?;

        let forecast_config: ForecastConfig = config.try_deserialize()?;
        Ok(forecast_config)
    }

    /// Load from an explicit TOML file, still honouring environment overrides.
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path: PathBuf = path.into();
        let config = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("FORECAST").separator("__"))
            .build()?;

        let forecast_config: ForecastConfig = config.try_deserialize()?;
        Ok(forecast_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_configuration() {
        let config = ForecastConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data1.csv"));
        assert_eq!(config.output_dir, PathBuf::from("static"));
        assert_eq!(config.default_steps, 10);
        assert_eq!(config.columns.period, "Tahun");
        assert_eq!(config.columns.value, "Produksi");
    }

    #[test]
    fn test_from_file_with_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_steps = 5").unwrap();
        writeln!(file, "[columns]").unwrap();
        writeln!(file, "value = \"Production\"").unwrap();

        let config = ForecastConfig::from_file(file.path()).unwrap();
        assert_eq!(config.default_steps, 5);
        assert_eq!(config.columns.value, "Production");
        assert_eq!(config.columns.period, "Tahun");
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = ForecastConfig::from_file("/nonexistent/forecast.toml");
        assert!(matches!(
            result,
            Err(crate::error::ForecastError::ConfigError(_))
        ));
    }
}
