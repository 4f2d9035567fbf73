//! Forecast results labelled with future years

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One projected period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Period label, continuing directly after the history
    pub year: i64,
    /// Point forecast truncated toward zero
    pub forecast: i64,
}

/// Ordered forecast, one point per requested step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
}

/// Check a caller-supplied horizon and convert it to a step count
pub fn validate_steps(steps: i64) -> Result<usize> {
    if steps <= 0 {
        return Err(ForecastError::ForecastingError(format!(
            "Forecast horizon must be a positive integer, got {}",
            steps
        )));
    }
    usize::try_from(steps).map_err(|_| {
        ForecastError::ForecastingError(format!("Forecast horizon {} is too large", steps))
    })
}

/// Convert a real-valued prediction to an integer by truncation toward zero
pub fn truncate_forecast(value: f64) -> Result<i64> {
    // i64::MAX is not exactly representable; stay strictly inside the range
    const LIMIT: f64 = 9.223_372_036_854_775e18;
    if !value.is_finite() || value.abs() >= LIMIT {
        return Err(ForecastError::ForecastingError(format!(
            "Prediction {} cannot be represented as an integer",
            value
        )));
    }
    Ok(value.trunc() as i64)
}

impl ForecastResult {
    /// Label `values` with the years following `last_period` and truncate them
    pub fn from_predictions(last_period: i64, values: &[f64]) -> Result<Self> {
        let points = values
            .iter()
            .enumerate()
            .map(|(offset, &value)| {
                Ok(ForecastPoint {
                    year: last_period + 1 + offset as i64,
                    forecast: truncate_forecast(value)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { points })
    }

    /// Get the forecast points
    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Projected years
    pub fn years(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Projected values
    pub fn values(&self) -> Vec<i64> {
        self.points.iter().map(|p| p.forecast).collect()
    }

    /// Number of periods forecasted
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Serialize as a JSON array of `{"year", "forecast"}` objects
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.points)
            .map_err(|e| ForecastError::ForecastingError(e.to_string()))
    }

    /// Write the forecast as CSV with a `year,forecast` header
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for point in &self.points {
            csv_writer.serialize(point)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_validate_steps() {
        assert_eq!(validate_steps(3).unwrap(), 3);
        assert!(matches!(
            validate_steps(0),
            Err(ForecastError::ForecastingError(_))
        ));
        assert!(matches!(
            validate_steps(-2),
            Err(ForecastError::ForecastingError(_))
        ));
    }

    #[test]
    fn test_truncation_toward_zero() {
        assert_eq!(truncate_forecast(12.9).unwrap(), 12);
        assert_eq!(truncate_forecast(-12.9).unwrap(), -12);
        assert_eq!(truncate_forecast(0.999).unwrap(), 0);
        assert!(truncate_forecast(f64::NAN).is_err());
        assert!(truncate_forecast(f64::INFINITY).is_err());
        assert!(truncate_forecast(1e300).is_err());
    }

    #[test]
    fn test_years_continue_history() {
        let result = ForecastResult::from_predictions(2022, &[140.7, 150.2, 161.9]).unwrap();
        assert_eq!(result.years(), vec![2023, 2024, 2025]);
        assert_eq!(result.values(), vec![140, 150, 161]);
    }

    #[test]
    fn test_json_shape() {
        let result = ForecastResult::from_predictions(2022, &[140.7]).unwrap();
        assert_eq!(result.to_json().unwrap(), r#"[{"year":2023,"forecast":140}]"#);
    }

    #[test]
    fn test_csv_export() {
        let result = ForecastResult::from_predictions(2022, &[140.7, 150.2]).unwrap();
        let mut buffer = Vec::new();
        result.write_csv(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "year,forecast\n2023,140\n2024,150\n"
        );
    }
}
