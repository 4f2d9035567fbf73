use approx::assert_abs_diff_eq;
use production_forecast::data::TimeSeriesData;
use production_forecast::differencing::FittingSeries;
use production_forecast::error::ForecastError;
use production_forecast::models::{ArimaModel, ArimaOrder, ForecastModel, TrainedForecastModel};
use production_forecast::pipeline::PRODUCTION_ORDER;

fn create_test_data() -> FittingSeries {
    let series = TimeSeriesData::from_pairs(&[
        (2015, 100.0),
        (2016, 104.0),
        (2017, 111.0),
        (2018, 115.0),
        (2019, 124.0),
        (2020, 130.0),
        (2021, 137.0),
        (2022, 146.0),
        (2023, 150.0),
        (2024, 160.0),
    ])
    .unwrap();
    FittingSeries::raw(&series)
}

#[test]
fn test_production_order() {
    assert_eq!(PRODUCTION_ORDER, ArimaOrder::new(1, 3, 1));
    assert_eq!(PRODUCTION_ORDER.to_string(), "ARIMA(1,3,1)");
}

#[test]
fn test_arima_forecast_length() {
    let data = create_test_data();
    let model = ArimaModel::new(PRODUCTION_ORDER);

    let trained = model.train(&data).unwrap();
    let forecast = trained.forecast(4).unwrap();

    assert_eq!(forecast.len(), 4);
    assert!(forecast.iter().all(|v| v.is_finite()));
    assert_eq!(trained.differenced_data().len(), data.len() - 3);
}

#[test]
fn test_arima_coefficients_are_stationary_and_invertible() {
    let trained = ArimaModel::new(PRODUCTION_ORDER)
        .train(&create_test_data())
        .unwrap();

    assert_eq!(trained.ar_coefficients().len(), 1);
    assert_eq!(trained.ma_coefficients().len(), 1);
    assert!(trained.ar_coefficients()[0].abs() < 1.0);
    assert!(trained.ma_coefficients()[0].abs() < 1.0);
    assert!(trained.sigma2() >= 0.0);
}

#[test]
fn test_random_walk_forecast_is_flat() {
    let series = TimeSeriesData::from_pairs(&[
        (2018, 10.0),
        (2019, 12.0),
        (2020, 11.0),
        (2021, 14.0),
        (2022, 13.0),
        (2023, 15.0),
    ])
    .unwrap();
    let trained = ArimaModel::new(ArimaOrder::new(0, 1, 0))
        .train(&FittingSeries::raw(&series))
        .unwrap();

    for value in trained.forecast(3).unwrap() {
        assert_abs_diff_eq!(value, 15.0, epsilon = 1e-9);
    }
}

#[test]
fn test_training_is_deterministic() {
    let data = create_test_data();
    let model = ArimaModel::new(PRODUCTION_ORDER);

    let first = model.train(&data).unwrap().forecast(5).unwrap();
    let second = model.train(&data).unwrap().forecast(5).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_too_short_for_differencing_order() {
    let series = TimeSeriesData::from_pairs(&[(2020, 1.0), (2021, 3.0), (2022, 2.0)]).unwrap();
    let result = ArimaModel::new(PRODUCTION_ORDER).train(&FittingSeries::raw(&series));

    assert!(matches!(result, Err(ForecastError::ModelFitError(_))));
}

#[test]
fn test_constant_series_cannot_be_fitted() {
    let series = TimeSeriesData::new((2020..2025).collect(), vec![5.0; 5]).unwrap();
    let result = ArimaModel::new(PRODUCTION_ORDER).train(&FittingSeries::raw(&series));

    assert!(matches!(result, Err(ForecastError::ModelFitError(_))));
}

#[test]
fn test_non_finite_values_cannot_be_fitted() {
    let series = TimeSeriesData::new(
        vec![2019, 2020, 2021, 2022, 2023, 2024],
        vec![100.0, 104.0, f64::NAN, 115.0, f64::INFINITY, 130.0],
    )
    .unwrap();
    let result = ArimaModel::new(PRODUCTION_ORDER).train(&FittingSeries::raw(&series));

    assert!(matches!(result, Err(ForecastError::ModelFitError(_))));
}
