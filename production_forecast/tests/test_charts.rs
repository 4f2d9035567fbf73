use production_forecast::charts::{ChartKind, ChartRenderer, ChartSink, DirectorySink, MemorySink};
use production_forecast::data::TimeSeriesData;
use production_forecast::forecast::ForecastResult;
use rstest::rstest;
use std::fs;

fn history() -> TimeSeriesData {
    TimeSeriesData::from_pairs(&[(2020, 100.0), (2021, 110.0), (2022, 125.0)]).unwrap()
}

#[rstest]
#[case(ChartKind::Differenced, "differenced_data.svg")]
#[case(ChartKind::Autocorrelation, "acf_plot.svg")]
#[case(ChartKind::PartialAutocorrelation, "pacf_plot.svg")]
#[case(ChartKind::Forecast, "forecast_plot.svg")]
fn test_chart_file_names(#[case] kind: ChartKind, #[case] expected: &str) {
    assert_eq!(kind.file_name(), expected);
}

#[test]
fn test_directory_sink_creates_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("static"));

    sink.write_chart(ChartKind::Forecast, "<svg>first</svg>").unwrap();
    sink.write_chart(ChartKind::Forecast, "<svg>second</svg>").unwrap();

    let path = sink.path_for(ChartKind::Forecast);
    assert_eq!(fs::read_to_string(path).unwrap(), "<svg>second</svg>");
}

#[test]
fn test_forecast_chart_labels() {
    let forecast = ForecastResult::from_predictions(2022, &[130.0, 136.0]).unwrap();
    let svg = ChartRenderer::default()
        .render_forecast(&history(), &forecast)
        .unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("Peramalan Produksi"));
    assert!(svg.contains("Data Historis"));
    assert!(svg.contains("Forecast (2 tahun)"));
}

#[test]
fn test_differenced_chart_labels() {
    let svg = ChartRenderer::default()
        .render_differenced(&[2021, 2022], &[10.0, 15.0])
        .unwrap();

    assert!(svg.contains("Data Setelah Differencing"));
    assert!(svg.contains("Perubahan Produksi (Ton)"));
}

#[test]
fn test_memory_sink_keeps_latest() {
    let mut sink = MemorySink::new();
    sink.write_chart(ChartKind::Differenced, "a").unwrap();
    sink.write_chart(ChartKind::Differenced, "b").unwrap();

    assert_eq!(sink.get(ChartKind::Differenced), Some("b"));
    assert_eq!(sink.kinds(), vec![ChartKind::Differenced]);
}
