//! # production-forecast
//!
//! Command-line entry point: forecasts the configured production series and
//! prints the result as JSON.

use anyhow::Context;
use clap::Parser;
use production_forecast::charts::DirectorySink;
use production_forecast::config::ForecastConfig;
use production_forecast::pipeline::Pipeline;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "production-forecast")]
#[command(about = "Forecast yearly production with ARIMA(1,3,1)", long_about = None)]
struct Cli {
    /// Input CSV with year and production columns
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Number of years to forecast
    #[arg(short, long, allow_negative_numbers = true)]
    steps: Option<i64>,

    /// Directory receiving the SVG charts
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write the forecast as CSV to this file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Configuration file (defaults to ./forecast.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = match &cli.config {
        Some(path) => ForecastConfig::from_file(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => ForecastConfig::load()?,
    };
    tracing::info!("Configuration loaded");

    let data = cli.data.unwrap_or_else(|| config.data_path.clone());
    let steps = cli.steps.unwrap_or(config.default_steps);
    let output_dir = cli.output_dir.unwrap_or_else(|| config.output_dir.clone());

    let mut sink = DirectorySink::new(output_dir);
    let outcome = Pipeline::new(&config).run(&data, steps, &mut sink)?;

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        outcome.forecast.write_csv(file)?;
        tracing::info!(path = %path.display(), "forecast written as CSV");
    }

    let body = serde_json::json!({
        "message": "Peramalan berhasil",
        "forecast": outcome.forecast,
    });
    Ok(body.to_string())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "production_forecast=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "forecast failed");
            println!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            ExitCode::FAILURE
        }
    }
}
