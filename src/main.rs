//! Sensorstats API Server
//!
//! Run with: cargo run --bin sensorstats
//!
//! # Configuration
//!
//! Read from `$SENSORSTATS_CONFIG`, `~/.config/sensorstats/config.toml`,
//! `/etc/sensorstats/config.toml` or `./config.toml`, then overridden by:
//! - `SENSOR_CSV_PATH`: Readings CSV (default: ./data/q-fastapi-timeseries-cache.csv)
//! - `SENSORSTATS_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `SENSORSTATS_API_PORT`: Port to listen on (default: 8000)
//! - `SENSORSTATS_LOG_LEVEL`: Log level (default: info)
//! - `SENSORSTATS_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter directive, takes precedence over the log level

use anyhow::Context;
use sensorstats::api::{serve, AppState};
use sensorstats::config::{Config, LogFormat, LoggingConfig};
use sensorstats::dataset::{CsvLoader, DatasetStore};
use sensorstats::query::QueryService;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();

    init_tracing(&config.logging);

    tracing::info!("Starting Sensorstats API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Dataset: {:?}", config.dataset.csv_path);

    // Load the dataset before accepting traffic; any failure is fatal
    let store = DatasetStore::new();
    let csv_path = config.dataset.csv_path.clone();
    let (dataset, report) = tokio::task::spawn_blocking(move || CsvLoader::new().load(&csv_path))
        .await
        .context("dataset loader task panicked")?
        .with_context(|| format!("failed to load dataset from {:?}", config.dataset.csv_path))?;

    for error in report.errors.iter().take(10) {
        tracing::debug!("{}", error);
    }
    store.install(dataset)?;

    let service = Arc::new(QueryService::new(store));
    let state = AppState::new(service, config.api.clone());

    serve(state, &config.api).await?;

    tracing::info!("Sensorstats API server stopped");
    Ok(())
}

/// Install the global tracing subscriber
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("sensorstats={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
