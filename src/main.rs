//! vitals-advisor entry point.
//!
//! Initializes tracing, loads configuration from TOML, builds the health
//! record client and recommendation store, and serves the Axum router.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitals_advisor::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use vitals_advisor::health_record::HttpHealthRecordSource;
use vitals_advisor::http::start_server;
use vitals_advisor::routes::create_router;
use vitals_advisor::state::AppState;
use vitals_advisor::store::open_store;
use vitals_advisor::RecommendationService;

/// vitals-advisor: health recommendations for stored health records
#[derive(Parser, Debug)]
#[command(name = "vitals-advisor", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "vitals_advisor=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration is loaded first so the log format can be honored
    let config = AppConfig::load(&args.config)?;

    // Log filter priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(path = %args.config, "Loaded configuration");

    // reqwest and axum-server pull in different rustls backends; pin one
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }

    let records = HttpHealthRecordSource::new(&config.upstream)?;
    tracing::info!(
        base_url = %records.base_url(),
        timeout_seconds = ?config.upstream.timeout_seconds,
        "Health record client configured"
    );

    let store = open_store(&config.store)?;

    let service = RecommendationService::new(Arc::new(records), store);
    let app = create_router(AppState::new(service));

    start_server(app, &config.http).await?;

    tracing::info!("Server stopped");
    Ok(())
}
