//! ping-relay entry point.
//!
//! Loads configuration, initializes tracing, validates the ping target, builds
//! the shared outbound client, and serves the router until a shutdown signal.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ping_relay::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use ping_relay::http::start_server;
use ping_relay::{create_router, AppState, HttpFetcher, SettingsSource};

/// ping-relay: fetch URL_TO_PING and echo it behind CONFIGURATION
#[derive(Parser, Debug)]
#[command(name = "ping-relay", version, about)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "ping_relay=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(log_filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(EnvFilter::new(log_filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    // Priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, config.logging.format);

    tracing::info!(path = ?args.config, "Loaded configuration");

    // Static mode fails here on a missing or malformed URL_TO_PING
    let settings = SettingsSource::from_config(&config.ping)?;
    match &settings {
        SettingsSource::Static(s) => tracing::info!(
            target_url = %s.target_url,
            label = s.label(),
            "Ping target configured"
        ),
        SettingsSource::Live(_) => {
            tracing::info!("Ping target re-read from the environment on every request")
        }
    }

    let fetcher = HttpFetcher::new(&config.upstream)?;
    tracing::info!(
        timeout_secs = config.upstream.timeout_seconds,
        connect_timeout_secs = config.upstream.connect_timeout_seconds,
        "Initialized upstream client"
    );

    let state = AppState::new(settings, Arc::new(fetcher));
    let app = create_router(state);

    start_server(app, &config.http).await?;

    Ok(())
}
