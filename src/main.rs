//! Application entry point.
//!
//! Parses command line arguments, loads configuration from a TOML file,
//! initializes tracing, constructs the database backend and Axum router, and
//! starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stocktake::config::{AppConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use stocktake::db::PgInventoryDb;
use stocktake::routes::create_router;
use stocktake::state::AppState;

/// Stocktake: a JSON API over an inventory database
#[derive(Parser, Debug)]
#[command(name = "stocktake", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "stocktake=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load configuration before tracing init - the log format lives in it
    let config = AppConfig::load(&args.config)?;

    // Filter priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(table = %config.database.table, "Loaded configuration");

    let db = Arc::new(PgInventoryDb::new(&config.database));
    let state = AppState::new(config.clone(), db);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
