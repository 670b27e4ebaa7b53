// API Server Binary Entry Point
//
// Purpose: Start the Axum comparison API over the variant catalog
// Usage: cargo run --bin api_server

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vehicle_compare::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "vehicle_compare=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting API server...");

    let config = ServerConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  CATALOG_PATH: {:?}", config.catalog_path);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  FETCH_TIMEOUT_MS: {}", config.fetch_timeout.as_millis());
    tracing::info!("  AVAILABLE_CACHE_TTL_SECS: {}", config.available_cache_ttl.as_secs());

    // Initialize application state (loads the catalog)
    let state = AppState::new(&config)?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
