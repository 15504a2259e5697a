// API Server Binary Entry Point
//
// Purpose: Start the Axum API server over the recommendation pipeline
// Usage: cargo run --features api --bin api_server

use smart_planner_rust::{create_router, AppState, PlannerConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "smart_planner_rust=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Smart Planner API...");

    // Configuration from environment variables
    let config = PlannerConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  CROP_DB_PATH: {:?}", config.crop_db_path);
    tracing::info!("  DEFAULT_TOP_N: {}", config.default_top_n);
    tracing::info!("  UPLOAD_DIR: {:?}", config.upload_dir);

    let port = config.port;
    let state = AppState::new(config)?;
    let app = create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
