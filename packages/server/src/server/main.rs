// Main entry point for API server

use std::sync::Arc;

use anyhow::{Context, Result};
use everflow::{EverflowClient, EverflowOptions};
use server_core::kernel::EverflowAdapter;
use server_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Marketing Operations API");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Build the Everflow client once; it is injected everywhere it is needed
    let mut everflow_options = EverflowOptions::new(config.everflow_api_key.clone());
    everflow_options.network_id = config.everflow_network_id.clone();
    if let Some(base_url) = config.everflow_base_url.clone() {
        everflow_options.base_url = base_url;
    }
    let everflow_client = Arc::new(EverflowClient::new(everflow_options));

    // Build application
    let app = build_app(pool, Arc::new(EverflowAdapter::new(everflow_client)));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
