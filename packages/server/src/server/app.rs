//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::{BaseEverflowService, ServerDeps};
use crate::server::routes::{
    health_handler, list_advertisers_handler, list_offers_handler, sync_advertisers_handler,
    sync_history_handler, sync_offers_handler, test_connection_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, everflow: Arc<dyn BaseEverflowService>) -> Router {
    let deps = Arc::new(ServerDeps::new(pool.clone(), everflow));
    let state = AppState {
        db_pool: pool,
        deps,
    };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/sync/offers", post(sync_offers_handler))
        .route("/api/sync/advertisers", post(sync_advertisers_handler))
        .route("/api/sync/history", get(sync_history_handler))
        .route("/api/sync/test-connection", get(test_connection_handler))
        .route("/api/offers", get(list_offers_handler))
        .route("/api/advertisers", get(list_advertisers_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
