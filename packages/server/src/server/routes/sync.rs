//! Admin endpoints for triggering syncs and reading the audit trail.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domains::sync::{
    sync_advertisers_from_everflow, sync_offers_from_everflow, ConflictResolution, SyncFilters,
    SyncOptions, SyncReport, SyncRun,
};
use crate::server::app::AppState;

/// JSON body accepted by the sync trigger endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncRequest {
    pub conflict_resolution: Option<ConflictResolution>,
    pub filters: Option<SyncFilters>,
    pub dry_run: Option<bool>,
    pub started_by: Option<String>,
}

impl SyncRequest {
    fn into_parts(self) -> (String, SyncOptions) {
        let options = SyncOptions {
            conflict_resolution: self.conflict_resolution.unwrap_or_default(),
            filters: self.filters,
            dry_run: self.dry_run.unwrap_or(false),
            on_progress: None,
            on_event: None,
        };
        (
            self.started_by.unwrap_or_else(|| "admin".to_string()),
            options,
        )
    }
}

pub async fn sync_offers_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SyncRequest>,
) -> Json<SyncReport> {
    let (started_by, options) = request.into_parts();
    Json(sync_offers_from_everflow(&started_by, options, &state.deps).await)
}

pub async fn sync_advertisers_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<SyncRequest>,
) -> Json<SyncReport> {
    let (started_by, options) = request.into_parts();
    Json(sync_advertisers_from_everflow(&started_by, options, &state.deps).await)
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub sync_type: Option<String>,
    pub limit: Option<i64>,
}

pub async fn sync_history_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<SyncRun>>, (StatusCode, String)> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    SyncRun::find_recent(query.sync_type.as_deref(), limit, &state.db_pool)
        .await
        .map(Json)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}

#[derive(Serialize)]
pub struct TestConnectionResponse {
    pub connected: bool,
}

pub async fn test_connection_handler(
    Extension(state): Extension<AppState>,
) -> Json<TestConnectionResponse> {
    Json(TestConnectionResponse {
        connected: state.deps.everflow.test_connection().await,
    })
}
