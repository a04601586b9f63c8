//! Listing endpoints for the admin UI.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::domains::advertisers::Advertiser;
use crate::domains::offers::Offer;
use crate::server::app::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

impl ListQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }
}

pub async fn list_offers_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Offer>>, (StatusCode, String)> {
    Offer::find_recent(query.limit(), &state.db_pool)
        .await
        .map(Json)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}

pub async fn list_advertisers_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Advertiser>>, (StatusCode, String)> {
    Advertiser::find_recent(query.limit(), &state.db_pool)
        .await
        .map(Json)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}
