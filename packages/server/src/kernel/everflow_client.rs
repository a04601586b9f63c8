//! Adapter wrapping the Everflow REST client into the BaseEverflowService trait.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use everflow::{AdvertiserRecord, EverflowClient, OfferRecord, RecordPage};

use crate::kernel::BaseEverflowService;

/// Wrapper around EverflowClient that implements the BaseEverflowService trait
pub struct EverflowAdapter(pub Arc<EverflowClient>);

impl EverflowAdapter {
    pub fn new(client: Arc<EverflowClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseEverflowService for EverflowAdapter {
    async fn get_offers(
        &self,
        page: u32,
        page_size: u32,
        advertiser_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<RecordPage<OfferRecord>> {
        self.0
            .get_offers(page, page_size, advertiser_id, status)
            .await
            .map_err(Into::into)
    }

    async fn get_advertisers(
        &self,
        page: u32,
        page_size: u32,
        status: Option<&str>,
    ) -> Result<RecordPage<AdvertiserRecord>> {
        self.0
            .get_advertisers(page, page_size, status)
            .await
            .map_err(Into::into)
    }

    async fn test_connection(&self) -> bool {
        self.0.test_connection().await
    }
}
