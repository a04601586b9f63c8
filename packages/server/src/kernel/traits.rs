// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "sync offers") should be domain functions that use
// these traits.
//
// Naming convention: Base* for trait names (e.g., BaseEverflowService)

use anyhow::Result;
use async_trait::async_trait;

use everflow::{AdvertiserRecord, OfferRecord, RecordPage};

// =============================================================================
// Everflow Service Trait (Infrastructure - affiliate-network API)
// =============================================================================

#[async_trait]
pub trait BaseEverflowService: Send + Sync {
    /// Fetch one page of offers from the network API.
    async fn get_offers(
        &self,
        page: u32,
        page_size: u32,
        advertiser_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<RecordPage<OfferRecord>>;

    /// Fetch one page of advertisers from the network API.
    async fn get_advertisers(
        &self,
        page: u32,
        page_size: u32,
        status: Option<&str>,
    ) -> Result<RecordPage<AdvertiserRecord>>;

    /// Probe API reachability. Health signal only - never gates a sync.
    async fn test_connection(&self) -> bool;
}
