//! Shared fixtures: a scriptable fake Everflow service and record builders.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;

use everflow::{AdvertiserRecord, OfferRecord, Paging, RecordPage};
use server_core::kernel::{BaseEverflowService, ServerDeps};

/// Fake Everflow service that serves pre-scripted pages (indexed by page
/// number) and records which pages were requested.
#[derive(Default)]
pub struct FakeEverflowService {
    offer_pages: Vec<RecordPage<OfferRecord>>,
    advertiser_pages: Vec<RecordPage<AdvertiserRecord>>,
    offer_calls: Mutex<Vec<u32>>,
    advertiser_calls: Mutex<Vec<u32>>,
    failure: Option<String>,
}

impl FakeEverflowService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offer_pages(mut self, pages: Vec<RecordPage<OfferRecord>>) -> Self {
        self.offer_pages = pages;
        self
    }

    pub fn with_advertiser_pages(mut self, pages: Vec<RecordPage<AdvertiserRecord>>) -> Self {
        self.advertiser_pages = pages;
        self
    }

    /// Every fetch fails with the given message.
    pub fn with_failure(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn offer_pages_requested(&self) -> Vec<u32> {
        self.offer_calls.lock().unwrap().clone()
    }

    pub fn advertiser_pages_requested(&self) -> Vec<u32> {
        self.advertiser_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseEverflowService for FakeEverflowService {
    async fn get_offers(
        &self,
        page: u32,
        _page_size: u32,
        _advertiser_id: Option<i64>,
        _status: Option<&str>,
    ) -> Result<RecordPage<OfferRecord>> {
        self.offer_calls.lock().unwrap().push(page);
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self
            .offer_pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or(RecordPage {
                records: vec![],
                paging: None,
            }))
    }

    async fn get_advertisers(
        &self,
        page: u32,
        _page_size: u32,
        _status: Option<&str>,
    ) -> Result<RecordPage<AdvertiserRecord>> {
        self.advertiser_calls.lock().unwrap().push(page);
        if let Some(message) = &self.failure {
            anyhow::bail!("{}", message);
        }
        Ok(self
            .advertiser_pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or(RecordPage {
                records: vec![],
                paging: None,
            }))
    }

    async fn test_connection(&self) -> bool {
        self.failure.is_none()
    }
}

/// Wire a fake service into a dependency container for the orchestrators.
pub fn test_deps(pool: &PgPool, fake: Arc<FakeEverflowService>) -> ServerDeps {
    ServerDeps::new(pool.clone(), fake)
}

pub fn paging(page: u32, page_size: u32, total_count: u64) -> Paging {
    Paging {
        page,
        page_size,
        total_count,
    }
}

pub fn page<T>(records: Vec<T>, paging: Option<Paging>) -> RecordPage<T> {
    RecordPage { records, paging }
}

pub fn offer_record(id: i64, status: &str) -> OfferRecord {
    OfferRecord::from_value(json!({
        "network_offer_id": id,
        "name": format!("Offer {}", id),
        "offer_status": status,
    }))
    .expect("valid offer record")
}

pub fn offer_record_from(value: serde_json::Value) -> OfferRecord {
    OfferRecord::from_value(value).expect("valid offer record")
}

pub fn advertiser_record(id: i64, status: &str) -> AdvertiserRecord {
    AdvertiserRecord::from_value(json!({
        "network_advertiser_id": id,
        "name": format!("Brand {}", id),
        "advertiser_status": status,
    }))
    .expect("valid advertiser record")
}

pub fn advertiser_record_from(value: serde_json::Value) -> AdvertiserRecord {
    AdvertiserRecord::from_value(value).expect("valid advertiser record")
}
