//! Pure Everflow REST API client.
//!
//! A minimal client for the Everflow network API. Supports paginated
//! offer/advertiser table fetches with retry/backoff and rate-limit
//! handling, plus a lightweight connection probe.
//!
//! # Example
//!
//! ```rust,ignore
//! use everflow::{EverflowClient, EverflowOptions};
//!
//! let client = EverflowClient::new(EverflowOptions::new("your-api-key".into()));
//!
//! let page = client.get_offers(1, 100, None, Some("active")).await?;
//! for offer in &page.records {
//!     println!("{}", offer.name.as_deref().unwrap_or("(unnamed)"));
//! }
//! ```

pub mod error;
pub mod response;
pub mod types;

pub use error::{EverflowError, Result};
pub use response::{extract_page, RawPage};
pub use types::{AdvertiserRecord, OfferRecord, Paging, RecordPage, RelatedAdvertiser};

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.eflow.team/v1";

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone)]
pub struct EverflowOptions {
    pub api_key: String,
    pub network_id: Option<String>,
    pub base_url: String,
}

impl EverflowOptions {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            network_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub struct EverflowClient {
    client: reqwest::Client,
    options: EverflowOptions,
}

impl EverflowClient {
    pub fn new(options: EverflowOptions) -> Self {
        Self {
            client: reqwest::Client::new(),
            options,
        }
    }

    /// Fetch one page of offers. `advertiser_id` and `status` narrow the
    /// server-side filter body.
    pub async fn get_offers(
        &self,
        page: u32,
        page_size: u32,
        advertiser_id: Option<i64>,
        status: Option<&str>,
    ) -> Result<RecordPage<OfferRecord>> {
        let mut filters = serde_json::Map::new();
        if let Some(status) = status {
            filters.insert("offer_status".into(), json!(status));
        }
        if let Some(advertiser_id) = advertiser_id {
            filters.insert("network_advertiser_id".into(), json!(advertiser_id));
        }

        let value = self
            .post_table("networks/offerstable", page, page_size, filters)
            .await?;
        let raw = extract_page(&value, "offers");
        let records = decode_records(raw.records, OfferRecord::from_value, "offer");

        Ok(RecordPage {
            records,
            paging: raw.paging,
        })
    }

    /// Fetch one page of advertisers, optionally filtered by status.
    pub async fn get_advertisers(
        &self,
        page: u32,
        page_size: u32,
        status: Option<&str>,
    ) -> Result<RecordPage<AdvertiserRecord>> {
        let mut filters = serde_json::Map::new();
        if let Some(status) = status {
            filters.insert("advertiser_status".into(), json!(status));
        }

        let value = self
            .post_table("networks/advertiserstable", page, page_size, filters)
            .await?;
        let raw = extract_page(&value, "advertisers");
        let records = decode_records(raw.records, AdvertiserRecord::from_value, "advertiser");

        Ok(RecordPage {
            records,
            paging: raw.paging,
        })
    }

    /// Probe the two table endpoints in sequence and report reachability.
    ///
    /// Health signal only — errors are swallowed and must never gate a sync.
    pub async fn test_connection(&self) -> bool {
        for path in ["networks/offerstable", "networks/advertiserstable"] {
            match self
                .post_table(path, 1, 1, serde_json::Map::new())
                .await
            {
                Ok(_) => return true,
                Err(err) => {
                    tracing::debug!(path, error = %err, "Connection probe failed");
                }
            }
        }
        false
    }

    /// POST to a table endpoint with pagination query params, retrying
    /// transient failures with exponential backoff.
    async fn post_table(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
        filters: serde_json::Map<String, Value>,
    ) -> Result<Value> {
        let url = format!("{}/{}", self.options.base_url, path);
        let body = if filters.is_empty() {
            json!({})
        } else {
            json!({ "filters": filters })
        };

        let mut attempt = 0u32;
        loop {
            let mut request = self
                .client
                .post(&url)
                .header("X-Eflow-API-Key", &self.options.api_key)
                .query(&[("page", page), ("page_size", page_size)])
                .json(&body);
            if let Some(network_id) = &self.options.network_id {
                request = request.header("X-Eflow-Network-Id", network_id);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        if attempt >= MAX_RETRIES {
                            return Err(EverflowError::RateLimited {
                                attempts: attempt + 1,
                            });
                        }
                        let delay = retry_after(&response).unwrap_or_else(|| backoff_delay(attempt));
                        tracing::warn!(
                            path,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Rate limited by Everflow, backing off"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if is_transient_status(status) && attempt < MAX_RETRIES {
                        let delay = backoff_delay(attempt);
                        tracing::warn!(
                            path,
                            status = status.as_u16(),
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Transient Everflow error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if !status.is_success() {
                        let body = response.text().await.unwrap_or_default();
                        return Err(EverflowError::Api {
                            status: status.as_u16(),
                            message: api_error_message(&body),
                        });
                    }

                    return response.json::<Value>().await.map_err(EverflowError::Http);
                }
                Err(err) if attempt < MAX_RETRIES && (err.is_timeout() || err.is_connect()) => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        path,
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Everflow request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(EverflowError::Http(err)),
            }
        }
    }
}

fn decode_records<T>(values: Vec<Value>, decode: fn(Value) -> Option<T>, kind: &str) -> Vec<T> {
    let mut records = Vec::with_capacity(values.len());
    for value in values {
        match decode(value) {
            Some(record) => records.push(record),
            None => tracing::warn!(kind, "Dropping record without a numeric network id"),
        }
    }
    records
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(RETRY_BASE_DELAY_MS * 2u64.pow(attempt))
}

fn is_transient_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 502 | 503 | 504)
}

fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    parse_retry_after(response.headers().get(reqwest::header::RETRY_AFTER)?.to_str().ok()?)
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Pull a human-readable message out of an `{"error": {...}}` envelope,
/// falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string())
}
