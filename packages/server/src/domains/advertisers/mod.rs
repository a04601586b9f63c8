//! Advertisers domain - brand/partner entities synced from the network API

pub mod models;

pub use models::{is_unique_violation, Advertiser, AdvertiserStatus};
