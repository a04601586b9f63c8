/// Pure mapping from remote records to local field values
///
/// Status tables are fixed and intentionally asymmetric between entity
/// types: unknown offer statuses fall back to Inactive, unknown advertiser
/// statuses fall back to active. Both tables mirror what the network API
/// actually emits (`active`, `paused`, `pending`, `deleted`, `inactive`).
use everflow::{AdvertiserRecord, OfferRecord};
use serde_json::Value;

use crate::domains::advertisers::AdvertiserStatus;
use crate::domains::offers::OfferStatus;

/// Map a remote offer status onto the local enum.
pub fn map_offer_status(remote: Option<&str>) -> OfferStatus {
    match remote {
        Some("active") => OfferStatus::Active,
        Some("paused") | Some("pending") | Some("deleted") => OfferStatus::Inactive,
        _ => OfferStatus::Inactive,
    }
}

/// Map a remote advertiser status onto the local enum.
pub fn map_advertiser_status(remote: Option<&str>) -> AdvertiserStatus {
    match remote {
        Some("paused") | Some("pending") | Some("deleted") | Some("inactive") => {
            AdvertiserStatus::Inactive
        }
        _ => AdvertiserStatus::Active,
    }
}

/// Display name for a remote offer. Offers are expected to carry a name;
/// the synthesized form only covers malformed records.
pub fn offer_display_name(record: &OfferRecord) -> String {
    record
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("Offer {}", record.network_offer_id))
}

/// Display name for a remote advertiser.
///
/// Fallback chain: explicit name, then the nested relationship advertiser
/// name, then a synthesized `Advertiser <id>`.
pub fn advertiser_display_name(record: &AdvertiserRecord) -> String {
    record
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            record
                .raw
                .pointer("/relationship/advertiser/name")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("Advertiser {}", record.network_advertiser_id))
}
