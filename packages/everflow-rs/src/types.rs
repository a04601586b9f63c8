use serde_json::Value;

/// Pagination metadata returned by the table endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u32,
    pub page_size: u32,
    pub total_count: u64,
}

/// One page of decoded records plus the paging metadata, when the response
/// carried any.
#[derive(Debug, Clone)]
pub struct RecordPage<T> {
    pub records: Vec<T>,
    pub paging: Option<Paging>,
}

/// Advertiser sub-object nested under an offer's `relationship`.
#[derive(Debug, Clone)]
pub struct RelatedAdvertiser {
    pub network_advertiser_id: i64,
    pub name: Option<String>,
}

/// An offer row from `/networks/offerstable`.
///
/// Only the fields the caller actually reads are extracted; the complete
/// record is kept verbatim in `raw` so nothing the API returned is lost.
#[derive(Debug, Clone)]
pub struct OfferRecord {
    pub network_offer_id: i64,
    pub name: Option<String>,
    pub offer_status: Option<String>,
    /// Last-modified timestamp in epoch seconds, when the API provides one.
    pub time_saved: Option<i64>,
    pub advertiser: Option<RelatedAdvertiser>,
    pub raw: Value,
}

impl OfferRecord {
    /// Decode an offer from a raw response object. Returns `None` when the
    /// record has no numeric `network_offer_id`.
    pub fn from_value(value: Value) -> Option<Self> {
        let network_offer_id = value.get("network_offer_id")?.as_i64()?;
        let advertiser = value.pointer("/relationship/advertiser").and_then(|adv| {
            Some(RelatedAdvertiser {
                network_advertiser_id: adv.get("network_advertiser_id")?.as_i64()?,
                name: adv.get("name").and_then(Value::as_str).map(str::to_owned),
            })
        });

        Some(Self {
            network_offer_id,
            name: value.get("name").and_then(Value::as_str).map(str::to_owned),
            offer_status: value
                .get("offer_status")
                .and_then(Value::as_str)
                .map(str::to_owned),
            time_saved: value.get("time_saved").and_then(Value::as_i64),
            advertiser,
            raw: value,
        })
    }
}

/// An advertiser row from `/networks/advertiserstable`.
#[derive(Debug, Clone)]
pub struct AdvertiserRecord {
    pub network_advertiser_id: i64,
    pub name: Option<String>,
    pub advertiser_status: Option<String>,
    pub contact_email: Option<String>,
    /// Last-modified timestamp in epoch seconds, when the API provides one.
    pub time_saved: Option<i64>,
    pub raw: Value,
}

impl AdvertiserRecord {
    /// Decode an advertiser from a raw response object. Returns `None` when
    /// the record has no numeric `network_advertiser_id`.
    pub fn from_value(value: Value) -> Option<Self> {
        let network_advertiser_id = value.get("network_advertiser_id")?.as_i64()?;

        Some(Self {
            network_advertiser_id,
            name: value.get("name").and_then(Value::as_str).map(str::to_owned),
            advertiser_status: value
                .get("advertiser_status")
                .and_then(Value::as_str)
                .map(str::to_owned),
            contact_email: value
                .get("contact_email")
                .and_then(Value::as_str)
                .map(str::to_owned),
            time_saved: value.get("time_saved").and_then(Value::as_i64),
            raw: value,
        })
    }
}
