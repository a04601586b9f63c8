//! Envelope normalization for Everflow table responses.
//!
//! Depending on the endpoint and API version, the record array arrives in
//! several shapes: a bare array, `{"data": {"offers": [...]}}`,
//! `{"data": {"entries": [...]}}`, `{"offers": [...]}`, and so on.
//! Extraction runs a fixed precedence list of shape matchers; the first
//! match wins. Absence of a `paging` object is not an error — callers fall
//! back to their own pagination heuristics.

use serde_json::Value;

use crate::types::Paging;

/// Records and paging metadata pulled out of an arbitrary response value.
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub records: Vec<Value>,
    pub paging: Option<Paging>,
}

/// Normalize a response value into a flat record list plus optional paging.
///
/// `entity_key` is the per-endpoint array key (`"offers"` / `"advertisers"`).
pub fn extract_page(value: &Value, entity_key: &str) -> RawPage {
    RawPage {
        records: extract_records(value, entity_key),
        paging: extract_paging(value),
    }
}

fn extract_records(value: &Value, entity_key: &str) -> Vec<Value> {
    // Bare array response.
    let direct = |v: &Value| v.as_array().cloned();
    // {"data": {"<entity>": [...]}}
    let data_entity = |v: &Value| v.get("data")?.get(entity_key)?.as_array().cloned();
    // {"data": {"entries": [...]}}
    let data_entries = |v: &Value| v.get("data")?.get("entries")?.as_array().cloned();
    // {"data": [...]}
    let data_array = |v: &Value| v.get("data")?.as_array().cloned();
    // {"<entity>": [...]}
    let entity = |v: &Value| v.get(entity_key)?.as_array().cloned();
    // {"entries": [...]}
    let entries = |v: &Value| v.get("entries")?.as_array().cloned();
    // Final fallback: an object-shaped "data" is treated as one record.
    let data_object = |v: &Value| {
        v.get("data")
            .filter(|data| data.is_object())
            .map(|data| vec![data.clone()])
    };

    let matchers: [&dyn Fn(&Value) -> Option<Vec<Value>>; 7] = [
        &direct,
        &data_entity,
        &data_entries,
        &data_array,
        &entity,
        &entries,
        &data_object,
    ];

    matchers
        .iter()
        .find_map(|matcher| matcher(value))
        .unwrap_or_default()
}

fn extract_paging(value: &Value) -> Option<Paging> {
    let paging = value
        .get("paging")
        .or_else(|| value.pointer("/data/paging"))?;

    Some(Paging {
        page: paging.get("page")?.as_u64()? as u32,
        page_size: paging.get("page_size")?.as_u64()? as u32,
        total_count: paging.get("total_count")?.as_u64()?,
    })
}
