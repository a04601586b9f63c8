//! Invocation options, callbacks, and result types for the sync pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::common::SyncRunId;
use crate::domains::sync::logic::SyncCounters;
use crate::domains::sync::models::SyncRunStatus;

/// Page size used when the caller does not narrow it via filters.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Policy applied when a remote record already has a matching local entity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    /// Leave the local entity untouched.
    #[default]
    Skip,
    /// Overwrite local mutable fields unconditionally.
    Update,
    /// Remote wins only if strictly newer (or carries no timestamp).
    Merge,
}

/// Server-side filters forwarded to the network API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncFilters {
    pub status: Option<String>,
    pub advertiser_id: Option<i64>,
    /// Page size for the paginated fetch.
    pub limit: Option<u32>,
}

/// Progress callback payload, emitted for live UI feedback.
#[derive(Debug, Clone, Serialize)]
pub struct SyncProgress {
    pub current: usize,
    pub total: usize,
    pub stage: String,
}

/// Lifecycle events emitted while a sync run processes records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SyncEvent {
    /// A batch of remote ids just finished the upsert loop.
    ChunkProcessed { remote_ids: Vec<i64> },
}

pub type ProgressCallback = Arc<dyn Fn(SyncProgress) + Send + Sync>;
pub type EventCallback = Arc<dyn Fn(SyncEvent) + Send + Sync>;

/// Options for one sync invocation.
///
/// Callbacks are invoked synchronously from the pipeline loop; callers
/// should keep them fast or hand off to a channel.
#[derive(Clone, TypedBuilder)]
pub struct SyncOptions {
    #[builder(default)]
    pub conflict_resolution: ConflictResolution,
    #[builder(default, setter(strip_option))]
    pub filters: Option<SyncFilters>,
    #[builder(default = false)]
    pub dry_run: bool,
    #[builder(default, setter(strip_option))]
    pub on_progress: Option<ProgressCallback>,
    #[builder(default, setter(strip_option))]
    pub on_event: Option<EventCallback>,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl SyncOptions {
    pub fn page_size(&self) -> u32 {
        self.filters
            .as_ref()
            .and_then(|f| f.limit)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn status_filter(&self) -> Option<&str> {
        self.filters.as_ref().and_then(|f| f.status.as_deref())
    }

    pub fn advertiser_filter(&self) -> Option<i64> {
        self.filters.as_ref().and_then(|f| f.advertiser_id)
    }

    pub(crate) fn emit_progress(&self, current: usize, total: usize, stage: &str) {
        if let Some(callback) = &self.on_progress {
            callback(SyncProgress {
                current,
                total,
                stage: stage.to_string(),
            });
        }
    }

    pub(crate) fn emit_event(&self, event: SyncEvent) {
        if let Some(callback) = &self.on_event {
            callback(event);
        }
    }

    /// Serializable snapshot persisted on the sync-run audit row.
    pub fn snapshot(&self) -> SyncOptionsSnapshot {
        SyncOptionsSnapshot {
            conflict_resolution: self.conflict_resolution,
            filters: self.filters.clone(),
            dry_run: self.dry_run,
        }
    }

    pub fn snapshot_json(&self) -> Value {
        serde_json::to_value(self.snapshot()).unwrap_or(Value::Null)
    }
}

/// The serializable parts of [`SyncOptions`], stored with the audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOptionsSnapshot {
    pub conflict_resolution: ConflictResolution,
    pub filters: Option<SyncFilters>,
    pub dry_run: bool,
}

/// One failed record (or the whole run, when `id` is None).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncErrorEntry {
    pub id: Option<i64>,
    pub error: String,
}

/// Result of one sync invocation, mirrored onto the sync-run audit row.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub sync_id: SyncRunId,
    pub status: SyncRunStatus,
    pub total_records: usize,
    pub synced_records: usize,
    pub created_records: usize,
    pub updated_records: usize,
    pub skipped_records: usize,
    pub failed_records: usize,
    pub errors: Vec<SyncErrorEntry>,
}

impl SyncReport {
    pub fn completed(
        sync_id: SyncRunId,
        total_records: usize,
        counters: SyncCounters,
        errors: Vec<SyncErrorEntry>,
    ) -> Self {
        Self {
            sync_id,
            status: SyncRunStatus::Completed,
            total_records,
            synced_records: counters.synced,
            created_records: counters.created,
            updated_records: counters.updated,
            skipped_records: counters.skipped,
            failed_records: counters.failed,
            errors,
        }
    }

    /// A run that died outside the per-record loop. Carries a single
    /// synthetic error entry with no remote id.
    pub fn failed(sync_id: SyncRunId, message: String) -> Self {
        Self {
            sync_id,
            status: SyncRunStatus::Failed,
            total_records: 0,
            synced_records: 0,
            created_records: 0,
            updated_records: 0,
            skipped_records: 0,
            failed_records: 0,
            errors: vec![SyncErrorEntry {
                id: None,
                error: message,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_resolution_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ConflictResolution::Skip).unwrap(),
            r#""skip""#
        );
        assert_eq!(
            serde_json::from_str::<ConflictResolution>(r#""merge""#).unwrap(),
            ConflictResolution::Merge
        );
    }

    #[test]
    fn filters_deserialize_from_camel_case() {
        let filters: SyncFilters =
            serde_json::from_str(r#"{"status": "active", "advertiserId": 7, "limit": 50}"#)
                .unwrap();
        assert_eq!(filters.status.as_deref(), Some("active"));
        assert_eq!(filters.advertiser_id, Some(7));
        assert_eq!(filters.limit, Some(50));
    }

    #[test]
    fn filters_tolerate_missing_fields() {
        let filters: SyncFilters = serde_json::from_str("{}").unwrap();
        assert_eq!(filters, SyncFilters::default());
    }

    #[test]
    fn page_size_defaults_when_unfiltered() {
        assert_eq!(SyncOptions::default().page_size(), DEFAULT_PAGE_SIZE);

        let options = SyncOptions::builder()
            .filters(SyncFilters {
                limit: Some(25),
                ..Default::default()
            })
            .build();
        assert_eq!(options.page_size(), 25);
    }

    #[test]
    fn snapshot_round_trips() {
        let options = SyncOptions::builder()
            .conflict_resolution(ConflictResolution::Merge)
            .dry_run(true)
            .build();

        let json = options.snapshot_json();
        let snapshot: SyncOptionsSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.conflict_resolution, ConflictResolution::Merge);
        assert!(snapshot.dry_run);
        assert!(snapshot.filters.is_none());
    }

    #[test]
    fn chunk_event_serializes() {
        let event = SyncEvent::ChunkProcessed {
            remote_ids: vec![1, 2, 3],
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ChunkProcessed"));
        assert!(json.contains("[1,2,3]"));
    }
}
