//! Sync domain - paginated fetch, dedup, conflict-resolved upsert, audit

pub mod activities;
pub mod logic;
pub mod mapping;
pub mod models;
pub mod options;

pub use activities::{sync_advertisers_from_everflow, sync_offers_from_everflow};
pub use models::{SyncRun, SyncRunStatus};
pub use options::{
    ConflictResolution, SyncErrorEntry, SyncEvent, SyncFilters, SyncOptions, SyncProgress,
    SyncReport,
};
