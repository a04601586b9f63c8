//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Offer entities.
pub struct Offer;

/// Marker type for Advertiser entities.
pub struct Advertiser;

/// Marker type for SyncRun entities (sync audit rows).
pub struct SyncRun;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Offer entities.
pub type OfferId = Id<Offer>;

/// Typed ID for Advertiser entities.
pub type AdvertiserId = Id<Advertiser>;

/// Typed ID for SyncRun entities.
pub type SyncRunId = Id<SyncRun>;
