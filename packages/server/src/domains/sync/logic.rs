/// Pure logic for the sync pipeline
///
/// These functions contain NO side effects - they implement deduplication,
/// pagination planning, and conflict resolution over already-fetched data.
use chrono::{DateTime, Utc};

use everflow::Paging;

use crate::domains::sync::options::ConflictResolution;

/// Collapse fetched records to one per remote id, keeping the FIRST
/// occurrence in fetch order. Later duplicates are logged, never an error.
pub fn dedupe_by_remote_id<T>(records: Vec<T>, remote_id: impl Fn(&T) -> i64) -> Vec<T> {
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let id = remote_id(&record);
        if seen.insert(id) {
            unique.push(record);
        } else {
            tracing::warn!(
                remote_id = id,
                "Duplicate remote record in fetch result, keeping first occurrence"
            );
        }
    }

    unique
}

/// Pagination plan derived from the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// Total record count per the API's paging metadata; `None` when the
    /// response carried none and the count is unknown.
    pub total_count: Option<u64>,
    pub total_pages: u32,
}

/// Derive the pagination plan from the first page's metadata.
///
/// Without paging metadata this falls back to a heuristic: a full first page
/// is a trigger to try page 2, a short one means we are done. The heuristic
/// only starts the loop - termination is owned by the count-reached and
/// empty-page guards in the fetch loop.
pub fn plan_pages(paging: Option<&Paging>, first_page_len: usize, page_size: u32) -> PagePlan {
    match paging {
        Some(paging) => {
            let effective_size = if paging.page_size > 0 {
                paging.page_size
            } else {
                page_size
            };
            let total_pages = if effective_size == 0 {
                1
            } else {
                (paging.total_count.div_ceil(effective_size as u64)).max(1) as u32
            };
            PagePlan {
                total_count: Some(paging.total_count),
                total_pages,
            }
        }
        None => PagePlan {
            total_count: None,
            total_pages: if page_size > 0 && first_page_len as u64 == page_size as u64 {
                2
            } else {
                1
            },
        },
    }
}

/// What to do with a remote record that matched an existing local entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    Apply,
    Skip,
}

/// Apply the conflict-resolution policy to one matched record.
///
/// `merge` compares the remote `time_saved` (epoch seconds) against the
/// local row's `updated_at`: remote wins only if strictly newer, or if the
/// remote carries no timestamp at all.
pub fn resolve_conflict(
    mode: ConflictResolution,
    remote_time_saved: Option<i64>,
    local_updated_at: DateTime<Utc>,
) -> ConflictDecision {
    match mode {
        ConflictResolution::Skip => ConflictDecision::Skip,
        ConflictResolution::Update => ConflictDecision::Apply,
        ConflictResolution::Merge => {
            match remote_time_saved.and_then(|secs| DateTime::from_timestamp(secs, 0)) {
                Some(remote) if remote > local_updated_at => ConflictDecision::Apply,
                Some(_) => ConflictDecision::Skip,
                None => ConflictDecision::Apply,
            }
        }
    }
}

/// Outcome of upserting one remote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    Skipped,
}

/// Running counters for one sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounters {
    pub synced: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl SyncCounters {
    pub fn apply(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => {
                self.created += 1;
                self.synced += 1;
            }
            UpsertOutcome::Updated => {
                self.updated += 1;
                self.synced += 1;
            }
            UpsertOutcome::Skipped => {
                self.skipped += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let records = vec![(1, "first"), (2, "second"), (1, "duplicate"), (3, "third")];
        let unique = dedupe_by_remote_id(records, |r| r.0);

        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0], (1, "first"));
        assert_eq!(unique[1], (2, "second"));
        assert_eq!(unique[2], (3, "third"));
    }

    #[test]
    fn dedupe_preserves_fetch_order() {
        let records = vec![5, 3, 5, 1, 3, 5];
        let unique = dedupe_by_remote_id(records, |r| *r);
        assert_eq!(unique, vec![5, 3, 1]);
    }

    #[test]
    fn dedupe_of_empty_input_is_empty() {
        let unique = dedupe_by_remote_id(Vec::<i64>::new(), |r| *r);
        assert!(unique.is_empty());
    }

    #[test]
    fn plan_uses_paging_metadata_when_present() {
        let paging = Paging {
            page: 1,
            page_size: 50,
            total_count: 120,
        };
        let plan = plan_pages(Some(&paging), 50, 50);
        assert_eq!(plan.total_count, Some(120));
        assert_eq!(plan.total_pages, 3);
    }

    #[test]
    fn plan_with_exact_multiple_has_no_extra_page() {
        let paging = Paging {
            page: 1,
            page_size: 50,
            total_count: 100,
        };
        let plan = plan_pages(Some(&paging), 50, 50);
        assert_eq!(plan.total_pages, 2);
    }

    #[test]
    fn plan_with_zero_total_still_plans_one_page() {
        let paging = Paging {
            page: 1,
            page_size: 50,
            total_count: 0,
        };
        let plan = plan_pages(Some(&paging), 0, 50);
        assert_eq!(plan.total_pages, 1);
    }

    #[test]
    fn full_first_page_without_paging_probes_page_two() {
        let plan = plan_pages(None, 50, 50);
        assert_eq!(plan.total_count, None);
        assert_eq!(plan.total_pages, 2);
    }

    #[test]
    fn short_first_page_without_paging_stops() {
        let plan = plan_pages(None, 33, 50);
        assert_eq!(plan.total_pages, 1);
    }

    #[test]
    fn skip_never_applies() {
        let local = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            resolve_conflict(ConflictResolution::Skip, Some(1_800_000_000), local),
            ConflictDecision::Skip
        );
        assert_eq!(
            resolve_conflict(ConflictResolution::Skip, None, local),
            ConflictDecision::Skip
        );
    }

    #[test]
    fn update_always_applies() {
        let local = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            resolve_conflict(ConflictResolution::Update, Some(1), local),
            ConflictDecision::Apply
        );
        assert_eq!(
            resolve_conflict(ConflictResolution::Update, None, local),
            ConflictDecision::Apply
        );
    }

    #[test]
    fn merge_applies_only_strictly_newer_remote() {
        let local = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        assert_eq!(
            resolve_conflict(ConflictResolution::Merge, Some(1_700_000_001), local),
            ConflictDecision::Apply
        );
        assert_eq!(
            resolve_conflict(ConflictResolution::Merge, Some(1_700_000_000), local),
            ConflictDecision::Skip
        );
        assert_eq!(
            resolve_conflict(ConflictResolution::Merge, Some(1_600_000_000), local),
            ConflictDecision::Skip
        );
    }

    #[test]
    fn merge_applies_when_remote_timestamp_absent() {
        let local = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert_eq!(
            resolve_conflict(ConflictResolution::Merge, None, local),
            ConflictDecision::Apply
        );
    }

    #[test]
    fn counters_track_synced_for_writes_only() {
        let mut counters = SyncCounters::default();
        counters.apply(UpsertOutcome::Created);
        counters.apply(UpsertOutcome::Created);
        counters.apply(UpsertOutcome::Updated);
        counters.apply(UpsertOutcome::Skipped);

        assert_eq!(counters.created, 2);
        assert_eq!(counters.updated, 1);
        assert_eq!(counters.skipped, 1);
        assert_eq!(counters.synced, 3);
        assert_eq!(counters.failed, 0);
    }
}
