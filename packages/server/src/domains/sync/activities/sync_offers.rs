//! Offer synchronization against the Everflow network API.
//!
//! Drives the paginated fetch, dedup, per-record upsert with conflict
//! resolution, progress/event callbacks, and the sync-run audit record.
//! The public entry point never returns an error: anything that escapes the
//! per-record loop finalizes the run as failed and is folded into the report.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use everflow::OfferRecord;

use crate::common::SyncRunId;
use crate::domains::advertisers::Advertiser;
use crate::domains::offers::Offer;
use crate::domains::sync::logic::{
    dedupe_by_remote_id, plan_pages, resolve_conflict, ConflictDecision, SyncCounters,
    UpsertOutcome,
};
use crate::domains::sync::mapping::{map_offer_status, offer_display_name};
use crate::domains::sync::models::SyncRun;
use crate::domains::sync::options::{
    ConflictResolution, SyncErrorEntry, SyncEvent, SyncOptions, SyncReport,
};
use crate::kernel::ServerDeps;

const PROGRESS_INTERVAL: usize = 10;
const CHUNK_INTERVAL: usize = 50;

/// Sync offers from the network API into the local offers table.
pub async fn sync_offers_from_everflow(
    started_by: &str,
    options: SyncOptions,
    deps: &ServerDeps,
) -> SyncReport {
    let sync_id = SyncRunId::new();
    info!(%sync_id, started_by, dry_run = options.dry_run, "Starting offer sync");

    match run(sync_id, started_by, &options, deps).await {
        Ok(report) => report,
        Err(err) => {
            let message = format!("{:#}", err);
            error!(%sync_id, error = %message, "Offer sync failed");
            if let Err(finalize_err) =
                SyncRun::finalize_failed(sync_id, &message, &deps.db_pool).await
            {
                warn!(%sync_id, error = %finalize_err, "Failed to record sync failure");
            }
            SyncReport::failed(sync_id, message)
        }
    }
}

async fn run(
    sync_id: SyncRunId,
    started_by: &str,
    options: &SyncOptions,
    deps: &ServerDeps,
) -> Result<SyncReport> {
    let pool = &deps.db_pool;

    SyncRun::create(sync_id, "offers", started_by, &options.snapshot_json(), pool)
        .await
        .context("Failed to create sync run")?;

    let records = fetch_all_offers(options, deps).await?;
    let unique = dedupe_by_remote_id(records, |record| record.network_offer_id);
    let total = unique.len();

    SyncRun::set_total(sync_id, total as i32, pool).await?;
    options.emit_progress(0, total, "processing");

    let mut counters = SyncCounters::default();
    let mut errors = Vec::new();

    if options.dry_run {
        SyncRun::finalize_completed(sync_id, &counters, pool).await?;
        info!(%sync_id, total, "Dry run complete, no records written");
        return Ok(SyncReport::completed(sync_id, total, counters, errors));
    }

    let mut chunk = Vec::new();
    for (index, record) in unique.iter().enumerate() {
        match upsert_offer(record, options.conflict_resolution, started_by, pool).await {
            Ok(outcome) => counters.apply(outcome),
            Err(err) => {
                let message = format!("{:#}", err);
                warn!(
                    %sync_id,
                    remote_id = record.network_offer_id,
                    error = %message,
                    "Failed to sync offer"
                );
                counters.failed += 1;
                errors.push(SyncErrorEntry {
                    id: Some(record.network_offer_id),
                    error: message,
                });
            }
        }

        chunk.push(record.network_offer_id);
        let processed = index + 1;
        if processed % PROGRESS_INTERVAL == 0 || processed == total {
            options.emit_progress(processed, total, "processing");
            SyncRun::update_counters(sync_id, &counters, pool).await?;
        }
        if processed % CHUNK_INTERVAL == 0 {
            options.emit_event(SyncEvent::ChunkProcessed {
                remote_ids: std::mem::take(&mut chunk),
            });
        }
    }

    SyncRun::finalize_completed(sync_id, &counters, pool).await?;
    info!(
        %sync_id,
        total,
        created = counters.created,
        updated = counters.updated,
        skipped = counters.skipped,
        failed = counters.failed,
        "Offer sync complete"
    );

    Ok(SyncReport::completed(sync_id, total, counters, errors))
}

/// Fetch every page of offers, sequentially.
///
/// Stops when the planned page count is exhausted, the known total is
/// reached, or a page comes back empty.
async fn fetch_all_offers(options: &SyncOptions, deps: &ServerDeps) -> Result<Vec<OfferRecord>> {
    let page_size = options.page_size();
    let advertiser_id = options.advertiser_filter();
    let status = options.status_filter();

    let first = deps
        .everflow
        .get_offers(1, page_size, advertiser_id, status)
        .await
        .context("Failed to fetch offers page 1")?;

    let plan = plan_pages(first.paging.as_ref(), first.records.len(), page_size);
    debug!(
        total_count = ?plan.total_count,
        total_pages = plan.total_pages,
        "Planned offer pagination"
    );

    let mut records = first.records;
    for page in 2..=plan.total_pages {
        if let Some(total) = plan.total_count {
            if total > 0 && records.len() as u64 >= total {
                break;
            }
        }

        let next = deps
            .everflow
            .get_offers(page, page_size, advertiser_id, status)
            .await
            .with_context(|| format!("Failed to fetch offers page {}", page))?;
        if next.records.is_empty() {
            break;
        }
        records.extend(next.records);
    }

    Ok(records)
}

/// Upsert a single remote offer. A failure here must never abort the run.
async fn upsert_offer(
    record: &OfferRecord,
    mode: ConflictResolution,
    actor: &str,
    pool: &PgPool,
) -> Result<UpsertOutcome> {
    let remote_id = record.network_offer_id.to_string();
    let name = offer_display_name(record);
    let status = map_offer_status(record.offer_status.as_deref());

    // Resolve the advertiser linkage against already-synced advertisers.
    let advertiser_id = match &record.advertiser {
        Some(related) => {
            Advertiser::find_by_everflow_id(&related.network_advertiser_id.to_string(), pool)
                .await?
                .map(|advertiser| advertiser.id)
        }
        None => None,
    };

    match Offer::find_by_everflow_id(&remote_id, pool).await? {
        Some(existing) => {
            match resolve_conflict(mode, record.time_saved, existing.updated_at) {
                ConflictDecision::Skip => Ok(UpsertOutcome::Skipped),
                ConflictDecision::Apply => {
                    Offer::apply_remote(
                        existing.id,
                        &name,
                        status,
                        advertiser_id,
                        &record.raw,
                        actor,
                        pool,
                    )
                    .await?;
                    Ok(UpsertOutcome::Updated)
                }
            }
        }
        None => {
            Offer::insert_from_remote(
                &name,
                status,
                advertiser_id,
                &remote_id,
                &record.raw,
                actor,
                pool,
            )
            .await?;
            Ok(UpsertOutcome::Created)
        }
    }
}
