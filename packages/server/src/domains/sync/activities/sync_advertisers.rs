//! Advertiser synchronization against the Everflow network API.
//!
//! Same pipeline shape as the offer sync, with one extra defense: an insert
//! that trips the unique constraint on `everflow_advertiser_id` (a
//! concurrent run got there first) is treated as a late-discovered conflict
//! and falls back to an update against the conflicting row.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::{debug, error, info, warn};

use everflow::AdvertiserRecord;

use crate::common::SyncRunId;
use crate::domains::advertisers::{is_unique_violation, Advertiser};
use crate::domains::sync::logic::{
    dedupe_by_remote_id, plan_pages, resolve_conflict, ConflictDecision, SyncCounters,
    UpsertOutcome,
};
use crate::domains::sync::mapping::{advertiser_display_name, map_advertiser_status};
use crate::domains::sync::models::SyncRun;
use crate::domains::sync::options::{
    ConflictResolution, SyncErrorEntry, SyncEvent, SyncOptions, SyncReport,
};
use crate::kernel::ServerDeps;

const PROGRESS_INTERVAL: usize = 5;
const CHUNK_INTERVAL: usize = 50;

/// Sync advertisers from the network API into the local advertisers table.
pub async fn sync_advertisers_from_everflow(
    started_by: &str,
    options: SyncOptions,
    deps: &ServerDeps,
) -> SyncReport {
    let sync_id = SyncRunId::new();
    info!(%sync_id, started_by, dry_run = options.dry_run, "Starting advertiser sync");

    match run(sync_id, started_by, &options, deps).await {
        Ok(report) => report,
        Err(err) => {
            let message = format!("{:#}", err);
            error!(%sync_id, error = %message, "Advertiser sync failed");
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

    SyncRun::create(
        sync_id,
        "advertisers",
        started_by,
        &options.snapshot_json(),
        pool,
    )
    .await
    .context("Failed to create sync run")?;

    let records = fetch_all_advertisers(options, deps).await?;
    let unique = dedupe_by_remote_id(records, |record| record.network_advertiser_id);
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
        match upsert_advertiser(record, options.conflict_resolution, started_by, pool).await {
            Ok(outcome) => counters.apply(outcome),
            Err(err) => {
                let message = format!("{:#}", err);
                warn!(
                    %sync_id,
                    remote_id = record.network_advertiser_id,
                    error = %message,
                    "Failed to sync advertiser"
                );
                counters.failed += 1;
                errors.push(SyncErrorEntry {
                    id: Some(record.network_advertiser_id),
                    error: message,
                });
            }
        }

        chunk.push(record.network_advertiser_id);
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
        "Advertiser sync complete"
    );

    Ok(SyncReport::completed(sync_id, total, counters, errors))
}

/// Fetch every page of advertisers, sequentially.
async fn fetch_all_advertisers(
    options: &SyncOptions,
    deps: &ServerDeps,
) -> Result<Vec<AdvertiserRecord>> {
    let page_size = options.page_size();
    let status = options.status_filter();

    let first = deps
        .everflow
        .get_advertisers(1, page_size, status)
        .await
        .context("Failed to fetch advertisers page 1")?;

    let plan = plan_pages(first.paging.as_ref(), first.records.len(), page_size);
    debug!(
        total_count = ?plan.total_count,
        total_pages = plan.total_pages,
        "Planned advertiser pagination"
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
            .get_advertisers(page, page_size, status)
            .await
            .with_context(|| format!("Failed to fetch advertisers page {}", page))?;
        if next.records.is_empty() {
            break;
        }
        records.extend(next.records);
    }

    Ok(records)
}

/// Upsert a single remote advertiser. A failure here must never abort the run.
async fn upsert_advertiser(
    record: &AdvertiserRecord,
    mode: ConflictResolution,
    actor: &str,
    pool: &PgPool,
) -> Result<UpsertOutcome> {
    let remote_id = record.network_advertiser_id.to_string();
    let name = advertiser_display_name(record);
    let status = map_advertiser_status(record.advertiser_status.as_deref());
    let contact_email = record.contact_email.as_deref();

    match Advertiser::find_by_everflow_id(&remote_id, pool).await? {
        Some(existing) => {
            match resolve_conflict(mode, record.time_saved, existing.updated_at) {
                ConflictDecision::Skip => Ok(UpsertOutcome::Skipped),
                ConflictDecision::Apply => {
                    Advertiser::apply_remote(
                        existing.id,
                        &name,
                        status,
                        contact_email,
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
            match Advertiser::insert_from_remote(
                &name,
                status,
                contact_email,
                &remote_id,
                &record.raw,
                actor,
                pool,
            )
            .await
            {
                Ok(_) => Ok(UpsertOutcome::Created),
                Err(err) if is_unique_violation(&err) => {
                    // A concurrent run inserted this remote id between our
                    // lookup and insert; apply as an update instead.
                    warn!(
                        remote_id = record.network_advertiser_id,
                        "Advertiser insert hit unique constraint, updating conflicting row"
                    );
                    let existing = Advertiser::find_by_everflow_id(&remote_id, pool)
                        .await?
                        .ok_or_else(|| {
                            anyhow::anyhow!(
                                "Advertiser {} vanished after unique violation",
                                remote_id
                            )
                        })?;
                    Advertiser::apply_remote(
                        existing.id,
                        &name,
                        status,
                        contact_email,
                        &record.raw,
                        actor,
                        pool,
                    )
                    .await?;
                    Ok(UpsertOutcome::Updated)
                }
                Err(err) => Err(err),
            }
        }
    }
}
