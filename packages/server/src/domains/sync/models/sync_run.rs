//! SyncRun model - audit row for one execution of the sync pipeline

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::common::SyncRunId;
use crate::domains::sync::logic::SyncCounters;

/// Lifecycle status of a sync run. `in_progress` transitions exactly once
/// to a terminal `completed` or `failed`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for SyncRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncRunStatus::InProgress => write!(f, "in_progress"),
            SyncRunStatus::Completed => write!(f, "completed"),
            SyncRunStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for SyncRunStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "in_progress" => Ok(SyncRunStatus::InProgress),
            "completed" => Ok(SyncRunStatus::Completed),
            "failed" => Ok(SyncRunStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid sync run status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncRun {
    pub id: SyncRunId,
    pub sync_type: String, // 'offers' | 'advertisers'
    pub status: String,    // 'in_progress' | 'completed' | 'failed'
    pub started_by: String,
    pub sync_options: Option<Value>,
    pub total_records: i32,
    pub synced_records: i32,
    pub created_records: i32,
    pub updated_records: i32,
    pub skipped_records: i32,
    pub failed_records: i32,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SyncRun {
    /// Insert the audit row at sync start, in `in_progress`, with a snapshot
    /// of the invocation options.
    pub async fn create(
        id: SyncRunId,
        sync_type: &str,
        started_by: &str,
        sync_options: &Value,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO sync_history (id, sync_type, started_by, sync_options)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(sync_type)
        .bind(started_by)
        .bind(sync_options)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: SyncRunId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM sync_history WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Record the deduplicated record count once pagination settles.
    pub async fn set_total(id: SyncRunId, total_records: i32, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE sync_history SET total_records = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(total_records)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Milestone update of the running counters, in place.
    pub async fn update_counters(
        id: SyncRunId,
        counters: &SyncCounters,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE sync_history
            SET synced_records = $2, created_records = $3, updated_records = $4,
                skipped_records = $5, failed_records = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(counters.synced as i32)
        .bind(counters.created as i32)
        .bind(counters.updated as i32)
        .bind(counters.skipped as i32)
        .bind(counters.failed as i32)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Finalize as `completed` with the final counters.
    pub async fn finalize_completed(
        id: SyncRunId,
        counters: &SyncCounters,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE sync_history
            SET status = 'completed',
                synced_records = $2, created_records = $3, updated_records = $4,
                skipped_records = $5, failed_records = $6,
                completed_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(counters.synced as i32)
        .bind(counters.created as i32)
        .bind(counters.updated as i32)
        .bind(counters.skipped as i32)
        .bind(counters.failed as i32)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Finalize as `failed` with the failure message.
    pub async fn finalize_failed(id: SyncRunId, error_message: &str, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE sync_history
            SET status = 'failed', error_message = $2, completed_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(error_message)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Newest-first audit listing for the admin UI, optionally filtered by
    /// sync type. Never consumed by the pipeline itself.
    pub async fn find_recent(
        sync_type: Option<&str>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM sync_history
            WHERE ($1::text IS NULL OR sync_type = $1)
            ORDER BY started_at DESC
            LIMIT $2
            "#,
        )
        .bind(sync_type)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
