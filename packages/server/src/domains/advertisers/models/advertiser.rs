use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::common::AdvertiserId;

/// Advertiser - a brand/partner whose offers this network runs
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Advertiser {
    pub id: AdvertiserId,
    pub name: String,
    pub status: String, // 'active' | 'inactive'
    pub contact_email: Option<String>,
    pub created_method: String, // 'Manually' | 'API'
    /// String form of the remote numeric id; unique. NULL for manual rows,
    /// which the sync pipeline never touches.
    pub everflow_advertiser_id: Option<String>,
    /// Full remote record, verbatim, for forensic/debug purposes.
    pub everflow_data: Option<Value>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Advertiser status enum.
///
/// Renders lowercase (`active`/`inactive`), unlike offers - an existing
/// casing inconsistency across entity types that is preserved as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdvertiserStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for AdvertiserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdvertiserStatus::Active => write!(f, "active"),
            AdvertiserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for AdvertiserStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(AdvertiserStatus::Active),
            "inactive" => Ok(AdvertiserStatus::Inactive),
            _ => Err(anyhow::anyhow!("Invalid advertiser status: {}", s)),
        }
    }
}

impl Advertiser {
    pub async fn find_by_id(id: AdvertiserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM advertisers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_everflow_id(everflow_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM advertisers WHERE everflow_advertiser_id = $1")
            .bind(everflow_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM advertisers ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Create an advertiser from the admin UI. Manual rows carry no remote id
    /// and are invisible to the sync pipeline.
    pub async fn create_manual(
        name: &str,
        status: AdvertiserStatus,
        contact_email: Option<&str>,
        created_by: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO advertisers (id, name, status, contact_email, created_method, created_by, updated_by)
            VALUES ($1, $2, $3, $4, 'Manually', $5, $5)
            RETURNING *
            "#,
        )
        .bind(AdvertiserId::new())
        .bind(name)
        .bind(status.to_string())
        .bind(contact_email)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a row for a remote record discovered by sync.
    ///
    /// Raises on a unique violation of `everflow_advertiser_id`; callers
    /// detect that with [`is_unique_violation`] and fall back to an update
    /// against the conflicting row.
    pub async fn insert_from_remote(
        name: &str,
        status: AdvertiserStatus,
        contact_email: Option<&str>,
        everflow_id: &str,
        everflow_data: &Value,
        actor: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO advertisers
                (id, name, status, contact_email, created_method,
                 everflow_advertiser_id, everflow_data, created_by, updated_by)
            VALUES ($1, $2, $3, $4, 'API', $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(AdvertiserId::new())
        .bind(name)
        .bind(status.to_string())
        .bind(contact_email)
        .bind(everflow_id)
        .bind(everflow_data)
        .bind(actor)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Overwrite the mutable fields from a remote record.
    pub async fn apply_remote(
        id: AdvertiserId,
        name: &str,
        status: AdvertiserStatus,
        contact_email: Option<&str>,
        everflow_data: &Value,
        actor: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE advertisers
            SET name = $2, status = $3, contact_email = $4,
                everflow_data = $5, updated_by = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(status.to_string())
        .bind(contact_email)
        .bind(everflow_data)
        .bind(actor)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: AdvertiserId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM advertisers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}

/// Whether an error is a Postgres unique-constraint violation (code 23505).
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|db| db.code())
        .map_or(false, |code| code == "23505")
}
