use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::PgPool;

use crate::common::{AdvertiserId, OfferId};

/// Offer - a campaign a publisher can run
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Offer {
    pub id: OfferId,
    pub name: String,
    pub status: String, // 'Active' | 'Inactive'
    pub advertiser_id: Option<AdvertiserId>,
    pub created_method: String, // 'Manually' | 'API'
    /// String form of the remote numeric id; unique. NULL for manual rows,
    /// which the sync pipeline never touches.
    pub everflow_offer_id: Option<String>,
    /// Full remote record, verbatim, for forensic/debug purposes.
    pub everflow_data: Option<Value>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Offer status enum.
///
/// Renders capitalized (`Active`/`Inactive`), unlike advertisers - an
/// existing casing inconsistency across entity types that is preserved as-is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfferStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferStatus::Active => write!(f, "Active"),
            OfferStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

impl std::str::FromStr for OfferStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Active" => Ok(OfferStatus::Active),
            "Inactive" => Ok(OfferStatus::Inactive),
            _ => Err(anyhow::anyhow!("Invalid offer status: {}", s)),
        }
    }
}

impl Offer {
    pub async fn find_by_id(id: OfferId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM offers WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_everflow_id(everflow_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM offers WHERE everflow_offer_id = $1")
            .bind(everflow_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_recent(limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM offers ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_advertiser(advertiser_id: AdvertiserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM offers WHERE advertiser_id = $1 ORDER BY created_at DESC",
        )
        .bind(advertiser_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Create an offer from the admin UI. Manual rows carry no remote id and
    /// are invisible to the sync pipeline.
    pub async fn create_manual(
        name: &str,
        status: OfferStatus,
        advertiser_id: Option<AdvertiserId>,
        created_by: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO offers (id, name, status, advertiser_id, created_method, created_by, updated_by)
            VALUES ($1, $2, $3, $4, 'Manually', $5, $5)
            RETURNING *
            "#,
        )
        .bind(OfferId::new())
        .bind(name)
        .bind(status.to_string())
        .bind(advertiser_id)
        .bind(created_by)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert a row for a remote record discovered by sync.
    pub async fn insert_from_remote(
        name: &str,
        status: OfferStatus,
        advertiser_id: Option<AdvertiserId>,
        everflow_id: &str,
        everflow_data: &Value,
        actor: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO offers
                (id, name, status, advertiser_id, created_method,
                 everflow_offer_id, everflow_data, created_by, updated_by)
            VALUES ($1, $2, $3, $4, 'API', $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(OfferId::new())
        .bind(name)
        .bind(status.to_string())
        .bind(advertiser_id)
        .bind(everflow_id)
        .bind(everflow_data)
        .bind(actor)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Overwrite the mutable fields from a remote record.
    pub async fn apply_remote(
        id: OfferId,
        name: &str,
        status: OfferStatus,
        advertiser_id: Option<AdvertiserId>,
        everflow_data: &Value,
        actor: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            UPDATE offers
            SET name = $2, status = $3, advertiser_id = $4,
                everflow_data = $5, updated_by = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(status.to_string())
        .bind(advertiser_id)
        .bind(everflow_data)
        .bind(actor)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: OfferId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
