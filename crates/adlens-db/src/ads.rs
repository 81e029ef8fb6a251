//! Database operations for the `ads` table.

use adlens_core::{Platform, RawAd};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `ads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdRow {
    pub id: i64,
    pub fetched_at: DateTime<Utc>,
    pub platform: String,
    pub ad_type: String,
    pub title: String,
    pub description: String,
    pub link: String,
    pub position: String,
    pub channel: Option<String>,
    pub views: Option<String>,
    pub duration: Option<String>,
}

impl AdRow {
    #[must_use]
    pub fn into_raw_ad(self) -> RawAd {
        RawAd {
            platform: Platform::from(self.platform),
            ad_type: self.ad_type,
            title: self.title,
            description: self.description,
            link: self.link,
            position: self.position,
            channel: self.channel,
            views: self.views,
            duration: self.duration,
            fetched_at: self.fetched_at,
        }
    }
}

/// An ad with the headline metrics of its latest analysis, if any.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredAd {
    #[sqlx(flatten)]
    pub ad: AdRow,
    pub engagement_score: Option<f64>,
    pub predicted_ctr: Option<f64>,
    pub quality_score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Append an ad and return its id. Ids increase monotonically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_ad(pool: &SqlitePool, ad: &RawAd) -> Result<i64, DbError> {
    let mut conn = pool.acquire().await?;
    insert_ad_on(&mut *conn, ad).await
}

pub(crate) async fn insert_ad_on(
    conn: &mut SqliteConnection,
    ad: &RawAd,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO ads \
             (fetched_at, platform, ad_type, title, description, link, position, \
              channel, views, duration) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(ad.fetched_at)
    .bind(ad.platform.as_str())
    .bind(&ad.ad_type)
    .bind(&ad.title)
    .bind(&ad.description)
    .bind(&ad.link)
    .bind(&ad.position)
    .bind(ad.channel.as_deref())
    .bind(ad.views.as_deref())
    .bind(ad.duration.as_deref())
    .fetch_one(&mut *conn)
    .await?;

    tracing::debug!(ad_id = id, platform = %ad.platform, "ad stored");
    Ok(id)
}

/// List ads most recent first, optionally capped at `limit` rows.
///
/// Results are ordered by `fetched_at DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ads(pool: &SqlitePool, limit: Option<i64>) -> Result<Vec<StoredAd>, DbError> {
    // SQLite treats a negative LIMIT as "no limit".
    let rows = sqlx::query_as::<_, StoredAd>(
        "SELECT a.id, a.fetched_at, a.platform, a.ad_type, a.title, a.description, a.link, \
                a.position, a.channel, a.views, a.duration, \
                ar.engagement_score, ar.predicted_ctr, ar.quality_score \
         FROM ads a \
         LEFT JOIN analysis_results ar \
           ON ar.id = (SELECT MAX(id) FROM analysis_results WHERE ad_id = a.id) \
         ORDER BY a.fetched_at DESC, a.id DESC \
         LIMIT ?",
    )
    .bind(limit.unwrap_or(-1))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_ads(pool: &SqlitePool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ads")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
