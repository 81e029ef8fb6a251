//! Ranking and grouped aggregates over ads joined with their analyses.

use sqlx::SqlitePool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TopPerformerRow {
    pub ad_id: i64,
    pub title: String,
    pub platform: String,
    pub engagement_score: f64,
    pub predicted_ctr: f64,
    pub quality_score: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlatformPerformanceRow {
    pub platform: String,
    pub ad_count: i64,
    pub avg_engagement: f64,
    pub avg_ctr: f64,
    pub avg_quality: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CtaPerformanceRow {
    pub cta_strength: String,
    pub ad_count: i64,
    pub avg_engagement: f64,
    pub avg_ctr: f64,
}

/// The `limit` highest-engagement analyses, ties broken by insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn top_performing(pool: &SqlitePool, limit: i64) -> Result<Vec<TopPerformerRow>, DbError> {
    let rows = sqlx::query_as::<_, TopPerformerRow>(
        "SELECT a.id AS ad_id, a.title, a.platform, \
                ar.engagement_score, ar.predicted_ctr, ar.quality_score \
         FROM ads a \
         JOIN analysis_results ar ON a.id = ar.ad_id \
         ORDER BY ar.engagement_score DESC, ar.id ASC \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mean engagement, CTR and quality per platform, best engagement first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn platform_performance(
    pool: &SqlitePool,
) -> Result<Vec<PlatformPerformanceRow>, DbError> {
    let rows = sqlx::query_as::<_, PlatformPerformanceRow>(
        "SELECT a.platform, \
                COUNT(*) AS ad_count, \
                AVG(ar.engagement_score) AS avg_engagement, \
                AVG(ar.predicted_ctr) AS avg_ctr, \
                AVG(ar.quality_score) AS avg_quality \
         FROM ads a \
         JOIN analysis_results ar ON a.id = ar.ad_id \
         GROUP BY a.platform \
         ORDER BY avg_engagement DESC, a.platform ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count, mean engagement and mean CTR per CTA strength, best engagement first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn cta_performance(pool: &SqlitePool) -> Result<Vec<CtaPerformanceRow>, DbError> {
    let rows = sqlx::query_as::<_, CtaPerformanceRow>(
        "SELECT ar.cta_strength, \
                COUNT(*) AS ad_count, \
                AVG(ar.engagement_score) AS avg_engagement, \
                AVG(ar.predicted_ctr) AS avg_ctr \
         FROM analysis_results ar \
         JOIN ads a ON a.id = ar.ad_id \
         GROUP BY ar.cta_strength \
         ORDER BY avg_engagement DESC, ar.cta_strength ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
