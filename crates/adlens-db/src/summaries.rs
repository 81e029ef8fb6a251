//! Database operations for the `summary_reports` table.

use adlens_core::{LabelCount, SummaryReport, TopAd};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{to_i64, to_usize, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
struct SummaryRow {
    run_id: String,
    generated_at: DateTime<Utc>,
    total_ads_analyzed: i64,
    avg_engagement_score: f64,
    avg_predicted_ctr: f64,
    avg_quality_score: f64,
    platform_distribution: String,
    sentiment_distribution: String,
    cta_distribution: String,
    urgency_distribution: String,
    common_keywords: String,
    top_recommendations: String,
    top_ad: Option<String>,
}

impl SummaryRow {
    fn into_report(self) -> Result<SummaryReport, DbError> {
        let counts = |raw: &str| -> Result<Vec<LabelCount>, DbError> { Ok(serde_json::from_str(raw)?) };
        let top_ad: Option<TopAd> = match self.top_ad.as_deref() {
            Some(raw) => Some(serde_json::from_str(raw)?),
            None => None,
        };
        Ok(SummaryReport {
            run_id: Uuid::parse_str(&self.run_id)
                .map_err(|e| DbError::Corrupt(format!("run_id: {e}")))?,
            total_ads: to_usize("total_ads_analyzed", self.total_ads_analyzed)?,
            platforms: counts(&self.platform_distribution)?,
            avg_engagement: self.avg_engagement_score,
            avg_ctr: self.avg_predicted_ctr,
            avg_quality: self.avg_quality_score,
            sentiments: counts(&self.sentiment_distribution)?,
            cta_strengths: counts(&self.cta_distribution)?,
            urgency_levels: counts(&self.urgency_distribution)?,
            common_keywords: counts(&self.common_keywords)?,
            top_recommendations: counts(&self.top_recommendations)?,
            top_ad,
            generated_at: self.generated_at,
        })
    }
}

/// Append one summary report and return its row id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including a second insert
/// with the same `run_id`.
pub async fn insert_summary(pool: &SqlitePool, report: &SummaryReport) -> Result<i64, DbError> {
    let top_ad = report
        .top_ad
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO summary_reports ( \
             run_id, generated_at, total_ads_analyzed, \
             avg_engagement_score, avg_predicted_ctr, avg_quality_score, \
             platform_distribution, sentiment_distribution, cta_distribution, \
             urgency_distribution, common_keywords, top_recommendations, top_ad) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(report.run_id.to_string())
    .bind(report.generated_at)
    .bind(to_i64("total_ads_analyzed", report.total_ads)?)
    .bind(report.avg_engagement)
    .bind(report.avg_ctr)
    .bind(report.avg_quality)
    .bind(serde_json::to_string(&report.platforms)?)
    .bind(serde_json::to_string(&report.sentiments)?)
    .bind(serde_json::to_string(&report.cta_strengths)?)
    .bind(serde_json::to_string(&report.urgency_levels)?)
    .bind(serde_json::to_string(&report.common_keywords)?)
    .bind(serde_json::to_string(&report.top_recommendations)?)
    .bind(top_ad)
    .fetch_one(pool)
    .await?;

    tracing::info!(summary_id = id, run_id = %report.run_id, total_ads = report.total_ads, "summary stored");
    Ok(id)
}

/// Most recent summaries first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or a decode error if a stored
/// row is malformed.
pub async fn list_summaries(pool: &SqlitePool, limit: i64) -> Result<Vec<SummaryReport>, DbError> {
    let rows = sqlx::query_as::<_, SummaryRow>(
        "SELECT run_id, generated_at, total_ads_analyzed, \
                avg_engagement_score, avg_predicted_ctr, avg_quality_score, \
                platform_distribution, sentiment_distribution, cta_distribution, \
                urgency_distribution, common_keywords, top_recommendations, top_ad \
         FROM summary_reports \
         ORDER BY generated_at DESC, id DESC \
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(SummaryRow::into_report).collect()
}
