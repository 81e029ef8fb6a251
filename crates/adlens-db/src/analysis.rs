//! Database operations for the `analysis_results` table.

use adlens_core::{
    AnalysisResult, BasicMetrics, CompetitiveInsights, KeywordAnalysis, MarketingEffectiveness,
    PerformancePredictions, RawAd, SentimentAnalysis,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use sqlx::{SqliteConnection, SqlitePool};

use crate::ads::insert_ad_on;
use crate::{parse_label, to_i64, to_usize, DbError};

/// Columns of `analysis_results` in the order every query selects them.
pub(crate) const ANALYSIS_COLUMNS: &str = "ar.ad_id, ar.analyzed_at, ar.word_count, ar.char_count, \
     ar.reading_level, ar.sentiment, ar.sentiment_confidence, ar.emotional_tone, \
     ar.engagement_score, ar.cta_strength, ar.urgency_level, ar.emotional_triggers, \
     ar.persuasion_elements, ar.predicted_ctr, ar.estimated_daily_impressions, ar.estimated_cpc, \
     ar.quality_score, ar.engagement_potential, ar.positioning_strategy, ar.target_audience, \
     ar.key_selling_points, ar.competitive_advantages, ar.primary_keywords, ar.keyword_density, \
     ar.missing_opportunities, ar.seo_potential, ar.optimization_recommendations";

/// A row from the `analysis_results` table. List-valued columns hold JSON
/// array text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub ad_id: i64,
    pub analyzed_at: DateTime<Utc>,
    pub word_count: i64,
    pub char_count: i64,
    pub reading_level: String,
    pub sentiment: String,
    pub sentiment_confidence: f64,
    pub emotional_tone: String,
    pub engagement_score: f64,
    pub cta_strength: String,
    pub urgency_level: String,
    pub emotional_triggers: String,
    pub persuasion_elements: i64,
    pub predicted_ctr: f64,
    pub estimated_daily_impressions: i64,
    pub estimated_cpc: f64,
    pub quality_score: f64,
    pub engagement_potential: String,
    pub positioning_strategy: String,
    pub target_audience: String,
    pub key_selling_points: String,
    pub competitive_advantages: String,
    pub primary_keywords: String,
    pub keyword_density: f64,
    pub missing_opportunities: String,
    pub seo_potential: String,
    pub optimization_recommendations: String,
}

impl AnalysisRow {
    /// Decode the row back into an [`AnalysisResult`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Corrupt`] for unknown labels, [`DbError::Json`] for
    /// malformed list columns, or [`DbError::OutOfRange`] for negative counts.
    pub fn into_result(self) -> Result<AnalysisResult, DbError> {
        Ok(AnalysisResult {
            basic_metrics: BasicMetrics {
                word_count: to_usize("word_count", self.word_count)?,
                char_count: to_usize("char_count", self.char_count)?,
                reading_level: parse_label("reading_level", &self.reading_level)?,
            },
            sentiment: SentimentAnalysis {
                label: parse_label("sentiment", &self.sentiment)?,
                confidence: self.sentiment_confidence,
                tone: parse_label("emotional_tone", &self.emotional_tone)?,
            },
            marketing: MarketingEffectiveness {
                engagement_score: self.engagement_score,
                cta_strength: parse_label("cta_strength", &self.cta_strength)?,
                urgency_level: parse_label("urgency_level", &self.urgency_level)?,
                emotional_triggers: json_list(&self.emotional_triggers)?,
                persuasion_elements: to_usize("persuasion_elements", self.persuasion_elements)?,
            },
            performance: PerformancePredictions {
                predicted_ctr_percent: self.predicted_ctr,
                estimated_daily_impressions: u64::try_from(self.estimated_daily_impressions)
                    .map_err(|_| DbError::OutOfRange {
                        column: "estimated_daily_impressions",
                        value: self.estimated_daily_impressions.to_string(),
                    })?,
                estimated_cpc: self.estimated_cpc,
                quality_score: self.quality_score,
                engagement_potential: parse_label(
                    "engagement_potential",
                    &self.engagement_potential,
                )?,
            },
            competitive: CompetitiveInsights {
                positioning: parse_label("positioning_strategy", &self.positioning_strategy)?,
                selling_points: json_list(&self.key_selling_points)?,
                target_audience: parse_label("target_audience", &self.target_audience)?,
                competitive_advantages: json_list(&self.competitive_advantages)?,
            },
            keywords: KeywordAnalysis {
                primary_keywords: json_list(&self.primary_keywords)?,
                keyword_density_percent: self.keyword_density,
                missing_opportunities: json_list(&self.missing_opportunities)?,
                seo_potential: parse_label("seo_potential", &self.seo_potential)?,
            },
            recommendations: json_list(&self.optimization_recommendations)?,
        })
    }
}

fn json_list<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, DbError> {
    Ok(serde_json::from_str(raw)?)
}

/// Store `analysis` for ad `ad_id` and return the analysis row id.
///
/// The existence check and the insert run in one transaction, so an analysis
/// never references a missing ad.
///
/// # Errors
///
/// Returns [`DbError::UnknownAd`] if no ad has id `ad_id`, or
/// [`DbError::Sqlx`] if the transaction fails.
pub async fn insert_analysis(
    pool: &SqlitePool,
    ad_id: i64,
    analysis: &AnalysisResult,
    analyzed_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;
    let id = insert_analysis_on(&mut *tx, ad_id, analysis, analyzed_at).await?;
    tx.commit().await?;
    Ok(id)
}

/// Store a freshly fetched ad together with its analysis in one transaction
/// and return `(ad_id, analysis_id)`. Nothing is written if either insert
/// fails.
///
/// # Errors
///
/// Returns [`DbError::OutOfRange`] if a count does not fit in an `INTEGER`
/// column, or [`DbError::Sqlx`] / [`DbError::Json`] if either insert fails.
pub async fn insert_ad_with_analysis(
    pool: &SqlitePool,
    ad: &RawAd,
    analysis: &AnalysisResult,
    analyzed_at: DateTime<Utc>,
) -> Result<(i64, i64), DbError> {
    let mut tx = pool.begin().await?;
    let ad_id = insert_ad_on(&mut *tx, ad).await?;
    let analysis_id = insert_analysis_on(&mut *tx, ad_id, analysis, analyzed_at).await?;
    tx.commit().await?;
    Ok((ad_id, analysis_id))
}

async fn insert_analysis_on(
    conn: &mut SqliteConnection,
    ad_id: i64,
    analysis: &AnalysisResult,
    analyzed_at: DateTime<Utc>,
) -> Result<i64, DbError> {
    let basic = &analysis.basic_metrics;
    let marketing = &analysis.marketing;
    let performance = &analysis.performance;
    let competitive = &analysis.competitive;
    let keywords = &analysis.keywords;

    let impressions =
        i64::try_from(performance.estimated_daily_impressions).map_err(|_| DbError::OutOfRange {
            column: "estimated_daily_impressions",
            value: performance.estimated_daily_impressions.to_string(),
        })?;

    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM ads WHERE id = ?")
        .bind(ad_id)
        .fetch_optional(&mut *conn)
        .await?;
    if exists.is_none() {
        return Err(DbError::UnknownAd(ad_id));
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO analysis_results ( \
             ad_id, analyzed_at, word_count, char_count, reading_level, \
             sentiment, sentiment_confidence, emotional_tone, \
             engagement_score, cta_strength, urgency_level, emotional_triggers, persuasion_elements, \
             predicted_ctr, estimated_daily_impressions, estimated_cpc, quality_score, \
             engagement_potential, positioning_strategy, target_audience, key_selling_points, \
             competitive_advantages, primary_keywords, keyword_density, missing_opportunities, \
             seo_potential, optimization_recommendations) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
         RETURNING id",
    )
    .bind(ad_id)
    .bind(analyzed_at)
    .bind(to_i64("word_count", basic.word_count)?)
    .bind(to_i64("char_count", basic.char_count)?)
    .bind(basic.reading_level.as_str())
    .bind(analysis.sentiment.label.as_str())
    .bind(analysis.sentiment.confidence)
    .bind(analysis.sentiment.tone.as_str())
    .bind(marketing.engagement_score)
    .bind(marketing.cta_strength.as_str())
    .bind(marketing.urgency_level.as_str())
    .bind(serde_json::to_string(&marketing.emotional_triggers)?)
    .bind(to_i64("persuasion_elements", marketing.persuasion_elements)?)
    .bind(performance.predicted_ctr_percent)
    .bind(impressions)
    .bind(performance.estimated_cpc)
    .bind(performance.quality_score)
    .bind(performance.engagement_potential.as_str())
    .bind(competitive.positioning.as_str())
    .bind(competitive.target_audience.as_str())
    .bind(serde_json::to_string(&competitive.selling_points)?)
    .bind(serde_json::to_string(&competitive.competitive_advantages)?)
    .bind(serde_json::to_string(&keywords.primary_keywords)?)
    .bind(keywords.keyword_density_percent)
    .bind(serde_json::to_string(&keywords.missing_opportunities)?)
    .bind(keywords.seo_potential.as_str())
    .bind(serde_json::to_string(&analysis.recommendations)?)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Fetch the latest analysis stored for `ad_id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the ad has no analysis, or a decode error
/// from [`AnalysisRow::into_result`].
pub async fn get_analysis(pool: &SqlitePool, ad_id: i64) -> Result<AnalysisResult, DbError> {
    let sql = format!(
        "SELECT {ANALYSIS_COLUMNS} FROM analysis_results ar \
         WHERE ar.ad_id = ? ORDER BY ar.id DESC LIMIT 1"
    );
    let row = sqlx::query_as::<_, AnalysisRow>(&sql)
        .bind(ad_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DbError::NotFound)?;
    row.into_result()
}
