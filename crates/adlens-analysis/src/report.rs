//! Batch aggregation into a [`SummaryReport`].

use adlens_core::{AnalysisResult, LabelCount, RawAd, SummaryReport, TopAd};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::features::most_common;

pub const TOP_KEYWORDS: usize = 5;
pub const TOP_RECOMMENDATIONS: usize = 3;
const TOP_AD_SELLING_POINTS: usize = 3;

/// One ad with its analysis and, once persisted, its store id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAd {
    pub ad_id: Option<i64>,
    pub ad: RawAd,
    pub analysis: AnalysisResult,
}

/// Summarize `batch` under a fresh run id, stamped now.
#[must_use]
pub fn summarize(batch: &[ScoredAd]) -> SummaryReport {
    summarize_with(batch, Uuid::new_v4(), Utc::now())
}

/// Summarize `batch`. An empty batch yields zero counts and zero means.
///
/// `batch` must be in processing order: the top ad is the first one with the
/// highest engagement score.
#[must_use]
pub fn summarize_with(
    batch: &[ScoredAd],
    run_id: Uuid,
    generated_at: DateTime<Utc>,
) -> SummaryReport {
    let total = batch.len();

    let distribution = |labels: Vec<String>| -> Vec<LabelCount> {
        most_common(labels, usize::MAX)
            .into_iter()
            .map(|(label, count)| LabelCount::new(label, count))
            .collect()
    };
    let mean = |values: Vec<f64>| -> f64 {
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = total as f64;
        values.iter().sum::<f64>() / n
    };

    let platforms = first_seen_counts(batch.iter().map(|s| s.ad.platform.to_string()));
    let sentiments = first_seen_counts(batch.iter().map(|s| s.analysis.sentiment.label.to_string()));
    let cta_strengths =
        first_seen_counts(batch.iter().map(|s| s.analysis.marketing.cta_strength.to_string()));
    let urgency_levels =
        first_seen_counts(batch.iter().map(|s| s.analysis.marketing.urgency_level.to_string()));

    let mut common_keywords = distribution(
        batch
            .iter()
            .flat_map(|s| s.analysis.keywords.primary_keywords.iter().cloned())
            .collect(),
    );
    common_keywords.truncate(TOP_KEYWORDS);

    let mut top_recommendations = distribution(
        batch
            .iter()
            .flat_map(|s| s.analysis.recommendations.iter().cloned())
            .collect(),
    );
    top_recommendations.truncate(TOP_RECOMMENDATIONS);

    SummaryReport {
        run_id,
        total_ads: total,
        platforms,
        avg_engagement: mean(
            batch
                .iter()
                .map(|s| s.analysis.marketing.engagement_score)
                .collect(),
        ),
        avg_ctr: mean(
            batch
                .iter()
                .map(|s| s.analysis.performance.predicted_ctr_percent)
                .collect(),
        ),
        avg_quality: mean(
            batch
                .iter()
                .map(|s| s.analysis.performance.quality_score)
                .collect(),
        ),
        sentiments,
        cta_strengths,
        urgency_levels,
        common_keywords,
        top_recommendations,
        top_ad: top_ad(batch),
        generated_at,
    }
}

/// Occurrence counts in first-seen order.
fn first_seen_counts(labels: impl Iterator<Item = String>) -> Vec<LabelCount> {
    let mut counts: Vec<LabelCount> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|c| c.label == label) {
            Some(entry) => entry.count += 1,
            None => counts.push(LabelCount::new(label, 1)),
        }
    }
    counts
}

fn top_ad(batch: &[ScoredAd]) -> Option<TopAd> {
    let mut best: Option<&ScoredAd> = None;
    for scored in batch {
        let engagement = scored.analysis.marketing.engagement_score;
        if best.is_none_or(|b| engagement > b.analysis.marketing.engagement_score) {
            best = Some(scored);
        }
    }
    best.map(|s| TopAd {
        ad_id: s.ad_id,
        title: s.ad.title.clone(),
        platform: s.ad.platform.to_string(),
        engagement_score: s.analysis.marketing.engagement_score,
        predicted_ctr_percent: s.analysis.performance.predicted_ctr_percent,
        selling_points: s
            .analysis
            .competitive
            .selling_points
            .iter()
            .take(TOP_AD_SELLING_POINTS)
            .cloned()
            .collect(),
    })
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
