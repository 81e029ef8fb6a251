//! Batch-level aggregate over scored ads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A label with its occurrence count, used for every distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl LabelCount {
    #[must_use]
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// The highest-engagement ad of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopAd {
    /// Store id when the batch was persisted before summarizing.
    pub ad_id: Option<i64>,
    pub title: String,
    pub platform: String,
    pub engagement_score: f64,
    pub predicted_ctr_percent: f64,
    pub selling_points: Vec<String>,
}

/// Aggregate statistics for one batch run. Created once, never mutated.
///
/// Distributions keep first-seen order; keyword and recommendation lists are
/// sorted by descending count with first-seen order breaking ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub run_id: Uuid,
    pub total_ads: usize,
    pub platforms: Vec<LabelCount>,
    pub avg_engagement: f64,
    pub avg_ctr: f64,
    pub avg_quality: f64,
    pub sentiments: Vec<LabelCount>,
    pub cta_strengths: Vec<LabelCount>,
    pub urgency_levels: Vec<LabelCount>,
    pub common_keywords: Vec<LabelCount>,
    pub top_recommendations: Vec<LabelCount>,
    pub top_ad: Option<TopAd>,
    pub generated_at: DateTime<Utc>,
}

impl SummaryReport {
    /// Count for `label` in `distribution`, or zero.
    #[must_use]
    pub fn count_of(distribution: &[LabelCount], label: &str) -> usize {
        distribution
            .iter()
            .find(|entry| entry.label == label)
            .map_or(0, |entry| entry.count)
    }
}
