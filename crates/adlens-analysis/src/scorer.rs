//! The ad scoring engine.
//!
//! [`AdScorer`] composes the feature extractors with a sentiment oracle into
//! one [`AnalysisResult`]. Scoring is total: any text, including empty text,
//! produces a result. Given the same sentiment reading and the same
//! [`ScoringDraws`], the result is identical.

use std::sync::Arc;

use adlens_core::{
    AnalysisResult, BasicMetrics, CompetitiveInsights, CtaStrength, EmotionalTrigger,
    EngagementPotential, KeywordAnalysis, MarketingEffectiveness, PerformancePredictions, RawAd,
    SentimentAnalysis, SeoPotential, UrgencyLevel,
};
use rand::Rng;
use regex::Regex;

use crate::error::AnalysisError;
use crate::features::{self, round_to, MAX_PRIMARY_KEYWORDS};
use crate::lexicon::ScoringTables;
use crate::sentiment::{SentimentOracle, SentimentReading};

pub const MAX_CTR_PERCENT: f64 = 8.0;
const BASE_CTR: f64 = 1.5;
const MIN_SENTIMENT_FACTOR: f64 = 0.5;

pub const IMPRESSIONS_RANGE: std::ops::RangeInclusive<u32> = 3_000..=12_000;
pub const CPC_RANGE: std::ops::RangeInclusive<f64> = 20.0..=50.0;

const LOW_ENGAGEMENT_ADVICE: &str =
    "Increase engagement by adding power words like 'certified', 'expert', or 'proven'";
const WEAK_CTA_ADVICE: &str =
    "Strengthen call-to-action with action words like 'Start Learning Now' or 'Get Certified Today'";
const LOW_URGENCY_ADVICE: &str =
    "Add urgency with phrases like 'Limited Time Offer' or 'Enroll Today'";
const SOCIAL_PROOF_ADVICE: &str =
    "Include social proof like '10,000+ students' or 'Industry-recognized'";
const AUTHORITY_ADVICE: &str = "Add authority indicators like 'Expert-led' or 'Industry-certified'";
const WELL_OPTIMIZED: &str = "Ad copy is well-optimized! Consider A/B testing different variations.";

/// The two random inputs of a score: the impressions base and the CPC base.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringDraws {
    pub impressions_base: u32,
    pub cpc_base: f64,
}

impl ScoringDraws {
    #[must_use]
    pub fn new(impressions_base: u32, cpc_base: f64) -> Self {
        Self {
            impressions_base,
            cpc_base,
        }
    }

    /// Uniform draws from [`IMPRESSIONS_RANGE`] and [`CPC_RANGE`].
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            impressions_base: rng.random_range(IMPRESSIONS_RANGE),
            cpc_base: rng.random_range(CPC_RANGE),
        }
    }
}

pub struct AdScorer {
    tables: Arc<ScoringTables>,
    oracle: Arc<dyn SentimentOracle>,
    selling_patterns: Vec<Regex>,
}

impl AdScorer {
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidPattern`] if a selling-point pattern in
    /// `tables` is not a valid regex.
    pub fn new(
        tables: Arc<ScoringTables>,
        oracle: Arc<dyn SentimentOracle>,
    ) -> Result<Self, AnalysisError> {
        let selling_patterns = tables
            .selling_point_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| AnalysisError::InvalidPattern {
                    pattern: p.clone(),
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            tables,
            oracle,
            selling_patterns,
        })
    }

    #[must_use]
    pub fn oracle_name(&self) -> &'static str {
        self.oracle.name()
    }

    /// Score one ad, consulting the sentiment oracle once.
    pub async fn score(&self, ad: &RawAd, draws: ScoringDraws) -> AnalysisResult {
        let text = ad.analysis_text();
        let reading = self.oracle.classify(&text).await;
        self.score_text(&text, &reading, draws)
    }

    /// Score already lower-cased analysis text against a known sentiment
    /// reading. Pure.
    #[must_use]
    pub fn score_text(
        &self,
        text: &str,
        reading: &SentimentReading,
        draws: ScoringDraws,
    ) -> AnalysisResult {
        let tables = self.tables.as_ref();

        let word_count = text.split_whitespace().count();
        let engagement = features::engagement_score(text, tables);
        let triggers = features::emotional_triggers(text, tables);
        let cta = features::cta_strength(text, tables);
        let urgency = features::urgency_level(text, tables);
        let keywords = features::extract_keywords(text, tables);

        let persuasion_elements = triggers
            .iter()
            .filter(|t| matches!(t, EmotionalTrigger::Authority | EmotionalTrigger::SocialProof))
            .count();

        AnalysisResult {
            basic_metrics: BasicMetrics {
                word_count,
                char_count: text.chars().count(),
                reading_level: features::reading_level(text),
            },
            sentiment: SentimentAnalysis {
                label: reading.label,
                confidence: round_to(reading.score, 2),
                tone: features::tone(text, tables),
            },
            performance: PerformancePredictions {
                predicted_ctr_percent: round_to(predict_ctr(engagement, reading.score, cta), 2),
                estimated_daily_impressions: estimate_impressions(engagement, draws.impressions_base),
                estimated_cpc: round_to(estimate_cpc(engagement, cta, draws.cpc_base), 2),
                quality_score: round_to(quality_score(engagement, reading.score, word_count), 1),
                engagement_potential: engagement_potential(engagement),
            },
            competitive: CompetitiveInsights {
                positioning: features::positioning(text, tables),
                selling_points: features::selling_points(text, &self.selling_patterns),
                target_audience: features::target_audience(text, tables),
                competitive_advantages: features::competitive_advantages(text, tables),
            },
            keywords: KeywordAnalysis {
                primary_keywords: keywords.iter().take(MAX_PRIMARY_KEYWORDS).cloned().collect(),
                keyword_density_percent: features::keyword_density(text, tables),
                missing_opportunities: features::missing_keywords(text, tables),
                seo_potential: if keywords.len() > 3 {
                    SeoPotential::High
                } else {
                    SeoPotential::Medium
                },
            },
            recommendations: recommendations(engagement, cta, urgency, &triggers),
            marketing: MarketingEffectiveness {
                engagement_score: round_to(engagement, 1),
                cta_strength: cta,
                urgency_level: urgency,
                emotional_triggers: triggers,
                persuasion_elements,
            },
        }
    }
}

fn ctr_multiplier(cta: CtaStrength) -> f64 {
    match cta {
        CtaStrength::Strong => 1.8,
        CtaStrength::Medium => 1.3,
        CtaStrength::Weak => 1.0,
        CtaStrength::Absent => 0.7,
    }
}

fn cpc_factor(cta: CtaStrength) -> f64 {
    match cta {
        CtaStrength::Strong => 1.3,
        CtaStrength::Medium => 1.1,
        CtaStrength::Weak => 0.9,
        CtaStrength::Absent => 0.8,
    }
}

/// Predicted click-through rate in percent, in `[0, 8]`.
#[must_use]
pub fn predict_ctr(engagement: f64, sentiment_score: f64, cta: CtaStrength) -> f64 {
    let ctr = BASE_CTR
        * (engagement / 10.0)
        * sentiment_score.max(MIN_SENTIMENT_FACTOR)
        * ctr_multiplier(cta);
    ctr.min(MAX_CTR_PERCENT)
}

#[must_use]
pub fn estimate_impressions(engagement: f64, base: u32) -> u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let impressions = (f64::from(base) * (1.0 + engagement / 15.0)) as u64;
    impressions
}

#[must_use]
pub fn estimate_cpc(engagement: f64, cta: CtaStrength, base: f64) -> f64 {
    base * (1.2 - engagement / 20.0).max(0.6) * cpc_factor(cta)
}

/// Quality score in `[0, 10]`.
#[must_use]
pub fn quality_score(engagement: f64, sentiment_score: f64, word_count: usize) -> f64 {
    let length_penalty = match word_count {
        5..=25 => 1.0,
        0..=4 => 0.8,
        _ => 0.9,
    };
    let raw = (engagement.min(10.0) + sentiment_score * 10.0) / 2.0 * length_penalty;
    raw.clamp(0.0, 10.0)
}

fn engagement_potential(engagement: f64) -> EngagementPotential {
    if engagement > 7.0 {
        EngagementPotential::High
    } else if engagement > 4.0 {
        EngagementPotential::Medium
    } else {
        EngagementPotential::Low
    }
}

/// Advisory strings in rule order. Never empty.
#[must_use]
pub fn recommendations(
    engagement: f64,
    cta: CtaStrength,
    urgency: UrgencyLevel,
    triggers: &[EmotionalTrigger],
) -> Vec<String> {
    let mut out = Vec::new();
    if engagement < 5.0 {
        out.push(LOW_ENGAGEMENT_ADVICE);
    }
    if matches!(cta, CtaStrength::Weak | CtaStrength::Absent) {
        out.push(WEAK_CTA_ADVICE);
    }
    if urgency == UrgencyLevel::Low {
        out.push(LOW_URGENCY_ADVICE);
    }
    if !triggers.contains(&EmotionalTrigger::SocialProof) {
        out.push(SOCIAL_PROOF_ADVICE);
    }
    if !triggers.contains(&EmotionalTrigger::Authority) {
        out.push(AUTHORITY_ADVICE);
    }
    if out.is_empty() {
        out.push(WELL_OPTIMIZED);
    }
    out.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
