use adlens_core::{
    Audience, Platform, Positioning, ReadingLevel, SentimentLabel, Tone,
};
use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;

struct FixedOracle(SentimentReading);

#[async_trait]
impl SentimentOracle for FixedOracle {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn classify(&self, _text: &str) -> SentimentReading {
        self.0
    }
}

fn scorer_with(reading: SentimentReading) -> AdScorer {
    AdScorer::new(
        Arc::new(ScoringTables::default()),
        Arc::new(FixedOracle(reading)),
    )
    .unwrap()
}

fn positive(score: f64) -> SentimentReading {
    SentimentReading::new(SentimentLabel::Positive, score)
}

fn ad(title: &str, description: &str) -> RawAd {
    RawAd::new(Platform::Google, "Search Ad", Utc::now()).with_text(title, description)
}

const DRAWS: ScoringDraws = ScoringDraws {
    impressions_base: 4_000,
    cpc_base: 30.0,
};

#[tokio::test]
async fn scores_a_simple_ad_end_to_end() {
    let result = scorer_with(positive(0.8))
        .score(&ad("Free Python Course", ""), DRAWS)
        .await;

    assert_eq!(result.basic_metrics.word_count, 3);
    assert_eq!(result.basic_metrics.char_count, 19);
    assert_eq!(result.basic_metrics.reading_level, ReadingLevel::Medium);

    assert_eq!(result.sentiment.label, SentimentLabel::Positive);
    assert!((result.sentiment.confidence - 0.8).abs() < 1e-9);
    assert_eq!(result.sentiment.tone, Tone::Neutral);

    assert!((result.marketing.engagement_score - 4.0).abs() < 1e-9);
    assert_eq!(result.marketing.cta_strength, CtaStrength::Absent);
    assert_eq!(result.marketing.urgency_level, UrgencyLevel::Low);
    assert!(result.marketing.emotional_triggers.is_empty());
    assert_eq!(result.marketing.persuasion_elements, 0);

    let perf = &result.performance;
    assert!((perf.predicted_ctr_percent - 0.34).abs() < 1e-9, "ctr {}", perf.predicted_ctr_percent);
    assert_eq!(perf.estimated_daily_impressions, 5_066);
    assert!((perf.estimated_cpc - 24.0).abs() < 1e-9, "cpc {}", perf.estimated_cpc);
    assert!((perf.quality_score - 4.8).abs() < 1e-9, "quality {}", perf.quality_score);
    assert_eq!(perf.engagement_potential, EngagementPotential::Low);

    assert_eq!(result.competitive.positioning, Positioning::Budget);
    assert_eq!(result.competitive.target_audience, Audience::General);
    assert_eq!(result.competitive.competitive_advantages, vec!["Free Content"]);
    assert!(result.competitive.selling_points.is_empty());

    assert_eq!(result.keywords.primary_keywords, vec!["free", "python", "course"]);
    assert!((result.keywords.keyword_density_percent - 66.7).abs() < 1e-9);
    assert_eq!(result.keywords.seo_potential, SeoPotential::Medium);

    assert_eq!(result.recommendations.len(), 5);
    assert!(result.recommendations[0].starts_with("Increase engagement"));
}

#[tokio::test]
async fn engagement_and_ctr_stay_in_bounds() {
    let texts = [
        ("", ""),
        ("?", "1"),
        (
            "FREE free free free certified certified expert professional",
            "guarantee proven exclusive limited join now 100% ?",
        ),
        ("Difficult hard complex", "challenging struggle problem"),
    ];
    for reading in [positive(3.0), positive(0.0), SentimentReading::new(SentimentLabel::Negative, -0.5)] {
        let scorer = scorer_with(reading);
        for (title, description) in texts {
            let result = scorer.score(&ad(title, description), DRAWS).await;
            let engagement = result.marketing.engagement_score;
            let ctr = result.performance.predicted_ctr_percent;
            let quality = result.performance.quality_score;
            assert!((1.0..=10.0).contains(&engagement), "engagement {engagement} for {title:?}");
            assert!((0.0..=MAX_CTR_PERCENT).contains(&ctr), "ctr {ctr} for {title:?}");
            assert!((0.0..=10.0).contains(&quality), "quality {quality} for {title:?}");
        }
    }
}

#[test]
fn ctr_is_capped_at_eight() {
    assert!((predict_ctr(10.0, 3.0, CtaStrength::Strong) - MAX_CTR_PERCENT).abs() < f64::EPSILON);
}

#[test]
fn low_sentiment_is_floored_in_ctr() {
    let floored = predict_ctr(5.0, 0.1, CtaStrength::Weak);
    let at_floor = predict_ctr(5.0, 0.5, CtaStrength::Weak);
    assert!((floored - at_floor).abs() < f64::EPSILON);
}

#[test]
fn impressions_scale_with_engagement() {
    assert_eq!(estimate_impressions(7.5, 4_000), 6_000);
    assert_eq!(estimate_impressions(0.0, 3_000), 3_000);
}

#[test]
fn cpc_quality_factor_has_a_floor() {
    // 1.2 - 10/20 = 0.7, above the 0.6 floor
    assert!((estimate_cpc(10.0, CtaStrength::Weak, 20.0) - 12.6).abs() < 1e-9);
    // a ceiling-engagement ad never drops below 0.6 of base
    assert!(estimate_cpc(10.0, CtaStrength::Absent, 50.0) >= 50.0 * 0.6 * 0.8);
}

#[test]
fn quality_applies_length_penalty_and_clamps() {
    assert!((quality_score(6.0, 0.8, 10) - 7.0).abs() < 1e-9);
    assert!((quality_score(6.0, 0.8, 30) - 6.3).abs() < 1e-9);
    assert!(quality_score(1.0, -0.5, 3).abs() < f64::EPSILON);
    assert!((quality_score(10.0, 1.5, 10) - 10.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn scoring_is_repeatable_with_fixed_inputs() {
    let scorer = scorer_with(positive(0.9));
    let ad = ad(
        "Join now: certified Python course",
        "Learn from industry experts in 12 weeks with hands-on projects.",
    );
    let first = scorer.score(&ad, DRAWS).await;
    let second = scorer.score(&ad, DRAWS).await;
    assert_eq!(first, second);

    // only the randomized fields change with other draws
    let mut third = scorer.score(&ad, ScoringDraws::new(11_000, 45.5)).await;
    assert_ne!(first.performance.estimated_daily_impressions, third.performance.estimated_daily_impressions);
    third.performance.estimated_daily_impressions = first.performance.estimated_daily_impressions;
    third.performance.estimated_cpc = first.performance.estimated_cpc;
    assert_eq!(first, third);
}

#[tokio::test]
async fn strong_cta_wins_over_weak_phrase() {
    let result = scorer_with(positive(0.5))
        .score(&ad("Join now", "or visit our site"), DRAWS)
        .await;
    assert_eq!(result.marketing.cta_strength, CtaStrength::Strong);
    assert!(!result
        .recommendations
        .iter()
        .any(|r| r.starts_with("Strengthen call-to-action")));
}

#[tokio::test]
async fn empty_ad_scores_without_failing() {
    let result = scorer_with(SentimentReading::new(SentimentLabel::Neutral, 0.5))
        .score(&ad("", ""), DRAWS)
        .await;
    assert_eq!(result.basic_metrics.word_count, 0);
    assert_eq!(result.basic_metrics.reading_level, ReadingLevel::Easy);
    assert!((result.marketing.engagement_score - 1.0).abs() < f64::EPSILON);
    assert!(!result.recommendations.is_empty());
    assert!(result.keywords.primary_keywords.is_empty());
    assert!(result.keywords.keyword_density_percent.abs() < f64::EPSILON);
}

#[tokio::test]
async fn missing_opportunities_skip_present_phrases() {
    let result = scorer_with(positive(0.5))
        .score(&ad("Data science certification", "online"), DRAWS)
        .await;
    let missing = &result.keywords.missing_opportunities;
    assert!(missing.iter().any(|k| k == "placement"));
    assert!(!missing.iter().any(|k| k == "certification"));
}

#[test]
fn well_optimized_copy_gets_single_message() {
    let recs = recommendations(
        8.0,
        CtaStrength::Strong,
        UrgencyLevel::High,
        &[EmotionalTrigger::SocialProof, EmotionalTrigger::Authority],
    );
    assert_eq!(recs, vec![WELL_OPTIMIZED.to_string()]);
}

#[test]
fn recommendations_follow_rule_order() {
    let recs = recommendations(3.0, CtaStrength::Medium, UrgencyLevel::Low, &[EmotionalTrigger::Authority]);
    assert_eq!(
        recs,
        vec![
            LOW_ENGAGEMENT_ADVICE.to_string(),
            LOW_URGENCY_ADVICE.to_string(),
            SOCIAL_PROOF_ADVICE.to_string(),
        ]
    );
}

#[test]
fn seeded_draws_are_reproducible_and_in_range() {
    let a = ScoringDraws::sample(&mut StdRng::seed_from_u64(7));
    let b = ScoringDraws::sample(&mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
    assert!(IMPRESSIONS_RANGE.contains(&a.impressions_base));
    assert!(CPC_RANGE.contains(&a.cpc_base));
}

#[test]
fn invalid_selling_pattern_is_rejected() {
    let tables = ScoringTables {
        selling_point_patterns: vec!["(unclosed".to_string()],
        ..ScoringTables::default()
    };
    let oracle: Arc<dyn SentimentOracle> = Arc::new(FixedOracle(positive(0.5)));
    let err = AdScorer::new(Arc::new(tables), oracle).err().unwrap();
    assert!(matches!(err, AnalysisError::InvalidPattern { .. }), "got {err:?}");
}

#[tokio::test]
async fn smaller_injected_tables_change_the_score() {
    let tables = ScoringTables {
        keyword_weights: vec![crate::lexicon::WeightedKeyword {
            keyword: "bootcamp".to_string(),
            weight: 2.0,
        }],
        ..ScoringTables::default()
    };
    let scorer = AdScorer::new(Arc::new(tables), Arc::new(FixedOracle(positive(0.5)))).unwrap();
    let result = scorer.score(&ad("Free bootcamp", ""), DRAWS).await;
    // "free" carries no weight in the injected table
    assert!((result.marketing.engagement_score - 3.0).abs() < 1e-9);
}
