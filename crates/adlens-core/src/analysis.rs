//! The per-ad analysis record and its label sets.

use serde::{Deserialize, Serialize};

labelled_enum! {
    pub enum ReadingLevel {
        Easy => "Easy",
        Medium => "Medium",
        Difficult => "Difficult",
    }
}

labelled_enum! {
    pub enum SentimentLabel {
        Positive => "POSITIVE",
        Negative => "NEGATIVE",
        Neutral => "NEUTRAL",
    }
}

labelled_enum! {
    pub enum Tone {
        Professional => "Professional",
        Friendly => "Friendly",
        Urgent => "Urgent",
        Exciting => "Exciting",
        Neutral => "Neutral",
    }
}

labelled_enum! {
    /// Strength of the call-to-action. `Absent` is displayed as `None`.
    pub enum CtaStrength {
        Strong => "Strong",
        Medium => "Medium",
        Weak => "Weak",
        Absent => "None",
    }
}

labelled_enum! {
    pub enum UrgencyLevel {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

labelled_enum! {
    pub enum EmotionalTrigger {
        Urgency => "urgency",
        SocialProof => "social_proof",
        Achievement => "achievement",
        FearOfMissingOut => "fear_of_missing_out",
        Authority => "authority",
    }
}

labelled_enum! {
    pub enum EngagementPotential {
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

labelled_enum! {
    pub enum Positioning {
        Premium => "Premium",
        Budget => "Budget",
        Mainstream => "Mainstream",
    }
}

labelled_enum! {
    pub enum Audience {
        Beginners => "beginners",
        Professionals => "professionals",
        Students => "students",
        JobSeekers => "job_seekers",
        General => "general",
    }
}

labelled_enum! {
    pub enum SeoPotential {
        High => "high",
        Medium => "medium",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicMetrics {
    pub word_count: usize,
    pub char_count: usize,
    pub reading_level: ReadingLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub label: SentimentLabel,
    /// Oracle confidence, rounded to two places. Not guaranteed to lie in
    /// `[0, 1]` when it comes from the local keyword fallback.
    pub confidence: f64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingEffectiveness {
    /// In `[1.0, 10.0]`, rounded to one place.
    pub engagement_score: f64,
    pub cta_strength: CtaStrength,
    pub urgency_level: UrgencyLevel,
    /// Detected trigger categories in table order, without duplicates.
    pub emotional_triggers: Vec<EmotionalTrigger>,
    /// How many of the detected triggers are authority or social proof.
    pub persuasion_elements: usize,
}

/// Heuristic performance estimates. Impressions and CPC are partly randomized
/// placeholders, not measured platform data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePredictions {
    pub predicted_ctr_percent: f64,
    pub estimated_daily_impressions: u64,
    /// Currency-agnostic cost per click.
    pub estimated_cpc: f64,
    pub quality_score: f64,
    pub engagement_potential: EngagementPotential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveInsights {
    pub positioning: Positioning,
    pub selling_points: Vec<String>,
    pub target_audience: Audience,
    pub competitive_advantages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub primary_keywords: Vec<String>,
    pub keyword_density_percent: f64,
    pub missing_opportunities: Vec<String>,
    pub seo_potential: SeoPotential,
}

/// Scored outcome for exactly one [`crate::RawAd`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub basic_metrics: BasicMetrics,
    pub sentiment: SentimentAnalysis,
    pub marketing: MarketingEffectiveness,
    pub performance: PerformancePredictions,
    pub competitive: CompetitiveInsights,
    pub keywords: KeywordAnalysis,
    /// Ordered advisory strings; never empty.
    pub recommendations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cta_absent_displays_as_none() {
        assert_eq!(CtaStrength::Absent.to_string(), "None");
        assert_eq!("None".parse::<CtaStrength>().unwrap(), CtaStrength::Absent);
    }

    #[test]
    fn labels_serialize_as_display_strings() {
        let json = serde_json::to_string(&EmotionalTrigger::SocialProof).unwrap();
        assert_eq!(json, "\"social_proof\"");
        let json = serde_json::to_string(&SentimentLabel::Positive).unwrap();
        assert_eq!(json, "\"POSITIVE\"");
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Loud".parse::<Tone>().unwrap_err();
        assert_eq!(err.kind, "Tone");
        assert_eq!(err.value, "Loud");
    }

    #[test]
    fn all_lists_variants_in_declaration_order() {
        assert_eq!(
            Audience::ALL,
            &[
                Audience::Beginners,
                Audience::Professionals,
                Audience::Students,
                Audience::JobSeekers,
                Audience::General,
            ]
        );
    }
}
