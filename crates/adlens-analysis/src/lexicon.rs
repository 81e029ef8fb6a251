//! Keyword tables driving every feature extractor.
//!
//! The tables are immutable once built. [`ScoringTables::default`] carries the
//! built-in marketing lexicon; a YAML file may replace any subset of it. Share
//! one instance across scorers with an `Arc`.

use std::path::Path;

use adlens_core::{Audience, CtaStrength, EmotionalTrigger, Tone, UrgencyLevel};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Engagement weight per whitespace-delimited token.
const KEYWORD_WEIGHTS: &[(&str, f64)] = &[
    ("free", 3.0),
    ("certified", 2.8),
    ("professional", 2.5),
    ("expert", 2.4),
    ("guarantee", 2.2),
    ("proven", 2.1),
    ("exclusive", 2.0),
    ("limited", 1.9),
    ("learn", 1.5),
    ("master", 1.7),
    ("complete", 1.6),
    ("comprehensive", 1.5),
    ("practical", 1.4),
    ("hands-on", 1.6),
    ("project", 1.4),
    ("career", 1.8),
    ("start", 1.3),
    ("join", 1.4),
    ("enroll", 1.2),
    ("register", 1.1),
    ("download", 1.2),
    ("access", 1.1),
    ("get", 1.0),
    ("try", 1.3),
];

const URGENCY_TRIGGERS: &[&str] = &[
    "limited time",
    "hurry",
    "deadline",
    "expires",
    "today only",
    "last chance",
    "now",
];
const SOCIAL_PROOF_TRIGGERS: &[&str] = &[
    "trusted",
    "popular",
    "rated",
    "students",
    "professionals",
    "community",
];
const ACHIEVEMENT_TRIGGERS: &[&str] = &["success", "transform", "advance", "boost", "improve", "excel"];
const FOMO_TRIGGERS: &[&str] = &["exclusive", "limited", "special", "only", "rare", "unique"];
const AUTHORITY_TRIGGERS: &[&str] = &[
    "expert",
    "certified",
    "official",
    "accredited",
    "university",
    "industry",
];

const STRONG_CTAS: &[&str] = &[
    "join now",
    "get started",
    "enroll today",
    "register now",
    "start learning",
    "buy now",
];
const MEDIUM_CTAS: &[&str] = &[
    "learn more",
    "discover",
    "explore",
    "find out",
    "see more",
    "view details",
];
const WEAK_CTAS: &[&str] = &["visit", "check", "see", "view", "browse"];

const HIGH_URGENCY: &[&str] = &[
    "deadline",
    "expires",
    "limited time",
    "hurry",
    "last chance",
    "today only",
];
const MEDIUM_URGENCY: &[&str] = &["now", "today", "soon", "quickly", "immediate"];

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "excellent",
    "amazing",
    "best",
    "top",
    "leading",
    "proven",
    "success",
    "expert",
    "professional",
];
const NEGATIVE_WORDS: &[&str] = &[
    "difficult",
    "hard",
    "complex",
    "challenging",
    "struggle",
    "problem",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are", "a",
    "an", "this", "that", "you", "your", "our",
];

const HIGH_VALUE_KEYWORDS: &[&str] = &[
    "certification",
    "job guarantee",
    "placement",
    "internship",
    "mentor",
    "live classes",
    "doubt solving",
    "project based",
    "industry expert",
    "hands on",
    "practical",
    "real world",
];

const PREMIUM_INDICATORS: &[&str] = &[
    "expert",
    "professional",
    "certified",
    "advanced",
    "comprehensive",
];
const BUDGET_INDICATORS: &[&str] = &["free", "affordable", "cheap", "low cost", "budget"];

const BEGINNER_TERMS: &[&str] = &["beginner", "start", "basic", "introduction", "learn from scratch"];
const PROFESSIONAL_TERMS: &[&str] = &["professional", "career", "advance", "experienced", "workplace"];
const STUDENT_TERMS: &[&str] = &["student", "college", "university", "academic", "degree"];
const JOB_SEEKER_TERMS: &[&str] = &["job", "employment", "career change", "placement", "hiring"];

const PROFESSIONAL_TONE: &[&str] = &["professional", "expert", "industry", "certified", "official"];
const FRIENDLY_TONE: &[&str] = &["help", "support", "guide", "assist", "welcome"];
const URGENT_TONE: &[&str] = &["now", "today", "limited", "hurry", "deadline"];
const EXCITING_TONE: &[&str] = &[
    "amazing",
    "incredible",
    "transform",
    "breakthrough",
    "revolutionize",
];

const ADVANTAGES: &[(&str, &[&str])] = &[
    ("Free Content", &["free", "no cost", "without payment"]),
    ("Certification", &["certificate", "certified", "certification"]),
    (
        "Expert Instruction",
        &["expert", "industry professional", "experienced"],
    ),
    (
        "Practical Learning",
        &["hands-on", "practical", "real-world", "projects"],
    ),
    ("Career Support", &["job", "placement", "career", "hiring"]),
    (
        "Flexible Learning",
        &["self-paced", "flexible", "anytime", "anywhere"],
    ),
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "course",
    "learn",
    "training",
    "certification",
    "skill",
    "python",
    "data",
    "science",
];

const SELLING_POINT_PATTERNS: &[&str] = &[
    r"(\d+)\s*(hours?|weeks?|months?)",
    r"(\d+)\s*(projects?|assignments?)",
    r"(certificate|certification)",
    r"(job|placement|career)",
    r"(beginner|advanced|intermediate)",
    r"(practical|hands-on|real-world)",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedKeyword {
    pub keyword: String,
    pub weight: f64,
}

/// A category backed by a list of substring phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule<C> {
    pub category: C,
    pub phrases: Vec<String>,
}

impl<C> CategoryRule<C> {
    fn new(category: C, phrases: &[&str]) -> Self {
        Self {
            category,
            phrases: owned(phrases),
        }
    }

    /// Whether any phrase occurs in `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }

    /// Number of distinct phrases occurring in `text`.
    #[must_use]
    pub fn hits(&self, text: &str) -> usize {
        self.phrases
            .iter()
            .filter(|p| text.contains(p.as_str()))
            .count()
    }
}

/// Word lists for the local sentiment fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self {
            positive: owned(POSITIVE_WORDS),
            negative: owned(NEGATIVE_WORDS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositioningRules {
    pub premium: Vec<String>,
    pub budget: Vec<String>,
}

/// Every table the scoring engine reads. Rule lists are ordered: tiers are
/// tested first to last, and ties between categories go to the earlier rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTables {
    pub keyword_weights: Vec<WeightedKeyword>,
    pub emotional_triggers: Vec<CategoryRule<EmotionalTrigger>>,
    pub cta_tiers: Vec<CategoryRule<CtaStrength>>,
    pub urgency_tiers: Vec<CategoryRule<UrgencyLevel>>,
    pub sentiment: SentimentLexicon,
    pub stop_words: Vec<String>,
    pub high_value_keywords: Vec<String>,
    pub positioning: PositioningRules,
    pub audiences: Vec<CategoryRule<Audience>>,
    pub tones: Vec<CategoryRule<Tone>>,
    pub advantages: Vec<CategoryRule<String>>,
    pub education_keywords: Vec<String>,
    pub selling_point_patterns: Vec<String>,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self {
            keyword_weights: KEYWORD_WEIGHTS
                .iter()
                .map(|&(keyword, weight)| WeightedKeyword {
                    keyword: keyword.to_string(),
                    weight,
                })
                .collect(),
            emotional_triggers: vec![
                CategoryRule::new(EmotionalTrigger::Urgency, URGENCY_TRIGGERS),
                CategoryRule::new(EmotionalTrigger::SocialProof, SOCIAL_PROOF_TRIGGERS),
                CategoryRule::new(EmotionalTrigger::Achievement, ACHIEVEMENT_TRIGGERS),
                CategoryRule::new(EmotionalTrigger::FearOfMissingOut, FOMO_TRIGGERS),
                CategoryRule::new(EmotionalTrigger::Authority, AUTHORITY_TRIGGERS),
            ],
            cta_tiers: vec![
                CategoryRule::new(CtaStrength::Strong, STRONG_CTAS),
                CategoryRule::new(CtaStrength::Medium, MEDIUM_CTAS),
                CategoryRule::new(CtaStrength::Weak, WEAK_CTAS),
            ],
            urgency_tiers: vec![
                CategoryRule::new(UrgencyLevel::High, HIGH_URGENCY),
                CategoryRule::new(UrgencyLevel::Medium, MEDIUM_URGENCY),
            ],
            sentiment: SentimentLexicon::default(),
            stop_words: owned(STOP_WORDS),
            high_value_keywords: owned(HIGH_VALUE_KEYWORDS),
            positioning: PositioningRules {
                premium: owned(PREMIUM_INDICATORS),
                budget: owned(BUDGET_INDICATORS),
            },
            audiences: vec![
                CategoryRule::new(Audience::Beginners, BEGINNER_TERMS),
                CategoryRule::new(Audience::Professionals, PROFESSIONAL_TERMS),
                CategoryRule::new(Audience::Students, STUDENT_TERMS),
                CategoryRule::new(Audience::JobSeekers, JOB_SEEKER_TERMS),
            ],
            tones: vec![
                CategoryRule::new(Tone::Professional, PROFESSIONAL_TONE),
                CategoryRule::new(Tone::Friendly, FRIENDLY_TONE),
                CategoryRule::new(Tone::Urgent, URGENT_TONE),
                CategoryRule::new(Tone::Exciting, EXCITING_TONE),
            ],
            advantages: ADVANTAGES
                .iter()
                .map(|&(name, phrases)| CategoryRule::new(name.to_string(), phrases))
                .collect(),
            education_keywords: owned(EDUCATION_KEYWORDS),
            selling_point_patterns: owned(SELLING_POINT_PATTERNS),
        }
    }
}

impl ScoringTables {
    /// Parse tables from YAML. Keys absent from the document keep their
    /// built-in values.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::TablesParse`] on malformed YAML, or
    /// [`AnalysisError::InvalidTables`] if a keyword weight is negative or
    /// not finite.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, AnalysisError> {
        let tables: ScoringTables = serde_yaml::from_str(yaml)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load tables from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::TablesIo`] if the file cannot be read, plus
    /// everything [`ScoringTables::from_yaml_str`] returns.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|e| AnalysisError::TablesIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Weight for an exact token, if the token is in the table.
    #[must_use]
    pub fn weight_of(&self, token: &str) -> Option<f64> {
        self.keyword_weights
            .iter()
            .find(|w| w.keyword == token)
            .map(|w| w.weight)
    }

    #[must_use]
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.iter().any(|s| s == word)
    }

    // Engagement starts at 1.0 and only ever adds weights, so a negative
    // weight would break its lower bound.
    fn validate(&self) -> Result<(), AnalysisError> {
        if let Some(bad) = self
            .keyword_weights
            .iter()
            .find(|w| !w.weight.is_finite() || w.weight < 0.0)
        {
            return Err(AnalysisError::InvalidTables(format!(
                "keyword {:?} has weight {}; weights must be finite and non-negative",
                bad.keyword, bad.weight
            )));
        }
        Ok(())
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
