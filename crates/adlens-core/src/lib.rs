//! Shared domain types and configuration for adlens.

#[macro_use]
mod labels;

pub mod ads;
pub mod analysis;
pub mod app_config;
pub mod config;
pub mod summary;

use thiserror::Error;

pub use ads::{Platform, RawAd};
pub use analysis::{
    AnalysisResult, Audience, BasicMetrics, CompetitiveInsights, CtaStrength, EmotionalTrigger,
    EngagementPotential, KeywordAnalysis, MarketingEffectiveness, PerformancePredictions,
    Positioning, ReadingLevel, SentimentAnalysis, SentimentLabel, SeoPotential, Tone,
    UrgencyLevel,
};
pub use app_config::{AppConfig, Environment, InsightVariant, SentimentMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use labels::ParseLabelError;
pub use summary::{LabelCount, SummaryReport, TopAd};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
