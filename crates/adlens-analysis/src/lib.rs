//! Ad text analytics for adlens.
//!
//! Turns raw ad copy into a fixed set of heuristic marketing metrics using
//! auditable keyword tables, consults a pluggable sentiment oracle, and
//! aggregates scored batches into summary reports. All performance figures
//! are simulated estimates, not measured platform data.

pub mod error;
pub mod features;
pub mod lexicon;
pub mod report;
pub mod scorer;
pub mod sentiment;

pub use error::AnalysisError;
pub use lexicon::{CategoryRule, PositioningRules, ScoringTables, SentimentLexicon, WeightedKeyword};
pub use report::{summarize, summarize_with, ScoredAd};
pub use scorer::{AdScorer, ScoringDraws};
pub use sentiment::{
    build_sentiment_oracle, LocalSentimentOracle, RemoteSentimentOracle, SentimentConfig,
    SentimentOracle, SentimentReading,
};
