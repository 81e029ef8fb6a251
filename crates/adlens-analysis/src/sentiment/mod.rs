//! Pluggable sentiment oracle.
//!
//! Two implementations share the [`SentimentOracle`] trait: a deterministic
//! keyword classifier ([`LocalSentimentOracle`]) and a hosted classifier
//! ([`RemoteSentimentOracle`]) that degrades to the local one on any failure.
//! Neither ever returns an error from `classify`.

mod local;
mod remote;

use std::sync::Arc;

use adlens_core::{AppConfig, SentimentLabel, SentimentMode};
use async_trait::async_trait;

use crate::error::AnalysisError;
use crate::lexicon::ScoringTables;

pub use local::LocalSentimentOracle;
pub use remote::RemoteSentimentOracle;

/// Label and score returned by an oracle.
///
/// `score` is nominally in `[0, 1]` but the local fallback can leave that
/// range when one word list dominates heavily. Use
/// [`SentimentReading::bounded_confidence`] where a bounded value is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentReading {
    pub label: SentimentLabel,
    pub score: f64,
}

impl SentimentReading {
    #[must_use]
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        Self { label, score }
    }

    /// `score` clamped to `[0, 1]`.
    #[must_use]
    pub fn bounded_confidence(&self) -> f64 {
        self.score.clamp(0.0, 1.0)
    }
}

#[async_trait]
pub trait SentimentOracle: Send + Sync {
    /// Short identifier recorded in reports, e.g. `"local"`.
    fn name(&self) -> &'static str;

    /// Classify `text`. Must tolerate empty input and never fail.
    async fn classify(&self, text: &str) -> SentimentReading;
}

/// Settings for choosing and building a sentiment oracle.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub mode: SentimentMode,
    pub url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl SentimentConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            mode: config.sentiment_mode,
            url: config.sentiment_url.clone(),
            token: config.huggingface_token.clone(),
            timeout_secs: config.oracle_timeout_secs,
        }
    }
}

/// Build the oracle selected by `config`.
///
/// Remote mode without a token falls back to the local oracle with a warning.
///
/// # Errors
///
/// Returns [`AnalysisError::Http`] if the HTTP client for the remote oracle
/// cannot be constructed.
pub fn build_sentiment_oracle(
    config: &SentimentConfig,
    tables: &ScoringTables,
) -> Result<Arc<dyn SentimentOracle>, AnalysisError> {
    let local = LocalSentimentOracle::new(tables.sentiment.clone());
    match (config.mode, config.token.as_deref()) {
        (SentimentMode::Local, _) => Ok(Arc::new(local)),
        (SentimentMode::Remote, None) => {
            tracing::warn!(
                "remote sentiment requested without HUGGINGFACE_TOKEN; using local classifier"
            );
            Ok(Arc::new(local))
        }
        (SentimentMode::Remote, Some(token)) => Ok(Arc::new(RemoteSentimentOracle::new(
            &config.url,
            token,
            config.timeout_secs,
            local,
        )?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: SentimentMode, token: Option<&str>) -> SentimentConfig {
        SentimentConfig {
            mode,
            url: "http://localhost:9".to_string(),
            token: token.map(str::to_string),
            timeout_secs: 5,
        }
    }

    #[test]
    fn bounded_confidence_clamps_both_ends() {
        let high = SentimentReading::new(SentimentLabel::Positive, 1.4);
        let low = SentimentReading::new(SentimentLabel::Negative, -0.2);
        let mid = SentimentReading::new(SentimentLabel::Neutral, 0.5);
        assert!((high.bounded_confidence() - 1.0).abs() < f64::EPSILON);
        assert!(low.bounded_confidence().abs() < f64::EPSILON);
        assert!((mid.bounded_confidence() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn local_mode_builds_local_oracle() {
        let oracle =
            build_sentiment_oracle(&config(SentimentMode::Local, Some("t")), &ScoringTables::default())
                .unwrap();
        assert_eq!(oracle.name(), "local");
    }

    #[test]
    fn remote_mode_without_token_degrades_to_local() {
        let oracle =
            build_sentiment_oracle(&config(SentimentMode::Remote, None), &ScoringTables::default())
                .unwrap();
        assert_eq!(oracle.name(), "local");
    }

    #[test]
    fn remote_mode_with_token_builds_remote_oracle() {
        let oracle =
            build_sentiment_oracle(&config(SentimentMode::Remote, Some("hf_x")), &ScoringTables::default())
                .unwrap();
        assert_eq!(oracle.name(), "huggingface");
    }
}
