//! Hosted sentiment classifier (Hugging Face inference API).

use std::time::Duration;

use adlens_core::SentimentLabel;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{LocalSentimentOracle, SentimentOracle, SentimentReading};
use crate::error::AnalysisError;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// The endpoint answers either a flat list or a list nested once per input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

/// Remote classifier that never fails: every error path logs a warning and
/// returns the local classification instead.
pub struct RemoteSentimentOracle {
    client: Client,
    url: String,
    token: String,
    fallback: LocalSentimentOracle,
}

impl RemoteSentimentOracle {
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the HTTP client cannot be built.
    pub fn new(
        url: &str,
        token: &str,
        timeout_secs: u64,
        fallback: LocalSentimentOracle,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adlens/0.1 (ad-analytics)")
            .build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
            token: token.to_owned(),
            fallback,
        })
    }

    async fn classify_remote(&self, text: &str) -> Result<SentimentReading, AnalysisError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalysisError::Sentiment(format!(
                "classifier returned status {}",
                response.status()
            )));
        }

        let body: ClassifyResponse = response.json().await?;
        let candidates = match body {
            ClassifyResponse::Nested(mut lists) => {
                if lists.is_empty() {
                    Vec::new()
                } else {
                    lists.swap_remove(0)
                }
            }
            ClassifyResponse::Flat(list) => list,
        };

        candidates
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .map(|best| SentimentReading::new(map_label(&best.label), best.score))
            .ok_or_else(|| AnalysisError::Sentiment("classifier returned no labels".to_string()))
    }
}

/// Map a classifier label onto the three-way label set. Three-class models
/// that emit `LABEL_0..2` use negative, neutral, positive in that order.
fn map_label(raw: &str) -> SentimentLabel {
    match raw.to_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_2" => SentimentLabel::Positive,
        "NEGATIVE" | "NEG" | "LABEL_0" => SentimentLabel::Negative,
        _ => SentimentLabel::Neutral,
    }
}

#[async_trait]
impl SentimentOracle for RemoteSentimentOracle {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn classify(&self, text: &str) -> SentimentReading {
        if text.trim().is_empty() {
            return self.fallback.classify_text(text);
        }
        match self.classify_remote(text).await {
            Ok(reading) => reading,
            Err(e) => {
                tracing::warn!(error = %e, "remote sentiment failed; using local classifier");
                self.fallback.classify_text(text)
            }
        }
    }
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;
