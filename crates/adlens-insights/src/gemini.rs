//! Gemini `generateContent` adapter.

use std::time::Duration;

use adlens_core::InsightVariant;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::InsightError;
use crate::insight::{build_prompt, parse_insights, Insight};
use crate::oracle::{InsightOracle, LocalInsightOracle};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Remote insight oracle.
///
/// Transport failures (network, non-2xx, an unreadable envelope) are logged
/// and answered by the local oracle. A reply whose text breaks the insight
/// contract is returned as [`InsightError::InvalidResponse`].
pub struct GeminiInsightOracle {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    variant: InsightVariant,
    fallback: LocalInsightOracle,
}

impl GeminiInsightOracle {
    /// # Errors
    ///
    /// Returns [`InsightError::Http`] if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        model: &str,
        variant: InsightVariant,
        timeout_secs: u64,
    ) -> Result<Self, InsightError> {
        Self::with_base_url(api_key, model, variant, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Same as [`GeminiInsightOracle::new`] against a custom host (for wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`InsightError::Http`] if the HTTP client cannot be built.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        variant: InsightVariant,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adlens/0.1 (ad-analytics)")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            model: model.to_owned(),
            api_key: api_key.to_owned(),
            variant,
            fallback: LocalInsightOracle::new(variant),
        })
    }

    /// Sends `prompt` and returns the first candidate's text.
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightError::Transport(format!(
                "generateContent returned status {status}"
            )));
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| InsightError::Transport(format!("unreadable response: {}", e.without_url())))?;
        envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| InsightError::Transport("response has no candidates".to_string()))
    }
}

#[async_trait]
impl InsightOracle for GeminiInsightOracle {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn variant(&self) -> InsightVariant {
        self.variant
    }

    async fn compare(
        &self,
        own: &Dataset,
        competitor: &Dataset,
    ) -> Result<Vec<Insight>, InsightError> {
        let prompt = build_prompt(self.variant, own, competitor);
        match self.generate(&prompt).await {
            Ok(raw) => parse_insights(&raw, self.variant).inspect_err(|e| {
                tracing::warn!(error = %e, model = %self.model, "insight response violated contract");
            }),
            Err(e) => {
                tracing::warn!(error = %e, "insight service unavailable, using local insights");
                Ok(self.fallback.compare_datasets(own, competitor))
            }
        }
    }
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
