//! HTTP client for the SerpApi search endpoint.
//!
//! One request per [`PlatformSearch`]. Transient failures are retried with
//! back-off; a SerpApi `error` field in the body is surfaced as
//! [`SourceError::Api`] and never retried.

use std::time::Duration;

use adlens_core::{Platform, RawAd};
use chrono::Utc;
use reqwest::{Client, Url};

use crate::error::SourceError;
use crate::normalize::normalize;
use crate::plan::{PlatformSearch, SearchKind, SearchPlan};
use crate::retry::retry_with_backoff;
use crate::types::SearchResponse;

const DEFAULT_BASE_URL: &str = "https://serpapi.com/";

/// A platform whose search failed during [`SerpApiClient::fetch_all`].
#[derive(Debug)]
pub struct FetchFailure {
    pub platform: Platform,
    pub error: SourceError,
}

/// Everything one plan produced: ads in plan order, plus the platforms that
/// were skipped.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub ads: Vec<RawAd>,
    pub failures: Vec<FetchFailure>,
}

pub struct SerpApiClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl SerpApiClient {
    /// Creates a client pointed at the production SerpApi host.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, SourceError> {
        Self::with_base_url(api_key, timeout_secs, max_retries, backoff_base_ms, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SourceError::Api`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("adlens/0.1 (ad-analysis)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SourceError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Runs one search and normalizes its listings.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Api`] if SerpApi reports an error in the body.
    /// - [`SourceError::Http`] on network failure or a non-2xx status once
    ///   retries are exhausted.
    /// - [`SourceError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch(
        &self,
        search: &PlatformSearch,
        location: &str,
    ) -> Result<Vec<RawAd>, SourceError> {
        let url = self.build_url(search, location)?;
        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request(&url)
        })
        .await?;
        let ads = normalize(search.kind, &response, Utc::now());
        tracing::info!(
            platform = %search.kind.platform(),
            query = %search.query,
            count = ads.len(),
            "fetched listings"
        );
        Ok(ads)
    }

    /// Runs every search in the plan in order. A failing platform is logged
    /// and recorded, and the remaining platforms still run.
    pub async fn fetch_all(&self, plan: &SearchPlan) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();
        for search in &plan.searches {
            match self.fetch(search, &plan.location).await {
                Ok(ads) => outcome.ads.extend(ads),
                Err(error) => {
                    let platform = search.kind.platform();
                    tracing::warn!(%platform, error = %error, "platform fetch failed, skipping");
                    outcome.failures.push(FetchFailure { platform, error });
                }
            }
        }
        outcome
    }

    fn build_url(&self, search: &PlatformSearch, location: &str) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join("search.json")
            .map_err(|e| SourceError::Api(format!("invalid search URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("engine", search.kind.engine());
            match search.kind {
                SearchKind::YouTubeVideos => {
                    pairs.append_pair("search_query", &search.query);
                }
                SearchKind::GoogleAds | SearchKind::LinkedInPosts | SearchKind::BingAds => {
                    pairs.append_pair("q", &search.query);
                    pairs.append_pair("location", location);
                }
            }
            pairs.append_pair("api_key", &self.api_key);
        }
        Ok(url)
    }

    async fn request(&self, url: &Url) -> Result<SearchResponse, SourceError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: redact_key(url),
                source: e,
            })?;
        if let Some(message) = parsed.error.clone() {
            return Err(SourceError::Api(message));
        }
        Ok(parsed)
    }
}

/// The request URL with the `api_key` value removed, for error context.
fn redact_key(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "api_key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
