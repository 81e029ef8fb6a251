//! Conversion of SerpApi listings into [`RawAd`] records.
//!
//! Each platform keeps a bounded slice of its results so one noisy page cannot
//! dominate a run.

use adlens_core::{Platform, RawAd};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::plan::SearchKind;
use crate::types::{OrganicResult, SearchResponse, ShoppingResult, TextAd, VideoResult};

pub const MAX_SHOPPING_RESULTS: usize = 3;
pub const MAX_LINKEDIN_POSTS: usize = 5;
pub const MAX_BING_ORGANIC: usize = 3;
pub const MAX_VIDEOS: usize = 5;

const NOT_AVAILABLE: &str = "N/A";

/// Dispatches to the normalizer for `kind`.
#[must_use]
pub fn normalize(kind: SearchKind, response: &SearchResponse, fetched_at: DateTime<Utc>) -> Vec<RawAd> {
    match kind {
        SearchKind::GoogleAds => normalize_google(response, fetched_at),
        SearchKind::LinkedInPosts => normalize_linkedin(response, fetched_at),
        SearchKind::BingAds => normalize_bing(response, fetched_at),
        SearchKind::YouTubeVideos => normalize_youtube(response, fetched_at),
    }
}

/// Every text ad, then up to [`MAX_SHOPPING_RESULTS`] shopping listings.
#[must_use]
pub fn normalize_google(response: &SearchResponse, fetched_at: DateTime<Utc>) -> Vec<RawAd> {
    let mut ads: Vec<RawAd> = response
        .ads
        .iter()
        .map(|ad| text_ad(Platform::Google, ad, fetched_at))
        .collect();
    ads.extend(
        response
            .shopping_results
            .iter()
            .take(MAX_SHOPPING_RESULTS)
            .map(|item| shopping_ad(item, fetched_at)),
    );
    ads
}

/// Organic results that link to linkedin.com, capped at [`MAX_LINKEDIN_POSTS`].
#[must_use]
pub fn normalize_linkedin(response: &SearchResponse, fetched_at: DateTime<Utc>) -> Vec<RawAd> {
    response
        .organic_results
        .iter()
        .filter(|r| r.link.as_deref().is_some_and(|l| l.contains("linkedin.com")))
        .take(MAX_LINKEDIN_POSTS)
        .map(|r| organic(Platform::LinkedIn, "Content Post", r, fetched_at))
        .collect()
}

/// Bing text ads; when the page carries none, the top organic results stand in.
#[must_use]
pub fn normalize_bing(response: &SearchResponse, fetched_at: DateTime<Utc>) -> Vec<RawAd> {
    if response.ads.is_empty() {
        return response
            .organic_results
            .iter()
            .take(MAX_BING_ORGANIC)
            .map(|r| organic(Platform::Bing, "Organic Result", r, fetched_at))
            .collect();
    }
    response
        .ads
        .iter()
        .map(|ad| text_ad(Platform::Bing, ad, fetched_at))
        .collect()
}

#[must_use]
pub fn normalize_youtube(response: &SearchResponse, fetched_at: DateTime<Utc>) -> Vec<RawAd> {
    response
        .video_results
        .iter()
        .take(MAX_VIDEOS)
        .map(|v| video(v, fetched_at))
        .collect()
}

fn text_ad(platform: Platform, ad: &TextAd, fetched_at: DateTime<Utc>) -> RawAd {
    let mut raw = RawAd::new(platform, "Search Ad", fetched_at)
        .with_text(text_or_empty(ad.title.as_ref()), text_or_empty(ad.snippet.as_ref()));
    raw.link = text_or_empty(ad.displayed_link.as_ref());
    raw.position = position(ad.position.as_ref());
    raw
}

fn shopping_ad(item: &ShoppingResult, fetched_at: DateTime<Utc>) -> RawAd {
    let price = item.price.as_deref().unwrap_or(NOT_AVAILABLE);
    let snippet = item.snippet.as_deref().unwrap_or_default();
    let mut raw = RawAd::new(Platform::Google, "Shopping Ad", fetched_at).with_text(
        text_or_empty(item.title.as_ref()),
        format!("Price: {price} | {snippet}"),
    );
    raw.link = text_or_empty(item.link.as_ref());
    raw.position = position(item.position.as_ref());
    raw
}

fn organic(
    platform: Platform,
    ad_type: &str,
    result: &OrganicResult,
    fetched_at: DateTime<Utc>,
) -> RawAd {
    let mut raw = RawAd::new(platform, ad_type, fetched_at).with_text(
        text_or_empty(result.title.as_ref()),
        text_or_empty(result.snippet.as_ref()),
    );
    raw.link = text_or_empty(result.link.as_ref());
    raw.position = position(result.position.as_ref());
    raw
}

fn video(v: &VideoResult, fetched_at: DateTime<Utc>) -> RawAd {
    let mut raw = RawAd::new(Platform::YouTube, "Video", fetched_at).with_text(
        text_or_empty(v.title.as_ref()),
        text_or_empty(v.description.as_ref()),
    );
    raw.link = text_or_empty(v.link.as_ref());
    raw.channel = Some(
        v.channel
            .as_ref()
            .and_then(|c| c.name.clone())
            .unwrap_or_default(),
    );
    raw.views = Some(
        v.views
            .as_ref()
            .and_then(value_to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    raw.duration = Some(
        v.length
            .clone()
            .or_else(|| v.duration.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    );
    raw
}

fn text_or_empty(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

fn position(value: Option<&Value>) -> String {
    value
        .and_then(value_to_string)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Strings pass through; numbers are rendered; null and containers are absent.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
