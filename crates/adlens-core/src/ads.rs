use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Platform an ad was collected from.
///
/// The set is open: platforms without a dedicated variant are carried as
/// [`Platform::Other`] with their display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Google,
    LinkedIn,
    Bing,
    YouTube,
    Other(String),
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Google => "Google",
            Platform::LinkedIn => "LinkedIn",
            Platform::Bing => "Bing",
            Platform::YouTube => "YouTube",
            Platform::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Google" => Platform::Google,
            "LinkedIn" => Platform::LinkedIn,
            "Bing" => Platform::Bing,
            "YouTube" => Platform::YouTube,
            _ => Platform::Other(value),
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        Platform::from(value.to_string())
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        match value {
            Platform::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// One listing returned by a search or content platform.
///
/// `title` and `description` are always present (possibly empty) so that text
/// analysis never has to special-case a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAd {
    pub platform: Platform,
    /// Listing kind, e.g. `Search Ad`, `Shopping Ad`, `Video`.
    pub ad_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    /// Rank on the result page, or `N/A` when the platform does not report one.
    #[serde(default = "not_available")]
    pub position: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub views: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

fn not_available() -> String {
    "N/A".to_string()
}

impl RawAd {
    /// Build an ad with empty text fields and an `N/A` position.
    #[must_use]
    pub fn new(platform: Platform, ad_type: impl Into<String>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            platform,
            ad_type: ad_type.into(),
            title: String::new(),
            description: String::new(),
            link: String::new(),
            position: not_available(),
            channel: None,
            views: None,
            duration: None,
            fetched_at,
        }
    }

    #[must_use]
    pub fn with_text(mut self, title: impl Into<String>, description: impl Into<String>) -> Self {
        self.title = title.into();
        self.description = description.into();
        self
    }

    /// The lower-cased `title + " " + description` every feature extractor reads.
    #[must_use]
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }
}
