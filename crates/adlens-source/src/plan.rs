//! Which searches to run, per platform.

use adlens_core::Platform;

const DEFAULT_COURSE_QUERY: &str = "online python course";
const DEFAULT_LINKEDIN_QUERY: &str = "site:linkedin.com data science certification";
const DEFAULT_BING_QUERY: &str = "online course programming";

/// The listing shape a search yields, which fixes the SerpApi engine and the
/// normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    /// Google text ads plus the first shopping results.
    GoogleAds,
    /// Google organic results restricted to linkedin.com links.
    LinkedInPosts,
    /// Bing text ads, or the first organic results when there are none.
    BingAds,
    /// YouTube video results.
    YouTubeVideos,
}

impl SearchKind {
    #[must_use]
    pub fn engine(self) -> &'static str {
        match self {
            SearchKind::GoogleAds | SearchKind::LinkedInPosts => "google",
            SearchKind::BingAds => "bing",
            SearchKind::YouTubeVideos => "youtube",
        }
    }

    #[must_use]
    pub fn platform(self) -> Platform {
        match self {
            SearchKind::GoogleAds => Platform::Google,
            SearchKind::LinkedInPosts => Platform::LinkedIn,
            SearchKind::BingAds => Platform::Bing,
            SearchKind::YouTubeVideos => Platform::YouTube,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSearch {
    pub kind: SearchKind,
    pub query: String,
}

impl PlatformSearch {
    #[must_use]
    pub fn new(kind: SearchKind, query: impl Into<String>) -> Self {
        Self {
            kind,
            query: query.into(),
        }
    }
}

/// An ordered set of searches sharing one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPlan {
    pub location: String,
    pub searches: Vec<PlatformSearch>,
}

impl SearchPlan {
    /// The four built-in platform searches.
    #[must_use]
    pub fn default_for(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            searches: vec![
                PlatformSearch::new(SearchKind::GoogleAds, DEFAULT_COURSE_QUERY),
                PlatformSearch::new(SearchKind::LinkedInPosts, DEFAULT_LINKEDIN_QUERY),
                PlatformSearch::new(SearchKind::BingAds, DEFAULT_BING_QUERY),
                PlatformSearch::new(SearchKind::YouTubeVideos, DEFAULT_COURSE_QUERY),
            ],
        }
    }

    /// One query on every platform. The LinkedIn search is scoped with a
    /// `site:linkedin.com` prefix.
    #[must_use]
    pub fn for_query(query: &str, location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            searches: vec![
                PlatformSearch::new(SearchKind::GoogleAds, query),
                PlatformSearch::new(SearchKind::LinkedInPosts, format!("site:linkedin.com {query}")),
                PlatformSearch::new(SearchKind::BingAds, query),
                PlatformSearch::new(SearchKind::YouTubeVideos, query),
            ],
        }
    }
}
