use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which sentiment oracle the scoring engine consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentMode {
    /// Keyword-count classifier, no network.
    Local,
    /// Hosted classifier with the local classifier as fallback.
    Remote,
}

/// Contract the insight oracle is held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightVariant {
    /// Six insights, alternating `Positive: ` / `Negative: ` prefixes.
    Labeled,
    /// Five insights without polarity prefixes.
    Plain,
}

impl InsightVariant {
    /// Exact number of insights a response must contain.
    #[must_use]
    pub fn expected_count(self) -> usize {
        match self {
            InsightVariant::Labeled => 6,
            InsightVariant::Plain => 5,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub serpapi_api_key: Option<String>,
    pub search_location: String,
    pub source_timeout_secs: u64,
    pub source_max_retries: u32,
    pub source_retry_backoff_base_ms: u64,
    pub sentiment_mode: SentimentMode,
    pub sentiment_url: String,
    pub huggingface_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub insight_model: String,
    pub insight_variant: InsightVariant,
    pub oracle_timeout_secs: u64,
    pub lexicon_path: Option<PathBuf>,
    pub scoring_concurrency: usize,
    pub report_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &"[redacted]")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "serpapi_api_key",
                &self.serpapi_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("search_location", &self.search_location)
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("source_max_retries", &self.source_max_retries)
            .field(
                "source_retry_backoff_base_ms",
                &self.source_retry_backoff_base_ms,
            )
            .field("sentiment_mode", &self.sentiment_mode)
            .field("sentiment_url", &self.sentiment_url)
            .field(
                "huggingface_token",
                &self.huggingface_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("insight_model", &self.insight_model)
            .field("insight_variant", &self.insight_variant)
            .field("oracle_timeout_secs", &self.oracle_timeout_secs)
            .field("lexicon_path", &self.lexicon_path)
            .field("scoring_concurrency", &self.scoring_concurrency)
            .field("report_path", &self.report_path)
            .finish()
    }
}
