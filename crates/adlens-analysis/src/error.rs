use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sentiment service error: {0}")]
    Sentiment(String),

    #[error("invalid selling-point pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read scoring tables from {path}: {source}")]
    TablesIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scoring tables: {0}")]
    TablesParse(#[from] serde_yaml::Error),

    #[error("invalid scoring tables: {0}")]
    InvalidTables(String),
}
