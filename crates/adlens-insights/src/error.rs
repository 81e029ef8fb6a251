use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightError {
    /// The uploaded dataset was rejected before any processing.
    #[error("invalid dataset {name}: {reason}")]
    InvalidDataset { name: String, reason: String },

    /// The insight service answered, but not in the agreed shape.
    #[error("invalid insight response: {reason}")]
    InvalidResponse { reason: String },

    /// The insight service could not be reached or returned an error status.
    #[error("insight service unavailable: {0}")]
    Transport(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl InsightError {
    pub(crate) fn invalid_response(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }
}
