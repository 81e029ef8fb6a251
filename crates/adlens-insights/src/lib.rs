//! Comparative marketing insights over two CSV datasets.
//!
//! [`InsightOracle`] has two implementations: [`GeminiInsightOracle`] for the
//! hosted model and [`LocalInsightOracle`], the deterministic fallback.

pub mod dataset;
pub mod error;
pub mod gemini;
pub mod insight;
pub mod oracle;

use std::sync::Arc;

use adlens_core::AppConfig;

pub use dataset::{ColumnProfile, Dataset};
pub use error::InsightError;
pub use gemini::GeminiInsightOracle;
pub use insight::{build_prompt, parse_insights, strip_code_fences, Insight, Polarity};
pub use oracle::{InsightOracle, LocalInsightOracle};

/// Gemini when an API key is configured, otherwise the local oracle.
///
/// # Errors
///
/// Returns [`InsightError::Http`] if the Gemini HTTP client cannot be built.
pub fn build_insight_oracle(config: &AppConfig) -> Result<Arc<dyn InsightOracle>, InsightError> {
    match config.gemini_api_key.as_deref() {
        Some(key) => Ok(Arc::new(GeminiInsightOracle::new(
            key,
            &config.insight_model,
            config.insight_variant,
            config.oracle_timeout_secs,
        )?)),
        None => {
            tracing::info!("GEMINI_API_KEY not set, using local insights");
            Ok(Arc::new(LocalInsightOracle::new(config.insight_variant)))
        }
    }
}
