use crate::app_config::{AppConfig, Environment, InsightVariant, SentimentMode};
use crate::ConfigError;

pub(crate) const DEFAULT_SENTIMENT_URL: &str =
    "https://api-inference.huggingface.co/models/cardiffnlp/twitter-roberta-base-sentiment-latest";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = or_default("DATABASE_URL", "sqlite://adlens.db");
    let env = parse_environment(&or_default("ADLENS_ENV", "development"));
    let log_level = or_default("ADLENS_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("ADLENS_DB_MAX_CONNECTIONS", "5")?;
    let db_min_connections = parse_u32("ADLENS_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("ADLENS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let serpapi_api_key = optional("SERPAPI_API_KEY");
    let search_location = or_default("ADLENS_SEARCH_LOCATION", "India");
    let source_timeout_secs = parse_u64("ADLENS_SOURCE_TIMEOUT_SECS", "30")?;
    let source_max_retries = parse_u32("ADLENS_SOURCE_MAX_RETRIES", "2")?;
    let source_retry_backoff_base_ms = parse_u64("ADLENS_SOURCE_RETRY_BACKOFF_BASE_MS", "1000")?;

    let sentiment_mode = parse_sentiment_mode(&or_default("ADLENS_SENTIMENT_MODE", "local"))?;
    let sentiment_url = or_default("ADLENS_SENTIMENT_URL", DEFAULT_SENTIMENT_URL);
    let huggingface_token = optional("HUGGINGFACE_TOKEN");

    let gemini_api_key = optional("GEMINI_API_KEY");
    let insight_model = or_default("ADLENS_INSIGHT_MODEL", "gemini-1.5-flash");
    let insight_variant = parse_insight_variant(&or_default("ADLENS_INSIGHT_VARIANT", "labeled"))?;
    let oracle_timeout_secs = parse_u64("ADLENS_ORACLE_TIMEOUT_SECS", "30")?;

    let lexicon_path = optional("ADLENS_LEXICON_PATH").map(PathBuf::from);
    let scoring_concurrency = parse_usize("ADLENS_SCORING_CONCURRENCY", "4")?;
    if scoring_concurrency == 0 {
        return Err(invalid(
            "ADLENS_SCORING_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }
    let report_path = PathBuf::from(or_default("ADLENS_REPORT_PATH", "ad_analysis_report.json"));

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        serpapi_api_key,
        search_location,
        source_timeout_secs,
        source_max_retries,
        source_retry_backoff_base_ms,
        sentiment_mode,
        sentiment_url,
        huggingface_token,
        gemini_api_key,
        insight_model,
        insight_variant,
        oracle_timeout_secs,
        lexicon_path,
        scoring_concurrency,
        report_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_sentiment_mode(s: &str) -> Result<SentimentMode, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "local" => Ok(SentimentMode::Local),
        "remote" => Ok(SentimentMode::Remote),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADLENS_SENTIMENT_MODE".to_string(),
            reason: format!("expected `local` or `remote`, got `{other}`"),
        }),
    }
}

fn parse_insight_variant(s: &str) -> Result<InsightVariant, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "labeled" | "labelled" => Ok(InsightVariant::Labeled),
        "plain" => Ok(InsightVariant::Plain),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ADLENS_INSIGHT_VARIANT".to_string(),
            reason: format!("expected `labeled` or `plain`, got `{other}`"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
