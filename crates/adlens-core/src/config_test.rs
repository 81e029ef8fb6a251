use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_unknown_defaults_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();

    assert_eq!(cfg.database_url, "sqlite://adlens.db");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.db_max_connections, 5);
    assert_eq!(cfg.db_min_connections, 1);
    assert_eq!(cfg.db_acquire_timeout_secs, 10);
    assert!(cfg.serpapi_api_key.is_none());
    assert_eq!(cfg.search_location, "India");
    assert_eq!(cfg.source_timeout_secs, 30);
    assert_eq!(cfg.source_max_retries, 2);
    assert_eq!(cfg.source_retry_backoff_base_ms, 1000);
    assert_eq!(cfg.sentiment_mode, SentimentMode::Local);
    assert_eq!(cfg.sentiment_url, DEFAULT_SENTIMENT_URL);
    assert!(cfg.huggingface_token.is_none());
    assert!(cfg.gemini_api_key.is_none());
    assert_eq!(cfg.insight_model, "gemini-1.5-flash");
    assert_eq!(cfg.insight_variant, InsightVariant::Labeled);
    assert_eq!(cfg.oracle_timeout_secs, 30);
    assert!(cfg.lexicon_path.is_none());
    assert_eq!(cfg.scoring_concurrency, 4);
    assert_eq!(cfg.report_path, PathBuf::from("ad_analysis_report.json"));
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite::memory:");
    map.insert("ADLENS_ENV", "production");
    map.insert("SERPAPI_API_KEY", "serp-key");
    map.insert("ADLENS_SENTIMENT_MODE", "Remote");
    map.insert("HUGGINGFACE_TOKEN", "hf-token");
    map.insert("ADLENS_INSIGHT_VARIANT", "plain");
    map.insert("ADLENS_LEXICON_PATH", "./config/lexicon.yaml");
    map.insert("ADLENS_SCORING_CONCURRENCY", "8");

    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.database_url, "sqlite::memory:");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.serpapi_api_key.as_deref(), Some("serp-key"));
    assert_eq!(cfg.sentiment_mode, SentimentMode::Remote);
    assert_eq!(cfg.huggingface_token.as_deref(), Some("hf-token"));
    assert_eq!(cfg.insight_variant, InsightVariant::Plain);
    assert_eq!(
        cfg.lexicon_path,
        Some(PathBuf::from("./config/lexicon.yaml"))
    );
    assert_eq!(cfg.scoring_concurrency, 8);
}

#[test]
fn blank_optional_secrets_are_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.gemini_api_key.is_none());
}

#[test]
fn build_app_config_rejects_unknown_sentiment_mode() {
    let mut map = HashMap::new();
    map.insert("ADLENS_SENTIMENT_MODE", "psychic");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_SENTIMENT_MODE"),
        "expected InvalidEnvVar(ADLENS_SENTIMENT_MODE), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_unknown_insight_variant() {
    let mut map = HashMap::new();
    map.insert("ADLENS_INSIGHT_VARIANT", "verbose");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_INSIGHT_VARIANT"),
        "expected InvalidEnvVar(ADLENS_INSIGHT_VARIANT), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("ADLENS_ORACLE_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_ORACLE_TIMEOUT_SECS"),
        "expected InvalidEnvVar(ADLENS_ORACLE_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_concurrency() {
    let mut map = HashMap::new();
    map.insert("ADLENS_SCORING_CONCURRENCY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "ADLENS_SCORING_CONCURRENCY"),
        "expected InvalidEnvVar(ADLENS_SCORING_CONCURRENCY), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_secrets() {
    let mut map = HashMap::new();
    map.insert("DATABASE_URL", "sqlite://secret-path.db");
    map.insert("GEMINI_API_KEY", "gemini-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("gemini-secret"));
    assert!(!rendered.contains("secret-path"));
    assert!(rendered.contains("[redacted]"));
}
