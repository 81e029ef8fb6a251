//! The `analyze` pipeline: fetch, score, persist, summarise, report.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use adlens_analysis::{
    build_sentiment_oracle, summarize, AdScorer, ScoredAd, ScoringDraws, ScoringTables,
    SentimentConfig,
};
use adlens_core::{AnalysisResult, AppConfig, RawAd, SummaryReport};
use adlens_source::{SearchPlan, SerpApiClient};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Default)]
pub(crate) struct AnalyzeArgs {
    pub query: Option<String>,
    pub location: Option<String>,
    pub report: Option<PathBuf>,
    pub seed: Option<u64>,
    pub dry_run: bool,
}

/// Fetch ads for every platform, score them and, unless `dry_run`, persist
/// the batch with its summary and write the JSON report.
///
/// # Errors
///
/// Returns an error if `SERPAPI_API_KEY` is missing, the scorer cannot be
/// built, or a store or report write fails. Individual platform failures are
/// logged and skipped.
pub(crate) async fn run_analyze(config: &AppConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let api_key = config
        .serpapi_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("SERPAPI_API_KEY is not set; cannot fetch ads"))?;
    let client = SerpApiClient::new(
        api_key,
        config.source_timeout_secs,
        config.source_max_retries,
        config.source_retry_backoff_base_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build SerpApi client: {e}"))?;

    let location = args
        .location
        .unwrap_or_else(|| config.search_location.clone());
    let plan = match args.query.as_deref() {
        Some(query) => SearchPlan::for_query(query, location),
        None => SearchPlan::default_for(location),
    };

    let outcome = client.fetch_all(&plan).await;
    if !outcome.failures.is_empty() {
        tracing::warn!(
            failed_platforms = outcome.failures.len(),
            total_platforms = plan.searches.len(),
            "some platforms failed during fetch"
        );
    }
    if outcome.ads.is_empty() {
        println!("no ads fetched; nothing to analyze");
        return Ok(());
    }

    let scorer = build_scorer(config)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut batch = score_batch(&scorer, outcome.ads, &mut rng, config.scoring_concurrency).await;

    if args.dry_run {
        println!("dry-run: scored {} ads, nothing stored", batch.len());
        print_batch(&batch);
        return Ok(());
    }

    let pool = crate::open_store(config).await?;
    for item in &mut batch {
        let (ad_id, _) =
            adlens_db::insert_ad_with_analysis(&pool, &item.ad, &item.analysis, Utc::now())
                .await?;
        item.ad_id = Some(ad_id);
    }
    tracing::info!(count = batch.len(), "stored analysed ads");

    let summary = summarize(&batch);
    adlens_db::insert_summary(&pool, &summary).await?;

    let report_path = args.report.unwrap_or_else(|| config.report_path.clone());
    let method = format!("Rule-based NLP (sentiment: {})", scorer.oracle_name());
    write_report(&report_path, &summary, &method, &batch)?;

    print_summary(&summary);
    println!("report written to {}", report_path.display());
    Ok(())
}

/// Scoring tables from `ADLENS_LEXICON_PATH`, or the built-in ones, wired to
/// the configured sentiment oracle.
pub(crate) fn build_scorer(config: &AppConfig) -> anyhow::Result<AdScorer> {
    let tables = match config.lexicon_path.as_deref() {
        Some(path) => ScoringTables::load(path)?,
        None => ScoringTables::default(),
    };
    let oracle = build_sentiment_oracle(&SentimentConfig::from_app_config(config), &tables)?;
    Ok(AdScorer::new(Arc::new(tables), oracle)?)
}

/// Scores `ads` concurrently, keeping input order. Draws are sampled up front
/// so a seeded `rng` gives the same estimates whatever the concurrency.
pub(crate) async fn score_batch<R: Rng + ?Sized>(
    scorer: &AdScorer,
    ads: Vec<RawAd>,
    rng: &mut R,
    concurrency: usize,
) -> Vec<ScoredAd> {
    let draws: Vec<ScoringDraws> = ads.iter().map(|_| ScoringDraws::sample(&mut *rng)).collect();
    stream::iter(ads.into_iter().zip(draws))
        .map(|(ad, draws)| async move {
            let analysis = scorer.score(&ad, draws).await;
            ScoredAd {
                ad_id: None,
                ad,
                analysis,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

#[derive(Serialize)]
struct RunReport<'a> {
    run_id: Uuid,
    timestamp: DateTime<Utc>,
    total_ads_analyzed: usize,
    analysis_method: &'a str,
    database: &'static str,
    summary: &'a SummaryReport,
    detailed_results: Vec<ReportEntry<'a>>,
}

#[derive(Serialize)]
struct ReportEntry<'a> {
    ad_data: &'a RawAd,
    analysis: &'a AnalysisResult,
    db_id: Option<i64>,
}

/// Writes the pretty-printed run report to `path`.
pub(crate) fn write_report(
    path: &Path,
    summary: &SummaryReport,
    method: &str,
    batch: &[ScoredAd],
) -> anyhow::Result<()> {
    let report = RunReport {
        run_id: summary.run_id,
        timestamp: summary.generated_at,
        total_ads_analyzed: batch.len(),
        analysis_method: method,
        database: "SQLite",
        summary,
        detailed_results: batch
            .iter()
            .map(|item| ReportEntry {
                ad_data: &item.ad,
                analysis: &item.analysis,
                db_id: item.ad_id,
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(path, json)
        .map_err(|e| anyhow::anyhow!("failed to write report {}: {e}", path.display()))?;
    Ok(())
}

fn print_batch(batch: &[ScoredAd]) {
    println!("{:<10}{:<14}{:<8}{:<8}TITLE", "PLATFORM", "TYPE", "SCORE", "CTR%");
    for item in batch {
        println!(
            "{:<10}{:<14}{:<8.1}{:<8.2}{}",
            item.ad.platform.as_str(),
            item.ad.ad_type,
            item.analysis.marketing.engagement_score,
            item.analysis.performance.predicted_ctr_percent,
            item.ad.title
        );
    }
}

fn print_summary(summary: &SummaryReport) {
    println!("analysed {} ads (run {})", summary.total_ads, summary.run_id);
    for entry in &summary.platforms {
        println!("  {:<10}{}", entry.label, entry.count);
    }
    println!(
        "avg engagement {:.2}  avg CTR {:.2}%  avg quality {:.2}",
        summary.avg_engagement, summary.avg_ctr, summary.avg_quality
    );
    if let Some(top) = &summary.top_ad {
        println!(
            "top ad: {} ({}) engagement {:.1}, CTR {:.2}%",
            top.title, top.platform, top.engagement_score, top.predicted_ctr_percent
        );
        if !top.selling_points.is_empty() {
            println!("  selling points: {}", top.selling_points.join(", "));
        }
    }
    if !summary.common_keywords.is_empty() {
        let keywords: Vec<&str> = summary
            .common_keywords
            .iter()
            .map(|k| k.label.as_str())
            .collect();
        println!("common keywords: {}", keywords.join(", "));
    }
    for rec in &summary.top_recommendations {
        println!("  - {} ({} ads)", rec.label, rec.count);
    }
}
