//! The `insights` command: compare two CSV datasets.

use std::path::Path;

use adlens_core::{AppConfig, InsightVariant};
use adlens_insights::{build_insight_oracle, Dataset};

/// Load both datasets, ask the configured oracle for insights and print them.
///
/// # Errors
///
/// Returns an error if either file is not a valid CSV dataset, or if the
/// insight service answers outside the agreed format.
pub(crate) async fn run_insights(
    config: &AppConfig,
    own: &Path,
    competitor: &Path,
    variant: Option<InsightVariant>,
) -> anyhow::Result<()> {
    let own = Dataset::from_path(own)?;
    let competitor = Dataset::from_path(competitor)?;

    let mut config = config.clone();
    if let Some(variant) = variant {
        config.insight_variant = variant;
    }
    let oracle = build_insight_oracle(&config)?;
    tracing::info!(
        oracle = oracle.name(),
        own_rows = own.row_count(),
        competitor_rows = competitor.row_count(),
        "generating insights"
    );

    let insights = oracle.compare(&own, &competitor).await?;
    for (index, insight) in insights.iter().enumerate() {
        println!("{}. {insight}", index + 1);
    }
    Ok(())
}
