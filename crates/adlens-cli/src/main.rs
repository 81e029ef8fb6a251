mod analyze;
mod insights;
mod maintenance;
mod stats;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adlens-cli")]
#[command(about = "Fetch, score and report on competitor ads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch ads from every platform, score them, store them and write a report
    Analyze {
        /// Search every platform for this query instead of the built-in searches
        #[arg(long)]
        query: Option<String>,
        /// Search location (defaults to ADLENS_SEARCH_LOCATION)
        #[arg(long)]
        location: Option<String>,
        /// Report file path (defaults to ADLENS_REPORT_PATH)
        #[arg(long)]
        report: Option<PathBuf>,
        /// Seed for the randomised impression and CPC estimates
        #[arg(long)]
        seed: Option<u64>,
        /// Fetch and score without touching the database or writing a report
        #[arg(long)]
        dry_run: bool,
    },
    /// Show totals, top performers and per-platform and per-CTA performance
    Stats,
    /// Show the highest-engagement ads
    Top {
        /// Maximum number of ads to show
        #[arg(long, default_value = "10")]
        limit: i64,
    },
    /// Export every analysed ad to CSV
    Export {
        /// Output file
        #[arg(long, default_value = "ad_analysis_results.csv")]
        out: PathBuf,
    },
    /// Copy the database to a timestamped backup file
    Backup {
        /// Directory the backup is written to
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Delete ads (and their analyses) fetched more than N days ago
    Prune {
        #[arg(long)]
        days: u32,
    },
    /// Compare your campaign CSV with a competitor CSV
    Insights {
        /// Your campaign data (.csv)
        #[arg(long)]
        own: PathBuf,
        /// Competitor data (.csv), e.g. an `export` of analysed ads
        #[arg(long)]
        competitor: PathBuf,
        /// Insight format (defaults to ADLENS_INSIGHT_VARIANT)
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    /// Six insights, alternating Positive/Negative
    Labeled,
    /// Five unlabeled insights
    Plain,
}

impl From<VariantArg> for adlens_core::InsightVariant {
    fn from(value: VariantArg) -> Self {
        match value {
            VariantArg::Labeled => adlens_core::InsightVariant::Labeled,
            VariantArg::Plain => adlens_core::InsightVariant::Plain,
        }
    }
}

/// Connect to the configured database and apply pending migrations.
async fn open_store(config: &adlens_core::AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool_config = adlens_db::PoolConfig::from_app_config(config);
    let pool = adlens_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = adlens_db::run_migrations(&pool).await?;
    tracing::debug!(applied, "database ready");
    Ok(pool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = adlens_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            query,
            location,
            report,
            seed,
            dry_run,
        } => {
            let args = analyze::AnalyzeArgs {
                query,
                location,
                report,
                seed,
                dry_run,
            };
            analyze::run_analyze(&config, args).await?;
        }
        Commands::Insights {
            own,
            competitor,
            variant,
        } => {
            insights::run_insights(&config, &own, &competitor, variant.map(Into::into)).await?;
        }
        Commands::Stats => {
            let pool = open_store(&config).await?;
            stats::run_stats(&pool).await?;
        }
        Commands::Top { limit } => {
            let pool = open_store(&config).await?;
            stats::run_top(&pool, limit).await?;
        }
        Commands::Export { out } => {
            let pool = open_store(&config).await?;
            maintenance::run_export(&pool, &out).await?;
        }
        Commands::Backup { dir } => {
            let pool = open_store(&config).await?;
            maintenance::run_backup(&pool, &dir).await?;
        }
        Commands::Prune { days } => {
            let pool = open_store(&config).await?;
            maintenance::run_prune(&pool, days).await?;
        }
    }

    Ok(())
}
