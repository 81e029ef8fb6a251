//! Export, backup and retention commands.

use std::path::Path;

use chrono::{Duration, Utc};
use sqlx::SqlitePool;

/// # Errors
///
/// Returns an error if the query or the file write fails.
pub(crate) async fn run_export(pool: &SqlitePool, out: &Path) -> anyhow::Result<()> {
    let rows = adlens_db::export_csv(pool, out).await?;
    println!("exported {rows} ads to {}", out.display());
    Ok(())
}

/// # Errors
///
/// Returns an error if the backup directory cannot be created or
/// `VACUUM INTO` fails.
pub(crate) async fn run_backup(pool: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let path = adlens_db::backup_database(pool, dir).await?;
    println!("database backed up to {}", path.display());
    Ok(())
}

/// Delete ads fetched more than `days` days ago, with their analyses.
///
/// # Errors
///
/// Returns an error if the purge transaction fails.
pub(crate) async fn run_prune(pool: &SqlitePool, days: u32) -> anyhow::Result<()> {
    let cutoff = Utc::now() - Duration::days(i64::from(days));
    let deleted = adlens_db::purge_older_than(pool, cutoff).await?;
    tracing::info!(deleted, %cutoff, "pruned old ads");
    println!("deleted {deleted} ads fetched before {}", cutoff.format("%Y-%m-%d"));
    Ok(())
}
