//! On-demand artifacts: CSV export, database backup and retention purge.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::ads::AdRow;
use crate::analysis::{AnalysisRow, ANALYSIS_COLUMNS};
use crate::DbError;

/// Header of the joined ads × analyses export, one label per column.
pub const CSV_HEADER: [&str; 34] = [
    "ID",
    "Timestamp",
    "Platform",
    "Ad Type",
    "Title",
    "Description",
    "Link",
    "Position",
    "Channel",
    "Views",
    "Duration",
    "Word Count",
    "Char Count",
    "Reading Level",
    "Sentiment",
    "Sentiment Confidence",
    "Emotional Tone",
    "Engagement Score",
    "CTA Strength",
    "Urgency Level",
    "Emotional Triggers",
    "Predicted CTR",
    "Estimated Daily Impressions",
    "Estimated CPC",
    "Quality Score",
    "Engagement Potential",
    "Positioning Strategy",
    "Target Audience",
    "Key Selling Points",
    "Competitive Advantages",
    "Primary Keywords",
    "Keyword Density",
    "Missing Opportunities",
    "Optimization Recommendations",
];

#[derive(Debug, sqlx::FromRow)]
struct ExportRow {
    #[sqlx(flatten)]
    ad: AdRow,
    #[sqlx(flatten)]
    analysis: AnalysisRow,
}

impl ExportRow {
    fn fields(&self) -> [String; 34] {
        let ad = &self.ad;
        let ar = &self.analysis;
        [
            ad.id.to_string(),
            ad.fetched_at.to_rfc3339(),
            ad.platform.clone(),
            ad.ad_type.clone(),
            ad.title.clone(),
            ad.description.clone(),
            ad.link.clone(),
            ad.position.clone(),
            ad.channel.clone().unwrap_or_default(),
            ad.views.clone().unwrap_or_default(),
            ad.duration.clone().unwrap_or_default(),
            ar.word_count.to_string(),
            ar.char_count.to_string(),
            ar.reading_level.clone(),
            ar.sentiment.clone(),
            ar.sentiment_confidence.to_string(),
            ar.emotional_tone.clone(),
            ar.engagement_score.to_string(),
            ar.cta_strength.clone(),
            ar.urgency_level.clone(),
            ar.emotional_triggers.clone(),
            ar.predicted_ctr.to_string(),
            ar.estimated_daily_impressions.to_string(),
            ar.estimated_cpc.to_string(),
            ar.quality_score.to_string(),
            ar.engagement_potential.clone(),
            ar.positioning_strategy.clone(),
            ar.target_audience.clone(),
            ar.key_selling_points.clone(),
            ar.competitive_advantages.clone(),
            ar.primary_keywords.clone(),
            ar.keyword_density.to_string(),
            ar.missing_opportunities.clone(),
            ar.optimization_recommendations.clone(),
        ]
    }
}

/// Quote a field when it contains a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    line.push_str("\r\n");
    line
}

/// Write every analysed ad as CSV, highest engagement first. Returns the
/// number of data rows written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails or [`DbError::Io`] if the
/// writer fails.
pub async fn write_csv<W: Write>(pool: &SqlitePool, mut writer: W) -> Result<usize, DbError> {
    let sql = format!(
        "SELECT a.id, a.fetched_at, a.platform, a.ad_type, a.title, a.description, a.link, \
                a.position, a.channel, a.views, a.duration, {ANALYSIS_COLUMNS} \
         FROM ads a \
         JOIN analysis_results ar ON a.id = ar.ad_id \
         ORDER BY ar.engagement_score DESC, a.id ASC"
    );
    let rows = sqlx::query_as::<_, ExportRow>(&sql).fetch_all(pool).await?;

    let io_err = |e| DbError::Io {
        path: "<csv writer>".to_string(),
        source: e,
    };
    writer
        .write_all(csv_line(&CSV_HEADER).as_bytes())
        .map_err(io_err)?;
    for row in &rows {
        writer
            .write_all(csv_line(&row.fields()).as_bytes())
            .map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(rows.len())
}

/// Export to a CSV file at `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`DbError::Io`] if the file cannot be created, plus everything
/// [`write_csv`] returns.
pub async fn export_csv(pool: &SqlitePool, path: &Path) -> Result<usize, DbError> {
    let file = std::fs::File::create(path).map_err(|e| DbError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let written = write_csv(pool, std::io::BufWriter::new(file)).await?;
    tracing::info!(rows = written, path = %path.display(), "CSV export written");
    Ok(written)
}

/// Snapshot the whole database into
/// `dir/ad_analysis_backup_YYYYMMDD_HHMMSS.db` and return that path.
///
/// # Errors
///
/// Returns [`DbError::Io`] if `dir` cannot be created or no snapshot file
/// was written (an in-memory database accepts `VACUUM INTO` without
/// producing one), or [`DbError::Sqlx`] if the snapshot fails (for example
/// because the target file already exists).
pub async fn backup_database(pool: &SqlitePool, dir: &Path) -> Result<PathBuf, DbError> {
    std::fs::create_dir_all(dir).map_err(|e| DbError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;
    let path = dir.join(backup_file_name(Utc::now()));
    sqlx::query("VACUUM INTO ?")
        .bind(path.to_string_lossy().into_owned())
        .execute(pool)
        .await?;
    if !path.exists() {
        return Err(DbError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "snapshot produced no file",
            ),
        });
    }
    tracing::info!(path = %path.display(), "database backed up");
    Ok(path)
}

fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("ad_analysis_backup_{}.db", now.format("%Y%m%d_%H%M%S"))
}

/// Delete ads fetched before `cutoff` together with their analyses, in one
/// transaction. Returns the number of ads deleted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either delete fails; nothing is deleted then.
pub async fn purge_older_than(pool: &SqlitePool, cutoff: DateTime<Utc>) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    let analyses = sqlx::query(
        "DELETE FROM analysis_results \
         WHERE ad_id IN (SELECT id FROM ads WHERE fetched_at < ?)",
    )
    .bind(cutoff)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    let ads = sqlx::query("DELETE FROM ads WHERE fetched_at < ?")
        .bind(cutoff)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    tracing::info!(ads, analyses, cutoff = %cutoff, "purged old records");
    Ok(ads)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn header_has_thirty_four_columns() {
        assert_eq!(CSV_HEADER.len(), 34);
        assert_eq!(CSV_HEADER[0], "ID");
        assert_eq!(CSV_HEADER[33], "Optimization Recommendations");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn backup_name_is_timestamped() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(backup_file_name(now), "ad_analysis_backup_20240309_070501.db");
    }
}
