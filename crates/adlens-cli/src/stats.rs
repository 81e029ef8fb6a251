//! Read-only store queries printed as tables.

use sqlx::SqlitePool;

const STATS_TOP_ADS: i64 = 3;

/// Print total ads, the top performers, per-platform and per-CTA performance,
/// and the most recent run summary.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub(crate) async fn run_stats(pool: &SqlitePool) -> anyhow::Result<()> {
    let total = adlens_db::count_ads(pool).await?;
    println!("total ads in database: {total}");
    if total == 0 {
        println!("run `analyze` first");
        return Ok(());
    }

    println!();
    println!("top {STATS_TOP_ADS} by engagement:");
    print_top(&adlens_db::top_performing(pool, STATS_TOP_ADS).await?);

    let platforms = adlens_db::platform_performance(pool).await?;
    println!();
    println!(
        "{:<12}{:<6}{:<12}{:<10}AVG QUALITY",
        "PLATFORM", "ADS", "AVG SCORE", "AVG CTR%"
    );
    for row in &platforms {
        println!(
            "{:<12}{:<6}{:<12.2}{:<10.2}{:.2}",
            row.platform, row.ad_count, row.avg_engagement, row.avg_ctr, row.avg_quality
        );
    }

    let ctas = adlens_db::cta_performance(pool).await?;
    println!();
    println!("{:<12}{:<6}{:<12}AVG CTR%", "CTA", "ADS", "AVG SCORE");
    for row in &ctas {
        println!(
            "{:<12}{:<6}{:<12.2}{:.2}",
            row.cta_strength, row.ad_count, row.avg_engagement, row.avg_ctr
        );
    }

    if let Some(last) = adlens_db::list_summaries(pool, 1).await?.first() {
        println!();
        println!(
            "last run {} at {}: {} ads, avg engagement {:.2}",
            last.run_id,
            last.generated_at.format("%Y-%m-%d %H:%M UTC"),
            last.total_ads,
            last.avg_engagement
        );
    }

    Ok(())
}

/// Print the `limit` highest-engagement ads.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_top(pool: &SqlitePool, limit: i64) -> anyhow::Result<()> {
    let rows = adlens_db::top_performing(pool, limit.max(1)).await?;
    if rows.is_empty() {
        println!("no analysed ads found; run `analyze` first");
        return Ok(());
    }
    print_top(&rows);
    Ok(())
}

fn print_top(rows: &[adlens_db::TopPerformerRow]) {
    println!(
        "{:<6}{:<10}{:<8}{:<8}{:<9}TITLE",
        "ID", "PLATFORM", "SCORE", "CTR%", "QUALITY"
    );
    for row in rows {
        println!(
            "{:<6}{:<10}{:<8.1}{:<8.2}{:<9.1}{}",
            row.ad_id,
            row.platform,
            row.engagement_score,
            row.predicted_ctr,
            row.quality_score,
            truncate(&row.title, 60)
        );
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn short_titles_are_untouched() {
        assert_eq!(truncate("Learn Rust", 60), "Learn Rust");
    }

    #[test]
    fn long_titles_are_cut_on_char_boundaries() {
        let title = "é".repeat(70);
        let cut = truncate(&title, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with("..."));
    }
}
