use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serpdash_compare::{
    compare_all, latest_per_keyword, overview_metrics, write_comparison_csv,
    ComparisonExportRow, MovementCategory, SnapshotPair,
};
use serpdash_core::AppConfig;
use serpdash_sheets::load_dataset;

/// Prints the dashboard overview for the configured (or sample) dataset.
pub async fn report(config: &AppConfig) -> anyhow::Result<()> {
    let dataset = load_dataset(config).await;

    println!("Source: {}", dataset.source.label());
    if let Some(warning) = &dataset.warning {
        println!("Warning: {warning}");
    }
    println!(
        "Rows: {} ({} without usable timestamp, {} without keyword)",
        dataset.summary.rows_total,
        dataset.summary.rows_dropped_timestamp,
        dataset.summary.rows_missing_keyword
    );

    let latest = latest_per_keyword(&dataset.records);
    let metrics = overview_metrics(&latest);
    println!();
    println!("Keywords tracked:   {}", metrics.total_keywords);
    println!("Top 3 positions:    {}", metrics.top_three);
    println!("Positions 4-10:     {}", metrics.first_page);
    println!("Beyond first page:  {}", metrics.beyond_first_page);
    println!("Not ranking:        {}", metrics.not_ranking);
    println!("Unknown status:     {}", metrics.unknown);
    println!("AI overviews:       {}", metrics.ai_overviews);

    if !metrics.markets.is_empty() {
        println!();
        println!("Average position by market:");
        for market in &metrics.markets {
            println!(
                "  {:<22} {:>5.1}  ({} ranked)",
                market.market, market.average_position, market.ranked_keywords
            );
        }
    }

    Ok(())
}

/// Prints one keyword's comparison between two dates.
pub async fn compare(
    config: &AppConfig,
    keyword: &str,
    t1: NaiveDate,
    t2: NaiveDate,
) -> anyhow::Result<()> {
    let dataset = load_dataset(config).await;
    if let Some(warning) = &dataset.warning {
        println!("Warning: {warning}");
    }

    let pair = SnapshotPair::select(&dataset.records, keyword, t1, t2)?;
    let comparison = pair.compare(&config.target_domain);

    println!("Keyword: {} ({})", comparison.keyword, comparison.market);
    println!(
        "{t1}: {}   {t2}: {}",
        comparison.baseline.status.label, comparison.comparison.status.label
    );
    println!("Change: {}", comparison.change.description);

    let counts = comparison.serp_diff.counts;
    println!();
    println!(
        "SERP movements: {} improved, {} declined, {} new, {} lost, {} stable",
        counts.improved, counts.declined, counts.new, counts.lost, counts.stable
    );
    for movement in &comparison.serp_diff.movements {
        let ranks = match (movement.rank_before, movement.rank_after) {
            (Some(b), Some(a)) => format!("#{b} → #{a}"),
            (None, Some(a)) => format!("— → #{a}"),
            (Some(b), None) => format!("#{b} → —"),
            (None, None) => "—".to_owned(),
        };
        println!(
            "  {:<9} {:<12} {}{}",
            category_label(movement.category),
            ranks,
            movement.display_domain,
            if movement.is_target { "  [tracked site]" } else { "" }
        );
    }

    println!();
    println!(
        "AI overview: {t1}: {}   {t2}: {}",
        yes_no(comparison.baseline.ai_overview_present),
        yes_no(comparison.comparison.ai_overview_present)
    );

    Ok(())
}

/// Writes the comparison CSV for the given dates to `out`.
pub async fn export(
    config: &AppConfig,
    keyword: Option<&str>,
    t1: NaiveDate,
    t2: NaiveDate,
    out: &Path,
) -> anyhow::Result<()> {
    let dataset = load_dataset(config).await;

    let comparisons = match keyword {
        Some(keyword) => {
            let pair = SnapshotPair::select(&dataset.records, keyword, t1, t2)?;
            vec![pair.compare(&config.target_domain)]
        }
        None => {
            let bulk = compare_all(&dataset.records, t1, t2, &config.target_domain)?;
            if !bulk.skipped.is_empty() {
                println!(
                    "Skipped {} keyword(s) without records on both dates: {}",
                    bulk.skipped.len(),
                    bulk.skipped.join(", ")
                );
            }
            bulk.comparisons
        }
    };

    let rows: Vec<ComparisonExportRow> =
        comparisons.iter().map(ComparisonExportRow::from).collect();
    let file = std::fs::File::create(out)
        .with_context(|| format!("creating export file {}", out.display()))?;
    write_comparison_csv(&rows, &t1.to_string(), &t2.to_string(), file)?;

    println!("Wrote {} comparison row(s) to {}", rows.len(), out.display());
    Ok(())
}

fn category_label(category: MovementCategory) -> &'static str {
    match category {
        MovementCategory::New => "new",
        MovementCategory::Lost => "lost",
        MovementCategory::Improved => "improved",
        MovementCategory::Declined => "declined",
        MovementCategory::Stable => "stable",
    }
}

fn yes_no(present: bool) -> &'static str {
    if present {
        "yes"
    } else {
        "no"
    }
}
