use chrono::NaiveDateTime;
use serde::Serialize;
use serpdash_core::{PositionValue, RankingRecord};

use crate::classify::{classify_position, PositionStatus};
use crate::content::has_content;

/// Aggregate counts over the latest observation of every keyword.
///
/// The position buckets partition the total: every latest record lands in
/// exactly one of top-three, first-page (4–10), beyond-first-page (>10),
/// not-ranking, or unknown.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewMetrics {
    pub total_keywords: usize,
    pub top_three: usize,
    pub first_page: usize,
    pub beyond_first_page: usize,
    pub not_ranking: usize,
    pub unknown: usize,
    pub ai_overviews: usize,
    pub markets: Vec<MarketAverage>,
}

/// Average ranked position per market, for the market chart.
#[derive(Debug, Clone, Serialize)]
pub struct MarketAverage {
    pub market: String,
    pub average_position: f64,
    pub ranked_keywords: usize,
}

/// One charted point of a keyword's position history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    pub timestamp: NaiveDateTime,
    pub position: PositionValue,
    pub status: PositionStatus,
}

/// Picks the latest observation per keyword, in first-seen keyword order.
///
/// Latest means greatest parsed timestamp; records without one are skipped
/// for this selection, except that a keyword whose records are all
/// untimestamped falls back to its last row in file order so it still
/// shows up in tables.
#[must_use]
pub fn latest_per_keyword(records: &[RankingRecord]) -> Vec<&RankingRecord> {
    let mut keywords: Vec<&str> = Vec::new();
    for record in records {
        if !keywords.contains(&record.keyword.as_str()) {
            keywords.push(&record.keyword);
        }
    }

    keywords
        .into_iter()
        .filter_map(|keyword| {
            let of_keyword = records.iter().filter(|r| r.keyword == keyword);
            of_keyword
                .clone()
                .filter(|r| r.timestamp.is_some())
                .max_by_key(|r| r.timestamp)
                .or_else(|| of_keyword.last())
        })
        .collect()
}

/// Computes the dashboard overview counts from the latest-per-keyword rows.
#[must_use]
pub fn overview_metrics(latest: &[&RankingRecord]) -> OverviewMetrics {
    let mut metrics = OverviewMetrics {
        total_keywords: latest.len(),
        top_three: 0,
        first_page: 0,
        beyond_first_page: 0,
        not_ranking: 0,
        unknown: 0,
        ai_overviews: 0,
        markets: Vec::new(),
    };

    for record in latest {
        match &record.position {
            PositionValue::Ranked(n) if *n <= 3 => metrics.top_three += 1,
            PositionValue::Ranked(n) if *n <= 10 => metrics.first_page += 1,
            PositionValue::Ranked(_) => metrics.beyond_first_page += 1,
            PositionValue::NotRanking => metrics.not_ranking += 1,
            PositionValue::Other(_) => metrics.unknown += 1,
        }
        if has_content(record.ai_overview.as_deref()) {
            metrics.ai_overviews += 1;
        }
    }

    let mut market_names: Vec<&str> = Vec::new();
    for record in latest {
        if !market_names.contains(&record.market.as_str()) {
            market_names.push(&record.market);
        }
    }
    for market in market_names {
        let ranks: Vec<u32> = latest
            .iter()
            .filter(|r| r.market == market)
            .filter_map(|r| r.position.rank())
            .collect();
        if ranks.is_empty() {
            continue;
        }
        #[allow(clippy::cast_precision_loss)]
        let average_position = f64::from(ranks.iter().sum::<u32>()) / ranks.len() as f64;
        metrics.markets.push(MarketAverage {
            market: market.to_owned(),
            average_position,
            ranked_keywords: ranks.len(),
        });
    }

    metrics
}

/// Chronological position series for one keyword.
///
/// Returns the sorted points plus the count of records excluded for lacking
/// a parseable timestamp — surfaced to the caller, never silently dropped.
#[must_use]
pub fn keyword_history(records: &[RankingRecord], keyword: &str) -> (Vec<HistoryPoint>, usize) {
    let mut excluded = 0usize;
    let mut points: Vec<HistoryPoint> = Vec::new();

    for record in records.iter().filter(|r| r.keyword == keyword) {
        match record.timestamp {
            Some(timestamp) => points.push(HistoryPoint {
                timestamp,
                position: record.position.clone(),
                status: classify_position(&record.position),
            }),
            None => excluded += 1,
        }
    }

    points.sort_by_key(|p| p.timestamp);
    (points, excluded)
}
