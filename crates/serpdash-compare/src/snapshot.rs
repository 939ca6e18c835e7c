use chrono::NaiveDate;
use serde::Serialize;
use serpdash_core::{PositionValue, RankingRecord, SerpEntry};
use thiserror::Error;

use crate::change::{compute_change, PositionChange};
use crate::classify::{classify_position, PositionStatus};
use crate::content::has_content;
use crate::serp::{diff_serp, SerpDiff};

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("baseline and comparison dates must differ (both {0})")]
    IdenticalDates(NaiveDate),

    #[error("no records for keyword \"{keyword}\" on {date}")]
    EmptySide { keyword: String, date: NaiveDate },
}

/// Two records for one keyword, selected at two caller-chosen dates.
///
/// Built fresh per comparison request and discarded after rendering; borrows
/// from the session dataset and owns nothing.
#[derive(Debug)]
pub struct SnapshotPair<'a> {
    pub keyword: String,
    pub t1: NaiveDate,
    pub t2: NaiveDate,
    pub baseline: &'a RankingRecord,
    pub comparison: &'a RankingRecord,
}

/// One side of an assembled comparison, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonSide {
    pub date: NaiveDate,
    pub position: PositionValue,
    pub status: PositionStatus,
    pub ai_overview_present: bool,
    pub ai_overview: Option<String>,
    pub serp: Vec<SerpEntry>,
}

/// Full comparison output for one keyword between two dates.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordComparison {
    pub keyword: String,
    pub market: String,
    pub baseline: ComparisonSide,
    pub comparison: ComparisonSide,
    /// Tracked-site change, derived; authoritative over any upstream label.
    pub change: PositionChange,
    pub serp_diff: SerpDiff,
}

/// Result of comparing every keyword in a dataset across two dates.
#[derive(Debug, Clone, Serialize)]
pub struct BulkComparison {
    pub comparisons: Vec<KeywordComparison>,
    /// Keywords missing records on one or both dates, in dataset order.
    pub skipped: Vec<String>,
}

impl<'a> SnapshotPair<'a> {
    /// Selects the record pair for `keyword` at `t1` and `t2`.
    ///
    /// When several records share the date, the chronologically earliest is
    /// used. Records without a parsed timestamp never match a date.
    ///
    /// # Errors
    ///
    /// - [`CompareError::IdenticalDates`] when `t1 == t2`.
    /// - [`CompareError::EmptySide`] when either date has no records for
    ///   the keyword. No partial pair is produced.
    pub fn select(
        records: &'a [RankingRecord],
        keyword: &str,
        t1: NaiveDate,
        t2: NaiveDate,
    ) -> Result<Self, CompareError> {
        if t1 == t2 {
            return Err(CompareError::IdenticalDates(t1));
        }

        let side = |date: NaiveDate| -> Result<&'a RankingRecord, CompareError> {
            records
                .iter()
                .filter(|r| r.keyword == keyword && r.timestamp.map(|ts| ts.date()) == Some(date))
                .min_by_key(|r| r.timestamp)
                .ok_or_else(|| CompareError::EmptySide {
                    keyword: keyword.to_owned(),
                    date,
                })
        };

        Ok(Self {
            keyword: keyword.to_owned(),
            t1,
            t2,
            baseline: side(t1)?,
            comparison: side(t2)?,
        })
    }

    /// Assembles the full comparison for this pair.
    #[must_use]
    pub fn compare(&self, target_domain: &str) -> KeywordComparison {
        let change = compute_change(
            self.baseline.position.rank(),
            self.comparison.position.rank(),
        );
        let serp_diff = diff_serp(&self.baseline.serp, &self.comparison.serp, target_domain);

        KeywordComparison {
            keyword: self.keyword.clone(),
            market: self.baseline.market.clone(),
            baseline: build_side(self.baseline, self.t1),
            comparison: build_side(self.comparison, self.t2),
            change,
            serp_diff,
        }
    }
}

fn build_side(record: &RankingRecord, date: NaiveDate) -> ComparisonSide {
    ComparisonSide {
        date,
        position: record.position.clone(),
        status: classify_position(&record.position),
        ai_overview_present: has_content(record.ai_overview.as_deref()),
        ai_overview: record.ai_overview.clone(),
        serp: record.serp.clone(),
    }
}

/// Compares every keyword present in the dataset across `t1`/`t2`.
///
/// Keywords lacking records on either date are skipped and reported rather
/// than failing the whole run; identical dates still reject everything.
///
/// # Errors
///
/// Returns [`CompareError::IdenticalDates`] when `t1 == t2`.
pub fn compare_all(
    records: &[RankingRecord],
    t1: NaiveDate,
    t2: NaiveDate,
    target_domain: &str,
) -> Result<BulkComparison, CompareError> {
    if t1 == t2 {
        return Err(CompareError::IdenticalDates(t1));
    }

    let mut keywords: Vec<&str> = Vec::new();
    for record in records {
        if !keywords.contains(&record.keyword.as_str()) {
            keywords.push(&record.keyword);
        }
    }

    let mut comparisons = Vec::new();
    let mut skipped = Vec::new();
    for keyword in keywords {
        match SnapshotPair::select(records, keyword, t1, t2) {
            Ok(pair) => comparisons.push(pair.compare(target_domain)),
            Err(CompareError::EmptySide { keyword, .. }) => skipped.push(keyword),
            Err(e @ CompareError::IdenticalDates(_)) => return Err(e),
        }
    }

    Ok(BulkComparison {
        comparisons,
        skipped,
    })
}
