use serde::Serialize;
use serpdash_core::RankingRecord;

/// Where the session's records came from. Sample data must always be
/// labeled as such wherever it is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Live,
    Sample,
}

impl DataSource {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Live => "Live spreadsheet",
            DataSource::Sample => "Sample data (demo)",
        }
    }
}

/// Row-level diagnostics from one load, surfaced to the user rather than
/// silently dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_total: usize,
    /// Rows kept for unordered tables but excluded from chronological views
    /// because their timestamp did not parse.
    pub rows_dropped_timestamp: usize,
    /// Rows skipped entirely for lack of a keyword.
    pub rows_missing_keyword: usize,
}

/// The in-memory table for one session. Recomputed on every load; nothing
/// here persists.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub records: Vec<RankingRecord>,
    pub source: DataSource,
    pub summary: LoadSummary,
    /// User-visible warning when the live source was unavailable.
    pub warning: Option<String>,
}
