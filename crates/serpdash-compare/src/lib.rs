//! Snapshot comparator for SERP position data.
//!
//! Everything here is a pure function over immutable ranking records: position
//! classification, timestamp recovery, change computation between two
//! observations, per-URL SERP movement tracking, and the comparison CSV
//! export. Data loading and presentation live in sibling crates.

mod change;
mod classify;
mod content;
mod export;
mod metrics;
mod serp;
mod snapshot;
mod timestamp;

pub use change::{compute_change, ChangeCategory, ChangeMagnitude, PositionChange};
pub use classify::{classify_position, PositionStatus, Severity};
pub use content::{has_content, normalize_ai_overview};
pub use metrics::{
    keyword_history, latest_per_keyword, overview_metrics, HistoryPoint, MarketAverage,
    OverviewMetrics,
};
pub use export::{
    read_comparison_csv, write_comparison_csv, ComparisonExportRow, ExportError,
};
pub use serp::{
    diff_serp, display_domain, MovementCategory, MovementCounts, SerpDiff, UrlMovement,
};
pub use snapshot::{
    compare_all, BulkComparison, CompareError, ComparisonSide, KeywordComparison, SnapshotPair,
};
pub use timestamp::parse_timestamp;
