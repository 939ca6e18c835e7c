//! Header-driven parsing of the spreadsheet CSV export into ranking records.
//!
//! Column detection is tolerant: the export's column set varies between
//! source versions, so everything except the keyword column is optional and
//! unknown columns are ignored.

use csv::ReaderBuilder;
use serpdash_compare::{normalize_ai_overview, parse_timestamp};
use serpdash_core::{market_label, parse_sheet_label, PositionValue, RankingRecord, SerpEntry};

use crate::types::LoadSummary;
use crate::SheetsError;

/// Deepest `Position <n>` result column recognized.
const MAX_SERP_COLUMNS: u32 = 10;

#[derive(Debug)]
struct ColumnMap {
    keyword: usize,
    timestamp: Option<usize>,
    /// Tracked-site position: a header named `Position` exactly, or the
    /// first ending in `" Position"` (sources prefix it with the brand).
    position: Option<usize>,
    change_label: Option<usize>,
    ai_flag: Option<usize>,
    ai_text: Option<usize>,
    market: Option<usize>,
    sheet_name: Option<usize>,
    /// `(rank, column index)` pairs for `Position 1..=N`.
    serp: Vec<(u32, usize)>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SheetsError> {
        let find = |names: &[&str]| -> Option<usize> {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        let keyword = find(&["Keyword"])
            .ok_or_else(|| SheetsError::MissingColumn("Keyword".to_owned()))?;

        let position = find(&["Position"]).or_else(|| {
            headers
                .iter()
                .position(|h| h.trim().ends_with(" Position"))
        });

        let mut serp = Vec::new();
        for rank in 1..=MAX_SERP_COLUMNS {
            let name = format!("Position {rank}");
            if let Some(idx) = find(&[name.as_str()]) {
                serp.push((rank, idx));
            }
        }

        Ok(Self {
            keyword,
            timestamp: find(&["Date/Time", "DateTime", "Timestamp", "Date"]),
            position,
            change_label: find(&["Position Change"]),
            ai_flag: find(&["AI Overview"]),
            ai_text: find(&["AIO Links", "AI Overview Content"]),
            market: find(&["Market"]),
            sheet_name: find(&["Sheet_Name", "Sheet Name"]),
            serp,
        })
    }
}

fn cell<'a>(row: &'a csv::StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| row.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses CSV export text into ranking records plus a load summary.
///
/// Rows without a keyword are skipped; rows whose timestamp does not parse
/// are kept (for unordered tables) and counted. Neither aborts the load.
///
/// # Errors
///
/// - [`SheetsError::MissingColumn`] when the export has no `Keyword` column.
/// - [`SheetsError::Csv`] when the text is not valid CSV at all.
pub fn parse_csv(text: &str) -> Result<(Vec<RankingRecord>, LoadSummary), SheetsError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns = ColumnMap::from_headers(&reader.headers()?.clone())?;

    let mut records = Vec::new();
    let mut summary = LoadSummary::default();

    for row in reader.records() {
        let row = row?;
        summary.rows_total += 1;

        let Some(keyword) = cell(&row, Some(columns.keyword)) else {
            summary.rows_missing_keyword += 1;
            continue;
        };

        let timestamp = cell(&row, columns.timestamp).and_then(parse_timestamp);
        if timestamp.is_none() {
            summary.rows_dropped_timestamp += 1;
        }

        let sheet_label = cell(&row, columns.sheet_name).map(parse_sheet_label);
        let market = cell(&row, columns.market).map_or_else(
            || {
                market_label(
                    sheet_label
                        .as_ref()
                        .map_or("us", |label| label.location.as_str()),
                )
            },
            ToOwned::to_owned,
        );

        let serp = columns
            .serp
            .iter()
            .filter_map(|(rank, idx)| {
                cell(&row, Some(*idx)).map(|url| SerpEntry {
                    rank: *rank,
                    url: url.to_owned(),
                })
            })
            .collect();

        records.push(RankingRecord {
            keyword: keyword.to_owned(),
            timestamp,
            market,
            location: sheet_label.as_ref().map(|l| l.location.clone()),
            language: sheet_label.as_ref().map(|l| l.language.clone()),
            position: PositionValue::parse(cell(&row, columns.position)),
            change_label: cell(&row, columns.change_label).map(ToOwned::to_owned),
            serp,
            ai_overview: normalize_ai_overview(
                cell(&row, columns.ai_flag),
                cell(&row, columns.ai_text),
            ),
        });
    }

    tracing::debug!(
        rows_total = summary.rows_total,
        rows_dropped_timestamp = summary.rows_dropped_timestamp,
        rows_missing_keyword = summary.rows_missing_keyword,
        "parsed spreadsheet export"
    );
    Ok((records, summary))
}
