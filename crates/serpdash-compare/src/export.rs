use std::io::{Read, Write};

use thiserror::Error;

use crate::snapshot::KeywordComparison;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed comparison CSV header: {0}")]
    MalformedHeader(String),
}

/// One row of the downloadable comparison export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonExportRow {
    pub keyword: String,
    pub market: String,
    pub position_baseline: String,
    pub position_comparison: String,
    pub change: String,
}

impl From<&KeywordComparison> for ComparisonExportRow {
    fn from(comparison: &KeywordComparison) -> Self {
        Self {
            keyword: comparison.keyword.clone(),
            market: comparison.market.clone(),
            position_baseline: comparison.baseline.status.label.clone(),
            position_comparison: comparison.comparison.status.label.clone(),
            change: comparison.change.description.clone(),
        }
    }
}

/// Writes the comparison CSV with the two date labels in the header row:
/// `Keyword, Market, Position <t1>, Position <t2>, Change`.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] on writer failures.
pub fn write_comparison_csv<W: Write>(
    rows: &[ComparisonExportRow],
    label_baseline: &str,
    label_comparison: &str,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let header_baseline = format!("Position {label_baseline}");
    let header_comparison = format!("Position {label_comparison}");
    csv_writer.write_record([
        "Keyword",
        "Market",
        header_baseline.as_str(),
        header_comparison.as_str(),
        "Change",
    ])?;
    for row in rows {
        csv_writer.write_record([
            &row.keyword,
            &row.market,
            &row.position_baseline,
            &row.position_comparison,
            &row.change,
        ])?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads a comparison CSV back into rows plus the two date labels recovered
/// from the header.
///
/// # Errors
///
/// - [`ExportError::MalformedHeader`] when the header does not carry the
///   expected five columns with `Position <label>` in the middle.
/// - [`ExportError::Csv`] on reader failures.
pub fn read_comparison_csv<R: Read>(
    reader: R,
) -> Result<(String, String, Vec<ComparisonExportRow>), ExportError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.len() != 5 {
        return Err(ExportError::MalformedHeader(format!(
            "expected 5 columns, found {}",
            headers.len()
        )));
    }
    let label = |idx: usize| -> Result<String, ExportError> {
        headers[idx]
            .strip_prefix("Position ")
            .map(ToOwned::to_owned)
            .ok_or_else(|| {
                ExportError::MalformedHeader(format!(
                    "column {} should start with \"Position \", found \"{}\"",
                    idx + 1,
                    &headers[idx]
                ))
            })
    };
    let label_baseline = label(2)?;
    let label_comparison = label(3)?;

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        rows.push(ComparisonExportRow {
            keyword: record.get(0).unwrap_or_default().to_owned(),
            market: record.get(1).unwrap_or_default().to_owned(),
            position_baseline: record.get(2).unwrap_or_default().to_owned(),
            position_comparison: record.get(3).unwrap_or_default().to_owned(),
            change: record.get(4).unwrap_or_default().to_owned(),
        });
    }

    Ok((label_baseline, label_comparison, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ComparisonExportRow> {
        vec![
            ComparisonExportRow {
                keyword: "recarga digi".to_owned(),
                market: "🇪🇸 Spain".to_owned(),
                position_baseline: "#5".to_owned(),
                position_comparison: "#2".to_owned(),
                change: "Improved by 3 positions (#5 → #2)".to_owned(),
            },
            ComparisonExportRow {
                keyword: "buy robux".to_owned(),
                market: "🇵🇭 Philippines".to_owned(),
                position_baseline: "Not Ranking".to_owned(),
                position_comparison: "#8".to_owned(),
                change: "New ranking at #8".to_owned(),
            },
        ]
    }

    #[test]
    fn round_trip_preserves_rows_and_labels() {
        let rows = sample_rows();
        let mut buffer = Vec::new();
        write_comparison_csv(&rows, "2025-07-25", "2025-08-01", &mut buffer).expect("write");

        let (t1, t2, back) = read_comparison_csv(buffer.as_slice()).expect("read");
        assert_eq!(t1, "2025-07-25");
        assert_eq!(t2, "2025-08-01");
        assert_eq!(back, rows);
    }

    #[test]
    fn header_carries_date_labels() {
        let mut buffer = Vec::new();
        write_comparison_csv(&sample_rows(), "2025-07-25", "2025-08-01", &mut buffer)
            .expect("write");
        let text = String::from_utf8(buffer).expect("utf8");
        let header = text.lines().next().expect("header line");
        assert_eq!(
            header,
            "Keyword,Market,Position 2025-07-25,Position 2025-08-01,Change"
        );
    }

    #[test]
    fn malformed_header_rejected() {
        let bad = "Keyword,Market,Before,After,Change\na,b,c,d,e\n";
        let err = read_comparison_csv(bad.as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::MalformedHeader(_)));
    }

    #[test]
    fn change_descriptions_survive_commas_and_arrows() {
        let rows = vec![ComparisonExportRow {
            keyword: "neosurf voucher, prepaid".to_owned(),
            market: "🇦🇺 Australia".to_owned(),
            position_baseline: "#2".to_owned(),
            position_comparison: "#5".to_owned(),
            change: "Declined by 3 positions (#2 → #5)".to_owned(),
        }];
        let mut buffer = Vec::new();
        write_comparison_csv(&rows, "t1", "t2", &mut buffer).expect("write");
        let (_, _, back) = read_comparison_csv(buffer.as_slice()).expect("read");
        assert_eq!(back, rows);
    }
}
