use serde::{Deserialize, Serialize};
use serpdash_core::PositionValue;

/// Traffic-light severity of a classified position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Warn,
    Bad,
    Unknown,
}

/// Display label plus severity for one position value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionStatus {
    pub label: String,
    pub severity: Severity,
}

/// Classifies a position value into a display label and severity.
///
/// Sentinels are `("Not Ranking", Bad)`. Ranks classify as Good (≤3),
/// Warn (4–10) or Bad (>10) with a `"#<n>"` label. Unrecognized text is
/// passed through verbatim with `Unknown` severity. Total — every input
/// produces a status.
#[must_use]
pub fn classify_position(value: &PositionValue) -> PositionStatus {
    match value {
        PositionValue::NotRanking => PositionStatus {
            label: "Not Ranking".to_owned(),
            severity: Severity::Bad,
        },
        PositionValue::Ranked(n) => {
            let severity = if *n <= 3 {
                Severity::Good
            } else if *n <= 10 {
                Severity::Warn
            } else {
                Severity::Bad
            };
            PositionStatus {
                label: format!("#{n}"),
                severity,
            }
        }
        PositionValue::Other(text) => PositionStatus {
            label: text.clone(),
            severity: Severity::Unknown,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_three_is_good() {
        let status = classify_position(&PositionValue::Ranked(3));
        assert_eq!(status.label, "#3");
        assert_eq!(status.severity, Severity::Good);
    }

    #[test]
    fn first_page_is_warn() {
        assert_eq!(
            classify_position(&PositionValue::Ranked(4)).severity,
            Severity::Warn
        );
        assert_eq!(
            classify_position(&PositionValue::Ranked(10)).severity,
            Severity::Warn
        );
    }

    #[test]
    fn beyond_first_page_is_bad() {
        let status = classify_position(&PositionValue::Ranked(11));
        assert_eq!(status.label, "#11");
        assert_eq!(status.severity, Severity::Bad);
    }

    #[test]
    fn sentinel_is_not_ranking() {
        let status = classify_position(&PositionValue::NotRanking);
        assert_eq!(status.label, "Not Ranking");
        assert_eq!(status.severity, Severity::Bad);
    }

    #[test]
    fn opaque_text_is_unknown_verbatim() {
        let status = classify_position(&PositionValue::Other("pending".to_owned()));
        assert_eq!(status.label, "pending");
        assert_eq!(status.severity, Severity::Unknown);
    }

    #[test]
    fn every_raw_value_classifies() {
        // Total over anything the parser can produce.
        for raw in [None, Some(""), Some("not ranking"), Some("Lost"), Some("7"), Some("abc"), Some("-2"), Some("3.5")] {
            let _ = classify_position(&PositionValue::parse(raw));
        }
    }
}
