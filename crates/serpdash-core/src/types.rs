use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The tracked site's rank cell, as found in the source spreadsheet.
///
/// A cell is either a positive integer rank, a recognized "not in the
/// results" sentinel, or arbitrary text that is preserved verbatim for
/// display and treated as unknown everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PositionValue {
    Ranked(u32),
    NotRanking,
    Other(String),
}

impl PositionValue {
    /// Parses a raw cell into a `PositionValue`.
    ///
    /// `None`, empty, and (case-insensitively) `"not ranking"` / `"lost"`
    /// map to [`PositionValue::NotRanking`]. Numeric text maps to
    /// [`PositionValue::Ranked`]; a fractional suffix like `"3.0"` is
    /// accepted since spreadsheets export integers that way. Anything else
    /// is carried as [`PositionValue::Other`].
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return PositionValue::NotRanking;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return PositionValue::NotRanking;
        }
        let lower = trimmed.to_lowercase();
        if lower == "not ranking" || lower == "lost" {
            return PositionValue::NotRanking;
        }
        if let Ok(n) = trimmed.parse::<u32>() {
            if n > 0 {
                return PositionValue::Ranked(n);
            }
        }
        // Spreadsheet exports sometimes render integer cells as "7.0".
        if let Ok(f) = trimmed.parse::<f64>() {
            if f > 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                return PositionValue::Ranked(f as u32);
            }
        }
        PositionValue::Other(trimmed.to_owned())
    }

    /// The numeric rank, if this value is an actual ranking.
    ///
    /// Sentinels and unknown text both yield `None`; this is the
    /// normalization every change computation starts from.
    #[must_use]
    pub fn rank(&self) -> Option<u32> {
        match self {
            PositionValue::Ranked(n) => Some(*n),
            PositionValue::NotRanking | PositionValue::Other(_) => None,
        }
    }
}

/// One ranked result URL within a SERP snapshot, 1-indexed by rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpEntry {
    pub rank: u32,
    pub url: String,
}

/// One observation of a keyword's search position at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRecord {
    pub keyword: String,
    /// `None` when the source timestamp could not be parsed; such records
    /// stay in unordered tables but are excluded from chronological use.
    pub timestamp: Option<NaiveDateTime>,
    /// Display label derived from the location code, e.g. `"🇪🇸 Spain"`.
    pub market: String,
    pub location: Option<String>,
    pub language: Option<String>,
    pub position: PositionValue,
    /// Upstream free-text change label. Display hint only; the derived
    /// change computation is authoritative.
    pub change_label: Option<String>,
    pub serp: Vec<SerpEntry>,
    /// Normalized AI-overview content; `Some` iff an overview is present.
    pub ai_overview: Option<String>,
}
