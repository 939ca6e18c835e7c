use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Signed magnitude of a position change.
///
/// `New` and `Lost` stand in for the infinite magnitudes: entering the
/// results is always the best outcome, dropping out always the worst, and
/// no finite delta ever compares equal to either. The derived order is
/// `Lost < Delta(d) < New`, with finite deltas ordered by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "positions", rename_all = "snake_case")]
pub enum ChangeMagnitude {
    Lost,
    Delta(i64),
    New,
}

impl Ord for ChangeMagnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        use ChangeMagnitude::{Delta, Lost, New};
        match (self, other) {
            (Lost, Lost) | (New, New) => Ordering::Equal,
            (Lost, _) | (_, New) => Ordering::Less,
            (New, _) | (_, Lost) => Ordering::Greater,
            (Delta(a), Delta(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for ChangeMagnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Four-way partition used by aggregate counts. Zero deltas fall outside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCategory {
    New,
    Lost,
    Improved,
    Declined,
}

impl ChangeMagnitude {
    /// The aggregation bucket for this magnitude, or `None` for no change.
    ///
    /// Improved/declined cover only the finite, nonzero deltas.
    #[must_use]
    pub fn category(&self) -> Option<ChangeCategory> {
        match self {
            ChangeMagnitude::New => Some(ChangeCategory::New),
            ChangeMagnitude::Lost => Some(ChangeCategory::Lost),
            ChangeMagnitude::Delta(d) if *d > 0 => Some(ChangeCategory::Improved),
            ChangeMagnitude::Delta(d) if *d < 0 => Some(ChangeCategory::Declined),
            ChangeMagnitude::Delta(_) => None,
        }
    }
}

/// A computed change between two observations of the tracked site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionChange {
    pub magnitude: ChangeMagnitude,
    pub description: String,
}

/// Computes the change between two normalized positions.
///
/// Inputs are the sentinel-normalized ranks (`None` = not ranking). The
/// sign convention follows rank numbers: a decrease in rank number is an
/// improvement, so `delta = before - after` is positive for improvements.
#[must_use]
pub fn compute_change(before: Option<u32>, after: Option<u32>) -> PositionChange {
    match (before, after) {
        (None, None) => PositionChange {
            magnitude: ChangeMagnitude::Delta(0),
            description: "No change (both not ranking)".to_owned(),
        },
        (None, Some(a)) => PositionChange {
            magnitude: ChangeMagnitude::New,
            description: format!("New ranking at #{a}"),
        },
        (Some(b), None) => PositionChange {
            magnitude: ChangeMagnitude::Lost,
            description: format!("Lost ranking (was #{b})"),
        },
        (Some(b), Some(a)) => {
            let delta = i64::from(b) - i64::from(a);
            let description = match delta.cmp(&0) {
                Ordering::Greater => {
                    format!("Improved by {delta} positions (#{b} → #{a})")
                }
                Ordering::Less => {
                    format!("Declined by {} positions (#{b} → #{a})", delta.abs())
                }
                Ordering::Equal => format!("No change (#{b})"),
            };
            PositionChange {
                magnitude: ChangeMagnitude::Delta(delta),
                description,
            }
        }
    }
}
