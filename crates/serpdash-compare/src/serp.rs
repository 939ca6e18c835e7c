use serde::{Deserialize, Serialize};
use serpdash_core::SerpEntry;

/// Movement of one URL between two SERP snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementCategory {
    New,
    Lost,
    Improved,
    Declined,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlMovement {
    pub url: String,
    /// Host for display, `www.` stripped. Never used as a comparison key.
    pub display_domain: String,
    pub rank_before: Option<u32>,
    pub rank_after: Option<u32>,
    pub category: MovementCategory,
    /// Whether this URL belongs to the tracked site.
    pub is_target: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementCounts {
    pub new: usize,
    pub lost: usize,
    pub improved: usize,
    pub declined: usize,
    pub stable: usize,
}

impl MovementCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.new + self.lost + self.improved + self.declined + self.stable
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpDiff {
    /// One movement per distinct URL, in first-seen order (baseline first).
    pub movements: Vec<UrlMovement>,
    pub counts: MovementCounts,
}

/// Extracts a display domain from a URL: host only, `www.` prefix stripped.
///
/// URLs that don't look like URLs come back truncated rather than failing,
/// since this feeds display cells only.
#[must_use]
pub fn display_domain(url: &str) -> String {
    let host = url.split_once("://").and_then(|(_, rest)| {
        let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
        let host = host.strip_prefix("www.").unwrap_or(host);
        (!host.is_empty()).then(|| host.to_owned())
    });
    host.unwrap_or_else(|| {
        let mut truncated: String = url.chars().take(30).collect();
        if url.chars().count() > 30 {
            truncated.push_str("...");
        }
        truncated
    })
}

/// Computes per-URL movements between two SERP snapshots.
///
/// URLs are compared by exact trimmed string match. If a URL repeats within
/// one snapshot (it shouldn't, per the source contract), the first
/// occurrence wins. The category counts always sum to the size of the URL
/// union.
#[must_use]
pub fn diff_serp(before: &[SerpEntry], after: &[SerpEntry], target_domain: &str) -> SerpDiff {
    let rank_in = |snapshot: &[SerpEntry], url: &str| -> Option<u32> {
        snapshot
            .iter()
            .find(|entry| entry.url.trim() == url)
            .map(|entry| entry.rank)
    };

    let mut union: Vec<&str> = Vec::new();
    for entry in before.iter().chain(after) {
        let url = entry.url.trim();
        if !url.is_empty() && !union.contains(&url) {
            union.push(url);
        }
    }

    let target_lower = target_domain.to_lowercase();
    let mut counts = MovementCounts::default();
    let movements: Vec<UrlMovement> = union
        .into_iter()
        .map(|url| {
            let rank_before = rank_in(before, url);
            let rank_after = rank_in(after, url);
            let category = match (rank_before, rank_after) {
                (None, Some(_)) => MovementCategory::New,
                (Some(_), None) => MovementCategory::Lost,
                (Some(b), Some(a)) if a < b => MovementCategory::Improved,
                (Some(b), Some(a)) if a > b => MovementCategory::Declined,
                _ => MovementCategory::Stable,
            };
            match category {
                MovementCategory::New => counts.new += 1,
                MovementCategory::Lost => counts.lost += 1,
                MovementCategory::Improved => counts.improved += 1,
                MovementCategory::Declined => counts.declined += 1,
                MovementCategory::Stable => counts.stable += 1,
            }
            UrlMovement {
                url: url.to_owned(),
                display_domain: display_domain(url),
                rank_before,
                rank_after,
                category,
                is_target: !target_lower.is_empty()
                    && url.to_lowercase().contains(&target_lower),
            }
        })
        .collect();

    debug_assert_eq!(counts.total(), movements.len());
    SerpDiff { movements, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(u32, &str)]) -> Vec<SerpEntry> {
        pairs
            .iter()
            .map(|(rank, url)| SerpEntry {
                rank: *rank,
                url: (*url).to_owned(),
            })
            .collect()
    }

    #[test]
    fn swap_scenario() {
        // Baseline {1: a, 2: b}, comparison {1: b, 3: a}:
        // a declined (1→3), b improved (2→1), nothing new or lost.
        let before = entries(&[(1, "https://a.com"), (2, "https://b.com")]);
        let after = entries(&[(1, "https://b.com"), (3, "https://a.com")]);
        let diff = diff_serp(&before, &after, "");

        let a = diff
            .movements
            .iter()
            .find(|m| m.url == "https://a.com")
            .expect("a.com present");
        assert_eq!(a.category, MovementCategory::Declined);
        assert_eq!((a.rank_before, a.rank_after), (Some(1), Some(3)));

        let b = diff
            .movements
            .iter()
            .find(|m| m.url == "https://b.com")
            .expect("b.com present");
        assert_eq!(b.category, MovementCategory::Improved);
        assert_eq!((b.rank_before, b.rank_after), (Some(2), Some(1)));

        assert_eq!(diff.counts.new, 0);
        assert_eq!(diff.counts.lost, 0);
        assert_eq!(diff.counts.improved, 1);
        assert_eq!(diff.counts.declined, 1);
    }

    #[test]
    fn new_and_lost() {
        let before = entries(&[(1, "https://a.com")]);
        let after = entries(&[(1, "https://b.com")]);
        let diff = diff_serp(&before, &after, "");
        assert_eq!(diff.counts.lost, 1);
        assert_eq!(diff.counts.new, 1);
        assert_eq!(diff.counts.total(), 2);
    }

    #[test]
    fn stable_when_rank_unchanged() {
        let before = entries(&[(2, "https://a.com")]);
        let after = entries(&[(2, "https://a.com")]);
        let diff = diff_serp(&before, &after, "");
        assert_eq!(diff.counts.stable, 1);
        assert_eq!(diff.movements[0].category, MovementCategory::Stable);
    }

    #[test]
    fn counts_sum_to_union_size() {
        // A spread of constructed pairs; the invariant must hold for all.
        let cases: Vec<(Vec<SerpEntry>, Vec<SerpEntry>)> = vec![
            (entries(&[]), entries(&[])),
            (entries(&[(1, "https://a.com")]), entries(&[])),
            (entries(&[]), entries(&[(1, "https://a.com")])),
            (
                entries(&[(1, "https://a.com"), (2, "https://b.com"), (3, "https://c.com")]),
                entries(&[(1, "https://c.com"), (2, "https://d.com"), (3, "https://e.com")]),
            ),
            (
                entries(&[(1, "https://a.com"), (2, "https://b.com")]),
                entries(&[(1, "https://b.com"), (3, "https://a.com")]),
            ),
            (
                entries(&[(1, "https://a.com"), (2, "https://a.com")]),
                entries(&[(5, "https://a.com")]),
            ),
        ];
        for (before, after) in cases {
            let diff = diff_serp(&before, &after, "");
            let mut union: Vec<&str> = Vec::new();
            for e in before.iter().chain(&after) {
                if !union.contains(&e.url.as_str()) {
                    union.push(&e.url);
                }
            }
            assert_eq!(diff.counts.total(), union.len());
            assert_eq!(diff.movements.len(), union.len());
        }
    }

    #[test]
    fn duplicate_url_first_match_wins() {
        let before = entries(&[(1, "https://a.com"), (4, "https://a.com")]);
        let after = entries(&[(2, "https://a.com")]);
        let diff = diff_serp(&before, &after, "");
        assert_eq!(diff.movements[0].rank_before, Some(1));
        assert_eq!(diff.movements[0].category, MovementCategory::Declined);
    }

    #[test]
    fn target_flag_independent_of_category() {
        let before = entries(&[(1, "https://www.recharge.com/en/robux")]);
        let after = entries(&[(3, "https://www.recharge.com/en/robux")]);
        let diff = diff_serp(&before, &after, "recharge.com");
        assert!(diff.movements[0].is_target);
        assert_eq!(diff.movements[0].category, MovementCategory::Declined);
    }

    #[test]
    fn display_domain_strips_scheme_and_www() {
        assert_eq!(
            display_domain("https://www.recharge.com/en/robux?src=serp"),
            "recharge.com"
        );
        assert_eq!(display_domain("http://b.com/path"), "b.com");
    }

    #[test]
    fn display_domain_keeps_comparison_key_intact() {
        // Two URLs differing only by www. are distinct union members.
        let before = entries(&[(1, "https://www.a.com")]);
        let after = entries(&[(1, "https://a.com")]);
        let diff = diff_serp(&before, &after, "");
        assert_eq!(diff.movements.len(), 2);
        assert_eq!(diff.counts.lost, 1);
        assert_eq!(diff.counts.new, 1);
    }

    #[test]
    fn display_domain_non_url_truncates() {
        let raw = "definitely not a url but quite a long cell value indeed";
        let shown = display_domain(raw);
        assert_eq!(shown, "definitely not a url but quite...");
        assert_eq!(display_domain("short cell"), "short cell");
    }
}
