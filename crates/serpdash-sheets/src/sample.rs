//! Built-in demo dataset served when no live source is configured or the
//! fetch fails. Deterministic so tests and demos behave the same run to run.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serpdash_core::{market_label, PositionValue, RankingRecord, SerpEntry};

use crate::types::{DataSource, Dataset, LoadSummary};

const SAMPLE_START: (i32, u32, u32) = (2025, 7, 25);
const SAMPLE_DAYS: u64 = 6;

struct SampleKeyword {
    keyword: &'static str,
    language: &'static str,
    location: &'static str,
    /// One tracked position per sample day; `None` = not ranking.
    positions: [Option<u32>; SAMPLE_DAYS as usize],
    competitors: [&'static str; 4],
    ai_overview: Option<&'static str>,
}

const SAMPLE_KEYWORDS: &[SampleKeyword] = &[
    SampleKeyword {
        keyword: "recarga digi",
        language: "es",
        location: "es",
        positions: [Some(3), Some(3), Some(2), Some(2), Some(1), Some(1)],
        competitors: [
            "https://www.digimobil.es/recarga",
            "https://www.rapidorecarga.com/digi",
            "https://www.movilrecarga.com/digi",
            "https://www.doctorsim.com/recarga-digi",
        ],
        ai_overview: Some("Digi top-ups can be purchased online from the carrier or resellers."),
    },
    SampleKeyword {
        keyword: "ricarica iliad",
        language: "it",
        location: "it",
        positions: [Some(7), Some(8), Some(6), Some(5), Some(5), Some(4)],
        competitors: [
            "https://www.iliad.it/ricarica",
            "https://www.ricaricaonline.it/iliad",
            "https://www.mondoricariche.it/iliad",
            "https://www.puntoricarica.it/iliad",
        ],
        ai_overview: None,
    },
    SampleKeyword {
        keyword: "recharge transcash",
        language: "fr",
        location: "fr",
        positions: [Some(2), Some(2), Some(3), Some(4), None, None],
        competitors: [
            "https://www.transcash.fr/recharge",
            "https://www.recharge-en-ligne.fr/transcash",
            "https://www.topazio.fr/transcash",
            "https://www.codecoupon.fr/transcash",
        ],
        ai_overview: None,
    },
    SampleKeyword {
        keyword: "buy robux",
        language: "en",
        location: "ph",
        positions: [None, None, Some(9), Some(8), Some(8), Some(7)],
        competitors: [
            "https://www.roblox.com/upgrades/robux",
            "https://www.amazon.com/roblox-gift-card",
            "https://www.offgamers.com/robux",
            "https://www.codashop.com/ph/roblox",
        ],
        ai_overview: Some("Robux can be bought directly from Roblox or via gift cards."),
    },
    SampleKeyword {
        keyword: "neosurf voucher",
        language: "en",
        location: "au",
        positions: [Some(12), Some(11), Some(11), Some(10), Some(9), Some(9)],
        competitors: [
            "https://www.neosurf.com/en_AU",
            "https://www.dundle.com/au/neosurf",
            "https://www.prepaidbonus.com/neosurf",
            "https://www.gamecardsdirect.com/neosurf",
        ],
        ai_overview: None,
    },
    SampleKeyword {
        keyword: "t-mobile prepaid refill",
        language: "en",
        location: "us",
        positions: [Some(5), Some(5), Some(5), Some(5), Some(5), Some(5)],
        competitors: [
            "https://www.t-mobile.com/refill",
            "https://www.callingmart.com/t-mobile",
            "https://www.bestbuy.com/t-mobile-prepaid",
            "https://www.target.com/t-mobile-refill",
        ],
        ai_overview: Some("Prepaid refills are available from T-Mobile and authorized retailers."),
    },
];

/// Builds the top-5 SERP for one sample observation: competitors in order,
/// with the tracked site spliced in at its position when it ranks that high.
fn sample_serp(entry: &SampleKeyword, position: Option<u32>) -> Vec<SerpEntry> {
    let target_url = format!(
        "https://www.recharge.com/{}/{}",
        entry.location,
        entry.keyword.replace(' ', "-")
    );

    let mut urls: Vec<String> = entry
        .competitors
        .iter()
        .map(|u| (*u).to_owned())
        .collect();
    if let Some(pos) = position {
        if pos as usize <= urls.len() + 1 {
            urls.insert(pos as usize - 1, target_url);
        }
    }

    urls.into_iter()
        .take(5)
        .enumerate()
        .map(|(idx, url)| SerpEntry {
            rank: u32::try_from(idx + 1).expect("top-5 rank fits u32"),
            url,
        })
        .collect()
}

fn change_hint(previous: Option<u32>, current: Option<u32>) -> Option<String> {
    match (previous, current) {
        (Some(p), Some(c)) if p > c => Some(format!("Improved (+{})", p - c)),
        (Some(p), Some(c)) if p < c => Some(format!("Declined (-{})", c - p)),
        (Some(_), Some(_)) => Some("Stable".to_owned()),
        (None, Some(_)) => Some("New".to_owned()),
        (Some(_), None) => Some("Lost".to_owned()),
        (None, None) => None,
    }
}

/// The labeled demo dataset: six keywords across six markets over six days.
#[must_use]
pub fn sample_dataset() -> Dataset {
    let start = NaiveDate::from_ymd_opt(SAMPLE_START.0, SAMPLE_START.1, SAMPLE_START.2)
        .expect("valid sample start date");
    let observed_at = NaiveTime::from_hms_opt(9, 30, 0).expect("valid sample time");

    let mut records = Vec::new();
    for day in 0..SAMPLE_DAYS {
        let date = start
            .checked_add_days(Days::new(day))
            .expect("sample window fits the calendar");
        let timestamp: NaiveDateTime = date.and_time(observed_at);

        for entry in SAMPLE_KEYWORDS {
            let idx = day as usize;
            let position = entry.positions[idx];
            let previous = idx.checked_sub(1).and_then(|p| entry.positions[p]);

            records.push(RankingRecord {
                keyword: entry.keyword.to_owned(),
                timestamp: Some(timestamp),
                market: market_label(entry.location),
                location: Some(entry.location.to_owned()),
                language: Some(entry.language.to_owned()),
                position: position.map_or(PositionValue::NotRanking, PositionValue::Ranked),
                change_label: change_hint(previous, position),
                serp: sample_serp(entry, position),
                ai_overview: entry.ai_overview.map(ToOwned::to_owned),
            });
        }
    }

    let summary = LoadSummary {
        rows_total: records.len(),
        rows_dropped_timestamp: 0,
        rows_missing_keyword: 0,
    };

    Dataset {
        records,
        source: DataSource::Sample,
        summary,
        warning: None,
    }
}
