use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Fallback strptime patterns tried after ISO-8601 and the locale form.
const EXTRA_PATTERNS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Recovers a timestamp from the heterogeneous textual forms the source
/// spreadsheets produce.
///
/// Strategies, in order: ISO-8601 (with or without offset), the locale
/// `"M/D/YYYY, h:mm:ss AM/PM"` form (comma optional) via explicit field
/// extraction, a short list of strptime patterns, and finally a bare date
/// (taken as midnight). Returns `None` when nothing matches — callers count
/// the exclusions, they never abort a load over them.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }

    if let Some(dt) = parse_locale_datetime(trimmed) {
        return Some(dt);
    }

    for pattern in EXTRA_PATTERNS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Some(dt);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

/// Parses the `"M/D/YYYY, h:mm:ss AM/PM"` form by explicit field extraction.
///
/// The meridiem conversion is manual: `12 AM → 0`, `12 PM` unchanged, other
/// PM hours `+12`.
fn parse_locale_datetime(raw: &str) -> Option<NaiveDateTime> {
    let re = Regex::new(
        r"(?i)^(\d{1,2})/(\d{1,2})/(\d{4}),?\s+(\d{1,2}):(\d{2}):(\d{2})\s*(AM|PM)$",
    )
    .expect("valid locale timestamp regex");
    let caps = re.captures(raw)?;

    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let mut hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps[6].parse().ok()?;
    let meridiem = caps[7].to_uppercase();

    if hour == 0 || hour > 12 {
        return None;
    }
    if meridiem == "AM" {
        if hour == 12 {
            hour = 0;
        }
    } else if hour != 12 {
        hour += 12;
    }

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}
