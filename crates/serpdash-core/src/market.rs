/// Keyword, language, and location recovered from a source sheet label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLabel {
    pub keyword: String,
    pub language: String,
    pub location: String,
}

/// Maps a two-letter location code to its display label (flag + name).
///
/// Unknown codes fall back to a globe with the uppercased code rather than
/// failing, so new markets appear in tables without a code change.
#[must_use]
pub fn market_label(location_code: &str) -> String {
    match location_code.to_lowercase().as_str() {
        "es" => "🇪🇸 Spain".to_owned(),
        "it" => "🇮🇹 Italy".to_owned(),
        "fr" => "🇫🇷 France".to_owned(),
        "ph" => "🇵🇭 Philippines".to_owned(),
        "dz" => "🇩🇿 Algeria".to_owned(),
        "au" => "🇦🇺 Australia".to_owned(),
        "us" => "🇺🇸 United States".to_owned(),
        "uk" => "🇬🇧 United Kingdom".to_owned(),
        "de" => "🇩🇪 Germany".to_owned(),
        "nl" => "🇳🇱 Netherlands".to_owned(),
        other => format!("🌍 {}", other.to_uppercase()),
    }
}

/// Splits a sheet label of the form `<keyword words>_<lang>_<loc>`.
///
/// Trailing underscores are trimmed first. Labels with fewer than three
/// segments yield the whole label as the keyword with `en`/`us` defaults.
#[must_use]
pub fn parse_sheet_label(name: &str) -> SheetLabel {
    let clean = name.trim_end_matches('_');
    let parts: Vec<&str> = clean.split('_').collect();

    if parts.len() >= 3 {
        let keyword = parts[..parts.len() - 2].join(" ");
        SheetLabel {
            keyword,
            language: parts[parts.len() - 2].to_owned(),
            location: parts[parts.len() - 1].to_owned(),
        }
    } else {
        SheetLabel {
            keyword: name.to_owned(),
            language: "en".to_owned(),
            location: "us".to_owned(),
        }
    }
}
