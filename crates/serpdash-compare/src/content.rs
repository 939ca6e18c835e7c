/// Upstream spreadsheet formula-error sentinel.
const ERROR_SENTINEL: &str = "#ERROR!";

/// Whether a free-text cell holds real content.
///
/// False for missing, empty, whitespace-only, or the upstream `#ERROR!`
/// sentinel. This is the single predicate behind every "AI Overview
/// present" count, filter, and display.
#[must_use]
pub fn has_content(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(raw) => {
            let trimmed = raw.trim();
            !trimmed.is_empty() && trimmed != ERROR_SENTINEL
        }
    }
}

/// Normalizes the two upstream AI-overview representations into one field.
///
/// Some source versions carry a content column, others only a boolean-ish
/// flag column. The content column wins when it holds real text; otherwise
/// negative flag tokens map to absent and anything else flows through
/// [`has_content`]. The result is `Some` exactly when an overview is
/// present.
#[must_use]
pub fn normalize_ai_overview(flag: Option<&str>, text: Option<&str>) -> Option<String> {
    if has_content(text) {
        return text.map(|t| t.trim().to_owned());
    }
    let flag = flag?;
    let token = flag.trim();
    if matches!(token.to_lowercase().as_str(), "no" | "n" | "false") {
        return None;
    }
    has_content(Some(token)).then(|| token.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_values_have_no_content() {
        assert!(!has_content(None));
        assert!(!has_content(Some("")));
        assert!(!has_content(Some("   ")));
        assert!(!has_content(Some("#ERROR!")));
    }

    #[test]
    fn real_text_has_content() {
        assert!(has_content(Some("some text")));
        assert!(has_content(Some("  padded  ")));
    }

    #[test]
    fn content_column_wins() {
        let normalized = normalize_ai_overview(Some("No"), Some("An AI overview appeared."));
        assert_eq!(normalized.as_deref(), Some("An AI overview appeared."));
    }

    #[test]
    fn negative_flag_tokens_mean_absent() {
        assert_eq!(normalize_ai_overview(Some("No"), None), None);
        assert_eq!(normalize_ai_overview(Some("n"), Some("#ERROR!")), None);
        assert_eq!(normalize_ai_overview(Some("FALSE"), Some("  ")), None);
    }

    #[test]
    fn affirmative_flag_carries_through() {
        assert_eq!(normalize_ai_overview(Some("Yes"), None).as_deref(), Some("Yes"));
        assert_eq!(normalize_ai_overview(Some("true"), None).as_deref(), Some("true"));
    }

    #[test]
    fn error_flag_is_absent() {
        assert_eq!(normalize_ai_overview(Some("#ERROR!"), None), None);
        assert_eq!(normalize_ai_overview(None, None), None);
    }
}
