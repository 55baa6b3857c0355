use regex::Regex;

/// Normalize raw extracted document text into canonical form.
///
/// - soft hyphens (U+00AD) removed
/// - non-breaking spaces (U+00A0) converted to plain spaces
/// - runs of horizontal whitespace collapsed to a single space
/// - runs of 3+ newlines collapsed to exactly 2
///
/// Empty input yields an empty string. Idempotent.
pub fn normalize_text(raw: &str) -> String {
    let text = raw.replace('\u{00ad}', "").replace('\u{00a0}', " ");
    let hspace = Regex::new(r"[ \t]+").unwrap();
    let text = hspace.replace_all(&text, " ");
    let blank_runs = Regex::new(r"\n{3,}").unwrap();
    blank_runs.replace_all(&text, "\n\n").into_owned()
}

/// Normalize a sequence of per-page text fragments into one canonical string.
pub fn normalize_pages(pages: &[String]) -> String {
    normalize_text(&pages.join("\n"))
}

/// Comparison key for dedup: lower-cased, whitespace-collapsed, trimmed.
pub fn normalize_key(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Collapse interior whitespace and trim, preserving case.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove duplicates keyed by `normalize_key`, preserving first-seen order
/// and the first-seen form of each entry.
pub fn dedupe_normalized(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let key = normalize_key(&item);
        if key.is_empty() {
            continue;
        }
        if seen.insert(key) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_soft_hyphens_and_nbsp() {
        let raw = "infor\u{00ad}mation\u{00a0}security";
        assert_eq!(normalize_text(raw), "information security");
    }

    #[test]
    fn test_normalize_collapses_whitespace_runs() {
        let raw = "a  \t b\n\n\n\n\nc";
        assert_eq!(normalize_text(raw), "a b\n\nc");
    }

    #[test]
    fn test_normalize_empty_input() {
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let raw = "Objective:\u{00a0} maintain   a program\n\n\n\nScope";
        let once = normalize_text(raw);
        let twice = normalize_text(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_pages_joins_with_newline() {
        let pages = vec!["page one".to_string(), "page two".to_string()];
        assert_eq!(normalize_pages(&pages), "page one\npage two");
    }

    #[test]
    fn test_normalize_key_folds_case_and_space() {
        assert_eq!(normalize_key("Board  Approval "), "board approval");
    }

    #[test]
    fn test_dedupe_keeps_first_seen_form() {
        let items = vec![
            "Board approval".to_string(),
            "board approval ".to_string(),
            "MFA policy".to_string(),
        ];
        let deduped = dedupe_normalized(items);
        assert_eq!(deduped, vec!["Board approval", "MFA policy"]);
    }
}
