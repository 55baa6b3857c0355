use regex::Regex;

/// Convert a block of text into a de-duplicated, ordered list of items.
///
/// Per line: trim, strip one leading bullet glyph, drop page/footer
/// noise and empties, then dedup by exact post-strip text preserving
/// first-seen order. Length filtering is the question detector's job.
pub fn bulletize(block: &str) -> Vec<String> {
    let glyph_re = Regex::new(r"^(?:[-*•▪☐□]|o\s)\s*").unwrap();
    let footer_re = Regex::new(r"Page\s+\d+").unwrap();

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for raw in block.lines() {
        let trimmed = raw.trim();
        let stripped = glyph_re.replace(trimmed, "").trim().to_string();
        if stripped.is_empty() {
            continue;
        }
        if footer_re.is_match(&stripped) {
            continue;
        }
        if seen.insert(stripped.clone()) {
            out.push(stripped);
        }
    }
    out
}
