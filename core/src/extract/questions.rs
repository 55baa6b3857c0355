use regex::Regex;

use crate::extract::normalize::{collapse_whitespace, dedupe_normalized};
use crate::extract::profile::{AcceptRule, ExtractionProfile};

/// Question-indicating words for the `numbered_question` rule
/// (whole-word, case-insensitive containment).
const QUESTION_WORD_PATTERN: &str =
    r"(?i)\b(does|do|is|are|should|can|has|have|who|what|when|where|how|will|would|could)\b";

/// Junk literals rejected outright during question normalization.
const JUNK_PROMPTS: &[&str] = &["questions", "question", "n/a"];

/// Minimum prompt length enforced by `normalize_questions`.
const MIN_PROMPT_LENGTH: usize = 10;

/// Heuristic question classifier driven by an extraction profile.
pub struct QuestionDetector {
    q_prefix: Regex,
    numbered: Regex,
    header: Regex,
    lexicon: Regex,
}

impl QuestionDetector {
    pub fn new() -> QuestionDetector {
        QuestionDetector {
            // "Q3:", "Question 2.1)" numbering prefixes
            q_prefix: Regex::new(r"(?i)^\s*Q(?:uestion)?\s*\d+(\.\d+)*[:.)-]?\s+").unwrap(),
            // "2.1)", "3)", "4." numeric outline prefixes
            numbered: Regex::new(r"^\s*\d+(\.\d+)*[.)-]\s+").unwrap(),
            // all-caps section header heuristic
            header: Regex::new(r"^[A-Z][A-Z /&-]{4,}$").unwrap(),
            lexicon: Regex::new(QUESTION_WORD_PATTERN).unwrap(),
        }
    }

    /// Classify a single line under the profile's rule set.
    ///
    /// Length bounds and skip patterns reject first; any accept rule
    /// then passes the line.
    pub fn looks_like_question(&self, line: &str, profile: &ExtractionProfile) -> bool {
        let s = line.trim();

        let length = s.chars().count();
        if length < profile.min_question_length || length > profile.max_question_length {
            return false;
        }

        for pattern in &profile.skip_patterns {
            // invalid patterns are inert, matching the permissive profile policy
            if let Ok(re) = Regex::new(pattern) {
                if re.find(s).is_some_and(|m| m.start() == 0) {
                    return false;
                }
            }
        }

        for rule in &profile.accept_line_if {
            let accepted = match rule {
                AcceptRule::EndsWithQuestionMark => s.ends_with('?'),
                AcceptRule::StartsWithQPrefix => self.q_prefix.is_match(s),
                AcceptRule::NumberedQuestion => {
                    self.numbered.is_match(s) && self.lexicon.is_match(s)
                }
                AcceptRule::Unknown => false,
            };
            if accepted {
                return true;
            }
        }

        false
    }

    /// Extract question lines from a document.
    ///
    /// Phase 1 runs only inside configured question sections; a header
    /// re-matching the section label keeps the section open, any other
    /// all-caps header closes it. Phase 2 harvests the whole document
    /// when no section yielded anything. Output is deduplicated by
    /// normalized text, first-seen order.
    pub fn extract_questions(&self, lines: &[&str], profile: &ExtractionProfile) -> Vec<String> {
        let section_headers: Vec<String> = profile
            .question_headers
            .iter()
            .map(|h| h.trim_end_matches(':').to_lowercase())
            .collect();

        let mut questions = Vec::new();
        let mut in_q_section = false;

        for line in lines {
            let s = line.trim();
            if s.is_empty() {
                continue;
            }

            let header_key = s.trim_end_matches(':').to_lowercase();
            if section_headers.iter().any(|h| *h == header_key) {
                in_q_section = true;
                continue;
            }

            if in_q_section && self.header.is_match(s) {
                in_q_section = false;
            }

            if in_q_section && self.looks_like_question(s, profile) {
                questions.push(s.to_string());
            }
        }

        if questions.is_empty() {
            questions = lines
                .iter()
                .map(|line| line.trim())
                .filter(|s| self.looks_like_question(s, profile))
                .map(|s| s.to_string())
                .collect();
        }

        dedupe_normalized(questions)
    }
}

impl Default for QuestionDetector {
    fn default() -> Self {
        QuestionDetector::new()
    }
}

/// Filter and normalize candidate question text: collapse whitespace,
/// drop short lines and junk literals, dedup by normalized text.
pub fn normalize_questions<I, S>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let filtered: Vec<String> = candidates
        .into_iter()
        .map(|q| collapse_whitespace(q.as_ref()))
        .filter(|s| is_usable_prompt(s))
        .collect();
    dedupe_normalized(filtered)
}

/// Whether normalized prompt text is long enough and not a junk literal.
pub fn is_usable_prompt(s: &str) -> bool {
    s.chars().count() >= MIN_PROMPT_LENGTH && !JUNK_PROMPTS.contains(&s.to_lowercase().as_str())
}
