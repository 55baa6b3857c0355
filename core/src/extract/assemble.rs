use regex::Regex;
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};
use crate::extract::block::{extract_block, BlockLabels};
use crate::extract::bullets::bulletize;
use crate::extract::normalize::{collapse_whitespace, dedupe_normalized, normalize_key, normalize_pages, normalize_text};
use crate::extract::profile::{ExtractionProfile, ProfileSet};
use crate::extract::questions::{is_usable_prompt, QuestionDetector};
use crate::extract::segment::{first_header_offset, split_sections, Section, SectionPattern};
use crate::extract::synthesize::synthesize_questions;
use crate::module::model::{Module, Question, QuestionsSource};

/// Section patterns tried in order; the first that segments the
/// document wins, a miss on both falls back to the whole-document pass.
const SECTION_PATTERNS: &[SectionPattern] = &[SectionPattern::Statement, SectionPattern::Numbered];

/// Evidence bullets shorter than this are stray glyph fragments.
const MIN_EVIDENCE_LENGTH: usize = 3;

/// Question text plus attachments gathered before IDs are assigned.
#[derive(Debug, Clone)]
struct DraftQuestion {
    prompt: String,
    reference: Option<String>,
    evidence_requests: Vec<String>,
    area: Option<String>,
}

impl DraftQuestion {
    fn bare(prompt: String, area: Option<String>) -> DraftQuestion {
        DraftQuestion {
            prompt,
            reference: None,
            evidence_requests: Vec::new(),
            area,
        }
    }
}

/// Derive a complete module record from extracted document text.
///
/// One pass, no retries: normalize, segment, pull labeled blocks per
/// section, detect questions, dedup at module level, then either keep
/// the extracted questions (`questions_source: pdf`) or synthesize a
/// fallback set (`questions_source: synthesized`), never both.
///
/// The only fatal outcome is a document with no text content at all.
pub fn build_module(raw_text: &str, module_id: &str, profiles: &ProfileSet) -> CoreResult<Module> {
    let text = normalize_text(raw_text);
    if text.trim().is_empty() {
        return Err(CoreError::EmptyDocument(format!(
            "no extractable text for module {}",
            module_id
        )));
    }

    let profile = profiles.profile_for(Some(module_id));
    let labels = &profile.block_labels;
    let detector = QuestionDetector::new();

    let mut module = Module::new(module_id);
    module.title = Some(title_from_stem(module_id));

    let mut sections = Vec::new();
    let mut preamble: &str = &text;
    for pattern in SECTION_PATTERNS {
        let candidate = split_sections(&text, *pattern);
        if !candidate.is_empty() {
            if let Some(offset) = first_header_offset(&text, *pattern) {
                preamble = &text[..offset];
            }
            sections = candidate;
            break;
        }
    }

    // the objective block lives in the preamble, ahead of any section
    module.control_objective = extract_objective(preamble, labels);

    let mut criteria: Vec<String> = Vec::new();
    let mut evidence: Vec<String> = Vec::new();
    let mut drafts: Vec<DraftQuestion> = Vec::new();

    if sections.is_empty() {
        // segmentation miss: treat the whole document as one unlabeled body
        harvest_body(&text, None, labels, &detector, &profile, &mut criteria, &mut evidence, &mut drafts);
    } else {
        for Section { header, body } in &sections {
            harvest_body(
                body,
                Some(header.as_str()),
                labels,
                &detector,
                &profile,
                &mut criteria,
                &mut evidence,
                &mut drafts,
            );
        }
    }

    // labeled blocks yielded nothing: whole-document detector pass
    if drafts.is_empty() {
        let lines: Vec<&str> = text.lines().collect();
        drafts = detector
            .extract_questions(&lines, &profile)
            .into_iter()
            .map(|prompt| DraftQuestion::bare(prompt, None))
            .collect();
    }

    // module-level dedup, first-seen order (two sections independently
    // yielding the same criterion collapse to one)
    module.evaluation_criteria = dedupe_normalized(criteria);
    module.required_evidence = dedupe_normalized(evidence);
    module.questions = finalize_questions(module_id, drafts);

    if module.questions.is_empty() {
        module.questions = synthesize_questions(&module)
            .into_iter()
            .map(|prompt| Question {
                id: Question::stable_id(module_id, &prompt),
                prompt,
                reference: None,
                evidence_requests: Vec::new(),
                area: None,
            })
            .collect();
        module.meta.questions_source = Some(QuestionsSource::Synthesized);
    } else {
        module.meta.questions_source = Some(QuestionsSource::Pdf);
    }

    Ok(module)
}

/// Pipeline entry for per-page extracted text fragments.
pub fn build_module_from_pages(
    pages: &[String],
    module_id: &str,
    profiles: &ProfileSet,
) -> CoreResult<Module> {
    build_module(&normalize_pages(pages), module_id, profiles)
}

/// Pull criteria, evidence, and question drafts out of one body of text.
#[allow(clippy::too_many_arguments)]
fn harvest_body(
    body: &str,
    area: Option<&str>,
    labels: &BlockLabels,
    detector: &QuestionDetector,
    profile: &ExtractionProfile,
    criteria: &mut Vec<String>,
    evidence: &mut Vec<String>,
    drafts: &mut Vec<DraftQuestion>,
) {
    for label in &labels.criteria {
        if let Some(block) = extract_block(body, label, &labels.stops_for(label)) {
            criteria.extend(bulletize(&block));
        }
    }

    for label in &labels.evidence {
        if let Some(block) = extract_block(body, label, &labels.stops_for(label)) {
            evidence.extend(
                bulletize(&block)
                    .into_iter()
                    .filter(|item| item.chars().count() >= MIN_EVIDENCE_LENGTH),
            );
        }
    }

    for label in &labels.questions {
        if let Some(block) = extract_block(body, label, &labels.stops_for(label)) {
            drafts.extend(parse_question_block(&block, area, detector, profile));
        }
    }
}

/// Parse a question block: question lines start a draft; `Evidence:` and
/// `Reference:` lines attach to the current draft; `Key Check:` annotation
/// lines are dropped; anything else is continuation text appended to the
/// current prompt.
fn parse_question_block(
    block: &str,
    area: Option<&str>,
    detector: &QuestionDetector,
    profile: &ExtractionProfile,
) -> Vec<DraftQuestion> {
    let evidence_re = Regex::new(r"(?i)\bevidence:\s*").unwrap();
    let reference_re = Regex::new(r"(?i)\breference:\s*").unwrap();
    let key_check_re = Regex::new(r"(?i)^key check:\s*").unwrap();

    let mut out = Vec::new();
    let mut current: Option<DraftQuestion> = None;

    for line in bulletize(block) {
        if detector.looks_like_question(&line, profile) {
            if let Some(draft) = current.take() {
                out.push(draft);
            }
            current = Some(DraftQuestion::bare(line, area.map(str::to_string)));
            continue;
        }

        let ev = evidence_re.find(&line);
        let reference = reference_re.find(&line);
        match (ev, reference) {
            // "Evidence: ... Reference: ..." on one line
            (Some(e), Some(r)) if e.end() <= r.start() => {
                if let Some(draft) = current.as_mut() {
                    let ev_text = line[e.end()..r.start()].trim();
                    if !ev_text.is_empty() {
                        draft.evidence_requests.push(ev_text.to_string());
                    }
                    draft.reference = Some(line[r.end()..].trim().to_string());
                }
            }
            (Some(e), None) if e.start() == 0 => {
                if let Some(draft) = current.as_mut() {
                    draft.evidence_requests.push(line[e.end()..].trim().to_string());
                }
            }
            (None, Some(r)) if r.start() == 0 => {
                if let Some(draft) = current.as_mut() {
                    draft.reference = Some(line[r.end()..].trim().to_string());
                }
            }
            _ => {
                if key_check_re.is_match(&line) {
                    continue;
                }
                if let Some(draft) = current.as_mut() {
                    draft.prompt = collapse_whitespace(&format!("{} {}", draft.prompt, line));
                }
            }
        }
    }

    if let Some(draft) = current.take() {
        out.push(draft);
    }
    out
}

/// Normalize prompts, drop junk, dedup by normalized text, assign IDs.
fn finalize_questions(module_id: &str, drafts: Vec<DraftQuestion>) -> Vec<Question> {
    let mut seen = HashSet::new();
    let mut questions = Vec::new();

    for draft in drafts {
        let prompt = collapse_whitespace(&draft.prompt);
        if !is_usable_prompt(&prompt) {
            continue;
        }
        if !seen.insert(normalize_key(&prompt)) {
            continue;
        }
        questions.push(Question {
            id: Question::stable_id(module_id, &prompt),
            prompt,
            reference: draft.reference,
            evidence_requests: draft.evidence_requests,
            area: draft.area,
        });
    }
    questions
}

/// Module-level objective block, first matching label wins.
fn extract_objective(text: &str, labels: &BlockLabels) -> Option<String> {
    labels
        .objective
        .iter()
        .filter_map(|label| extract_block(text, label, &labels.stops_for(label)))
        .map(|block| collapse_whitespace(&block.replace('\n', " ")))
        .find(|objective| !objective.is_empty())
}

/// Human title from a module stem: "01_access_controls" -> "01 Access Controls".
fn title_from_stem(stem: &str) -> String {
    stem.split('_')
        .filter(|word| !word.is_empty())
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
