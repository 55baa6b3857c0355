use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashSet};

use crate::extract::normalize::normalize_key;

/// Where a module's questions came from: lifted from the source document
/// or generated by the deterministic fallback. Strictly one or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionsSource {
    Pdf,
    Synthesized,
}

/// One examiner question within a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence_requests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl Question {
    /// Deterministic question ID: truncated SHA-256 of the module ID and
    /// the normalized prompt, stable across re-derivation of the same
    /// source document.
    pub fn stable_id(module_id: &str, prompt: &str) -> String {
        let combined = format!("{}:{}", module_id, normalize_key(prompt));
        let mut hasher = Sha256::new();
        hasher.update(combined.as_bytes());
        let digest = hasher.finalize();
        format!("Q_{}", hex::encode(&digest[..4]))
    }
}

/// Finding template text: a single string or an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FindingTemplate {
    Single(String),
    Many(Vec<String>),
}

impl FindingTemplate {
    pub fn lines(&self) -> Vec<String> {
        match self {
            FindingTemplate::Single(s) => vec![s.clone()],
            FindingTemplate::Many(items) => items.clone(),
        }
    }
}

/// Templates keyed by assessment outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingTemplates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positive: Option<FindingTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<FindingTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative: Option<FindingTemplate>,
}

impl FindingTemplates {
    pub fn is_empty(&self) -> bool {
        self.positive.is_none() && self.partial.is_none() && self.negative.is_none()
    }
}

/// Provenance and decoration metadata, kept apart from the typed core
/// fields; `extra` carries open-ended annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_source: Option<QuestionsSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ModuleMeta {
    pub fn is_empty(&self) -> bool {
        self.questions_source.is_none()
            && self.source_path.is_none()
            && self.warnings.is_empty()
            && self.extra.is_empty()
    }
}

/// One control domain's bundle of objective, criteria, evidence requests,
/// and examiner questions. Created once per source document; downstream
/// consumers decorate `meta` but never mutate the canonical lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Module {
    pub module_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_objective: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub evaluation_criteria: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_evidence: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub questions: Vec<Question>,
    #[serde(skip_serializing_if = "FindingTemplates::is_empty")]
    pub finding_templates: FindingTemplates,
    #[serde(rename = "__meta__", skip_serializing_if = "ModuleMeta::is_empty")]
    pub meta: ModuleMeta,
}

impl Module {
    pub fn new(module_id: impl Into<String>) -> Module {
        Module {
            module_id: module_id.into(),
            ..Module::default()
        }
    }

    /// Record invariant violations: list dedup by normalized text, unique
    /// question IDs, non-empty prompts, provenance present.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        check_list_dedup(&self.evaluation_criteria, "evaluation_criteria", &mut violations);
        check_list_dedup(&self.required_evidence, "required_evidence", &mut violations);

        let mut prompt_keys = HashSet::new();
        let mut ids = HashSet::new();
        for q in &self.questions {
            if q.prompt.trim().is_empty() {
                violations.push(format!("question {} has an empty prompt", q.id));
            }
            if !prompt_keys.insert(normalize_key(&q.prompt)) {
                violations.push(format!("duplicate question prompt: {}", q.prompt));
            }
            if !ids.insert(q.id.as_str()) {
                violations.push(format!("duplicate question id: {}", q.id));
            }
        }

        if !self.questions.is_empty() && self.meta.questions_source.is_none() {
            violations.push("questions present but questions_source is unset".to_string());
        }

        violations
    }
}

fn check_list_dedup(items: &[String], field: &str, violations: &mut Vec<String>) {
    let mut keys = HashSet::new();
    for item in items {
        if !keys.insert(normalize_key(item)) {
            violations.push(format!("duplicate {} entry: {}", field, item));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_id_determinism() {
        let a = Question::stable_id("01_policies", "Does the board approve the program?");
        let b = Question::stable_id("01_policies", "Does the board  approve the program?");
        assert_eq!(a, b);
        assert!(a.starts_with("Q_"));
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_stable_id_varies_by_module() {
        let a = Question::stable_id("01_policies", "Does the board approve the program?");
        let b = Question::stable_id("02_access", "Does the board approve the program?");
        assert_ne!(a, b);
    }

    #[test]
    fn test_finding_template_shapes() {
        let single: FindingTemplate = serde_yaml::from_str("\"All good.\"").unwrap();
        assert_eq!(single.lines(), vec!["All good."]);

        let many: FindingTemplate = serde_yaml::from_str("- line one\n- line two\n").unwrap();
        assert_eq!(many.lines(), vec!["line one", "line two"]);
    }

    #[test]
    fn test_invariant_violations_flag_duplicates() {
        let mut module = Module::new("m1");
        module.evaluation_criteria = vec!["Board approval".to_string(), "board approval ".to_string()];
        module.questions = vec![
            Question {
                id: "Q_1".to_string(),
                prompt: "Does it exist?".to_string(),
                reference: None,
                evidence_requests: Vec::new(),
                area: None,
            },
            Question {
                id: "Q_1".to_string(),
                prompt: "does it  exist?".to_string(),
                reference: None,
                evidence_requests: Vec::new(),
                area: None,
            },
        ];
        let violations = module.invariant_violations();
        assert!(violations.iter().any(|v| v.contains("evaluation_criteria")));
        assert!(violations.iter().any(|v| v.contains("duplicate question prompt")));
        assert!(violations.iter().any(|v| v.contains("duplicate question id")));
    }

    #[test]
    fn test_clean_module_has_no_violations() {
        let mut module = Module::new("m1");
        module.questions = vec![Question {
            id: Question::stable_id("m1", "Does it exist?"),
            prompt: "Does it exist?".to_string(),
            reference: None,
            evidence_requests: Vec::new(),
            area: None,
        }];
        module.meta.questions_source = Some(QuestionsSource::Pdf);
        assert!(module.invariant_violations().is_empty());
    }
}
