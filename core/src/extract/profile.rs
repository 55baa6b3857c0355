use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::CoreResult;
use crate::extract::block::BlockLabels;

/// A named line-acceptance rule for the question detector.
///
/// Unknown rule names deserialize to `Unknown` and are inert at
/// detection time, so profile files stay forward-compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptRule {
    EndsWithQuestionMark,
    StartsWithQPrefix,
    NumberedQuestion,
    Unknown,
}

impl AcceptRule {
    pub fn from_name(name: &str) -> AcceptRule {
        match name {
            "ends_with_question_mark" => AcceptRule::EndsWithQuestionMark,
            "starts_with_q_prefix" => AcceptRule::StartsWithQPrefix,
            "numbered_question" => AcceptRule::NumberedQuestion,
            _ => AcceptRule::Unknown,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AcceptRule::EndsWithQuestionMark => "ends_with_question_mark",
            AcceptRule::StartsWithQPrefix => "starts_with_q_prefix",
            AcceptRule::NumberedQuestion => "numbered_question",
            AcceptRule::Unknown => "unknown",
        }
    }
}

impl Serialize for AcceptRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for AcceptRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(AcceptRule::from_name(&name))
    }
}

/// Fully resolved extraction configuration for one module family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionProfile {
    pub min_question_length: usize,
    pub max_question_length: usize,
    /// Prefix regex patterns; a match at line start rejects the line.
    pub skip_patterns: Vec<String>,
    /// Any matching rule accepts the line.
    pub accept_line_if: Vec<AcceptRule>,
    /// Headers (colon optional) that open an explicit question section.
    pub question_headers: Vec<String>,
    pub block_labels: BlockLabels,
}

impl Default for ExtractionProfile {
    fn default() -> Self {
        ExtractionProfile {
            min_question_length: 10,
            max_question_length: 500,
            skip_patterns: Vec::new(),
            accept_line_if: vec![
                AcceptRule::EndsWithQuestionMark,
                AcceptRule::StartsWithQPrefix,
                AcceptRule::NumberedQuestion,
            ],
            question_headers: vec!["Questions".to_string()],
            block_labels: BlockLabels::default(),
        }
    }
}

/// Per-module overrides; every field optional so a named profile
/// shallow-merges over the default instead of replacing it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileOverlay {
    pub min_question_length: Option<usize>,
    pub max_question_length: Option<usize>,
    pub skip_patterns: Option<Vec<String>>,
    pub accept_line_if: Option<Vec<AcceptRule>>,
    pub question_headers: Option<Vec<String>>,
    pub block_labels: Option<BlockLabels>,
}

impl ProfileOverlay {
    pub fn apply(&self, base: &ExtractionProfile) -> ExtractionProfile {
        ExtractionProfile {
            min_question_length: self.min_question_length.unwrap_or(base.min_question_length),
            max_question_length: self.max_question_length.unwrap_or(base.max_question_length),
            skip_patterns: self
                .skip_patterns
                .clone()
                .unwrap_or_else(|| base.skip_patterns.clone()),
            accept_line_if: self
                .accept_line_if
                .clone()
                .unwrap_or_else(|| base.accept_line_if.clone()),
            question_headers: self
                .question_headers
                .clone()
                .unwrap_or_else(|| base.question_headers.clone()),
            block_labels: self
                .block_labels
                .clone()
                .unwrap_or_else(|| base.block_labels.clone()),
        }
    }
}

/// Extraction profiles keyed by module name, with a `default` base.
///
/// Loaded once by the caller and passed into the pipeline explicitly;
/// the core holds no global configuration state.
#[derive(Debug, Clone, Default)]
pub struct ProfileSet {
    default: ExtractionProfile,
    named: BTreeMap<String, ProfileOverlay>,
}

impl ProfileSet {
    pub fn from_yaml_str(yaml: &str) -> CoreResult<ProfileSet> {
        if yaml.trim().is_empty() {
            return Ok(ProfileSet::default());
        }
        let mut named: BTreeMap<String, ProfileOverlay> = serde_yaml::from_str(yaml)?;
        let default = match named.remove("default") {
            Some(overlay) => overlay.apply(&ExtractionProfile::default()),
            None => ExtractionProfile::default(),
        };
        Ok(ProfileSet { default, named })
    }

    pub fn load(path: &Path) -> CoreResult<ProfileSet> {
        let raw = std::fs::read_to_string(path)?;
        ProfileSet::from_yaml_str(&raw)
    }

    /// Resolve the profile for a module: the named overlay shallow-merged
    /// over the default, or the default when no overlay matches.
    pub fn profile_for(&self, module_name: Option<&str>) -> ExtractionProfile {
        match module_name.and_then(|name| self.named.get(name)) {
            Some(overlay) => overlay.apply(&self.default),
            None => self.default.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_thresholds() {
        let profile = ExtractionProfile::default();
        assert_eq!(profile.min_question_length, 10);
        assert_eq!(profile.max_question_length, 500);
        assert_eq!(profile.accept_line_if.len(), 3);
    }

    #[test]
    fn test_named_profile_shallow_merges_over_default() {
        let yaml = r#"
default:
  min_question_length: 12
01_policies_and_procedures:
  question_headers: ["Examiner Questions"]
"#;
        let set = ProfileSet::from_yaml_str(yaml).unwrap();
        let profile = set.profile_for(Some("01_policies_and_procedures"));
        // overridden key
        assert_eq!(profile.question_headers, vec!["Examiner Questions"]);
        // inherited from the (customized) default
        assert_eq!(profile.min_question_length, 12);
        assert_eq!(profile.max_question_length, 500);
    }

    #[test]
    fn test_unknown_module_falls_back_to_default() {
        let set = ProfileSet::from_yaml_str("default: {}\n").unwrap();
        let profile = set.profile_for(Some("no_such_module"));
        assert_eq!(profile, ExtractionProfile::default());
    }

    #[test]
    fn test_unknown_keys_and_rules_are_inert() {
        let yaml = r#"
default:
  future_option: true
  accept_line_if: ["ends_with_question_mark", "sentiment_positive"]
"#;
        let set = ProfileSet::from_yaml_str(yaml).unwrap();
        let profile = set.profile_for(None);
        assert_eq!(
            profile.accept_line_if,
            vec![AcceptRule::EndsWithQuestionMark, AcceptRule::Unknown]
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let set = ProfileSet::from_yaml_str("").unwrap();
        assert_eq!(set.profile_for(None), ExtractionProfile::default());
    }
}
