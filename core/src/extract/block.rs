/// Named block boundaries for label-driven extraction.
///
/// Profiles own these so new document shapes can add labels without
/// touching the extraction logic. Matching is literal substring search
/// with the caller's exact casing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlockLabels {
    /// Labels whose blocks feed `evaluation_criteria`.
    pub criteria: Vec<String>,
    /// Labels whose blocks feed `required_evidence`.
    pub evidence: Vec<String>,
    /// Labels whose blocks feed the question parser.
    pub questions: Vec<String>,
    /// Label for the module-level control objective.
    pub objective: Vec<String>,
    /// Every label that terminates a block.
    pub stops: Vec<String>,
}

impl Default for BlockLabels {
    fn default() -> Self {
        BlockLabels {
            criteria: vec![
                "Core Assessment:".to_string(),
                "Core+ Assessment:".to_string(),
            ],
            evidence: vec![
                "Document Request:".to_string(),
                "Document Review List:".to_string(),
            ],
            questions: vec!["Questions:".to_string()],
            objective: vec!["Objective:".to_string()],
            stops: vec![
                "Objective:".to_string(),
                "Core Assessment:".to_string(),
                "Core+ Assessment:".to_string(),
                "Positive Finding:".to_string(),
                "Negative Finding:".to_string(),
                "Questions:".to_string(),
                "Document Request:".to_string(),
                "Document Review List:".to_string(),
                "Area of Focus:".to_string(),
                "Rating Criteria".to_string(),
                "Recommendations".to_string(),
                "Remediation:".to_string(),
                "Stmt ".to_string(),
            ],
        }
    }
}

impl BlockLabels {
    /// Stop labels applicable after `start_label`; the start label itself is
    /// excluded so repeated text inside the block does not truncate it.
    pub fn stops_for<'a>(&'a self, start_label: &str) -> Vec<&'a str> {
        self.stops
            .iter()
            .map(|s| s.as_str())
            .filter(|s| *s != start_label)
            .collect()
    }
}

/// Text after the first occurrence of `start_label` up to the
/// earliest-occurring member of `stop_labels`, or end of body.
///
/// An absent start label is a normal outcome for optional sections and
/// returns `None`, never an error.
pub fn extract_block(body: &str, start_label: &str, stop_labels: &[&str]) -> Option<String> {
    let start_idx = body.find(start_label)? + start_label.len();
    let rest = &body[start_idx..];

    let end_idx = stop_labels
        .iter()
        .filter_map(|label| rest.find(label))
        .min()
        .unwrap_or(rest.len());

    Some(rest[..end_idx].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_between_labels() {
        let body = "Objective: keep records safe.\nDocument Request:\n- retention policy\nPositive Finding: good.";
        let block = extract_block(
            body,
            "Document Request:",
            &["Positive Finding:", "Negative Finding:"],
        );
        assert_eq!(block.as_deref(), Some("- retention policy"));
    }

    #[test]
    fn test_missing_start_label_is_none() {
        let block = extract_block("nothing labeled here", "Questions:", &["Stmt "]);
        assert!(block.is_none());
    }

    #[test]
    fn test_earliest_stop_label_wins() {
        let body = "Questions:\nq one\nNegative Finding: later.\nPositive Finding: earlier? no, after.";
        let block = extract_block(
            body,
            "Questions:",
            &["Positive Finding:", "Negative Finding:"],
        );
        assert_eq!(block.as_deref(), Some("q one"));
    }

    #[test]
    fn test_no_stop_label_runs_to_end() {
        let body = "Core Assessment:\nreviewed the program";
        let block = extract_block(body, "Core Assessment:", &["Stmt "]);
        assert_eq!(block.as_deref(), Some("reviewed the program"));
    }

    #[test]
    fn test_stops_for_excludes_start_label() {
        let labels = BlockLabels::default();
        let stops = labels.stops_for("Questions:");
        assert!(!stops.contains(&"Questions:"));
        assert!(stops.contains(&"Document Request:"));
    }
}
