use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A normalized checklist response for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseValue {
    Yes,
    Partial,
    No,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl ResponseValue {
    /// Scoring weight; `None` excludes the question from the denominator.
    pub fn weight(self) -> Option<f64> {
        match self {
            ResponseValue::Yes => Some(1.0),
            ResponseValue::Partial => Some(0.5),
            ResponseValue::No => Some(0.0),
            ResponseValue::NotApplicable => None,
        }
    }
}

/// Responses keyed by question ID.
pub type Responses = BTreeMap<String, ResponseValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceLevel {
    Pass,
    Partial,
    Fail,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplianceLevel::Pass => "Pass",
            ComplianceLevel::Partial => "Partial",
            ComplianceLevel::Fail => "Fail",
            ComplianceLevel::NotApplicable => "N/A",
        };
        f.write_str(label)
    }
}

/// Weighted compliance summary for one module's responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    pub overall: ComplianceLevel,
    pub score: f64,
    /// Rendered as "0.75 (75%)" for reports.
    pub score_display: String,
    pub yes_count: usize,
    pub partial_count: usize,
    pub no_count: usize,
    pub not_applicable_count: usize,
}

/// Fraction of the maximum possible score, N/A responses excluded.
/// Zero when nothing is scorable.
pub fn score_percentage(responses: &Responses) -> f64 {
    let mut total = 0.0;
    let mut max_possible = 0.0;
    for value in responses.values() {
        if let Some(weight) = value.weight() {
            total += weight;
            max_possible += 1.0;
        }
    }
    if max_possible == 0.0 {
        0.0
    } else {
        total / max_possible
    }
}

/// Score responses into a scorecard: >= 0.8 passes, >= 0.5 is partial,
/// anything lower fails; no scorable responses at all is N/A.
pub fn generate_scorecard(responses: &Responses) -> Scorecard {
    let mut counts = [0usize; 4];
    for value in responses.values() {
        let idx = match value {
            ResponseValue::Yes => 0,
            ResponseValue::Partial => 1,
            ResponseValue::No => 2,
            ResponseValue::NotApplicable => 3,
        };
        counts[idx] += 1;
    }

    let scorable = counts[0] + counts[1] + counts[2];
    if scorable == 0 {
        return Scorecard {
            overall: ComplianceLevel::NotApplicable,
            score: 0.0,
            score_display: String::new(),
            yes_count: counts[0],
            partial_count: counts[1],
            no_count: counts[2],
            not_applicable_count: counts[3],
        };
    }

    let score = score_percentage(responses);
    let overall = if score >= 0.8 {
        ComplianceLevel::Pass
    } else if score >= 0.5 {
        ComplianceLevel::Partial
    } else {
        ComplianceLevel::Fail
    };

    Scorecard {
        overall,
        score,
        score_display: format!("{:.2} ({}%)", score, (score * 100.0) as i64),
        yes_count: counts[0],
        partial_count: counts[1],
        no_count: counts[2],
        not_applicable_count: counts[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn responses(values: &[(&str, ResponseValue)]) -> Responses {
        values
            .iter()
            .map(|(id, v)| (id.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_all_yes_passes() {
        let r = responses(&[
            ("q1", ResponseValue::Yes),
            ("q2", ResponseValue::Yes),
        ]);
        let card = generate_scorecard(&r);
        assert_eq!(card.overall, ComplianceLevel::Pass);
        assert_eq!(card.score, 1.0);
        assert_eq!(card.score_display, "1.00 (100%)");
    }

    #[test]
    fn test_partial_band() {
        let r = responses(&[
            ("q1", ResponseValue::Yes),
            ("q2", ResponseValue::No),
        ]);
        let card = generate_scorecard(&r);
        assert_eq!(card.overall, ComplianceLevel::Partial);
        assert_eq!(card.score, 0.5);
    }

    #[test]
    fn test_fail_band() {
        let r = responses(&[
            ("q1", ResponseValue::No),
            ("q2", ResponseValue::No),
            ("q3", ResponseValue::Partial),
        ]);
        let card = generate_scorecard(&r);
        assert_eq!(card.overall, ComplianceLevel::Fail);
    }

    #[test]
    fn test_na_excluded_from_denominator() {
        let r = responses(&[
            ("q1", ResponseValue::Yes),
            ("q2", ResponseValue::NotApplicable),
        ]);
        let card = generate_scorecard(&r);
        assert_eq!(card.overall, ComplianceLevel::Pass);
        assert_eq!(card.score, 1.0);
        assert_eq!(card.not_applicable_count, 1);
    }

    #[test]
    fn test_nothing_scorable_is_na() {
        let empty = Responses::new();
        assert_eq!(generate_scorecard(&empty).overall, ComplianceLevel::NotApplicable);

        let all_na = responses(&[("q1", ResponseValue::NotApplicable)]);
        let card = generate_scorecard(&all_na);
        assert_eq!(card.overall, ComplianceLevel::NotApplicable);
        assert_eq!(card.score, 0.0);
    }

    #[test]
    fn test_pass_threshold_boundary() {
        // 4 yes + 1 no = 0.8 exactly
        let r = responses(&[
            ("q1", ResponseValue::Yes),
            ("q2", ResponseValue::Yes),
            ("q3", ResponseValue::Yes),
            ("q4", ResponseValue::Yes),
            ("q5", ResponseValue::No),
        ]);
        assert_eq!(generate_scorecard(&r).overall, ComplianceLevel::Pass);
    }

    #[test]
    fn test_response_value_yaml_forms() {
        let v: ResponseValue = serde_yaml::from_str("\"N/A\"").unwrap();
        assert_eq!(v, ResponseValue::NotApplicable);
        let v: ResponseValue = serde_yaml::from_str("Partial").unwrap();
        assert_eq!(v, ResponseValue::Partial);
    }
}
