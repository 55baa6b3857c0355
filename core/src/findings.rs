use crate::module::model::Module;
use crate::scoring::{ComplianceLevel, Scorecard};

const DEFAULT_POSITIVE: &str = "The control domain is Compliant.";
const DEFAULT_PARTIAL: &str = "Partial compliance was noted.";
const DEFAULT_NEGATIVE: &str = "The control domain is Non-compliant.";

/// Render finding text for a scored module: the outcome's template from
/// `finding_templates` (or its default wording), plus the calculated
/// score line when one exists.
pub fn generate_findings(module: &Module, scorecard: &Scorecard) -> Vec<String> {
    let templates = &module.finding_templates;

    let (template, fallback) = match scorecard.overall {
        ComplianceLevel::Pass => (&templates.positive, DEFAULT_POSITIVE),
        ComplianceLevel::Partial => (&templates.partial, DEFAULT_PARTIAL),
        ComplianceLevel::Fail | ComplianceLevel::NotApplicable => {
            (&templates.negative, DEFAULT_NEGATIVE)
        }
    };

    let mut findings = match template {
        Some(t) => t.lines(),
        None => vec![fallback.to_string()],
    };

    if !scorecard.score_display.is_empty() {
        findings.push(format!(
            "Calculated Score: {}. This justifies the {} rating.",
            scorecard.score_display, scorecard.overall
        ));
    }

    findings
}
