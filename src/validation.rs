//! Validation Engine - Rules Describe, Reports Aggregate
//!
//! Rules produce structured check results.
//! The report sorts failures by severity and scores them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::composition::Composition;
use crate::rules::{self, CompositionRule};

pub const ERROR_PENALTY: u32 = 15;
pub const WARNING_PENALTY: u32 = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        [Severity::Error, Severity::Warning].into_iter().find(|s| s.as_str() == name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    CentralObject,
    TextOverlay,
    Logo,
    Accessibility,
    Metadata,
    Canvas,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 6] = [
        RuleCategory::CentralObject,
        RuleCategory::TextOverlay,
        RuleCategory::Logo,
        RuleCategory::Accessibility,
        RuleCategory::Metadata,
        RuleCategory::Canvas,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::CentralObject => "central_object",
            RuleCategory::TextOverlay => "text_overlay",
            RuleCategory::Logo => "logo",
            RuleCategory::Accessibility => "accessibility",
            RuleCategory::Metadata => "metadata",
            RuleCategory::Canvas => "canvas",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single rule check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl CheckResult {
    /// Pass because the rule's subject layer does not exist.
    pub fn vacuous(reason: &str) -> Self {
        Self {
            passed: true,
            details: Some(serde_json::json!({ "skipped": reason })),
        }
    }

    pub fn new(passed: bool, details: Value) -> Self {
        Self { passed, details: Some(details) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule_id: String,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub rule_id: String,
    pub rule_name: String,
    pub category: RuleCategory,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    pub auto_fix_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub score: u32,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub rule_results: Vec<RuleResult>,
}

impl ValidationReport {
    pub fn failed_rule_ids(&self) -> Vec<&str> {
        self.rule_results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.rule_id.as_str())
            .collect()
    }

    pub fn result_for(&self, rule_id: &str) -> Option<&RuleResult> {
        self.rule_results.iter().find(|r| r.rule_id == rule_id)
    }
}

/// Severity-penalty score, saturating at zero.
pub fn score(error_count: usize, warning_count: usize) -> u32 {
    let errors = u32::try_from(error_count).unwrap_or(u32::MAX);
    let warnings = u32::try_from(warning_count).unwrap_or(u32::MAX);
    100u32
        .saturating_sub(errors.saturating_mul(ERROR_PENALTY))
        .saturating_sub(warnings.saturating_mul(WARNING_PENALTY))
}

/// Validator runs a rule selection against a composition
pub struct Validator {
    rules: Vec<&'static dyn CompositionRule>,
}

impl Validator {
    /// Full registry.
    pub fn new() -> Self {
        Self { rules: rules::all_rules().to_vec() }
    }

    pub fn with_rules(rules: Vec<&'static dyn CompositionRule>) -> Self {
        Self { rules }
    }

    /// Full registry minus the given rule ids.
    pub fn without(disabled: &[String]) -> Self {
        Self {
            rules: rules::all_rules()
                .iter()
                .copied()
                .filter(|r| !disabled.iter().any(|d| d == r.id()))
                .collect(),
        }
    }

    pub fn rules(&self) -> &[&'static dyn CompositionRule] {
        &self.rules
    }

    pub fn validate(&self, composition: &Composition) -> ValidationReport {
        let mut errors = vec![];
        let mut warnings = vec![];
        let mut rule_results = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let result = rule.check(composition);

            if !result.passed {
                let issue = ValidationIssue {
                    rule_id: rule.id().to_string(),
                    rule_name: rule.name().to_string(),
                    category: rule.category(),
                    severity: rule.severity(),
                    message: rule.description().to_string(),
                    details: result.details.clone(),
                    auto_fix_available: rule.auto_fix_available(),
                };
                match rule.severity() {
                    Severity::Error => errors.push(issue),
                    Severity::Warning => warnings.push(issue),
                }
            }

            rule_results.push(RuleResult {
                rule_id: rule.id().to_string(),
                passed: result.passed,
                details: result.details,
            });
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            score: score(errors.len(), warnings.len()),
            errors,
            warnings,
            rule_results,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate against the full registry.
pub fn validate(composition: &Composition) -> ValidationReport {
    Validator::new().validate(composition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_never_negative() {
        assert_eq!(score(0, 0), 100);
        assert_eq!(score(1, 1), 80);
        assert_eq!(score(7, 0), 0);
        assert_eq!(score(usize::MAX, usize::MAX), 0);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(RuleCategory::parse("logo"), Some(RuleCategory::Logo));
        assert_eq!(RuleCategory::parse("central_object"), Some(RuleCategory::CentralObject));
        assert_eq!(RuleCategory::parse("pixels"), None);
    }

    #[test]
    fn test_empty_composition_report() {
        // No layers; only canvas/metadata/alt-text rules have something to say.
        let comp = Composition::new("empty", 1200, 630);
        let report = validate(&comp);

        assert_eq!(report.rule_results.len(), rules::all_rules().len());
        for id in ["central_object_centered", "text_overlay_zone", "logo_size"] {
            assert!(report.result_for(id).unwrap().passed, "{id} should pass vacuously");
        }
        assert!(report.result_for("canvas_dimensions").unwrap().passed);
        assert!(!report.result_for("metadata_complete").unwrap().passed);
    }

    #[test]
    fn test_selected_rules_only() {
        let validator = Validator::with_rules(rules::rules_by_category(RuleCategory::Canvas));
        let report = validator.validate(&Composition::new("tiny", 100, 100));
        let ids: Vec<_> = report.rule_results.iter().map(|r| r.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["canvas_dimensions", "canvas_aspect_ratio"]);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.score, 85);
    }

    #[test]
    fn test_without_disabled_rules() {
        let validator = Validator::without(&["metadata_complete".to_string()]);
        assert_eq!(validator.rules().len(), rules::all_rules().len() - 1);
        assert!(validator.rules().iter().all(|r| r.id() != "metadata_complete"));
    }
}
