//! Auto-Fix Orchestrator
//!
//! Fixes are caller-sequenced: each fix is fed the output of the previous
//! one. Nothing here fails; unfixable requests come back as a status.

use serde::{Deserialize, Serialize};

use crate::composition::Composition;
use crate::rules::{self, CompositionRule};
use crate::validation::{ValidationReport, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    /// The fix produced a different composition.
    Applied,
    /// The fix ran and had nothing to change.
    Unchanged,
    /// The rule exists but has no auto-fix.
    NotFixable,
    UnknownRule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixOutcome {
    pub composition: Composition,
    pub status: FixStatus,
}

impl FixOutcome {
    pub fn changed(&self) -> bool {
        self.status == FixStatus::Applied
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFixOutcome {
    pub composition: Composition,
    pub changed_rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixLoopOutcome {
    pub composition: Composition,
    pub report: ValidationReport,
    pub passes: u32,
    pub changed_rules: Vec<String>,
}

/// Run one rule's fix, whatever its current check result.
pub fn apply_rule_fix(composition: &Composition, rule: &dyn CompositionRule) -> FixOutcome {
    match rule.auto_fix(composition) {
        None => FixOutcome {
            composition: composition.clone(),
            status: FixStatus::NotFixable,
        },
        Some(fixed) => {
            let status = if &fixed == composition {
                FixStatus::Unchanged
            } else {
                FixStatus::Applied
            };
            FixOutcome { composition: fixed, status }
        }
    }
}

pub fn apply_fix(composition: &Composition, rule_id: &str) -> FixOutcome {
    match rules::find_rule(rule_id) {
        Some(rule) => apply_rule_fix(composition, rule),
        None => FixOutcome {
            composition: composition.clone(),
            status: FixStatus::UnknownRule,
        },
    }
}

/// Apply every fixable, currently failing rule of `rules` in order.
pub fn apply_fixes(composition: &Composition, rules: &[&'static dyn CompositionRule]) -> BatchFixOutcome {
    let mut current = composition.clone();
    let mut changed_rules = vec![];

    for rule in rules.iter().filter(|r| r.auto_fix_available()) {
        if rule.check(&current).passed {
            continue;
        }
        let outcome = apply_rule_fix(&current, *rule);
        if outcome.changed() {
            changed_rules.push(rule.id().to_string());
            current = outcome.composition;
        }
    }

    BatchFixOutcome { composition: current, changed_rules }
}

/// Batch fix over the full registry.
pub fn apply_all_fixes(composition: &Composition) -> BatchFixOutcome {
    apply_fixes(composition, rules::all_rules())
}

/// Fix and re-validate until the report is valid, a pass changes nothing,
/// or the passes run out. Warnings alone do not start a pass.
pub fn fix_until_clean(composition: &Composition, validator: &Validator, max_passes: u32) -> FixLoopOutcome {
    let mut current = composition.clone();
    let mut report = validator.validate(&current);
    let mut changed_rules: Vec<String> = vec![];
    let mut passes = 0;

    while passes < max_passes && !report.is_valid {
        let batch = apply_fixes(&current, validator.rules());
        passes += 1;
        if batch.changed_rules.is_empty() {
            break;
        }
        for id in batch.changed_rules {
            if !changed_rules.contains(&id) {
                changed_rules.push(id);
            }
        }
        current = batch.composition;
        report = validator.validate(&current);
    }

    FixLoopOutcome { composition: current, report, passes, changed_rules }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{Corner, Position, TextPlacement};
    use crate::rules::fixtures::*;
    use crate::validation::RuleCategory;

    fn messy() -> Composition {
        let comp = composition(vec![
            central_object("Industrial Robot Arm", Position::new(0.0, 0.0, 150.0, 100.0)),
            text_overlay("headline", "Robots that weld", TextPlacement::Bottom, Position::new(10.0, 45.0, 80.0, 10.0)),
            logo("logo", Corner::BottomRight, Position::new(40.0, 40.0, 10.0, 10.0)),
        ]);
        with_alt_text(comp, "robot robot robot welding a car door on an assembly line")
    }

    #[test]
    fn test_apply_fix_statuses() {
        let comp = messy();
        assert_eq!(apply_fix(&comp, "does_not_exist").status, FixStatus::UnknownRule);
        assert_eq!(apply_fix(&comp, "text_overlay_length").status, FixStatus::NotFixable);
        assert_eq!(apply_fix(&comp, "canvas_dimensions").status, FixStatus::Unchanged);

        let outcome = apply_fix(&comp, "logo_corner_position");
        assert_eq!(outcome.status, FixStatus::Applied);
        assert_eq!(outcome.composition.layers[2].position, Position::new(3.0, 3.0, 10.0, 10.0));
        // Source is untouched.
        assert_eq!(comp.layers[2].position, Position::new(40.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn test_batch_reports_changed_rules_in_registry_order() {
        let batch = apply_all_fixes(&messy());
        assert_eq!(
            batch.changed_rules,
            vec![
                "central_object_centered",
                "central_object_visible",
                "text_overlay_zone",
                "text_overlay_no_overlap",
                "logo_corner_position",
                "alt_text_keyword_stuffing",
                "metadata_complete",
            ]
        );
        // Centering alone pushed the oversized object off canvas; the
        // visibility fix then shrank and re-centered it.
        let object = batch.composition.central_object().unwrap().0.position;
        assert_eq!(object, Position::new(5.0, 20.0, 90.0, 60.0));
        // Zone fix anchored the text at 75, overlap fix pushed it below the object.
        assert_eq!(batch.composition.layers[1].position.y, 85.0);
    }

    #[test]
    fn test_fix_until_clean_reaches_valid_report() {
        let outcome = fix_until_clean(&messy(), &Validator::new(), 5);
        assert!(outcome.report.is_valid, "{:?}", outcome.report.errors);
        assert!(outcome.passes >= 1);

        let again = fix_until_clean(&outcome.composition, &Validator::new(), 5);
        assert!(again.changed_rules.is_empty());
        assert_eq!(again.composition, outcome.composition);
    }

    #[test]
    fn test_fix_until_clean_stops_on_valid_report() {
        // Middle logo: a warning only, so the report is already valid.
        let comp = composition(vec![logo("logo", Corner::BottomRight, Position::new(40.0, 40.0, 10.0, 10.0))]);
        let validator = Validator::with_rules(rules::rules_by_category(RuleCategory::Logo));
        let outcome = fix_until_clean(&comp, &validator, 5);
        assert!(outcome.report.is_valid);
        assert_eq!(outcome.report.warnings.len(), 1);
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.composition, comp);
    }

    #[test]
    fn test_fix_until_clean_respects_zero_passes() {
        let outcome = fix_until_clean(&messy(), &Validator::new(), 0);
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.composition, messy());
    }
}
