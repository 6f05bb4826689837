//! Central object placement: centering and canvas bounds.

use serde_json::json;

use crate::composition::Composition;
use crate::geometry::{self, CANVAS_CENTER};
use crate::rules::CompositionRule;
use crate::validation::{CheckResult, RuleCategory, Severity};

/// Allowed distance (percentage points, inclusive) between object and canvas centers.
pub const CENTER_TOLERANCE: f64 = 10.0;

/// Target size for the overflowing side when shrinking an oversized object.
pub const FIT_TARGET: f64 = 90.0;

pub struct CenteringRule;

impl CompositionRule for CenteringRule {
    fn id(&self) -> &'static str { "central_object_centered" }
    fn name(&self) -> &'static str { "Central object centered" }
    fn description(&self) -> &'static str {
        "The central object must sit within 10 points of the canvas center on both axes"
    }
    fn category(&self) -> RuleCategory { RuleCategory::CentralObject }
    fn severity(&self) -> Severity { Severity::Error }

    fn check(&self, composition: &Composition) -> CheckResult {
        let Some((layer, object)) = composition.central_object() else {
            return CheckResult::vacuous("no central object");
        };
        if !object.centered_enforced {
            return CheckResult::vacuous("centering not enforced");
        }

        let (cx, cy) = layer.position.center();
        let offset_x = (cx - CANVAS_CENTER).abs();
        let offset_y = (cy - CANVAS_CENTER).abs();

        CheckResult::new(
            offset_x <= CENTER_TOLERANCE && offset_y <= CENTER_TOLERANCE,
            json!({
                "layerId": layer.id,
                "center": { "x": cx, "y": cy },
                "offset": { "x": offset_x, "y": offset_y },
                "tolerance": CENTER_TOLERANCE,
            }),
        )
    }

    fn auto_fix_available(&self) -> bool { true }

    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        if self.check(composition).passed {
            return Some(composition.clone());
        }
        let Some((layer, _)) = composition.central_object() else {
            return Some(composition.clone());
        };
        let fixed = layer.with_position(geometry::centered(&layer.position));
        Some(composition.with_layer(fixed))
    }
}

pub struct VisibilityRule;

impl CompositionRule for VisibilityRule {
    fn id(&self) -> &'static str { "central_object_visible" }
    fn name(&self) -> &'static str { "Central object fully visible" }
    fn description(&self) -> &'static str {
        "The central object must lie entirely inside the canvas"
    }
    fn category(&self) -> RuleCategory { RuleCategory::CentralObject }
    fn severity(&self) -> Severity { Severity::Error }

    fn check(&self, composition: &Composition) -> CheckResult {
        let Some((layer, object)) = composition.central_object() else {
            return CheckResult::vacuous("no central object");
        };
        if !object.visibility_enforced {
            return CheckResult::vacuous("visibility not enforced");
        }

        let pos = &layer.position;
        let mut overflow = vec![];
        if pos.x < 0.0 {
            overflow.push("left");
        }
        if pos.y < 0.0 {
            overflow.push("top");
        }
        if pos.right() > 100.0 {
            overflow.push("right");
        }
        if pos.bottom() > 100.0 {
            overflow.push("bottom");
        }

        CheckResult::new(
            overflow.is_empty(),
            json!({
                "layerId": layer.id,
                "position": pos,
                "overflowEdges": overflow,
            }),
        )
    }

    fn auto_fix_available(&self) -> bool { true }

    // Scale before translating: moving an oversized box can never make it fit.
    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        if self.check(composition).passed {
            return Some(composition.clone());
        }
        let Some((layer, _)) = composition.central_object() else {
            return Some(composition.clone());
        };
        let scaled = geometry::shrink_oversized(&layer.position, FIT_TARGET);
        let fixed = layer.with_position(geometry::centered(&scaled));
        Some(composition.with_layer(fixed))
    }
}
