//! Logo rules: declared corner must match the computed one, and stay small.

use serde_json::{json, Value};

use crate::composition::{Composition, Layer, LayerKind, LogoLayer};
use crate::geometry;
use crate::rules::CompositionRule;
use crate::validation::{CheckResult, RuleCategory, Severity};

pub const CORNER_MARGIN: f64 = 3.0;

/// 15 x 15 square percentage points.
pub const MAX_LOGO_AREA: f64 = 225.0;
pub const SHRINK_MAX_DIMENSION: f64 = 12.0;

/// Move the logo to the corner nearest its current center and record it.
fn snap_to_nearest_corner(layer: &Layer, logo: &LogoLayer) -> Layer {
    let corner = geometry::nearest_corner(&layer.position);
    Layer {
        position: geometry::anchor_to_corner(&layer.position, corner, CORNER_MARGIN),
        kind: LayerKind::Logo(LogoLayer { corner_position: corner, ..logo.clone() }),
        ..layer.clone()
    }
}

pub struct LogoCornerRule;

impl LogoCornerRule {
    fn layer_passes(layer: &Layer, logo: &LogoLayer) -> bool {
        geometry::strict_corner(&layer.position) == Some(logo.corner_position)
    }
}

impl CompositionRule for LogoCornerRule {
    fn id(&self) -> &'static str { "logo_corner_position" }
    fn name(&self) -> &'static str { "Logo in declared corner" }
    fn description(&self) -> &'static str {
        "The logo must sit in a canvas corner matching its declared corner position"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Logo }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let layers: Vec<Value> = composition
            .logos()
            .map(|(layer, logo)| {
                let actual = geometry::strict_corner(&layer.position)
                    .map_or("middle", |c| c.as_str());
                json!({
                    "layerId": layer.id,
                    "declaredCorner": logo.corner_position.as_str(),
                    "actualCorner": actual,
                })
            })
            .collect();

        let passed = composition.logos().all(|(l, logo)| Self::layer_passes(l, logo));
        match layers.len() {
            0 => CheckResult::vacuous("no logo"),
            // A single logo keeps its fields at the top level.
            1 => CheckResult::new(passed, layers.into_iter().next().unwrap_or(Value::Null)),
            _ => CheckResult::new(passed, json!({ "layers": layers })),
        }
    }

    fn auto_fix_available(&self) -> bool { true }

    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        Some(composition.map_layers(|layer| match layer.as_logo() {
            Some(logo) if !Self::layer_passes(layer, logo) => snap_to_nearest_corner(layer, logo),
            _ => layer.clone(),
        }))
    }
}

pub struct LogoSizeRule;

impl LogoSizeRule {
    fn layer_passes(layer: &Layer) -> bool {
        layer.position.area() <= MAX_LOGO_AREA
    }
}

impl CompositionRule for LogoSizeRule {
    fn id(&self) -> &'static str { "logo_size" }
    fn name(&self) -> &'static str { "Logo size ceiling" }
    fn description(&self) -> &'static str {
        "The logo must not cover more than 15 x 15 percent of the canvas"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Logo }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let layers: Vec<Value> = composition
            .logos()
            .map(|(layer, _)| {
                json!({
                    "layerId": layer.id,
                    "area": layer.position.area(),
                    "maxArea": MAX_LOGO_AREA,
                })
            })
            .collect();

        if layers.is_empty() {
            return CheckResult::vacuous("no logo");
        }
        let passed = composition.logos().all(|(l, _)| Self::layer_passes(l));
        CheckResult::new(passed, json!({ "layers": layers }))
    }

    fn auto_fix_available(&self) -> bool { true }

    // Shrink first, then re-anchor in the nearest corner.
    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        Some(composition.map_layers(|layer| match layer.as_logo() {
            Some(logo) if !Self::layer_passes(layer) => {
                let shrunk = layer.with_position(geometry::scale_to_max_dimension(
                    &layer.position,
                    SHRINK_MAX_DIMENSION,
                ));
                snap_to_nearest_corner(&shrunk, logo)
            }
            _ => layer.clone(),
        }))
    }
}
