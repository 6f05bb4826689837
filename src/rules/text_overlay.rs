//! Text overlay rules: zones, collision with the central object, length.

use serde_json::{json, Value};

use crate::composition::{Composition, Layer, LayerKind, Position, TextPlacement, TextOverlayLayer};
use crate::geometry::{self, CANVAS_CENTER};
use crate::rules::CompositionRule;
use crate::validation::{CheckResult, RuleCategory, Severity};

pub const TOP_ZONE: (f64, f64) = (0.0, 30.0);
pub const BOTTOM_ZONE: (f64, f64) = (70.0, 100.0);
pub const TOP_ANCHOR_Y: f64 = 5.0;
pub const BOTTOM_ANCHOR_EDGE: f64 = 85.0;

/// Percentage of the text layer's own area that may touch the object.
pub const OVERLAP_TOLERANCE: f64 = 5.0;
pub const OVERLAP_MARGIN: f64 = 5.0;

pub const MIN_TEXT_CHARS: usize = 3;
pub const MAX_TEXT_CHARS: usize = 100;

fn in_range(value: f64, (lo, hi): (f64, f64)) -> bool {
    value >= lo && value <= hi
}

/// Keep a box of `height` on the canvas vertically.
fn clamp_y(y: f64, height: f64) -> f64 {
    y.min(100.0 - height).max(0.0)
}

fn replace_text(layer: &Layer, text: &TextOverlayLayer, position: Position, placement: TextPlacement) -> Layer {
    Layer {
        position,
        kind: LayerKind::TextOverlay(TextOverlayLayer { placement, ..text.clone() }),
        ..layer.clone()
    }
}

pub struct TextZoneRule;

impl TextZoneRule {
    fn layer_passes(layer: &Layer, text: &TextOverlayLayer) -> bool {
        let (_, cy) = layer.position.center();
        let placement_ok = matches!(text.placement, TextPlacement::Top | TextPlacement::Bottom);
        placement_ok && (in_range(cy, TOP_ZONE) || in_range(cy, BOTTOM_ZONE))
    }

    /// Default `y` for a zone placement; `None` for center.
    fn anchor_y(placement: TextPlacement, height: f64) -> Option<f64> {
        match placement {
            TextPlacement::Top => Some(TOP_ANCHOR_Y),
            TextPlacement::Bottom => Some(BOTTOM_ANCHOR_EDGE - height),
            TextPlacement::Center => None,
        }
    }
}

impl CompositionRule for TextZoneRule {
    fn id(&self) -> &'static str { "text_overlay_zone" }
    fn name(&self) -> &'static str { "Text in safe zone" }
    fn description(&self) -> &'static str {
        "Text overlays must be placed top or bottom, centered within the top 30% or bottom 30% of the canvas"
    }
    fn category(&self) -> RuleCategory { RuleCategory::TextOverlay }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let layers: Vec<Value> = composition
            .text_overlays()
            .map(|(layer, text)| {
                let (_, cy) = layer.position.center();
                json!({
                    "layerId": layer.id,
                    "placement": text.placement.as_str(),
                    "centerY": cy,
                    "inTopZone": in_range(cy, TOP_ZONE),
                    "inBottomZone": in_range(cy, BOTTOM_ZONE),
                    "passed": Self::layer_passes(layer, text),
                })
            })
            .collect();

        if layers.is_empty() {
            return CheckResult::vacuous("no text overlay");
        }
        let passed = composition.text_overlays().all(|(l, t)| Self::layer_passes(l, t));
        CheckResult::new(passed, json!({ "layers": layers }))
    }

    fn auto_fix_available(&self) -> bool { true }

    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        Some(composition.map_layers(|layer| match layer.as_text_overlay() {
            Some(text) if !Self::layer_passes(layer, text) => {
                // Overlays taller than a zone can never pass; once anchored they stay put.
                if Self::anchor_y(text.placement, layer.position.height) == Some(layer.position.y) {
                    return layer.clone();
                }
                let (_, cy) = layer.position.center();
                let (placement, y) = if cy < CANVAS_CENTER {
                    (TextPlacement::Top, TOP_ANCHOR_Y)
                } else {
                    (TextPlacement::Bottom, BOTTOM_ANCHOR_EDGE - layer.position.height)
                };
                replace_text(layer, text, Position { y, ..layer.position }, placement)
            }
            _ => layer.clone(),
        }))
    }
}

pub struct TextOverlapRule;

impl CompositionRule for TextOverlapRule {
    fn id(&self) -> &'static str { "text_overlay_no_overlap" }
    fn name(&self) -> &'static str { "Text clear of central object" }
    fn description(&self) -> &'static str {
        "Text overlays must not cover more than 5% of their area over the central object"
    }
    fn category(&self) -> RuleCategory { RuleCategory::TextOverlay }
    fn severity(&self) -> Severity { Severity::Error }

    fn check(&self, composition: &Composition) -> CheckResult {
        let Some((object, _)) = composition.central_object() else {
            return CheckResult::vacuous("no central object");
        };

        let mut passed = true;
        let layers: Vec<Value> = composition
            .text_overlays()
            .map(|(layer, _)| {
                let percent = geometry::overlap_percent(&layer.position, &object.position);
                passed &= percent <= OVERLAP_TOLERANCE;
                json!({ "layerId": layer.id, "overlapPercent": percent })
            })
            .collect();

        if layers.is_empty() {
            return CheckResult::vacuous("no text overlay");
        }
        CheckResult::new(
            passed,
            json!({
                "objectId": object.id,
                "tolerance": OVERLAP_TOLERANCE,
                "layers": layers,
            }),
        )
    }

    fn auto_fix_available(&self) -> bool { true }

    // Only `y` moves. The text goes above or below the object according to
    // its placement, clamped to the canvas if the margin would overshoot.
    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        let Some((object, _)) = composition.central_object() else {
            return Some(composition.clone());
        };
        let obj = object.position;

        Some(composition.map_layers(|layer| {
            let Some(text) = layer.as_text_overlay() else {
                return layer.clone();
            };
            let pos = layer.position;
            if geometry::overlap_percent(&pos, &obj) <= OVERLAP_TOLERANCE {
                return layer.clone();
            }

            let above = match text.placement {
                TextPlacement::Top => true,
                TextPlacement::Bottom => false,
                TextPlacement::Center => pos.center().1 < obj.center().1,
            };
            let target = if above {
                obj.y - pos.height - OVERLAP_MARGIN
            } else {
                obj.bottom() + OVERLAP_MARGIN
            };
            layer.with_position(Position { y: clamp_y(target, pos.height), ..pos })
        }))
    }
}

pub struct TextLengthRule;

impl CompositionRule for TextLengthRule {
    fn id(&self) -> &'static str { "text_overlay_length" }
    fn name(&self) -> &'static str { "Text length" }
    fn description(&self) -> &'static str {
        "Text overlays must contain between 3 and 100 characters"
    }
    fn category(&self) -> RuleCategory { RuleCategory::TextOverlay }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let mut passed = true;
        let layers: Vec<Value> = composition
            .text_overlays()
            .map(|(layer, text)| {
                let length = text.text.trim().chars().count();
                let problem = if length == 0 {
                    Some("missing")
                } else if length < MIN_TEXT_CHARS {
                    Some("too_short")
                } else if length > MAX_TEXT_CHARS {
                    Some("too_long")
                } else {
                    None
                };
                passed &= problem.is_none();
                json!({ "layerId": layer.id, "length": length, "problem": problem })
            })
            .collect();

        if layers.is_empty() {
            return CheckResult::vacuous("no text overlay");
        }
        CheckResult::new(passed, json!({ "layers": layers }))
    }
}
