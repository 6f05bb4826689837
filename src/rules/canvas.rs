//! Canvas rules: dimensions and aspect ratio.

use serde_json::json;

use crate::composition::Composition;
use crate::rules::CompositionRule;
use crate::validation::{CheckResult, RuleCategory, Severity};

pub const DEFAULT_CANVAS: (i32, i32) = (1200, 630);
pub const WIDTH_RANGE: (i32, i32) = (600, 2400);
pub const HEIGHT_RANGE: (i32, i32) = (300, 1600);

pub const ASPECT_TOLERANCE: f64 = 0.1;

/// Named ratios accepted by the social platforms we export to.
pub const NAMED_RATIOS: &[(&str, f64)] = &[
    ("16:9", 16.0 / 9.0),
    ("1.91:1", 1.91),
    ("2:1", 2.0),
    ("4:3", 4.0 / 3.0),
    ("3:2", 1.5),
    ("1:1", 1.0),
];

fn within((lo, hi): (i32, i32), value: i32) -> bool {
    value >= lo && value <= hi
}

pub struct CanvasDimensionsRule;

impl CompositionRule for CanvasDimensionsRule {
    fn id(&self) -> &'static str { "canvas_dimensions" }
    fn name(&self) -> &'static str { "Canvas dimensions defined" }
    fn description(&self) -> &'static str {
        "Canvas must have positive dimensions within 600-2400 x 300-1600"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Canvas }
    fn severity(&self) -> Severity { Severity::Error }

    fn check(&self, composition: &Composition) -> CheckResult {
        let (w, h) = (composition.canvas_width, composition.canvas_height);
        let positive = w > 0 && h > 0;
        let reasonable = within(WIDTH_RANGE, w) && within(HEIGHT_RANGE, h);

        CheckResult::new(
            positive && reasonable,
            json!({
                "width": w,
                "height": h,
                "positive": positive,
                "withinRange": reasonable,
                "widthRange": [WIDTH_RANGE.0, WIDTH_RANGE.1],
                "heightRange": [HEIGHT_RANGE.0, HEIGHT_RANGE.1],
            }),
        )
    }

    fn auto_fix_available(&self) -> bool { true }

    // Only missing (zero or negative) sides are filled. A positive size
    // outside the range is left for a human: the check keeps failing.
    fn auto_fix(&self, composition: &Composition) -> Option<Composition> {
        let mut fixed = composition.clone();
        if fixed.canvas_width <= 0 {
            fixed.canvas_width = DEFAULT_CANVAS.0;
        }
        if fixed.canvas_height <= 0 {
            fixed.canvas_height = DEFAULT_CANVAS.1;
        }
        Some(fixed)
    }
}

pub struct AspectRatioRule;

impl CompositionRule for AspectRatioRule {
    fn id(&self) -> &'static str { "canvas_aspect_ratio" }
    fn name(&self) -> &'static str { "Standard aspect ratio" }
    fn description(&self) -> &'static str {
        "Canvas should match a standard aspect ratio (16:9, 1.91:1, 2:1, 4:3, 3:2, 1:1)"
    }
    fn category(&self) -> RuleCategory { RuleCategory::Canvas }
    fn severity(&self) -> Severity { Severity::Warning }

    fn check(&self, composition: &Composition) -> CheckResult {
        let (w, h) = (composition.canvas_width, composition.canvas_height);
        if w <= 0 || h <= 0 {
            return CheckResult::new(false, json!({ "width": w, "height": h, "matched": null }));
        }

        let ratio = f64::from(w) / f64::from(h);
        let matched = NAMED_RATIOS
            .iter()
            .find(|(_, r)| (ratio - r).abs() <= ASPECT_TOLERANCE)
            .map(|(name, _)| *name);

        CheckResult::new(
            matched.is_some(),
            json!({
                "ratio": ratio,
                "matched": matched,
                "tolerance": ASPECT_TOLERANCE,
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::fixtures::*;

    fn canvas(w: i32, h: i32) -> Composition {
        Composition { canvas_width: w, canvas_height: h, ..composition(vec![]) }
    }

    #[test]
    fn test_dimension_envelope() {
        assert!(CanvasDimensionsRule.check(&canvas(1200, 630)).passed);
        assert!(CanvasDimensionsRule.check(&canvas(600, 300)).passed);
        assert!(!CanvasDimensionsRule.check(&canvas(0, 630)).passed);
        assert!(!CanvasDimensionsRule.check(&canvas(4000, 630)).passed);
    }

    #[test]
    fn test_fix_fills_only_missing_sides() {
        let fixed = CanvasDimensionsRule.auto_fix(&canvas(-1, 0)).unwrap();
        assert_eq!((fixed.canvas_width, fixed.canvas_height), (1200, 630));
        assert!(CanvasDimensionsRule.check(&fixed).passed);

        let partial = CanvasDimensionsRule.auto_fix(&canvas(0, 900)).unwrap();
        assert_eq!((partial.canvas_width, partial.canvas_height), (1200, 900));
    }

    #[test]
    fn test_fix_leaves_oversized_canvas() {
        let comp = canvas(4000, 3000);
        let fixed = CanvasDimensionsRule.auto_fix(&comp).unwrap();
        assert_eq!(fixed, comp);
        assert!(!CanvasDimensionsRule.check(&fixed).passed);
    }

    #[test]
    fn test_aspect_ratio_table() {
        let ratio_of = |w, h| {
            AspectRatioRule.check(&canvas(w, h)).details.unwrap()["matched"].clone()
        };
        assert_eq!(ratio_of(1200, 630), "1.91:1");
        assert_eq!(ratio_of(1920, 1080), "16:9");
        assert_eq!(ratio_of(1000, 1000), "1:1");
        assert!(ratio_of(1000, 300).is_null());
        assert!(!AspectRatioRule.check(&canvas(0, 0)).passed);
        assert!(AspectRatioRule.auto_fix(&canvas(1000, 300)).is_none());
    }
}
