//! Geometry helpers shared by the layout rules.
//!
//! All inputs and outputs are canvas percentages.

use crate::composition::{Corner, Position};

pub const CANVAS_CENTER: f64 = 50.0;

/// Area of the intersection of two axis-aligned boxes, 0 when disjoint.
pub fn intersection_area(a: &Position, b: &Position) -> f64 {
    let overlap_w = a.right().min(b.right()) - a.x.max(b.x);
    let overlap_h = a.bottom().min(b.bottom()) - a.y.max(b.y);
    if overlap_w <= 0.0 || overlap_h <= 0.0 {
        0.0
    } else {
        overlap_w * overlap_h
    }
}

/// Intersection expressed as a percentage of `subject`'s own area.
pub fn overlap_percent(subject: &Position, other: &Position) -> f64 {
    let area = subject.area();
    if area <= 0.0 {
        return 0.0;
    }
    intersection_area(subject, other) * 100.0 / area
}

/// Translate so the box center sits on the canvas center. Size is untouched.
pub fn centered(pos: &Position) -> Position {
    Position {
        x: CANVAS_CENTER - pos.width / 2.0,
        y: CANVAS_CENTER - pos.height / 2.0,
        ..*pos
    }
}

/// Uniform scale so that neither side exceeds 100, targeting `target` on the
/// overflowing side. Aspect ratio is preserved; origin is kept.
pub fn shrink_oversized(pos: &Position, target: f64) -> Position {
    let mut out = *pos;
    if out.width > 100.0 {
        let factor = target / out.width;
        out.width *= factor;
        out.height *= factor;
    }
    if out.height > 100.0 {
        let factor = target / out.height;
        out.width *= factor;
        out.height *= factor;
    }
    out
}

/// Uniform scale so the larger side equals `max_dimension`.
pub fn scale_to_max_dimension(pos: &Position, max_dimension: f64) -> Position {
    let largest = pos.width.max(pos.height);
    if largest <= 0.0 {
        return *pos;
    }
    let factor = max_dimension / largest;
    Position {
        width: pos.width * factor,
        height: pos.height * factor,
        ..*pos
    }
}

/// Strict corner classification: a center must sit below 25 or above 75 on
/// both axes. Anything else is the middle band and yields `None`.
pub fn strict_corner(pos: &Position) -> Option<Corner> {
    let (cx, cy) = pos.center();
    let left = if cx < 25.0 {
        true
    } else if cx > 75.0 {
        false
    } else {
        return None;
    };
    let top = if cy < 25.0 {
        true
    } else if cy > 75.0 {
        false
    } else {
        return None;
    };
    Some(corner_from(top, left))
}

/// Nearest quadrant by a plain midpoint split.
pub fn nearest_corner(pos: &Position) -> Corner {
    let (cx, cy) = pos.center();
    corner_from(cy < CANVAS_CENTER, cx < CANVAS_CENTER)
}

/// Place the box `margin` points from the two edges that meet at `corner`.
pub fn anchor_to_corner(pos: &Position, corner: Corner, margin: f64) -> Position {
    let x = if corner.is_left() { margin } else { 100.0 - margin - pos.width };
    let y = if corner.is_top() { margin } else { 100.0 - margin - pos.height };
    Position { x, y, ..*pos }
}

fn corner_from(top: bool, left: bool) -> Corner {
    match (top, left) {
        (true, true) => Corner::TopLeft,
        (true, false) => Corner::TopRight,
        (false, true) => Corner::BottomLeft,
        (false, false) => Corner::BottomRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection_disjoint_and_touching() {
        let a = Position::new(0.0, 0.0, 10.0, 10.0);
        let b = Position::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(intersection_area(&a, &b), 0.0);

        let c = Position::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(intersection_area(&a, &c), 25.0);
    }

    #[test]
    fn test_overlap_percent_of_subject() {
        let text = Position::new(0.0, 0.0, 100.0, 10.0);
        let obj = Position::new(0.0, 5.0, 100.0, 50.0);
        assert_eq!(overlap_percent(&text, &obj), 50.0);
        assert_eq!(overlap_percent(&Position::default(), &obj), 0.0);
    }

    #[test]
    fn test_shrink_preserves_aspect() {
        let pos = shrink_oversized(&Position::new(0.0, 0.0, 150.0, 100.0), 90.0);
        assert_eq!(pos.width, 90.0);
        assert_eq!(pos.height, 60.0);

        let tall = shrink_oversized(&Position::new(0.0, 0.0, 50.0, 200.0), 90.0);
        assert_eq!(tall.height, 90.0);
        assert_eq!(tall.width, 22.5);
    }

    #[test]
    fn test_corner_classification() {
        assert_eq!(strict_corner(&Position::new(2.0, 2.0, 10.0, 10.0)), Some(Corner::TopLeft));
        assert_eq!(strict_corner(&Position::new(85.0, 85.0, 10.0, 10.0)), Some(Corner::BottomRight));
        assert_eq!(strict_corner(&Position::new(40.0, 40.0, 10.0, 10.0)), None);
        assert_eq!(nearest_corner(&Position::new(40.0, 40.0, 10.0, 10.0)), Corner::TopLeft);
        assert_eq!(nearest_corner(&Position::new(45.0, 60.0, 10.0, 10.0)), Corner::BottomRight);
    }

    #[test]
    fn test_anchor_to_corner() {
        let pos = Position::new(40.0, 40.0, 10.0, 20.0);
        let br = anchor_to_corner(&pos, Corner::BottomRight, 3.0);
        assert_eq!((br.x, br.y), (87.0, 77.0));
        let tl = anchor_to_corner(&pos, Corner::TopLeft, 3.0);
        assert_eq!((tl.x, tl.y, tl.width, tl.height), (3.0, 3.0, 10.0, 20.0));
    }
}
