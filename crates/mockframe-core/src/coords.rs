//! World/screen coordinate conversion.
//!
//! World space is the document's own coordinate system. Screen space is
//! world space scaled by `zoom` and then translated by `pan`. Both functions
//! are pure; `zoom` is kept non-zero by the camera's clamp.

use kurbo::{Point, Rect, Vec2};

/// Map a world-space rectangle to screen space.
pub fn world_to_screen(rect: Rect, pan: Vec2, zoom: f64) -> Rect {
    Rect::from_origin_size(
        Point::new(rect.x0 * zoom + pan.x, rect.y0 * zoom + pan.y),
        (rect.width() * zoom, rect.height() * zoom),
    )
}

/// Map a world-space point to screen space.
pub fn world_point_to_screen(point: Point, pan: Vec2, zoom: f64) -> Point {
    Point::new(point.x * zoom + pan.x, point.y * zoom + pan.y)
}

/// Map a screen-space point back to world space.
pub fn screen_to_world(point: Point, pan: Vec2, zoom: f64) -> Point {
    Point::new((point.x - pan.x) / zoom, (point.y - pan.y) / zoom)
}

/// Normalised rectangle spanned by two corner points.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y))
}

/// Strict open-interval overlap test on all four sides.
///
/// Rectangles that merely touch do not overlap, and a zero-width or
/// zero-height rectangle only overlaps if the other one straddles it.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && a.x1 > b.x0 && a.y0 < b.y1 && a.y1 > b.y0
}
