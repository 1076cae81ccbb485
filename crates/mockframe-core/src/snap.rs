//! Snap functionality for aligning points to the grid and lines to angles.

use kurbo::Point;

/// Default grid size in world units (matches the visual grid).
pub const DEFAULT_GRID_SIZE: f64 = 10.0;

/// Angle snap increment in degrees for line/arrow drawing.
pub const ANGLE_SNAP_INCREMENT: f64 = 45.0;

/// Snap a scalar to the nearest multiple of `grid_size`.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    (value / grid_size).round() * grid_size
}

/// Snap a point to the nearest grid intersection, each axis independently.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Snap `point` to the grid unless `precise` is set.
pub fn snap_unless_precise(point: Point, grid_size: f64, precise: bool) -> Point {
    if precise {
        point
    } else {
        snap_to_grid(point, grid_size)
    }
}

/// Snap an angle (radians) to the nearest multiple of `increment_degrees`.
pub fn snap_angle(angle: f64, increment_degrees: f64) -> f64 {
    let step = increment_degrees.to_radians();
    (angle / step).round() * step
}

/// Snap a line endpoint to the nearest 45° direction from `start`.
///
/// The distance from `start` is preserved; only the direction changes.
pub fn snap_line_endpoint(start: Point, end: Point) -> Point {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let distance = dx.hypot(dy);
    let angle = snap_angle(dy.atan2(dx), ANGLE_SNAP_INCREMENT);

    Point::new(
        start.x + distance * angle.cos(),
        start.y + distance * angle.sin(),
    )
}

/// Integer grid cell containing a world coordinate: `round(world / grid_size)`.
pub fn cell_index(value: f64, grid_size: f64) -> i64 {
    (value / grid_size).round() as i64
}
