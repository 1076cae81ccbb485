//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::coords;
use crate::input::Modifiers;

/// Default lower zoom bound.
pub const MIN_ZOOM: f64 = 0.2;
/// Default upper zoom bound.
pub const MAX_ZOOM: f64 = 4.0;
/// Wheel delta to log-zoom factor.
pub const ZOOM_SENSITIVITY: f64 = 0.005;

/// Camera manages the view transform for the canvas.
///
/// `offset` is the screen-space pan. A world point `p` lands on screen at
/// `p * zoom + offset`. The viewport is not part of the undo history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Zoom speed for modifier + wheel.
    pub zoom_sensitivity: f64,
    /// Last screen position of an active pan gesture.
    #[serde(skip)]
    pan_anchor: Option<Point>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_sensitivity: ZOOM_SENSITIVITY,
            pan_anchor: None,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Camera with custom zoom bounds. Bounds are sanitised so that zoom can
    /// never reach zero.
    pub fn with_limits(min_zoom: f64, max_zoom: f64, zoom_sensitivity: f64) -> Self {
        let min_zoom = if min_zoom > 0.0 { min_zoom } else { MIN_ZOOM };
        let max_zoom = max_zoom.max(min_zoom);
        Self {
            min_zoom,
            max_zoom,
            zoom: 1.0_f64.clamp(min_zoom, max_zoom),
            zoom_sensitivity,
            ..Self::default()
        }
    }

    /// World to screen transform for rendering.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        coords::screen_to_world(screen_point, self.offset, self.zoom)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        coords::world_point_to_screen(world_point, self.offset, self.zoom)
    }

    /// Convert a world rectangle to screen coordinates.
    pub fn world_rect_to_screen(&self, rect: Rect) -> Rect {
        coords::world_to_screen(rect, self.offset, self.zoom)
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Set the zoom directly, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let world_point = self.screen_to_world(screen_point);
        let old_zoom = self.zoom;
        self.set_zoom(old_zoom * factor);
        if (self.zoom - old_zoom).abs() < f64::EPSILON {
            return;
        }

        self.offset = Vec2::new(
            screen_point.x - world_point.x * self.zoom,
            screen_point.y - world_point.y * self.zoom,
        );
    }

    /// Handle a wheel event at `screen_point`.
    ///
    /// With Ctrl held the wheel zooms around the cursor by
    /// `exp(-delta.y * sensitivity)`; otherwise it pans by the negated delta.
    pub fn wheel(&mut self, screen_point: Point, delta: Vec2, modifiers: Modifiers) {
        if modifiers.ctrl {
            let factor = (-delta.y * self.zoom_sensitivity).exp();
            self.zoom_at(screen_point, factor);
        } else {
            self.pan(-delta);
        }
    }

    /// Start a pan gesture at a screen position.
    pub fn begin_pan(&mut self, screen_point: Point) {
        log::debug!("Pan started at {screen_point:?}");
        self.pan_anchor = Some(screen_point);
    }

    /// Continue a pan gesture. Returns false when no gesture is active.
    pub fn update_pan(&mut self, screen_point: Point) -> bool {
        let Some(anchor) = self.pan_anchor else {
            return false;
        };
        self.offset += screen_point - anchor;
        self.pan_anchor = Some(screen_point);
        true
    }

    pub fn end_pan(&mut self) {
        if self.pan_anchor.take().is_some() {
            log::debug!("Pan ended at offset {:?}", self.offset);
        }
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    /// World-space point at the centre of a viewport of the given size.
    pub fn viewport_center(&self, viewport: Size) -> Point {
        self.screen_to_world(Point::new(viewport.width / 2.0, viewport.height / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset_and_zoom() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        camera.zoom = 2.0;
        let world = camera.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_transform_matches_point_mapping() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;
        let p = Point::new(12.0, 7.0);
        let a = camera.transform() * p;
        let b = camera.world_to_screen(p);
        assert!((a - b).hypot() < 1e-10);
    }

    #[test]
    fn test_wheel_zoom_keeps_cursor_fixed() {
        let mut camera = Camera::new();
        camera.wheel(Point::new(100.0, 100.0), Vec2::new(0.0, -100.0), ctrl());

        let expected_zoom = 0.5_f64.exp();
        assert!((camera.zoom - expected_zoom).abs() < 1e-10);
        assert!((camera.offset.x - (100.0 - 100.0 * expected_zoom)).abs() < 1e-10);
        assert!((camera.offset.y + 64.872).abs() < 1e-3);

        let world = camera.screen_to_world(Point::new(100.0, 100.0));
        assert!((world.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_wheel_zoom_clamps() {
        let mut camera = Camera::new();
        camera.wheel(Point::ZERO, Vec2::new(0.0, 10_000.0), ctrl());
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);

        camera.wheel(Point::ZERO, Vec2::new(0.0, -10_000.0), ctrl());
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_zoom_clamps() {
        let mut camera = Camera::new();
        camera.set_zoom(100.0);
        assert!((camera.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        camera.set_zoom(0.0);
        assert!((camera.zoom - MIN_ZOOM).abs() < f64::EPSILON);
    }

    #[test]
    fn test_wheel_without_modifier_pans() {
        let mut camera = Camera::new();
        camera.wheel(Point::ZERO, Vec2::new(5.0, 20.0), Modifiers::default());
        assert_eq!(camera.offset, Vec2::new(-5.0, -20.0));
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_gesture() {
        let mut camera = Camera::new();
        assert!(!camera.update_pan(Point::new(10.0, 10.0)));

        camera.begin_pan(Point::new(10.0, 10.0));
        assert!(camera.update_pan(Point::new(15.0, 30.0)));
        assert!(camera.update_pan(Point::new(20.0, 30.0)));
        camera.end_pan();

        assert_eq!(camera.offset, Vec2::new(10.0, 20.0));
        assert!(!camera.is_panning());
    }

    #[test]
    fn test_with_limits_rejects_zero() {
        let camera = Camera::with_limits(0.0, 2.0, ZOOM_SENSITIVITY);
        assert!(camera.min_zoom > 0.0);
        let camera = Camera::with_limits(2.0, 1.0, ZOOM_SENSITIVITY);
        assert!((camera.zoom - 2.0).abs() < f64::EPSILON);
    }
}
