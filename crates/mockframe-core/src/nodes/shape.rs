//! Primitive shapes: boxes and straight connectors (lines and arrows).

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A plain rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxShape {
    pub width: f64,
    pub height: f64,
    /// CSS colour string; the renderer interprets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BoxShape {
    /// Size of a box created by a click without dragging.
    pub const DEFAULT_SIZE: f64 = 100.0;
    pub const DEFAULT_COLOR: &'static str = "transparent";

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            color: Some(Self::DEFAULT_COLOR.to_string()),
        }
    }
}

/// A straight segment. The node's anchor is the start point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub end_x: f64,
    pub end_y: f64,
}

impl Connector {
    pub fn new(end: Point) -> Self {
        Self {
            end_x: end.x,
            end_y: end.y,
        }
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    (point - proj).hypot()
}
