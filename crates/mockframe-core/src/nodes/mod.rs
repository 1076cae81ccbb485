//! Node definitions for the canvas.
//!
//! Every node shares an id, a world-space anchor and a few flags; the rest
//! lives in [`NodeKind`], one variant per node type. Consumers match on the
//! kind instead of probing for optional fields.

mod container;
mod control;
mod patch;
mod shape;
mod text;

pub use container::{Frame, FramePreset, Group};
pub use control::{Button, ButtonVariant, Card, Input};
pub use patch::NodePatch;
pub use shape::{BoxShape, Connector, point_to_segment_dist};
pub use text::Text;

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for nodes.
pub type NodeId = Uuid;

/// Variant-specific node data. Serialised through the `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Frame(Frame),
    Text(Text),
    Box(BoxShape),
    Line(Connector),
    Arrow(Connector),
    Button(Button),
    Input(Input),
    Card(Card),
    Group(Group),
}

impl NodeKind {
    /// The type tag as persisted (`"FRAME"`, `"TEXT"`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Frame(_) => "FRAME",
            NodeKind::Text(_) => "TEXT",
            NodeKind::Box(_) => "BOX",
            NodeKind::Line(_) => "LINE",
            NodeKind::Arrow(_) => "ARROW",
            NodeKind::Button(_) => "BUTTON",
            NodeKind::Input(_) => "INPUT",
            NodeKind::Card(_) => "CARD",
            NodeKind::Group(_) => "GROUP",
        }
    }

    /// Stored width and height. `None` for connectors and text.
    pub fn size(&self) -> Option<Size> {
        match self {
            NodeKind::Frame(f) => Some(Size::new(f.width, f.height)),
            NodeKind::Group(g) => Some(Size::new(g.width, g.height)),
            NodeKind::Box(b) => Some(Size::new(b.width, b.height)),
            NodeKind::Button(b) => Some(Size::new(b.width, b.height)),
            NodeKind::Input(i) => Some(Size::new(i.width, i.height)),
            NodeKind::Card(c) => Some(Size::new(c.width, c.height)),
            NodeKind::Text(_) | NodeKind::Line(_) | NodeKind::Arrow(_) => None,
        }
    }

    pub fn connector(&self) -> Option<&Connector> {
        match self {
            NodeKind::Line(c) | NodeKind::Arrow(c) => Some(c),
            _ => None,
        }
    }

    pub fn connector_mut(&mut self) -> Option<&mut Connector> {
        match self {
            NodeKind::Line(c) | NodeKind::Arrow(c) => Some(c),
            _ => None,
        }
    }
}

/// One visual entity in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: NodeId,
    /// World-space anchor; the start point for connectors.
    pub x: f64,
    pub y: f64,
    /// Enclosing GROUP, looked up by id. Never an ownership edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl CanvasNode {
    /// Create a node with a fresh id at `position`.
    pub fn new(position: Point, kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: position.x,
            y: position.y,
            group_id: None,
            visible: None,
            locked: None,
            kind,
        }
    }

    pub fn frame(position: Point, frame: Frame) -> Self {
        Self::new(position, NodeKind::Frame(frame))
    }

    pub fn text(position: Point, text: Text) -> Self {
        Self::new(position, NodeKind::Text(text))
    }

    pub fn boxed(position: Point, shape: BoxShape) -> Self {
        Self::new(position, NodeKind::Box(shape))
    }

    pub fn line(start: Point, end: Point) -> Self {
        Self::new(start, NodeKind::Line(Connector::new(end)))
    }

    pub fn arrow(start: Point, end: Point) -> Self {
        Self::new(start, NodeKind::Arrow(Connector::new(end)))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// End point for connectors.
    pub fn end_point(&self) -> Option<Point> {
        self.kind.connector().map(Connector::end)
    }

    pub fn size(&self) -> Option<Size> {
        self.kind.size()
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    /// Nodes are visible unless explicitly hidden.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }

    pub fn is_locked(&self) -> bool {
        self.locked == Some(true)
    }

    /// Bounding box in world coordinates.
    ///
    /// Connectors span their two endpoints. Everything else spans
    /// `x..x+width, y..y+height`, with a missing width treated as zero and
    /// the height never negative.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            NodeKind::Line(c) | NodeKind::Arrow(c) => Rect::new(
                self.x.min(c.end_x),
                self.y.min(c.end_y),
                self.x.max(c.end_x),
                self.y.max(c.end_y),
            ),
            kind => {
                let size = kind.size().unwrap_or(Size::ZERO);
                Rect::new(
                    self.x,
                    self.y,
                    self.x + size.width,
                    self.y + size.height.max(0.0),
                )
            }
        }
    }

    /// Area that reacts to the pointer. Text uses an estimated extent since
    /// it has no stored size.
    pub fn hit_bounds(&self) -> Rect {
        match &self.kind {
            NodeKind::Text(t) => {
                let (w, h) = t.estimated_extent();
                Rect::new(self.x, self.y, self.x + w, self.y + h)
            }
            _ => self.bounds(),
        }
    }

    /// Check if a point (in world coordinates) hits this node.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match &self.kind {
            NodeKind::Line(c) | NodeKind::Arrow(c) => {
                point_to_segment_dist(point, self.position(), c.end()) <= tolerance
            }
            _ => self.hit_bounds().inflate(tolerance, tolerance).contains(point),
        }
    }

    /// Move the anchor (and the end point, for connectors) by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
        if let Some(c) = self.kind.connector_mut() {
            c.end_x += delta.x;
            c.end_y += delta.y;
        }
    }

    /// Apply a field-level patch. Fields the variant does not carry are ignored.
    pub fn apply(&mut self, patch: &NodePatch) {
        patch.apply_to(self);
    }

    /// Name shown in the layer list.
    pub fn label(&self) -> &str {
        match &self.kind {
            NodeKind::Frame(f) => &f.name,
            NodeKind::Group(g) => &g.name,
            NodeKind::Text(t) => &t.text,
            NodeKind::Button(b) => &b.text,
            NodeKind::Card(Card { title: Some(title), .. }) => title,
            NodeKind::Input(Input { placeholder: Some(p), .. }) => p,
            kind => kind.type_name(),
        }
    }

    /// Patch that writes `value` into this node's label field, if it has one.
    pub fn rename_patch(&self, value: &str) -> Option<NodePatch> {
        let value = value.to_string();
        match &self.kind {
            NodeKind::Frame(_) | NodeKind::Group(_) => Some(NodePatch {
                name: Some(value),
                ..Default::default()
            }),
            NodeKind::Text(_) | NodeKind::Button(_) => Some(NodePatch::text(value)),
            NodeKind::Card(_) => Some(NodePatch {
                title: Some(value),
                ..Default::default()
            }),
            NodeKind::Input(_) => Some(NodePatch {
                placeholder: Some(value),
                ..Default::default()
            }),
            NodeKind::Box(_) | NodeKind::Line(_) | NodeKind::Arrow(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bounds_span_endpoints() {
        let line = CanvasNode::line(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
        assert_eq!(line.bounds(), Rect::new(20.0, 10.0, 50.0, 40.0));
        assert_eq!(line.size(), None);
        assert_eq!(line.end_point(), Some(Point::new(20.0, 40.0)));
    }

    #[test]
    fn test_text_bounds_are_zero_sized() {
        let text = CanvasNode::text(Point::new(5.0, 6.0), Text::new("hello"));
        assert_eq!(text.bounds(), Rect::new(5.0, 6.0, 5.0, 6.0));
        assert!(text.hit_bounds().area() > 0.0);
    }

    #[test]
    fn test_translate_moves_connector_end() {
        let mut arrow = CanvasNode::arrow(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        arrow.translate(Vec2::new(5.0, -5.0));
        assert_eq!(arrow.position(), Point::new(5.0, -5.0));
        assert_eq!(arrow.end_point(), Some(Point::new(15.0, 5.0)));
    }

    #[test]
    fn test_hit_test_line_uses_segment_distance() {
        let line = CanvasNode::line(Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(line.hit_test(Point::new(50.0, 52.0), 3.0));
        // Inside the bounding box but far from the segment.
        assert!(!line.hit_test(Point::new(90.0, 10.0), 3.0));
    }

    #[test]
    fn test_flags_default() {
        let mut node = CanvasNode::boxed(Point::ZERO, BoxShape::new(10.0, 10.0));
        assert!(node.is_visible());
        assert!(!node.is_locked());
        node.visible = Some(false);
        node.locked = Some(true);
        assert!(!node.is_visible());
        assert!(node.is_locked());
    }

    #[test]
    fn test_labels() {
        let frame = CanvasNode::frame(Point::ZERO, FramePreset::Mobile.frame());
        assert_eq!(frame.label(), "Mobile");
        let line = CanvasNode::line(Point::ZERO, Point::ZERO);
        assert_eq!(line.label(), "LINE");
        let input = CanvasNode::new(
            Point::ZERO,
            NodeKind::Input(Input {
                placeholder: None,
                width: 1.0,
                height: 1.0,
            }),
        );
        assert_eq!(input.label(), "INPUT");
        assert!(line.rename_patch("x").is_none());
    }

    #[test]
    fn test_serializes_flat_with_type_tag() {
        let mut node = CanvasNode::boxed(Point::new(1.0, 2.0), BoxShape::new(30.0, 40.0));
        node.group_id = Some(Uuid::nil());
        let value = serde_json::to_value(&node).unwrap();

        assert_eq!(value["type"], "BOX");
        assert_eq!(value["x"], 1.0);
        assert_eq!(value["width"], 30.0);
        assert_eq!(value["color"], "transparent");
        assert_eq!(value["groupId"], Uuid::nil().to_string());
        assert!(value.get("visible").is_none());
    }

    #[test]
    fn test_deserializes_stored_format() {
        let json = r#"[
            {"id":"5b0c3e4c-2f0e-4f43-9d8e-6f6d0f2b9a11","type":"LINE","x":0,"y":0,"endX":30,"endY":40},
            {"id":"6a1d4f5d-3a1f-4a54-8e9f-7a7e1a3cab22","type":"TEXT","x":3,"y":4,"text":"hi","fontSize":16,"locked":true}
        ]"#;
        let nodes: Vec<CanvasNode> = serde_json::from_str(json).unwrap();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].end_point(), Some(Point::new(30.0, 40.0)));
        assert!(nodes[1].is_locked());
        assert!(matches!(&nodes[1].kind, NodeKind::Text(t) if t.text == "hi"));
    }
}
