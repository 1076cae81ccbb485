//! Field-level node updates.

use kurbo::Point;

use super::{ButtonVariant, CanvasNode, NodeId, NodeKind};

/// A partial update to a node. `None` leaves a field untouched.
///
/// Fields that the target variant does not carry are ignored, so one patch
/// type serves every node kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub text: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub placeholder: Option<String>,
    pub color: Option<String>,
    pub variant: Option<ButtonVariant>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    /// `Some(None)` clears the group reference.
    pub group_id: Option<Option<NodeId>>,
}

impl NodePatch {
    pub fn position(point: Point) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            ..Default::default()
        }
    }

    pub fn end(point: Point) -> Self {
        Self {
            end_x: Some(point.x),
            end_y: Some(point.y),
            ..Default::default()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn group(group_id: Option<NodeId>) -> Self {
        Self {
            group_id: Some(group_id),
            ..Default::default()
        }
    }

    pub fn with_end(mut self, point: Point) -> Self {
        self.end_x = Some(point.x);
        self.end_y = Some(point.y);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn apply_to(&self, node: &mut CanvasNode) {
        if let Some(x) = self.x {
            node.x = x;
        }
        if let Some(y) = self.y {
            node.y = y;
        }
        if let Some(visible) = self.visible {
            node.visible = Some(visible);
        }
        if let Some(locked) = self.locked {
            node.locked = Some(locked);
        }
        if let Some(group_id) = self.group_id {
            node.group_id = group_id;
        }

        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        match &mut node.kind {
            NodeKind::Frame(f) => {
                set(&mut f.name, &self.name);
                set(&mut f.width, &self.width);
                set(&mut f.height, &self.height);
            }
            NodeKind::Group(g) => {
                set(&mut g.name, &self.name);
                set(&mut g.width, &self.width);
                set(&mut g.height, &self.height);
            }
            NodeKind::Text(t) => {
                set(&mut t.text, &self.text);
                set(&mut t.font_size, &self.font_size);
            }
            NodeKind::Box(b) => {
                set(&mut b.width, &self.width);
                set(&mut b.height, &self.height);
                set_opt(&mut b.color, &self.color);
            }
            NodeKind::Line(c) | NodeKind::Arrow(c) => {
                set(&mut c.end_x, &self.end_x);
                set(&mut c.end_y, &self.end_y);
            }
            NodeKind::Button(b) => {
                set(&mut b.text, &self.text);
                set(&mut b.width, &self.width);
                set(&mut b.height, &self.height);
                set_opt(&mut b.variant, &self.variant);
            }
            NodeKind::Input(i) => {
                set_opt(&mut i.placeholder, &self.placeholder);
                set(&mut i.width, &self.width);
                set(&mut i.height, &self.height);
            }
            NodeKind::Card(c) => {
                set_opt(&mut c.title, &self.title);
                set_opt(&mut c.content, &self.content);
                set(&mut c.width, &self.width);
                set(&mut c.height, &self.height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{BoxShape, Button, Text};

    #[test]
    fn test_patch_ignores_foreign_fields() {
        let mut node = CanvasNode::text(Point::ZERO, Text::new("a"));
        let before = node.clone();
        node.apply(&NodePatch {
            width: Some(50.0),
            end_x: Some(3.0),
            ..Default::default()
        });
        assert_eq!(node, before);
    }

    #[test]
    fn test_patch_sets_shared_and_variant_fields() {
        let mut node = CanvasNode::new(Point::ZERO, NodeKind::Button(Button::default()));
        node.apply(&NodePatch {
            x: Some(10.0),
            text: Some("OK".into()),
            variant: Some(ButtonVariant::Secondary),
            locked: Some(true),
            ..Default::default()
        });
        assert_eq!(node.x, 10.0);
        assert!(node.is_locked());
        match &node.kind {
            NodeKind::Button(b) => {
                assert_eq!(b.text, "OK");
                assert_eq!(b.variant, Some(ButtonVariant::Secondary));
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_group_patch_can_clear() {
        let mut node = CanvasNode::boxed(Point::ZERO, BoxShape::new(1.0, 1.0));
        node.group_id = Some(NodeId::nil());
        node.apply(&NodePatch::group(None));
        assert_eq!(node.group_id, None);
        assert!(NodePatch::default().is_empty());
    }
}
