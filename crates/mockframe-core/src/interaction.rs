//! Pointer and keyboard interpretation.
//!
//! [`Interaction`] turns a stream of input events into document mutations on
//! a [`Canvas`]. At most one gesture is active at a time; moves and releases
//! are only interpreted while one is. Each handler runs to completion before
//! the next event is processed.

use kurbo::{Point, Rect, Vec2};

use crate::canvas::Canvas;
use crate::coords::rect_from_corners;
use crate::input::{Modifiers, MouseButton, is_space};
use crate::nodes::{BoxShape, Button, Card, CanvasNode, Input, NodeId, NodeKind, NodePatch, Text};
use crate::paint::Cell;
use crate::shortcuts::{Command, ShortcutRegistry};
use crate::snap::{snap_line_endpoint, snap_to_grid, snap_unless_precise};
use crate::tools::ToolKind;

/// Pick radius around the pointer, in screen pixels.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Where a dragged node started.
#[derive(Debug, Clone, PartialEq)]
pub struct DragOrigin {
    pub id: NodeId,
    pub position: Point,
    /// End point for connectors.
    pub end: Option<Point>,
}

/// Node drag in progress. The first origin is the primary target.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub pointer_start: Point,
    pub origins: Vec<DragOrigin>,
    /// Set once the gesture's single undo step has been recorded.
    pub history_recorded: bool,
}

impl DragState {
    pub fn primary(&self) -> Option<NodeId> {
        self.origins.first().map(|o| o.id)
    }
}

/// The active pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Drag(DragState),
    DrawConnector { node_id: NodeId, start: Point },
    DrawBox { start: Point, current: Option<Point> },
    Marquee { start: Point, end: Option<Point> },
    Paint { erase: bool },
    Pan,
}

/// Text edit session. Changes stay in `buffer` until committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub node_id: NodeId,
    pub buffer: String,
}

/// Interaction engine state.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    gesture: Option<Gesture>,
    text_edit: Option<TextEdit>,
    space_held: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// No gesture in progress.
    pub fn is_idle(&self) -> bool {
        self.gesture.is_none()
    }

    pub fn text_edit(&self) -> Option<&TextEdit> {
        self.text_edit.as_ref()
    }

    pub fn is_editing_text(&self) -> bool {
        self.text_edit.is_some()
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    /// Live box preview in world coordinates.
    pub fn box_preview(&self) -> Option<Rect> {
        match self.gesture {
            Some(Gesture::DrawBox {
                start,
                current: Some(current),
            }) => Some(rect_from_corners(start, current)),
            _ => None,
        }
    }

    /// Live marquee rectangle in world coordinates.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match self.gesture {
            Some(Gesture::Marquee {
                start,
                end: Some(end),
            }) => Some(rect_from_corners(start, end)),
            _ => None,
        }
    }

    // --- pointer ---

    /// Handle a button press at a screen position.
    ///
    /// `target` is the node under the pointer, if any; hosts can resolve it
    /// themselves or use [`Interaction::hit_test`].
    pub fn pointer_down(
        &mut self,
        canvas: &mut Canvas,
        screen: Point,
        button: MouseButton,
        modifiers: Modifiers,
        target: Option<NodeId>,
    ) {
        if let Some(edit) = &self.text_edit {
            if target == Some(edit.node_id) {
                return;
            }
            // Pressing anywhere else blurs the editor.
            self.commit_text(canvas);
        }
        if self.gesture.is_some() {
            return;
        }

        if self.space_held || button == MouseButton::Middle {
            canvas.camera.begin_pan(screen);
            self.gesture = Some(Gesture::Pan);
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        match target {
            Some(hit) => self.start_drag(canvas, hit, screen, modifiers),
            None => self.press_empty_canvas(canvas, screen, modifiers),
        }
    }

    /// Topmost visible node under a screen position.
    pub fn hit_test(&self, canvas: &Canvas, screen: Point) -> Option<NodeId> {
        let world = canvas.camera.screen_to_world(screen);
        canvas.node_at(world, HIT_TOLERANCE / canvas.camera.zoom)
    }

    fn start_drag(&mut self, canvas: &mut Canvas, hit: NodeId, screen: Point, modifiers: Modifiers) {
        if canvas.node(hit).is_none() {
            return;
        }
        let target = canvas.drag_target(hit);

        if modifiers.shift {
            canvas.toggle_selection(target);
        } else if !canvas.is_selected(target) {
            canvas.select_node(Some(target));
        }

        let origins: Vec<DragOrigin> = canvas
            .drag_set(target)
            .into_iter()
            .filter_map(|id| canvas.node(id))
            .map(|n| DragOrigin {
                id: n.id,
                position: n.position(),
                end: n.end_point(),
            })
            .collect();
        if origins.is_empty() {
            log::debug!("Node {target} is locked, not dragging");
            return;
        }

        log::debug!("Drag started on {target} with {} node(s)", origins.len());
        self.gesture = Some(Gesture::Drag(DragState {
            pointer_start: screen,
            origins,
            history_recorded: false,
        }));
    }

    fn press_empty_canvas(&mut self, canvas: &mut Canvas, screen: Point, modifiers: Modifiers) {
        let world = canvas.camera.screen_to_world(screen);
        let grid = canvas.grid_size();
        let point = snap_unless_precise(world, grid, modifiers.precise());

        match canvas.tool() {
            ToolKind::Text => {
                let id = canvas.add_node(CanvasNode::text(point, Text::new("")));
                self.text_edit = Some(TextEdit {
                    node_id: id,
                    buffer: String::new(),
                });
                finish_creation(canvas);
            }
            ToolKind::Box => {
                self.gesture = Some(Gesture::DrawBox {
                    start: point,
                    current: None,
                });
            }
            ToolKind::Button => {
                canvas.add_node(CanvasNode::new(point, NodeKind::Button(Button::default())));
                finish_creation(canvas);
            }
            ToolKind::Input => {
                canvas.add_node(CanvasNode::new(point, NodeKind::Input(Input::default())));
                finish_creation(canvas);
            }
            ToolKind::Card => {
                canvas.add_node(CanvasNode::new(point, NodeKind::Card(Card::default())));
                finish_creation(canvas);
            }
            tool @ (ToolKind::Line | ToolKind::Arrow) => {
                let node = if tool == ToolKind::Line {
                    CanvasNode::line(point, point)
                } else {
                    CanvasNode::arrow(point, point)
                };
                let node_id = canvas.add_node(node);
                self.gesture = Some(Gesture::DrawConnector {
                    node_id,
                    start: point,
                });
            }
            tool @ (ToolKind::Pencil | ToolKind::Eraser) => {
                let erase = tool == ToolKind::Eraser;
                let cell = Cell::from_world(point, grid);
                if erase {
                    canvas.remove_paint(cell, true);
                } else {
                    canvas.add_paint(cell, true);
                }
                self.gesture = Some(Gesture::Paint { erase });
            }
            ToolKind::Select => {
                self.gesture = Some(Gesture::Marquee {
                    start: point,
                    end: None,
                });
            }
        }
    }

    /// Handle pointer movement. Ignored unless a gesture is active.
    pub fn pointer_move(&mut self, canvas: &mut Canvas, screen: Point, modifiers: Modifiers) {
        let world = canvas.camera.screen_to_world(screen);
        let grid = canvas.grid_size();

        match &mut self.gesture {
            None => {}
            Some(Gesture::Pan) => {
                canvas.camera.update_pan(screen);
            }
            Some(Gesture::Paint { erase }) => {
                if self.space_held {
                    return;
                }
                let cell = Cell::from_world(world, grid);
                if *erase {
                    canvas.remove_paint(cell, false);
                } else {
                    canvas.add_paint(cell, false);
                }
            }
            Some(Gesture::Marquee { end, .. }) => {
                *end = Some(world);
            }
            Some(Gesture::DrawBox { current, .. }) => {
                *current = Some(snap_unless_precise(world, grid, modifiers.precise()));
            }
            Some(Gesture::DrawConnector { node_id, start }) => {
                let end = if modifiers.precise() {
                    snap_line_endpoint(*start, world)
                } else {
                    snap_to_grid(world, grid)
                };
                canvas.update_node(*node_id, &NodePatch::end(end), false);
            }
            Some(Gesture::Drag(drag)) => {
                let zoom = canvas.camera.zoom;
                let raw = (screen - drag.pointer_start) / zoom;

                if !drag.history_recorded {
                    canvas.document.push_undo();
                    drag.history_recorded = true;
                }

                let Some(primary) = drag.origins.first() else {
                    return;
                };
                let delta = if modifiers.precise() {
                    raw
                } else {
                    snap_to_grid(primary.position + raw, grid) - primary.position
                };

                let updates: Vec<(NodeId, NodePatch)> = drag
                    .origins
                    .iter()
                    .map(|origin| (origin.id, moved_patch(origin, delta)))
                    .collect();
                canvas.update_nodes(&updates, false);
            }
        }
    }

    /// Handle a button release. Always ends the active gesture.
    pub fn pointer_up(&mut self, canvas: &mut Canvas, screen: Point, modifiers: Modifiers) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };

        match gesture {
            Gesture::Pan => canvas.camera.end_pan(),
            Gesture::Paint { .. } => {}
            Gesture::Drag(drag) => {
                log::debug!(
                    "Drag ended at {screen:?} (moved: {})",
                    drag.history_recorded
                );
            }
            Gesture::DrawConnector { node_id, .. } => {
                log::debug!("Finished drawing connector {node_id}");
                finish_creation(canvas);
            }
            Gesture::DrawBox { start, current } => {
                let rect = rect_from_corners(start, current.unwrap_or(start));
                let grid = canvas.grid_size();
                let node = if rect.width() > 0.0 && rect.height() > 0.0 {
                    CanvasNode::boxed(
                        rect.origin(),
                        BoxShape::new(rect.width().max(grid), rect.height().max(grid)),
                    )
                } else {
                    CanvasNode::boxed(
                        start,
                        BoxShape::new(BoxShape::DEFAULT_SIZE, BoxShape::DEFAULT_SIZE),
                    )
                };
                canvas.add_node(node);
                finish_creation(canvas);
            }
            Gesture::Marquee { start, end } => {
                let Some(end) = end else {
                    // A plain click on empty canvas.
                    if !modifiers.shift {
                        canvas.clear_selection();
                    }
                    return;
                };
                let matches = canvas.nodes_in_rect(rect_from_corners(start, end));
                log::debug!("Marquee matched {} node(s)", matches.len());
                if modifiers.shift {
                    if !matches.is_empty() {
                        let union: Vec<NodeId> =
                            canvas.selection().iter().copied().chain(matches).collect();
                        canvas.set_selection(union);
                    }
                } else {
                    canvas.set_selection(matches);
                }
            }
        }
    }

    /// Handle a double-click. On a TEXT node this opens the text editor.
    pub fn double_click(&mut self, canvas: &mut Canvas, target: Option<NodeId>) {
        let Some(id) = target.filter(|id| canvas.node(*id).is_some_and(CanvasNode::is_text)) else {
            return;
        };
        // Drop any drag the second press may have started.
        if matches!(self.gesture, Some(Gesture::Drag(_))) {
            self.gesture = None;
        }
        if self.text_edit.is_some() {
            self.commit_text(canvas);
        }
        // Committing may have rewritten or removed the node.
        let Some(NodeKind::Text(text)) = canvas.node(id).map(|n| &n.kind) else {
            return;
        };
        log::debug!("Editing text {id}");
        self.text_edit = Some(TextEdit {
            node_id: id,
            buffer: text.text.clone(),
        });
    }

    /// Handle a wheel event: zoom with Ctrl, otherwise pan.
    pub fn wheel(&mut self, canvas: &mut Canvas, screen: Point, delta: Vec2, modifiers: Modifiers) {
        canvas.camera.wheel(screen, delta, modifiers);
    }

    // --- keyboard ---

    /// Handle a key press. Returns true if the key did something.
    pub fn key_down(&mut self, canvas: &mut Canvas, key: &str, modifiers: Modifiers) -> bool {
        if self.text_edit.is_some() {
            return match key {
                "Enter" if !modifiers.shift => {
                    self.commit_text(canvas);
                    true
                }
                "Enter" => {
                    self.text_input_append("\n");
                    true
                }
                "Escape" => {
                    self.cancel_text(canvas);
                    true
                }
                _ => false,
            };
        }

        if is_space(key) {
            self.space_held = true;
            return true;
        }

        match ShortcutRegistry::resolve(key, modifiers) {
            Some(command) => self.apply_command(canvas, command),
            None => false,
        }
    }

    /// Handle a key release.
    pub fn key_up(&mut self, canvas: &mut Canvas, key: &str) {
        if is_space(key) {
            self.space_held = false;
            if matches!(self.gesture, Some(Gesture::Pan)) {
                self.gesture = None;
                canvas.camera.end_pan();
            }
        }
    }

    /// Run a keyboard command. Returns true if anything changed.
    pub fn apply_command(&mut self, canvas: &mut Canvas, command: Command) -> bool {
        match command {
            Command::DeleteSelection => canvas.delete_selection() > 0,
            Command::Undo => canvas.undo(),
            Command::Redo => canvas.redo(),
            Command::SelectTool(tool) => {
                canvas.set_tool(tool);
                true
            }
            Command::ExitGroup => canvas.exit_group(),
        }
    }

    // --- text editing ---

    /// Open the editor on an existing TEXT node.
    pub fn begin_text_edit(&mut self, canvas: &mut Canvas, id: NodeId) -> bool {
        self.double_click(canvas, Some(id));
        self.text_edit.as_ref().is_some_and(|e| e.node_id == id)
    }

    /// Replace the edit buffer. Nothing reaches the document until commit.
    pub fn text_input(&mut self, text: &str) {
        if let Some(edit) = &mut self.text_edit {
            edit.buffer.clear();
            edit.buffer.push_str(text);
        }
    }

    fn text_input_append(&mut self, text: &str) {
        if let Some(edit) = &mut self.text_edit {
            edit.buffer.push_str(text);
        }
    }

    /// End the edit and write the buffer. Blank text deletes the node.
    pub fn commit_text(&mut self, canvas: &mut Canvas) {
        let Some(edit) = self.text_edit.take() else {
            return;
        };
        if edit.buffer.trim().is_empty() {
            canvas.delete_node(edit.node_id);
        } else {
            canvas.update_node(edit.node_id, &NodePatch::text(edit.buffer), true);
        }
        canvas.set_tool(ToolKind::Select);
    }

    /// End the edit without writing the buffer. A node whose committed text
    /// is still empty is removed.
    pub fn cancel_text(&mut self, canvas: &mut Canvas) {
        let Some(edit) = self.text_edit.take() else {
            return;
        };
        let empty = matches!(
            canvas.node(edit.node_id).map(|n| &n.kind),
            Some(NodeKind::Text(t)) if t.text.is_empty()
        );
        if empty {
            canvas.delete_node(edit.node_id);
        }
        canvas.set_tool(ToolKind::Select);
    }
}

/// Drop back to the select tool once a node has been placed.
fn finish_creation(canvas: &mut Canvas) {
    if !canvas.tool().is_persistent() {
        canvas.set_tool(ToolKind::Select);
    }
}

fn moved_patch(origin: &DragOrigin, delta: Vec2) -> NodePatch {
    let patch = NodePatch::position(origin.position + delta);
    match origin.end {
        Some(end) => patch.with_end(end + delta),
        None => patch,
    }
}
