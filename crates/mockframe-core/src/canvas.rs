//! Canvas document and state management.

use std::collections::HashSet;

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::coords::rects_overlap;
use crate::history::{History, Snapshot};
use crate::nodes::{CanvasNode, FramePreset, Group, NodeId, NodeKind, NodePatch};
use crate::paint::{Cell, PaintLayer};
use crate::snap::{DEFAULT_GRID_SIZE, snap_to_grid};
use crate::tools::ToolKind;

/// Where a reordered node lands relative to its drop target.
///
/// `Above` means higher in the stack, i.e. later in the node array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Above,
    Below,
}

/// The undoable part of the canvas: nodes in z-order plus the paint layer.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    /// All nodes, back to front.
    nodes: Vec<CanvasNode>,
    paint: PaintLayer,
    history: History,
    /// Bumped on every change to the node array.
    revision: u64,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: History::new(limit),
            ..Self::default()
        }
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn paint(&self) -> &PaintLayer {
        &self.paint
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: NodeId) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    /// The GROUP node with this id, if any.
    pub fn group(&self, id: NodeId) -> Option<&CanvasNode> {
        self.get(id).filter(|n| n.is_group())
    }

    /// Direct children of a group.
    pub fn children_of(&self, group_id: NodeId) -> impl Iterator<Item = &CanvasNode> {
        self.nodes
            .iter()
            .filter(move |n| n.group_id == Some(group_id))
    }

    /// All nodes below `id` in the group hierarchy, breadth first.
    pub fn descendants_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut frontier = vec![id];
        let mut seen: HashSet<NodeId> = HashSet::from([id]);
        while let Some(parent) = frontier.pop() {
            for child in self.children_of(parent) {
                if seen.insert(child.id) {
                    out.push(child.id);
                    frontier.push(child.id);
                }
            }
        }
        out
    }

    /// Replace every node, e.g. after loading. History is cleared.
    pub fn load_nodes(&mut self, nodes: Vec<CanvasNode>) {
        let mut seen = HashSet::new();
        self.nodes = nodes
            .into_iter()
            .filter(|n| {
                let fresh = seen.insert(n.id);
                if !fresh {
                    log::warn!("Dropping node with duplicate id {}", n.id);
                }
                fresh
            })
            .collect();
        self.history.clear();
        self.revision += 1;
    }

    /// Take a snapshot of the current document state for undo.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            paint: self.paint.clone(),
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.paint = snapshot.paint;
        self.revision += 1;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    /// Redo the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Append a node, giving it a fresh id if its id is taken.
    fn push_node(&mut self, mut node: CanvasNode) -> NodeId {
        if self.contains(node.id) {
            let fresh = Uuid::new_v4();
            log::warn!("Node id {} already exists, reassigned to {}", node.id, fresh);
            node.id = fresh;
        }
        let id = node.id;
        self.nodes.push(node);
        self.revision += 1;
        id
    }

    fn patch(&mut self, id: NodeId, patch: &NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.apply(patch);
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Remove nodes by id. Children of removed groups are reparented to the
    /// nearest surviving ancestor so no reference dangles.
    fn remove(&mut self, ids: &HashSet<NodeId>) -> usize {
        let parents: Vec<(NodeId, Option<NodeId>)> = self
            .nodes
            .iter()
            .filter(|n| ids.contains(&n.id) && n.is_group())
            .map(|n| (n.id, n.group_id))
            .collect();

        let before = self.nodes.len();
        self.nodes.retain(|n| !ids.contains(&n.id));
        let removed = before - self.nodes.len();
        if removed == 0 {
            return 0;
        }

        if !parents.is_empty() {
            for node in &mut self.nodes {
                if let Some(gid) = node.group_id {
                    if ids.contains(&gid) {
                        node.group_id = surviving_ancestor(gid, &parents, ids);
                    }
                }
            }
        }
        self.revision += 1;
        removed
    }
}

/// Walk up from a removed group until reaching an id that survives.
fn surviving_ancestor(
    mut id: NodeId,
    parents: &[(NodeId, Option<NodeId>)],
    removed: &HashSet<NodeId>,
) -> Option<NodeId> {
    // Bounded by the number of removed groups, so cycles cannot spin.
    for _ in 0..=parents.len() {
        if !removed.contains(&id) {
            return Some(id);
        }
        let parent = parents.iter().find(|(gid, _)| *gid == id)?.1;
        id = parent?;
    }
    None
}

/// Group extent of a node: its anchor plus stored size, zero where absent.
fn group_extent(node: &CanvasNode) -> Rect {
    match node.size() {
        Some(size) => Rect::new(node.x, node.y, node.x + size.width, node.y + size.height),
        None => Rect::from_origin_size(node.position(), Size::ZERO),
    }
}

/// Canvas state: document plus viewport, tool, selection and view flags.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub document: CanvasDocument,
    pub camera: Camera,
    tool: ToolKind,
    /// Selected ids in selection order. Ids may outlive their nodes.
    selection: Vec<NodeId>,
    /// Group whose direct children are edited individually.
    active_group: Option<NodeId>,
    grid_size: f64,
    pub paint_layer_visible: bool,
    pub dim_outside_frames: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            document: CanvasDocument::new(),
            camera: Camera::new(),
            tool: ToolKind::default(),
            selection: Vec::new(),
            active_group: None,
            grid_size: DEFAULT_GRID_SIZE,
            paint_layer_visible: true,
            dim_outside_frames: false,
        }
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        let mut canvas = Self {
            document: CanvasDocument::with_history_limit(config.history_limit),
            camera: Camera::with_limits(config.min_zoom, config.max_zoom, config.zoom_sensitivity),
            ..Self::new()
        };
        canvas.set_grid_size(config.grid_size);
        canvas
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        self.document.nodes()
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.document.get(id)
    }

    pub fn paint(&self) -> &PaintLayer {
        self.document.paint()
    }

    // --- tool and grid ---

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool != tool {
            log::debug!("Tool changed: {:?} -> {:?}", self.tool, tool);
            self.tool = tool;
        }
    }

    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    /// Non-positive or non-finite sizes are ignored.
    pub fn set_grid_size(&mut self, size: f64) {
        if size.is_finite() && size > 0.0 {
            self.grid_size = size;
        } else {
            log::warn!("Ignoring invalid grid size {size}");
        }
    }

    // --- selection ---

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected nodes that still exist, in document order.
    pub fn selected_nodes(&self) -> impl Iterator<Item = &CanvasNode> {
        self.nodes()
            .iter()
            .filter(move |n| self.selection.contains(&n.id))
    }

    /// Replace the selection with a single node, or clear it.
    pub fn select_node(&mut self, id: Option<NodeId>) {
        self.selection.clear();
        self.selection.extend(id);
    }

    pub fn toggle_selection(&mut self, id: NodeId) {
        if let Some(pos) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(pos);
        } else {
            self.selection.push(id);
        }
    }

    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selection.clear();
        for id in ids {
            if !self.selection.contains(&id) {
                self.selection.push(id);
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- node mutations ---

    /// Add a node on top and make it the sole selection.
    pub fn add_node(&mut self, node: CanvasNode) -> NodeId {
        self.document.push_undo();
        let id = self.document.push_node(node);
        self.select_node(Some(id));
        id
    }

    /// Add several nodes on top and select exactly them.
    pub fn add_nodes(&mut self, nodes: Vec<CanvasNode>) -> Vec<NodeId> {
        if nodes.is_empty() {
            return Vec::new();
        }
        self.document.push_undo();
        let ids: Vec<NodeId> = nodes
            .into_iter()
            .map(|n| self.document.push_node(n))
            .collect();
        self.set_selection(ids.iter().copied());
        ids
    }

    /// Apply a patch to one node. Unknown ids are ignored.
    pub fn update_node(&mut self, id: NodeId, patch: &NodePatch, record_history: bool) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        if record_history {
            self.document.push_undo();
        }
        self.document.patch(id, patch)
    }

    /// Apply several patches as one mutation. Returns how many nodes changed.
    pub fn update_nodes(&mut self, updates: &[(NodeId, NodePatch)], record_history: bool) -> usize {
        if !updates.iter().any(|(id, _)| self.document.contains(*id)) {
            return 0;
        }
        if record_history {
            self.document.push_undo();
        }
        let mut changed = 0;
        for (id, patch) in updates {
            if self.document.patch(*id, patch) {
                changed += 1;
            }
        }
        changed
    }

    pub fn delete_node(&mut self, id: NodeId) -> bool {
        self.delete_nodes(&[id]) > 0
    }

    /// Delete nodes and drop them from the selection.
    pub fn delete_nodes(&mut self, ids: &[NodeId]) -> usize {
        let ids: HashSet<NodeId> = ids.iter().copied().collect();
        if !self.nodes().iter().any(|n| ids.contains(&n.id)) {
            return 0;
        }
        self.document.push_undo();
        let removed = self.document.remove(&ids);
        self.selection.retain(|id| !ids.contains(id));
        if self.active_group.is_some_and(|g| ids.contains(&g)) {
            self.active_group = None;
        }
        log::debug!("Deleted {removed} node(s)");
        removed
    }

    pub fn delete_selection(&mut self) -> usize {
        let ids = self.selection.clone();
        self.delete_nodes(&ids)
    }

    // --- grouping ---

    /// Group the selected nodes under a new GROUP node.
    ///
    /// Needs at least two existing selected nodes. The group covers their
    /// combined extent and inherits their parent when they all share one.
    pub fn group_selected(&mut self) -> Option<NodeId> {
        let selected: Vec<&CanvasNode> = self.selected_nodes().collect();
        if selected.len() < 2 {
            return None;
        }

        let extent = selected
            .iter()
            .map(|n| group_extent(n))
            .reduce(|a, b| a.union(b))?;
        let first_parent = selected[0].group_id;
        let parent = selected
            .iter()
            .all(|n| n.group_id == first_parent)
            .then_some(first_parent)
            .flatten();
        let member_ids: Vec<NodeId> = selected.iter().map(|n| n.id).collect();

        let mut group = CanvasNode::new(
            Point::new(extent.x0, extent.y0),
            NodeKind::Group(Group::new(extent.width(), extent.height().max(0.0))),
        );
        group.group_id = parent;

        self.document.push_undo();
        for id in &member_ids {
            self.document.patch(*id, &NodePatch::group(Some(group.id)));
        }
        let group_id = self.document.push_node(group);
        self.select_node(Some(group_id));
        log::debug!("Grouped {} nodes into {group_id}", member_ids.len());
        Some(group_id)
    }

    /// Dissolve every selected GROUP, reparenting its direct children to the
    /// group's own parent. Returns the new selection.
    pub fn ungroup_selected(&mut self) -> Vec<NodeId> {
        let groups: HashSet<NodeId> = self
            .selected_nodes()
            .filter(|n| n.is_group())
            .map(|n| n.id)
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }

        let children: Vec<NodeId> = self
            .nodes()
            .iter()
            .filter(|n| n.group_id.is_some_and(|g| groups.contains(&g)) && !groups.contains(&n.id))
            .map(|n| n.id)
            .collect();

        self.document.push_undo();
        self.document.remove(&groups);

        let mut selection: Vec<NodeId> = self
            .selection
            .iter()
            .copied()
            .filter(|id| !groups.contains(id))
            .collect();
        selection.extend(children);
        self.set_selection(selection);

        if self.active_group.is_some_and(|g| groups.contains(&g)) {
            self.active_group = None;
        }
        log::debug!("Ungrouped {} group(s)", groups.len());
        self.selection.clone()
    }

    // --- z-order ---

    /// Move `dragged` directly above or below `target` in the stack.
    pub fn reorder_node(&mut self, dragged: NodeId, target: NodeId, position: DropPosition) -> bool {
        if dragged == target {
            return false;
        }
        let (Some(from), Some(_)) = (self.document.index_of(dragged), self.document.index_of(target))
        else {
            return false;
        };

        self.document.push_undo();
        let node = self.document.nodes.remove(from);
        // Re-locate the target since removal may have shifted it.
        let target_index = self.document.index_of(target).unwrap_or(0);
        let insert_at = match position {
            DropPosition::Above => target_index + 1,
            DropPosition::Below => target_index,
        };
        self.document.nodes.insert(insert_at, node);
        self.document.revision += 1;
        true
    }

    // --- paint layer ---

    /// Paint a cell. With `record_history` a snapshot is taken even when the
    /// cell was already painted, so a stroke always forms one undo step.
    pub fn add_paint(&mut self, cell: Cell, record_history: bool) -> bool {
        if record_history {
            self.document.push_undo();
        }
        self.document.paint.insert(cell)
    }

    pub fn remove_paint(&mut self, cell: Cell, record_history: bool) -> bool {
        if record_history {
            self.document.push_undo();
        }
        self.document.paint.remove(cell)
    }

    pub fn set_paint_layer_visible(&mut self, visible: bool) {
        self.paint_layer_visible = visible;
    }

    pub fn set_dim_outside_frames(&mut self, dim: bool) {
        self.dim_outside_frames = dim;
    }

    // --- history ---

    pub fn undo(&mut self) -> bool {
        let done = self.document.undo();
        if done {
            log::debug!("Undo ({} left)", self.document.history.undo_depth());
            self.drop_stale_active_group();
        }
        done
    }

    pub fn redo(&mut self) -> bool {
        let done = self.document.redo();
        if done {
            log::debug!("Redo ({} left)", self.document.history.redo_depth());
            self.drop_stale_active_group();
        }
        done
    }

    fn drop_stale_active_group(&mut self) {
        if let Some(g) = self.active_group {
            if self.document.group(g).is_none() {
                self.active_group = None;
            }
        }
    }

    // --- group scope ---

    pub fn active_group(&self) -> Option<NodeId> {
        self.active_group
    }

    /// Scope editing to a group's direct children. Only GROUP nodes qualify.
    pub fn enter_group(&mut self, id: NodeId) -> bool {
        if self.document.group(id).is_none() {
            return false;
        }
        log::debug!("Entered group {id}");
        self.active_group = Some(id);
        self.selection.clear();
        true
    }

    pub fn exit_group(&mut self) -> bool {
        let left = self.active_group.take();
        if let Some(id) = left {
            log::debug!("Left group {id}");
        }
        left.is_some()
    }

    // --- layer list ---

    /// Write `value` into the node's label field. Empty values are ignored.
    pub fn rename_node(&mut self, id: NodeId, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let Some(patch) = self.node(id).and_then(|n| n.rename_patch(value)) else {
            return false;
        };
        self.update_node(id, &patch, true)
    }

    pub fn toggle_visible(&mut self, id: NodeId) -> bool {
        let Some(visible) = self.node(id).map(CanvasNode::is_visible) else {
            return false;
        };
        let patch = NodePatch {
            visible: Some(!visible),
            ..Default::default()
        };
        self.update_node(id, &patch, true)
    }

    pub fn toggle_locked(&mut self, id: NodeId) -> bool {
        let Some(locked) = self.node(id).map(CanvasNode::is_locked) else {
            return false;
        };
        let patch = NodePatch {
            locked: Some(!locked),
            ..Default::default()
        };
        self.update_node(id, &patch, true)
    }

    // --- frames ---

    /// World rectangles of every FRAME, for the dim overlay cut-outs.
    pub fn frame_rects(&self) -> Vec<Rect> {
        self.nodes()
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Frame(_)))
            .map(CanvasNode::bounds)
            .collect()
    }

    /// Add a preset FRAME centred in the visible viewport, anchor snapped.
    pub fn add_frame_at_viewport_center(&mut self, preset: FramePreset, viewport: Size) -> NodeId {
        let center = self.camera.viewport_center(viewport);
        let (width, height) = preset.size();
        let anchor = snap_to_grid(
            Point::new(center.x - width / 2.0, center.y - height / 2.0),
            self.grid_size,
        );
        log::debug!("Adding {} frame at {anchor:?}", preset.name());
        self.add_node(CanvasNode::frame(anchor, preset.frame()))
    }

    // --- queries ---

    /// Topmost visible node under a world point. Groups are never hit
    /// directly; a press on a child is redirected by [`Canvas::drag_target`].
    pub fn node_at(&self, point: Point, tolerance: f64) -> Option<NodeId> {
        self.nodes()
            .iter()
            .rev()
            .find(|n| n.is_visible() && !n.is_group() && n.hit_test(point, tolerance))
            .map(|n| n.id)
    }

    /// Nodes whose bounds strictly overlap `rect`, in document order.
    /// A rectangle without area matches nothing.
    pub fn nodes_in_rect(&self, rect: Rect) -> Vec<NodeId> {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Vec::new();
        }
        self.nodes()
            .iter()
            .filter(|n| rects_overlap(rect, n.bounds()))
            .map(|n| n.id)
            .collect()
    }

    /// Node that a press on `hit` acts on: the enclosing group, unless that
    /// group is the active scope.
    pub fn drag_target(&self, hit: NodeId) -> NodeId {
        self.node(hit)
            .and_then(|n| n.group_id)
            .filter(|g| self.active_group != Some(*g))
            .filter(|g| self.document.group(*g).is_some())
            .unwrap_or(hit)
    }

    /// Nodes moved by dragging `primary`: the primary itself, the rest of the
    /// selection when the primary is selected, and every group descendant.
    /// Locked nodes never move. The primary always comes first.
    pub fn drag_set(&self, primary: NodeId) -> Vec<NodeId> {
        let movable = |id: &NodeId| self.node(*id).is_some_and(|n| !n.is_locked());
        if !movable(&primary) {
            return Vec::new();
        }

        let mut roots = vec![primary];
        if self.is_selected(primary) {
            roots.extend(self.selection.iter().copied().filter(|&id| id != primary));
        }

        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for root in roots {
            for id in std::iter::once(root).chain(self.document.descendants_of(root)) {
                if movable(&id) && seen.insert(id) {
                    out.push(id);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{BoxShape, Text};
    use kurbo::Vec2;

    fn boxed(x: f64, y: f64, w: f64, h: f64) -> CanvasNode {
        CanvasNode::boxed(Point::new(x, y), BoxShape::new(w, h))
    }

    fn canvas_with(nodes: Vec<CanvasNode>) -> (Canvas, Vec<NodeId>) {
        let mut canvas = Canvas::new();
        let ids = nodes.iter().map(|n| n.id).collect();
        canvas.document.load_nodes(nodes);
        (canvas, ids)
    }

    fn order(canvas: &Canvas) -> Vec<NodeId> {
        canvas.nodes().iter().map(|n| n.id).collect()
    }

    #[test]
    fn test_add_node_selects_and_records() {
        let mut canvas = Canvas::new();
        let id = canvas.add_node(boxed(0.0, 0.0, 10.0, 10.0));
        assert_eq!(canvas.selection(), &[id]);
        assert!(canvas.document.can_undo());

        assert!(canvas.undo());
        assert!(canvas.nodes().is_empty());
        // Dangling selection is tolerated.
        assert_eq!(canvas.selection(), &[id]);
        assert!(canvas.selected_nodes().next().is_none());
    }

    #[test]
    fn test_add_node_keeps_ids_unique() {
        let mut canvas = Canvas::new();
        let node = boxed(0.0, 0.0, 10.0, 10.0);
        let first = canvas.add_node(node.clone());
        let second = canvas.add_node(node);
        assert_ne!(first, second);
        assert_eq!(canvas.nodes().len(), 2);
    }

    #[test]
    fn test_add_nodes_selects_all() {
        let mut canvas = Canvas::new();
        let ids = canvas.add_nodes(vec![boxed(0.0, 0.0, 1.0, 1.0), boxed(5.0, 5.0, 1.0, 1.0)]);
        assert_eq!(canvas.selection(), ids.as_slice());
        assert_eq!(canvas.document.history().undo_depth(), 1);
    }

    #[test]
    fn test_update_missing_node_is_noop() {
        let mut canvas = Canvas::new();
        assert!(!canvas.update_node(Uuid::new_v4(), &NodePatch::position(Point::ZERO), true));
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_update_without_history() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 10.0, 10.0)]);
        canvas.update_node(ids[0], &NodePatch::position(Point::new(5.0, 5.0)), false);
        assert!(!canvas.document.can_undo());
        assert_eq!(canvas.node(ids[0]).unwrap().position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_delete_then_undo_restores_positions() {
        let (mut canvas, ids) = canvas_with(vec![
            boxed(0.0, 0.0, 10.0, 10.0),
            boxed(20.0, 0.0, 10.0, 10.0),
            boxed(40.0, 0.0, 10.0, 10.0),
        ]);
        let before = canvas.nodes().to_vec();
        canvas.set_selection([ids[0], ids[2]]);

        assert_eq!(canvas.delete_selection(), 2);
        assert_eq!(order(&canvas), vec![ids[1]]);
        assert!(canvas.selection().is_empty());

        assert!(canvas.undo());
        assert_eq!(canvas.nodes(), before.as_slice());
    }

    #[test]
    fn test_selection_ops() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 1.0, 1.0), boxed(2.0, 0.0, 1.0, 1.0)]);
        canvas.select_node(Some(ids[0]));
        canvas.toggle_selection(ids[1]);
        assert_eq!(canvas.selection(), &[ids[0], ids[1]]);
        canvas.toggle_selection(ids[0]);
        assert_eq!(canvas.selection(), &[ids[1]]);
        canvas.set_selection([ids[0], ids[0]]);
        assert_eq!(canvas.selection(), &[ids[0]]);
        canvas.select_node(None);
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_group_needs_two_nodes() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 1.0, 1.0)]);
        canvas.select_node(Some(ids[0]));
        assert!(canvas.group_selected().is_none());
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_group_bounds_and_selection() {
        let line = CanvasNode::line(Point::new(-10.0, 5.0), Point::new(100.0, 100.0));
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 50.0, 20.0), boxed(30.0, 40.0, 10.0, 10.0), line]);
        canvas.set_selection(ids.clone());

        let gid = canvas.group_selected().unwrap();
        let group = canvas.node(gid).unwrap();
        // Connectors contribute their anchor only.
        assert_eq!(group.bounds(), Rect::new(-10.0, 0.0, 50.0, 50.0));
        assert_eq!(group.group_id, None);
        assert_eq!(canvas.selection(), &[gid]);
        assert_eq!(canvas.nodes().last().unwrap().id, gid);
        for id in &ids {
            assert_eq!(canvas.node(*id).unwrap().group_id, Some(gid));
        }
    }

    #[test]
    fn test_nested_group_inherits_parent() {
        let (mut canvas, ids) = canvas_with(vec![
            boxed(0.0, 0.0, 10.0, 10.0),
            boxed(20.0, 0.0, 10.0, 10.0),
            boxed(40.0, 0.0, 10.0, 10.0),
        ]);
        canvas.set_selection(ids.clone());
        let outer = canvas.group_selected().unwrap();

        canvas.set_selection([ids[0], ids[1]]);
        let inner = canvas.group_selected().unwrap();
        assert_eq!(canvas.node(inner).unwrap().group_id, Some(outer));

        canvas.set_selection([inner]);
        let selection = canvas.ungroup_selected();
        assert_eq!(selection, vec![ids[0], ids[1]]);
        assert_eq!(canvas.node(ids[0]).unwrap().group_id, Some(outer));
        assert!(canvas.node(inner).is_none());
    }

    #[test]
    fn test_group_then_ungroup_restores_group_ids() {
        let parent = CanvasNode::new(Point::ZERO, NodeKind::Group(Group::new(50.0, 10.0)));
        let mut a = boxed(0.0, 0.0, 10.0, 10.0);
        let mut b = CanvasNode::line(Point::new(20.0, 0.0), Point::new(50.0, 10.0));
        a.group_id = Some(parent.id);
        b.group_id = Some(parent.id);
        let (mut canvas, ids) = canvas_with(vec![a, b, parent]);
        let before = canvas.nodes().to_vec();

        canvas.set_selection([ids[0], ids[1]]);
        let gid = canvas.group_selected().unwrap();
        assert_eq!(canvas.node(gid).unwrap().group_id, Some(ids[2]));
        canvas.ungroup_selected();

        assert_eq!(canvas.nodes(), before.as_slice());
        assert_eq!(canvas.selection(), &[ids[0], ids[1]]);
    }

    #[test]
    fn test_ungroup_keeps_other_selected_nodes() {
        let (mut canvas, ids) = canvas_with(vec![
            boxed(0.0, 0.0, 10.0, 10.0),
            boxed(20.0, 0.0, 10.0, 10.0),
            boxed(40.0, 0.0, 10.0, 10.0),
        ]);
        canvas.set_selection([ids[0], ids[1]]);
        let gid = canvas.group_selected().unwrap();
        canvas.set_selection([ids[2], gid]);

        let selection = canvas.ungroup_selected();
        assert_eq!(selection, vec![ids[2], ids[0], ids[1]]);
    }

    #[test]
    fn test_ungroup_without_groups_is_noop() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 10.0, 10.0)]);
        canvas.select_node(Some(ids[0]));
        assert!(canvas.ungroup_selected().is_empty());
        assert!(!canvas.document.can_undo());
    }

    #[test]
    fn test_deleting_group_reparents_children() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 10.0, 10.0), boxed(20.0, 0.0, 10.0, 10.0)]);
        canvas.set_selection(ids.clone());
        let gid = canvas.group_selected().unwrap();

        assert!(canvas.delete_node(gid));
        assert_eq!(canvas.node(ids[0]).unwrap().group_id, None);
        assert_eq!(canvas.nodes().len(), 2);
    }

    #[test]
    fn test_reorder_above_and_below() {
        let (mut canvas, ids) = canvas_with(vec![
            boxed(0.0, 0.0, 1.0, 1.0),
            boxed(0.0, 0.0, 1.0, 1.0),
            boxed(0.0, 0.0, 1.0, 1.0),
        ]);
        assert!(canvas.reorder_node(ids[0], ids[2], DropPosition::Above));
        assert_eq!(order(&canvas), vec![ids[1], ids[2], ids[0]]);

        assert!(canvas.reorder_node(ids[0], ids[1], DropPosition::Below));
        assert_eq!(order(&canvas), vec![ids[0], ids[1], ids[2]]);

        assert!(!canvas.reorder_node(ids[0], ids[0], DropPosition::Above));
        assert!(!canvas.reorder_node(ids[0], Uuid::new_v4(), DropPosition::Above));
        assert_eq!(canvas.document.history().undo_depth(), 2);
    }

    #[test]
    fn test_paint_history() {
        let mut canvas = Canvas::new();
        assert!(canvas.add_paint(Cell::new(0, 0), true));
        assert!(canvas.add_paint(Cell::new(1, 0), false));
        assert_eq!(canvas.paint().len(), 2);

        assert!(canvas.undo());
        assert!(canvas.paint().is_empty());
        assert!(canvas.redo());
        assert_eq!(canvas.paint().len(), 2);
    }

    #[test]
    fn test_active_group_scope() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 10.0, 10.0), boxed(20.0, 0.0, 10.0, 10.0)]);
        canvas.set_selection(ids.clone());
        let gid = canvas.group_selected().unwrap();

        assert_eq!(canvas.drag_target(ids[0]), gid);
        assert!(!canvas.enter_group(ids[0]));
        assert!(canvas.enter_group(gid));
        assert!(canvas.selection().is_empty());
        assert_eq!(canvas.drag_target(ids[0]), ids[0]);

        assert!(canvas.exit_group());
        assert!(!canvas.exit_group());
        assert_eq!(canvas.drag_target(ids[0]), gid);
    }

    #[test]
    fn test_drag_set_includes_descendants_and_selection() {
        let (mut canvas, ids) = canvas_with(vec![
            boxed(0.0, 0.0, 10.0, 10.0),
            boxed(20.0, 0.0, 10.0, 10.0),
            boxed(40.0, 0.0, 10.0, 10.0),
        ]);
        canvas.set_selection([ids[0], ids[1]]);
        let gid = canvas.group_selected().unwrap();

        let set = canvas.drag_set(gid);
        assert_eq!(set[0], gid);
        assert!(set.contains(&ids[0]) && set.contains(&ids[1]));
        assert!(!set.contains(&ids[2]));

        canvas.toggle_selection(ids[2]);
        assert!(canvas.drag_set(gid).contains(&ids[2]));

        canvas.toggle_locked(ids[2]);
        assert!(!canvas.drag_set(gid).contains(&ids[2]));
        assert!(canvas.drag_set(ids[2]).is_empty());
    }

    #[test]
    fn test_layer_operations() {
        let text = CanvasNode::text(Point::ZERO, Text::new("old"));
        let line = CanvasNode::line(Point::ZERO, Point::new(1.0, 1.0));
        let (mut canvas, ids) = canvas_with(vec![text, line]);

        assert!(canvas.rename_node(ids[0], "new"));
        assert_eq!(canvas.node(ids[0]).unwrap().label(), "new");
        assert!(!canvas.rename_node(ids[0], ""));
        assert!(!canvas.rename_node(ids[1], "x"));

        assert!(canvas.toggle_visible(ids[1]));
        assert_eq!(canvas.node(ids[1]).unwrap().visible, Some(false));
        assert!(canvas.toggle_visible(ids[1]));
        assert!(canvas.node(ids[1]).unwrap().is_visible());
        assert_eq!(canvas.document.history().undo_depth(), 3);
    }

    #[test]
    fn test_frame_preset_centered_and_snapped() {
        let mut canvas = Canvas::new();
        canvas.camera.pan(Vec2::new(3.0, 0.0));
        let id = canvas.add_frame_at_viewport_center(FramePreset::Mobile, Size::new(1600.0, 1200.0));
        let frame = canvas.node(id).unwrap();
        // Centre (797, 600) minus half of 390x844 is (602, 178), snapped.
        assert_eq!(frame.position(), Point::new(600.0, 180.0));
        assert_eq!(frame.label(), "Mobile");
        assert_eq!(canvas.frame_rects(), vec![frame.bounds()]);
    }

    #[test]
    fn test_node_at_prefers_topmost_visible() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 100.0, 100.0), boxed(50.0, 50.0, 100.0, 100.0)]);
        assert_eq!(canvas.node_at(Point::new(60.0, 60.0), 0.0), Some(ids[1]));
        canvas.toggle_visible(ids[1]);
        assert_eq!(canvas.node_at(Point::new(60.0, 60.0), 0.0), Some(ids[0]));
        assert_eq!(canvas.node_at(Point::new(500.0, 500.0), 0.0), None);
    }

    #[test]
    fn test_node_at_skips_groups() {
        let (mut canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 10.0, 10.0), boxed(50.0, 0.0, 10.0, 10.0)]);
        canvas.set_selection(ids.clone());
        let gid = canvas.group_selected().unwrap();
        assert_eq!(canvas.nodes().last().unwrap().id, gid);

        assert_eq!(canvas.node_at(Point::new(5.0, 5.0), 0.0), Some(ids[0]));
        assert_eq!(canvas.node_at(Point::new(55.0, 5.0), 0.0), Some(ids[1]));
        // Inside the group rect but between its children.
        assert_eq!(canvas.node_at(Point::new(30.0, 5.0), 0.0), None);
    }

    #[test]
    fn test_nodes_in_rect_is_strict() {
        let (canvas, ids) = canvas_with(vec![boxed(0.0, 0.0, 10.0, 10.0), boxed(20.0, 0.0, 10.0, 10.0)]);
        assert_eq!(canvas.nodes_in_rect(Rect::new(-5.0, -5.0, 15.0, 15.0)), vec![ids[0]]);
        // Touching edges only.
        assert!(canvas.nodes_in_rect(Rect::new(10.0, 0.0, 20.0, 10.0)).is_empty());
        assert!(canvas.nodes_in_rect(Rect::new(5.0, 5.0, 5.0, 5.0)).is_empty());
    }

    #[test]
    fn test_revision_tracks_node_changes() {
        let mut canvas = Canvas::new();
        let r0 = canvas.document.revision();
        canvas.add_node(boxed(0.0, 0.0, 1.0, 1.0));
        let r1 = canvas.document.revision();
        assert!(r1 > r0);
        canvas.select_node(None);
        canvas.set_tool(ToolKind::Box);
        assert_eq!(canvas.document.revision(), r1);
    }
}
