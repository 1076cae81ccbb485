//! Snapshot-based undo/redo.

use crate::nodes::CanvasNode;
use crate::paint::PaintLayer;

/// Maximum number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A full copy of the undoable document state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub nodes: Vec<CanvasNode>,
    pub paint: PaintLayer,
}

/// Two stacks of snapshots. The top of `past` is the state before the most
/// recent change; the top of `future` is the state undone most recently.
#[derive(Debug, Clone)]
pub struct History {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record the pre-mutation state. Clears the redo stack.
    pub fn push(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        self.future.clear();

        if self.past.len() > self.limit {
            self.past.remove(0);
        }
    }

    /// Step back. `current` goes onto the redo stack and the restored state is
    /// returned, or `None` if there is nothing to undo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Mirror of [`History::undo`] over the redo stack.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{BoxShape, CanvasNode};
    use crate::paint::Cell;
    use kurbo::Point;

    fn state(n: usize) -> Snapshot {
        Snapshot {
            nodes: (0..n)
                .map(|i| CanvasNode::boxed(Point::new(i as f64, 0.0), BoxShape::new(1.0, 1.0)))
                .collect(),
            paint: PaintLayer::default(),
        }
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::default();
        let before = state(1);
        let after = state(2);

        history.push(before.clone());
        let restored = history.undo(after.clone()).unwrap();
        assert_eq!(restored, before);
        assert!(history.can_redo());

        let redone = history.redo(restored).unwrap();
        assert_eq!(redone, after);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = History::default();
        assert!(history.undo(state(0)).is_none());
        assert!(history.redo(state(0)).is_none());
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_push_clears_future() {
        let mut history = History::default();
        history.push(state(0));
        history.undo(state(1));
        assert!(history.can_redo());
        history.push(state(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut history = History::new(3);
        for i in 0..5 {
            let mut s = Snapshot::default();
            s.paint.insert(Cell::new(i, 0));
            history.push(s);
        }
        assert_eq!(history.undo_depth(), 3);

        let mut last = None;
        while let Some(s) = history.undo(Snapshot::default()) {
            last = Some(s);
        }
        // The oldest surviving entry is the third push.
        assert!(last.unwrap().paint.contains(Cell::new(2, 0)));
    }
}
