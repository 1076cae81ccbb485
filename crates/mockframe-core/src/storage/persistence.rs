//! Load-gated persistence of the node array.
//!
//! Nothing is written before the initial load completes, so a fresh empty
//! session can never overwrite saved work it has not seen. After that, every
//! settled change to the node array is written once.

use std::sync::Arc;

use crate::canvas::CanvasDocument;
use crate::nodes::CanvasNode;
use crate::storage::{Storage, StorageError};

/// Connects a document to a storage backend under one key.
pub struct Persistence<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    key: String,
    loaded: bool,
    /// Document revision last handed to the backend.
    saved_revision: Option<u64>,
}

impl<S: Storage> Persistence<S> {
    pub fn new(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            loaded: false,
            saved_revision: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Read the saved node array. Missing or unreadable data yields an empty
    /// array; either way the load gate opens.
    pub fn load(&mut self) -> Vec<CanvasNode> {
        let nodes = match self.storage.load(&self.key) {
            Ok(nodes) => {
                log::info!("Loaded {} node(s) from '{}'", nodes.len(), self.key);
                nodes
            }
            Err(StorageError::NotFound(_)) => {
                log::info!("No saved nodes under '{}', starting empty", self.key);
                Vec::new()
            }
            Err(e) => {
                log::error!("Failed to load nodes from '{}': {}", self.key, e);
                Vec::new()
            }
        };
        self.loaded = true;
        nodes
    }

    /// Record that `revision` matches what storage already holds.
    pub fn mark_saved(&mut self, revision: u64) {
        self.saved_revision = Some(revision);
    }

    /// True when the document changed since the last save and loading is done.
    pub fn is_dirty(&self, document: &CanvasDocument) -> bool {
        self.loaded && self.saved_revision != Some(document.revision())
    }

    /// Save the node array if it changed. Write failures are logged and
    /// swallowed; the in-memory document stays authoritative.
    /// Returns true if a write succeeded.
    pub fn sync(&mut self, document: &CanvasDocument) -> bool {
        if !self.is_dirty(document) {
            return false;
        }
        // Best effort: a failed write is not retried for the same revision.
        self.saved_revision = Some(document.revision());
        match self.storage.save(&self.key, document.nodes()) {
            Ok(()) => {
                log::debug!("Saved {} node(s) to '{}'", document.len(), self.key);
                true
            }
            Err(e) => {
                log::warn!("Failed to save nodes to '{}': {}", self.key, e);
                false
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::nodes::BoxShape;
    use crate::storage::{MemoryStorage, StorageResult};
    use kurbo::Point;

    struct FailingStorage;

    impl Storage for FailingStorage {
        fn save(&self, _key: &str, _nodes: &[CanvasNode]) -> StorageResult<()> {
            Err(StorageError::Io("quota exceeded".into()))
        }
        fn load(&self, _key: &str) -> StorageResult<Vec<CanvasNode>> {
            Err(StorageError::Io("disabled".into()))
        }
        fn delete(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
        fn exists(&self, _key: &str) -> StorageResult<bool> {
            Ok(false)
        }
    }

    fn document_with_node() -> CanvasDocument {
        let mut document = CanvasDocument::new();
        document.load_nodes(vec![CanvasNode::boxed(Point::ZERO, BoxShape::new(1.0, 1.0))]);
        document
    }

    #[test]
    fn test_no_save_before_load() {
        let storage = Arc::new(MemoryStorage::new());
        let mut persistence = Persistence::new(storage.clone(), "nodes");

        assert!(!persistence.sync(&document_with_node()));
        assert!(!storage.exists("nodes").unwrap());
    }

    #[test]
    fn test_saves_once_per_revision() {
        let storage = Arc::new(MemoryStorage::new());
        let mut persistence = Persistence::new(storage.clone(), "nodes");
        assert!(persistence.load().is_empty());

        let document = document_with_node();
        assert!(persistence.sync(&document));
        assert!(!persistence.sync(&document));
        assert_eq!(storage.load("nodes").unwrap(), document.nodes());
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.insert_raw("nodes", "garbage").unwrap();
        let mut persistence = Persistence::new(storage, "nodes");

        assert!(persistence.load().is_empty());
        assert!(persistence.is_loaded());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut persistence = Persistence::new(Arc::new(FailingStorage), "nodes");
        assert!(persistence.load().is_empty());

        let document = document_with_node();
        assert!(!persistence.sync(&document));
        assert!(!persistence.is_dirty(&document));
    }
}
