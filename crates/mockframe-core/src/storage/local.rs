//! Browser `localStorage` implementation for WebAssembly.

use super::{Storage, StorageError, StorageResult, decode_nodes, encode_nodes};
use crate::nodes::CanvasNode;

/// `window.localStorage` backend.
///
/// The handle is looked up on every call so a page that disables storage
/// later degrades into errors rather than panics.
#[derive(Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> StorageResult<web_sys::Storage> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Other("localStorage not available".to_string()))
    }
}

impl Storage for LocalStorage {
    fn save(&self, key: &str, nodes: &[CanvasNode]) -> StorageResult<()> {
        let json = encode_nodes(nodes)?;
        self.storage()?
            .set_item(key, &json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {:?}", key, e)))
    }

    fn load(&self, key: &str) -> StorageResult<Vec<CanvasNode>> {
        let json = self
            .storage()?
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        decode_nodes(&json)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to delete {}: {:?}", key, e)))
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let item = self
            .storage()?
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {:?}", key, e)))?;
        Ok(item.is_some())
    }
}
