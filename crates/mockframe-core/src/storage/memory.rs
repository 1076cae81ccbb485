//! In-memory storage implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{Storage, StorageError, StorageResult, decode_nodes, encode_nodes};
use crate::nodes::CanvasNode;

/// In-memory storage for testing and ephemeral use.
///
/// Keeps the encoded JSON so loads go through the same decoding path as the
/// persistent backends.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under a key, bypassing encoding.
    pub fn insert_raw(&self, key: &str, raw: impl Into<String>) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        entries.insert(key.to_string(), raw.into());
        Ok(())
    }

    /// Raw text stored under a key.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, nodes: &[CanvasNode]) -> StorageResult<()> {
        let json = encode_nodes(nodes)?;
        self.insert_raw(key, json)
    }

    fn load(&self, key: &str) -> StorageResult<Vec<CanvasNode>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let json = entries
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        decode_nodes(json)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        entries.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(entries.contains_key(key))
    }
}
