//! Storage abstraction for persistence.
//!
//! Backends store the node array under a string key as opaque JSON text.
//! All calls are synchronous; the engine never suspends.

mod memory;
mod persistence;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryStorage;
pub use persistence::Persistence;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use thiserror::Error;

use crate::nodes::CanvasNode;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Nothing stored under key: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for node-array storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save the full node array, preserving order and every field.
    fn save(&self, key: &str, nodes: &[CanvasNode]) -> StorageResult<()>;

    /// Load the node array saved under `key`.
    fn load(&self, key: &str) -> StorageResult<Vec<CanvasNode>>;

    /// Delete whatever is stored under `key`.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if anything is stored under `key`.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Trait for node-array storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save the full node array, preserving order and every field.
    fn save(&self, key: &str, nodes: &[CanvasNode]) -> StorageResult<()>;

    /// Load the node array saved under `key`.
    fn load(&self, key: &str) -> StorageResult<Vec<CanvasNode>>;

    /// Delete whatever is stored under `key`.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if anything is stored under `key`.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

/// Encode a node array as stored by every backend.
pub fn encode_nodes(nodes: &[CanvasNode]) -> StorageResult<String> {
    serde_json::to_string(nodes).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a stored node array.
pub fn decode_nodes(json: &str) -> StorageResult<Vec<CanvasNode>> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization(e.to_string()))
}
