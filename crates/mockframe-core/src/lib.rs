//! Mockframe Core Library
//!
//! Platform-agnostic document model and interaction engine for the Mockframe
//! wireframe editor. Rendering is left to the host.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod coords;
pub mod editor;
pub mod history;
pub mod input;
pub mod interaction;
pub mod nodes;
pub mod paint;
pub mod shortcuts;
pub mod snap;
pub mod storage;
pub mod tools;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasDocument, DropPosition};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorEvent};
pub use history::{History, Snapshot};
pub use input::{InputState, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use interaction::{Gesture, Interaction, TextEdit};
pub use nodes::{CanvasNode, NodeId, NodeKind, NodePatch};
pub use paint::{Cell, PaintLayer};
pub use shortcuts::{Command, ShortcutRegistry};
pub use snap::{DEFAULT_GRID_SIZE, snap_to_grid};
pub use storage::{MemoryStorage, Persistence, Storage, StorageError};
pub use tools::ToolKind;
