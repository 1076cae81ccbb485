//! Keyboard shortcut registry and resolution.

use serde::{Deserialize, Serialize};

use crate::input::Modifiers;
use crate::tools::ToolKind;

/// Document-level action bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "tool", rename_all = "snake_case")]
pub enum Command {
    DeleteSelection,
    Undo,
    Redo,
    SelectTool(ToolKind),
    ExitGroup,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub command: Command,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        command: Command,
        description: &'static str,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            command,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts = vec![
            Shortcut::new("Z", true, false, Command::Undo, "Undo"),
            Shortcut::new("Z", true, true, Command::Redo, "Redo"),
            Shortcut::new("Y", true, false, Command::Redo, "Redo"),
            Shortcut::new("Delete", false, false, Command::DeleteSelection, "Delete selected nodes"),
            Shortcut::new("Backspace", false, false, Command::DeleteSelection, "Delete selected nodes"),
            Shortcut::new("Escape", false, false, Command::ExitGroup, "Leave the active group"),
        ];
        shortcuts.extend(ToolKind::ALL.into_iter().filter_map(|tool| {
            tool.shortcut().map(|key| {
                Shortcut::new(key, false, false, Command::SelectTool(tool), tool.name())
            })
        }));
        shortcuts
    }

    /// Resolve a key press into a command.
    ///
    /// Callers must not route keys here while a text edit is active or focus
    /// sits in a text field.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<Command> {
        match key {
            "Delete" | "Backspace" => return Some(Command::DeleteSelection),
            "Escape" => return Some(Command::ExitGroup),
            _ => {}
        }

        if modifiers.command() {
            return match key.to_ascii_lowercase().as_str() {
                "z" if modifiers.shift => Some(Command::Redo),
                "z" => Some(Command::Undo),
                "y" => Some(Command::Redo),
                _ => None,
            };
        }

        ToolKind::from_shortcut(key).map(Command::SelectTool)
    }
}
