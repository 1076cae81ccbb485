//! Tool modes.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Text,
    Box,
    Line,
    Arrow,
    Button,
    Input,
    Card,
    Pencil,
    Eraser,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Text,
        ToolKind::Box,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Button,
        ToolKind::Input,
        ToolKind::Card,
        ToolKind::Pencil,
        ToolKind::Eraser,
    ];

    /// Tool bound to a single-letter key, case-insensitive.
    pub fn from_shortcut(key: &str) -> Option<Self> {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return None;
        };
        match c.to_ascii_lowercase() {
            'v' => Some(ToolKind::Select),
            't' => Some(ToolKind::Text),
            'b' => Some(ToolKind::Box),
            'l' => Some(ToolKind::Line),
            'a' => Some(ToolKind::Arrow),
            'p' => Some(ToolKind::Pencil),
            'e' => Some(ToolKind::Eraser),
            _ => None,
        }
    }

    /// Single-letter shortcut, if the tool has one.
    pub fn shortcut(self) -> Option<&'static str> {
        match self {
            ToolKind::Select => Some("V"),
            ToolKind::Text => Some("T"),
            ToolKind::Box => Some("B"),
            ToolKind::Line => Some("L"),
            ToolKind::Arrow => Some("A"),
            ToolKind::Pencil => Some("P"),
            ToolKind::Eraser => Some("E"),
            ToolKind::Button | ToolKind::Input | ToolKind::Card => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Text => "Text",
            ToolKind::Box => "Box",
            ToolKind::Line => "Line",
            ToolKind::Arrow => "Arrow",
            ToolKind::Button => "Button",
            ToolKind::Input => "Input",
            ToolKind::Card => "Card",
            ToolKind::Pencil => "Pencil",
            ToolKind::Eraser => "Eraser",
        }
    }

    /// Paint tools stay active after a stroke ends.
    pub fn is_persistent(self) -> bool {
        matches!(self, ToolKind::Pencil | ToolKind::Eraser)
    }
}
