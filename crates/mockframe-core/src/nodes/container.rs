//! Container nodes: frames (artboards) and groups.

use serde::{Deserialize, Serialize};

/// A named rectangular artboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            width,
            height,
        }
    }
}

/// Standard artboard sizes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FramePreset {
    Desktop,
    Mobile,
}

impl FramePreset {
    /// Display name given to frames created from this preset.
    pub fn name(self) -> &'static str {
        match self {
            FramePreset::Desktop => "Desktop",
            FramePreset::Mobile => "Mobile",
        }
    }

    /// Frame size `(width, height)` in world units.
    pub fn size(self) -> (f64, f64) {
        match self {
            FramePreset::Desktop => (1440.0, 900.0),
            FramePreset::Mobile => (390.0, 844.0),
        }
    }

    pub fn frame(self) -> Frame {
        let (width, height) = self.size();
        Frame::new(self.name(), width, height)
    }
}

/// A logical cluster of nodes.
///
/// Children point at the group through their `group_id`; the group itself
/// owns nothing. Its rectangle is the union of the children's bounds at
/// creation time and afterwards only moves with drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

impl Group {
    pub const DEFAULT_NAME: &'static str = "Group";

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            width,
            height,
        }
    }
}
