//! Text node.

use serde::{Deserialize, Serialize};

/// A free-standing text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub text: String,
    pub font_size: f64,
}

impl Text {
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;
    /// Line height as a multiple of the font size.
    pub const LINE_HEIGHT: f64 = 1.2;
    /// Average glyph advance as a multiple of the font size, used for
    /// estimating the rendered extent when hit testing.
    const GLYPH_ADVANCE: f64 = 0.6;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    /// Approximate rendered size `(width, height)`.
    ///
    /// Text nodes carry no stored size; the renderer lays them out. This gives
    /// hit testing something to work with, at least one glyph wide.
    pub fn estimated_extent(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(1);
        let width = longest as f64 * self.font_size * Self::GLYPH_ADVANCE;
        let height = lines.len().max(1) as f64 * self.font_size * Self::LINE_HEIGHT;
        (width, height)
    }
}
