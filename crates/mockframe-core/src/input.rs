//! Input events and state for mouse/touch/keyboard.
//!
//! Positions are in screen coordinates relative to the canvas container.
//! Every event carries the modifier state at the time it was delivered.

use std::collections::HashSet;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use crate::nodes::NodeId;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Held modifier that disables grid snapping and enables angle snapping.
    pub fn precise(&self) -> bool {
        self.shift
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
        /// Node the host already resolved under the pointer, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<NodeId>,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: MouseButton,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Move {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Scroll {
        position: Point,
        delta: Vec2,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        position: Point,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl PointerEvent {
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            target: None,
        }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move {
            position,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Scroll { position, .. }
            | PointerEvent::DoubleClick { position, .. } => *position,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            PointerEvent::Down { modifiers, .. }
            | PointerEvent::Up { modifiers, .. }
            | PointerEvent::Move { modifiers, .. }
            | PointerEvent::Scroll { modifiers, .. }
            | PointerEvent::DoubleClick { modifiers, .. } => *modifiers,
        }
    }
}

/// Keyboard event type. `key` follows DOM `KeyboardEvent.key` naming
/// (`"Delete"`, `"Escape"`, `" "`, `"z"`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeyEvent {
    Pressed {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Released {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl KeyEvent {
    pub fn pressed(key: impl Into<String>) -> Self {
        KeyEvent::Pressed {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn released(key: impl Into<String>) -> Self {
        KeyEvent::Released {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            KeyEvent::Pressed { key, .. } | KeyEvent::Released { key, .. } => key,
        }
    }
}

/// True for the key name of the space bar.
pub fn is_space(key: &str) -> bool {
    key == " " || key.eq_ignore_ascii_case("space")
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer, button, key and modifier state across events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Current modifier keys state.
    pub modifiers: Modifiers,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Currently pressed keys.
    pressed_keys: HashSet<String>,
    /// Whether rapid repeated presses are reported as double-clicks.
    pub detect_double_clicks: bool,
    /// Last click time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last click position for double-click detection.
    last_click_position: Option<Point>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer_position: Point::ZERO,
            modifiers: Modifiers::default(),
            pressed_buttons: HashSet::new(),
            pressed_keys: HashSet::new(),
            detect_double_clicks: true,
            last_click_time: None,
            last_click_position: None,
        }
    }
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event. Returns true when a left press completes a
    /// double-click.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> bool {
        self.pointer_position = event.position();
        self.modifiers = event.modifiers();

        match *event {
            PointerEvent::Down {
                position, button, ..
            } => {
                self.pressed_buttons.insert(button);
                button == MouseButton::Left && self.register_click(position)
            }
            PointerEvent::Up { button, .. } => {
                self.pressed_buttons.remove(&button);
                false
            }
            PointerEvent::Move { .. } | PointerEvent::Scroll { .. } => false,
            PointerEvent::DoubleClick { .. } => {
                self.last_click_time = None;
                self.last_click_position = None;
                false
            }
        }
    }

    fn register_click(&mut self, position: Point) -> bool {
        if !self.detect_double_clicks {
            return false;
        }
        let now = Instant::now();
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = (position - last_pos).hypot();

            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                // Reset so a triple-click is not a second double-click
                self.last_click_time = None;
                self.last_click_position = None;
                return true;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
        false
    }

    /// Process a key event.
    pub fn handle_key_event(&mut self, event: &KeyEvent) {
        match event {
            KeyEvent::Pressed { key, modifiers } => {
                self.modifiers = *modifiers;
                self.pressed_keys.insert(key.to_lowercase());
            }
            KeyEvent::Released { key, modifiers } => {
                self.modifiers = *modifiers;
                self.pressed_keys.remove(&key.to_lowercase());
            }
        }
    }

    /// Check if a button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Check if a key is currently pressed (case-insensitive).
    pub fn is_key_pressed(&self, key: &str) -> bool {
        self.pressed_keys.contains(&key.to_lowercase())
    }

    pub fn is_space_pressed(&self) -> bool {
        self.is_key_pressed(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_and_release() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::down(Point::new(100.0, 100.0)));
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));

        input.handle_pointer_event(&PointerEvent::up(Point::new(100.0, 100.0)));
        assert!(!input.is_button_pressed(MouseButton::Left));
        assert_eq!(input.pointer_position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_key_tracking_is_case_insensitive() {
        let mut input = InputState::new();
        input.handle_key_event(&KeyEvent::pressed("A"));
        assert!(input.is_key_pressed("a"));
        input.handle_key_event(&KeyEvent::released("a"));
        assert!(!input.is_key_pressed("A"));

        input.handle_key_event(&KeyEvent::pressed(" "));
        assert!(input.is_space_pressed());
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();
        let pos = Point::new(100.0, 100.0);

        assert!(!input.handle_pointer_event(&PointerEvent::down(pos)));
        input.handle_pointer_event(&PointerEvent::up(pos));
        assert!(input.handle_pointer_event(&PointerEvent::down(pos)));
        input.handle_pointer_event(&PointerEvent::up(pos));
        // A third click starts a new sequence.
        assert!(!input.handle_pointer_event(&PointerEvent::down(pos)));
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::down(Point::new(100.0, 100.0)));
        input.handle_pointer_event(&PointerEvent::up(Point::new(100.0, 100.0)));
        assert!(!input.handle_pointer_event(&PointerEvent::down(Point::new(200.0, 200.0))));
    }

    #[test]
    fn test_double_click_detection_can_be_disabled() {
        let mut input = InputState::new();
        input.detect_double_clicks = false;
        let pos = Point::new(1.0, 1.0);
        input.handle_pointer_event(&PointerEvent::down(pos));
        assert!(!input.handle_pointer_event(&PointerEvent::down(pos)));
    }

    #[test]
    fn test_event_json_shape() {
        let json = r#"{"kind":"down","position":{"x":5,"y":6},"modifiers":{"shift":true}}"#;
        let event: PointerEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.position(), Point::new(5.0, 6.0));
        assert!(event.modifiers().shift);
        assert!(matches!(event, PointerEvent::Down { button: MouseButton::Left, target: None, .. }));

        let key: KeyEvent = serde_json::from_str(r#"{"kind":"pressed","key":"Delete"}"#).unwrap();
        assert_eq!(key.key(), "Delete");
    }
}
