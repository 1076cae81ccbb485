//! The editor session: one context object owning the canvas, the interaction
//! engine and the persistence gate.
//!
//! Hosts feed [`EditorEvent`]s into [`Editor::handle`]. After each event the
//! node array is written back when it has settled, that is when no gesture is
//! in progress and the document changed since the last save.

use std::sync::Arc;

use kurbo::Size;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, DropPosition};
use crate::config::EditorConfig;
use crate::input::{InputState, KeyEvent, PointerEvent};
use crate::interaction::Interaction;
use crate::nodes::{FramePreset, NodeId};
use crate::shortcuts::Command;
use crate::storage::{Persistence, Storage};
use crate::tools::ToolKind;

/// Everything a host can ask the editor to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    /// Pointer input. A `down` without a target is hit-tested by the editor.
    Pointer(PointerEvent),
    Key(KeyEvent),
    /// Replace the text editor's buffer.
    TextInput { text: String },
    BeginTextEdit { id: NodeId },
    CommitText,
    CancelText,
    Command(Command),
    SetTool { tool: ToolKind },
    SetGridSize { size: f64 },
    SelectNode { id: Option<NodeId> },
    Group,
    Ungroup,
    Reorder {
        dragged: NodeId,
        target: NodeId,
        position: DropPosition,
    },
    Rename { id: NodeId, value: String },
    ToggleVisible { id: NodeId },
    ToggleLocked { id: NodeId },
    EnterGroup { id: NodeId },
    ExitGroup,
    AddFrame { preset: FramePreset, viewport: Size },
    SetPaintLayerVisible { visible: bool },
    SetDimOutsideFrames { dim: bool },
}

/// An editing session over one stored node array.
pub struct Editor<S: Storage> {
    canvas: Canvas,
    input: InputState,
    interaction: Interaction,
    persistence: Persistence<S>,
    config: EditorConfig,
}

impl<S: Storage> Editor<S> {
    pub fn new(storage: Arc<S>, config: EditorConfig) -> Self {
        Self {
            canvas: Canvas::with_config(&config),
            input: InputState::new(),
            interaction: Interaction::new(),
            persistence: Persistence::new(storage, config.storage_key.clone()),
            config,
        }
    }

    /// Read the saved node array into the canvas and open the save gate.
    /// Returns the number of nodes loaded.
    pub fn load(&mut self) -> usize {
        let nodes = self.persistence.load();
        self.canvas.document.load_nodes(nodes);
        self.canvas.clear_selection();
        self.persistence.mark_saved(self.canvas.document.revision());
        self.canvas.nodes().len()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Mutable input state, e.g. to turn off timing-based double-clicks.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply one event, then persist if the document settled.
    pub fn handle(&mut self, event: EditorEvent) {
        self.dispatch(event);
        if self.interaction.is_idle() {
            self.persistence.sync(&self.canvas.document);
        }
    }

    /// Apply events in order.
    pub fn handle_all(&mut self, events: impl IntoIterator<Item = EditorEvent>) {
        for event in events {
            self.handle(event);
        }
    }

    /// Persist now if anything changed, regardless of gesture state.
    pub fn flush(&mut self) -> bool {
        self.persistence.sync(&self.canvas.document)
    }

    fn dispatch(&mut self, event: EditorEvent) {
        let canvas = &mut self.canvas;
        let interaction = &mut self.interaction;

        match event {
            EditorEvent::Pointer(pointer) => self.handle_pointer(pointer),
            EditorEvent::Key(key) => {
                self.input.handle_key_event(&key);
                match key {
                    KeyEvent::Pressed { key, modifiers } => {
                        interaction.key_down(canvas, &key, modifiers);
                    }
                    KeyEvent::Released { key, .. } => interaction.key_up(canvas, &key),
                }
            }
            EditorEvent::TextInput { text } => interaction.text_input(&text),
            EditorEvent::BeginTextEdit { id } => {
                interaction.begin_text_edit(canvas, id);
            }
            EditorEvent::CommitText => interaction.commit_text(canvas),
            EditorEvent::CancelText => interaction.cancel_text(canvas),
            EditorEvent::Command(command) => {
                interaction.apply_command(canvas, command);
            }
            EditorEvent::SetTool { tool } => canvas.set_tool(tool),
            EditorEvent::SetGridSize { size } => canvas.set_grid_size(size),
            EditorEvent::SelectNode { id } => canvas.select_node(id),
            EditorEvent::Group => {
                canvas.group_selected();
            }
            EditorEvent::Ungroup => {
                canvas.ungroup_selected();
            }
            EditorEvent::Reorder {
                dragged,
                target,
                position,
            } => {
                canvas.reorder_node(dragged, target, position);
            }
            EditorEvent::Rename { id, value } => {
                canvas.rename_node(id, &value);
            }
            EditorEvent::ToggleVisible { id } => {
                canvas.toggle_visible(id);
            }
            EditorEvent::ToggleLocked { id } => {
                canvas.toggle_locked(id);
            }
            EditorEvent::EnterGroup { id } => {
                canvas.enter_group(id);
            }
            EditorEvent::ExitGroup => {
                canvas.exit_group();
            }
            EditorEvent::AddFrame { preset, viewport } => {
                canvas.add_frame_at_viewport_center(preset, viewport);
            }
            EditorEvent::SetPaintLayerVisible { visible } => canvas.set_paint_layer_visible(visible),
            EditorEvent::SetDimOutsideFrames { dim } => canvas.set_dim_outside_frames(dim),
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) {
        let double_click = self.input.handle_pointer_event(&event);
        let canvas = &mut self.canvas;
        let interaction = &mut self.interaction;

        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
                target,
            } => {
                let target = target.or_else(|| interaction.hit_test(canvas, position));
                interaction.pointer_down(canvas, position, button, modifiers, target);
                if double_click {
                    interaction.double_click(canvas, target);
                }
            }
            PointerEvent::Move {
                position,
                modifiers,
            } => interaction.pointer_move(canvas, position, modifiers),
            PointerEvent::Up {
                position,
                modifiers,
                ..
            } => interaction.pointer_up(canvas, position, modifiers),
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => interaction.wheel(canvas, position, delta, modifiers),
            PointerEvent::DoubleClick { position, .. } => {
                let target = interaction.hit_test(canvas, position);
                interaction.double_click(canvas, target);
            }
        }
    }
}
