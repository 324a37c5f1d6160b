#![warn(missing_docs)]
//! Input handling: binding physical keys to player actions.
//!
//! The host turns its window events into an [`InputSnapshot`] once per frame;
//! [`InputProcessor`] resolves bindings and derives per-edge events.

mod bindings;

use std::collections::HashSet;

use glam::Vec2;
use winit::{event::MouseButton, keyboard::KeyCode};

pub use bindings::{parse_binding, Action, BindingOverrides, Bindings, InputBinding};

/// Which layer of the application currently owns input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputContext {
    /// Menu UI owns input. Gameplay should pause.
    #[default]
    Menu,
    /// Gameplay (player control) owns input.
    Gameplay,
    /// HUD/overlay UI is focused but gameplay may still preview input.
    UiOverlay,
}

/// Snapshot of per-frame input data.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Context at the time of snapshot.
    pub context: InputContext,
    /// Keys held when the snapshot was taken.
    pub keys_pressed: HashSet<KeyCode>,
    /// Mouse buttons held at snapshot time.
    pub mouse_buttons: HashSet<MouseButton>,
    /// Cursor delta accumulated this frame.
    pub mouse_delta: (f64, f64),
}

impl InputSnapshot {
    /// Gameplay snapshot with the given keys held.
    pub fn gameplay(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            context: InputContext::Gameplay,
            keys_pressed: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Mark `binding` as held in this snapshot.
    pub fn hold(&mut self, binding: InputBinding) {
        match binding {
            InputBinding::Key(code) => {
                self.keys_pressed.insert(code);
            }
            InputBinding::Mouse(button) => {
                self.mouse_buttons.insert(button);
            }
        }
    }
}

/// Decoded action values for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionState {
    /// Context the values were resolved in.
    pub context: InputContext,
    /// Movement axis: x is right/left, y is forward/backward, each in `[-1, 1]`.
    pub move_axis: Vec2,
    /// Look axis: x is yaw input, y is pitch input (raw mouse delta).
    pub look_axis: Vec2,
    /// Jump was pressed this frame.
    pub jump_started: bool,
    /// Jump was released this frame.
    pub jump_completed: bool,
    /// Interact was pressed this frame.
    pub interact_started: bool,
}

/// Resolves bindings against successive snapshots.
#[derive(Debug)]
pub struct InputProcessor {
    bindings: Bindings,
    prev_keys: HashSet<KeyCode>,
    prev_mouse: HashSet<MouseButton>,
}

impl InputProcessor {
    /// Create a processor with the given bindings.
    pub fn new(bindings: Bindings) -> Self {
        Self {
            bindings,
            prev_keys: HashSet::new(),
            prev_mouse: HashSet::new(),
        }
    }

    /// Decode one frame of input.
    pub fn process(&mut self, snapshot: &InputSnapshot) -> ActionState {
        let mut state = ActionState {
            context: snapshot.context,
            ..ActionState::default()
        };

        if snapshot.context == InputContext::Gameplay {
            state.move_axis = Vec2::new(
                axis_value(&self.bindings, Action::MoveRight, Action::MoveLeft, snapshot),
                axis_value(
                    &self.bindings,
                    Action::MoveForward,
                    Action::MoveBackward,
                    snapshot,
                ),
            );
            state.look_axis = Vec2::new(snapshot.mouse_delta.0 as f32, snapshot.mouse_delta.1 as f32);
            state.jump_started = self.action_triggered(Action::Jump, snapshot);
            state.interact_started = self.action_triggered(Action::Interact, snapshot);
        }
        // Releases are reported in every context so a held jump never sticks.
        state.jump_completed = self.action_released(Action::Jump, snapshot);

        self.prev_keys = snapshot.keys_pressed.clone();
        self.prev_mouse = snapshot.mouse_buttons.clone();

        state
    }

    fn action_triggered(&self, action: Action, snapshot: &InputSnapshot) -> bool {
        self.bindings
            .bindings_for(&action, snapshot.context)
            .map(|list| {
                list.iter().any(|binding| {
                    binding_active(binding, &snapshot.keys_pressed, &snapshot.mouse_buttons)
                        && !binding_active(binding, &self.prev_keys, &self.prev_mouse)
                })
            })
            .unwrap_or(false)
    }

    fn action_released(&self, action: Action, snapshot: &InputSnapshot) -> bool {
        self.bindings
            .bindings_for(&action, snapshot.context)
            .map(|list| {
                let was = list
                    .iter()
                    .any(|binding| binding_active(binding, &self.prev_keys, &self.prev_mouse));
                let now = list.iter().any(|binding| {
                    binding_active(binding, &snapshot.keys_pressed, &snapshot.mouse_buttons)
                });
                was && !now
            })
            .unwrap_or(false)
    }
}

fn axis_value(
    bindings: &Bindings,
    positive: Action,
    negative: Action,
    snapshot: &InputSnapshot,
) -> f32 {
    let held = |action: Action| {
        bindings
            .bindings_for(&action, snapshot.context)
            .map(|list| {
                list.iter().any(|binding| {
                    binding_active(binding, &snapshot.keys_pressed, &snapshot.mouse_buttons)
                })
            })
            .unwrap_or(false)
    };

    (held(positive) as i32 - held(negative) as i32) as f32
}

fn binding_active(
    binding: &InputBinding,
    keys: &HashSet<KeyCode>,
    mouse: &HashSet<MouseButton>,
) -> bool {
    match binding {
        InputBinding::Key(code) => keys.contains(code),
        InputBinding::Mouse(btn) => mouse.contains(btn),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTHING: [KeyCode; 0] = [];

    fn processor() -> InputProcessor {
        InputProcessor::new(Bindings::default())
    }

    #[test]
    fn movement_axes_follow_held_keys() {
        let mut input = processor();
        let state = input.process(&InputSnapshot::gameplay([KeyCode::KeyW, KeyCode::KeyA]));
        assert_eq!(state.move_axis, Vec2::new(-1.0, 1.0));

        let state = input.process(&InputSnapshot::gameplay([KeyCode::KeyW, KeyCode::KeyS]));
        assert_eq!(state.move_axis, Vec2::ZERO);
    }

    #[test]
    fn interact_is_edge_triggered() {
        let mut input = processor();
        let first = input.process(&InputSnapshot::gameplay([KeyCode::KeyE]));
        let held = input.process(&InputSnapshot::gameplay([KeyCode::KeyE]));
        let released = input.process(&InputSnapshot::gameplay(NOTHING));
        let again = input.process(&InputSnapshot::gameplay([KeyCode::KeyE]));

        assert!(first.interact_started);
        assert!(!held.interact_started);
        assert!(!released.interact_started);
        assert!(again.interact_started);
    }

    #[test]
    fn jump_reports_start_and_completion() {
        let mut input = processor();
        let pressed = input.process(&InputSnapshot::gameplay([KeyCode::Space]));
        let held = input.process(&InputSnapshot::gameplay([KeyCode::Space]));
        let released = input.process(&InputSnapshot::gameplay(NOTHING));

        assert!(pressed.jump_started && !pressed.jump_completed);
        assert!(!held.jump_started && !held.jump_completed);
        assert!(!released.jump_started && released.jump_completed);
    }

    #[test]
    fn menu_context_suppresses_gameplay_actions() {
        let mut input = processor();
        let mut snapshot = InputSnapshot::gameplay([KeyCode::KeyW, KeyCode::KeyE]);
        snapshot.context = InputContext::Menu;
        snapshot.mouse_delta = (4.0, 2.0);

        let state = input.process(&snapshot);
        assert_eq!(state.move_axis, Vec2::ZERO);
        assert_eq!(state.look_axis, Vec2::ZERO);
        assert!(!state.interact_started);
    }

    #[test]
    fn held_mouse_button_triggers_rebound_interact() {
        let mut overrides = BindingOverrides::default();
        overrides
            .gameplay
            .insert("Interact".into(), vec!["MouseLeft".into()]);
        let mut input = InputProcessor::new(Bindings::from_overrides(&overrides));

        let mut snapshot = InputSnapshot::gameplay(NOTHING);
        snapshot.hold(InputBinding::Mouse(MouseButton::Left));
        assert!(input.process(&snapshot).interact_started);
        assert!(!input.process(&InputSnapshot::gameplay([KeyCode::KeyE])).interact_started);
    }

    #[test]
    fn look_axis_passes_mouse_delta_through() {
        let mut input = processor();
        let mut snapshot = InputSnapshot::gameplay(NOTHING);
        snapshot.mouse_delta = (3.0, -1.5);
        assert_eq!(input.process(&snapshot).look_axis, Vec2::new(3.0, -1.5));
    }
}
