//! Action bindings with layered overrides.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use winit::{event::MouseButton, keyboard::KeyCode};

use crate::InputContext;

/// Logical actions the player controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Walk forward.
    MoveForward,
    /// Walk backward.
    MoveBackward,
    /// Strafe left.
    MoveLeft,
    /// Strafe right.
    MoveRight,
    /// Jump (held).
    Jump,
    /// Interact with whatever is in front of the player.
    Interact,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 6] = [
        Action::MoveForward,
        Action::MoveBackward,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Interact,
    ];
}

/// Physical input bound to an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key.
    Key(KeyCode),
    /// Mouse button.
    Mouse(MouseButton),
}

/// Binding overrides as written in the controls config.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct BindingOverrides {
    /// Overrides applied in every context.
    pub base: HashMap<String, Vec<String>>,
    /// Overrides applied only during gameplay.
    pub gameplay: HashMap<String, Vec<String>>,
    /// Overrides applied while UI owns input.
    pub ui: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone)]
struct BindingLayer {
    map: HashMap<Action, Vec<InputBinding>>,
}

impl BindingLayer {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    fn insert(&mut self, action: Action, bindings: Vec<InputBinding>) {
        self.map.insert(action, bindings);
    }

    fn get(&self, action: &Action) -> Option<&[InputBinding]> {
        self.map.get(action).map(|v| v.as_slice())
    }
}

/// Resolved bindings for every context.
#[derive(Debug, Clone)]
pub struct Bindings {
    base: BindingLayer,
    gameplay: BindingLayer,
    ui: BindingLayer,
}

impl Default for Bindings {
    fn default() -> Self {
        Self::from_overrides(&BindingOverrides::default())
    }
}

impl Bindings {
    /// Start from the default base layer and apply `overrides` on top.
    pub fn from_overrides(overrides: &BindingOverrides) -> Self {
        let mut base = BindingLayer::new();
        for (action, binds) in default_base_bindings() {
            base.insert(action, binds);
        }

        let mut gameplay = BindingLayer::new();
        let mut ui = BindingLayer::new();

        apply_overrides(&mut base, &mut gameplay, &mut ui, overrides);

        let bindings = Self { base, gameplay, ui };
        bindings.warn_unbound();
        bindings
    }

    fn layer_for(&self, context: InputContext) -> &BindingLayer {
        match context {
            InputContext::Gameplay => &self.gameplay,
            InputContext::UiOverlay => &self.ui,
            InputContext::Menu => &self.ui,
        }
    }

    /// Bindings for `action` in `context`, falling back to the base layer.
    pub fn bindings_for(&self, action: &Action, context: InputContext) -> Option<&[InputBinding]> {
        self.layer_for(context)
            .get(action)
            .or_else(|| self.base.get(action))
    }

    fn warn_unbound(&self) {
        for action in Action::ALL {
            let bound = self
                .bindings_for(&action, InputContext::Gameplay)
                .is_some_and(|list| !list.is_empty());
            if !bound {
                warn!("{:?} is not bound to any input", action);
            }
        }
    }
}

fn default_base_bindings() -> Vec<(Action, Vec<InputBinding>)> {
    use InputBinding::Key;
    vec![
        (Action::MoveForward, vec![Key(KeyCode::KeyW)]),
        (Action::MoveBackward, vec![Key(KeyCode::KeyS)]),
        (Action::MoveLeft, vec![Key(KeyCode::KeyA)]),
        (Action::MoveRight, vec![Key(KeyCode::KeyD)]),
        (Action::Jump, vec![Key(KeyCode::Space)]),
        (Action::Interact, vec![Key(KeyCode::KeyE)]),
    ]
}

fn apply_overrides(
    base: &mut BindingLayer,
    gameplay: &mut BindingLayer,
    ui: &mut BindingLayer,
    overrides: &BindingOverrides,
) {
    for (layer, entries, label) in [
        (base, &overrides.base, "base"),
        (gameplay, &overrides.gameplay, "gameplay"),
        (ui, &overrides.ui, "UI"),
    ] {
        for (action_name, bindings) in entries {
            if let Some(action) = parse_action(action_name) {
                layer.insert(action, parse_bindings(bindings));
            } else {
                warn!("Unknown action '{}' in {} bindings", action_name, label);
            }
        }
    }
}

fn parse_bindings(tokens: &[String]) -> Vec<InputBinding> {
    tokens
        .iter()
        .filter_map(|token| {
            parse_binding(token).or_else(|| {
                warn!("Unknown binding token '{}'; ignoring", token);
                None
            })
        })
        .collect()
}

/// Parse a config token such as `KeyE`, `Space` or `MouseLeft`.
pub fn parse_binding(token: &str) -> Option<InputBinding> {
    if let Some(key) = parse_key_code(token) {
        return Some(InputBinding::Key(key));
    }
    match token {
        "MouseLeft" => Some(InputBinding::Mouse(MouseButton::Left)),
        "MouseRight" => Some(InputBinding::Mouse(MouseButton::Right)),
        "MouseMiddle" => Some(InputBinding::Mouse(MouseButton::Middle)),
        _ => None,
    }
}

fn parse_key_code(name: &str) -> Option<KeyCode> {
    Some(match name {
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "KeyQ" => KeyCode::KeyQ,
        "KeyE" => KeyCode::KeyE,
        "KeyR" => KeyCode::KeyR,
        "KeyF" => KeyCode::KeyF,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Space" => KeyCode::Space,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ControlLeft" => KeyCode::ControlLeft,
        "Enter" => KeyCode::Enter,
        _ => return None,
    })
}

fn parse_action(name: &str) -> Option<Action> {
    match name {
        "MoveForward" => Some(Action::MoveForward),
        "MoveBackward" => Some(Action::MoveBackward),
        "MoveLeft" => Some(Action::MoveLeft),
        "MoveRight" => Some(Action::MoveRight),
        "Jump" => Some(Action::Jump),
        "Interact" => Some(Action::Interact),
        _ => None,
    }
}
