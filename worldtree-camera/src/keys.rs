use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Movement directions a key can be bound to.
///
/// Serialized as `snake_case` so TOML configs stay readable:
/// ```toml
/// [keys]
/// KeyW = "forward"
/// Space = "ascend"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveAction {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    Ascend,
    Descend,
}

impl MoveAction {
    /// Unit contribution of this action given the camera's horizontal basis.
    pub fn direction(self, forward: Vec3, right: Vec3) -> Vec3 {
        match self {
            Self::Forward => forward,
            Self::Backward => -forward,
            Self::StrafeRight => right,
            Self::StrafeLeft => -right,
            Self::Ascend => Vec3::Y,
            Self::Descend => Vec3::NEG_Y,
        }
    }
}

/// Modifier keys held alongside a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    /// A press with Ctrl, Alt or Meta held is a shortcut chord, not movement.
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Keys whose default browser action scrolls the page.
pub fn is_navigation_key(code: &str) -> bool {
    matches!(
        code,
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Space" | "PageUp" | "PageDown"
    )
}

/// Maps physical key codes to [`MoveAction`]s.
///
/// Key strings use the DOM `KeyboardEvent.code` format: `"KeyW"`,
/// `"ArrowUp"`, `"Space"`, etc.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: HashMap<String, MoveAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyW".into(), MoveAction::Forward),
            ("ArrowUp".into(), MoveAction::Forward),
            ("KeyS".into(), MoveAction::Backward),
            ("ArrowDown".into(), MoveAction::Backward),
            ("KeyA".into(), MoveAction::StrafeLeft),
            ("ArrowLeft".into(), MoveAction::StrafeLeft),
            ("KeyD".into(), MoveAction::StrafeRight),
            ("ArrowRight".into(), MoveAction::StrafeRight),
            ("KeyE".into(), MoveAction::Ascend),
            ("Space".into(), MoveAction::Ascend),
            ("KeyQ".into(), MoveAction::Descend),
            ("KeyC".into(), MoveAction::Descend),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Bindings with no keys mapped.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Look up the action bound to a key code.
    pub fn action_for(&self, code: &str) -> Option<MoveAction> {
        self.bindings.get(code).copied()
    }

    /// Bind `code` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, code: impl Into<String>, action: MoveAction) {
        self.bindings.insert(code.into(), action);
    }

    /// Remove the binding for `code`.
    pub fn unbind(&mut self, code: &str) -> Option<MoveAction> {
        self.bindings.remove(code)
    }

    /// All key codes bound to `action`, sorted for stable display.
    pub fn keys_for(&self, action: MoveAction) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Sum of the unit directions of every bound key in `held`.
    ///
    /// Each key contributes once. Keys are tallied into net per-axis counts
    /// first, so opposing keys cancel exactly and the result does not depend
    /// on iteration order.
    pub fn desired_direction<'a>(
        &self,
        held: impl IntoIterator<Item = &'a String>,
        forward: Vec3,
        right: Vec3,
    ) -> Vec3 {
        let (mut f, mut r, mut u) = (0i32, 0i32, 0i32);
        for action in held.into_iter().filter_map(|code| self.action_for(code)) {
            match action {
                MoveAction::Forward => f += 1,
                MoveAction::Backward => f -= 1,
                MoveAction::StrafeRight => r += 1,
                MoveAction::StrafeLeft => r -= 1,
                MoveAction::Ascend => u += 1,
                MoveAction::Descend => u -= 1,
            }
        }
        if (f, r, u) == (0, 0, 0) {
            return Vec3::ZERO;
        }
        MoveAction::Forward.direction(forward, right) * f as f32
            + MoveAction::StrafeRight.direction(forward, right) * r as f32
            + MoveAction::Ascend.direction(forward, right) * u as f32
    }
}
