//! Raw held-key state and the keybinding table that resolves it into actions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::Action;

/// Names of the keys currently held down, as reported by the input source.
///
/// Names are free-form strings ("Left", "Space", "a"); the only requirement is
/// that the input source and the [`Keybindings`] agree on them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeldKeys {
    keys: BTreeSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn press(&mut self, name: impl Into<String>) {
        self.keys.insert(name.into());
    }

    pub fn release(&mut self, name: &str) {
        self.keys.remove(name);
    }

    pub fn is_held(&self, name: &str) -> bool {
        self.keys.contains(name)
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// Which logical actions are held this tick, before any DAS/ARR timing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionMask([bool; Action::COUNT]);

impl ActionMask {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(actions: &[Action]) -> Self {
        let mut mask = Self::empty();
        for &action in actions {
            mask.set(action, true);
        }
        mask
    }

    pub fn set(&mut self, action: Action, held: bool) {
        self.0[action.index()] = held;
    }

    #[inline]
    pub fn is_set(&self, action: Action) -> bool {
        self.0[action.index()]
    }
}

/// Key names bound to each action. Any one of them being held holds the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub soft_drop: Vec<String>,
    pub hard_drop: Vec<String>,
    pub rotate_cw: Vec<String>,
    pub rotate_ccw: Vec<String>,
    pub hold: Vec<String>,
    pub pause: Vec<String>,
}

fn names(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            move_left: names(&["Left", "a", "h"]),
            move_right: names(&["Right", "d", "l"]),
            soft_drop: names(&["Down", "s", "j"]),
            hard_drop: names(&["Space"]),
            rotate_cw: names(&["Up", "x", "w", "k"]),
            rotate_ccw: names(&["z", "y"]),
            hold: names(&["c", "Shift"]),
            pause: names(&["p", "Esc"]),
        }
    }
}

impl Keybindings {
    pub fn keys_for(&self, action: Action) -> &[String] {
        match action {
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::SoftDrop => &self.soft_drop,
            Action::HardDrop => &self.hard_drop,
            Action::RotateCw => &self.rotate_cw,
            Action::RotateCcw => &self.rotate_ccw,
            Action::Hold => &self.hold,
            Action::Pause => &self.pause,
        }
    }

    /// The action a key name is bound to, first match in [`Action::ALL`] order.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|&action| self.keys_for(action).iter().any(|k| k == key))
    }

    /// Resolve raw held keys into held actions.
    pub fn resolve(&self, held: &HeldKeys) -> ActionMask {
        let mut mask = ActionMask::empty();
        for action in Action::ALL {
            let down = self.keys_for(action).iter().any(|k| held.is_held(k));
            mask.set(action, down);
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_resolve() {
        let bindings = Keybindings::default();
        let held = HeldKeys::from_names(["Left", "Space"]);
        let mask = bindings.resolve(&held);
        assert!(mask.is_set(Action::MoveLeft));
        assert!(mask.is_set(Action::HardDrop));
        assert!(!mask.is_set(Action::MoveRight));
        assert!(!mask.is_set(Action::Pause));
    }

    #[test]
    fn test_any_alias_holds_the_action() {
        let bindings = Keybindings::default();
        assert!(bindings
            .resolve(&HeldKeys::from_names(["k"]))
            .is_set(Action::RotateCw));
        assert!(bindings
            .resolve(&HeldKeys::from_names(["Up"]))
            .is_set(Action::RotateCw));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let bindings = Keybindings::default();
        let mask = bindings.resolve(&HeldKeys::from_names(["F12", "q"]));
        assert_eq!(mask, ActionMask::empty());
    }

    #[test]
    fn test_action_for() {
        let bindings = Keybindings::default();
        assert_eq!(bindings.action_for("c"), Some(Action::Hold));
        assert_eq!(bindings.action_for("Esc"), Some(Action::Pause));
        assert_eq!(bindings.action_for("q"), None);
    }

    #[test]
    fn test_held_keys_press_release() {
        let mut held = HeldKeys::new();
        held.press("a");
        held.press("a");
        assert!(held.is_held("a"));
        held.release("a");
        assert!(held.is_empty());
    }
}
