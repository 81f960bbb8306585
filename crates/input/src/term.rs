//! Crossterm key events to held key names.
//!
//! Many terminals never report key releases. [`TerminalKeys`] treats a key as
//! released once it has not been pressed or repeated for a timeout, so a tap
//! does not turn into a sustained hold.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use crate::keys::HeldKeys;

/// Default auto-release timeout for terminals without release events.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// Key name used in keybindings for a crossterm key code.
///
/// Letters are lowercased so bindings do not depend on caps lock or shift.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().collect(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            "Shift".to_string()
        }
        _ => return None,
    };
    Some(name)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Tracks which keys are held from a stream of terminal key events.
#[derive(Debug, Clone)]
pub struct TerminalKeys {
    held: HeldKeys,
    last_seen_ms: BTreeMap<String, u64>,
    release_timeout_ms: Option<u64>,
}

impl TerminalKeys {
    pub fn new() -> Self {
        Self::with_release_timeout(Some(DEFAULT_KEY_RELEASE_TIMEOUT_MS))
    }

    /// `None` disables auto-release, for terminals that report key releases.
    pub fn with_release_timeout(release_timeout_ms: Option<u64>) -> Self {
        Self {
            held: HeldKeys::new(),
            last_seen_ms: BTreeMap::new(),
            release_timeout_ms,
        }
    }

    pub fn release_timeout_ms(&self) -> Option<u64> {
        self.release_timeout_ms
    }

    pub fn handle_event(&mut self, event: KeyEvent, now_ms: u64) {
        let Some(name) = key_name(event.code) else {
            return;
        };
        match event.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                self.last_seen_ms.insert(name.clone(), now_ms);
                self.held.press(name);
            }
            KeyEventKind::Release => {
                self.last_seen_ms.remove(&name);
                self.held.release(&name);
            }
        }
    }

    /// Held keys as of `now_ms`, after expiring stale presses.
    pub fn held(&mut self, now_ms: u64) -> &HeldKeys {
        if let Some(timeout) = self.release_timeout_ms {
            let held = &mut self.held;
            self.last_seen_ms.retain(|name, seen| {
                let live = now_ms.saturating_sub(*seen) <= timeout;
                if !live {
                    held.release(name);
                }
                live
            });
        }
        &self.held
    }

    pub fn clear(&mut self) {
        self.held.clear();
        self.last_seen_ms.clear();
    }
}

impl Default for TerminalKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_key_names() {
        assert_eq!(key_name(KeyCode::Left).as_deref(), Some("Left"));
        assert_eq!(key_name(KeyCode::Char(' ')).as_deref(), Some("Space"));
        assert_eq!(key_name(KeyCode::Char('H')).as_deref(), Some("h"));
        assert_eq!(key_name(KeyCode::Esc).as_deref(), Some("Esc"));
        assert_eq!(
            key_name(KeyCode::Modifier(ModifierKeyCode::LeftShift)).as_deref(),
            Some("Shift")
        );
        assert_eq!(key_name(KeyCode::Null), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }

    #[test]
    fn test_release_event_releases_key() {
        let mut keys = TerminalKeys::with_release_timeout(None);
        keys.handle_event(press(KeyCode::Left), 0);
        assert!(keys.held(10).is_held("Left"));
        keys.handle_event(release(KeyCode::Left), 20);
        assert!(!keys.held(20).is_held("Left"));
    }

    #[test]
    fn test_auto_release_after_timeout() {
        let mut keys = TerminalKeys::with_release_timeout(Some(50));
        keys.handle_event(press(KeyCode::Left), 100);
        assert!(keys.held(150).is_held("Left"));
        assert!(!keys.held(151).is_held("Left"));
    }

    #[test]
    fn test_other_key_does_not_extend_timeout() {
        let mut keys = TerminalKeys::with_release_timeout(Some(50));
        keys.handle_event(press(KeyCode::Left), 0);
        keys.handle_event(press(KeyCode::Up), 40);
        let held = keys.held(60);
        assert!(!held.is_held("Left"));
        assert!(held.is_held("Up"));
    }

    #[test]
    fn test_repeat_events_keep_key_held() {
        let mut keys = TerminalKeys::with_release_timeout(Some(50));
        let mut repeat = press(KeyCode::Down);
        repeat.kind = KeyEventKind::Repeat;
        keys.handle_event(press(KeyCode::Down), 0);
        keys.handle_event(repeat, 40);
        keys.handle_event(repeat, 80);
        assert!(keys.held(120).is_held("Down"));
    }

    #[test]
    fn test_no_timeout_keeps_keys_held() {
        let mut keys = TerminalKeys::with_release_timeout(None);
        keys.handle_event(press(KeyCode::Char(' ')), 0);
        assert!(keys.held(60_000).is_held("Space"));
        keys.clear();
        assert!(keys.held(60_000).is_empty());
    }

    #[test]
    fn test_default_timeout_is_non_zero() {
        assert!(TerminalKeys::new().release_timeout_ms().unwrap_or(0) > 0);
    }
}
