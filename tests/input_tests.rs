//! Input pipeline tests: terminal events -> held keys -> actions -> timed input

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use blockfall::input::{
    ActionMask, HeldKeys, InputTiming, Keybindings, LogicalInput, TerminalKeys, TimingConfig,
};
use blockfall::types::Action;

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn release(code: KeyCode) -> KeyEvent {
    KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
}

/// Run `ticks` updates of `dt` with `held` and return the tick indices where
/// `pick` fired.
fn fire_ticks(
    timing: &mut InputTiming,
    config: &TimingConfig,
    held: &ActionMask,
    dt: u32,
    ticks: usize,
    pick: fn(&LogicalInput) -> bool,
) -> Vec<usize> {
    (0..ticks)
        .filter_map(|i| pick(&timing.update(dt, held, config)).then_some(i))
        .collect()
}

#[test]
fn test_das_then_arr_schedule() {
    let config = TimingConfig {
        das_ms: 100,
        arr_ms: 20,
        soft_drop_percent: 50,
    };
    let mut timing = InputTiming::new();
    let held = ActionMask::of(&[Action::MoveLeft]);
    let fired = fire_ticks(&mut timing, &config, &held, 10, 20, |i| i.move_left);
    assert_eq!(fired, vec![0, 12, 14, 16, 18]);
}

#[test]
fn test_zero_arr_repeats_every_tick_after_das() {
    let config = TimingConfig {
        das_ms: 50,
        arr_ms: 0,
        soft_drop_percent: 50,
    };
    let mut timing = InputTiming::new();
    let held = ActionMask::of(&[Action::MoveRight]);
    let fired = fire_ticks(&mut timing, &config, &held, 10, 10, |i| i.move_right);
    assert_eq!(fired, vec![0, 6, 7, 8, 9]);
}

#[test]
fn test_full_speed_soft_drop_fires_every_tick() {
    let config = TimingConfig {
        soft_drop_percent: 100,
        ..TimingConfig::default()
    };
    assert_eq!(config.soft_drop_arr_ms(), None);
    let mut timing = InputTiming::new();
    let held = ActionMask::of(&[Action::SoftDrop]);
    let fired = fire_ticks(&mut timing, &config, &held, 16, 8, |i| i.soft_drop);
    assert_eq!(fired, (0..8).collect::<Vec<_>>());
}

#[test]
fn test_edge_actions_need_a_release() {
    let config = TimingConfig::default();
    let mut timing = InputTiming::new();
    let held = ActionMask::of(&[Action::HardDrop, Action::Hold, Action::RotateCw]);

    let first = timing.update(16, &held, &config);
    assert!(first.hard_drop && first.hold && first.rotate_cw);
    for _ in 0..50 {
        assert!(timing.update(16, &held, &config).is_empty());
    }

    timing.update(16, &ActionMask::empty(), &config);
    assert!(timing.update(16, &held, &config).hard_drop);
}

#[test]
fn test_terminal_events_drive_actions() {
    let bindings = Keybindings::default();
    let mut keys = TerminalKeys::with_release_timeout(None);

    keys.handle_event(press(KeyCode::Left), 0);
    keys.handle_event(press(KeyCode::Char(' ')), 0);
    let mask = bindings.resolve(keys.held(10));
    assert!(mask.is_set(Action::MoveLeft));
    assert!(mask.is_set(Action::HardDrop));
    assert!(!mask.is_set(Action::MoveRight));

    keys.handle_event(release(KeyCode::Left), 20);
    let mask = bindings.resolve(keys.held(1_000));
    assert!(!mask.is_set(Action::MoveLeft));
    assert!(mask.is_set(Action::HardDrop), "no timeout configured");
}

#[test]
fn test_letter_keys_are_case_insensitive() {
    let bindings = Keybindings::default();
    let mut keys = TerminalKeys::with_release_timeout(None);
    keys.handle_event(press(KeyCode::Char('Z')), 0);
    assert!(bindings.resolve(keys.held(0)).is_set(Action::RotateCcw));
}

#[test]
fn test_stale_keys_auto_release() {
    let mut keys = TerminalKeys::new();
    let timeout = keys.release_timeout_ms().unwrap();

    keys.handle_event(press(KeyCode::Right), 0);
    assert!(keys.held(timeout).is_held("Right"));

    // An autorepeat event refreshes the key.
    keys.handle_event(
        KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Repeat),
        timeout,
    );
    assert!(keys.held(timeout * 2).is_held("Right"));
    assert!(!keys.held(timeout * 2 + 1).is_held("Right"));
    assert!(keys.held(timeout * 3).is_empty());
}

#[test]
fn test_action_for_first_binding_wins() {
    let mut bindings = Keybindings::default();
    bindings.hold.push("Left".to_string());
    assert_eq!(bindings.action_for("Left"), Some(Action::MoveLeft));
    assert_eq!(bindings.action_for("c"), Some(Action::Hold));
    assert_eq!(bindings.action_for("F5"), None);

    // Both actions are held by the shared key.
    let mask = bindings.resolve(&HeldKeys::from_names(["Left"]));
    assert!(mask.is_set(Action::MoveLeft));
    assert!(mask.is_set(Action::Hold));
}
