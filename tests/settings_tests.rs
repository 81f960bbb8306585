//! Settings files on disk feeding a live engine

use std::fs;
use std::path::PathBuf;

use serde_json::json;

use blockfall::engine::storage::SETTINGS_FILE;
use blockfall::engine::{Engine, JsonFileStore, NullAudio, Settings};
use blockfall::input::HeldKeys;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "blockfall-settings-it-{}-{}",
        std::process::id(),
        name
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_partially_broken_file_keeps_good_fields() {
    let dir = scratch_dir("partial");
    fs::create_dir_all(&dir).unwrap();
    let doc = json!({
        "das_ms": 80,
        "arr_ms": "never",
        "ghost_visible": false,
        "keybindings": { "hard_drop": ["Enter"] },
        "audio": { "volume": 0.25 },
        "unknown": 1
    });
    fs::write(dir.join(SETTINGS_FILE), doc.to_string()).unwrap();

    let settings = JsonFileStore::new(&dir).load_settings();
    let defaults = Settings::default();
    assert_eq!(settings.das_ms, 80);
    assert_eq!(settings.arr_ms, defaults.arr_ms);
    assert!(!settings.ghost_visible);
    assert_eq!(settings.keybindings.hard_drop, vec!["Enter".to_string()]);
    assert_eq!(settings.keybindings.hold, defaults.keybindings.hold);
    assert_eq!(settings.audio.volume, 0.25);
    assert!(!settings.audio.muted);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_loaded_bindings_drive_the_engine() {
    let dir = scratch_dir("bindings");
    fs::create_dir_all(&dir).unwrap();
    let doc = json!({ "keybindings": { "hard_drop": ["Enter"] } });
    fs::write(dir.join(SETTINGS_FILE), doc.to_string()).unwrap();

    let store = JsonFileStore::new(&dir);
    let settings = store.load_settings();
    let mut engine = Engine::with_collaborators(settings, 3, Box::new(NullAudio), Box::new(store));
    engine.start(3);

    engine.tick(0, &HeldKeys::from_names(["Space"]));
    assert!(engine.active().is_some(), "Space is no longer bound");

    engine.tick(16, &HeldKeys::from_names(["Enter"]));
    assert!(engine.active().is_none());
    assert_eq!(engine.score_state().score, 40);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_saved_file_is_plain_json() {
    let dir = scratch_dir("saved");
    let store = JsonFileStore::new(&dir);
    let mut settings = Settings::default();
    settings.soft_drop_percent = 100;
    store.save_settings(&settings).unwrap();

    let text = fs::read_to_string(store.settings_path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["soft_drop_percent"], json!(100));
    assert_eq!(value["keybindings"]["pause"], json!(["p", "Esc"]));
    assert_eq!(store.load_settings(), settings);
    let _ = fs::remove_dir_all(dir);
}
