//! Player settings: input timing, keybindings and cosmetic flags.
//!
//! Settings are owned outside the engine and handed in whole. Loading is
//! lenient: a field that is missing or fails to deserialize falls back to its
//! default and the rest of the record is kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use blockfall_input::{Keybindings, TimingConfig};

use crate::types::{DEFAULT_ARR_MS, DEFAULT_DAS_MS, DEFAULT_SOFT_DROP_PERCENT};

/// Upper bound accepted for DAS and ARR.
pub const MAX_REPEAT_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    pub volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            muted: false,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    pub fn effective_gain(self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub das_ms: u32,
    pub arr_ms: u32,
    /// Soft drop speed as a percentage, 1..=100.
    pub soft_drop_percent: u8,
    pub keybindings: Keybindings,
    pub ghost_visible: bool,
    pub audio: AudioSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_percent: DEFAULT_SOFT_DROP_PERCENT,
            keybindings: Keybindings::default(),
            ghost_visible: true,
            audio: AudioSettings::default(),
        }
    }
}

impl Settings {
    pub fn sanitized(mut self) -> Self {
        self.das_ms = self.das_ms.min(MAX_REPEAT_MS);
        self.arr_ms = self.arr_ms.min(MAX_REPEAT_MS);
        self.soft_drop_percent = self.soft_drop_percent.clamp(1, 100);
        self.audio = self.audio.clamp();
        self
    }

    pub fn timing_config(&self) -> TimingConfig {
        TimingConfig {
            das_ms: self.das_ms,
            arr_ms: self.arr_ms,
            soft_drop_percent: self.soft_drop_percent,
        }
    }

    /// Build settings from a parsed JSON document, field by field.
    ///
    /// Anything that is not an object yields the defaults.
    pub fn from_json_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(obj) = value.as_object() else {
            warn!("settings document is not an object, using defaults");
            return defaults;
        };

        Self {
            das_ms: field_or(obj, "das_ms", defaults.das_ms),
            arr_ms: field_or(obj, "arr_ms", defaults.arr_ms),
            soft_drop_percent: field_or(obj, "soft_drop_percent", defaults.soft_drop_percent),
            keybindings: field_or(obj, "keybindings", defaults.keybindings),
            ghost_visible: field_or(obj, "ghost_visible", defaults.ghost_visible),
            audio: field_or(obj, "audio", defaults.audio),
        }
        .sanitized()
    }

    /// Parse settings text. Invalid JSON yields the defaults.
    pub fn from_json_str(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_json_value(&value),
            Err(err) => {
                warn!(error = %err, "settings are not valid JSON, using defaults");
                Self::default()
            }
        }
    }
}

fn field_or<T: DeserializeOwned>(obj: &serde_json::Map<String, Value>, key: &str, default: T) -> T {
    let Some(raw) = obj.get(key) else {
        return default;
    };
    match T::deserialize(raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(field = key, error = %err, "malformed settings field, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.das_ms, 150);
        assert_eq!(settings.arr_ms, 50);
        assert_eq!(settings.soft_drop_percent, 50);
        assert!(settings.ghost_visible);
        assert_eq!(settings.audio, AudioSettings::default());
    }

    #[test]
    fn test_malformed_field_falls_back_alone() {
        let settings =
            Settings::from_json_str(r#"{"das_ms":"fast","arr_ms":20,"ghost_visible":false}"#);
        assert_eq!(settings.das_ms, DEFAULT_DAS_MS);
        assert_eq!(settings.arr_ms, 20);
        assert!(!settings.ghost_visible);
        assert_eq!(settings.keybindings, Keybindings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = Settings::from_json_str(
            r#"{"das_ms":99999,"soft_drop_percent":0,"audio":{"volume":3.5,"muted":true}}"#,
        );
        assert_eq!(settings.das_ms, MAX_REPEAT_MS);
        assert_eq!(settings.soft_drop_percent, 1);
        assert_eq!(settings.audio.volume, 1.0);
        assert!(settings.audio.muted);
    }

    #[test]
    fn test_partial_keybindings_keep_other_defaults() {
        let settings = Settings::from_json_str(r#"{"keybindings":{"hard_drop":["Enter"]}}"#);
        assert_eq!(settings.keybindings.hard_drop, vec!["Enter".to_string()]);
        assert_eq!(
            settings.keybindings.move_left,
            Keybindings::default().move_left
        );
    }

    #[test]
    fn test_garbage_yields_defaults() {
        assert_eq!(Settings::from_json_str("not json"), Settings::default());
        assert_eq!(Settings::from_json_str("[1,2,3]"), Settings::default());
    }

    #[test]
    fn test_serialized_settings_load_back() {
        let mut settings = Settings::default();
        settings.arr_ms = 0;
        settings.soft_drop_percent = 100;
        let text = serde_json::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::from_json_str(&text), settings);
    }

    #[test]
    fn test_mute_zeroes_gain() {
        let audio = AudioSettings {
            volume: 0.4,
            muted: true,
        };
        assert_eq!(audio.effective_gain(), 0.0);
    }
}
