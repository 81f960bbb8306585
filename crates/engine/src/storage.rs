//! Persistence: best score and settings.
//!
//! [`ScoreStore`] is the seam the engine calls on game over. [`JsonFileStore`]
//! keeps both the best score and the settings as JSON files in one config
//! directory; [`MemoryStore`] is the in-process default.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::settings::Settings;

pub const SETTINGS_FILE: &str = "settings.json";
pub const BEST_SCORE_FILE: &str = "best_score.json";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "BLOCKFALL_CONFIG_DIR";

pub trait ScoreStore {
    fn best_score(&self) -> anyhow::Result<u64>;

    /// Record a finished game. Returns true if it is a new best.
    fn record_score(&mut self, score: u64) -> anyhow::Result<bool>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryStore {
    best: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u64) -> Self {
        Self { best }
    }
}

impl ScoreStore for MemoryStore {
    fn best_score(&self) -> anyhow::Result<u64> {
        Ok(self.best)
    }

    fn record_score(&mut self, score: u64) -> anyhow::Result<bool> {
        if score > self.best {
            self.best = score;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
struct BestScoreFile {
    best_score: u64,
}

/// Resolve the config directory.
///
/// Order: explicit path, `BLOCKFALL_CONFIG_DIR`, `$XDG_CONFIG_HOME/blockfall`,
/// `$HOME/.config/blockfall`, then the current directory.
pub fn resolve_config_dir(explicit: Option<&Path>) -> PathBuf {
    resolve_config_dir_with(explicit, |key| std::env::var_os(key))
}

fn resolve_config_dir_with<F>(explicit: Option<&Path>, env: F) -> PathBuf
where
    F: Fn(&str) -> Option<OsString>,
{
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = env(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    env("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            env("HOME").map(|home| {
                let mut p = PathBuf::from(home);
                p.push(".config");
                p
            })
        })
        .map(|mut base| {
            base.push("blockfall");
            base
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env(explicit: Option<&Path>) -> Self {
        Self::new(resolve_config_dir(explicit))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    pub fn best_score_path(&self) -> PathBuf {
        self.dir.join(BEST_SCORE_FILE)
    }

    /// Load settings, falling back to defaults for anything unusable.
    pub fn load_settings(&self) -> Settings {
        let path = self.settings_path();
        match fs::read_to_string(&path) {
            Ok(text) => Settings::from_json_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                Settings::default()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read settings");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(settings)?;
        self.write(&self.settings_path(), &text)
    }

    fn write(&self, path: &Path, text: &str) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create config dir {}", self.dir.display()))?;
        fs::write(path, text).with_context(|| format!("write {}", path.display()))
    }
}

impl ScoreStore for JsonFileStore {
    fn best_score(&self) -> anyhow::Result<u64> {
        let path = self.best_score_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => {
                return Err(err).with_context(|| format!("read {}", path.display()));
            }
        };
        let file: BestScoreFile = serde_json::from_str(&text)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(file.best_score)
    }

    fn record_score(&mut self, score: u64) -> anyhow::Result<bool> {
        // An unreadable file is replaced rather than blocking new records.
        let best = match self.best_score() {
            Ok(best) => best,
            Err(err) => {
                warn!(error = %err, "discarding unreadable best score");
                0
            }
        };
        if score <= best {
            return Ok(false);
        }
        let text = serde_json::to_string_pretty(&BestScoreFile { best_score: score })?;
        self.write(&self.best_score_path(), &text)?;
        Ok(true)
    }
}
