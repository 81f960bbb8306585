//! Engine layer: the game orchestrator and its collaborator seams.
//!
//! - [`engine`]: the [`Engine`] state machine advanced once per frame
//! - [`settings`]: player settings with lenient JSON loading
//! - [`audio`]: the [`AudioSink`] seam for sound cues
//! - [`storage`]: the [`ScoreStore`] seam and a JSON file store
//!
//! Collaborator failures are logged through `tracing` and never change the
//! simulation.

pub mod audio;
pub mod engine;
pub mod settings;
pub mod storage;

pub use blockfall_types as types;

pub use audio::{AudioSink, NullAudio};
pub use engine::Engine;
pub use settings::{AudioSettings, Settings};
pub use storage::{resolve_config_dir, JsonFileStore, MemoryStore, ScoreStore};
