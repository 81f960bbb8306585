//! Input layer (engine-facing).
//!
//! Independent of any UI framework except for the [`term`] module, which
//! names `crossterm` key codes and tracks held keys for terminals (including
//! terminals without key-release events).
//!
//! - [`keys`]: held key names and the keybinding table that resolves them
//! - [`timing`]: DAS/ARR model turning held actions into per-tick signals
//! - [`term`]: crossterm key naming and held-key tracking

pub mod keys;
pub mod term;
pub mod timing;

pub use blockfall_types as types;

pub use keys::{ActionMask, HeldKeys, Keybindings};
pub use term::{key_name, should_quit, TerminalKeys};
pub use timing::{InputTiming, LogicalInput, TimingConfig};
