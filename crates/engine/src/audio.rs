//! Audio collaborator seam.
//!
//! The engine fires a [`Cue`] for each audible event. Playback is entirely the
//! sink's business; a failing sink never affects the simulation.

use crate::settings::AudioSettings;
use crate::types::Cue;

pub trait AudioSink {
    fn play(&mut self, cue: Cue) -> anyhow::Result<()>;

    fn apply_settings(&mut self, settings: &AudioSettings) -> anyhow::Result<()>;
}

/// Sink that plays nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) -> anyhow::Result<()> {
        Ok(())
    }

    fn apply_settings(&mut self, _settings: &AudioSettings) -> anyhow::Result<()> {
        Ok(())
    }
}
