//! Engine - the game orchestrator
//!
//! Ties the field, rotation system, piece queue, scoring and input timing
//! together into one real-time state machine advanced by [`Engine::tick`].
//!
//! Play phases run Spawn -> Fall -> Lock -> LineClear -> Spawn. The session is
//! Title -> Playing -> GameOver; pause is a flag on Playing that freezes every
//! play-phase timer.

use std::fmt;

use arrayvec::ArrayVec;
use tracing::{debug, warn};

use blockfall_core::{
    apply_update, attempt_rotate, gravity_delay_ms, Field, GameSnapshot, Piece, PieceQueue,
    ScoreState, TimersSnapshot,
};
use blockfall_input::{HeldKeys, InputTiming, LogicalInput, TimingConfig};

use crate::audio::{AudioSink, NullAudio};
use crate::settings::Settings;
use crate::storage::{MemoryStore, ScoreStore};
use crate::types::{
    Cue, PieceKind, PlayPhase, RotationDir, SessionState, LINE_CLEAR_PAUSE_MS, LOCK_DELAY_MS,
    LOCK_RESET_LIMIT, MAX_FRAME_DELTA_MS, QUEUE_LOOKAHEAD,
};

/// Most cues a single tick can fire: two moves, two rotations, hard drop,
/// lock, line clear and level up.
const MAX_CUES_PER_TICK: usize = 8;

pub struct Engine {
    settings: Settings,
    timing: TimingConfig,
    field: Field,
    active: Option<Piece>,
    hold: Option<PieceKind>,
    hold_used: bool,
    queue: PieceQueue,
    score: ScoreState,
    best_score: u64,
    session: SessionState,
    phase: PlayPhase,
    paused: bool,
    input: InputTiming,
    last_tick_ms: Option<u64>,
    gravity_ms: u32,
    lock_ms: u32,
    lock_resets: u8,
    line_clear_ms: u32,
    cues: ArrayVec<Cue, MAX_CUES_PER_TICK>,
    audio: Box<dyn AudioSink>,
    store: Box<dyn ScoreStore>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.session)
            .field("phase", &self.phase)
            .field("paused", &self.paused)
            .field("active", &self.active)
            .field("hold", &self.hold)
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Engine on the title screen with silent audio and an in-memory store.
    pub fn new(settings: Settings, seed: u32) -> Self {
        Self::with_collaborators(
            settings,
            seed,
            Box::new(NullAudio),
            Box::new(MemoryStore::new()),
        )
    }

    pub fn with_collaborators(
        settings: Settings,
        seed: u32,
        mut audio: Box<dyn AudioSink>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let settings = settings.sanitized();
        if let Err(err) = audio.apply_settings(&settings.audio) {
            warn!(error = %err, "audio sink rejected settings");
        }
        let best_score = store.best_score().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read best score");
            0
        });

        Self {
            timing: settings.timing_config(),
            settings,
            field: Field::new(),
            active: None,
            hold: None,
            hold_used: false,
            queue: PieceQueue::new(seed),
            score: ScoreState::new(),
            best_score,
            session: SessionState::Title,
            phase: PlayPhase::Spawn,
            paused: false,
            input: InputTiming::new(),
            last_tick_ms: None,
            gravity_ms: 0,
            lock_ms: 0,
            lock_resets: 0,
            line_clear_ms: 0,
            cues: ArrayVec::new(),
            audio,
            store,
        }
    }

    /// Start (or restart) a session and spawn the first piece.
    pub fn start(&mut self, seed: u32) {
        self.field.clear();
        self.active = None;
        self.hold = None;
        self.hold_used = false;
        self.queue = PieceQueue::new(seed);
        self.score = ScoreState::new();
        self.session = SessionState::Playing;
        self.phase = PlayPhase::Spawn;
        self.paused = false;
        self.input.reset();
        self.last_tick_ms = None;
        self.gravity_ms = 0;
        self.line_clear_ms = 0;
        self.reset_lock_state();
        self.cues.clear();

        debug!(seed, "session started");
        self.spawn_piece();
    }

    /// Replace the settings wholesale. Game state is untouched.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.timing = self.settings.timing_config();
        if let Err(err) = self.audio.apply_settings(&self.settings.audio) {
            warn!(error = %err, "audio sink rejected settings");
        }
    }

    /// Advance the simulation to `now_ms` with the keys currently held.
    pub fn tick(&mut self, now_ms: u64, keys: &HeldKeys) {
        self.cues.clear();

        let elapsed = match self.last_tick_ms {
            Some(prev) => now_ms.saturating_sub(prev),
            None => 0,
        };
        self.last_tick_ms = Some(now_ms);

        if self.session != SessionState::Playing {
            return;
        }

        let dt = elapsed.min(u64::from(MAX_FRAME_DELTA_MS)) as u32;
        let held = self.settings.keybindings.resolve(keys);

        if self.paused {
            if self.input.update(0, &held, &self.timing).pause {
                self.paused = false;
                debug!("resumed");
            }
            return;
        }

        if self.phase == PlayPhase::LineClear {
            self.line_clear_ms = self.line_clear_ms.saturating_sub(dt);
            if self.line_clear_ms == 0 {
                self.phase = PlayPhase::Spawn;
            }
            return;
        }

        if self.phase == PlayPhase::Spawn && !self.spawn_piece() {
            return;
        }

        let input = self.input.update(dt, &held, &self.timing);

        if input.pause {
            self.paused = true;
            debug!("paused");
            return;
        }

        if self.active.is_none() {
            return;
        }

        if input.hold && !self.hold_used {
            self.hold_piece();
            return;
        }

        if input.hard_drop {
            self.hard_drop();
            return;
        }

        if self.apply_moves(&input) {
            self.apply_lock_reset();
        }
        if input.soft_drop {
            self.soft_drop_step();
        }

        self.advance_gravity(dt);
    }

    /// Left, right, rotate CW, then rotate CCW. Returns whether any of them
    /// succeeded.
    fn apply_moves(&mut self, input: &LogicalInput) -> bool {
        let mut moved = false;

        if input.move_left && self.try_shift(-1) {
            moved = true;
            self.emit(Cue::Move);
        }
        if input.move_right && self.try_shift(1) {
            moved = true;
            self.emit(Cue::Move);
        }
        if input.rotate_cw && self.try_rotate(RotationDir::Cw) {
            moved = true;
            self.emit(Cue::Rotate);
        }
        if input.rotate_ccw && self.try_rotate(RotationDir::Ccw) {
            moved = true;
            self.emit(Cue::Rotate);
        }
        moved
    }

    fn try_shift(&mut self, dx: i8) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        if !self.field.is_position_legal(&piece, dx, 0) {
            return false;
        }
        self.active = Some(piece.shifted(dx, 0));
        true
    }

    fn try_rotate(&mut self, dir: RotationDir) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        match attempt_rotate(&self.field, &piece, dir) {
            Some(rotated) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    fn soft_drop_step(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        if !self.field.is_position_legal(&piece, 0, -1) {
            return;
        }
        self.active = Some(piece.shifted(0, -1));
        apply_update(&mut self.score, 0, 1, 0);
        self.gravity_ms = 0;
    }

    fn can_fall(&self) -> bool {
        self.active
            .is_some_and(|piece| self.field.is_position_legal(&piece, 0, -1))
    }

    /// Lock-delay bookkeeping after a successful move or rotation.
    fn apply_lock_reset(&mut self) {
        if self.can_fall() {
            self.phase = PlayPhase::Fall;
            self.lock_resets = 0;
            self.lock_ms = 0;
        } else if self.lock_resets < LOCK_RESET_LIMIT {
            self.lock_resets += 1;
            self.lock_ms = 0;
        }
    }

    fn advance_gravity(&mut self, dt: u32) {
        match self.phase {
            PlayPhase::Fall => {
                self.gravity_ms = self.gravity_ms.saturating_add(dt);
                if self.gravity_ms < gravity_delay_ms(self.score.level) {
                    return;
                }
                self.gravity_ms = 0;
                match self.active {
                    Some(piece) if self.field.is_position_legal(&piece, 0, -1) => {
                        self.active = Some(piece.shifted(0, -1));
                    }
                    Some(_) => {
                        self.phase = PlayPhase::Lock;
                        self.lock_ms = 0;
                    }
                    None => {}
                }
            }
            PlayPhase::Lock => {
                self.lock_ms = self.lock_ms.saturating_add(dt);
                if self.lock_ms >= LOCK_DELAY_MS {
                    self.lock_piece(0);
                }
            }
            PlayPhase::Spawn | PlayPhase::LineClear => {}
        }
    }

    fn hard_drop(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        let landed = self.field.ghost_of(&piece);
        let cells = (piece.y - landed.y).max(0) as u32;
        self.active = Some(landed);
        self.emit(Cue::HardDrop);
        self.lock_piece(cells);
    }

    fn hold_piece(&mut self) {
        let Some(current) = self.active else {
            return;
        };
        let next = match self.hold.replace(current.kind) {
            Some(kind) => kind,
            None => self.queue.pop(),
        };

        self.hold_used = true;
        self.phase = PlayPhase::Fall;
        self.gravity_ms = 0;
        self.reset_lock_state();

        let piece = Piece::spawn(next);
        if self.field.is_position_legal(&piece, 0, 0) {
            self.active = Some(piece);
        } else {
            self.active = None;
            self.end_game("block out on hold");
        }
    }

    /// Stamp the active piece, clear rows and score. `hard_cells` is the hard
    /// drop distance that led here, if any.
    fn lock_piece(&mut self, hard_cells: u32) {
        let Some(piece) = self.active.take() else {
            return;
        };

        let stored = self.field.place(&piece);
        let cleared = self.field.clear_completed_rows();
        let outcome = apply_update(&mut self.score, cleared, 0, hard_cells);

        self.emit(Cue::Lock);
        if cleared > 0 {
            self.emit(Cue::LineClear);
        }
        if outcome.level_up {
            self.emit(Cue::LevelUp);
            debug!(level = self.score.level, "level up");
        }

        self.hold_used = false;
        self.gravity_ms = 0;
        self.reset_lock_state();
        if cleared > 0 {
            self.phase = PlayPhase::LineClear;
            self.line_clear_ms = LINE_CLEAR_PAUSE_MS;
        } else {
            self.phase = PlayPhase::Spawn;
        }

        if !stored || self.field.is_overflowed() {
            self.end_game("overflow");
        }
    }

    /// Pop the next kind and place it at spawn. Returns false on block out.
    fn spawn_piece(&mut self) -> bool {
        let piece = Piece::spawn(self.queue.pop());

        self.phase = PlayPhase::Fall;
        self.gravity_ms = 0;
        self.hold_used = false;
        self.reset_lock_state();

        if self.field.is_position_legal(&piece, 0, 0) {
            self.active = Some(piece);
            true
        } else {
            self.active = None;
            self.end_game("block out");
            false
        }
    }

    fn reset_lock_state(&mut self) {
        self.lock_ms = 0;
        self.lock_resets = 0;
    }

    fn end_game(&mut self, reason: &'static str) {
        self.session = SessionState::GameOver;
        let score = self.score.score;
        debug!(reason, score, "game over");

        match self.store.record_score(score) {
            Ok(true) => debug!(score, "new best score"),
            Ok(false) => {}
            Err(err) => warn!(error = %err, "failed to record score"),
        }
        self.best_score = self.best_score.max(score);
    }

    fn emit(&mut self, cue: Cue) {
        let pushed = self.cues.try_push(cue).is_ok();
        debug_assert!(pushed, "cue outbox full");
        if let Err(err) = self.audio.play(cue) {
            warn!(cue = cue.as_str(), error = %err, "audio cue failed");
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    /// Where the active piece would land. Derived, never stored.
    pub fn ghost(&self) -> Option<Piece> {
        self.active.map(|piece| self.field.ghost_of(&piece))
    }

    pub fn hold(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn hold_used(&self) -> bool {
        self.hold_used
    }

    pub fn queue_preview(&self) -> [PieceKind; QUEUE_LOOKAHEAD] {
        self.queue.preview()
    }

    pub fn score_state(&self) -> ScoreState {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn phase(&self) -> PlayPhase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u32 {
        self.queue.seed()
    }

    /// Cues fired during the most recent tick.
    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn timers(&self) -> TimersSnapshot {
        TimersSnapshot {
            gravity_ms: self.gravity_ms,
            lock_ms: self.lock_ms,
            lock_resets: self.lock_resets,
            line_clear_ms: self.line_clear_ms,
        }
    }

    /// Fill `out` with the current state. The ghost is left out when the
    /// settings hide it.
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.field.write_color_grid(&mut out.field);
        out.active = self.active.map(Into::into);
        out.ghost = if self.settings.ghost_visible {
            self.ghost().map(Into::into)
        } else {
            None
        };
        out.hold = self.hold;
        out.hold_used = self.hold_used;
        out.next_queue = self.queue.preview();
        out.session = self.session;
        out.phase = self.phase;
        out.paused = self.paused;
        out.seed = self.queue.seed();
        out.score = self.score.score;
        out.lines = self.score.lines;
        out.level = self.score.level;
        out.timers = self.timers();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Settings::default(), 1)
    }
}
