//! DAS/ARR input timing.
//!
//! Converts a per-tick [`ActionMask`] (what is held) into a [`LogicalInput`]
//! (what fires this tick). Left, right and soft drop auto-repeat; every other
//! action fires on the press edge only.
//!
//! Timing per repeating direction:
//!
//! - press edge: fire immediately, reset DAS and ARR timers
//! - held, DAS not reached: accumulate DAS, no signal
//! - held, DAS reached, ARR 0: fire every tick
//! - held, DAS reached, ARR > 0: accumulate ARR; at the threshold fire and
//!   restart at 0 (overshoot is dropped)
//! - release: reset both timers

use crate::keys::ActionMask;
use crate::types::{Action, DEFAULT_ARR_MS, DEFAULT_DAS_MS, DEFAULT_SOFT_DROP_PERCENT};

/// Timing parameters passed to every [`InputTiming::update`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    pub das_ms: u32,
    pub arr_ms: u32,
    /// Soft drop speed, 1..=100. 100 drops every tick the key is held.
    pub soft_drop_percent: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            soft_drop_percent: DEFAULT_SOFT_DROP_PERCENT,
        }
    }
}

impl TimingConfig {
    /// Repeat interval for the down key.
    ///
    /// `None` means the key bypasses DAS/ARR and fires every held tick.
    pub fn soft_drop_arr_ms(&self) -> Option<u32> {
        let percent = u32::from(self.soft_drop_percent.clamp(1, 100));
        if percent >= 100 {
            None
        } else {
            Some(self.arr_ms.saturating_mul(100) / percent)
        }
    }
}

/// Actions that fire this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogicalInput {
    pub move_left: bool,
    pub move_right: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub hold: bool,
    pub pause: bool,
}

impl LogicalInput {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// DAS/ARR state for one repeating key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RepeatTimer {
    held: bool,
    das_ms: u32,
    arr_ms: u32,
}

impl RepeatTimer {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self, held: bool, dt: u32, das: u32, arr: u32) -> bool {
        if !held {
            self.reset();
            return false;
        }
        if !self.held {
            self.held = true;
            self.das_ms = 0;
            self.arr_ms = 0;
            return true;
        }
        if self.das_ms < das {
            self.das_ms = self.das_ms.saturating_add(dt);
            return false;
        }
        if arr == 0 {
            return true;
        }
        self.arr_ms = self.arr_ms.saturating_add(dt);
        if self.arr_ms >= arr {
            self.arr_ms = 0;
            true
        } else {
            false
        }
    }

    fn update_every_tick(&mut self, held: bool) -> bool {
        if !held {
            self.reset();
        } else {
            self.held = true;
        }
        held
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct EdgeDetector {
    held: bool,
}

impl EdgeDetector {
    fn update(&mut self, held: bool) -> bool {
        let pressed = held && !self.held;
        self.held = held;
        pressed
    }
}

/// Held-key bookkeeping across ticks.
#[derive(Debug, Clone, Default)]
pub struct InputTiming {
    left: RepeatTimer,
    right: RepeatTimer,
    down: RepeatTimer,
    hard_drop: EdgeDetector,
    rotate_cw: EdgeDetector,
    rotate_ccw: EdgeDetector,
    hold: EdgeDetector,
    pause: EdgeDetector,
}

impl InputTiming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_ms` with the actions currently held.
    pub fn update(&mut self, dt_ms: u32, held: &ActionMask, config: &TimingConfig) -> LogicalInput {
        let das = config.das_ms;
        let arr = config.arr_ms;

        let soft_drop = match config.soft_drop_arr_ms() {
            Some(down_arr) => {
                self.down
                    .update(held.is_set(Action::SoftDrop), dt_ms, das, down_arr)
            }
            None => self.down.update_every_tick(held.is_set(Action::SoftDrop)),
        };

        LogicalInput {
            move_left: self
                .left
                .update(held.is_set(Action::MoveLeft), dt_ms, das, arr),
            move_right: self
                .right
                .update(held.is_set(Action::MoveRight), dt_ms, das, arr),
            soft_drop,
            hard_drop: self.hard_drop.update(held.is_set(Action::HardDrop)),
            rotate_cw: self.rotate_cw.update(held.is_set(Action::RotateCw)),
            rotate_ccw: self.rotate_ccw.update(held.is_set(Action::RotateCcw)),
            hold: self.hold.update(held.is_set(Action::Hold)),
            pause: self.pause.update(held.is_set(Action::Pause)),
        }
    }

    /// Forget all held state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
