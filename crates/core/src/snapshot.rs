//! Read-only view of a game, copied out for renderers and other observers.

use crate::pieces::Piece;
use crate::types::{
    PieceKind, PlayPhase, Rotation, SessionState, FIELD_HEIGHT, FIELD_WIDTH, QUEUE_LOOKAHEAD,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Piece> for ActiveSnapshot {
    fn from(value: Piece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

impl From<ActiveSnapshot> for Piece {
    fn from(value: ActiveSnapshot) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub gravity_ms: u32,
    pub lock_ms: u32,
    pub lock_resets: u8,
    pub line_clear_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    /// Color ids, `field[y][x]`, row 0 at the bottom. 0 is empty.
    pub field: [[u8; FIELD_WIDTH as usize]; FIELD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost: Option<ActiveSnapshot>,
    pub hold: Option<PieceKind>,
    pub hold_used: bool,
    pub next_queue: [PieceKind; QUEUE_LOOKAHEAD],
    pub session: SessionState,
    pub phase: PlayPhase,
    pub paused: bool,
    pub seed: u32,
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub timers: TimersSnapshot,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            field: [[0u8; FIELD_WIDTH as usize]; FIELD_HEIGHT as usize],
            active: None,
            ghost: None,
            hold: None,
            hold_used: false,
            next_queue: [PieceKind::I; QUEUE_LOOKAHEAD],
            session: SessionState::Title,
            phase: PlayPhase::Spawn,
            paused: false,
            seed: 0,
            score: 0,
            lines: 0,
            level: 1,
            timers: TimersSnapshot::default(),
        }
    }
}
