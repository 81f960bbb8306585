//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the simulation, the input layer and the terminal front end alike.
//!
//! # Field Dimensions
//!
//! - **Width**: 10 columns (x = 0..=9, left to right)
//! - **Height**: 22 rows (y = 0..=21, bottom to top), of which rows 0..=19
//!   are visible and rows 20..=21 are a hidden spawn buffer
//! - **Spawn origin**: (3, 21), the top-left corner of the 4x4 shape box
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_FRAME_DELTA_MS` | 100 | Upper bound on a single tick's elapsed time |
//! | `LOCK_DELAY_MS` | 500 | Time a grounded piece waits before locking |
//! | `LOCK_RESET_LIMIT` | 15 | Max lock timer resets per grounded stretch |
//! | `LINE_CLEAR_PAUSE_MS` | 150 | Pause between a line clear and the next spawn |
//! | `DEFAULT_DAS_MS` | 150 | Delay before auto-repeat starts |
//! | `DEFAULT_ARR_MS` | 50 | Interval between auto-repeats |
//!
//! # Gravity by Level
//!
//! | Level | Delay |
//! |-------|-------|
//! | 1 | 1000ms |
//! | 2 | 793ms |
//! | 3 | 618ms |
//! | 4 | 473ms |
//! | 5 | 355ms |
//! | 6 | 262ms |
//! | 7 | 190ms |
//! | 8 | 135ms |
//! | 9 | 94ms |
//! | 10+ | 64ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Action, PieceKind, Rotation, RotationDir, FIELD_WIDTH};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(Rotation::North.rotate(RotationDir::Cw), Rotation::East);
//! assert_eq!(Action::from_str("hardDrop"), Some(Action::HardDrop));
//! assert_eq!(FIELD_WIDTH, 10);
//! ```

/// Field width in cells.
pub const FIELD_WIDTH: u8 = 10;

/// Number of rows shown to the player.
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden buffer rows above the visible top. Any locked cell here is game over.
pub const HIDDEN_ROWS: u8 = 2;

/// Total number of stored rows.
pub const FIELD_HEIGHT: u8 = VISIBLE_HEIGHT + HIDDEN_ROWS;

/// Spawn origin (top-left of the 4x4 shape box), in y-up field coordinates.
pub const SPAWN_X: i8 = 3;
pub const SPAWN_Y: i8 = FIELD_HEIGHT as i8 - 1;

/// Minimum number of upcoming pieces kept in the queue.
pub const QUEUE_LOOKAHEAD: usize = 5;

/// Upper bound on elapsed time consumed by a single tick.
pub const MAX_FRAME_DELTA_MS: u32 = 100;

/// Lock delay when the piece is grounded.
pub const LOCK_DELAY_MS: u32 = 500;

/// Maximum number of lock timer resets while grounded.
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Pause between a line clear and the next spawn.
pub const LINE_CLEAR_PAUSE_MS: u32 = 150;

/// DAS (Delayed Auto Shift) default.
pub const DEFAULT_DAS_MS: u32 = 150;

/// ARR (Auto Repeat Rate) default.
pub const DEFAULT_ARR_MS: u32 = 50;

/// Soft drop speed as a percentage of "one cell per tick".
pub const DEFAULT_SOFT_DROP_PERCENT: u8 = 50;

/// Gravity delay per level, index 0 = level 1.
pub const GRAVITY_DELAYS_MS: [u32; 10] = [1000, 793, 618, 473, 355, 262, 190, 135, 94, 64];

/// Lines needed per level step.
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points for clearing 0..=4 lines at once, multiplied by the level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per cell of soft drop.
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points per cell of hard drop.
pub const HARD_DROP_POINTS: u32 = 2;


/// The seven piece kinds
///
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square
/// - **T**: Magenta, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical bag order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Position in [`PieceKind::ALL`], used to index shape and kick tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Color id stored in the field (1..=7, 0 means empty).
    #[inline]
    pub const fn color_id(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_color_id(id: u8) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[(id - 1) as usize]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }
}

/// Rotation states 0..=3
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Target state for a rotation: `(current + direction) mod 4`.
    ///
    /// ```
    /// use blockfall_types::{Rotation, RotationDir};
    ///
    /// assert_eq!(Rotation::North.rotate(RotationDir::Ccw), Rotation::West);
    /// assert_eq!(Rotation::West.rotate(RotationDir::Cw), Rotation::North);
    /// ```
    pub const fn rotate(self, dir: RotationDir) -> Self {
        Self::from_index(self.index() + dir.steps())
    }
}

/// Direction of a rotation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationDir {
    Cw,
    Ccw,
}

impl RotationDir {
    /// Column in the kick tables.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Quarter turns clockwise, modulo 4.
    const fn steps(self) -> usize {
        match self {
            RotationDir::Cw => 1,
            RotationDir::Ccw => 3,
        }
    }
}

/// Logical player actions. Key bindings resolve raw keys into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (with soft drop scoring)
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hold current piece (once per spawn)
    Hold,
    /// Toggle pause state
    Pause,
}

impl Action {
    pub const COUNT: usize = 8;

    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::SoftDrop,
        Action::HardDrop,
        Action::RotateCw,
        Action::RotateCcw,
        Action::Hold,
        Action::Pause,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse action from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use blockfall_types::Action;
    ///
    /// assert_eq!(Action::from_str("moveLeft"), Some(Action::MoveLeft));
    /// assert_eq!(Action::from_str("rotateccw"), Some(Action::RotateCcw));
    /// assert_eq!(Action::from_str("restart"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Action::MoveLeft),
            "moveright" => Some(Action::MoveRight),
            "softdrop" => Some(Action::SoftDrop),
            "harddrop" => Some(Action::HardDrop),
            "rotatecw" => Some(Action::RotateCw),
            "rotateccw" => Some(Action::RotateCcw),
            "hold" => Some(Action::Hold),
            "pause" => Some(Action::Pause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::SoftDrop => "softDrop",
            Action::HardDrop => "hardDrop",
            Action::RotateCw => "rotateCw",
            Action::RotateCcw => "rotateCcw",
            Action::Hold => "hold",
            Action::Pause => "pause",
        }
    }
}

/// Named sound cues fired by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Move,
    Rotate,
    HardDrop,
    Lock,
    LineClear,
    LevelUp,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Move => "move",
            Cue::Rotate => "rotate",
            Cue::HardDrop => "harddrop",
            Cue::Lock => "lock",
            Cue::LineClear => "lineclear",
            Cue::LevelUp => "levelup",
        }
    }
}

/// Session-level state. Pause is a flag on `Playing`, not a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Title,
    Playing,
    GameOver,
}

/// Play-phase state machine: Spawn -> Fall -> Lock -> LineClear -> Spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayPhase {
    #[default]
    Spawn,
    Fall,
    Lock,
    LineClear,
}

/// A cell on the field
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell locked with the color of the given kind
pub type Cell = Option<PieceKind>;
