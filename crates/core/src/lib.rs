//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules of the simulation with **zero dependencies** on
//! UI, audio, storage or I/O:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Fail-closed**: illegal moves and rotations are no-ops, never partial
//! - **Allocation-free hot paths**: fixed arrays for the field and tables
//!
//! # Module Structure
//!
//! - [`field`]: 10x22 grid with legality checks, line clearing and overflow
//! - [`pieces`]: shape tables, the [`Piece`] value and SRS kick resolution
//! - [`rng`]: seeded LCG and the 7-bag supplier with side-effect-free peek
//! - [`queue`]: upcoming-piece queue with a fixed minimum lookahead
//! - [`scoring`]: line/drop points, leveling and the gravity table
//! - [`snapshot`]: plain-data view of a game for renderers
//!
//! # Example
//!
//! ```
//! use blockfall_core::{attempt_rotate, Field, Piece};
//! use blockfall_core::types::{PieceKind, RotationDir};
//!
//! let field = Field::new();
//! let piece = Piece::spawn(PieceKind::T);
//! assert!(field.is_position_legal(&piece, 0, 0));
//!
//! let rotated = attempt_rotate(&field, &piece, RotationDir::Cw).unwrap();
//! let ghost = field.ghost_of(&rotated);
//! assert!(!field.is_position_legal(&ghost, 0, -1));
//! ```

pub mod field;
pub mod pieces;
pub mod queue;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use field::Field;
pub use pieces::{attempt_rotate, get_shape, Piece};
pub use queue::PieceQueue;
pub use rng::{Bag, SimpleRng};
pub use scoring::{apply_update, gravity_delay_ms, ScoreState, UpdateOutcome};
pub use snapshot::{ActiveSnapshot, GameSnapshot, TimersSnapshot};
