//! Pieces module - shapes, the active piece value, and SRS rotation
//!
//! Shapes and kick tables are fixed arrays indexed by [`PieceKind::index`],
//! [`Rotation::index`] and [`RotationDir::index`]; there is no runtime lookup
//! that can miss.
//!
//! Field space is y-up. A piece's origin is the top-left cell of its 4x4 shape
//! box, so a shape offset `(col, row)` (row counted from the top of the box)
//! lands on field cell `(x + col, y - row)`.
//!
//! Reference: https://tetris.wiki/SRS

use crate::field::Field;
use crate::types::{PieceKind, Rotation, RotationDir, SPAWN_X, SPAWN_Y};

/// Offset of a single mino inside the 4x4 box: (column, row from top)
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets
pub type PieceShape = [MinoOffset; 4];

/// Shape tables, `[kind][rotation]`.
const SHAPES: [[PieceShape; 4]; 7] = [
    // I
    [
        [(0, 1), (1, 1), (2, 1), (3, 1)],
        [(2, 0), (2, 1), (2, 2), (2, 3)],
        [(0, 2), (1, 2), (2, 2), (3, 2)],
        [(1, 0), (1, 1), (1, 2), (1, 3)],
    ],
    // O
    [
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (2, 1)],
    ],
    // T
    [
        [(1, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (1, 2)],
        [(1, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // S
    [
        [(1, 0), (2, 0), (0, 1), (1, 1)],
        [(1, 0), (1, 1), (2, 1), (2, 2)],
        [(1, 1), (2, 1), (0, 2), (1, 2)],
        [(0, 0), (0, 1), (1, 1), (1, 2)],
    ],
    // Z
    [
        [(0, 0), (1, 0), (1, 1), (2, 1)],
        [(2, 0), (1, 1), (2, 1), (1, 2)],
        [(0, 1), (1, 1), (1, 2), (2, 2)],
        [(1, 0), (0, 1), (1, 1), (0, 2)],
    ],
    // J
    [
        [(0, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (2, 0), (1, 1), (1, 2)],
        [(0, 1), (1, 1), (2, 1), (2, 2)],
        [(1, 0), (1, 1), (0, 2), (1, 2)],
    ],
    // L
    [
        [(2, 0), (0, 1), (1, 1), (2, 1)],
        [(1, 0), (1, 1), (1, 2), (2, 2)],
        [(0, 1), (1, 1), (2, 1), (0, 2)],
        [(0, 0), (1, 0), (1, 1), (1, 2)],
    ],
];

/// Get the shape (mino offsets) for a piece kind and rotation
#[inline]
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    SHAPES[kind.index()][rotation.index()]
}

/// SRS wall kick data, `[from_rotation][direction]`, five (dx, dy) candidates
/// each with (0, 0) first. dy is positive upward.
pub type KickTable = [[[(i8, i8); 5]; 2]; 4];

/// J, L, S, T, Z share this table.
const JLSTZ_KICKS: KickTable = [
    // from North: CW 0->R, CCW 0->L
    [
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    ],
    // from East: CW R->2, CCW R->0
    [
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
        [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    ],
    // from South: CW 2->L, CCW 2->R
    [
        [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
        [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    ],
    // from West: CW L->0, CCW L->2
    [
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
        [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    ],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // from North: CW 0->R, CCW 0->L
    [
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    ],
    // from East: CW R->2, CCW R->0
    [
        [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    ],
    // from South: CW 2->L, CCW 2->R
    [
        [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    ],
    // from West: CW L->0, CCW L->2
    [
        [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
        [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    ],
];

/// Kick candidates for rotating `kind` out of `from` in direction `dir`.
///
/// The O piece never kicks; it has no entry here and is handled by
/// [`attempt_rotate`] directly.
pub fn kick_offsets(kind: PieceKind, from: Rotation, dir: RotationDir) -> &'static [(i8, i8); 5] {
    let table = match kind {
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };
    &table[from.index()][dir.index()]
}

/// A piece placed in field space: the active piece or its ghost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// A fresh piece at the spawn origin in its spawn orientation.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Field coordinates of the four occupied cells.
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(col, row)| (self.x + col, self.y - row))
    }

    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Try to rotate a piece with SRS wall kicks.
///
/// Candidates are tried strictly in table order and the first legal one wins.
/// Returns the rotated piece, or `None` with the input untouched.
pub fn attempt_rotate(field: &Field, piece: &Piece, dir: RotationDir) -> Option<Piece> {
    let rotated = Piece {
        rotation: piece.rotation.rotate(dir),
        ..*piece
    };

    if piece.kind == PieceKind::O {
        return field.is_position_legal(&rotated, 0, 0).then_some(rotated);
    }

    kick_offsets(piece.kind, piece.rotation, dir)
        .iter()
        .find(|&&(dx, dy)| field.is_position_legal(&rotated, dx, dy))
        .map(|&(dx, dy)| rotated.shifted(dx, dy))
}
