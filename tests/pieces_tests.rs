//! Rotation tests - kick resolution against a field

use blockfall::core::pieces::kick_offsets;
use blockfall::core::{attempt_rotate, Field, Piece};
use blockfall::types::{PieceKind, Rotation, RotationDir};

fn t_at(x: i8, y: i8) -> Piece {
    Piece {
        kind: PieceKind::T,
        rotation: Rotation::North,
        x,
        y,
    }
}

#[test]
fn test_unobstructed_rotation_uses_first_kick() {
    let field = Field::new();
    let piece = t_at(3, 10);
    let rotated = attempt_rotate(&field, &piece, RotationDir::Cw).unwrap();
    assert_eq!(rotated.rotation, Rotation::East);
    assert_eq!((rotated.x, rotated.y), (3, 10));
}

#[test]
fn test_blocked_origin_takes_next_kick() {
    let mut field = Field::new();
    let piece = t_at(3, 5);
    // East T at the same origin needs (4, 3); block it.
    field.set(4, 3, Some(PieceKind::Z));

    let rotated = attempt_rotate(&field, &piece, RotationDir::Cw).unwrap();
    assert_eq!(rotated.rotation, Rotation::East);
    // Second candidate for 0 -> R is (-1, 0).
    assert_eq!((rotated.x, rotated.y), (2, 5));
    assert!(field.is_position_legal(&rotated, 0, 0));
}

#[test]
fn test_all_kicks_blocked_leaves_piece_unchanged() {
    let mut field = Field::new();
    let piece = t_at(3, 5);
    // Wall the piece in so no candidate fits.
    for x in 0..10 {
        for y in 0..10 {
            field.set(x, y, Some(PieceKind::I));
        }
    }
    for (x, y) in piece.cells() {
        field.set(x, y, None);
    }
    assert_eq!(attempt_rotate(&field, &piece, RotationDir::Cw), None);
    assert_eq!(attempt_rotate(&field, &piece, RotationDir::Ccw), None);
}

#[test]
fn test_rotation_is_deterministic() {
    let mut field = Field::new();
    field.set(4, 3, Some(PieceKind::Z));
    let piece = t_at(3, 5);
    let a = attempt_rotate(&field, &piece, RotationDir::Cw);
    let b = attempt_rotate(&field, &piece, RotationDir::Cw);
    assert_eq!(a, b);
}

#[test]
fn test_o_piece_never_kicks() {
    let mut field = Field::new();
    let piece = Piece::spawn(PieceKind::O).shifted(0, -10);
    let rotated = attempt_rotate(&field, &piece, RotationDir::Cw).unwrap();
    assert_eq!((rotated.x, rotated.y), (piece.x, piece.y));

    // Blocking its own cells rejects the rotation outright.
    field.set(4, 11, Some(PieceKind::T));
    assert_eq!(attempt_rotate(&field, &piece, RotationDir::Cw), None);
}

#[test]
fn test_i_and_jlstz_use_different_tables() {
    let i = kick_offsets(PieceKind::I, Rotation::North, RotationDir::Cw);
    let t = kick_offsets(PieceKind::T, Rotation::North, RotationDir::Cw);
    assert_eq!(i[0], (0, 0));
    assert_eq!(t[0], (0, 0));
    assert_ne!(i, t);
    for kind in [PieceKind::J, PieceKind::L, PieceKind::S, PieceKind::Z] {
        assert_eq!(
            kick_offsets(kind, Rotation::South, RotationDir::Ccw),
            kick_offsets(PieceKind::T, Rotation::South, RotationDir::Ccw)
        );
    }
}

#[test]
fn test_four_rotations_return_to_start() {
    let field = Field::new();
    for kind in PieceKind::ALL {
        let start = Piece {
            kind,
            rotation: Rotation::North,
            x: 3,
            y: 10,
        };
        let mut piece = start;
        for _ in 0..4 {
            piece = attempt_rotate(&field, &piece, RotationDir::Cw).unwrap();
        }
        assert_eq!(piece, start, "{kind:?}");
    }
}
