//! Field module - the grid of locked cells
//!
//! The field is 10 columns by 22 rows (20 visible plus 2 hidden rows above the
//! visible top). Uses a flat array for cache locality and zero allocation.
//! Coordinates are y-up: (x, y) with x in 0..=9 left to right and y in 0..=21
//! bottom to top. There is no ceiling: positions above the top row are legal.

use crate::pieces::Piece;
use crate::types::{Cell, FIELD_HEIGHT, FIELD_WIDTH, VISIBLE_HEIGHT};

const WIDTH: usize = FIELD_WIDTH as usize;
const HEIGHT: usize = FIELD_HEIGHT as usize;

/// Total number of cells on the field
const FIELD_SIZE: usize = WIDTH * HEIGHT;

/// The playing field - flat row-major storage, row 0 at the bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    cells: [Cell; FIELD_SIZE],
}

impl Field {
    /// Create a new empty field
    pub fn new() -> Self {
        Self {
            cells: [None; FIELD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= FIELD_WIDTH as i8 || y < 0 || y >= FIELD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        FIELD_WIDTH
    }

    pub fn height(&self) -> u8 {
        FIELD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    ///
    /// The engine only writes cells through [`Field::place`]; this exists for
    /// building fixtures.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// A single cell a mino may occupy: inside the walls, not below the floor,
    /// not on a locked cell. Anything above the top is open.
    #[inline]
    fn is_open(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= FIELD_WIDTH as i8 || y < 0 {
            return false;
        }
        !self.is_occupied(x, y)
    }

    /// Check whether `piece` shifted by (dx, dy) fits.
    pub fn is_position_legal(&self, piece: &Piece, dx: i8, dy: i8) -> bool {
        piece
            .cells()
            .iter()
            .all(|&(x, y)| self.is_open(x + dx, y + dy))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= HEIGHT {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Remove every full row, compacting the rest downward in their original
    /// order and refilling the top with empty rows. Returns the number cleared.
    /// Uses a two-pointer pass with zero allocation.
    pub fn clear_completed_rows(&mut self) -> usize {
        let mut cleared = 0;
        let mut write_y = 0usize;

        // Scan from bottom to top
        for read_y in 0..HEIGHT {
            if self.is_row_full(read_y) {
                cleared += 1;
                continue;
            }
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.cells.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
            write_y += 1;
        }

        for cell in &mut self.cells[write_y * WIDTH..] {
            *cell = None;
        }

        cleared
    }

    /// Stamp a validated piece into the field using its color.
    ///
    /// Returns false if any mino was above the top row and could not be stored;
    /// callers treat that as overflow.
    pub fn place(&mut self, piece: &Piece) -> bool {
        let mut stored_all = true;
        for (x, y) in piece.cells() {
            stored_all &= self.set(x, y, Some(piece.kind));
        }
        stored_all
    }

    /// True if any cell in the hidden rows above the visible top is occupied.
    pub fn is_overflowed(&self) -> bool {
        self.cells[VISIBLE_HEIGHT as usize * WIDTH..]
            .iter()
            .any(|cell| cell.is_some())
    }

    /// Lowest legal position of `piece` straight below where it is now.
    pub fn ghost_of(&self, piece: &Piece) -> Piece {
        let mut ghost = *piece;
        while self.is_position_legal(&ghost, 0, -1) {
            ghost.y -= 1;
        }
        ghost
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write color ids (0 = empty) into a row-major grid, row 0 at the bottom.
    pub fn write_color_grid(&self, out: &mut [[u8; WIDTH]; HEIGHT]) {
        for (y, row) in out.iter_mut().enumerate() {
            for (x, v) in row.iter_mut().enumerate() {
                *v = self.cells[y * WIDTH + x].map_or(0, |k| k.color_id());
            }
        }
    }

    /// Clear the entire field
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Rotation};

    fn fill_row(field: &mut Field, y: i8, kind: PieceKind) {
        for x in 0..FIELD_WIDTH as i8 {
            field.set(x, y, Some(kind));
        }
    }

    #[test]
    fn test_field_index_calculation() {
        assert_eq!(Field::index(0, 0), Some(0));
        assert_eq!(Field::index(9, 0), Some(9));
        assert_eq!(Field::index(0, 1), Some(10));
        assert_eq!(Field::index(9, 21), Some(219));
        assert_eq!(Field::index(-1, 0), None);
        assert_eq!(Field::index(10, 0), None);
        assert_eq!(Field::index(0, 22), None);
    }

    #[test]
    fn test_clear_preserves_order_of_remaining_rows() {
        let mut field = Field::new();
        fill_row(&mut field, 0, PieceKind::I);
        field.set(1, 1, Some(PieceKind::T));
        fill_row(&mut field, 2, PieceKind::I);
        field.set(5, 3, Some(PieceKind::Z));

        assert_eq!(field.clear_completed_rows(), 2);

        assert_eq!(field.get(1, 0), Some(Some(PieceKind::T)));
        assert_eq!(field.get(5, 1), Some(Some(PieceKind::Z)));
        let occupied = field.cells().iter().filter(|c| c.is_some()).count();
        assert_eq!(occupied, 2);
        for y in 2..FIELD_HEIGHT as i8 {
            for x in 0..FIELD_WIDTH as i8 {
                assert!(!field.is_occupied(x, y));
            }
        }
    }

    #[test]
    fn test_clear_with_no_full_rows_is_noop() {
        let mut field = Field::new();
        field.set(0, 0, Some(PieceKind::L));
        let before = field.clone();
        assert_eq!(field.clear_completed_rows(), 0);
        assert_eq!(field, before);
    }

    #[test]
    fn test_position_legal_has_no_ceiling() {
        let field = Field::new();
        let piece = Piece {
            kind: PieceKind::I,
            rotation: Rotation::East,
            x: 3,
            y: FIELD_HEIGHT as i8 + 3,
        };
        assert!(field.is_position_legal(&piece, 0, 0));
        assert!(field.is_position_legal(&piece, 0, 10));
    }

    #[test]
    fn test_place_reports_cells_above_top() {
        let mut field = Field::new();
        let piece = Piece {
            kind: PieceKind::I,
            rotation: Rotation::East,
            x: 3,
            y: FIELD_HEIGHT as i8 + 1,
        };
        assert!(!field.place(&piece));
        assert!(field.is_overflowed());
    }

    #[test]
    fn test_overflow_only_looks_at_hidden_rows() {
        let mut field = Field::new();
        field.set(4, VISIBLE_HEIGHT as i8 - 1, Some(PieceKind::S));
        assert!(!field.is_overflowed());
        field.set(4, VISIBLE_HEIGHT as i8, Some(PieceKind::S));
        assert!(field.is_overflowed());
    }

    #[test]
    fn test_ghost_lands_on_stack() {
        let mut field = Field::new();
        fill_row(&mut field, 0, PieceKind::J);
        field.set(0, 0, None);

        let ghost = field.ghost_of(&Piece::spawn(PieceKind::O));
        // O occupies box rows 0..=1, so resting on row 0 puts its bottom on y = 1.
        assert_eq!(ghost.cells().iter().map(|c| c.1).min(), Some(1));
        assert!(!field.is_position_legal(&ghost, 0, -1));
    }

    #[test]
    fn test_write_color_grid() {
        let mut field = Field::new();
        field.set(2, 0, Some(PieceKind::I));
        field.set(9, 21, Some(PieceKind::L));
        let mut grid = [[0u8; WIDTH]; HEIGHT];
        field.write_color_grid(&mut grid);
        assert_eq!(grid[0][2], PieceKind::I.color_id());
        assert_eq!(grid[21][9], PieceKind::L.color_id());
        assert_eq!(grid[5][5], 0);
    }
}
