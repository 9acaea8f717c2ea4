//! Grid module - manages the playfield
//!
//! The grid is a `width x height` matrix of cell ids stored as a flat row-major
//! vector. Dimensions are fixed at creation.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//!
//! Bounds rules for pieces:
//! - any column outside `0..width` blocks
//! - any row at or below `height` blocks (the floor)
//! - rows above the top (`y < 0`) are open

use crate::pieces::Piece;
use crate::types::{CellId, EMPTY, MAX_CELL_ID};

/// The playfield, row-major (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<CellId>,
}

impl Grid {
    /// Create a new empty grid
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<CellId> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, id: CellId) -> bool {
        debug_assert!(id <= MAX_CELL_ID, "invalid cell id {id}");
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = id;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(id) if id != EMPTY)
    }

    /// Whether a single cell at (x, y) would block a piece
    fn blocks(&self, x: i16, y: i16) -> bool {
        if x < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.is_occupied(x, y)
    }

    /// Check whether `piece` placed with its top-left corner at (x, y) overlaps
    /// a filled cell, a side wall or the floor.
    pub fn collides(&self, piece: &Piece, x: i16, y: i16) -> bool {
        piece
            .occupied()
            .any(|(dx, dy, _)| self.blocks(x + dx, y + dy))
    }

    /// Write every filled piece cell into the grid. Cells outside the grid are skipped.
    pub fn merge(&mut self, piece: &Piece, x: i16, y: i16) {
        for (dx, dy, id) in piece.occupied() {
            self.set(x + dx, y + dy, id);
        }
    }

    /// A single row, left to right
    pub fn row(&self, y: usize) -> &[CellId] {
        let width = self.width as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellId]> + '_ {
        self.cells.chunks(self.width.max(1) as usize)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|&id| id != EMPTY)
    }

    /// Remove row `y`, shift all rows above down by one and empty the top row
    fn clear_row(&mut self, y: usize) {
        let width = self.width as usize;

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * width;
            self.cells
                .copy_within(src_start..src_start + width, row * width);
        }

        self.cells[..width].fill(EMPTY);
    }

    /// Clear every full row below the top one and return how many were removed.
    ///
    /// Scans bottom to top and re-examines the same index after a removal, since
    /// the row above has moved into it. Row 0 is never cleared, even when full.
    pub fn clear_completed_rows(&mut self) -> u32 {
        // A zero-width row has no cells to fill.
        if self.width == 0 {
            return 0;
        }
        let Some(mut y) = (self.height as usize).checked_sub(1) else {
            return 0;
        };
        let mut cleared = 0;

        while y > 0 {
            if self.is_row_full(y) {
                self.clear_row(y);
                cleared += 1;
            } else {
                y -= 1;
            }
        }

        cleared
    }

    /// Number of filled cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != EMPTY).count()
    }

    /// Get a reference to the internal cells
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::create_piece;
    use crate::types::PieceKind;

    fn fill_row(grid: &mut Grid, y: i16) {
        for x in 0..grid.width() as i16 {
            grid.set(x, y, 1);
        }
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(12, 20);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(11, 0), Some(11));
        assert_eq!(grid.index(0, 1), Some(12));
        assert_eq!(grid.index(11, 19), Some(239));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(12, 0), None);
        assert_eq!(grid.index(0, 20), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut grid = Grid::new(12, 20);
        assert!(grid.set(5, 10, 3));
        assert_eq!(grid.get(5, 10), Some(3));
        assert!(grid.is_occupied(5, 10));
        assert!(!grid.set(12, 0, 3));
        assert_eq!(grid.get(-1, 0), None);
    }

    #[test]
    fn test_walls_and_floor_block_but_sky_does_not() {
        let grid = Grid::new(12, 20);
        assert!(grid.blocks(-1, 5));
        assert!(grid.blocks(12, 5));
        assert!(grid.blocks(3, 20));
        assert!(!grid.blocks(3, -1));
        assert!(!grid.blocks(3, 5));
    }

    #[test]
    fn test_collides_with_stack() {
        let mut grid = Grid::new(12, 20);
        let o = create_piece(PieceKind::O);
        assert!(!grid.collides(&o, 5, 10));

        grid.set(6, 11, 4);
        assert!(grid.collides(&o, 5, 10));
        assert!(!grid.collides(&o, 7, 10));
    }

    #[test]
    fn test_transparent_cells_never_collide() {
        // The I matrix only fills column 1, so columns 0, 2 and 3 may hang off the wall.
        let grid = Grid::new(12, 20);
        let i = create_piece(PieceKind::I);
        assert!(!grid.collides(&i, -1, 0));
        assert!(grid.collides(&i, -2, 0));
        assert!(!grid.collides(&i, 10, 0));
        assert!(grid.collides(&i, 11, 0));
    }

    #[test]
    fn test_merge_writes_piece_ids() {
        let mut grid = Grid::new(12, 20);
        let t = create_piece(PieceKind::T);
        grid.merge(&t, 2, 17);
        assert_eq!(grid.occupied_count(), 4);
        assert_eq!(grid.row(18), &[0, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(grid.get(3, 19), Some(1));
    }

    #[test]
    fn test_clear_single_row_shifts_down() {
        let mut grid = Grid::new(12, 20);
        fill_row(&mut grid, 19);
        grid.set(4, 18, 7);

        assert_eq!(grid.clear_completed_rows(), 1);
        assert_eq!(grid.get(4, 19), Some(7));
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn test_degenerate_grids_clear_nothing() {
        for (width, height) in [(4, 0), (0, 4), (0, 0)] {
            let mut grid = Grid::new(width, height);
            assert_eq!(grid.clear_completed_rows(), 0);
            assert_eq!(grid.rows().count(), 0);
        }
    }

    #[test]
    fn test_clear_adjacent_rows_rescans_same_index() {
        let mut grid = Grid::new(12, 20);
        fill_row(&mut grid, 19);
        fill_row(&mut grid, 18);
        fill_row(&mut grid, 16);
        grid.set(0, 17, 2);

        assert_eq!(grid.clear_completed_rows(), 3);
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.get(0, 19), Some(2));
    }

    #[test]
    fn test_row_zero_never_clears() {
        let mut grid = Grid::new(12, 20);
        fill_row(&mut grid, 0);
        assert_eq!(grid.clear_completed_rows(), 0);
        assert!(grid.is_row_full(0));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut grid = Grid::new(6, 6);
        fill_row(&mut grid, 3);
        grid.clear();
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.cells().len(), 36);
    }
}
