//! Pieces module - tetromino matrices and in-place rotation
//!
//! Every piece is a small square matrix of cell ids. Rotation transforms the
//! matrix in place: a transpose followed by a reversal (of each row for a
//! clockwise turn, of the row order for a counter-clockwise one). Wall kicks are
//! resolved by the engine, not here.

use arrayvec::ArrayVec;
use tracing::warn;

use crate::config::CcwRotation;
use crate::error::GameError;
use crate::types::{CellId, PieceKind, EMPTY};

/// Largest piece side length (the I piece)
pub const MAX_PIECE_SIZE: usize = 4;

const T_SHAPE: [CellId; 9] = [
    0, 0, 0, //
    1, 1, 1, //
    0, 1, 0,
];

const O_SHAPE: [CellId; 4] = [
    2, 2, //
    2, 2,
];

const L_SHAPE: [CellId; 9] = [
    0, 3, 0, //
    0, 3, 0, //
    0, 3, 3,
];

const J_SHAPE: [CellId; 9] = [
    0, 4, 0, //
    0, 4, 0, //
    4, 4, 0,
];

const I_SHAPE: [CellId; 16] = [
    0, 5, 0, 0, //
    0, 5, 0, 0, //
    0, 5, 0, 0, //
    0, 5, 0, 0,
];

const S_SHAPE: [CellId; 9] = [
    0, 6, 6, //
    6, 6, 0, //
    0, 0, 0,
];

const Z_SHAPE: [CellId; 9] = [
    7, 7, 0, //
    0, 7, 7, //
    0, 0, 0,
];

/// A square piece matrix, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    size: usize,
    cells: ArrayVec<CellId, { MAX_PIECE_SIZE * MAX_PIECE_SIZE }>,
}

/// Build the canonical spawn matrix for a piece kind.
pub fn create_piece(kind: PieceKind) -> Piece {
    let (size, shape): (usize, &[CellId]) = match kind {
        PieceKind::T => (3, &T_SHAPE),
        PieceKind::O => (2, &O_SHAPE),
        PieceKind::L => (3, &L_SHAPE),
        PieceKind::J => (3, &J_SHAPE),
        PieceKind::I => (4, &I_SHAPE),
        PieceKind::S => (3, &S_SHAPE),
        PieceKind::Z => (3, &Z_SHAPE),
    };

    Piece {
        kind,
        size,
        cells: shape.iter().copied().collect(),
    }
}

/// Build a piece from its single-letter label (case-insensitive).
pub fn create_piece_named(label: &str) -> Result<Piece, GameError> {
    match PieceKind::from_str(label) {
        Some(kind) => Ok(create_piece(kind)),
        None => {
            warn!(label, "unknown piece type requested");
            Err(GameError::InvalidPieceType(label.to_string()))
        }
    }
}

impl Piece {
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Side length of the matrix
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at column `x`, row `y` of the matrix (0 outside it)
    pub fn get(&self, x: usize, y: usize) -> CellId {
        if x >= self.size || y >= self.size {
            return EMPTY;
        }
        self.cells[y * self.size + x]
    }

    /// Matrix rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellId]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Non-empty cells as `(dx, dy, id)` offsets from the matrix's top-left corner
    pub fn occupied(&self) -> impl Iterator<Item = (i16, i16, CellId)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &id)| id != EMPTY)
            .map(move |(i, &id)| ((i % size) as i16, (i / size) as i16, id))
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&id| id != EMPTY).count()
    }

    /// Rotate the matrix in place.
    pub fn rotate(&mut self, clockwise: bool, ccw: CcwRotation) {
        self.transpose();
        if clockwise {
            self.reverse_each_row();
        } else if ccw == CcwRotation::Inverse {
            self.reverse_row_order();
        }
    }

    /// Undo a previous `rotate(clockwise, ccw)` exactly.
    pub fn undo_rotate(&mut self, clockwise: bool, ccw: CcwRotation) {
        if clockwise {
            self.reverse_each_row();
        } else if ccw == CcwRotation::Inverse {
            self.reverse_row_order();
        }
        self.transpose();
    }

    fn transpose(&mut self) {
        let n = self.size;
        for y in 0..n {
            for x in 0..y {
                self.cells.swap(y * n + x, x * n + y);
            }
        }
    }

    fn reverse_each_row(&mut self) {
        for row in self.cells.chunks_mut(self.size) {
            row.reverse();
        }
    }

    fn reverse_row_order(&mut self) {
        let n = self.size;
        for y in 0..n / 2 {
            for x in 0..n {
                self.cells.swap(y * n + x, (n - 1 - y) * n + x);
            }
        }
    }
}
