//! Error type for the game core.

use blockdrop_types::MIN_GRID_SIDE;

/// Errors surfaced by the core.
///
/// Collisions are not errors: a blocked move is rejected silently and a blocked
/// spawn ends the game through [`GameEvent::GameOver`](blockdrop_types::GameEvent).
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum GameError {
    /// A piece was requested by a label that names none of the seven kinds.
    #[error("unknown piece type `{0}`")]
    InvalidPieceType(String),

    #[error(
        "grid must be at least {min}x{min} cells, got {width}x{height}",
        min = MIN_GRID_SIDE
    )]
    InvalidDimensions { width: u8, height: u8 },

    #[error("drop interval must be positive, got {0}ms")]
    InvalidDropInterval(u32),
}
