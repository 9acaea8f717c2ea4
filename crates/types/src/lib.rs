//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, input mapping).
//!
//! # Grid Dimensions
//!
//! The default playfield is 12 columns by 20 rows. Both are configurable per game,
//! but never change once a grid is created.
//!
//! - **Width**: 12 columns (indexed 0-11)
//! - **Height**: 20 rows (indexed 0-19, top to bottom)
//!
//! # Cell Ids
//!
//! Every grid cell and every piece matrix entry is a small integer id:
//!
//! | Id | Piece | Color  |
//! |----|-------|--------|
//! | 0  | -     | empty  |
//! | 1  | T     | red    |
//! | 2  | O     | blue   |
//! | 3  | L     | violet |
//! | 4  | J     | green  |
//! | 5  | I     | purple |
//! | 6  | S     | orange |
//! | 7  | Z     | pink   |
//!
//! # Timing and Scoring
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_DROP_MS` | 1000 | Gravity interval at the start of a game |
//! | `DROP_INTERVAL_DECAY` | 0.95 | Interval factor applied per cleared row |
//! | `LINE_CLEAR_POINTS` | 10 | Points for the first row of a clearing pass |
//! | `FRAME_MS` | 16 | Default frame cadence of the terminal host |
//!
//! # Examples
//!
//! ```
//! use blockdrop_types::{GameAction, PieceKind, GRID_HEIGHT, GRID_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//! assert_eq!(parsed.cell_id(), 1);
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! assert_eq!(GRID_WIDTH, 12);
//! assert_eq!(GRID_HEIGHT, 20);
//! ```

/// Default grid width in cells (12 columns)
pub const GRID_WIDTH: u8 = 12;

/// Default grid height in cells (20 rows)
pub const GRID_HEIGHT: u8 = 20;

/// Smallest grid side accepted by the engine (the I piece needs a 4x4 box)
pub const MIN_GRID_SIDE: u8 = 4;

/// Default frame cadence for terminal hosts (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Gravity interval when a game starts (1000ms = 1 row per second)
pub const BASE_DROP_MS: u32 = 1000;

/// Factor applied to the drop interval for every cleared row
pub const DROP_INTERVAL_DECAY: f64 = 0.95;

/// Points for the first cleared row of a pass; each further row doubles it
pub const LINE_CLEAR_POINTS: u32 = 10;

/// A single grid or piece cell: 0 is empty, 1..=7 identify a piece color class
pub type CellId = u8;

/// The empty cell id
pub const EMPTY: CellId = 0;

/// Largest valid cell id
pub const MAX_CELL_ID: CellId = 7;

/// The seven tetromino piece kinds
///
/// Declaration order is the order in which a fresh bag is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    L,
    J,
    O,
    T,
    S,
    Z,
}

impl PieceKind {
    /// All kinds, in bag fill order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdrop_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase single-letter label
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }

    /// The cell id written into the grid by this kind
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdrop_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.cell_id(), 5);
    /// assert_eq!(PieceKind::Z.cell_id(), 7);
    /// ```
    pub fn cell_id(&self) -> CellId {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::I => 5,
            PieceKind::S => 6,
            PieceKind::Z => 7,
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// These are the logical commands an input adapter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down, landing it if blocked
    SoftDrop,
    /// Drop piece to the lowest valid position and land it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece counter-clockwise
    RotateCcw,
    /// Start a new game (only from not-started or game-over)
    Start,
}

impl GameAction {
    /// Parse action from string
    ///
    /// # Examples
    ///
    /// ```
    /// use blockdrop_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotateCw"), Some(GameAction::RotateCw));
    /// assert_eq!(GameAction::from_str("start"), Some(GameAction::Start));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "start" => Some(GameAction::Start),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Start => "start",
        }
    }
}

/// Lifecycle of a single game
///
/// `NotStarted -> Playing` on start, `Playing -> GameOver` when a spawn collides.
/// `GameOver` only leaves through another start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    NotStarted,
    Playing,
    GameOver,
}

impl GameStatus {
    /// Whether a start command is accepted in this state
    pub fn can_start(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Notification queued by the engine for its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new game began.
    Started,
    /// The score changed (also emitted with 0 on start).
    ScoreChanged { score: u32 },
    /// The active piece was merged into the grid.
    Landed { rows_cleared: u32 },
    /// A spawn collided or a piece could not be created.
    GameOver { final_score: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ids_are_a_bijection_onto_one_to_seven() {
        let mut ids: Vec<CellId> = PieceKind::ALL.iter().map(|k| k.cell_id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn piece_labels_round_trip_case_insensitively() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_str(kind.as_str()), Some(kind));
            assert_eq!(
                PieceKind::from_str(&kind.as_str().to_lowercase()),
                Some(kind)
            );
        }
    }

    #[test]
    fn start_is_rejected_only_while_playing() {
        assert!(GameStatus::NotStarted.can_start());
        assert!(GameStatus::GameOver.can_start());
        assert!(!GameStatus::Playing.can_start());
    }
}
