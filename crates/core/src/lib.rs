//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every game rule and the frame loop that drives them. It has
//! no dependency on terminals or input devices: hosts plug in through the
//! [`Renderer`], [`ScoreDisplay`] and [`FrameHost`] traits.
//!
//! # Module Structure
//!
//! - [`grid`]: the playfield, collision checks and row clearing
//! - [`pieces`]: the seven piece matrices and in-place rotation
//! - [`rng`]: shrinking-bag piece selection driven by a seeded LCG
//! - [`scoring`]: line-clear points and gravity decay
//! - [`engine`]: the game state machine (spawn, move, rotate, drop, land)
//! - [`game_loop`]: per-frame timing, event forwarding and redraws
//! - [`config`]: per-game settings
//! - [`error`]: the crate error type
//!
//! # Game Rules
//!
//! - **Bag**: all seven kinds are drawn once, in random order, before the bag refills
//! - **Rotation**: transpose plus reversal, then a sideways search for a free column
//! - **Gravity**: the piece falls one row once the drop timer exceeds the interval
//! - **Clearing**: full rows vanish bottom-up; the top row never clears
//! - **Scoring**: 10, 20, 40, ... points per row of one pass; each row speeds up gravity by 5%
//!
//! # Example
//!
//! ```
//! use blockdrop_core::{GameConfig, GameEngine};
//! use blockdrop_types::{GameAction, GameStatus};
//!
//! let mut game = GameEngine::new(GameConfig::default().with_seed(7)).unwrap();
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::RotateCw);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert_eq!(game.status(), GameStatus::Playing);
//! assert_eq!(game.grid().occupied_count(), 4);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod game_loop;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;

pub use blockdrop_types as types;

// Re-export commonly used types for convenience
pub use config::{CcwRotation, GameConfig};
pub use engine::{ActivePiece, GameEngine};
pub use error::GameError;
pub use game_loop::{FrameHost, GameLoop, LoopExit, Renderer, ScoreDisplay};
pub use grid::Grid;
pub use pieces::{create_piece, create_piece_named, Piece};
pub use rng::{PieceBag, SimpleRng};
pub use scoring::{line_clear_points, ScoreState};
