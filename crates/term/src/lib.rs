//! Terminal rendering.
//!
//! A small game-oriented rendering layer: [`GameView`] paints the grid, the
//! falling piece, the score panel and the overlays into a [`FrameBuffer`], and
//! [`TerminalRenderer`] flushes that buffer to the terminal, writing only the
//! cells that changed since the previous frame.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockdrop_core as core;
pub use blockdrop_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{cell_color, GameView, Scene, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
