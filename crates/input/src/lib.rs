//! Terminal input mapping.
//!
//! Translates `crossterm` key events into [`GameAction`](crate::types::GameAction)
//! values. Every press maps to at most one action; the engine applies it
//! synchronously, so there is no repeat or buffering logic here.

pub mod map;

pub use blockdrop_types as types;

pub use map::{map_key, should_quit};
