//! Blockdrop (workspace facade crate).
//!
//! Re-exports the member crates under `crates/` as `blockdrop::{core,input,term,types}`
//! and hosts the terminal frame host used by the binary.

pub mod host;

pub use blockdrop_core as core;
pub use blockdrop_input as input;
pub use blockdrop_term as term;
pub use blockdrop_types as types;
