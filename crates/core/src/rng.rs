//! RNG module - shrinking-bag piece selection
//!
//! The bag starts with one of each piece kind. Every draw removes a uniformly
//! random entry; once the bag is empty it is refilled with all seven kinds.
//! Nothing stops the last piece of one bag from matching the first of the next.
//!
//! Also provides a simple LCG so games are reproducible from a seed.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG cycle with short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

/// Bag of piece kinds not yet drawn in the current window.
#[derive(Debug, Clone)]
pub struct PieceBag {
    remaining: ArrayVec<PieceKind, 7>,
    rng: SimpleRng,
}

impl PieceBag {
    pub fn new(seed: u32) -> Self {
        Self {
            remaining: ArrayVec::from(PieceKind::ALL),
            rng: SimpleRng::new(seed),
        }
    }

    /// Refill with all seven kinds. The RNG keeps its position.
    pub fn reset(&mut self) {
        self.remaining = ArrayVec::from(PieceKind::ALL);
    }

    /// Draw the next piece kind
    pub fn next(&mut self) -> PieceKind {
        if self.remaining.is_empty() {
            self.reset();
        }

        let index = self.rng.next_range(self.remaining.len() as u32) as usize;
        self.remaining.remove(index)
    }

    /// Kinds still available before the next refill, in fill order
    pub fn remaining(&self) -> &[PieceKind] {
        &self.remaining
    }
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new(1)
    }
}
