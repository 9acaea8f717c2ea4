//! Scoring module - line-clear points and gravity decay
//!
//! Each clearing pass starts with a multiplier of 1. Every cleared row adds
//! `LINE_CLEAR_POINTS * multiplier`, shrinks the drop interval by
//! `DROP_INTERVAL_DECAY`, then doubles the multiplier. Clearing `k` rows in
//! one pass therefore awards `10 * (2^k - 1)` points and scales the interval by
//! `0.95^k`.

use crate::types::{DROP_INTERVAL_DECAY, LINE_CLEAR_POINTS};

/// Points awarded for clearing `rows` rows in a single pass.
pub fn line_clear_points(rows: u32) -> u32 {
    let mut multiplier: u32 = 1;
    let mut points: u32 = 0;
    for _ in 0..rows {
        points = points.saturating_add(LINE_CLEAR_POINTS.saturating_mul(multiplier));
        multiplier = multiplier.saturating_mul(2);
    }
    points
}

/// Score and current gravity of one game.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreState {
    score: u32,
    base_drop_ms: f64,
    drop_interval_ms: f64,
    lines: u32,
}

impl ScoreState {
    pub fn new(base_drop_ms: u32) -> Self {
        let base = f64::from(base_drop_ms);
        Self {
            score: 0,
            base_drop_ms: base,
            drop_interval_ms: base,
            lines: 0,
        }
    }

    /// Back to zero points and the base interval
    pub fn reset(&mut self) {
        self.score = 0;
        self.drop_interval_ms = self.base_drop_ms;
        self.lines = 0;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current gravity interval in milliseconds
    pub fn drop_interval_ms(&self) -> f64 {
        self.drop_interval_ms
    }

    /// Total rows cleared this game
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Apply one clearing pass of `rows` rows, returning the points awarded.
    pub fn apply_line_clears(&mut self, rows: u32) -> u32 {
        let awarded = line_clear_points(rows);
        for _ in 0..rows {
            self.drop_interval_ms *= DROP_INTERVAL_DECAY;
        }

        self.score = self.score.saturating_add(awarded);
        self.lines = self.lines.saturating_add(rows);
        awarded
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(crate::types::BASE_DROP_MS)
    }
}
