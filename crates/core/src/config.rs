//! Per-game configuration.

use crate::error::GameError;
use crate::types::{BASE_DROP_MS, GRID_HEIGHT, GRID_WIDTH, MIN_GRID_SIDE};

/// How a counter-clockwise rotation transforms the piece matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CcwRotation {
    /// Transpose, then reverse the row order: the exact inverse of a clockwise turn.
    #[default]
    Inverse,
    /// Transpose only. Reproduces the classic browser version, where the
    /// counter-clockwise turn mirrors the piece along its diagonal.
    TransposeOnly,
}

/// Settings fixed for the lifetime of a [`GameEngine`](crate::GameEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub width: u8,
    pub height: u8,
    /// Gravity interval at the start of each game, in milliseconds.
    pub base_drop_ms: u32,
    /// Seed for the piece bag.
    pub seed: u32,
    pub ccw_rotation: CcwRotation,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: GRID_WIDTH,
            height: GRID_HEIGHT,
            base_drop_ms: BASE_DROP_MS,
            seed: 1,
            ccw_rotation: CcwRotation::Inverse,
        }
    }
}

impl GameConfig {
    pub fn with_size(mut self, width: u8, height: u8) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_base_drop_ms(mut self, base_drop_ms: u32) -> Self {
        self.base_drop_ms = base_drop_ms;
        self
    }

    pub fn with_ccw_rotation(mut self, ccw_rotation: CcwRotation) -> Self {
        self.ccw_rotation = ccw_rotation;
        self
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.width < MIN_GRID_SIDE || self.height < MIN_GRID_SIDE {
            return Err(GameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.base_drop_ms == 0 {
            return Err(GameError::InvalidDropInterval(self.base_drop_ms));
        }
        Ok(())
    }
}
