//! Frame loop - drives an engine against a pluggable host
//!
//! Each frame the host supplies a timestamp (and applies any pending input).
//! The loop feeds the elapsed time to gravity, forwards score changes to the
//! score display and redraws the whole scene. It stops on game over or when the
//! host runs out of frames.

use crate::engine::{ActivePiece, GameEngine};
use crate::grid::Grid;
use crate::types::GameEvent;

/// Draws the grid and the falling piece.
pub trait Renderer {
    type Error;

    /// Repaint the full scene. Called once per frame.
    fn draw(&mut self, grid: &Grid, active: Option<&ActivePiece>) -> Result<(), Self::Error>;

    /// Sees every engine event drained during a frame, before that frame's draw.
    fn observe(&mut self, _event: GameEvent) {}
}

/// Shows the current score.
pub trait ScoreDisplay {
    fn render(&mut self, score: u32);
}

/// Timer, input source, renderer and score display in one.
pub trait FrameHost: Renderer + ScoreDisplay {
    /// Block until the next frame and return its timestamp in milliseconds.
    ///
    /// Input read while waiting is applied to `engine` here. `None` ends the loop.
    fn next_frame(&mut self, engine: &mut GameEngine) -> Result<Option<u64>, Self::Error>;
}

/// Why [`GameLoop::run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    GameOver { final_score: u32 },
    /// The host stopped supplying frames.
    Quit,
}

#[derive(Debug, Default)]
pub struct GameLoop {
    last_frame_ms: Option<u64>,
}

impl GameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run frames until game over or until the host quits.
    pub fn run<H: FrameHost>(
        &mut self,
        engine: &mut GameEngine,
        host: &mut H,
    ) -> Result<LoopExit, H::Error> {
        self.last_frame_ms = None;

        loop {
            let Some(now_ms) = host.next_frame(engine)? else {
                return Ok(LoopExit::Quit);
            };
            if let Some(exit) = self.frame(now_ms, engine, host)? {
                return Ok(exit);
            }
        }
    }

    /// Process a single frame stamped `now_ms`.
    ///
    /// The first frame after [`run`](Self::run) starts counts as zero elapsed time.
    pub fn frame<H: Renderer + ScoreDisplay>(
        &mut self,
        now_ms: u64,
        engine: &mut GameEngine,
        host: &mut H,
    ) -> Result<Option<LoopExit>, H::Error> {
        let elapsed = self
            .last_frame_ms
            .map_or(0, |last| now_ms.saturating_sub(last));
        self.last_frame_ms = Some(now_ms);

        engine.tick(u32::try_from(elapsed).unwrap_or(u32::MAX));

        let mut finished = None;
        for event in engine.take_events() {
            host.observe(event);
            match event {
                GameEvent::ScoreChanged { score } => host.render(score),
                GameEvent::GameOver { final_score } => finished = Some(final_score),
                GameEvent::Started | GameEvent::Landed { .. } => {}
            }
        }

        host.draw(engine.grid(), engine.active())?;

        Ok(finished.map(|final_score| LoopExit::GameOver { final_score }))
    }
}
