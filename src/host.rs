//! Terminal frame host: crossterm input, wall-clock frames, framebuffer output.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};
use tracing::{info, trace};

use crate::core::{ActivePiece, FrameHost, GameEngine, Grid, Renderer, ScoreDisplay};
use crate::input::{map_key, should_quit};
use crate::term::{FrameBuffer, GameView, Scene, TerminalRenderer, Viewport};
use crate::types::{GameEvent, GameStatus};

pub struct TerminalHost {
    renderer: TerminalRenderer,
    view: GameView,
    fb: FrameBuffer,
    frame: Duration,
    epoch: Instant,
    deadline: Instant,
    score: u32,
    lines: u32,
    status: GameStatus,
}

impl TerminalHost {
    pub fn new(frame_ms: u32) -> Self {
        let now = Instant::now();
        let frame = Duration::from_millis(u64::from(frame_ms.max(1)));
        Self {
            renderer: TerminalRenderer::new(),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
            frame,
            epoch: now,
            deadline: now + frame,
            score: 0,
            lines: 0,
            status: GameStatus::NotStarted,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    /// Apply input until the frame deadline. Returns false on a quit key.
    fn pump_input(&mut self, engine: &mut GameEngine) -> Result<bool> {
        loop {
            let timeout = self.deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(true);
            }

            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        info!("quit requested");
                        return Ok(false);
                    }
                    if let Some(action) = map_key(key) {
                        let applied = engine.apply_action(action);
                        trace!(action = action.as_str(), applied, "input");
                    }
                }
                Event::Resize(..) => self.renderer.invalidate(),
                _ => {}
            }
        }
    }
}

impl Renderer for TerminalHost {
    type Error = anyhow::Error;

    fn draw(&mut self, grid: &Grid, active: Option<&ActivePiece>) -> Result<()> {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let scene = Scene {
            grid,
            active,
            score: self.score,
            lines: self.lines,
            status: self.status,
        };
        self.view.render_into(&scene, Viewport::new(w, h), &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)
    }

    fn observe(&mut self, event: GameEvent) {
        match event {
            GameEvent::Started => {
                self.status = GameStatus::Playing;
                self.lines = 0;
            }
            GameEvent::Landed { rows_cleared } => {
                self.lines = self.lines.saturating_add(rows_cleared);
            }
            GameEvent::GameOver { .. } => self.status = GameStatus::GameOver,
            GameEvent::ScoreChanged { .. } => {}
        }
    }
}

impl ScoreDisplay for TerminalHost {
    fn render(&mut self, score: u32) {
        self.score = score;
    }
}

impl FrameHost for TerminalHost {
    fn next_frame(&mut self, engine: &mut GameEngine) -> Result<Option<u64>> {
        if !self.pump_input(engine)? {
            return Ok(None);
        }

        // Skip missed frames rather than bursting to catch up
        let now = Instant::now();
        self.deadline += self.frame;
        if self.deadline < now {
            self.deadline = now + self.frame;
        }

        let elapsed = now.duration_since(self.epoch).as_millis();
        Ok(Some(u64::try_from(elapsed).unwrap_or(u64::MAX)))
    }
}
