//! Terminal runner (default binary).
//!
//! Runs the frame loop against a crossterm host with a framebuffer renderer.
//! Enter starts (and restarts) a game; `q`, Esc or Ctrl-C quits.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::prelude::*;

use blockdrop::core::{CcwRotation, GameConfig, GameEngine, GameLoop, LoopExit};
use blockdrop::host::TerminalHost;
use blockdrop::types::{BASE_DROP_MS, FRAME_MS, GRID_HEIGHT, GRID_WIDTH};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Grid width in cells.
    #[arg(long, default_value_t = GRID_WIDTH)]
    width: u8,
    /// Grid height in cells.
    #[arg(long, default_value_t = GRID_HEIGHT)]
    height: u8,
    /// Seed for the piece bag. Defaults to one derived from the clock.
    #[arg(short, long)]
    seed: Option<u32>,
    /// Gravity interval at the start of a game, in milliseconds.
    #[arg(long, default_value_t = BASE_DROP_MS)]
    drop_ms: u32,
    /// Frame cadence in milliseconds.
    #[arg(long, default_value_t = FRAME_MS)]
    frame_ms: u32,
    /// Counter-clockwise rotation only transposes the piece (mirrors it).
    #[arg(long)]
    literal_ccw: bool,
    /// Write logs to this file. Nothing is logged without it.
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log level: error, warn, info, debug or trace.
    #[arg(long, default_value_t = Level::INFO)]
    log_level: Level,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let ccw = if self.literal_ccw {
            CcwRotation::TransposeOnly
        } else {
            CcwRotation::Inverse
        };
        GameConfig::default()
            .with_size(self.width, self.height)
            .with_seed(self.seed.unwrap_or_else(clock_seed))
            .with_base_drop_ms(self.drop_ms)
            .with_ccw_rotation(ccw)
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

/// Install a file logger. The terminal belongs to the game, so logs never go to stdout.
fn init_logging(path: Option<&Path>, level: Level) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.log_level)?;

    let config = cli.game_config();
    info!(
        width = config.width,
        height = config.height,
        seed = config.seed,
        ccw = ?config.ccw_rotation,
        "configured"
    );
    let mut engine = GameEngine::new(config).context("invalid game configuration")?;

    let mut host = TerminalHost::new(cli.frame_ms);
    host.enter()?;

    let result = run(&mut engine, &mut host);

    // Always try to restore terminal state.
    let _ = host.exit();
    result
}

fn run(engine: &mut GameEngine, host: &mut TerminalHost) -> Result<()> {
    let mut game_loop = GameLoop::new();
    loop {
        match game_loop.run(engine, host)? {
            LoopExit::Quit => return Ok(()),
            // The overlay stays up and Enter restarts through the same loop
            LoopExit::GameOver { final_score } => info!(final_score, "waiting for restart"),
        }
    }
}
