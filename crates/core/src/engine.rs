//! Engine module - the game state machine
//!
//! Ties together the grid, the active piece, the bag and the score. Every
//! command is synchronous and fully applied before it returns, so input handled
//! between two frames is always visible to the next tick's gravity check.

use tracing::{debug, info, trace};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::Grid;
use crate::pieces::{create_piece, create_piece_named, Piece};
use crate::rng::PieceBag;
use crate::scoring::ScoreState;
use crate::types::{CellId, GameAction, GameEvent, GameStatus};

/// The falling piece and the grid offset of its matrix's top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub piece: Piece,
    pub x: i16,
    pub y: i16,
}

impl ActivePiece {
    /// Place `piece` on the top row, horizontally centered on a grid `grid_width` wide.
    pub fn spawn(piece: Piece, grid_width: u8) -> Self {
        let x = (grid_width / 2) as i16 - (piece.size() / 2) as i16;
        Self { piece, x, y: 0 }
    }

    /// Filled cells in grid coordinates
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16, CellId)> + '_ {
        self.piece
            .occupied()
            .map(move |(dx, dy, id)| (self.x + dx, self.y + dy, id))
    }
}

/// One game: grid, active piece, bag, score and lifecycle.
///
/// Independent instances share nothing.
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    grid: Grid,
    active: Option<ActivePiece>,
    bag: PieceBag,
    score: ScoreState,
    drop_timer_ms: u32,
    status: GameStatus,
    events: Vec<GameEvent>,
}

impl GameEngine {
    /// Create an engine in the `NotStarted` state
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: GameConfig) -> Self {
        Self {
            grid: Grid::new(config.width, config.height),
            active: None,
            bag: PieceBag::new(config.seed),
            score: ScoreState::new(config.base_drop_ms),
            drop_timer_ms: 0,
            status: GameStatus::NotStarted,
            events: Vec::new(),
            config,
        }
    }

    /// Start a fresh game. Ignored while a game is in progress.
    pub fn start(&mut self) -> bool {
        if !self.status.can_start() {
            return false;
        }

        self.grid.clear();
        self.score.reset();
        self.drop_timer_ms = 0;
        self.bag.reset();
        self.active = None;
        self.status = GameStatus::Playing;

        info!(
            width = self.grid.width(),
            height = self.grid.height(),
            "game started"
        );
        self.events.push(GameEvent::Started);
        self.events.push(GameEvent::ScoreChanged { score: 0 });

        self.spawn_next();
        true
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access, for hosts that script a starting position.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score.score()
    }

    pub fn lines_cleared(&self) -> u32 {
        self.score.lines()
    }

    /// Current gravity interval in milliseconds
    pub fn drop_interval_ms(&self) -> f64 {
        self.score.drop_interval_ms()
    }

    /// Time accumulated toward the next gravity step
    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    /// Drain the queued events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Draw the next kind from the bag and place it at the spawn position.
    ///
    /// Returns false if the game is not running or the spawn collided (which ends it).
    pub fn spawn_next(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let kind = self.bag.next();
        self.place_spawn(create_piece(kind))
    }

    /// Replace the active piece with the one named by `label`.
    ///
    /// An unknown label ends the game.
    pub fn spawn_named(&mut self, label: &str) -> Result<(), GameError> {
        if !self.is_playing() {
            return Ok(());
        }
        match create_piece_named(label) {
            Ok(piece) => {
                self.place_spawn(piece);
                Ok(())
            }
            Err(err) => {
                self.end_game();
                Err(err)
            }
        }
    }

    fn place_spawn(&mut self, piece: Piece) -> bool {
        let active = ActivePiece::spawn(piece, self.grid.width());
        let blocked = self.grid.collides(&active.piece, active.x, active.y);
        debug!(kind = active.piece.kind().as_str(), x = active.x, blocked, "spawn");
        self.active = Some(active);

        if blocked {
            self.end_game();
            return false;
        }
        true
    }

    fn end_game(&mut self) {
        self.status = GameStatus::GameOver;
        let final_score = self.score.score();
        info!(final_score, lines = self.score.lines(), "game over");
        self.events.push(GameEvent::GameOver { final_score });
    }

    /// Shift the active piece one column. Blocked moves are rejected.
    pub fn move_horizontal(&mut self, dir: i16) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        active.x += dir;
        if self.grid.collides(&active.piece, active.x, active.y) {
            active.x -= dir;
            return false;
        }
        true
    }

    /// Move down one row, landing the piece if it is blocked.
    pub fn soft_drop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        active.y += 1;
        if self.grid.collides(&active.piece, active.x, active.y) {
            active.y -= 1;
            self.land();
        }
        self.drop_timer_ms = 0;
        true
    }

    /// Drop to the lowest free row and land.
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        while !self.grid.collides(&active.piece, active.x, active.y) {
            active.y += 1;
        }
        active.y -= 1;

        self.land();
        self.drop_timer_ms = 0;
        true
    }

    /// Rotate in place, then search sideways for a free column.
    ///
    /// Offsets alternate +1, -2, +3, ... (net +1, -1, +2, ...). Once the next
    /// offset would exceed the piece width the rotation is undone and the piece
    /// returns to its original column.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.is_playing() {
            return false;
        }
        let ccw = self.config.ccw_rotation;
        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let original_x = active.x;
        active.piece.rotate(clockwise, ccw);

        let width = active.piece.size() as i16;
        let mut offset: i16 = 1;
        while self.grid.collides(&active.piece, active.x, active.y) {
            active.x += offset;
            offset = -(offset + offset.signum());
            if offset > width {
                active.piece.undo_rotate(clockwise, ccw);
                active.x = original_x;
                trace!(clockwise, x = original_x, "rotation blocked");
                return false;
            }
        }
        true
    }

    /// Advance the gravity timer by `elapsed_ms`.
    ///
    /// Returns true if the timer ran past the drop interval and the piece fell.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.is_playing() {
            return false;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if f64::from(self.drop_timer_ms) > self.score.drop_interval_ms() {
            self.soft_drop();
            return true;
        }
        false
    }

    /// Merge, clear rows, score, spawn
    fn land(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.grid.merge(&active.piece, active.x, active.y);
        let rows = self.grid.clear_completed_rows();
        let points = self.score.apply_line_clears(rows);

        debug!(
            kind = active.piece.kind().as_str(),
            x = active.x,
            y = active.y,
            rows,
            "landed"
        );
        self.events.push(GameEvent::Landed { rows_cleared: rows });

        if rows > 0 {
            info!(
                rows,
                points,
                score = self.score.score(),
                drop_interval_ms = self.score.drop_interval_ms(),
                "rows cleared"
            );
            self.events.push(GameEvent::ScoreChanged {
                score: self.score.score(),
            });
        }

        self.spawn_next();
    }

    /// Apply a game action, returning whether it was accepted
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Start => self.start(),
            GameAction::MoveLeft => self.move_horizontal(-1),
            GameAction::MoveRight => self.move_horizontal(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::RotateCw => self.rotate(true),
            GameAction::RotateCcw => self.rotate(false),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::from_valid_config(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CcwRotation;
    use crate::types::PieceKind;

    fn started() -> GameEngine {
        let mut engine = GameEngine::default();
        engine.start();
        engine
    }

    fn started_with(label: &str) -> GameEngine {
        let mut engine = started();
        engine.spawn_named(label).unwrap();
        engine
    }

    fn fill_row_except(engine: &mut GameEngine, y: i16, gap: i16) {
        for x in 0..engine.grid().width() as i16 {
            if x != gap {
                engine.grid_mut().set(x, y, 1);
            }
        }
    }

    #[test]
    fn test_new_engine_is_not_started() {
        let engine = GameEngine::default();
        assert_eq!(engine.status(), GameStatus::NotStarted);
        assert!(engine.active().is_none());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.drop_interval_ms(), 1000.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig::default().with_size(2, 2);
        assert!(GameEngine::new(config).is_err());
    }

    #[test]
    fn test_start_spawns_centered_piece() {
        let mut engine = started();
        assert_eq!(engine.status(), GameStatus::Playing);
        let active = engine.active().unwrap();
        assert_eq!(active.y, 0);
        assert_eq!(active.x, 6 - (active.piece.size() / 2) as i16);
        assert_eq!(
            engine.take_events()[..2],
            [GameEvent::Started, GameEvent::ScoreChanged { score: 0 }]
        );
    }

    #[test]
    fn test_commands_ignored_before_start() {
        let mut engine = GameEngine::default();
        assert!(!engine.apply_action(GameAction::MoveLeft));
        assert!(!engine.apply_action(GameAction::HardDrop));
        assert!(!engine.tick(5000));
        assert_eq!(engine.status(), GameStatus::NotStarted);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut engine = started_with("I");
        engine.hard_drop();
        let occupied = engine.grid().occupied_count();
        assert!(!engine.apply_action(GameAction::Start));
        assert_eq!(engine.grid().occupied_count(), occupied);
    }

    #[test]
    fn test_move_horizontal_stops_at_wall() {
        let mut engine = started_with("O");
        // O spawns at x=5 and is two wide: five free columns to the left
        for _ in 0..5 {
            assert!(engine.move_horizontal(-1));
        }
        assert!(!engine.move_horizontal(-1));
        assert_eq!(engine.active().unwrap().x, 0);
    }

    #[test]
    fn test_move_blocked_by_stack() {
        let mut engine = started_with("O");
        engine.grid_mut().set(7, 1, 2);
        assert!(!engine.move_horizontal(1));
        assert_eq!(engine.active().unwrap().x, 5);
    }

    #[test]
    fn test_soft_drop_moves_and_resets_timer() {
        let mut engine = started_with("T");
        engine.tick(400);
        assert_eq!(engine.drop_timer_ms(), 400);
        assert!(engine.soft_drop());
        assert_eq!(engine.active().unwrap().y, 1);
        assert_eq!(engine.drop_timer_ms(), 0);
    }

    #[test]
    fn test_soft_drop_lands_on_floor() {
        let mut engine = started_with("O");
        for _ in 0..18 {
            engine.soft_drop();
        }
        assert_eq!(engine.active().unwrap().y, 18);
        assert_eq!(engine.grid().occupied_count(), 0);

        engine.soft_drop();
        assert_eq!(engine.grid().occupied_count(), 4);
        assert_eq!(engine.grid().get(5, 19), Some(2));
        assert_eq!(engine.active().unwrap().y, 0);
    }

    #[test]
    fn test_hard_drop_i_lands_in_column_five() {
        let mut engine = started_with("I");
        assert_eq!(engine.active().unwrap().x, 4);
        assert!(engine.hard_drop());

        for y in 16..20 {
            assert_eq!(engine.grid().get(5, y), Some(5));
        }
        assert_eq!(engine.grid().occupied_count(), 4);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.drop_timer_ms(), 0);
    }

    #[test]
    fn test_single_row_clear_scores_ten() {
        let mut engine = started();
        fill_row_except(&mut engine, 19, 5);
        engine.spawn_named("I").unwrap();
        engine.take_events();

        engine.hard_drop();

        assert_eq!(engine.score(), 10);
        assert!((engine.drop_interval_ms() - 950.0).abs() < 1e-9);
        assert_eq!(engine.grid().occupied_count(), 3);
        for y in 17..20 {
            assert_eq!(engine.grid().get(5, y), Some(5));
        }
        let events = engine.take_events();
        assert!(events.contains(&GameEvent::Landed { rows_cleared: 1 }));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 10 }));
    }

    #[test]
    fn test_four_row_clear_compounds() {
        let mut engine = started();
        for y in 16..20 {
            fill_row_except(&mut engine, y, 5);
        }
        engine.spawn_named("I").unwrap();
        engine.hard_drop();

        assert_eq!(engine.score(), 150);
        assert_eq!(engine.lines_cleared(), 4);
        let expected = 1000.0 * 0.95f64.powi(4);
        assert!((engine.drop_interval_ms() - expected).abs() < 1e-9);
        assert_eq!(engine.grid().occupied_count(), 0);
    }

    #[test]
    fn test_rotate_in_open_space_keeps_column() {
        let mut engine = started_with("T");
        engine.soft_drop();
        let x = engine.active().unwrap().x;
        assert!(engine.rotate(true));
        assert_eq!(engine.active().unwrap().x, x);
        assert_eq!(engine.active().unwrap().piece.get(0, 1), 1);
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut engine = started_with("I");
        // Vertical I in the second-to-last column
        while engine.move_horizontal(1) {}
        engine.move_horizontal(-1);
        assert_eq!(engine.active().unwrap().x, 9);

        assert!(engine.rotate(true));
        let active = engine.active().unwrap();
        assert_eq!(active.x, 8);
        assert!(active.cells().all(|(x, y, _)| y == 1 && (8..12).contains(&x)));
    }

    #[test]
    fn test_rotate_kicks_off_left_wall() {
        let mut engine = started_with("I");
        // Vertical I in column 0, matrix hanging one column off the wall
        while engine.move_horizontal(-1) {}
        assert_eq!(engine.active().unwrap().x, -1);

        assert!(engine.rotate(true));
        let active = engine.active().unwrap();
        assert_eq!(active.x, 0);
        assert!(active.cells().all(|(x, y, _)| y == 1 && (0..4).contains(&x)));
    }

    #[test]
    fn test_rotate_kick_reaches_second_offset_to_the_right() {
        let mut engine = started_with("T");
        for _ in 0..5 {
            engine.soft_drop();
        }
        let before = engine.active().unwrap().clone();
        assert_eq!((before.x, before.y), (5, 5));

        // Blocks the turned T in place, at +1 and at -1, leaving +2 open
        for x in 5..8 {
            engine.grid_mut().set(x, 5, 1);
        }

        assert!(engine.rotate(true));
        let active = engine.active().unwrap();
        assert_eq!((active.x, active.y), (7, 5));
        assert_eq!(engine.grid().occupied_count(), 3);
    }

    #[test]
    fn test_rotate_gives_up_when_kicks_run_out() {
        let mut engine = started_with("I");
        while engine.move_horizontal(1) {}
        let before = engine.active().unwrap().clone();
        assert_eq!(before.x, 10);

        // Net -2 would fit, but the search aborts before trying it
        assert!(!engine.rotate(true));
        assert_eq!(engine.active().unwrap(), &before);
    }

    #[test]
    fn test_rotate_blocked_by_stack_restores_state() {
        let mut engine = started_with("I");
        for _ in 0..10 {
            engine.soft_drop();
        }
        // Walls of blocks on both sides of the vertical I
        for y in 10..14 {
            for x in 0..12 {
                if x != 5 {
                    engine.grid_mut().set(x, y, 3);
                }
            }
        }
        let before = engine.active().unwrap().clone();
        assert!(!engine.rotate(false));
        assert_eq!(engine.active().unwrap(), &before);
    }

    #[test]
    fn test_transpose_only_ccw() {
        let config = GameConfig::default().with_ccw_rotation(CcwRotation::TransposeOnly);
        let mut engine = GameEngine::new(config).unwrap();
        engine.start();
        engine.spawn_named("L").unwrap();
        engine.soft_drop();

        assert!(engine.rotate(false));
        let piece = &engine.active().unwrap().piece;
        assert_eq!(piece.rows().nth(1).unwrap(), &[3, 3, 3]);
        assert_eq!(piece.rows().nth(2).unwrap(), &[0, 0, 3]);
    }

    #[test]
    fn test_tick_drops_only_after_interval_is_exceeded() {
        let mut engine = started_with("T");
        assert!(!engine.tick(600));
        assert!(!engine.tick(400));
        assert_eq!(engine.active().unwrap().y, 0);

        assert!(engine.tick(1));
        assert_eq!(engine.active().unwrap().y, 1);
        assert_eq!(engine.drop_timer_ms(), 0);
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut engine = started();
        for x in 0..12 {
            engine.grid_mut().set(x, 1, 4);
        }
        engine.take_events();

        assert!(!engine.spawn_next());
        assert_eq!(engine.status(), GameStatus::GameOver);
        assert_eq!(
            engine.take_events(),
            vec![GameEvent::GameOver { final_score: 0 }]
        );
    }

    #[test]
    fn test_game_over_freezes_commands() {
        let mut engine = started();
        for x in 0..12 {
            engine.grid_mut().set(x, 1, 4);
        }
        engine.spawn_next();
        let grid = engine.grid().clone();
        let active = engine.active().cloned();

        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::RotateCw,
            GameAction::RotateCcw,
        ] {
            assert!(!engine.apply_action(action));
        }
        assert!(!engine.tick(10_000));
        assert_eq!(engine.grid(), &grid);
        assert_eq!(engine.active().cloned(), active);
    }

    #[test]
    fn test_restart_after_game_over_resets_state() {
        let mut engine = started();
        fill_row_except(&mut engine, 19, 5);
        engine.spawn_named("I").unwrap();
        engine.hard_drop();
        for x in 0..12 {
            engine.grid_mut().set(x, 1, 4);
        }
        engine.spawn_next();
        assert_eq!(engine.status(), GameStatus::GameOver);

        assert!(engine.apply_action(GameAction::Start));
        assert_eq!(engine.status(), GameStatus::Playing);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.drop_interval_ms(), 1000.0);
        assert_eq!(engine.grid().occupied_count(), 0);
    }

    #[test]
    fn test_unknown_piece_label_ends_game() {
        let mut engine = started();
        let err = engine.spawn_named("Q").unwrap_err();
        assert_eq!(err, GameError::InvalidPieceType("Q".to_string()));
        assert_eq!(engine.status(), GameStatus::GameOver);
    }

    #[test]
    fn test_bag_does_not_repeat_within_seven_spawns() {
        let mut engine = started();
        let mut kinds = vec![engine.active().unwrap().piece.kind()];
        for _ in 0..6 {
            // Keep the well empty so spawns never collide
            engine.grid_mut().clear();
            engine.hard_drop();
            kinds.push(engine.active().unwrap().piece.kind());
        }
        for kind in PieceKind::ALL {
            assert!(kinds.contains(&kind), "missing {:?}", kind);
        }
    }
}
