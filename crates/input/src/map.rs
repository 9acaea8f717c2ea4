//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press to a game action.
///
/// Arrows move, drop and rotate; vi (`hjkl`) and `wasd` keys mirror them.
/// Release events are ignored so terminals that report them do not double-fire.
pub fn map_key(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let action = match key.code {
        KeyCode::Left | KeyCode::Char('h' | 'H' | 'a' | 'A') => GameAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l' | 'L' | 'd' | 'D') => GameAction::MoveRight,
        KeyCode::Down | KeyCode::Char('j' | 'J' | 's' | 'S') => GameAction::SoftDrop,

        KeyCode::Up | KeyCode::Char('k' | 'K' | 'w' | 'W') => GameAction::RotateCw,
        KeyCode::Char('z' | 'Z') => GameAction::RotateCcw,

        KeyCode::Char(' ') => GameAction::HardDrop,
        KeyCode::Enter => GameAction::Start,

        _ => return None,
    };
    Some(action)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q' | 'Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
