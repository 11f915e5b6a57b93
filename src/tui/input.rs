//! Keyboard and mouse input mapped to board intents.

use crate::games::checkers::{BOARD_SIZE, Position};
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use super::ui::{SQUARE_HEIGHT, SQUARE_WIDTH};

/// What the player asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Click a square.
    Click(Position),
    /// Click the square under the cursor.
    ClickCursor,
    /// Move the cursor by a column and row offset.
    Cursor(i8, i8),
    /// Suspend or resume intent delivery.
    TogglePause,
    /// Repeat the failed read.
    Retry,
    /// Fetch the board again.
    Refresh,
    /// Leave the game.
    Quit,
}

/// Maps a key press to an intent.
pub fn key_intent(key: KeyEvent) -> Option<Intent> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(Intent::Quit),
        KeyCode::Char('p') => Some(Intent::TogglePause),
        KeyCode::Char('r') => Some(Intent::Retry),
        KeyCode::Char('f') => Some(Intent::Refresh),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Intent::ClickCursor),
        KeyCode::Left | KeyCode::Char('h') => Some(Intent::Cursor(-1, 0)),
        KeyCode::Right | KeyCode::Char('l') => Some(Intent::Cursor(1, 0)),
        KeyCode::Up | KeyCode::Char('k') => Some(Intent::Cursor(0, -1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Intent::Cursor(0, 1)),
        _ => None,
    }
}

/// Maps a left click inside the board frame to a square.
pub fn mouse_intent(event: MouseEvent, board: Rect) -> Option<Intent> {
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            square_at(board, event.column, event.row).map(Intent::Click)
        }
        _ => None,
    }
}

/// The square under terminal cell `(column, row)`, given the bordered board frame.
pub fn square_at(board: Rect, column: u16, row: u16) -> Option<Position> {
    let left = board.x + 1;
    let top = board.y + 1;
    if column < left || row < top {
        return None;
    }
    let x = (column - left) / SQUARE_WIDTH;
    let y = (row - top) / SQUARE_HEIGHT;
    if x >= u16::from(BOARD_SIZE) || y >= u16::from(BOARD_SIZE) {
        return None;
    }
    Position::new(x as u8, y as u8)
}

/// Moves the cursor, staying put at the board edge.
pub fn move_cursor(cursor: Position, dx: i8, dy: i8) -> Position {
    cursor.offset(dx, dy).unwrap_or(cursor)
}
