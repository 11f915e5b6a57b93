//! Application state and intent routing.

use crate::client::CheckersEngine;
use crate::games::checkers::Position;
use crate::interaction::GameController;
use tracing::{debug, info};

use super::input::{Intent, move_cursor};
use super::view::BoardView;

/// Main application state.
///
/// Beyond the controller this holds only transient view state: the keyboard
/// cursor and the pause flag.
pub struct App<E> {
    controller: GameController<E>,
    cursor: Position,
    paused: bool,
    should_quit: bool,
}

impl<E: CheckersEngine + 'static> App<E> {
    /// Creates a new application around a running game.
    pub fn new(controller: GameController<E>) -> Self {
        Self {
            controller,
            cursor: Position::at(0, 0),
            paused: false,
            should_quit: false,
        }
    }

    /// The game controller.
    pub fn controller(&self) -> &GameController<E> {
        &self.controller
    }

    /// Mutable access for applying engine replies.
    pub fn controller_mut(&mut self) -> &mut GameController<E> {
        &mut self.controller
    }

    /// Keyboard cursor.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Whether intents are suspended.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Projection for the renderer.
    pub fn view(&self) -> BoardView {
        BoardView::project(self.controller.machine(), self.cursor, self.paused)
    }

    /// Routes one intent.
    pub fn handle_intent(&mut self, intent: Intent) {
        debug!(?intent, paused = self.paused, "Handling intent");

        match intent {
            Intent::Quit => {
                info!("User quit");
                self.should_quit = true;
            }
            Intent::TogglePause => {
                self.paused = !self.paused;
                info!(paused = self.paused, "Toggled pause");
            }
            _ if self.paused => debug!("Paused, dropping intent"),
            Intent::Cursor(dx, dy) => self.cursor = move_cursor(self.cursor, dx, dy),
            Intent::ClickCursor => self.controller.click(self.cursor),
            Intent::Click(position) => {
                self.cursor = position;
                self.controller.click(position);
            }
            Intent::Retry => self.controller.retry(),
            Intent::Refresh => self.controller.refresh(),
        }
    }
}
