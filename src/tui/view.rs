//! Pure projection of machine state into something drawable.

use crate::games::checkers::{Color, GameSnapshot, Piece, Position};
use crate::interaction::{Highlights, InteractionMachine, Notice, Phase};

/// One square as it should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareView {
    /// Which square.
    pub position: Position,
    /// Playable (dark) square.
    pub dark: bool,
    /// Occupant.
    pub piece: Option<Piece>,
    /// Holds the selected piece.
    pub selected: bool,
    /// Legal destination of the selected piece.
    pub destination: bool,
    /// Under the keyboard cursor.
    pub cursor: bool,
}

/// Heads-up line above the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    /// Name of the player to move.
    pub player: String,
    /// Side to move.
    pub color: Color,
    /// Forced continuation pending.
    pub double_jump: bool,
    /// Set once the game has ended: the winner, or `None` for a draw.
    pub game_over: Option<Option<Color>>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// `squares[y][x]`, or empty before the first snapshot arrives.
    pub squares: Vec<Vec<SquareView>>,
    /// Turn information, once a snapshot exists.
    pub hud: Option<Hud>,
    /// Player-facing message.
    pub notice: Option<Notice>,
    /// Interaction phase.
    pub phase: Phase,
    /// Intents are not being delivered.
    pub paused: bool,
}

impl BoardView {
    /// Projects the machine's snapshot and highlights.
    pub fn project(machine: &InteractionMachine, cursor: Position, paused: bool) -> Self {
        let highlights = machine.highlights();
        let squares = machine
            .snapshot()
            .map(|snapshot| project_squares(snapshot, &highlights, cursor))
            .unwrap_or_default();

        Self {
            squares,
            hud: machine.snapshot().map(|s| Hud {
                player: s.current_player_name.clone(),
                color: s.current_color,
                double_jump: s.is_double_jump_active,
                game_over: (!s.is_playing()).then(|| s.winner()),
            }),
            notice: machine.notice().cloned(),
            phase: machine.phase(),
            paused,
        }
    }

    /// The square at `position`, if a board is loaded.
    pub fn square(&self, position: Position) -> Option<&SquareView> {
        self.squares
            .get(position.y() as usize)
            .and_then(|row| row.get(position.x() as usize))
    }
}

fn project_squares(
    snapshot: &GameSnapshot,
    highlights: &Highlights,
    cursor: Position,
) -> Vec<Vec<SquareView>> {
    snapshot
        .board
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| SquareView {
                    position: cell.position,
                    dark: cell.position.is_dark(),
                    piece: cell.piece,
                    selected: highlights.selected == Some(cell.position),
                    destination: highlights.destinations.contains(&cell.position),
                    cursor: cell.position == cursor,
                })
                .collect()
        })
        .collect()
}
