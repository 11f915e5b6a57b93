//! The remote engine seam.

use super::error::SessionError;
use crate::games::checkers::{GameSnapshot, Position, RawHint};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifier the engine assigns to a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl From<&str> for GameId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl GameId {
    /// The id as sent in request paths.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reply to a successful start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStarted {
    /// The new game's id.
    pub game_id: GameId,
    /// Engine greeting.
    #[serde(default)]
    pub message: String,
}

/// Reply to an accepted move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveAccepted {
    /// Engine acknowledgement, e.g. "Move processed".
    #[serde(default)]
    pub message: String,
}

/// Move request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    /// Source column.
    pub from_x: u8,
    /// Source row.
    pub from_y: u8,
    /// Target column.
    pub to_x: u8,
    /// Target row.
    pub to_y: u8,
}

impl MoveRequest {
    /// Body for moving the piece on `from` to `to`.
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from_x: from.x(),
            from_y: from.y(),
            to_x: to.x(),
            to_y: to.y(),
        }
    }
}

/// The four operations the remote rules engine offers.
///
/// Implementations perform I/O and hold no game state.
#[async_trait::async_trait]
pub trait CheckersEngine: Send + Sync {
    /// Creates a game for two named players.
    async fn start_session(
        &self,
        player1: &str,
        player2: &str,
    ) -> Result<SessionStarted, SessionError>;

    /// Reads the full board-and-turn state.
    async fn fetch_snapshot(&self, game_id: &GameId) -> Result<GameSnapshot, SessionError>;

    /// Reads the legal moves for the side to move. Empty is a valid answer.
    async fn fetch_hints(&self, game_id: &GameId) -> Result<Vec<RawHint>, SessionError>;

    /// Asks the engine to play a move.
    async fn submit_move(
        &self,
        game_id: &GameId,
        from: Position,
        to: Position,
    ) -> Result<MoveAccepted, SessionError>;
}
