//! Session client error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong talking to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionErrorKind {
    /// Starting a game failed: unreachable engine or non-success status.
    #[display("Failed to start game: {}", _0)]
    SessionCreation(String),
    /// Reading the board failed or returned an unreadable payload.
    #[display("Failed to fetch board: {}", _0)]
    SnapshotFetch(String),
    /// Reading the hint list failed.
    #[display("Failed to fetch hints: {}", _0)]
    HintFetch(String),
    /// The engine refused the move. Holds its rejection text verbatim.
    #[display("{}", _0)]
    IllegalMove(String),
    /// The move request never got an answer from the engine.
    #[display("Failed to submit move: {}", _0)]
    MoveTransport(String),
}

/// Session client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", kind, file, line)]
pub struct SessionError {
    /// Error category and detail.
    #[error(not(source))]
    pub kind: SessionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: SessionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True for network or status failures, false for an engine rule rejection.
    pub fn is_transport(&self) -> bool {
        !matches!(self.kind, SessionErrorKind::IllegalMove(_))
    }

    /// The message to show a player, without location noise.
    pub fn user_message(&self) -> String {
        self.kind.to_string()
    }
}

impl From<SessionErrorKind> for SessionError {
    #[track_caller]
    fn from(kind: SessionErrorKind) -> Self {
        Self::new(kind)
    }
}
