//! Remote engine access.

mod engine;
mod error;
mod rest_client;

pub use engine::{CheckersEngine, GameId, MoveAccepted, MoveRequest, SessionStarted};
pub use error::{SessionError, SessionErrorKind};
pub use rest_client::RestCheckersClient;
