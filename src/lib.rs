//! Strictly Checkers library - a terminal client for a remote checkers engine
//!
//! The engine owns every rule. This crate only renders what the engine
//! reports and steers the player through select-then-move interactions.
//!
//! # Architecture
//!
//! - **Games**: Wire types for the board, pieces and move hints
//! - **Client**: The engine contract and its REST implementation
//! - **Interaction**: The sans-IO move state machine and its async driver
//! - **Tui**: Board projection, input mapping and rendering
//!
//! # Example
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//! use strictly_checkers::{GameController, RestCheckersClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = RestCheckersClient::new("http://localhost:5260/api/checkers", Duration::from_secs(5))?;
//! let mut controller = GameController::start(Arc::new(engine), "Black", "Red").await?;
//! controller.settle().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod games;
pub mod interaction;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{BASE_URL_ENV, ClientConfig, ConfigError};

// Crate-level exports - Engine client
pub use client::{
    CheckersEngine, GameId, MoveAccepted, MoveRequest, RestCheckersClient, SessionError,
    SessionErrorKind, SessionStarted,
};

// Crate-level exports - Interaction
pub use interaction::{
    Command, EngineReply, GameController, Highlights, InteractionMachine, Notice, Phase,
    RetryTarget, Ticket,
};

// Crate-level exports - Game types
pub use games::checkers::{
    BOARD_SIZE, Board, Cell, Color, GameSnapshot, GameStatus, MoveHint, Piece, PieceKind,
    Position, RawHint, is_jump, is_same_position, parse_hints,
};
