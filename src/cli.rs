//! Command-line interface for strictly_checkers.

use clap::{Parser, Subcommand};

/// Strictly Checkers - terminal client for a remote checkers engine
#[derive(Parser, Debug)]
#[command(name = "strictly_checkers")]
#[command(about = "Play checkers against a remote rules engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client configuration file
    #[arg(short, long, default_value = "checkers.toml")]
    pub config: std::path::PathBuf,

    /// Engine base URL, overriding config and environment
    #[arg(long)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game
    Play {
        /// First player's name (plays Black)
        #[arg(long)]
        player1: Option<String>,

        /// Second player's name (plays Red)
        #[arg(long)]
        player2: Option<String>,
    },

    /// Open an existing game by id
    Join {
        /// Game id returned when the game was started
        game_id: String,
    },
}
