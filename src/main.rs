//! Strictly Checkers - terminal client
//!
//! Starts or joins a game on the remote engine and plays it in the terminal.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_checkers::{
    ClientConfig, GameId, RestCheckersClient,
    tui::{GameTarget, init_file_logging, run_tui},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ClientConfig::load(&cli.config)?;
    if let Some(url) = cli.server_url {
        config = config.with_base_url(url);
    }

    init_file_logging(config.log_file())?;
    info!(base_url = %config.base_url(), "Loaded configuration");

    let engine = RestCheckersClient::new(config.base_url(), config.request_timeout())?;

    let target = match cli.command {
        Command::Play { player1, player2 } => GameTarget::New {
            player1: player1.unwrap_or_else(|| config.player1().clone()),
            player2: player2.unwrap_or_else(|| config.player2().clone()),
        },
        Command::Join { game_id } => GameTarget::Join(GameId::from(game_id)),
    };

    run_tui(engine, target).await
}
