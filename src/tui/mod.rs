//! Terminal UI for checkers.

mod app;
mod input;
mod ui;
mod view;

pub use app::App;
pub use input::{Intent, key_intent, mouse_intent, move_cursor, square_at};
pub use ui::{SQUARE_HEIGHT, SQUARE_WIDTH, ScreenLayout, draw, layout};
pub use view::{BoardView, Hud, SquareView};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument};

use crate::client::{CheckersEngine, GameId};
use crate::interaction::GameController;

/// Which game the TUI should open.
#[derive(Debug, Clone)]
pub enum GameTarget {
    /// Start a new game for two named players.
    New {
        /// First (Black) player.
        player1: String,
        /// Second (Red) player.
        player2: String,
    },
    /// Open an existing game.
    Join(GameId),
}

/// Initializes file logging so tracing output does not corrupt the screen.
pub fn init_file_logging(path: &str) -> Result<()> {
    let log_file = std::fs::File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}

/// Runs the TUI client until the user quits.
#[instrument(skip(engine))]
pub async fn run_tui<E: CheckersEngine + 'static>(engine: E, target: GameTarget) -> Result<()> {
    info!("Starting checkers TUI");
    let engine = Arc::new(engine);

    // Connect before taking over the terminal so errors print normally.
    let controller = match target {
        GameTarget::New { player1, player2 } => {
            GameController::start(engine, &player1, &player2).await?
        }
        GameTarget::Join(game_id) => GameController::join(engine, game_id),
    };
    info!(game_id = %controller.machine().game_id(), "Opened game");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, App::new(controller)).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    res
}

async fn run_app<E: CheckersEngine + 'static>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App<E>,
) -> Result<()> {
    loop {
        app.controller_mut().drain_replies();

        let view = app.view();
        let completed = terminal.draw(|f| draw(f, &view))?;
        let board = layout(completed.area).board;

        // Short poll keeps engine replies flowing between key presses.
        if event::poll(Duration::from_millis(50))? {
            let intent = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => key_intent(key),
                Event::Mouse(mouse) => mouse_intent(mouse, board),
                _ => None,
            };
            if let Some(intent) = intent {
                app.handle_intent(intent);
            }
        }

        if app.should_quit() {
            return Ok(());
        }

        tokio::task::yield_now().await;
    }
}
