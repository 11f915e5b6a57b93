//! Runs interaction machine commands against an engine.

use super::machine::{Command, EngineReply, InteractionMachine};
use crate::client::{CheckersEngine, GameId, SessionError};
use crate::games::checkers::Position;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Drives one game: spawns engine calls and feeds their replies back to the
/// machine in arrival order.
///
/// Replies are applied only from [`GameController::apply`], so the machine is
/// mutated from one place even though several requests may be in flight.
/// Must be used inside a tokio runtime.
pub struct GameController<E> {
    engine: Arc<E>,
    machine: InteractionMachine,
    reply_tx: mpsc::UnboundedSender<EngineReply>,
    reply_rx: mpsc::UnboundedReceiver<EngineReply>,
    in_flight: usize,
}

impl<E: CheckersEngine + 'static> GameController<E> {
    /// Starts a new game on the engine and loads its first snapshot.
    #[instrument(skip(engine))]
    pub async fn start(
        engine: Arc<E>,
        player1: &str,
        player2: &str,
    ) -> Result<Self, SessionError> {
        let started = engine.start_session(player1, player2).await?;
        info!(game_id = %started.game_id, "Session created");
        let mut controller = Self::join(engine, started.game_id);
        if !started.message.is_empty() {
            controller.machine.set_info(started.message);
        }
        Ok(controller)
    }

    /// Attaches to an existing game and loads its snapshot.
    #[instrument(skip(engine), fields(game_id = %game_id))]
    pub fn join(engine: Arc<E>, game_id: GameId) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            engine,
            machine: InteractionMachine::new(game_id),
            reply_tx,
            reply_rx,
            in_flight: 0,
        };
        let command = controller.machine.refresh();
        controller.dispatch(command);
        controller
    }

    /// The interaction state.
    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    /// Number of engine calls not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Forwards a square click to the machine.
    pub fn click(&mut self, position: Position) {
        if let Some(command) = self.machine.square_clicked(position) {
            self.dispatch(command);
        }
    }

    /// Repeats the last failed read, if any.
    pub fn retry(&mut self) {
        if let Some(command) = self.machine.retry() {
            self.dispatch(command);
        }
    }

    /// Fetches a fresh snapshot.
    pub fn refresh(&mut self) {
        let command = self.machine.refresh();
        self.dispatch(command);
    }

    /// Applies one engine reply and dispatches any follow-up.
    pub fn apply(&mut self, reply: EngineReply) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Some(command) = self.machine.apply(reply) {
            self.dispatch(command);
        }
    }

    /// Applies every reply that has already arrived. Returns how many.
    pub fn drain_replies(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(reply) = self.reply_rx.try_recv() {
            self.apply(reply);
            applied += 1;
        }
        applied
    }

    /// Waits for the next reply, or `None` if nothing is in flight.
    pub async fn next_reply(&mut self) -> Option<EngineReply> {
        if self.in_flight == 0 {
            return None;
        }
        self.reply_rx.recv().await
    }

    /// Applies replies until no request is outstanding.
    pub async fn settle(&mut self) {
        while let Some(reply) = self.next_reply().await {
            self.apply(reply);
        }
    }

    #[instrument(skip(self, command), fields(seq = command.ticket().seq))]
    fn dispatch(&mut self, command: Command) {
        self.in_flight += 1;
        let engine = Arc::clone(&self.engine);
        let tx = self.reply_tx.clone();
        debug!(?command, "Dispatching engine call");

        tokio::spawn(async move {
            let reply = match command {
                Command::FetchSnapshot(ticket) => {
                    let result = engine.fetch_snapshot(&ticket.game_id).await;
                    EngineReply::Snapshot(ticket, result)
                }
                Command::FetchHints(ticket) => {
                    let result = engine.fetch_hints(&ticket.game_id).await;
                    EngineReply::Hints(ticket, result)
                }
                Command::SubmitMove { ticket, from, to } => {
                    let result = engine.submit_move(&ticket.game_id, from, to).await;
                    EngineReply::Move(ticket, result)
                }
            };
            // Receiver only closes when the controller is dropped.
            let _ = tx.send(reply);
        });
    }
}
