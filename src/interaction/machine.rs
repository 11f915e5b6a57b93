//! Move interaction state machine.
//!
//! The machine owns the client's only mutable game state: the latest
//! [`GameSnapshot`], the parsed hints for it, and the player's selection. It
//! performs no I/O. Every transition returns at most one [`Command`] for the
//! caller to execute against the engine; the engine's answer comes back as an
//! [`EngineReply`] carrying the [`Ticket`] of the command that caused it.
//!
//! Tickets carry a sequence number that increases with every command issued.
//! Replies that no longer match the latest request of their kind are
//! dropped when applied, which keeps the view consistent when network
//! answers arrive out of order.

use crate::client::{GameId, MoveAccepted, SessionError};
use crate::games::checkers::{GameSnapshot, MoveHint, Position, RawHint, parse_hints};
use derive_new::new;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Interaction phase, gating which intents are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Phase {
    /// Nothing selected.
    Idle,
    /// Waiting for the hint list of a fresh snapshot.
    HintsLoading,
    /// A piece of the side to move is selected.
    PieceSelected,
    /// A move request is in flight.
    Submitting,
}

/// Tag attached to every outbound request.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Ticket {
    /// Game the request was issued for.
    pub game_id: GameId,
    /// Position in the order requests were issued.
    pub seq: u64,
}

/// Engine call the machine wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read the board.
    FetchSnapshot(Ticket),
    /// Read the hint list.
    FetchHints(Ticket),
    /// Play a move.
    SubmitMove {
        /// Request tag.
        ticket: Ticket,
        /// Selected piece.
        from: Position,
        /// Chosen destination.
        to: Position,
    },
}

impl Command {
    /// The ticket this command will be answered with.
    pub fn ticket(&self) -> &Ticket {
        match self {
            Command::FetchSnapshot(t) | Command::FetchHints(t) => t,
            Command::SubmitMove { ticket, .. } => ticket,
        }
    }
}

/// Engine answer to a [`Command`].
#[derive(Debug, Clone)]
pub enum EngineReply {
    /// Answer to [`Command::FetchSnapshot`].
    Snapshot(Ticket, Result<GameSnapshot, SessionError>),
    /// Answer to [`Command::FetchHints`].
    Hints(Ticket, Result<Vec<RawHint>, SessionError>),
    /// Answer to [`Command::SubmitMove`].
    Move(Ticket, Result<MoveAccepted, SessionError>),
}

/// Which read a retry should repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTarget {
    /// The board fetch failed.
    Snapshot,
    /// The hints fetch failed.
    Hints,
}

/// The single message the player currently sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Neutral feedback.
    Info(String),
    /// The engine refused a move; text is the engine's, unaltered.
    Rejected(String),
    /// A request failed in transit.
    Transport {
        /// What failed.
        message: String,
        /// Read to repeat, if retrying makes sense.
        retry: Option<RetryTarget>,
    },
}

impl Notice {
    /// Text for display.
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(s) | Notice::Rejected(s) => s,
            Notice::Transport { message, .. } => message,
        }
    }
}

/// Selection and destinations for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    /// The selected piece.
    pub selected: Option<Position>,
    /// Squares the selected piece may move to.
    pub destinations: BTreeSet<Position>,
}

/// A move that has been sent and not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingMove {
    seq: u64,
    from: Position,
    to: Position,
}

/// The interaction state machine for one game.
#[derive(Debug, Clone)]
pub struct InteractionMachine {
    game_id: GameId,
    snapshot: Option<GameSnapshot>,
    hints: Vec<MoveHint>,
    selected: Option<Position>,
    destinations: BTreeSet<Position>,
    phase: Phase,
    pending_move: Option<PendingMove>,
    next_seq: u64,
    latest_snapshot_request: Option<u64>,
    applied_snapshot_seq: u64,
    awaiting_hints: Option<u64>,
    notice: Option<Notice>,
}

impl InteractionMachine {
    /// Creates an empty machine for `game_id`.
    ///
    /// Call [`InteractionMachine::refresh`] to load the first snapshot.
    #[instrument(skip_all, fields(game_id = %game_id))]
    pub fn new(game_id: GameId) -> Self {
        info!("Creating interaction machine");
        Self {
            game_id,
            snapshot: None,
            hints: Vec::new(),
            selected: None,
            destinations: BTreeSet::new(),
            phase: Phase::Idle,
            pending_move: None,
            next_seq: 1,
            latest_snapshot_request: None,
            applied_snapshot_seq: 0,
            awaiting_hints: None,
            notice: None,
        }
    }

    /// Game this machine tracks.
    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    /// Current snapshot, once one has arrived.
    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_ref()
    }

    /// Hints for the current snapshot.
    pub fn hints(&self) -> &[MoveHint] {
        &self.hints
    }

    /// Selected square.
    pub fn selected(&self) -> Option<Position> {
        self.selected
    }

    /// Destinations of the selected piece.
    pub fn destinations(&self) -> &BTreeSet<Position> {
        &self.destinations
    }

    /// Current phase. A move in flight always reads as [`Phase::Submitting`].
    pub fn phase(&self) -> Phase {
        if self.pending_move.is_some() {
            Phase::Submitting
        } else {
            self.phase
        }
    }

    /// Message for the player, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Selection and destinations for the board view.
    pub fn highlights(&self) -> Highlights {
        Highlights {
            selected: self.selected,
            destinations: self.destinations.clone(),
        }
    }

    /// Records an informational message, e.g. the engine's greeting.
    pub fn set_info(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice::Info(message.into()));
    }

    fn issue(&mut self) -> Ticket {
        let seq = self.next_seq;
        self.next_seq += 1;
        Ticket::new(self.game_id.clone(), seq)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.destinations.clear();
    }

    fn destinations_from(&self, from: Position) -> BTreeSet<Position> {
        self.hints
            .iter()
            .filter(|h| h.from == from)
            .map(|h| h.to)
            .collect()
    }

    /// Requests a fresh snapshot.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn refresh(&mut self) -> Command {
        let ticket = self.issue();
        self.latest_snapshot_request = Some(ticket.seq);
        debug!(seq = ticket.seq, "Requesting snapshot");
        Command::FetchSnapshot(ticket)
    }

    fn request_hints(&mut self) -> Command {
        let ticket = self.issue();
        self.awaiting_hints = Some(ticket.seq);
        self.phase = Phase::HintsLoading;
        debug!(seq = ticket.seq, "Requesting hints");
        Command::FetchHints(ticket)
    }

    /// Repeats the read named by the current transport notice.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn retry(&mut self) -> Option<Command> {
        let target = match &self.notice {
            Some(Notice::Transport {
                retry: Some(target),
                ..
            }) => *target,
            _ => return None,
        };
        info!(?target, "Retrying");
        self.notice = None;
        match target {
            RetryTarget::Snapshot => Some(self.refresh()),
            RetryTarget::Hints if self.snapshot.as_ref().is_some_and(|s| s.is_playing()) => {
                Some(self.request_hints())
            }
            RetryTarget::Hints => None,
        }
    }

    /// Applies an engine reply, returning any follow-up command.
    pub fn apply(&mut self, reply: EngineReply) -> Option<Command> {
        match reply {
            EngineReply::Snapshot(ticket, result) => self.on_snapshot(ticket, result),
            EngineReply::Hints(ticket, result) => self.on_hints(ticket, result),
            EngineReply::Move(ticket, result) => self.on_move(ticket, result),
        }
    }

    #[instrument(skip(self, result), fields(game_id = %self.game_id, seq = ticket.seq))]
    fn on_snapshot(
        &mut self,
        ticket: Ticket,
        result: Result<GameSnapshot, SessionError>,
    ) -> Option<Command> {
        if ticket.game_id != self.game_id || ticket.seq <= self.applied_snapshot_seq {
            debug!(applied = self.applied_snapshot_seq, "Dropping stale snapshot");
            return None;
        }

        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                if self.latest_snapshot_request == Some(ticket.seq) {
                    warn!(error = %e, "Snapshot fetch failed");
                    self.notice = Some(Notice::Transport {
                        message: e.user_message(),
                        retry: Some(RetryTarget::Snapshot),
                    });
                } else {
                    debug!(error = %e, "Ignoring failure of superseded snapshot request");
                }
                return None;
            }
        };

        self.applied_snapshot_seq = ticket.seq;
        self.clear_selection();
        self.hints.clear();
        self.awaiting_hints = None;
        self.phase = Phase::Idle;

        info!(
            current_color = %snapshot.current_color,
            status = %snapshot.status,
            double_jump = snapshot.is_double_jump_active,
            "Applied snapshot"
        );

        let playing = snapshot.is_playing();
        if !playing {
            self.notice = Some(Notice::Info(match snapshot.winner() {
                Some(winner) => format!("Game over! {} wins.", winner),
                None => "Game over! It's a draw.".to_string(),
            }));
        } else if matches!(
            self.notice,
            Some(Notice::Transport {
                retry: Some(RetryTarget::Snapshot),
                ..
            })
        ) {
            self.notice = None;
        }
        self.snapshot = Some(snapshot);

        playing.then(|| self.request_hints())
    }

    #[instrument(skip(self, result), fields(game_id = %self.game_id, seq = ticket.seq))]
    fn on_hints(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<RawHint>, SessionError>,
    ) -> Option<Command> {
        if ticket.game_id != self.game_id || self.awaiting_hints != Some(ticket.seq) {
            debug!(awaiting = ?self.awaiting_hints, "Dropping stale hints");
            return None;
        }
        self.awaiting_hints = None;
        if self.phase == Phase::HintsLoading {
            self.phase = Phase::Idle;
        }

        match result {
            Ok(raw) => {
                self.hints = parse_hints(&raw);
                debug!(count = self.hints.len(), "Applied hints");
            }
            Err(e) => {
                warn!(error = %e, "Hint fetch failed");
                self.hints.clear();
                self.notice = Some(Notice::Transport {
                    message: e.user_message(),
                    retry: Some(RetryTarget::Hints),
                });
            }
        }
        None
    }

    #[instrument(skip(self, result), fields(game_id = %self.game_id, seq = ticket.seq))]
    fn on_move(
        &mut self,
        ticket: Ticket,
        result: Result<MoveAccepted, SessionError>,
    ) -> Option<Command> {
        let pending = match &self.pending_move {
            Some(p) if ticket.game_id == self.game_id && p.seq == ticket.seq => p.clone(),
            _ => {
                debug!("Dropping reply for unknown move");
                return None;
            }
        };
        self.pending_move = None;

        match result {
            Ok(accepted) => {
                info!(from = %pending.from, to = %pending.to, "Move accepted");
                self.clear_selection();
                if self.awaiting_hints.is_none() {
                    self.phase = Phase::Idle;
                }
                self.notice = (!accepted.message.is_empty()).then(|| Notice::Info(accepted.message));
                Some(self.refresh())
            }
            Err(e) => {
                warn!(error = %e, from = %pending.from, to = %pending.to, "Move failed");
                self.notice = Some(if e.is_transport() {
                    Notice::Transport {
                        message: e.user_message(),
                        retry: None,
                    }
                } else {
                    Notice::Rejected(e.user_message())
                });
                self.restore_selection(pending.from);
                None
            }
        }
    }

    /// Puts the selection back after a failed move.
    fn restore_selection(&mut self, from: Position) {
        // A snapshot may have landed while the move was in flight.
        let still_ours = self.snapshot.as_ref().is_some_and(|s| s.is_own_piece(from));
        if still_ours && self.awaiting_hints.is_none() {
            self.selected = Some(from);
            self.destinations = self.destinations_from(from);
            self.phase = Phase::PieceSelected;
        } else if self.awaiting_hints.is_none() {
            self.clear_selection();
            self.phase = Phase::Idle;
        }
    }

    /// Handles a click on `position`.
    #[instrument(skip(self), fields(game_id = %self.game_id, phase = %self.phase()))]
    pub fn square_clicked(&mut self, position: Position) -> Option<Command> {
        if self.pending_move.is_some() {
            debug!("Move in flight, ignoring click");
            return None;
        }
        if self.phase == Phase::HintsLoading {
            debug!("Hints loading, ignoring click");
            return None;
        }
        let snapshot = match &self.snapshot {
            Some(s) if s.is_playing() => s,
            _ => return None,
        };

        if snapshot.is_own_piece(position) {
            self.selected = Some(position);
            self.destinations = self.destinations_from(position);
            self.phase = Phase::PieceSelected;
            self.notice = Some(Notice::Info(if self.destinations.is_empty() {
                "No valid moves for this piece.".to_string()
            } else {
                "Select a highlighted square to move.".to_string()
            }));
            debug!(destinations = self.destinations.len(), "Selected piece");
            return None;
        }

        let Some(from) = self.selected else {
            if snapshot.board.piece_at(position).is_some() {
                self.notice = Some(Notice::Info(format!(
                    "It is {}'s turn!",
                    snapshot.current_player_name
                )));
            }
            return None;
        };

        if self.destinations.contains(&position) {
            let ticket = self.issue();
            info!(from = %from, to = %position, seq = ticket.seq, "Submitting move");
            self.pending_move = Some(PendingMove {
                seq: ticket.seq,
                from,
                to: position,
            });
            self.phase = Phase::Submitting;
            return Some(Command::SubmitMove {
                ticket,
                from,
                to: position,
            });
        }

        if snapshot.is_double_jump_active {
            debug!("Double jump pending, keeping selection");
            return None;
        }

        debug!("Deselecting");
        self.clear_selection();
        self.phase = Phase::Idle;
        None
    }
}
