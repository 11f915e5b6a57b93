//! Scenario tests for the move interaction state machine.

use strictly_checkers::client::{GameId, MoveAccepted, SessionError, SessionErrorKind};
use strictly_checkers::games::checkers::{
    Board, Color, GameSnapshot, GameStatus, Piece, PieceKind, Position, RawHint,
};
use strictly_checkers::interaction::{
    Command, EngineReply, InteractionMachine, Notice, Phase, RetryTarget, Ticket,
};

fn pos(x: u8, y: u8) -> Position {
    Position::new(x, y).unwrap()
}

fn pawn(color: Color, x: u8, y: u8) -> Piece {
    Piece {
        color,
        kind: PieceKind::Pawn,
        position: pos(x, y),
    }
}

/// Black to move: black pawns on (2,5) and (4,5), a red pawn on (3,2).
fn opening(double_jump: bool) -> GameSnapshot {
    GameSnapshot {
        board: Board::empty()
            .with_piece(pawn(Color::Black, 2, 5))
            .with_piece(pawn(Color::Black, 4, 5))
            .with_piece(pawn(Color::Red, 3, 2)),
        current_color: Color::Black,
        current_player_name: "Alice".into(),
        status: GameStatus::Play,
        is_double_jump_active: double_jump,
    }
}

fn fetch_snapshot(command: Option<Command>) -> Ticket {
    match command {
        Some(Command::FetchSnapshot(ticket)) => ticket,
        other => panic!("expected snapshot fetch, got {:?}", other),
    }
}

fn fetch_hints(command: Option<Command>) -> Ticket {
    match command {
        Some(Command::FetchHints(ticket)) => ticket,
        other => panic!("expected hints fetch, got {:?}", other),
    }
}

/// Machine with `snapshot` applied and `hints` loaded.
fn loaded(snapshot: GameSnapshot, hints: &[&str]) -> InteractionMachine {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));
    let hints_ticket = fetch_hints(machine.apply(EngineReply::Snapshot(ticket, Ok(snapshot))));
    assert_eq!(machine.phase(), Phase::HintsLoading);
    let raw = hints.iter().map(|h| RawHint::from(*h)).collect();
    assert!(machine.apply(EngineReply::Hints(hints_ticket, Ok(raw))).is_none());
    assert_eq!(machine.phase(), Phase::Idle);
    machine
}

fn rejected(text: &str) -> SessionError {
    SessionError::new(SessionErrorKind::IllegalMove(text.into()))
}

#[test]
fn test_selecting_piece_highlights_its_destinations() {
    let mut machine = loaded(opening(false), &["2,5 -> 1,4", "2,5 -> 3,4", "4,5 -> 5,4"]);

    assert!(machine.square_clicked(pos(2, 5)).is_none());
    assert_eq!(machine.phase(), Phase::PieceSelected);
    assert_eq!(machine.selected(), Some(pos(2, 5)));
    let destinations: Vec<_> = machine.destinations().iter().copied().collect();
    assert_eq!(destinations, vec![pos(1, 4), pos(3, 4)]);

    // Re-selecting another own piece switches the selection.
    machine.square_clicked(pos(4, 5));
    assert_eq!(machine.selected(), Some(pos(4, 5)));
    assert_eq!(machine.destinations().len(), 1);
}

#[test]
fn test_piece_without_moves_is_selected_with_notice() {
    let mut machine = loaded(opening(false), &["4,5 -> 5,4"]);
    machine.square_clicked(pos(2, 5));
    assert_eq!(machine.selected(), Some(pos(2, 5)));
    assert!(machine.destinations().is_empty());
    assert_eq!(
        machine.notice(),
        Some(&Notice::Info("No valid moves for this piece.".into()))
    );
}

#[test]
fn test_clicks_without_selection() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);

    assert!(machine.square_clicked(pos(0, 0)).is_none());
    assert_eq!(machine.notice(), None);
    assert_eq!(machine.phase(), Phase::Idle);

    assert!(machine.square_clicked(pos(3, 2)).is_none());
    assert_eq!(machine.notice(), Some(&Notice::Info("It is Alice's turn!".into())));
    assert_eq!(machine.selected(), None);
}

#[test]
fn test_clicking_elsewhere_deselects() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);
    machine.square_clicked(pos(2, 5));
    assert!(machine.square_clicked(pos(7, 0)).is_none());
    assert_eq!(machine.selected(), None);
    assert!(machine.destinations().is_empty());
    assert_eq!(machine.phase(), Phase::Idle);
}

#[test]
fn test_accepted_move_refreshes_board() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);
    machine.square_clicked(pos(2, 5));

    let command = machine.square_clicked(pos(3, 4));
    let Some(Command::SubmitMove { ticket, from, to }) = command else {
        panic!("expected move submission, got {:?}", command);
    };
    assert_eq!((from, to), (pos(2, 5), pos(3, 4)));
    assert_eq!(machine.phase(), Phase::Submitting);

    // No second submission while one is in flight.
    assert!(machine.square_clicked(pos(3, 4)).is_none());
    assert!(machine.square_clicked(pos(4, 5)).is_none());

    let accepted = MoveAccepted {
        message: "Move processed".into(),
    };
    let refresh = fetch_snapshot(machine.apply(EngineReply::Move(ticket, Ok(accepted))));
    let refresh_seq = refresh.seq;
    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(machine.selected(), None);
    assert_eq!(machine.notice(), Some(&Notice::Info("Move processed".into())));

    let mut after = opening(false);
    after.current_color = Color::Red;
    after.current_player_name = "Bob".into();
    let hints = fetch_hints(machine.apply(EngineReply::Snapshot(refresh, Ok(after))));
    assert!(hints.seq > refresh_seq);
    assert_eq!(machine.snapshot().unwrap().current_color, Color::Red);
}

#[test]
fn test_rejected_move_keeps_selection_and_verbatim_text() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4", "2,5 -> 1,4"]);
    machine.square_clicked(pos(2, 5));
    let command = machine.square_clicked(pos(3, 4)).unwrap();

    let text = "Invalid move: a capture is mandatory";
    let follow_up = machine.apply(EngineReply::Move(command.ticket().clone(), Err(rejected(text))));

    assert!(follow_up.is_none());
    assert_eq!(machine.notice(), Some(&Notice::Rejected(text.into())));
    assert_eq!(machine.phase(), Phase::PieceSelected);
    assert_eq!(machine.selected(), Some(pos(2, 5)));
    assert_eq!(machine.destinations().len(), 2);
}

#[test]
fn test_move_transport_failure_is_not_retryable() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);
    machine.square_clicked(pos(2, 5));
    let command = machine.square_clicked(pos(3, 4)).unwrap();

    let err = SessionError::new(SessionErrorKind::MoveTransport("connection reset".into()));
    machine.apply(EngineReply::Move(command.ticket().clone(), Err(err)));

    assert!(matches!(
        machine.notice(),
        Some(Notice::Transport { retry: None, .. })
    ));
    assert!(machine.retry().is_none());
    assert_eq!(machine.selected(), Some(pos(2, 5)));
}

#[test]
fn test_double_jump_keeps_selection() {
    let mut machine = loaded(opening(true), &["2,5 -> 4,3"]);
    machine.square_clicked(pos(2, 5));
    assert!(machine.destinations().contains(&pos(4, 3)));

    // A click off the destinations does not release the capturing piece.
    assert!(machine.square_clicked(pos(7, 0)).is_none());
    assert_eq!(machine.selected(), Some(pos(2, 5)));
    assert_eq!(machine.phase(), Phase::PieceSelected);

    assert!(matches!(
        machine.square_clicked(pos(4, 3)),
        Some(Command::SubmitMove { .. })
    ));
}

#[test]
fn test_double_jump_other_piece_cannot_move() {
    let mut machine = loaded(opening(true), &["2,5 -> 4,3"]);

    // Hints only name the capturing piece, so another piece has nowhere to go.
    machine.square_clicked(pos(4, 5));
    assert_eq!(machine.selected(), Some(pos(4, 5)));
    assert!(machine.destinations().is_empty());
    assert!(machine.square_clicked(pos(4, 3)).is_none());
    assert!(machine.square_clicked(pos(5, 4)).is_none());
    assert_eq!(machine.phase(), Phase::PieceSelected);
}

#[test]
fn test_finished_game_fetches_no_hints() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));

    let mut over = opening(false);
    over.status = GameStatus::Win;
    over.current_color = Color::Red;
    assert!(machine.apply(EngineReply::Snapshot(ticket, Ok(over))).is_none());

    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(
        machine.notice(),
        Some(&Notice::Info("Game over! Black wins.".into()))
    );
    // The board is frozen.
    assert!(machine.square_clicked(pos(2, 5)).is_none());
    assert_eq!(machine.selected(), None);
}

#[test]
fn test_draw_notice() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));
    let mut draw = opening(false);
    draw.status = GameStatus::Draw;
    machine.apply(EngineReply::Snapshot(ticket, Ok(draw)));
    assert_eq!(
        machine.notice(),
        Some(&Notice::Info("Game over! It's a draw.".into()))
    );
}

#[test]
fn test_clicks_ignored_while_hints_load() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));
    fetch_hints(machine.apply(EngineReply::Snapshot(ticket, Ok(opening(false)))));

    assert!(machine.square_clicked(pos(2, 5)).is_none());
    assert_eq!(machine.selected(), None);
    assert_eq!(machine.phase(), Phase::HintsLoading);
}

#[test]
fn test_out_of_order_snapshots() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let older = fetch_snapshot(Some(machine.refresh()));
    let newer = fetch_snapshot(Some(machine.refresh()));

    let mut fresh = opening(false);
    fresh.current_player_name = "Newest".into();
    fetch_hints(machine.apply(EngineReply::Snapshot(newer, Ok(fresh))));

    // The older answer arrives late and is ignored.
    assert!(machine.apply(EngineReply::Snapshot(older.clone(), Ok(opening(false)))).is_none());
    assert_eq!(machine.snapshot().unwrap().current_player_name, "Newest");

    // So is its failure.
    let err = SessionError::new(SessionErrorKind::SnapshotFetch("timeout".into()));
    machine.apply(EngineReply::Snapshot(older, Err(err)));
    assert_eq!(machine.notice(), None);
}

#[test]
fn test_hints_for_superseded_snapshot_are_dropped() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let first = fetch_snapshot(Some(machine.refresh()));
    let first_hints = fetch_hints(machine.apply(EngineReply::Snapshot(first, Ok(opening(false)))));

    let second = fetch_snapshot(Some(machine.refresh()));
    let second_hints =
        fetch_hints(machine.apply(EngineReply::Snapshot(second, Ok(opening(false)))));

    machine.apply(EngineReply::Hints(
        first_hints,
        Ok(vec![RawHint::from("4,5 -> 5,4")]),
    ));
    assert!(machine.hints().is_empty());
    assert_eq!(machine.phase(), Phase::HintsLoading);

    machine.apply(EngineReply::Hints(
        second_hints,
        Ok(vec![RawHint::from("2,5 -> 3,4")]),
    ));
    assert_eq!(machine.hints().len(), 1);
    assert_eq!(machine.hints()[0].from, pos(2, 5));
}

#[test]
fn test_replies_for_other_games_are_dropped() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));
    let foreign = Ticket::new(GameId::from("game-2"), ticket.seq);
    assert!(machine.apply(EngineReply::Snapshot(foreign, Ok(opening(false)))).is_none());
    assert!(machine.snapshot().is_none());
}

#[test]
fn test_snapshot_failure_retry() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));
    let err = SessionError::new(SessionErrorKind::SnapshotFetch("connection refused".into()));
    assert!(machine.apply(EngineReply::Snapshot(ticket, Err(err))).is_none());

    assert!(matches!(
        machine.notice(),
        Some(Notice::Transport {
            retry: Some(RetryTarget::Snapshot),
            ..
        })
    ));

    let retry = fetch_snapshot(machine.retry());
    assert_eq!(machine.notice(), None);
    fetch_hints(machine.apply(EngineReply::Snapshot(retry, Ok(opening(false)))));
    assert!(machine.snapshot().is_some());
}

#[test]
fn test_hints_failure_returns_to_idle_and_retries() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let ticket = fetch_snapshot(Some(machine.refresh()));
    let hints = fetch_hints(machine.apply(EngineReply::Snapshot(ticket, Ok(opening(false)))));

    let err = SessionError::new(SessionErrorKind::HintFetch("503".into()));
    machine.apply(EngineReply::Hints(hints, Err(err)));
    assert_eq!(machine.phase(), Phase::Idle);
    assert!(matches!(
        machine.notice(),
        Some(Notice::Transport {
            retry: Some(RetryTarget::Hints),
            ..
        })
    ));

    let again = fetch_hints(machine.retry());
    assert_eq!(machine.phase(), Phase::HintsLoading);
    machine.apply(EngineReply::Hints(again, Ok(vec![RawHint::from("2,5 -> 3,4")])));
    machine.square_clicked(pos(2, 5));
    assert!(machine.destinations().contains(&pos(3, 4)));
}

#[test]
fn test_retry_without_failure_does_nothing() {
    let mut machine = loaded(opening(false), &[]);
    assert!(machine.retry().is_none());
}

#[test]
fn test_sequence_numbers_increase() {
    let mut machine = InteractionMachine::new(GameId::from("game-1"));
    let a = machine.refresh();
    let b = machine.refresh();
    assert!(b.ticket().seq > a.ticket().seq);
}

/// Selects (2,5), submits (2,5)->(3,4), then lands a snapshot while the move
/// is still in flight. Returns the move ticket and the follow-up hints ticket.
fn snapshot_during_move(
    machine: &mut InteractionMachine,
    landed: GameSnapshot,
) -> (Ticket, Ticket) {
    machine.square_clicked(pos(2, 5));
    let submit = machine.square_clicked(pos(3, 4)).unwrap();
    let refresh = fetch_snapshot(Some(machine.refresh()));
    let hints = fetch_hints(machine.apply(EngineReply::Snapshot(refresh, Ok(landed))));

    // The new board clears the selection but not the pending move.
    assert_eq!(machine.phase(), Phase::Submitting);
    assert_eq!(machine.selected(), None);
    assert!(machine.square_clicked(pos(4, 5)).is_none());
    assert!(machine.square_clicked(pos(3, 4)).is_none());
    assert_eq!(machine.selected(), None);
    (submit.ticket().clone(), hints)
}

#[test]
fn test_rejection_after_mid_move_snapshot_restores_own_piece() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);
    let (submit, hints) = snapshot_during_move(&mut machine, opening(false));

    machine.apply(EngineReply::Hints(hints, Ok(vec![RawHint::from("2,5 -> 3,4")])));
    assert_eq!(machine.phase(), Phase::Submitting);

    machine.apply(EngineReply::Move(submit, Err(rejected("Capture is mandatory"))));
    assert_eq!(machine.phase(), Phase::PieceSelected);
    assert_eq!(machine.selected(), Some(pos(2, 5)));
    assert!(machine.destinations().contains(&pos(3, 4)));
}

#[test]
fn test_rejection_after_turn_passed_clears_selection() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);
    let mut red_to_move = opening(false);
    red_to_move.current_color = Color::Red;
    red_to_move.current_player_name = "Bob".into();
    let (submit, hints) = snapshot_during_move(&mut machine, red_to_move);

    machine.apply(EngineReply::Hints(hints, Ok(vec![RawHint::from("3,2 -> 2,3")])));
    machine.apply(EngineReply::Move(submit, Err(rejected("Not your turn"))));

    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(machine.selected(), None);
    assert!(machine.destinations().is_empty());
    assert_eq!(machine.notice(), Some(&Notice::Rejected("Not your turn".into())));
}

#[test]
fn test_rejection_while_hints_load_keeps_loading() {
    let mut machine = loaded(opening(false), &["2,5 -> 3,4"]);
    let (submit, hints) = snapshot_during_move(&mut machine, opening(false));

    machine.apply(EngineReply::Move(submit, Err(rejected("Capture is mandatory"))));
    assert_eq!(machine.phase(), Phase::HintsLoading);
    assert_eq!(machine.selected(), None);
    assert!(machine.square_clicked(pos(2, 5)).is_none());
    assert_eq!(machine.selected(), None);

    machine.apply(EngineReply::Hints(hints, Ok(vec![RawHint::from("2,5 -> 3,4")])));
    assert_eq!(machine.phase(), Phase::Idle);
    machine.square_clicked(pos(2, 5));
    assert_eq!(machine.phase(), Phase::PieceSelected);
}
