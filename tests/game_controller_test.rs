//! Tests for the async game controller driving a scripted engine.

use std::sync::{Arc, Mutex};
use strictly_checkers::client::{
    CheckersEngine, GameId, MoveAccepted, SessionError, SessionErrorKind, SessionStarted,
};
use strictly_checkers::games::checkers::{
    Board, Color, GameSnapshot, GameStatus, Piece, PieceKind, Position, RawHint,
};
use strictly_checkers::interaction::{GameController, Notice, Phase};

fn pos(x: u8, y: u8) -> Position {
    Position::new(x, y).unwrap()
}

/// In-memory engine that answers from a script.
#[derive(Default)]
struct ScriptedEngine {
    state: Mutex<Script>,
}

#[derive(Default)]
struct Script {
    refuse_start: bool,
    rejection: Option<String>,
    snapshot_fetches: usize,
    moves: Vec<(Position, Position)>,
    to_move: Option<Color>,
}

impl ScriptedEngine {
    fn snapshot(color: Color) -> GameSnapshot {
        GameSnapshot {
            board: Board::empty()
                .with_piece(Piece {
                    color: Color::Black,
                    kind: PieceKind::Pawn,
                    position: pos(2, 5),
                })
                .with_piece(Piece {
                    color: Color::Red,
                    kind: PieceKind::Pawn,
                    position: pos(5, 2),
                }),
            current_color: color,
            current_player_name: color.to_string(),
            status: GameStatus::Play,
            is_double_jump_active: false,
        }
    }
}

#[async_trait::async_trait]
impl CheckersEngine for ScriptedEngine {
    async fn start_session(
        &self,
        player1: &str,
        player2: &str,
    ) -> Result<SessionStarted, SessionError> {
        if self.state.lock().unwrap().refuse_start {
            return Err(SessionErrorKind::SessionCreation("engine offline".into()).into());
        }
        Ok(SessionStarted {
            game_id: GameId::from("scripted"),
            message: format!("{} vs {}", player1, player2),
        })
    }

    async fn fetch_snapshot(&self, _game_id: &GameId) -> Result<GameSnapshot, SessionError> {
        let mut state = self.state.lock().unwrap();
        state.snapshot_fetches += 1;
        Ok(Self::snapshot(state.to_move.unwrap_or(Color::Black)))
    }

    async fn fetch_hints(&self, _game_id: &GameId) -> Result<Vec<RawHint>, SessionError> {
        let state = self.state.lock().unwrap();
        Ok(match state.to_move.unwrap_or(Color::Black) {
            Color::Black => vec![RawHint::from("2,5 -> 3,4")],
            Color::Red => vec![RawHint::from("5,2 -> 4,3")],
        })
    }

    async fn submit_move(
        &self,
        _game_id: &GameId,
        from: Position,
        to: Position,
    ) -> Result<MoveAccepted, SessionError> {
        let mut state = self.state.lock().unwrap();
        state.moves.push((from, to));
        if let Some(text) = state.rejection.clone() {
            return Err(SessionErrorKind::IllegalMove(text).into());
        }
        state.to_move = Some(Color::Red);
        Ok(MoveAccepted {
            message: "Move processed".into(),
        })
    }
}

#[tokio::test]
async fn test_start_loads_board_and_hints() {
    let engine = Arc::new(ScriptedEngine::default());
    let mut controller = GameController::start(engine.clone(), "Alice", "Bob")
        .await
        .unwrap();
    assert_eq!(controller.in_flight(), 1);

    controller.settle().await;
    assert_eq!(controller.in_flight(), 0);

    let machine = controller.machine();
    assert_eq!(machine.game_id(), &GameId::from("scripted"));
    assert_eq!(machine.phase(), Phase::Idle);
    assert_eq!(machine.hints().len(), 1);
    assert_eq!(machine.notice(), Some(&Notice::Info("Alice vs Bob".into())));
}

#[tokio::test]
async fn test_start_failure_is_reported() {
    let engine = Arc::new(ScriptedEngine::default());
    engine.state.lock().unwrap().refuse_start = true;
    let result = GameController::start(engine, "Alice", "Bob").await;
    let err = result.err().unwrap();
    assert_eq!(
        err.user_message(),
        "Failed to start game: engine offline"
    );
}

#[tokio::test]
async fn test_accepted_move_round_trip() {
    let engine = Arc::new(ScriptedEngine::default());
    let mut controller = GameController::join(engine.clone(), GameId::from("scripted"));
    controller.settle().await;

    controller.click(pos(2, 5));
    controller.click(pos(3, 4));
    assert_eq!(controller.machine().phase(), Phase::Submitting);
    assert_eq!(controller.in_flight(), 1);

    controller.settle().await;

    let machine = controller.machine();
    assert_eq!(machine.snapshot().unwrap().current_color, Color::Red);
    assert_eq!(machine.hints()[0].from, pos(5, 2));
    assert_eq!(machine.phase(), Phase::Idle);

    let state = engine.state.lock().unwrap();
    assert_eq!(state.moves, vec![(pos(2, 5), pos(3, 4))]);
    assert_eq!(state.snapshot_fetches, 2);
}

#[tokio::test]
async fn test_rejected_move_surfaces_engine_text() {
    let engine = Arc::new(ScriptedEngine::default());
    engine.state.lock().unwrap().rejection = Some("Capture is mandatory".into());
    let mut controller = GameController::join(engine.clone(), GameId::from("scripted"));
    controller.settle().await;

    controller.click(pos(2, 5));
    controller.click(pos(3, 4));
    controller.settle().await;

    let machine = controller.machine();
    assert_eq!(
        machine.notice(),
        Some(&Notice::Rejected("Capture is mandatory".into()))
    );
    assert_eq!(machine.selected(), Some(pos(2, 5)));
    assert_eq!(engine.state.lock().unwrap().snapshot_fetches, 1);
}

#[tokio::test]
async fn test_refresh_and_drain() {
    let engine = Arc::new(ScriptedEngine::default());
    let mut controller = GameController::join(engine.clone(), GameId::from("scripted"));
    controller.settle().await;

    controller.refresh();
    assert_eq!(controller.in_flight(), 1);
    let reply = controller.next_reply().await.unwrap();
    controller.apply(reply);
    // The snapshot reply queues a hints fetch.
    assert_eq!(controller.in_flight(), 1);
    controller.settle().await;
    assert_eq!(controller.drain_replies(), 0);
    assert!(controller.next_reply().await.is_none());
}
