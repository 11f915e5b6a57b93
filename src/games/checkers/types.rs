//! Snapshot types for a checkers game held by the remote engine.
//!
//! The engine serializes the board as `board[row][col]`, where `row` is the
//! `y` coordinate and `col` is the `x` coordinate. That orientation is fixed
//! here, at deserialization, and every lookup goes through
//! [`Board::cell`] so no caller re-derives it.

use super::position::{BOARD_SIZE, Position};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side a piece belongs to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(try_from = "WireEnum")]
pub enum Color {
    /// Moves first.
    Black,
    /// Moves second.
    Red,
}

impl Color {
    /// Returns the other side.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::Red,
            Color::Red => Color::Black,
        }
    }
}

/// Whether a piece has been promoted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(try_from = "WireEnum")]
pub enum PieceKind {
    /// Moves forward only.
    Pawn,
    /// Moves in both directions.
    King,
}

/// Enum value as the engine sends it: either its ordinal or its name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum WireEnum {
    Ordinal(u8),
    Name(String),
}

/// An enum value the engine sent that this client does not know.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    /// Which enum was being decoded.
    pub kind: &'static str,
    /// The offending value.
    pub value: String,
}

impl TryFrom<WireEnum> for Color {
    type Error = UnknownVariant;

    fn try_from(raw: WireEnum) -> Result<Self, Self::Error> {
        match raw {
            WireEnum::Ordinal(0) => Ok(Color::Black),
            WireEnum::Ordinal(1) => Ok(Color::Red),
            WireEnum::Name(ref name) if name.eq_ignore_ascii_case("black") => Ok(Color::Black),
            WireEnum::Name(ref name) if name.eq_ignore_ascii_case("red") => Ok(Color::Red),
            other => Err(UnknownVariant {
                kind: "color",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<WireEnum> for PieceKind {
    type Error = UnknownVariant;

    fn try_from(raw: WireEnum) -> Result<Self, Self::Error> {
        match raw {
            WireEnum::Ordinal(0) => Ok(PieceKind::Pawn),
            WireEnum::Ordinal(1) => Ok(PieceKind::King),
            WireEnum::Name(ref name) if name.eq_ignore_ascii_case("pawn") => Ok(PieceKind::Pawn),
            WireEnum::Name(ref name) if name.eq_ignore_ascii_case("king") => Ok(PieceKind::King),
            other => Err(UnknownVariant {
                kind: "piece kind",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for WireEnum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireEnum::Ordinal(n) => write!(f, "{}", n),
            WireEnum::Name(s) => write!(f, "{:?}", s),
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Owning side.
    pub color: Color,
    /// Pawn or king.
    #[serde(rename = "typePiece", alias = "kind")]
    pub kind: PieceKind,
    /// Where the engine says the piece stands.
    pub position: Position,
}

/// One square of the board and its occupant, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Square this cell describes.
    pub position: Position,
    /// Occupant, `None` when empty.
    pub piece: Option<Piece>,
}

/// The 8x8 grid, stored row-major as `cells[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

/// A board payload that does not match the row-major 8x8 contract.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("malformed board: {message}")]
pub struct BoardShapeError {
    /// What was wrong with the grid.
    pub message: String,
}

impl TryFrom<Vec<Vec<Cell>>> for Board {
    type Error = BoardShapeError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self, Self::Error> {
        let size = BOARD_SIZE as usize;
        if rows.len() != size {
            return Err(BoardShapeError {
                message: format!("expected {} rows, got {}", size, rows.len()),
            });
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(BoardShapeError {
                    message: format!("row {} has {} cells, expected {}", y, row.len(), size),
                });
            }
            for (x, cell) in row.iter().enumerate() {
                let (cx, cy) = (usize::from(cell.position.x()), usize::from(cell.position.y()));
                if (cx, cy) != (x, y) {
                    return Err(BoardShapeError {
                        message: format!(
                            "cell at board[{}][{}] claims position {}; rows must be indexed by y",
                            y, x, cell.position
                        ),
                    });
                }
            }
        }
        Ok(Self {
            cells: std::array::from_fn(|y| std::array::from_fn(|x| rows[y][x])),
        })
    }
}

impl From<Board> for Vec<Vec<Cell>> {
    fn from(board: Board) -> Self {
        board.cells.iter().map(|row| row.to_vec()).collect()
    }
}

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Self {
            cells: std::array::from_fn(|y| {
                std::array::from_fn(|x| Cell {
                    position: Position::at(x, y),
                    piece: None,
                })
            }),
        }
    }

    /// Returns a copy of this board with `piece` placed at its own position.
    pub fn with_piece(mut self, piece: Piece) -> Self {
        let (x, y) = (piece.position.x() as usize, piece.position.y() as usize);
        self.cells[y][x].piece = Some(piece);
        self
    }

    /// The cell at `position`.
    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[position.y() as usize][position.x() as usize]
    }

    /// The piece at `position`, if any.
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.cell(position).piece.as_ref()
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_SIZE as usize]> {
        self.cells.iter()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

/// Whether the game is still being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum GameStatus {
    /// Moves are still being made.
    Play,
    /// One side has won.
    Win,
    /// Neither side can win.
    Draw,
}

/// Full board-and-turn state, replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// The grid, row-major.
    pub board: Board,
    /// Side to move.
    pub current_color: Color,
    /// Display name of the player to move.
    #[serde(rename = "currentPlayer", alias = "currentPlayerName")]
    pub current_player_name: String,
    /// Play, Win or Draw.
    pub status: GameStatus,
    /// The side to move must continue capturing with the same piece.
    #[serde(default)]
    pub is_double_jump_active: bool,
}

impl GameSnapshot {
    /// Returns true while moves can still be made.
    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Play
    }

    /// True if `position` holds a piece of the side to move.
    #[instrument(skip(self), fields(current_color = %self.current_color))]
    pub fn is_own_piece(&self, position: Position) -> bool {
        self.board
            .piece_at(position)
            .is_some_and(|p| p.color == self.current_color)
    }

    /// The winning side once the game is over.
    ///
    /// The engine leaves `currentColor` on the side that could not move, so the
    /// winner is its opponent.
    pub fn winner(&self) -> Option<Color> {
        (self.status == GameStatus::Win).then(|| self.current_color.opponent())
    }
}
