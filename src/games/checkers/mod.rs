//! Checkers snapshot, coordinate and hint types as the remote engine reports them.

mod hints;
mod position;
mod types;

pub use hints::{
    HintParseError, MoveHint, RawHint, StructuredHint, is_jump, parse_hints, parse_text_hint,
};
pub use position::{BOARD_SIZE, OffBoard, Position, is_same_position};
pub use types::{
    Board, BoardShapeError, Cell, Color, GameSnapshot, GameStatus, Piece, PieceKind,
    UnknownVariant,
};
