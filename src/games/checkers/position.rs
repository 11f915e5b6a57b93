//! Board coordinates for checkers.
//!
//! `x` is the column and `y` is the row, with `(0, 0)` at the top-left
//! square. Both components are always in `0..8`.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: u8 = 8;

/// A square on the 8x8 board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display("({x},{y})")]
#[serde(try_from = "RawPosition")]
pub struct Position {
    x: u8,
    y: u8,
}

/// Untrusted coordinate pair as it appears on the wire.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawPosition {
    x: i64,
    y: i64,
}

/// A coordinate pair that falls outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("position ({x}, {y}) is off the 8x8 board")]
pub struct OffBoard {
    /// Column that was supplied.
    pub x: i64,
    /// Row that was supplied.
    pub y: i64,
}

impl TryFrom<RawPosition> for Position {
    type Error = OffBoard;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Self::try_new(raw.x, raw.y)
    }
}

impl Position {
    /// Creates a position, or `None` if either component is off the board.
    pub fn new(x: u8, y: u8) -> Option<Self> {
        (x < BOARD_SIZE && y < BOARD_SIZE).then_some(Self { x, y })
    }

    /// Creates a position from signed components, as parsed from engine text.
    pub fn try_new(x: i64, y: i64) -> Result<Self, OffBoard> {
        let in_range = |v: i64| (0..i64::from(BOARD_SIZE)).contains(&v);
        if in_range(x) && in_range(y) {
            Ok(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            Err(OffBoard { x, y })
        }
    }

    /// Position for grid indices already known to be in range.
    pub(crate) fn at(x: usize, y: usize) -> Self {
        debug_assert!(x < BOARD_SIZE as usize && y < BOARD_SIZE as usize);
        Self {
            x: x as u8,
            y: y as u8,
        }
    }

    /// Column, `0` is leftmost.
    pub fn x(self) -> u8 {
        self.x
    }

    /// Row, `0` is topmost.
    pub fn y(self) -> u8 {
        self.y
    }

    /// Dark squares are the playable ones.
    pub fn is_dark(self) -> bool {
        (self.x + self.y) % 2 == 1
    }

    /// Moves by a signed offset, staying on the board.
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Self::try_new(
            i64::from(self.x) + i64::from(dx),
            i64::from(self.y) + i64::from(dy),
        )
        .ok()
    }

    /// All 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Position { x, y }))
    }
}

/// Structural equality on `(x, y)`.
#[instrument]
pub fn is_same_position(a: Position, b: Position) -> bool {
    a.x == b.x && a.y == b.y
}
