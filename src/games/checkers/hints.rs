//! Legal-move hints reported by the engine.
//!
//! The engine reports hints either as text, `"x1,y1 -> x2,y2"` with an
//! optional `(Capture)` or `[Capture]` annotation, or as structured
//! `{fromX, fromY, toX, toY}` objects. Both shapes become [`MoveHint`]s here.
//! A hint that cannot be read is dropped on its own; the rest survive.

use super::position::{OffBoard, Position};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// A hint exactly as the engine sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, From)]
#[serde(untagged)]
pub enum RawHint {
    /// `"x1,y1 -> x2,y2"`, possibly annotated.
    Text(String),
    /// Pre-split coordinates.
    Structured(StructuredHint),
    /// Any other entry. Kept so one bad entry does not fail the whole list.
    #[from(ignore)]
    Other(serde_json::Value),
}

impl From<&str> for RawHint {
    fn from(text: &str) -> Self {
        RawHint::Text(text.to_string())
    }
}

/// Structured hint payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredHint {
    /// Source column.
    pub from_x: i64,
    /// Source row.
    pub from_y: i64,
    /// Target column.
    pub to_x: i64,
    /// Target row.
    pub to_y: i64,
    /// Capture flag, when the engine states it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_capture: Option<bool>,
}

/// A legal move for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveHint {
    /// Square the piece stands on.
    pub from: Position,
    /// Square the piece may move to.
    pub to: Position,
    /// Whether the move jumps an opposing piece.
    pub is_capture: bool,
}

/// Why a single hint was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum HintParseError {
    /// Text did not have the `x,y -> x,y` shape.
    #[display("unrecognized hint text: {_0:?}")]
    #[from(ignore)]
    Malformed(#[error(not(source))] String),
    /// A coordinate was off the board.
    #[display("hint coordinate out of range: {_0}")]
    OffBoard(OffBoard),
}

impl MoveHint {
    /// Builds a hint, inferring the capture flag when the engine did not state it.
    pub fn new(from: Position, to: Position, is_capture: Option<bool>) -> Self {
        Self {
            from,
            to,
            is_capture: is_capture.unwrap_or_else(|| is_jump(from, to)),
        }
    }
}

/// Capture inference for hints that carry no explicit flag.
///
/// Ordinary steps move one file; captures jump two. This holds for standard
/// checkers only, not for variants with long-range ("flying") kings.
pub fn is_jump(from: Position, to: Position) -> bool {
    from.x().abs_diff(to.x()) > 1
}

impl TryFrom<&RawHint> for MoveHint {
    type Error = HintParseError;

    fn try_from(raw: &RawHint) -> Result<Self, Self::Error> {
        match raw {
            RawHint::Text(text) => parse_text_hint(text),
            RawHint::Structured(hint) => parse_structured_hint(hint),
            RawHint::Other(value) => Err(HintParseError::Malformed(value.to_string())),
        }
    }
}

/// Parses every hint, silently dropping the ones that cannot be read.
#[instrument(skip_all, fields(count = raw.len()))]
pub fn parse_hints(raw: &[RawHint]) -> Vec<MoveHint> {
    let hints: Vec<MoveHint> = raw
        .iter()
        .filter_map(|hint| match MoveHint::try_from(hint) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, ?hint, "Dropping unreadable hint");
                None
            }
        })
        .collect();
    debug!(parsed = hints.len(), "Parsed hints");
    hints
}

/// Parses `"x1,y1 -> x2,y2"` with optional bracketed annotations.
pub fn parse_text_hint(text: &str) -> Result<MoveHint, HintParseError> {
    let malformed = || HintParseError::Malformed(text.to_string());

    let annotations = annotations(text);
    let stripped = strip_annotations(text);
    let (from, to) = stripped.split_once("->").ok_or_else(malformed)?;
    let (fx, fy) = parse_pair(from).ok_or_else(malformed)?;
    let (tx, ty) = parse_pair(to).ok_or_else(malformed)?;

    let explicit_capture = annotations
        .iter()
        .any(|a| a.trim().eq_ignore_ascii_case("capture"))
        .then_some(true);

    Ok(MoveHint::new(
        Position::try_new(fx, fy)?,
        Position::try_new(tx, ty)?,
        explicit_capture,
    ))
}

fn parse_structured_hint(hint: &StructuredHint) -> Result<MoveHint, HintParseError> {
    Ok(MoveHint::new(
        Position::try_new(hint.from_x, hint.from_y)?,
        Position::try_new(hint.to_x, hint.to_y)?,
        hint.is_capture,
    ))
}

/// `"3, 4"` -> `(3, 4)`.
fn parse_pair(s: &str) -> Option<(i64, i64)> {
    let (x, y) = s.trim().split_once(',')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Text inside `(...)` and `[...]` groups.
fn annotations(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(['(', '[']) {
        let close = if rest[start..].starts_with('(') { ')' } else { ']' };
        match rest[start + 1..].find(close) {
            Some(len) => {
                found.push(&rest[start + 1..start + 1 + len]);
                rest = &rest[start + 1 + len + 1..];
            }
            None => break,
        }
    }
    found
}

/// `text` with every `(...)` and `[...]` group removed.
fn strip_annotations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut closing: Option<char> = None;
    for c in text.chars() {
        match (closing, c) {
            (None, '(') => closing = Some(')'),
            (None, '[') => closing = Some(']'),
            (None, _) => out.push(c),
            (Some(end), _) if c == end => closing = None,
            (Some(_), _) => {}
        }
    }
    out
}
