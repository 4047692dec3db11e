//! Text edits and the records they leave behind

use blocks_ast::Position;
use snafu::Snafu;

/// Errors that can occur while applying a batch of edits
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum EditError {
    #[snafu(display("Invalid range: start {from} > end {to}"))]
    InvalidRange { from: Position, to: Position },

    #[snafu(display("Position {position} is outside the buffer (last line {last_line})"))]
    PositionOutOfBounds { position: Position, last_line: u32 },

    #[snafu(display("Edit at {first} overlaps edit at {second}"))]
    OverlappingEdits { first: Position, second: Position },
}

/// Replace the text between `from` and `to` with `text`
///
/// Positions are expressed against the buffer as it was before the batch containing this edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub from: Position,
    pub to: Position,
}

impl Edit {
    pub fn new(from: Position, to: Position, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from,
            to,
        }
    }

    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    pub fn delete(from: Position, to: Position) -> Self {
        Self::new(from, to, "")
    }
}

/// What one applied edit actually did
///
/// `from` and `to` bound the replaced region in the coordinates of the buffer at the moment
/// the edit was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub from: Position,
    pub to: Position,
    pub text: String,
    pub removed: String,
}

impl ChangeRecord {
    /// Whether the edit put any text into the buffer
    pub fn is_insertion(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Where the inserted text of `change` ends
pub fn change_end(change: &ChangeRecord) -> Position {
    match change.text.rsplit_once('\n') {
        None => Position::new(
            change.from.line,
            change.from.column + change.text.chars().count() as u32,
        ),
        Some((_, last)) => Position::new(
            change.from.line + change.text.matches('\n').count() as u32,
            last.chars().count() as u32,
        ),
    }
}

/// Map a position from before `change` to after it
///
/// Positions before the change are untouched, positions inside the replaced region collapse
/// to the end of the inserted text, and later positions shift by the change's size.
pub fn adjust_for_change(pos: Position, change: &ChangeRecord) -> Position {
    if pos < change.from {
        return pos;
    }
    let end = change_end(change);
    if pos <= change.to {
        return end;
    }

    let line = pos.line + end.line - change.to.line;
    let column = if pos.line == change.to.line {
        pos.column + end.column - change.to.column
    } else {
        pos.column
    };
    Position::new(line, column)
}
