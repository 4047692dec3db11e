//! The parser seam
//!
//! The edit pipeline only ever sees a parser through [`Parser`]. A parse either produces a
//! whole [`Tree`] or a [`ParseError`]; there is no partial result.

use crate::{Position, Tree};
use snafu::Snafu;

/// Failure to turn source text into a tree
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
#[snafu(display("{}", render(message, position)))]
pub struct ParseError {
    pub message: String,
    pub position: Option<Position>,
}

fn render(message: &str, position: &Option<Position>) -> String {
    match position {
        Some(pos) => format!("Parse error at {pos}: {message}"),
        None => format!("Parse error: {message}"),
    }
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
        }
    }

    pub fn at(position: Position, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

/// Turns a whole document into a [`Tree`]
///
/// Implementations must report bad input as a [`ParseError`] rather than panicking, since a
/// failed parse is what aborts an edit transaction.
pub trait Parser {
    fn parse(&self, text: &str) -> Result<Tree, ParseError>;
}

impl<P: Parser + ?Sized> Parser for &P {
    fn parse(&self, text: &str) -> Result<Tree, ParseError> {
        (**self).parse(text)
    }
}
