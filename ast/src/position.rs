//! Position tracking types for AST nodes

use std::fmt;

/// A line/column coordinate in the source text
///
/// Both fields are zero-based. Columns count characters within the line, not bytes.
/// The derived ordering compares `line` first, then `column`, which is the document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// The start of the document
    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The interval of source text a node occupies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub from: Position,
    pub to: Position,
}

impl Span {
    /// Create a span, swapping the endpoints if they are given out of order
    pub fn new(from: Position, to: Position) -> Self {
        if to < from {
            Self { from: to, to: from }
        } else {
            Self { from, to }
        }
    }

    /// An empty span at `pos`
    pub const fn empty(pos: Position) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Whether a cursor at `pos` is within this span
    ///
    /// A cursor touching either boundary of a non-empty span counts as inside, so `x|y` is
    /// within both `x` and `y`. An empty span contains nothing.
    pub fn contains(&self, pos: Position) -> bool {
        (self.from <= pos && pos < self.to) || (self.from < pos && pos <= self.to)
    }

    /// Whether this span lies entirely within `[from, to]`, inclusive
    pub fn within(&self, from: Position, to: Position) -> bool {
        from <= self.from && self.to <= to
    }

    /// Whether this span shares any position with `[from, to]`, or straddles it entirely
    pub fn touches(&self, from: Position, to: Position) -> bool {
        self.contains(from) || self.contains(to) || (from < self.from && self.to < to)
    }

    /// Combine two spans to create a span that covers both
    pub fn union(&self, other: &Span) -> Self {
        Self {
            from: self.from.min(other.from),
            to: self.to.max(other.to),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: u32, column: u32) -> Position {
        Position::new(line, column)
    }

    #[test]
    fn position_order_is_line_then_column() {
        assert!(pos(0, 9) < pos(1, 0));
        assert!(pos(2, 3) < pos(2, 4));
        assert_eq!(pos(4, 4).cmp(&pos(4, 4)), std::cmp::Ordering::Equal);

        let mut positions = vec![pos(3, 1), pos(0, 5), pos(3, 0), pos(1, 9)];
        positions.sort();
        assert_eq!(positions, vec![pos(0, 5), pos(1, 9), pos(3, 0), pos(3, 1)]);
    }

    #[test]
    fn span_contains_boundaries() {
        let span = Span::new(pos(0, 3), pos(0, 7));
        assert!(span.contains(pos(0, 3)));
        assert!(span.contains(pos(0, 5)));
        assert!(span.contains(pos(0, 7)));
        assert!(!span.contains(pos(0, 2)));
        assert!(!span.contains(pos(0, 8)));
        assert!(!span.contains(pos(1, 0)));

        let empty = Span::empty(pos(0, 3));
        assert!(empty.is_empty());
        assert!(!empty.contains(pos(0, 3)));
    }

    #[test]
    fn span_new_orders_endpoints() {
        let span = Span::new(pos(2, 0), pos(1, 4));
        assert_eq!(span.from, pos(1, 4));
        assert_eq!(span.to, pos(2, 0));
    }

    #[test]
    fn span_within_and_touches() {
        let span = Span::new(pos(1, 2), pos(1, 6));
        assert!(span.within(pos(1, 2), pos(1, 6)));
        assert!(span.within(pos(0, 0), pos(5, 0)));
        assert!(!span.within(pos(1, 3), pos(5, 0)));

        assert!(span.touches(pos(1, 4), pos(3, 0)));
        assert!(span.touches(pos(0, 0), pos(1, 2)));
        assert!(span.touches(pos(0, 0), pos(9, 0)));
        assert!(!span.touches(pos(2, 0), pos(3, 0)));

        let other = Span::new(pos(0, 1), pos(1, 3));
        assert_eq!(span.union(&other), Span::new(pos(0, 1), pos(1, 6)));
    }
}
