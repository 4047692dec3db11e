//! Reads tokens into bracketed data, keeping comments in place

use crate::lexer::{Token, TokenKind};
use blocks_ast::{ParseError, Span};

/// A datum or a comment at one nesting level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Datum(Datum),
    Comment { text: String, span: Span },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datum {
    Atom { text: String, span: Span },
    Str { text: String, span: Span },
    List { items: Vec<Item>, span: Span },
}

impl Datum {
    pub fn span(&self) -> Span {
        match self {
            Datum::Atom { span, .. } | Datum::Str { span, .. } | Datum::List { span, .. } => *span,
        }
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Datum::Atom { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Deepest bracket nesting accepted
///
/// Lowering and rendering recurse once per level, so unbounded nesting would exhaust the stack.
pub const MAX_NESTING: usize = 512;

fn closer(open: char) -> char {
    if open == '[' { ']' } else { ')' }
}

/// Group tokens into top-level items
pub fn read(tokens: Vec<Token>) -> Result<Vec<Item>, ParseError> {
    // Each frame is an open bracket with the items read inside it so far
    let mut stack: Vec<(char, Span, Vec<Item>)> = Vec::new();
    let mut top = Vec::new();

    for token in tokens {
        let item = match token.kind {
            TokenKind::Open(open) => {
                if stack.len() == MAX_NESTING {
                    return Err(ParseError::at(token.span.from, "nesting too deep"));
                }
                stack.push((open, token.span, Vec::new()));
                continue;
            },
            TokenKind::Close(close) => {
                let Some((open, start, items)) = stack.pop() else {
                    return Err(ParseError::at(
                        token.span.from,
                        format!("unexpected closing '{close}'"),
                    ));
                };
                if closer(open) != close {
                    return Err(ParseError::at(
                        token.span.from,
                        format!("expected '{}' to close '{open}' at {}", closer(open), start.from),
                    ));
                }
                Item::Datum(Datum::List {
                    items,
                    span: start.union(&token.span),
                })
            },
            TokenKind::Atom(text) => Item::Datum(Datum::Atom {
                text,
                span: token.span,
            }),
            TokenKind::Str(text) => Item::Datum(Datum::Str {
                text,
                span: token.span,
            }),
            TokenKind::Comment(text) => Item::Comment {
                text,
                span: token.span,
            },
        };

        match stack.last_mut() {
            Some((_, _, items)) => items.push(item),
            None => top.push(item),
        }
    }

    if let Some((open, start, _)) = stack.pop() {
        return Err(ParseError::at(
            start.from,
            format!("unbalanced '{open}': missing '{}'", closer(open)),
        ));
    }

    Ok(top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use blocks_ast::Position;

    fn read_str(source: &str) -> Result<Vec<Item>, ParseError> {
        read(tokenize(source)?)
    }

    #[test]
    fn nested_lists() {
        let items = read_str("(a (b c)) d").expect("reads");
        assert_eq!(items.len(), 2);
        let Item::Datum(Datum::List { items: inner, span }) = &items[0] else {
            panic!("expected a list, got {:?}", items[0]);
        };
        assert_eq!(span.to_string(), "0:0-0:9");
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn missing_close_points_at_open() {
        let err = read_str("(define x\n  (+ 1 2)").expect_err("unbalanced");
        assert_eq!(err.position, Some(Position::new(0, 0)));
    }

    #[test]
    fn stray_close() {
        let err = read_str("(f x))").expect_err("unbalanced");
        assert_eq!(err.position, Some(Position::new(0, 5)));
    }

    #[test]
    fn mismatched_brackets() {
        let err = read_str("(cond [x 1)]").expect_err("mismatched");
        assert_eq!(err.position, Some(Position::new(0, 10)));
    }

    #[test]
    fn nesting_limit() {
        let nested = |depth: usize| format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
        assert!(read_str(&nested(MAX_NESTING)).is_ok());

        let err = read_str(&nested(MAX_NESTING + 1)).expect_err("too deep");
        assert_eq!(err.message, "nesting too deep");
        assert_eq!(err.position, Some(Position::new(0, MAX_NESTING as u32)));
    }

    #[test]
    fn comments_stay_in_their_list() {
        let items = read_str("(f ; inner\n x)\n; outer").expect("reads");
        assert!(matches!(items[1], Item::Comment { .. }));
        let Item::Datum(Datum::List { items: inner, .. }) = &items[0] else {
            panic!("expected a list");
        };
        assert!(matches!(inner[1], Item::Comment { .. }));
    }
}
