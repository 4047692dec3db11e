//! Tokenizer for the Scheme surface syntax
//!
//! Positions are tracked as line/column pairs counting characters, matching
//! [`blocks_ast::Position`].

use blocks_ast::{ParseError, Position, Span};
use std::{iter::Peekable, str::Chars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `(` or `[`
    Open(char),
    /// `)` or `]`
    Close(char),
    /// String literal including its quotes
    Str(String),
    Atom(String),
    /// Line comment including the leading semicolons
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    pos: Position,
}

impl Cursor<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.pos = Position::new(self.pos.line + 1, 0);
        } else {
            self.pos.column += 1;
        }
        Some(ch)
    }

    /// Consume characters while `pred` holds
    fn eat_while(&mut self, text: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            text.push(ch);
            self.bump();
        }
    }
}

fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '"' | ';')
}

/// Split `source` into tokens
pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut cursor = Cursor {
        chars: source.chars().peekable(),
        pos: Position::zero(),
    };
    let mut tokens = Vec::new();

    while let Some(ch) = cursor.peek() {
        let start = cursor.pos;
        let kind = match ch {
            _ if ch.is_whitespace() => {
                cursor.bump();
                continue;
            },
            '(' | '[' => {
                cursor.bump();
                TokenKind::Open(ch)
            },
            ')' | ']' => {
                cursor.bump();
                TokenKind::Close(ch)
            },
            ';' => {
                let mut text = String::new();
                cursor.eat_while(&mut text, |c| c != '\n');
                TokenKind::Comment(text.trim_end().to_string())
            },
            '"' => TokenKind::Str(string(&mut cursor, start)?),
            _ => {
                let mut text = String::new();
                cursor.eat_while(&mut text, |c| !is_delimiter(c));
                TokenKind::Atom(text)
            },
        };
        tokens.push(Token {
            kind,
            span: Span::new(start, cursor.pos),
        });
    }

    Ok(tokens)
}

/// Read a string literal, keeping escapes as written
fn string(cursor: &mut Cursor<'_>, start: Position) -> Result<String, ParseError> {
    let mut text = String::new();
    if let Some(quote) = cursor.bump() {
        text.push(quote);
    }
    loop {
        match cursor.bump() {
            None => return Err(ParseError::at(start, "unterminated string")),
            Some('"') => {
                text.push('"');
                return Ok(text);
            },
            Some('\\') => {
                text.push('\\');
                match cursor.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(ParseError::at(start, "unterminated string")),
                }
            },
            Some(ch) => text.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .expect("tokenizes")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn application_tokens() {
        assert_eq!(
            kinds("(+ 1 2)"),
            vec![
                TokenKind::Open('('),
                TokenKind::Atom("+".into()),
                TokenKind::Atom("1".into()),
                TokenKind::Atom("2".into()),
                TokenKind::Close(')'),
            ]
        );
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = tokenize("(f\n  \"hi\") ; done").expect("tokenizes");
        let spans: Vec<String> = tokens.iter().map(|t| t.span.to_string()).collect();
        assert_eq!(spans, vec!["0:0-0:1", "0:1-0:2", "1:2-1:6", "1:6-1:7", "1:8-1:14"]);
        assert_eq!(tokens[4].kind, TokenKind::Comment("; done".into()));
    }

    #[test]
    fn strings_keep_escapes() {
        assert_eq!(
            kinds(r#""a \"b\"""#),
            vec![TokenKind::Str(r#""a \"b\"""#.into())]
        );
    }

    #[test]
    fn unterminated_string_reports_start() {
        let err = tokenize("(display \"oops)").expect_err("unterminated");
        assert_eq!(err.position, Some(Position::new(0, 9)));
        assert_eq!(err.message, "unterminated string");
    }

    #[test]
    fn brackets_and_blanks() {
        assert_eq!(
            kinds("[x ...]"),
            vec![
                TokenKind::Open('['),
                TokenKind::Atom("x".into()),
                TokenKind::Atom("...".into()),
                TokenKind::Close(']'),
            ]
        );
    }
}
