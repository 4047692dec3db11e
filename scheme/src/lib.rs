//! A small Scheme front end producing [`blocks_ast`] trees
//!
//! Covers definitions, `define-struct`, `lambda`, `if`, `cond`, the `let` family,
//! `when`/`unless`, `begin` and applications. `...` reads as a blank placeholder.

pub mod lexer;
pub mod parser;
pub mod reader;

pub use parser::SchemeParser;

use blocks_ast::{ParseError, Parser, Tree};

/// Parse `text` with the default [`SchemeParser`]
pub fn parse(text: &str) -> Result<Tree, ParseError> {
    SchemeParser::new().parse(text)
}
