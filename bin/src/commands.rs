pub mod edit;
pub mod inspect;

use crate::cli::Command;
use anyhow::{Context, Result};
use blocks_ast::{NodeId, Parser, Tree};
use blocks_scheme::SchemeParser;
use std::path::Path;

/// Run a subcommand, returning what it prints
pub fn run(command: Command, description_depth: u32) -> Result<String> {
    let parser = SchemeParser::new().with_description_depth(description_depth);
    match command {
        Command::Outline { file } => Ok(inspect::outline(&parse_file(&parser, &file)?)),
        Command::Describe { file, path } => inspect::describe(&parse_file(&parser, &file)?, &path),
        Command::At { file, position } => inspect::at(&parse_file(&parser, &file)?, position),
        Command::Edit {
            file,
            from,
            to,
            text,
            write,
        } => {
            let source = read(&file)?;
            let edited = edit::apply(parser, &source, blocks_text::Edit::new(from, to, text))?;
            if write {
                std::fs::write(&file, &edited.text)
                    .with_context(|| format!("Failed to write {}", file.display()))?;
                Ok(format!("wrote {}\n{}", file.display(), edited.focus_line()))
            } else {
                Ok(edited.text)
            }
        },
    }
}

fn read(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn parse_file(parser: &SchemeParser, file: &Path) -> Result<Tree> {
    let source = read(file)?;
    parser
        .parse(&source)
        .with_context(|| format!("Failed to parse {}", file.display()))
}

/// `path  label  [span]`
fn summary(tree: &Tree, id: NodeId) -> String {
    let node = &tree[id];
    format!("{}  {}  [{}]", node.path(), tree.label(id), node.span())
}
