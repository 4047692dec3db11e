use blocks_ast::{Path as TreePath, Position};
use clap::Parser;
use std::path::PathBuf;

/// Inspect and edit Scheme source through its structural tree
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file, instead of `./blocks.toml`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file path, overriding the config
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Description depth, overriding the config
    #[arg(long, global = true)]
    pub depth: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Print every node with its path, span and label
    Outline { file: PathBuf },

    /// Describe the node at a path such as `0,1`
    Describe {
        file: PathBuf,
        #[arg(value_parser = parse_path)]
        path: TreePath,
    },

    /// Show the innermost node touching a `line:column` cursor
    At {
        file: PathBuf,
        #[arg(value_parser = parse_position)]
        position: Position,
    },

    /// Replace `[from, to]` with text, refusing edits that break the parse
    Edit {
        file: PathBuf,
        #[arg(long, value_parser = parse_position)]
        from: Position,
        #[arg(long, value_parser = parse_position)]
        to: Position,
        #[arg(long, default_value = "")]
        text: String,
        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },
}

/// Parse a zero-based `line:column` pair
pub fn parse_position(s: &str) -> Result<Position, String> {
    let (line, column) = s
        .split_once(':')
        .ok_or_else(|| format!("expected line:column, got {s:?}"))?;
    let line = line.trim().parse().map_err(|e| format!("bad line in {s:?}: {e}"))?;
    let column = column
        .trim()
        .parse()
        .map_err(|e| format!("bad column in {s:?}: {e}"))?;
    Ok(Position::new(line, column))
}

fn parse_path(s: &str) -> Result<TreePath, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions() {
        assert_eq!(parse_position("2:7"), Ok(Position::new(2, 7)));
        assert_eq!(parse_position(" 0 : 3 "), Ok(Position::new(0, 3)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a:1").is_err());
    }

    #[test]
    fn edit_command_line() {
        let cli = Cli::try_parse_from([
            "blocks", "edit", "prog.scm", "--from", "0:3", "--to", "0:4", "--text", "10",
            "--write",
        ])
        .expect("parses");
        let Command::Edit {
            from, to, text, write, ..
        } = cli.command
        else {
            panic!("expected edit, got {:?}", cli.command);
        };
        assert_eq!((from, to), (Position::new(0, 3), Position::new(0, 4)));
        assert_eq!(text, "10");
        assert!(write);
    }

    #[test]
    fn describe_takes_a_path() {
        let cli = Cli::try_parse_from(["blocks", "--depth", "2", "describe", "prog.scm", "0,1"])
            .expect("parses");
        assert_eq!(cli.depth, Some(2));
        let Command::Describe { path, .. } = cli.command else {
            panic!("expected describe");
        };
        assert_eq!(path.segments(), &[0, 1]);
    }
}
