//! One-shot edits through a session, so a broken parse never reaches the file

use super::summary;
use anyhow::{Context, Result};
use blocks_edit::Session;
use blocks_scheme::SchemeParser;
use blocks_text::{Buffer, Edit};
use tracing::info;

/// Text after a committed edit and where focus landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edited {
    pub text: String,
    /// Summary line of the focused node
    pub focus: Option<String>,
}

impl Edited {
    pub fn focus_line(&self) -> String {
        match &self.focus {
            Some(focus) => format!("focus: {focus}"),
            None => "focus: none".to_string(),
        }
    }
}

/// Apply `edit` to `source`, failing if `source` or the result does not parse
pub fn apply(parser: SchemeParser, source: &str, edit: Edit) -> Result<Edited> {
    let mut session =
        Session::open(parser, Buffer::new(source)).context("Failed to parse the original text")?;

    let (from, to) = (edit.from, edit.to);
    let committed = session
        .commit(vec![edit])
        .with_context(|| format!("Edit at {from}-{to} rejected"))?;

    let focus = session
        .focused_node()
        .map(|id| summary(session.tree(), id));
    info!(
        adopted = committed.stats.adopted,
        fresh = committed.stats.fresh,
        focus = focus.as_deref().unwrap_or("none"),
        "edit committed"
    );

    Ok(Edited {
        text: session.text().to_string(),
        focus,
    })
}
