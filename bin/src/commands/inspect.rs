//! Read-only views of a parsed file

use super::summary;
use anyhow::{Result, bail};
use blocks_ast::{Path, Position, Tree};

/// Every node in document order, indented by depth
pub fn outline(tree: &Tree) -> String {
    tree.nodes()
        .map(|id| {
            let indent = "  ".repeat(tree[id].level().saturating_sub(1) as usize);
            format!("{indent}{}\n", summary(tree, id))
        })
        .collect()
}

/// Description of the node at `path`
///
/// A path that does not resolve snaps to the closest node that does.
pub fn describe(tree: &Tree, path: &Path) -> Result<String> {
    let id = match tree.by_path(path) {
        Some(id) => id,
        None => match tree.closest_node_from_path(path.segments()) {
            Some(id) => {
                tracing::debug!(%path, closest = %tree[id].path(), "snapped to closest path");
                id
            },
            None => bail!("No node at path {path}"),
        },
    };
    Ok(format!(
        "{}\n{}\n",
        summary(tree, id),
        tree.describe(id, tree[id].level())
    ))
}

/// Innermost node touching `position`, with its source
pub fn at(tree: &Tree, position: Position) -> Result<String> {
    let Some(id) = tree.node_containing(position) else {
        bail!("No node at {position}");
    };
    Ok(format!("{}\n{}\n", summary(tree, id), tree.source(id)))
}
