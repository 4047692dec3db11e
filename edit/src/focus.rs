//! Default focus placement after an edit batch

use blocks_ast::{NodeId, Position, Tree};
use blocks_text::{ChangeRecord, adjust_for_change, change_end};

/// A change record's region in the coordinates of the fully edited text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub from: Position,
    pub to: Position,
    pub inserted: bool,
}

/// Map each record to where its text ended up once the whole batch was applied
///
/// `changes` must be in application order. A record only moves because of records applied
/// after it.
pub fn settled_regions(changes: &[ChangeRecord]) -> Vec<Region> {
    changes
        .iter()
        .enumerate()
        .map(|(i, change)| {
            let (from, to) = changes[i + 1..].iter().fold(
                (change.from, change_end(change)),
                |(from, to), later| (adjust_for_change(from, later), adjust_for_change(to, later)),
            );
            Region {
                from,
                to,
                inserted: change.is_insertion(),
            }
        })
        .collect()
}

/// Best-effort focus for a tree produced by `changes`
///
/// The most recently applied insertion wins: the node spanning exactly its text, or else the
/// node just before its end. A batch that only deleted focuses the node just before the
/// earliest deletion. With nothing before that point the first root is used, and an empty
/// tree has no focus.
pub fn default_focus(changes: &[ChangeRecord], tree: &Tree) -> Option<NodeId> {
    let regions = settled_regions(changes);

    if let Some(insertion) = regions.iter().rev().find(|r| r.inserted) {
        return tree
            .node_at(insertion.from, insertion.to)
            .or_else(|| tree.node_before_position(insertion.to));
    }

    regions
        .iter()
        .map(|r| r.from)
        .min()
        .and_then(|start| tree.node_before_position(start))
        .or_else(|| tree.first_root())
}
