//! Reconciliation of a freshly parsed tree against the previous one
//!
//! Content hashes decide what survives an edit. Paired subtrees with equal hashes take over the
//! old identities and options wholesale. Paired containers of the same variant whose content
//! changed keep the old identity and are reconciled child by child. Everything else keeps
//! what the parser gave it.

use crate::{Identity, NodeId, NodeOptions, Tree};
use tracing::debug;

/// Counts of nodes in the patched tree by where their identity came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchStats {
    /// Identity taken from the old tree
    pub adopted: usize,
    /// Identity minted by the parser
    pub fresh: usize,
}

enum Adoption {
    /// Same content: identity and options
    Whole(NodeId, Identity, NodeOptions),
    /// Same variant, different content: identity only
    Identity(NodeId, Identity),
}

/// Carry identities and options from `old` over to `new`, see [`patch_with_stats`]
pub fn patch(old: &Tree, new: Tree) -> Tree {
    patch_with_stats(old, new).0
}

/// Reconcile `new` against `old` and re-annotate the result
///
/// Roots pair by index, single-child fields pair directly and sequence fields pair by index.
/// Children without a counterpart on the other side are left alone.
pub fn patch_with_stats(old: &Tree, mut new: Tree) -> (Tree, PatchStats) {
    if old.hash() == new.hash() {
        debug!(hash = %new.hash(), "forest unchanged, adopting every node");
    }

    let mut adoptions = Vec::new();
    let mut pairs: Vec<(NodeId, NodeId)> = old
        .roots()
        .iter()
        .copied()
        .zip(new.roots().iter().copied())
        .rev()
        .collect();

    while let Some((o, n)) = pairs.pop() {
        let (old_node, new_node) = (&old[o], &new[n]);

        if old_node.hash() == new_node.hash() {
            // Equal hashes imply equal shape, so pre-order walks line up
            adoptions.extend(old.descendants(o).zip(new.descendants(n)).map(|(o, n)| {
                Adoption::Whole(n, old[o].identity(), old[o].options().clone())
            }));
            continue;
        }

        if old_node.kind().tag() != new_node.kind().tag() || new_node.kind().is_leaf() {
            continue;
        }

        adoptions.push(Adoption::Identity(n, old_node.identity()));
        let old_fields = old_node.kind().fields();
        let new_fields = new_node.kind().fields();
        let start = pairs.len();
        for ((_, old_field), (_, new_field)) in old_fields.iter().zip(new_fields.iter()) {
            pairs.extend(
                old_field
                    .nodes()
                    .iter()
                    .copied()
                    .zip(new_field.nodes().iter().copied()),
            );
        }
        pairs[start..].reverse();
    }

    let stats = PatchStats {
        adopted: adoptions.len(),
        fresh: new.len().saturating_sub(adoptions.len()),
    };

    let arena = new.arena_mut();
    for adoption in adoptions {
        match adoption {
            Adoption::Whole(id, identity, options) => {
                let node = &mut arena[id];
                node.identity = identity;
                node.options = options;
            },
            Adoption::Identity(id, identity) => arena[id].identity = identity,
        }
    }
    new.annotate();

    debug!(adopted = stats.adopted, fresh = stats.fresh, "patched tree");
    (new, stats)
}
