//! Structural content hashing
//!
//! A node's hash combines its variant tag, the hashes of its children in declared field
//! order and its scalar payload. Spans, identities, options and attached comments are left
//! out, so two subtrees with the same shape and payload hash equal wherever they sit in the
//! document. [`FxHasher`] is unseeded, which keeps hashes stable across runs.

use crate::{
    arena::Arena,
    kind::{Field, NodeKind},
};
use rustc_hash::FxHasher;
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// Digest of a subtree's structure and scalar payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(pub u64);

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Hash a node whose children are already allocated in `arena`
pub(crate) fn node_hash(kind: &NodeKind, arena: &Arena) -> ContentHash {
    let mut hasher = FxHasher::default();
    kind.tag().hash(&mut hasher);

    for (_, field) in kind.fields() {
        match field {
            Field::One(child) => child.map(|id| arena[*id].hash()).hash(&mut hasher),
            Field::Many(children) => {
                children.len().hash(&mut hasher);
                for id in children {
                    arena[*id].hash().hash(&mut hasher);
                }
            },
        }
    }

    for scalar in kind.scalars() {
        scalar.hash(&mut hasher);
    }

    ContentHash(hasher.finish())
}

/// Hash of an ordered list of root hashes
pub(crate) fn forest_hash(roots: impl IntoIterator<Item = ContentHash>) -> ContentHash {
    let mut hasher = FxHasher::default();
    "forest".hash(&mut hasher);
    let mut count = 0usize;
    for hash in roots {
        hash.hash(&mut hasher);
        count += 1;
    }
    count.hash(&mut hasher);
    ContentHash(hasher.finish())
}
