//! Child and subtree iterators
//!
//! Both iterators are derived from declared fields on every call, so creating a new one
//! always restarts from the beginning.

use crate::{NodeId, Tree, kind::Fields};
use smallvec::SmallVec;

/// Direct children of a node, in field declaration order
pub struct Children<'a> {
    fields: Fields<'a>,
    field: usize,
    index: usize,
}

impl<'a> Children<'a> {
    pub(crate) fn new(fields: Fields<'a>) -> Self {
        Self {
            fields,
            field: 0,
            index: 0,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let (_, field) = self.fields.get(self.field)?;
            if let Some(&id) = field.nodes().get(self.index) {
                self.index += 1;
                return Some(id);
            }
            self.field += 1;
            self.index = 0;
        }
    }
}

/// A node and all of its descendants, in pre-order
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: SmallVec<[NodeId; 16]>,
}

impl<'a> Descendants<'a> {
    pub(crate) fn new(tree: &'a Tree, start: NodeId) -> Self {
        let mut stack = SmallVec::new();
        if tree.get(start).is_some() {
            stack.push(start);
        }
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children: SmallVec<[NodeId; 8]> = self.tree.children(id).collect();
        self.stack.extend(children.into_iter().rev());
        Some(id)
    }
}
