//! Builder for constructing trees bottom-up

use crate::{
    Arena, AttachedComment, Node, NodeId, NodeKind, NodeOptions, Span, Tree,
    tree::DEFAULT_DESCRIPTION_DEPTH,
};
use compact_str::CompactString;

/// Builder for constructing a [`Tree`]
///
/// Children must be built before their parent so the parent's content hash can be computed
/// from theirs. [`Builder::finish`] takes the root list and runs the annotation pass.
pub struct Builder {
    arena: Arena,
    description_depth: u32,
}

impl Builder {
    /// Create a new builder with an empty arena
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            description_depth: DEFAULT_DESCRIPTION_DEPTH,
        }
    }

    /// Set the depth below which descriptions fall back to labels
    pub fn description_depth(mut self, depth: u32) -> Self {
        self.description_depth = depth;
        self
    }

    /// Build a node from children already allocated by this builder
    pub fn node(&mut self, span: Span, kind: NodeKind, options: NodeOptions) -> NodeId {
        let node = Node::new(span, kind, options, &self.arena);
        self.arena.alloc(node)
    }

    /// Build a literal leaf labelled with its own value
    pub fn literal(
        &mut self,
        span: Span,
        value: impl Into<CompactString>,
        data_type: impl Into<CompactString>,
    ) -> NodeId {
        let value = value.into();
        let options = NodeOptions::labelled(value.clone());
        self.node(
            span,
            NodeKind::Literal {
                value,
                data_type: data_type.into(),
            },
            options,
        )
    }

    /// Attach an out-of-band comment to an already built node
    ///
    /// Comments are not hashed, so this can happen after the parent was built.
    pub fn attach_comment(&mut self, id: NodeId, comment: AttachedComment) {
        if let Some(node) = self.arena.get_mut(id) {
            node.comment = Some(comment);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Finish the tree with `roots` as the top-level nodes, in document order
    pub fn finish(self, roots: Vec<NodeId>) -> Tree {
        Tree::from_arena(self.arena, roots, self.description_depth)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
