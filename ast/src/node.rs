//! AST node representation

use crate::{
    arena::{Arena, NodeId},
    hash::{ContentHash, node_hash},
    kind::NodeKind,
    path::Path,
    position::Span,
};
use compact_str::CompactString;
use std::{collections::BTreeMap, fmt};
use uuid::Uuid;

/// Globally unique, immutable token minted when a node is constructed
///
/// Identities are the only node reference that survives an edit: the reconciliation engine
/// carries them over to structurally unchanged subtrees of the re-parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(Uuid);

impl Identity {
    /// Mint a fresh identity
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-node options bag
///
/// `aria_label` is the precomputed accessible description returned when a description is
/// elided. Anything else a parser or UI wants to carry goes in `metadata`, which is ordered so
/// its contents never depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeOptions {
    pub aria_label: Option<CompactString>,
    pub metadata: BTreeMap<CompactString, CompactString>,
}

impl NodeOptions {
    pub fn labelled(label: impl Into<CompactString>) -> Self {
        Self {
            aria_label: Some(label.into()),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<CompactString>,
        value: impl Into<CompactString>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A comment associated with a node without being one of its children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedComment {
    pub span: Span,
    pub text: CompactString,
}

/// Container-assigned fields, rewritten by every annotation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMeta {
    pub parent: Option<NodeId>,
    pub path: Path,
    /// Depth in the forest, roots are 1
    pub level: u32,
    /// Pre-order sequence number
    pub seq: u32,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    /// Number of siblings including this node
    pub set_size: u32,
    /// One-based position among siblings
    pub pos_in_set: u32,
}

/// A single AST node allocated in an arena
#[derive(Debug, Clone)]
pub struct Node {
    span: Span,
    kind: NodeKind,
    pub(crate) options: NodeOptions,
    pub(crate) identity: Identity,
    hash: ContentHash,
    pub(crate) comment: Option<AttachedComment>,
    pub(crate) meta: NodeMeta,
}

impl Node {
    /// Create a node whose children are already allocated in `arena`
    ///
    /// The content hash is computed here from the children's hashes and is never updated
    /// afterwards.
    pub fn new(span: Span, kind: NodeKind, options: NodeOptions, arena: &Arena) -> Self {
        let hash = node_hash(&kind, arena);
        Self {
            span,
            kind,
            options,
            identity: Identity::new(),
            hash,
            comment: None,
            meta: NodeMeta::default(),
        }
    }

    pub fn with_comment(mut self, comment: AttachedComment) -> Self {
        self.comment = Some(comment);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn options(&self) -> &NodeOptions {
        &self.options
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    pub fn comment(&self) -> Option<&AttachedComment> {
        self.comment.as_ref()
    }

    pub fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.meta.parent
    }

    pub fn path(&self) -> &Path {
        &self.meta.path
    }

    pub fn level(&self) -> u32 {
        self.meta.level
    }

    pub fn seq(&self) -> u32 {
        self.meta.seq
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.fields().iter().all(|(_, field)| field.nodes().is_empty())
    }

    /// Whether a cursor at `pos` falls within the node's span or its attached comment
    pub fn touches_cursor(&self, pos: crate::Position) -> bool {
        self.span.contains(pos) || self.comment.as_ref().is_some_and(|c| c.span.contains(pos))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind.tag(), self.span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn node_display() {
        let span = Span::new(Position::new(0, 1), Position::new(0, 2));
        let node = Node::new(
            span,
            NodeKind::Literal {
                value: "1".into(),
                data_type: "number".into(),
            },
            NodeOptions::labelled("1"),
            &Arena::new(),
        );
        assert_eq!(format!("{node}"), "literal@0:1-0:2");
        assert_eq!(node.options().aria_label.as_deref(), Some("1"));
        assert!(node.is_leaf());
    }

    #[test]
    fn comment_extends_cursor_reach() {
        let span = Span::new(Position::new(1, 0), Position::new(1, 3));
        let node = Node::new(
            span,
            NodeKind::Literal {
                value: "abc".into(),
                data_type: "symbol".into(),
            },
            NodeOptions::default(),
            &Arena::new(),
        )
        .with_comment(AttachedComment {
            span: Span::new(Position::new(0, 0), Position::new(0, 8)),
            text: "; note".into(),
        });

        assert!(node.touches_cursor(Position::new(0, 4)));
        assert!(node.touches_cursor(Position::new(1, 1)));
        assert!(!node.touches_cursor(Position::new(2, 0)));
    }

    #[test]
    fn identities_are_unique() {
        let a = Identity::new();
        let b = Identity::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }
}
