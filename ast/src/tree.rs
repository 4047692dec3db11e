//! The tree container: forest ownership, indices and navigation
//!
//! A [`Tree`] owns every node of a parse in one [`Arena`] and keeps three lookup indices
//! (identity, sequence number, path) that are rebuilt together by [`Tree::annotate`].
//! Navigation queries never fail: a query with no answer returns `None` or an empty list.

use crate::{
    Arena, Identity, Node, NodeId, Path, Position, Span,
    hash::{ContentHash, forest_hash},
    iter::{Children, Descendants},
    node::NodeMeta,
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Descriptions switch to labels once this many levels below the described node
pub const DEFAULT_DESCRIPTION_DEPTH: u32 = 1;

/// A parsed forest plus its derived indices
#[derive(Debug, Clone)]
pub struct Tree {
    arena: Arena,
    roots: Vec<NodeId>,
    by_identity: FxHashMap<Identity, NodeId>,
    /// Sequence number to node; dense, so a vector
    by_seq: Vec<NodeId>,
    by_path: FxHashMap<Path, NodeId>,
    hash: ContentHash,
    description_depth: u32,
}

struct Pending {
    id: NodeId,
    parent: Option<NodeId>,
    path: Path,
    level: u32,
    set_size: u32,
    pos_in_set: u32,
}

impl Tree {
    /// An empty forest
    pub fn empty() -> Self {
        Self::from_arena(Arena::new(), Vec::new(), DEFAULT_DESCRIPTION_DEPTH)
    }

    pub(crate) fn from_arena(arena: Arena, roots: Vec<NodeId>, description_depth: u32) -> Self {
        let mut tree = Self {
            arena,
            roots,
            by_identity: FxHashMap::default(),
            by_seq: Vec::new(),
            by_path: FxHashMap::default(),
            hash: ContentHash(0),
            description_depth,
        };
        tree.annotate();
        tree
    }

    /// Walk the forest in pre-order, assigning every container-owned field and rebuilding
    /// the indices
    ///
    /// Must run whenever node identities change, which the reconciliation engine does after
    /// rewriting them.
    pub fn annotate(&mut self) {
        self.by_identity.clear();
        self.by_seq.clear();
        self.by_path.clear();

        let root_count = self.roots.len() as u32;
        let mut stack: Vec<Pending> = self
            .roots
            .iter()
            .enumerate()
            .rev()
            .map(|(i, &id)| Pending {
                id,
                parent: None,
                path: Path::root(i as u32),
                level: 1,
                set_size: root_count,
                pos_in_set: i as u32 + 1,
            })
            .collect();

        let mut last: Option<NodeId> = None;
        while let Some(pending) = stack.pop() {
            let id = pending.id;
            let seq = self.by_seq.len() as u32;
            let children: SmallVec<[NodeId; 8]> = self.children(id).collect();

            let node = &mut self.arena[id];
            node.meta = NodeMeta {
                parent: pending.parent,
                path: pending.path.clone(),
                level: pending.level,
                seq,
                prev: last,
                next: None,
                set_size: pending.set_size,
                pos_in_set: pending.pos_in_set,
            };
            let identity = node.identity;

            if let Some(prev) = last {
                self.arena[prev].meta.next = Some(id);
            }

            self.by_identity.insert(identity, id);
            self.by_seq.push(id);

            let child_count = children.len() as u32;
            for (i, &child) in children.iter().enumerate().rev() {
                stack.push(Pending {
                    id: child,
                    parent: Some(id),
                    path: pending.path.child(i as u32),
                    level: pending.level + 1,
                    set_size: child_count,
                    pos_in_set: i as u32 + 1,
                });
            }

            self.by_path.insert(pending.path, id);
            last = Some(id);
        }

        self.hash = forest_hash(self.roots.iter().map(|&id| self.arena[id].hash()));
    }

    pub(crate) fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    /// Top-level nodes in document order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn first_root(&self) -> Option<NodeId> {
        self.roots.first().copied()
    }

    /// Hash of the ordered list of root content hashes
    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Number of nodes reachable from the roots
    pub fn len(&self) -> usize {
        self.by_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_seq.is_empty()
    }

    pub fn description_depth(&self) -> u32 {
        self.description_depth
    }

    pub fn set_description_depth(&mut self, depth: u32) {
        self.description_depth = depth;
    }

    pub fn by_identity(&self, identity: Identity) -> Option<NodeId> {
        self.by_identity.get(&identity).copied()
    }

    pub fn by_seq(&self, seq: u32) -> Option<NodeId> {
        self.by_seq.get(seq as usize).copied()
    }

    pub fn by_path(&self, path: &Path) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Every node in document (pre-order) order
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.by_seq.iter().copied()
    }

    /// Direct children of `id`, derived from its declared fields
    ///
    /// Empty if `id` is not in this tree.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let fields = self
            .get(id)
            .map_or_else(SmallVec::new, |node| node.kind().fields());
        Children::new(fields)
    }

    /// `id` and everything below it, in pre-order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    /// Whether `u` is a strict ancestor of `v`
    pub fn is_ancestor(&self, u: NodeId, v: NodeId) -> bool {
        let (Some(u_node), Some(v_node)) = (self.get(u), self.get(v)) else {
            return false;
        };
        let mut current = v_node.parent();
        while let Some(id) = current {
            if self.arena[id].level() <= u_node.level() {
                break;
            }
            current = self.arena[id].parent();
        }
        current == Some(u)
    }

    /// Deepest node whose span, or attached comment, contains `pos`
    pub fn node_containing(&self, pos: Position) -> Option<NodeId> {
        let mut current = self
            .roots
            .iter()
            .copied()
            .find(|&id| self.arena[id].touches_cursor(pos))?;

        while let Some(child) = self
            .children(current)
            .find(|&id| self.arena[id].touches_cursor(pos))
        {
            current = child;
        }
        Some(current)
    }

    /// All nodes, at any level, whose span lies within `[from, to]`, in document order
    pub fn nodes_between(&self, from: Position, to: Position) -> Vec<NodeId> {
        self.nodes()
            .filter(|&id| self.arena[id].span().within(from, to))
            .collect()
    }

    /// Roots overlapping `[start, end]` or lying entirely inside it
    pub fn roots_touching(&self, start: Position, end: Position) -> Vec<NodeId> {
        self.roots
            .iter()
            .copied()
            .filter(|&id| self.arena[id].span().touches(start, end))
            .collect()
    }

    /// Path of the node that contains both cursors
    ///
    /// An insertion point (`c1 == c2`) sitting exactly on a node boundary belongs to that
    /// node's parent, so the parent's path is returned. Returns `None` if either cursor is
    /// outside the forest or the cursors fall under different roots.
    pub fn common_ancestor_path(&self, c1: Position, c2: Position) -> Option<Path> {
        let n1 = self.node_containing(c1)?;
        let n2 = self.node_containing(c2)?;

        let span = self.arena[n1].span();
        if c1 == c2 && (span.from == c1 || span.to == c1) {
            return self.parent_of(n1).map(|parent| self.arena[parent].path().clone());
        }

        let common = self.arena[n1].path().common_prefix(self.arena[n2].path());
        (!common.is_empty()).then_some(common)
    }

    /// Parent found by stripping the last path segment
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.path().parent()?;
        self.by_path(&parent)
    }

    pub fn first_child_of(&self, id: NodeId) -> Option<NodeId> {
        self.by_path(&self.get(id)?.path().child(0))
    }

    /// Resolve a possibly stale path to the nearest node that still exists
    ///
    /// Tries the exact path, then the last sibling that exists before it, then the parent,
    /// and so on up to the root. Each step either resolves, clamps the last segment to an
    /// existing sibling, or drops a segment, so it finishes in at most `segments.len() + 1`
    /// steps.
    pub fn closest_node_from_path(&self, segments: &[u32]) -> Option<NodeId> {
        let mut key: SmallVec<[u32; 8]> = SmallVec::from_slice(segments);
        loop {
            let (&last, parent) = key.split_last()?;
            let path = Path::from_segments(&key);
            if let Some(id) = self.by_path(&path) {
                return Some(id);
            }

            let siblings = if parent.is_empty() {
                self.roots.len()
            } else {
                self.by_path(&Path::from_segments(parent))
                    .map_or(0, |id| self.children(id).count())
            } as u32;

            if last > 0 && siblings > 0 {
                let len = key.len();
                key[len - 1] = (last - 1).min(siblings - 1);
            } else {
                key.pop();
            }
        }
    }

    /// Node whose span matches `[from, to]` exactly, outermost first
    pub fn node_at(&self, from: Position, to: Position) -> Option<NodeId> {
        let target = Span { from, to };
        self.nodes().find(|&id| self.arena[id].span() == target)
    }

    /// Next node in document order
    pub fn node_after(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.meta().next
    }

    /// Previous node in document order
    pub fn node_before(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.meta().prev
    }

    /// Nearest node starting strictly before `cursor`
    ///
    /// When several nodes start at the same place the deepest one wins. This is a linear
    /// scan over the document-order index.
    pub fn node_before_position(&self, cursor: Position) -> Option<NodeId> {
        self.nodes()
            .filter(|&id| self.arena[id].span().from < cursor)
            .fold(None, |best: Option<NodeId>, id| match best {
                Some(best) if self.arena[id].span().from < self.arena[best].span().from => {
                    Some(best)
                },
                _ => Some(id),
            })
    }

    /// First node, in document order, starting at or after `cursor`
    ///
    /// With `x|y` the cursor sits on `y`'s start, so going forward includes equality.
    pub fn node_at_or_after_position(&self, cursor: Position) -> Option<NodeId> {
        self.nodes().find(|&id| self.arena[id].span().from >= cursor)
    }

    /// Last root starting strictly before `cursor`
    pub fn toplevel_node_before(&self, cursor: Position) -> Option<NodeId> {
        self.roots
            .iter()
            .rev()
            .copied()
            .find(|&id| self.arena[id].span().from < cursor)
    }

    /// First root starting at or after `cursor`
    pub fn toplevel_node_at_or_after(&self, cursor: Position) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|&id| self.arena[id].span().from >= cursor)
    }

    /// Repeatedly apply `step` while `keep_going` holds
    ///
    /// Starts from `start` when `inclusive`, otherwise from `step(start)`. Returns the first
    /// node for which `keep_going` is false, or `None` if `step` runs out first.
    pub fn next_matching(
        &self,
        mut step: impl FnMut(NodeId) -> Option<NodeId>,
        mut keep_going: impl FnMut(NodeId) -> bool,
        start: NodeId,
        inclusive: bool,
    ) -> Option<NodeId> {
        let mut node = if inclusive { Some(start) } else { step(start) };
        while let Some(id) = node {
            if !keep_going(id) {
                break;
            }
            node = step(id);
        }
        node
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        NodeKind,
        test_utils::{Layout, plus_one_two},
    };

    fn pos(line: u32, column: u32) -> Position {
        Position::new(line, column)
    }

    /// ```text
    /// (f (g 1 2) 3)
    /// (+ 4 5)
    /// ```
    fn nested() -> Tree {
        let mut layout = Layout::new();
        let outer = layout.list("f expression", |layout| {
            let func = layout.atom("f");
            let inner = layout.app("g", &["1", "2"]);
            let three = layout.atom("3");
            NodeKind::FunctionApp {
                func,
                args: vec![inner, three],
            }
        });
        layout.root(outer);
        layout.newline();
        let second = layout.app("+", &["4", "5"]);
        layout.root(second);
        layout.finish()
    }

    fn at(tree: &Tree, path: &str) -> NodeId {
        let path: Path = path.parse().expect("valid path");
        tree.by_path(&path).expect("path exists")
    }

    #[test]
    fn annotation_assigns_dense_preorder_sequence() {
        let tree = nested();
        assert_eq!(tree.len(), 11);

        let paths: Vec<String> = tree.nodes().map(|id| tree[id].path().to_string()).collect();
        assert_eq!(
            paths,
            ["0", "0,0", "0,1", "0,1,0", "0,1,1", "0,1,2", "0,2", "1", "1,0", "1,1", "1,2"]
        );

        for (seq, id) in tree.nodes().enumerate() {
            assert_eq!(tree[id].seq() as usize, seq);
            assert_eq!(tree.by_seq(seq as u32), Some(id));
            assert_eq!(tree.by_identity(tree[id].identity()), Some(id));
        }
    }

    #[test]
    fn annotation_levels_and_parents() {
        let tree = nested();
        for id in tree.nodes() {
            let node = &tree[id];
            match node.parent() {
                None => {
                    assert_eq!(node.level(), 1);
                    assert!(tree.roots().contains(&id));
                },
                Some(parent) => assert_eq!(node.level(), tree[parent].level() + 1),
            }
        }

        let inner = at(&tree, "0,1");
        assert_eq!(tree[inner].meta().set_size, 3);
        assert_eq!(tree[inner].meta().pos_in_set, 2);
    }

    #[test]
    fn document_order_chain_covers_every_node() {
        let tree = nested();
        let first = tree.first_root().expect("tree has roots");
        assert_eq!(tree.node_before(first), None);

        let mut walked = vec![first];
        let mut current = first;
        while let Some(next) = tree.node_after(current) {
            assert_eq!(tree.node_before(next), Some(current));
            walked.push(next);
            current = next;
        }
        assert_eq!(walked, tree.nodes().collect::<Vec<_>>());
    }

    #[test]
    fn children_and_descendants_are_restartable() {
        let tree = nested();
        let root = at(&tree, "0");
        let once: Vec<_> = tree.children(root).collect();
        let twice: Vec<_> = tree.children(root).collect();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);

        let all: Vec<_> = tree.descendants(root).collect();
        assert_eq!(all.len(), 7);
        assert_eq!(all[0], root);
        assert_eq!(tree.descendants(root).count(), 7);
    }

    #[test]
    fn ids_from_another_tree_have_no_children() {
        let big = nested();
        let small = plus_one_two();
        let foreign = at(&big, "1,2");
        assert!(small.get(foreign).is_none());
        assert_eq!(small.children(foreign).count(), 0);
        assert_eq!(small.descendants(foreign).count(), 0);
        assert_eq!(small.label(foreign), "");
    }

    #[test]
    fn ancestry() {
        let tree = nested();
        let root = at(&tree, "0");
        let inner = at(&tree, "0,1");
        let one = at(&tree, "0,1,1");
        let other_root = at(&tree, "1");

        assert!(tree.is_ancestor(root, one));
        assert!(tree.is_ancestor(inner, one));
        assert!(!tree.is_ancestor(one, one));
        assert!(!tree.is_ancestor(one, root));
        assert!(!tree.is_ancestor(other_root, one));

        assert_eq!(tree.parent_of(one), Some(inner));
        assert_eq!(tree.parent_of(root), None);
        assert_eq!(tree.first_child_of(inner), Some(at(&tree, "0,1,0")));
        assert_eq!(tree.first_child_of(one), None);
    }

    #[test]
    fn node_containing_descends_to_deepest() {
        let tree = plus_one_two();
        let one = at(&tree, "0,1");
        assert_eq!(tree.node_containing(pos(0, 3)), Some(one));
        assert_eq!(tree.node_containing(pos(0, 0)), Some(at(&tree, "0")));
        assert_eq!(tree.node_containing(pos(3, 0)), None);
    }

    #[test]
    fn nodes_between_full_span() {
        let tree = plus_one_two();
        let all = tree.nodes_between(pos(0, 0), pos(0, 7));
        assert_eq!(all.len(), 4);
        assert_eq!(tree.nodes_between(pos(0, 3), pos(0, 6)).len(), 2);
        assert!(tree.nodes_between(pos(5, 0), pos(6, 0)).is_empty());
    }

    #[test]
    fn roots_touching_range() {
        let tree = nested();
        assert_eq!(tree.roots_touching(pos(0, 4), pos(0, 5)), vec![at(&tree, "0")]);
        assert_eq!(tree.roots_touching(pos(0, 4), pos(1, 2)).len(), 2);
        assert!(tree.roots_touching(pos(5, 0), pos(6, 0)).is_empty());
    }

    #[test]
    fn common_ancestor_of_two_literals() {
        let tree = plus_one_two();
        let path = tree.common_ancestor_path(pos(0, 3), pos(0, 5));
        assert_eq!(path.map(|p| p.to_string()), Some("0".to_string()));
    }

    #[test]
    fn common_ancestor_insertion_on_boundary_is_parent() {
        let tree = nested();
        // Cursor right at the start of `(g 1 2)`
        let path = tree.common_ancestor_path(pos(0, 3), pos(0, 3));
        assert_eq!(path, Some(Path::root(0)));

        // Cursor at the start of a root has no parent
        assert_eq!(tree.common_ancestor_path(pos(1, 0), pos(1, 0)), None);
        // Cursors under different roots share nothing
        assert_eq!(tree.common_ancestor_path(pos(0, 5), pos(1, 3)), None);
        // Outside the forest
        assert_eq!(tree.common_ancestor_path(pos(0, 5), pos(9, 0)), None);
    }

    #[test]
    fn closest_path_snaps_to_existing_nodes() {
        let tree = nested();
        assert_eq!(tree.closest_node_from_path(&[0, 1, 2]), Some(at(&tree, "0,1,2")));
        // Later sibling than exists: clamp to the last one
        assert_eq!(tree.closest_node_from_path(&[0, 1, 9]), Some(at(&tree, "0,1,2")));
        // Child of a leaf: go up to the leaf
        assert_eq!(tree.closest_node_from_path(&[0, 2, 0]), Some(at(&tree, "0,2")));
        // Missing root index clamps to the last root
        assert_eq!(tree.closest_node_from_path(&[7, 3]), Some(at(&tree, "1")));
        assert_eq!(tree.closest_node_from_path(&[]), None);
        assert_eq!(Tree::empty().closest_node_from_path(&[0, 0]), None);
    }

    #[test]
    fn position_scans() {
        let tree = nested();
        // `(f (g 1 2) 3)` then `(+ 4 5)` on line 1
        assert_eq!(tree.node_before_position(pos(0, 0)), None);
        assert_eq!(tree.node_before_position(pos(0, 4)), Some(at(&tree, "0,1")));
        assert_eq!(tree.node_before_position(pos(0, 5)), Some(at(&tree, "0,1,0")));
        assert_eq!(tree.node_before_position(pos(1, 0)), Some(at(&tree, "0,2")));

        assert_eq!(tree.node_at_or_after_position(pos(0, 3)), Some(at(&tree, "0,1")));
        assert_eq!(tree.node_at_or_after_position(pos(0, 13)), Some(at(&tree, "1")));
        assert_eq!(tree.node_at_or_after_position(pos(4, 0)), None);

        assert_eq!(tree.toplevel_node_before(pos(1, 3)), Some(at(&tree, "1")));
        assert_eq!(tree.toplevel_node_before(pos(1, 0)), Some(at(&tree, "0")));
        assert_eq!(tree.toplevel_node_at_or_after(pos(0, 1)), Some(at(&tree, "1")));

        assert_eq!(tree.node_at(pos(0, 3), pos(0, 10)), Some(at(&tree, "0,1")));
        assert_eq!(tree.node_at(pos(0, 3), pos(0, 9)), None);
    }

    #[test]
    fn next_matching_walks_until_predicate_fails() {
        let tree = nested();
        let root = at(&tree, "0");
        let step = |id| tree.node_after(id);

        // First leaf after the root
        let leaf = tree.next_matching(step, |id| !tree[id].is_leaf(), root, false);
        assert_eq!(leaf, Some(at(&tree, "0,0")));

        // Inclusive start that already fails the predicate is returned as is
        let same = tree.next_matching(step, |_| false, root, true);
        assert_eq!(same, Some(root));

        // Running off the end yields None
        assert_eq!(tree.next_matching(step, |_| true, root, false), None);

        crate::assert_kind!(tree, root, NodeKind::FunctionApp { .. });
    }

    #[test]
    fn forest_hash_matches_for_identical_builds() {
        let a = nested();
        let b = nested();
        assert_eq!(a.hash(), b.hash());
        for (x, y) in a.nodes().zip(b.nodes()) {
            assert_eq!(a[x].hash(), b[y].hash());
            assert_ne!(a[x].identity(), b[y].identity());
        }
        assert_ne!(a.hash(), plus_one_two().hash());
    }

    #[test]
    fn empty_tree() {
        let tree = Tree::empty();
        assert!(tree.is_empty());
        assert_eq!(tree.first_root(), None);
        assert_eq!(tree.node_containing(pos(0, 0)), None);
        assert_eq!(tree.node_before_position(pos(3, 0)), None);
    }
}
