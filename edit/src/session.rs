//! Sessions: a live buffer, its published tree, focus and collapsed state
//!
//! Every change to the document goes through a [`Transaction`]. The edits are tried on a
//! private scratch copy first and only reach the live buffer once the result parses.

use crate::{
    error::{CommitError, CommitResult},
    focus::default_focus,
};
use blocks_ast::{Identity, NodeId, Parser, PatchStats, Tree, patch_with_stats};
use blocks_text::{Buffer, ChangeRecord, Edit, TextBuffer};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

/// What a focus hint decided for the prospective tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusChoice {
    Node(NodeId),
    /// Leave nothing focused
    Clear,
    /// Use [`default_focus`]
    Fallback,
}

/// Outcome of a published transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Committed {
    pub focus: Option<Identity>,
    /// One record per edit, in application order
    pub changes: Vec<ChangeRecord>,
    pub stats: PatchStats,
}

pub struct Session<P, B = Buffer> {
    parser: P,
    buffer: B,
    scratch: Buffer,
    tree: Tree,
    focus: Option<Identity>,
    collapsed: FxHashSet<Identity>,
}

impl<P: Parser, B: TextBuffer> Session<P, B> {
    /// Parse `buffer` and start a session over it
    pub fn open(parser: P, buffer: B) -> CommitResult<Self> {
        let tree = parser
            .parse(buffer.text())
            .map_err(|source| CommitError::Parse { source })?;
        debug!(nodes = tree.len(), hash = %tree.hash(), "opened session");

        Ok(Self {
            parser,
            buffer,
            scratch: Buffer::default(),
            tree,
            focus: None,
            collapsed: FxHashSet::default(),
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    pub fn focus(&self) -> Option<Identity> {
        self.focus
    }

    /// The focused node in the published tree
    pub fn focused_node(&self) -> Option<NodeId> {
        self.tree.by_identity(self.focus?)
    }

    /// Focus `id`, or clear focus with `None`
    ///
    /// Returns false and leaves focus alone if `id` is not in the published tree.
    pub fn set_focus(&mut self, id: Option<NodeId>) -> bool {
        match id {
            None => self.focus = None,
            Some(id) => match self.tree.get(id) {
                Some(node) => self.focus = Some(node.identity()),
                None => return false,
            },
        }
        true
    }

    pub fn is_collapsed(&self, identity: Identity) -> bool {
        self.collapsed.contains(&identity)
    }

    pub fn collapse(&mut self, identity: Identity) {
        self.collapsed.insert(identity);
    }

    pub fn expand(&mut self, identity: Identity) {
        self.collapsed.remove(&identity);
    }

    /// Flip the collapsed state of `identity`, returning whether it is now collapsed
    pub fn toggle_collapsed(&mut self, identity: Identity) -> bool {
        if self.collapsed.remove(&identity) {
            false
        } else {
            self.collapsed.insert(identity);
            true
        }
    }

    pub fn collapsed(&self) -> impl Iterator<Item = Identity> + '_ {
        self.collapsed.iter().copied()
    }

    /// Start a transaction over `edits`, expressed against the current text
    pub fn transaction(&mut self, edits: Vec<Edit>) -> Transaction<'_, P, B> {
        Transaction {
            session: self,
            edits,
            focus_hint: None,
            on_success: None,
            on_error: None,
        }
    }

    /// Commit `edits` with the default focus and no callbacks
    pub fn commit(&mut self, edits: Vec<Edit>) -> CommitResult<Committed> {
        self.transaction(edits).commit()
    }

    /// Outermost collapsed strict ancestor of `id`, or `id` itself
    fn visible_focus(&self, tree: &Tree, id: NodeId) -> NodeId {
        let mut focus = id;
        let mut current = tree.parent_of(id);
        while let Some(ancestor) = current {
            if self.collapsed.contains(&tree[ancestor].identity()) {
                focus = ancestor;
            }
            current = tree.parent_of(ancestor);
        }
        focus
    }
}

type FocusHint<'s> = Box<dyn FnOnce(&Tree) -> FocusChoice + 's>;
type OnSuccess<'s> = Box<dyn FnOnce(&Tree, Option<Identity>) + 's>;
type OnError<'s> = Box<dyn FnOnce(&CommitError) + 's>;

/// A pending batch of edits against a [`Session`]
///
/// Nothing happens until [`Transaction::commit`].
pub struct Transaction<'s, P, B> {
    session: &'s mut Session<P, B>,
    edits: Vec<Edit>,
    focus_hint: Option<FocusHint<'s>>,
    on_success: Option<OnSuccess<'s>>,
    on_error: Option<OnError<'s>>,
}

impl<'s, P: Parser, B: TextBuffer> Transaction<'s, P, B> {
    /// Choose the focus node from the reconciled tree
    pub fn focus_hint(mut self, hint: impl FnOnce(&Tree) -> FocusChoice + 's) -> Self {
        self.focus_hint = Some(Box::new(hint));
        self
    }

    /// Called with the published tree and focus
    pub fn on_success(mut self, f: impl FnOnce(&Tree, Option<Identity>) + 's) -> Self {
        self.on_success = Some(Box::new(f));
        self
    }

    /// Called when the transaction is abandoned
    pub fn on_error(mut self, f: impl FnOnce(&CommitError) + 's) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// Apply the edits if and only if the edited text parses
    ///
    /// On failure the error callback runs and the session is left exactly as it was.
    pub fn commit(self) -> CommitResult<Committed> {
        let Transaction {
            session,
            edits,
            focus_hint,
            on_success,
            on_error,
        } = self;

        let (changes, parsed) = match try_edits(session, &edits) {
            Ok(result) => result,
            Err(err) => {
                debug!(error = %err, edits = edits.len(), "transaction abandoned");
                if let Some(on_error) = on_error {
                    on_error(&err);
                }
                return Err(err);
            },
        };

        let (tree, stats) = patch_with_stats(&session.tree, parsed);
        debug!(
            adopted = stats.adopted,
            fresh = stats.fresh,
            edits = changes.len(),
            "reconciled edited tree"
        );

        let choice = focus_hint.map_or(FocusChoice::Fallback, |hint| hint(&tree));
        let target = match choice {
            FocusChoice::Node(id) if tree.get(id).is_some() => Some(id),
            FocusChoice::Node(id) => {
                warn!(?id, "focus hint chose a node outside the tree, using default focus");
                default_focus(&changes, &tree)
            },
            FocusChoice::Clear => None,
            FocusChoice::Fallback => default_focus(&changes, &tree),
        };
        let focus = target.map(|id| tree[session.visible_focus(&tree, id)].identity());

        session
            .collapsed
            .retain(|identity| tree.by_identity(*identity).is_some());
        session.tree = tree;
        session.focus = focus;
        debug!(focus = ?focus, nodes = session.tree.len(), "published tree");

        if let Some(on_success) = on_success {
            on_success(&session.tree, focus);
        }

        Ok(Committed {
            focus,
            changes,
            stats,
        })
    }
}

/// Steps that may still fail: scratch edit, parse, live edit
fn try_edits<P: Parser, B: TextBuffer>(
    session: &mut Session<P, B>,
    edits: &[Edit],
) -> CommitResult<(Vec<ChangeRecord>, Tree)> {
    session.scratch.set_text(session.buffer.text());
    session
        .scratch
        .apply(edits)
        .map_err(|source| CommitError::Edit { source })?;

    let mut parsed = session
        .parser
        .parse(session.scratch.text())
        .map_err(|source| CommitError::Parse { source })?;
    parsed.set_description_depth(session.tree.description_depth());

    let changes = session
        .buffer
        .apply(edits)
        .map_err(|source| CommitError::Edit { source })?;
    Ok((changes, parsed))
}
