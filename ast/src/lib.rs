//! Arena-based AST with identities that survive re-parsing
//!
//! A [`Tree`] is produced whole by a [`Parser`]. Every node carries a random [`Identity`] and
//! a structural [`ContentHash`]; [`patch`] uses the hashes to move identities from the previous
//! tree onto the new one, so anything keyed by identity (focus, collapsed state, selection)
//! keeps pointing at the same logical node after an edit.

pub mod arena;
pub mod builder;
pub mod describe;
pub mod display;
pub mod hash;
pub mod iter;
pub mod kind;
pub mod node;
pub mod parse;
pub mod patch;
pub mod path;
pub mod position;
pub mod tree;

pub use arena::{Arena, NodeId};
pub use builder::Builder;
pub use display::NodeDisplay;
pub use hash::ContentHash;
pub use kind::{Field, Fields, NodeKind};
pub use node::{AttachedComment, Identity, Node, NodeMeta, NodeOptions};
pub use parse::{ParseError, Parser};
pub use patch::{PatchStats, patch, patch_with_stats};
pub use path::{Path, PathParseError};
pub use position::{Position, Span};
pub use tree::{DEFAULT_DESCRIPTION_DEPTH, Tree};

#[cfg(test)]
mod test_utils;
