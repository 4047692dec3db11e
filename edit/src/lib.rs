//! Parse-checked edit transactions over a structural tree
//!
//! A [`Session`] keeps a text buffer and the tree parsed from it in step. Edits are committed
//! in batches: the batch is applied to a scratch copy, the copy is re-parsed, and only if that
//! succeeds is the live buffer edited and the reconciled tree published together with a new
//! focus. Nodes the edit did not touch keep their identity, so focus and collapsed state
//! survive.

pub mod error;
pub mod focus;
pub mod session;

pub use error::{CommitError, CommitResult};
pub use focus::{Region, default_focus, settled_regions};
pub use session::{Committed, FocusChoice, Session, Transaction};
