//! Line/column text buffers and batched edits
//!
//! The edit pipeline talks to document text only through [`TextBuffer`]. Batches of [`Edit`]s
//! are validated up front and applied atomically; each applied edit yields a
//! [`ChangeRecord`] that [`adjust_for_change`] can use to map positions across it.

pub mod buffer;
pub mod edit;

pub use buffer::{Buffer, TextBuffer};
pub use edit::{ChangeRecord, Edit, EditError, adjust_for_change, change_end};
