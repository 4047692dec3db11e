use blocks_ast::ParseError;
use blocks_text::EditError;
use snafu::Snafu;

/// Why a transaction was abandoned
///
/// Either way nothing was published: the live buffer, tree and focus are as they were.
#[derive(Debug, Clone, Snafu, PartialEq, Eq)]
pub enum CommitError {
    #[snafu(display("Edited text does not parse: {source}"))]
    Parse { source: ParseError },

    #[snafu(display("Edit operation failed: {source}"))]
    Edit { source: EditError },
}

pub type CommitResult<T> = Result<T, CommitError>;
