//! Level Editor Errors
//!
//! Every condition here is recoverable. The session layer turns them into
//! silent no-ops so the user's editing flow is never interrupted.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A placement or a deserialized record referenced a type id that is not in the registry
    #[error("unknown prototype '{0}'")]
    UnknownPrototype(String),

    /// Text typed into a numeric property field could not be parsed
    #[error("invalid numeric input '{0}'")]
    InvalidNumericInput(String),

    #[error("undo stack is empty")]
    EmptyUndoStack,

    /// A selection shortcut fired while nothing was selected
    #[error("no object selected")]
    MissingSelection,
}
