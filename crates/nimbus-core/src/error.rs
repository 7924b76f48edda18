//! Error types for store operations.

use thiserror::Error;

use crate::entry::EntryId;

/// Errors surfaced by `FileTreeStore` operations.
///
/// All variants are local, synchronous and recoverable by the caller;
/// every failing operation validates eagerly and leaves the store
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// An entry with this id already exists.
    #[error("entry id already in use: {id}")]
    DuplicateId { id: EntryId },

    /// No entry with this id exists.
    #[error("no entry with id: {id}")]
    NotFound { id: EntryId },

    /// The referenced parent is not an existing folder.
    #[error("not an existing folder: {id}")]
    InvalidParent { id: EntryId },

    /// The name failed validation.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// The folder still has children and cascading was not requested.
    #[error("folder is not empty: {id}")]
    ChildrenExist { id: EntryId },

    /// The mutation would break a structural invariant.
    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },
}

impl StoreError {
    /// Create an invalid-name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invariant-violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }
}
