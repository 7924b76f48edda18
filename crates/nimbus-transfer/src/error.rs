//! Error types for simulated uploads.

use thiserror::Error;

use nimbus_core::{EntryId, StoreError};

/// Errors surfaced by a simulated upload.
///
/// Carried by `UploadEvent::Failed`; all variants are terminal for
/// the one upload and recoverable by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The request was rejected before any transfer started.
    #[error("upload {id} rejected: {source}")]
    Rejected {
        id: EntryId,
        #[source]
        source: StoreError,
    },
}

impl UploadError {
    /// Create a rejection carrying the store's validation error.
    pub fn rejected(id: EntryId, source: StoreError) -> Self {
        Self::Rejected { id, source }
    }
}
