//! Simulated upload engine for the nimbus cloud drive.
//!
//! Uploads here never move real bytes: a spawned task emits progress
//! ticks over a bounded channel and finishes with a ready-to-insert
//! [`nimbus_core::Entry`]. The caller hands that entry to
//! `FileTreeStore::create` on completion, so the store itself stays
//! synchronous and timer-free.

mod error;
mod progress;
mod upload;

pub use error::UploadError;
pub use progress::UploadProgress;
pub use upload::{UploadEvent, UploadOptions, UploadRequest, start_upload};

/// Default channel buffer size for upload progress updates.
pub const UPLOAD_CHANNEL_SIZE: usize = 100;
