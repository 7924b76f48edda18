//! Core file-tree state store for the nimbus cloud drive.
//!
//! This crate owns the authoritative in-memory entry collection,
//! navigation cursor, selection set, view mode and search filter.
//! Everything above it (rendering, upload flows, sharing UI) is a
//! consumer of [`FileTreeStore`]; nothing here performs I/O or holds
//! a timer.

mod config;
mod entry;
mod error;
pub mod seed;
mod stats;
mod store;
mod view;

pub use config::{DEFAULT_STORAGE_LIMIT, StoreConfig, StoreConfigBuilder};
pub use entry::{Entry, EntryId, EntryKind, EntryPatch};
pub use error::StoreError;
pub use stats::StorageStats;
pub use store::FileTreeStore;
pub use view::ViewMode;
