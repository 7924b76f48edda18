//! File and folder entry types.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Unique identifier for an entry within a drive.
///
/// Files and folders share one id namespace. Ids are opaque strings;
/// the store can allocate fresh ones from a counter, but callers may
/// also bring their own (e.g. ids minted by an upload flow).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub CompactString);

impl EntryId {
    /// Create a new EntryId from a string.
    pub fn new(id: impl Into<CompactString>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Kind of drive entry.
///
/// File-only metadata lives on the `File` variant, so a folder can
/// never carry a size, media type, or content reference, and a kind
/// can never be flipped through a field patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File {
        /// Size in bytes.
        size: u64,
        /// Media classification (e.g. "image/jpeg"), display-only.
        media_type: Option<CompactString>,
        /// Reference to renderable content (e.g. a URL).
        content_ref: Option<String>,
    },
    /// Folder.
    Folder,
}

impl EntryKind {
    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }

    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, EntryKind::Folder)
    }
}

/// A single file or folder in the drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, immutable once assigned.
    pub id: EntryId,

    /// Display name (not required unique among siblings).
    pub name: CompactString,

    /// Entry kind and file payload.
    pub kind: EntryKind,

    /// Containing folder, or `None` for the drive root.
    pub parent: Option<EntryId>,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last modified. Never precedes `created_at`.
    pub updated_at: DateTime<Utc>,

    /// Collaborator identifiers this entry is shared with.
    /// Presentation-only; the store enforces no permissions.
    #[serde(default)]
    pub shared_with: BTreeSet<CompactString>,

    /// Starred flag.
    #[serde(default)]
    pub starred: bool,
}

impl Entry {
    /// Create a new file entry with current timestamps.
    pub fn new_file(
        id: EntryId,
        name: impl Into<CompactString>,
        size: u64,
        parent: Option<EntryId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            kind: EntryKind::File {
                size,
                media_type: None,
                content_ref: None,
            },
            parent,
            created_at: now,
            updated_at: now,
            shared_with: BTreeSet::new(),
            starred: false,
        }
    }

    /// Create a new folder entry with current timestamps.
    pub fn new_folder(
        id: EntryId,
        name: impl Into<CompactString>,
        parent: Option<EntryId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            kind: EntryKind::Folder,
            parent,
            created_at: now,
            updated_at: now,
            shared_with: BTreeSet::new(),
            starred: false,
        }
    }

    /// Set the media type (files only; ignored for folders).
    pub fn with_media_type(mut self, media_type: impl Into<CompactString>) -> Self {
        if let EntryKind::File {
            media_type: ref mut slot,
            ..
        } = self.kind
        {
            *slot = Some(media_type.into());
        }
        self
    }

    /// Set the content reference (files only; ignored for folders).
    pub fn with_content_ref(mut self, content_ref: impl Into<String>) -> Self {
        if let EntryKind::File {
            content_ref: ref mut slot,
            ..
        } = self.kind
        {
            *slot = Some(content_ref.into());
        }
        self
    }

    /// Override both timestamps, clamping `updated_at` so it never
    /// precedes `created_at`.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at.max(created_at);
        self
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// Check if this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Size in bytes for files, `None` for folders.
    pub fn size(&self) -> Option<u64> {
        match &self.kind {
            EntryKind::File { size, .. } => Some(*size),
            EntryKind::Folder => None,
        }
    }

    /// Media type for files, `None` otherwise.
    pub fn media_type(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { media_type, .. } => media_type.as_deref(),
            EntryKind::Folder => None,
        }
    }

    /// Content reference for files, `None` otherwise.
    pub fn content_ref(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { content_ref, .. } => content_ref.as_deref(),
            EntryKind::Folder => None,
        }
    }

    /// Bump `updated_at`, keeping it at or after `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// A partial update applied through `FileTreeStore::update`.
///
/// Absent fields are left untouched. `parent` is doubly optional:
/// `Some(None)` moves the entry to the root.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub name: Option<CompactString>,
    pub parent: Option<Option<EntryId>>,
    pub starred: Option<bool>,
    pub shared_with: Option<BTreeSet<CompactString>>,
    pub media_type: Option<Option<CompactString>>,
    pub content_ref: Option<Option<String>>,
}

impl EntryPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rename the entry.
    pub fn name(mut self, name: impl Into<CompactString>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Move the entry into another folder (`None` = drive root).
    pub fn move_to(mut self, parent: Option<EntryId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set or clear the starred flag.
    pub fn starred(mut self, starred: bool) -> Self {
        self.starred = Some(starred);
        self
    }

    /// Replace the collaborator set.
    pub fn shared_with(mut self, shared_with: impl IntoIterator<Item = CompactString>) -> Self {
        self.shared_with = Some(shared_with.into_iter().collect());
        self
    }

    /// Set or clear the media type (files only).
    pub fn media_type(mut self, media_type: Option<CompactString>) -> Self {
        self.media_type = Some(media_type);
        self
    }

    /// Set or clear the content reference (files only).
    pub fn content_ref(mut self, content_ref: Option<String>) -> Self {
        self.content_ref = Some(content_ref);
        self
    }

    /// Check whether the patch touches any file-only field.
    pub fn touches_file_fields(&self) -> bool {
        self.media_type.is_some() || self.content_ref.is_some()
    }

    /// Check whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.parent.is_none()
            && self.starred.is_none()
            && self.shared_with.is_none()
            && self.media_type.is_none()
            && self.content_ref.is_none()
    }
}
