//! The authoritative file-tree state store.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::Utc;
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

use crate::config::StoreConfig;
use crate::entry::{Entry, EntryId, EntryKind, EntryPatch};
use crate::error::StoreError;
use crate::stats::StorageStats;
use crate::view::ViewMode;

/// Owns the entry collection, navigation cursor, selection set, view
/// mode and search filter for one drive.
///
/// All operations are synchronous and validate eagerly: a failing
/// call returns the specific `StoreError` and leaves the store
/// untouched. Listings are recomputed on every read, never cached.
/// The store is single-writer; concurrent UI surfaces must serialize
/// through one instance.
#[derive(Debug)]
pub struct FileTreeStore {
    entries: IndexMap<EntryId, Entry>,
    cursor: Option<EntryId>,
    selection: HashSet<EntryId>,
    view_mode: ViewMode,
    search: String,
    storage: StorageStats,
    config: StoreConfig,
    next_id: u64,
}

impl Default for FileTreeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileTreeStore {
    /// Create an empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        let storage = StorageStats::new(config.storage_limit);
        Self {
            entries: IndexMap::new(),
            cursor: None,
            selection: HashSet::new(),
            view_mode: ViewMode::default(),
            search: String::new(),
            storage,
            config,
            next_id: 0,
        }
    }

    /// Allocate a fresh id not present in the collection.
    pub fn allocate_id(&mut self) -> EntryId {
        loop {
            self.next_id += 1;
            let candidate = EntryId::new(format!("{}", self.next_id));
            if !self.entries.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Get an entry by id.
    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Iterate over every entry in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Check whether an entry exists.
    pub fn contains(&self, id: &EntryId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries in the drive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the drive holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The folder currently being browsed (`None` = root).
    pub fn current_folder(&self) -> Option<&EntryId> {
        self.cursor.as_ref()
    }

    /// The active view mode.
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// The active search filter.
    pub fn search_filter(&self) -> &str {
        &self.search
    }

    /// Storage usage counters.
    pub fn storage(&self) -> StorageStats {
        self.storage
    }

    /// The store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Override the used-bytes figure (informational only).
    pub fn set_storage_used(&mut self, used: u64) {
        self.storage.used = used;
    }

    // ---- derived listings ------------------------------------------------

    /// Children of a folder (`None` = root), filtered by the current
    /// search term and sorted by the listing order: folders before
    /// files, then ascending case-insensitive name, with raw name and
    /// id breaking ties so the order is total and deterministic.
    pub fn list_children(&self, folder: Option<&EntryId>) -> Vec<&Entry> {
        let needle = self.search.trim().to_lowercase();
        self.entries
            .values()
            .filter(|e| e.parent.as_ref() == folder)
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .sorted_by(|a, b| listing_order(a, b))
            .collect()
    }

    /// Children of the folder under the navigation cursor.
    pub fn list_current(&self) -> Vec<&Entry> {
        self.list_children(self.cursor.as_ref())
    }

    /// The chain of folders containing `id`, root-first. An unknown
    /// id yields an empty chain.
    pub fn ancestors(&self, id: &EntryId) -> Vec<&Entry> {
        let mut chain = Vec::new();
        let mut current = self.entries.get(id).and_then(|e| e.parent.as_ref());
        // Hop cap guards traversal even if the acyclicity invariant
        // were ever broken externally.
        for _ in 0..self.entries.len() {
            let Some(parent_id) = current else { break };
            let Some(parent) = self.entries.get(parent_id) else {
                break;
            };
            chain.push(parent);
            current = parent.parent.as_ref();
        }
        chain.reverse();
        chain
    }

    /// Breadcrumb for the navigation cursor: containing folders plus
    /// the current folder itself, root-first. Empty at the root.
    pub fn breadcrumb(&self) -> Vec<&Entry> {
        let Some(id) = &self.cursor else {
            return Vec::new();
        };
        let mut chain = self.ancestors(id);
        if let Some(entry) = self.entries.get(id) {
            chain.push(entry);
        }
        chain
    }

    /// All starred entries, in listing order.
    pub fn starred(&self) -> Vec<&Entry> {
        self.entries
            .values()
            .filter(|e| e.starred)
            .sorted_by(|a, b| listing_order(a, b))
            .collect()
    }

    /// All entries shared with at least one collaborator, in listing
    /// order.
    pub fn shared(&self) -> Vec<&Entry> {
        self.entries
            .values()
            .filter(|e| !e.shared_with.is_empty())
            .sorted_by(|a, b| listing_order(a, b))
            .collect()
    }

    /// The most recently updated files, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&Entry> {
        self.entries
            .values()
            .filter(|e| e.is_file())
            .sorted_by(|a, b| {
                b.updated_at
                    .cmp(&a.updated_at)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .take(limit)
            .collect()
    }

    // ---- mutations -------------------------------------------------------

    /// Insert a new entry.
    ///
    /// Fails with `DuplicateId` if the id is taken, `InvalidParent`
    /// if the parent does not resolve to an existing folder or root,
    /// and `InvalidName` if the name fails validation. The stored
    /// name is the trimmed form.
    pub fn create(&mut self, mut entry: Entry) -> Result<(), StoreError> {
        entry.name = self.config.validate_name(&entry.name)?;

        if self.entries.contains_key(&entry.id) {
            return Err(StoreError::DuplicateId { id: entry.id });
        }
        self.require_folder(entry.parent.as_ref())?;

        // updatedAt >= createdAt, regardless of what the caller built
        entry.updated_at = entry.updated_at.max(entry.created_at);

        if let Some(size) = entry.size() {
            self.storage.record(size);
        }

        debug!(id = %entry.id, name = %entry.name, folder = entry.is_folder(), "created entry");
        self.entries.insert(entry.id.clone(), entry);
        Ok(())
    }

    /// Remove an entry, rejecting non-empty folders.
    ///
    /// Fails with `NotFound` if absent and `ChildrenExist` if the
    /// entry is a folder that still has children (use
    /// `remove_recursive` to cascade). The id is also dropped from
    /// the selection set. Returns the removed entry.
    pub fn remove(&mut self, id: &EntryId) -> Result<Entry, StoreError> {
        if !self.entries.contains_key(id) {
            return Err(StoreError::NotFound { id: id.clone() });
        }
        if self.has_children(id) {
            return Err(StoreError::ChildrenExist { id: id.clone() });
        }

        // Checked above; shift_remove keeps insertion order intact.
        let entry = self
            .entries
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        self.selection.remove(id);
        if let Some(size) = entry.size() {
            self.storage.release(size);
        }

        debug!(id = %entry.id, name = %entry.name, "removed entry");
        Ok(entry)
    }

    /// Remove an entry and all of its descendants.
    ///
    /// Fails with `NotFound` if absent. Every removed id is pruned
    /// from the selection set. Returns the removed entries, children
    /// before parents.
    pub fn remove_recursive(&mut self, id: &EntryId) -> Result<Vec<Entry>, StoreError> {
        if !self.entries.contains_key(id) {
            return Err(StoreError::NotFound { id: id.clone() });
        }

        // Walk the subtree breadth-first, then delete bottom-up.
        let mut doomed = vec![id.clone()];
        let mut index = 0;
        while index < doomed.len() {
            let parent = doomed[index].clone();
            for entry in self.entries.values() {
                if entry.parent.as_ref() == Some(&parent) {
                    doomed.push(entry.id.clone());
                }
            }
            index += 1;
        }

        let mut removed = Vec::with_capacity(doomed.len());
        for victim in doomed.iter().rev() {
            if let Some(entry) = self.entries.shift_remove(victim) {
                self.selection.remove(victim);
                if let Some(size) = entry.size() {
                    self.storage.release(size);
                }
                removed.push(entry);
            }
        }

        debug!(id = %id, count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Rename an entry.
    ///
    /// Fails with `NotFound` if absent and `InvalidName` if the new
    /// name is empty after trimming or otherwise invalid. Bumps
    /// `updated_at`.
    pub fn rename(&mut self, id: &EntryId, new_name: &str) -> Result<(), StoreError> {
        let name = self.config.validate_name(new_name)?;
        let now = Utc::now();

        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        debug!(id = %id, from = %entry.name, to = %name, "renamed entry");
        entry.name = name;
        entry.touch(now);
        Ok(())
    }

    /// Apply a field patch to an entry.
    ///
    /// Validates the whole patch before mutating anything: the new
    /// parent must be an existing folder or root (`InvalidParent`),
    /// moving an entry under itself or one of its descendants is an
    /// `InvariantViolation`, and file-only fields patched onto a
    /// folder are an `InvariantViolation`. Kind cannot be changed at
    /// all; the patch carries no such field. Bumps `updated_at`.
    pub fn update(&mut self, id: &EntryId, patch: EntryPatch) -> Result<(), StoreError> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        let name = patch
            .name
            .as_ref()
            .map(|n| self.config.validate_name(n))
            .transpose()?;

        if patch.touches_file_fields() && entry.is_folder() {
            return Err(StoreError::invariant(format!(
                "file-only fields cannot be set on folder {id}"
            )));
        }

        if let Some(new_parent) = &patch.parent {
            self.require_folder(new_parent.as_ref())?;
            if let Some(parent_id) = new_parent {
                if parent_id == id {
                    return Err(StoreError::invariant(format!(
                        "entry {id} cannot be its own parent"
                    )));
                }
                if self.is_descendant(parent_id, id) {
                    return Err(StoreError::invariant(format!(
                        "cannot move {id} into its own subtree"
                    )));
                }
            }
        }

        let now = Utc::now();
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;

        if let Some(name) = name {
            entry.name = name;
        }
        if let Some(new_parent) = patch.parent {
            entry.parent = new_parent;
        }
        if let Some(starred) = patch.starred {
            entry.starred = starred;
        }
        if let Some(shared_with) = patch.shared_with {
            entry.shared_with = shared_with;
        }
        if let EntryKind::File {
            ref mut media_type,
            ref mut content_ref,
            ..
        } = entry.kind
        {
            if let Some(new_media_type) = patch.media_type {
                *media_type = new_media_type;
            }
            if let Some(new_content_ref) = patch.content_ref {
                *content_ref = new_content_ref;
            }
        }
        entry.touch(now);

        debug!(id = %id, "updated entry");
        Ok(())
    }

    // ---- navigation and selection ----------------------------------------

    /// Move the navigation cursor to a folder (`None` = root).
    ///
    /// Fails with `InvalidParent` unless the target is an existing
    /// folder or root. Clears the selection set atomically with the
    /// cursor change.
    pub fn navigate_to(&mut self, folder: Option<EntryId>) -> Result<(), StoreError> {
        self.require_folder(folder.as_ref())?;
        debug!(folder = ?folder, "navigated");
        self.cursor = folder;
        self.selection.clear();
        Ok(())
    }

    /// Move the cursor to the parent of the current folder. A cursor
    /// already at the root stays there. Clears the selection if the
    /// cursor moves.
    pub fn navigate_up(&mut self) {
        let Some(current) = &self.cursor else { return };
        let parent = self.entries.get(current).and_then(|e| e.parent.clone());
        self.cursor = parent;
        self.selection.clear();
    }

    /// Mark an entry as selected. Selecting an already-selected id is
    /// a no-op; selecting an unknown id is `NotFound`, so the
    /// selection only ever references existing entries.
    pub fn select(&mut self, id: &EntryId) -> Result<(), StoreError> {
        if !self.entries.contains_key(id) {
            return Err(StoreError::NotFound { id: id.clone() });
        }
        self.selection.insert(id.clone());
        Ok(())
    }

    /// Unmark an entry. Deselecting an absent id is a no-op.
    pub fn deselect(&mut self, id: &EntryId) {
        self.selection.remove(id);
    }

    /// Clear the selection set.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// The current selection set.
    pub fn selection(&self) -> &HashSet<EntryId> {
        &self.selection
    }

    /// Check whether an entry is selected.
    pub fn is_selected(&self, id: &EntryId) -> bool {
        self.selection.contains(id)
    }

    /// Set the view mode.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Set the search filter. An empty string shows everything.
    pub fn set_search_filter(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    // ---- internals -------------------------------------------------------

    /// Require that `folder` is the root or an existing folder.
    fn require_folder(&self, folder: Option<&EntryId>) -> Result<(), StoreError> {
        match folder {
            None => Ok(()),
            Some(id) => match self.entries.get(id) {
                Some(entry) if entry.is_folder() => Ok(()),
                _ => Err(StoreError::InvalidParent { id: id.clone() }),
            },
        }
    }

    /// Check whether the named entry has any children.
    fn has_children(&self, id: &EntryId) -> bool {
        self.entries.values().any(|e| e.parent.as_ref() == Some(id))
    }

    /// Check whether `candidate` sits somewhere below `ancestor`.
    fn is_descendant(&self, candidate: &EntryId, ancestor: &EntryId) -> bool {
        let mut current = self.entries.get(candidate).and_then(|e| e.parent.as_ref());
        for _ in 0..self.entries.len() {
            match current {
                Some(parent_id) if parent_id == ancestor => return true,
                Some(parent_id) => {
                    current = self.entries.get(parent_id).and_then(|e| e.parent.as_ref());
                }
                None => return false,
            }
        }
        false
    }
}

/// The deterministic total order for listings: folders before files,
/// then ascending case-insensitive name, raw name, id.
fn listing_order(a: &Entry, b: &Entry) -> Ordering {
    b.is_folder()
        .cmp(&a.is_folder())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
