//! Simulated upload operation.

use std::time::Duration;

use compact_str::CompactString;
use tokio::sync::mpsc;
use tracing::debug;

use nimbus_core::{Entry, EntryId, StoreConfig};

use crate::UPLOAD_CHANNEL_SIZE;
use crate::error::UploadError;
use crate::progress::UploadProgress;

/// Description of a file to "upload".
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Id the finished entry will carry.
    pub id: EntryId,
    /// File name.
    pub name: CompactString,
    /// Size in bytes.
    pub size: u64,
    /// Media classification, if known.
    pub media_type: Option<CompactString>,
    /// Reference to renderable content, if any.
    pub content_ref: Option<String>,
    /// Destination folder (`None` = drive root).
    pub parent: Option<EntryId>,
}

impl UploadRequest {
    /// Create a request for a plain file.
    pub fn new(id: EntryId, name: impl Into<CompactString>, size: u64) -> Self {
        Self {
            id,
            name: name.into(),
            size,
            media_type: None,
            content_ref: None,
            parent: None,
        }
    }

    /// Set the media type.
    pub fn with_media_type(mut self, media_type: impl Into<CompactString>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Set the content reference.
    pub fn with_content_ref(mut self, content_ref: impl Into<String>) -> Self {
        self.content_ref = Some(content_ref.into());
        self
    }

    /// Set the destination folder.
    pub fn with_parent(mut self, parent: Option<EntryId>) -> Self {
        self.parent = parent;
        self
    }
}

/// Pacing for the simulated transfer.
#[derive(Debug, Clone, Copy)]
pub struct UploadOptions {
    /// Number of progress ticks before completion.
    pub steps: u32,
    /// Delay between ticks.
    pub tick: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        // 10 ticks of 100 ms, the cadence of the demo upload dialog
        Self {
            steps: 10,
            tick: Duration::from_millis(100),
        }
    }
}

/// Result sent through the channel during an upload.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    /// Progress update.
    Progress(UploadProgress),
    /// The upload finished; the entry is ready for
    /// `FileTreeStore::create`.
    Complete(Entry),
    /// The upload was rejected before transfer started.
    Failed(UploadError),
}

/// Start a simulated upload.
///
/// Spawns a task that validates the file name, emits evenly spaced
/// progress updates, and finishes with exactly one terminal event
/// (`Complete` or `Failed`).
pub fn start_upload(request: UploadRequest, options: UploadOptions) -> mpsc::Receiver<UploadEvent> {
    let (tx, rx) = mpsc::channel(UPLOAD_CHANNEL_SIZE);

    tokio::spawn(async move {
        upload_impl(request, options, tx).await;
    });

    rx
}

/// Internal implementation of the simulated upload.
async fn upload_impl(
    request: UploadRequest,
    options: UploadOptions,
    tx: mpsc::Sender<UploadEvent>,
) {
    // Same rules the store applies at create; rejecting here keeps a
    // doomed transfer from ticking for a second first.
    let name = match StoreConfig::default().validate_name(&request.name) {
        Ok(name) => name,
        Err(e) => {
            debug!(id = %request.id, "upload rejected: {e}");
            let error = UploadError::rejected(request.id, e);
            let _ = tx.send(UploadEvent::Failed(error)).await;
            return;
        }
    };

    debug!(id = %request.id, name = %name, size = request.size, "upload started");

    let mut progress = UploadProgress::new(request.id.clone(), request.size);
    let _ = tx.send(UploadEvent::Progress(progress.clone())).await;

    let steps = u128::from(options.steps.max(1));
    for step in 1..=steps {
        tokio::time::sleep(options.tick).await;
        // Widen to u128 so the ratio cannot overflow for any u64 size.
        progress.bytes_transferred = (u128::from(request.size) * step / steps) as u64;
        let _ = tx.send(UploadEvent::Progress(progress.clone())).await;
    }

    let mut entry = Entry::new_file(request.id, name, request.size, request.parent);
    if let Some(media_type) = request.media_type {
        entry = entry.with_media_type(media_type);
    }
    if let Some(content_ref) = request.content_ref {
        entry = entry.with_content_ref(content_ref);
    }

    debug!(id = %entry.id, "upload complete");
    let _ = tx.send(UploadEvent::Complete(entry)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    use nimbus_core::{FileTreeStore, StoreError};

    fn fast() -> UploadOptions {
        UploadOptions {
            steps: 4,
            tick: Duration::from_millis(1),
        }
    }

    async fn collect(mut rx: mpsc::Receiver<UploadEvent>) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_upload_ends_with_complete_entry() {
        let request = UploadRequest::new(EntryId::new("u1"), "photo.jpg", 4_000)
            .with_media_type("image/jpeg")
            .with_parent(None);

        let events = collect(start_upload(request, fast())).await;
        assert!(events.len() >= 2);

        let mut last_bytes = 0;
        for event in &events[..events.len() - 1] {
            match event {
                UploadEvent::Progress(p) => {
                    assert!(p.bytes_transferred >= last_bytes);
                    assert!(p.bytes_transferred <= p.bytes_total);
                    last_bytes = p.bytes_transferred;
                }
                other => panic!("expected progress, got {other:?}"),
            }
        }

        match events.last().unwrap() {
            UploadEvent::Complete(entry) => {
                assert_eq!(entry.id, EntryId::new("u1"));
                assert_eq!(entry.name, "photo.jpg");
                assert_eq!(entry.size(), Some(4_000));
                assert_eq!(entry.media_type(), Some("image/jpeg"));
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(last_bytes, 4_000);
    }

    #[tokio::test]
    async fn test_invalid_name_fails_without_progress() {
        let request = UploadRequest::new(EntryId::new("u1"), "   ", 100);
        let events = collect(start_upload(request, fast())).await;

        assert_eq!(events.len(), 1);
        match &events[0] {
            UploadEvent::Failed(UploadError::Rejected { id, source }) => {
                assert_eq!(*id, EntryId::new("u1"));
                assert!(matches!(source, StoreError::InvalidName { .. }));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_huge_size_progress_stays_in_range() {
        let request = UploadRequest::new(EntryId::new("u1"), "archive.bin", u64::MAX);
        let events = collect(start_upload(request, fast())).await;

        let mut last_bytes = 0;
        for event in &events[..events.len() - 1] {
            match event {
                UploadEvent::Progress(p) => {
                    assert!(p.bytes_transferred >= last_bytes);
                    assert!(p.bytes_transferred <= p.bytes_total);
                    last_bytes = p.bytes_transferred;
                }
                other => panic!("expected progress, got {other:?}"),
            }
        }
        assert_eq!(last_bytes, u64::MAX);
        assert!(matches!(events.last(), Some(UploadEvent::Complete(_))));
    }

    #[tokio::test]
    async fn test_completed_upload_feeds_the_store() {
        let mut store = FileTreeStore::new();
        let request = UploadRequest::new(EntryId::new("u1"), "notes.txt", 5_000);

        let events = collect(start_upload(request, fast())).await;
        let Some(UploadEvent::Complete(entry)) = events.last().cloned() else {
            panic!("upload did not complete");
        };

        store.create(entry).unwrap();
        assert!(store.contains(&EntryId::new("u1")));
        assert_eq!(store.storage().used, 5_000);
    }
}
