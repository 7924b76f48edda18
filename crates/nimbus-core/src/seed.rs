//! Sample drive used by demos and integration tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::entry::{Entry, EntryId};
use crate::store::FileTreeStore;

/// Usage figure shown by the demo plan (5.8 GiB of 15 GiB).
const DEMO_USED_BYTES: u64 = 58 * (1 << 30) / 10;

fn day(year: i32, month: u32, dom: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, dom, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Build the demonstration drive: three folders and five files at the
/// root, with fixed ids, sizes, media types and timestamps.
///
/// The storage-used figure is overridden to the demo plan's 5.8 GiB,
/// independent of the seeded file sizes, because the counter is
/// informational.
pub fn demo_drive() -> FileTreeStore {
    let mut store = FileTreeStore::new();

    let catalog = [
        Entry::new_folder(EntryId::new("1"), "Documents", None)
            .with_timestamps(day(2024, 1, 15), day(2024, 1, 15)),
        Entry::new_folder(EntryId::new("2"), "Images", None)
            .with_timestamps(day(2024, 1, 10), day(2024, 1, 20)),
        Entry::new_folder(EntryId::new("3"), "Projects", None)
            .with_timestamps(day(2024, 2, 1), day(2024, 2, 5)),
        Entry::new_file(EntryId::new("4"), "presentation.pdf", 2_500_000, None)
            .with_media_type("application/pdf")
            .with_timestamps(day(2024, 2, 10), day(2024, 2, 10)),
        Entry::new_file(EntryId::new("5"), "report.docx", 150_000, None)
            .with_media_type(
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            )
            .with_timestamps(day(2024, 2, 12), day(2024, 2, 12)),
        Entry::new_file(EntryId::new("6"), "budget.xlsx", 85_000, None)
            .with_media_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
            .with_timestamps(day(2024, 2, 14), day(2024, 2, 14)),
        Entry::new_file(EntryId::new("7"), "vacation-photo.jpg", 3_200_000, None)
            .with_media_type("image/jpeg")
            .with_content_ref("https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=800")
            .with_timestamps(day(2024, 2, 15), day(2024, 2, 15)),
        Entry::new_file(EntryId::new("8"), "notes.txt", 5_000, None)
            .with_media_type("text/plain")
            .with_timestamps(day(2024, 2, 16), day(2024, 2, 16)),
    ];

    for entry in catalog {
        // Fixed ids into an empty store; a rejection here means the
        // catalog itself is broken.
        let created = store.create(entry);
        debug_assert!(created.is_ok(), "demo catalog rejected: {created:?}");
    }

    store.set_storage_used(DEMO_USED_BYTES);
    store
}
