use nimbus_core::{Entry, EntryId, EntryPatch, FileTreeStore, StoreError, ViewMode};

fn id(s: &str) -> EntryId {
    EntryId::new(s)
}

fn folder(ident: &str, name: &str, parent: Option<&str>) -> Entry {
    Entry::new_folder(id(ident), name, parent.map(EntryId::new))
}

fn file(ident: &str, name: &str, size: u64, parent: Option<&str>) -> Entry {
    Entry::new_file(id(ident), name, size, parent.map(EntryId::new))
}

#[test]
fn test_id_uniqueness_holds_across_create_remove_sequences() {
    let mut store = FileTreeStore::new();

    store.create(folder("1", "Docs", None)).unwrap();
    store.create(file("2", "a.txt", 10, Some("1"))).unwrap();
    assert!(store.create(file("2", "again.txt", 5, None)).is_err());

    store.remove(&id("2")).unwrap();
    // Freed ids may be reused
    store.create(file("2", "again.txt", 5, None)).unwrap();
    assert!(store.create(folder("2", "dup", None)).is_err());

    assert_eq!(store.len(), 2);
}

#[test]
fn test_parents_always_resolve_to_folders_or_root() {
    let mut store = FileTreeStore::new();
    store.create(folder("1", "Docs", None)).unwrap();
    store.create(file("2", "a.txt", 10, Some("1"))).unwrap();

    // A file can never become a parent
    assert_eq!(
        store.create(file("3", "b.txt", 1, Some("2"))).unwrap_err(),
        StoreError::InvalidParent { id: id("2") }
    );

    // A folder with children cannot be plainly removed, so no entry
    // is ever left dangling
    assert_eq!(
        store.remove(&id("1")).unwrap_err(),
        StoreError::ChildrenExist { id: id("1") }
    );

    // Moving under a missing folder fails without touching the entry
    assert_eq!(
        store
            .update(&id("2"), EntryPatch::new().move_to(Some(id("404"))))
            .unwrap_err(),
        StoreError::InvalidParent { id: id("404") }
    );
    assert_eq!(store.entry(&id("2")).unwrap().parent, Some(id("1")));
}

#[test]
fn test_listing_is_sorted_regardless_of_creation_order() {
    let mut store = FileTreeStore::new();
    store.create(file("1", "zoo.txt", 1, None)).unwrap();
    store.create(folder("2", "beta", None)).unwrap();
    store.create(file("3", "Alpha.txt", 1, None)).unwrap();
    store.create(folder("4", "Attic", None)).unwrap();

    let names: Vec<_> = store
        .list_children(None)
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Attic", "beta", "Alpha.txt", "zoo.txt"]);
}

#[test]
fn test_navigation_clears_selection() {
    let mut store = FileTreeStore::new();
    store.create(folder("1", "Docs", None)).unwrap();
    store.create(file("2", "a.txt", 10, None)).unwrap();

    store.select(&id("2")).unwrap();
    assert!(store.is_selected(&id("2")));

    store.navigate_to(Some(id("1"))).unwrap();
    assert!(store.selection().is_empty());
}

#[test]
fn test_selecting_twice_keeps_one_occurrence() {
    let mut store = FileTreeStore::new();
    store.create(file("1", "a.txt", 10, None)).unwrap();

    store.select(&id("1")).unwrap();
    store.select(&id("1")).unwrap();
    assert_eq!(store.selection().len(), 1);
}

#[test]
fn test_create_then_remove_round_trips() {
    let mut store = FileTreeStore::new();
    store.create(folder("1", "Docs", None)).unwrap();
    store.create(file("2", "a.txt", 10, Some("1"))).unwrap();

    let before_len = store.len();
    let before_children: Vec<EntryId> = store
        .list_children(Some(&id("1")))
        .iter()
        .map(|e| e.id.clone())
        .collect();
    let before_used = store.storage().used;

    store.create(file("9", "temp.bin", 77, Some("1"))).unwrap();
    store.remove(&id("9")).unwrap();

    assert_eq!(store.len(), before_len);
    assert!(!store.contains(&id("9")));
    let after_children: Vec<EntryId> = store
        .list_children(Some(&id("1")))
        .iter()
        .map(|e| e.id.clone())
        .collect();
    assert_eq!(after_children, before_children);
    assert_eq!(store.storage().used, before_used);
}

#[test]
fn test_browse_and_search_scenario() {
    let mut store = FileTreeStore::new();
    store.create(folder("1", "Docs", None)).unwrap();
    store.create(file("2", "a.txt", 10, Some("1"))).unwrap();

    let root = store.list_children(None);
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].name, "Docs");
    assert!(root[0].is_folder());

    store.navigate_to(Some(id("1"))).unwrap();
    assert_eq!(store.current_folder(), Some(&id("1")));
    assert!(store.selection().is_empty());

    let inside = store.list_current();
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].name, "a.txt");
    assert_eq!(inside[0].size(), Some(10));

    store.set_search_filter("zzz");
    assert!(store.list_current().is_empty());

    store.set_search_filter("");
    assert_eq!(store.list_current().len(), 1);
}

#[test]
fn test_rename_to_empty_fails_and_leaves_entry_unchanged() {
    let mut store = FileTreeStore::new();
    store.create(file("2", "a.txt", 10, None)).unwrap();
    let before = store.entry(&id("2")).unwrap().clone();

    let err = store.rename(&id("2"), "").unwrap_err();
    assert!(matches!(err, StoreError::InvalidName { .. }));
    assert_eq!(store.entry(&id("2")).unwrap(), &before);
}

#[test]
fn test_duplicate_create_fails_and_leaves_collection_unchanged() {
    let mut store = FileTreeStore::new();
    store.create(file("2", "a.txt", 10, None)).unwrap();

    let err = store.create(file("2", "other.txt", 99, None)).unwrap_err();
    assert_eq!(err, StoreError::DuplicateId { id: id("2") });
    assert_eq!(store.len(), 1);
    assert_eq!(store.entry(&id("2")).unwrap().name, "a.txt");
    assert_eq!(store.storage().used, 10);
}

#[test]
fn test_view_mode_and_sharing_are_presentation_only() {
    let mut store = FileTreeStore::new();
    store.create(file("1", "a.txt", 10, None)).unwrap();

    store.set_view_mode(ViewMode::List);
    assert_eq!(store.view_mode(), ViewMode::List);
    assert_eq!(store.list_children(None).len(), 1);

    store
        .update(&id("1"), EntryPatch::new().shared_with(["bob".into()]))
        .unwrap();
    let entry = store.entry(&id("1")).unwrap();
    assert!(entry.shared_with.contains("bob"));
    assert_eq!(store.shared().len(), 1);
}

#[test]
fn test_removal_drops_id_from_selection() {
    let mut store = FileTreeStore::new();
    store.create(file("1", "a.txt", 10, None)).unwrap();
    store.select(&id("1")).unwrap();

    store.remove(&id("1")).unwrap();
    assert!(store.selection().is_empty());
    assert_eq!(
        store.select(&id("1")).unwrap_err(),
        StoreError::NotFound { id: id("1") }
    );
}

#[test]
fn test_move_between_folders_shows_up_in_listings() {
    let mut store = FileTreeStore::new();
    store.create(folder("1", "Docs", None)).unwrap();
    store.create(folder("2", "Archive", None)).unwrap();
    store.create(file("3", "a.txt", 10, Some("1"))).unwrap();

    store
        .update(&id("3"), EntryPatch::new().move_to(Some(id("2"))))
        .unwrap();

    assert!(store.list_children(Some(&id("1"))).is_empty());
    let archived = store.list_children(Some(&id("2")));
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, id("3"));
}
