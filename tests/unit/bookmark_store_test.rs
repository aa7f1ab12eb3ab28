//! Unit tests for the SQLite bookmark store.

use bookmark_core::database::bookmark_store::has_root_folder;
use bookmark_core::database::{Database, SqliteBookmarkStore};
use bookmark_core::managers::bookmark_manager::BookmarkStore;
use bookmark_core::types::bookmark::{
    Bookmark, BookmarkEntity, BookmarkFolder, ParentFolder, WebsiteInfo, ROOT_FOLDER_ID,
};
use bookmark_core::types::errors::{StoreError, StructuralError};

fn setup() -> SqliteBookmarkStore {
    let db = Database::open_in_memory().expect("in-memory database");
    SqliteBookmarkStore::new(db).expect("store")
}

fn bookmark(id: &str, parent: Option<&str>) -> Bookmark {
    Bookmark::new(
        id,
        format!("https://{}.com", id),
        id,
        false,
        parent.map(str::to_string),
    )
}

fn titles(entities: &[BookmarkEntity]) -> Vec<String> {
    entities.iter().map(|e| e.title().to_string()).collect()
}

fn folder_titles(store: &SqliteBookmarkStore, id: &str) -> Vec<String> {
    titles(&store.fetch_folder(id).unwrap().unwrap().children)
}

#[test]
fn test_new_store_creates_root_containers() {
    let store = setup();

    assert!(has_root_folder(store.database().connection()).unwrap());
    assert!(store.load_all().unwrap().is_empty());
    assert!(store.load_favorites().unwrap().is_empty());
}

#[test]
fn test_save_bookmark_respects_index() {
    let mut store = setup();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();
    store.save_bookmark(&bookmark("c", None), None, None).unwrap();
    store.save_bookmark(&bookmark("b", None), None, Some(1)).unwrap();

    assert_eq!(titles(&store.load_all().unwrap()), vec!["a", "b", "c"]);
}

#[test]
fn test_save_bookmark_under_explicit_root_id() {
    let mut store = setup();
    store
        .save_bookmark(&bookmark("a", None), Some(ROOT_FOLDER_ID), None)
        .unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].parent_id(), None);
}

#[test]
fn test_save_folder_with_children_and_load_tree() {
    let mut store = setup();
    let folder = BookmarkFolder::new("work", "Work", None).with_children(vec![
        bookmark("x", Some("work")).into(),
        BookmarkFolder::new("nested", "Nested", Some("work".to_string())).into(),
    ]);
    store.save_folder(&folder, None).unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(loaded, vec![BookmarkEntity::Folder(folder)]);
}

#[test]
fn test_missing_parent_is_rejected() {
    let mut store = setup();

    let result = store.save_bookmark(&bookmark("a", Some("ghost")), Some("ghost"), None);

    assert_eq!(
        result,
        Err(StoreError::Structural(StructuralError::MissingParent("ghost".to_string())))
    );
}

#[test]
fn test_bookmark_is_not_a_parent() {
    let mut store = setup();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();

    let result = store.save_bookmark(&bookmark("b", Some("a")), Some("a"), None);

    assert!(matches!(
        result,
        Err(StoreError::Structural(StructuralError::MissingParent(_)))
    ));
}

#[test]
fn test_duplicate_id_is_rejected() {
    let mut store = setup();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();

    let result = store.save_bookmark(&bookmark("a", None), None, None);

    assert_eq!(
        result,
        Err(StoreError::Structural(StructuralError::DuplicateId("a".to_string())))
    );
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[test]
fn test_favorites_keep_insertion_order_and_toggle() {
    let mut store = setup();
    for id in ["a", "b", "c"] {
        let mut b = bookmark(id, None);
        b.set_favorite(true);
        store.save_bookmark(&b, None, None).unwrap();
    }
    let mut b = bookmark("b", None);
    b.set_favorite(false);
    store.update_bookmark(&b).unwrap();

    let favorites: Vec<String> = store
        .load_favorites()
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(favorites, vec!["a", "c"]);

    b.set_favorite(true);
    store.update_bookmark(&b).unwrap();
    let favorites: Vec<String> = store
        .load_favorites()
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(favorites, vec!["a", "c", "b"]);
}

#[test]
fn test_update_bookmark_changes_url_and_title() {
    let mut store = setup();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();
    let mut updated = bookmark("a", None).with_url("https://new.com");
    updated.title = "New".to_string();

    store.update_bookmark(&updated).unwrap();

    assert_eq!(store.load_all().unwrap(), vec![BookmarkEntity::Bookmark(updated)]);
}

#[test]
fn test_update_unknown_entities_reports_not_found() {
    let mut store = setup();

    assert_eq!(
        store.update_bookmark(&bookmark("ghost", None)),
        Err(StoreError::NotFound("ghost".to_string()))
    );
    assert_eq!(
        store.update_folder(&BookmarkFolder::new("ghost", "Ghost", None)),
        Err(StoreError::NotFound("ghost".to_string()))
    );
}

#[test]
fn test_move_objects_uses_block_semantics() {
    let mut store = setup();
    for id in ["a", "b", "c", "d", "e"] {
        store.save_bookmark(&bookmark(id, None), None, None).unwrap();
    }

    store
        .move_objects(&["a".to_string(), "c".to_string()], Some(4), &ParentFolder::Root)
        .unwrap();
    assert_eq!(titles(&store.load_all().unwrap()), vec!["b", "d", "a", "c", "e"]);

    store
        .move_objects(&["e".to_string()], Some(0), &ParentFolder::Root)
        .unwrap();
    assert_eq!(titles(&store.load_all().unwrap()), vec!["e", "b", "d", "a", "c"]);

    store
        .move_objects(&["e".to_string()], None, &ParentFolder::Root)
        .unwrap();
    assert_eq!(titles(&store.load_all().unwrap()), vec!["b", "d", "a", "c", "e"]);
}

#[test]
fn test_move_objects_between_folders() {
    let mut store = setup();
    store
        .save_folder(&BookmarkFolder::new("f", "Folder", None), None)
        .unwrap();
    store.save_bookmark(&bookmark("x", Some("f")), Some("f"), None).unwrap();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();
    store.save_bookmark(&bookmark("b", None), None, None).unwrap();

    store
        .move_objects(
            &["b".to_string(), "a".to_string()],
            Some(0),
            &ParentFolder::Parent("f".to_string()),
        )
        .unwrap();

    assert_eq!(folder_titles(&store, "f"), vec!["b", "a", "x"]);
    assert_eq!(titles(&store.load_all().unwrap()), vec!["Folder"]);
}

#[test]
fn test_move_folder_into_descendant_is_rejected() {
    let mut store = setup();
    store
        .save_folder(&BookmarkFolder::new("outer", "Outer", None), None)
        .unwrap();
    store
        .save_folder(
            &BookmarkFolder::new("inner", "Inner", Some("outer".to_string())),
            Some("outer"),
        )
        .unwrap();

    let result = store.move_objects(
        &["outer".to_string()],
        None,
        &ParentFolder::Parent("inner".to_string()),
    );

    assert!(matches!(
        result,
        Err(StoreError::Structural(StructuralError::CycleDetected { .. }))
    ));
    assert_eq!(folder_titles(&store, "outer"), vec!["Inner"]);
}

#[test]
fn test_move_favorites_reorders() {
    let mut store = setup();
    for id in ["a", "b", "c"] {
        let mut b = bookmark(id, None);
        b.set_favorite(true);
        store.save_bookmark(&b, None, None).unwrap();
    }

    store
        .move_favorites(&["a".to_string()], Some(3))
        .unwrap();

    let favorites: Vec<String> = store
        .load_favorites()
        .unwrap()
        .into_iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(favorites, vec!["b", "c", "a"]);
}

#[test]
fn test_update_folder_and_move() {
    let mut store = setup();
    store
        .save_folder(&BookmarkFolder::new("target", "Target", None), None)
        .unwrap();
    store
        .save_folder(&BookmarkFolder::new("f", "Old", None), None)
        .unwrap();

    store
        .update_folder_and_move(
            &BookmarkFolder::new("f", "New", None),
            &ParentFolder::Parent("target".to_string()),
        )
        .unwrap();

    assert_eq!(titles(&store.load_all().unwrap()), vec!["Target"]);
    let moved = store.fetch_folder("f").unwrap().unwrap();
    assert_eq!(moved.title, "New");
    assert_eq!(moved.parent_id(), Some("target"));
}

#[test]
fn test_remove_deletes_subtree_and_favorites() {
    let mut store = setup();
    store
        .save_folder(&BookmarkFolder::new("f", "Folder", None), None)
        .unwrap();
    let mut inside = bookmark("x", Some("f"));
    inside.set_favorite(true);
    store.save_bookmark(&inside, Some("f"), None).unwrap();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();

    store
        .remove(&["f".to_string(), ROOT_FOLDER_ID.to_string()])
        .unwrap();

    assert_eq!(titles(&store.load_all().unwrap()), vec!["a"]);
    assert!(store.load_favorites().unwrap().is_empty());
    assert!(has_root_folder(store.database().connection()).unwrap());
}

#[test]
fn test_save_bookmarks_in_new_folder() {
    let mut store = setup();
    let websites = vec![
        WebsiteInfo::new("https://a.com", "A"),
        WebsiteInfo::new("https://b.com", "B"),
    ];

    store
        .save_bookmarks_in_new_folder(&websites, "Session", &ParentFolder::Root)
        .unwrap();

    let loaded = store.load_all().unwrap();
    assert_eq!(titles(&loaded), vec!["Session"]);
    let folder = loaded[0].as_folder().unwrap();
    let urls: Vec<&str> = folder.child_bookmarks().map(|b| b.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
}

#[test]
fn test_fetch_folder_unknown_or_bookmark_is_none() {
    let mut store = setup();
    store.save_bookmark(&bookmark("a", None), None, None).unwrap();

    assert!(store.fetch_folder("ghost").unwrap().is_none());
    assert!(store.fetch_folder("a").unwrap().is_none());
}

#[test]
fn test_reset_keeps_root_structure() {
    let mut store = setup();
    store
        .save_folder(&BookmarkFolder::new("f", "Folder", None), None)
        .unwrap();
    let mut fav = bookmark("a", None);
    fav.set_favorite(true);
    store.save_bookmark(&fav, None, None).unwrap();

    store.reset().unwrap();

    assert!(store.load_all().unwrap().is_empty());
    assert!(store.load_favorites().unwrap().is_empty());
    assert!(has_root_folder(store.database().connection()).unwrap());
    store.save_bookmark(&bookmark("b", None), None, None).unwrap();
    assert_eq!(store.load_all().unwrap().len(), 1);
}
