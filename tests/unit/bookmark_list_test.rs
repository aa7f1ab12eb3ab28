//! Unit tests for the url-keyed bookmark index.

use bookmark_core::managers::bookmark_list::{BookmarkList, IdentifiableBookmark};
use bookmark_core::types::bookmark::Bookmark;

fn bookmark(id: &str, url: &str) -> Bookmark {
    Bookmark::new(id, url, format!("Title {}", id), false, None)
}

fn setup() -> BookmarkList {
    BookmarkList::from_entities(
        &[
            bookmark("1", "https://a.com"),
            bookmark("2", "https://b.com/Path"),
            bookmark("3", "https://c.com"),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn urls(list: &BookmarkList) -> Vec<String> {
    list.bookmarks().iter().map(|b| b.url.clone()).collect()
}

#[test]
fn test_from_entities_indexes_in_order() {
    let list = setup();
    assert_eq!(list.len(), 3);
    assert_eq!(urls(&list), vec!["https://a.com", "https://b.com/Path", "https://c.com"]);
    assert!(list.contains("https://b.com/Path"));
    assert!(!list.contains("https://b.com/path"));
}

#[test]
fn test_first_write_wins_for_exact_url() {
    let mut list = setup();
    list.insert(&bookmark("9", "https://a.com"));
    assert_eq!(list.len(), 3);
    assert_eq!(list.get("https://a.com").map(|b| b.id.as_str()), Some("1"));
}

#[test]
fn test_case_insensitive_lookup_groups_spellings() {
    let mut list = setup();
    list.insert(&bookmark("4", "https://B.com/Path"));

    assert!(list.contains_case_insensitive("HTTPS://B.COM/PATH"));
    let ids: Vec<&str> = list
        .lowercased_items("https://b.com/path")
        .iter()
        .map(|b| b.id.as_str())
        .collect();
    assert_eq!(ids, vec!["2", "4"]);
}

#[test]
fn test_remove_drops_empty_lowercase_bucket() {
    let mut list = setup();
    list.remove(&bookmark("3", "https://c.com"));

    assert!(!list.contains("https://c.com"));
    assert!(!list.contains_case_insensitive("https://c.com"));
    assert!(list.lowercased_items("https://c.com").is_empty());
    assert_eq!(list.len(), 2);
}

#[test]
fn test_update_ignores_unknown_url_and_foreign_id() {
    let mut list = setup();
    let before = list.clone();

    list.update(&bookmark("1", "https://unknown.com"));
    assert_eq!(list, before);

    let mut impostor = bookmark("99", "https://a.com");
    impostor.title = "Changed".to_string();
    list.update(&impostor);
    assert_eq!(list, before);
}

#[test]
fn test_update_replaces_title_in_place() {
    let mut list = setup();
    let mut changed = bookmark("2", "https://b.com/Path");
    changed.title = "Renamed".to_string();
    changed.set_favorite(true);
    list.update(&changed);

    let item = list.get("https://b.com/Path").unwrap();
    assert_eq!(item.title, "Renamed");
    assert!(item.is_favorite);
    assert_eq!(list.lowercased_items("https://b.com/path")[0].title, "Renamed");
}

#[test]
fn test_update_url_rekeys_and_keeps_position() {
    let mut list = setup();
    let updated = list
        .update_url(&bookmark("2", "https://b.com/Path"), "https://new.com")
        .expect("url is free");

    assert_eq!(updated.url, "https://new.com");
    assert_eq!(updated.id, "2");
    assert!(!list.contains("https://b.com/Path"));
    assert!(list.lowercased_items("https://b.com/path").is_empty());
    assert_eq!(urls(&list), vec!["https://a.com", "https://new.com", "https://c.com"]);
}

#[test]
fn test_update_url_rejects_collision() {
    let mut list = setup();
    let before = list.clone();
    let result = list.update_url(&bookmark("2", "https://b.com/Path"), "https://a.com");
    assert!(result.is_none());
    assert_eq!(list, before);
}

#[test]
fn test_update_url_rejects_unindexed_bookmark() {
    let mut list = setup();
    assert!(list
        .update_url(&bookmark("7", "https://nowhere.com"), "https://x.com")
        .is_none());
}

#[test]
fn test_update_bookmark_changes_all_fields() {
    let mut list = setup();
    let updated = list
        .update_bookmark(&bookmark("1", "https://a.com"), "https://a2.com", "Alpha", true)
        .unwrap();
    assert_eq!(updated.title, "Alpha");
    assert!(updated.is_favorite);
    assert_eq!(
        list.get("https://a2.com"),
        Some(&IdentifiableBookmark::from(&updated))
    );
}

#[test]
fn test_all_hosts_are_distinct() {
    let mut list = setup();
    list.insert(&bookmark("5", "https://a.com/other"));
    let hosts = list.all_hosts();
    assert_eq!(hosts.len(), 3);
    assert!(hosts.contains("a.com"));
    assert!(hosts.contains("b.com"));
}

#[test]
fn test_identifiable_roundtrips_to_bookmark() {
    let original = Bookmark::new("x", "https://x.com", "X", true, Some("f1".to_string()));
    let item = IdentifiableBookmark::from(&original);
    assert_eq!(item.to_bookmark(), original);
}
