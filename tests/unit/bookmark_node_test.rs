//! Unit tests for presentation tree nodes.

use bookmark_core::services::bookmark_node::{BookmarkNode, NodeContent};
use bookmark_core::types::bookmark::{Bookmark, BookmarkEntity, BookmarkFolder};

fn bookmark(id: &str, title: &str) -> BookmarkEntity {
    Bookmark::new(id, format!("https://{}.com", id), title, false, None).into()
}

fn folder(id: &str, title: &str) -> BookmarkEntity {
    BookmarkFolder::new(id, title, None).into()
}

fn child(parent: &BookmarkNode, entity: BookmarkEntity) -> BookmarkNode {
    let node = BookmarkNode::new(NodeContent::Entity(entity), Some(parent));
    let mut children = parent.child_nodes();
    children.push(node.clone());
    parent.set_child_nodes(children);
    node
}

#[test]
fn test_generic_root_node() {
    let root = BookmarkNode::generic_root_node();
    assert!(root.is_root());
    assert!(root.parent().is_none());
    assert_eq!(root.level(), 0);
    assert_eq!(root.content(), &NodeContent::Root);
    assert!(root.can_have_child_nodes());
}

#[test]
fn test_each_node_has_unique_id() {
    let a = BookmarkNode::generic_root_node();
    let b = BookmarkNode::generic_root_node();
    assert_ne!(a.unique_id(), b.unique_id());
}

#[test]
fn test_levels_increase_with_depth() {
    let root = BookmarkNode::generic_root_node();
    let first = child(&root, folder("f1", "One"));
    let second = child(&first, folder("f2", "Two"));
    let third = child(&second, bookmark("b1", "Three"));

    assert!(!first.is_root());
    assert_eq!(first.level(), 1);
    assert_eq!(second.level(), 2);
    assert_eq!(third.level(), 3);
}

#[test]
fn test_child_access_by_index() {
    let root = BookmarkNode::generic_root_node();
    let a = child(&root, bookmark("a", "A"));
    let b = child(&root, bookmark("b", "B"));
    let stranger = BookmarkNode::new(NodeContent::Entity(bookmark("c", "C")), None);

    assert_eq!(root.number_of_child_nodes(), 2);
    assert_eq!(root.index_of_child(&a), Some(0));
    assert_eq!(root.index_of_child(&b), Some(1));
    assert_eq!(root.index_of_child(&stranger), None);
    assert_eq!(root.child_at_index(1), Some(b));
    assert_eq!(root.child_at_index(5), None);
}

#[test]
fn test_index_paths() {
    let root = BookmarkNode::generic_root_node();
    assert_eq!(root.index_path(), vec![0]);

    let _a = child(&root, folder("a", "A"));
    let b = child(&root, folder("b", "B"));
    let _b0 = child(&b, bookmark("b0", "B0"));
    let b1 = child(&b, bookmark("b1", "B1"));

    assert_eq!(b.index_path(), vec![0, 1]);
    assert_eq!(b1.index_path(), vec![0, 1, 1]);
}

#[test]
fn test_child_node_representing_only_looks_one_level_down() {
    let root = BookmarkNode::generic_root_node();
    let outer = child(&root, folder("f1", "Outer"));
    let nested = bookmark("b1", "Nested");
    child(&outer, nested.clone());

    assert!(root.child_node_representing(&folder("f1", "Outer")).is_some());
    assert!(root.child_node_representing(&nested).is_none());
    assert!(root.descendant_node_representing(&nested).is_some());
    assert!(root.descendant_node_with_id("b1").is_some());
    assert!(root.descendant_node_with_id("missing").is_none());
}

#[test]
fn test_is_ancestor_is_strict() {
    let root = BookmarkNode::generic_root_node();
    let outer = child(&root, folder("f1", "Outer"));
    let inner = child(&outer, bookmark("b1", "Inner"));

    assert!(!outer.is_ancestor(&outer));
    assert!(outer.is_ancestor(&inner));
    assert!(root.is_ancestor(&inner));
    assert!(!inner.is_ancestor(&outer));
}

#[test]
fn test_represented_object_comparisons() {
    let node = BookmarkNode::new(NodeContent::Entity(bookmark("b1", "Title")), None);
    assert!(node.represented_object_equals(&bookmark("b1", "Title")));
    assert!(!node.represented_object_equals(&bookmark("b1", "Renamed")));
    assert!(node.represented_object_has_same_id(&bookmark("b1", "Renamed")));
    assert!(!node.represented_object_has_same_id(&bookmark("b2", "Title")));
}

#[test]
fn test_find_or_create_child_node() {
    let root = BookmarkNode::generic_root_node();
    let existing = child(&root, bookmark("b1", "One"));

    let found = root.find_or_create_child_node(bookmark("b1", "One"));
    assert_eq!(found, existing);
    assert_eq!(root.number_of_child_nodes(), 1);

    let created = root.find_or_create_child_node(bookmark("b2", "Two"));
    assert_eq!(root.number_of_child_nodes(), 2);
    assert_eq!(created.parent(), Some(root.clone()));
}

#[test]
fn test_equality_needs_same_id_and_content() {
    let entity = bookmark("b1", "One");
    let a = BookmarkNode::with_unique_id(NodeContent::Entity(entity.clone()), None, 1_000);
    let b = BookmarkNode::with_unique_id(NodeContent::Entity(entity.clone()), None, 1_000);
    let other_id = BookmarkNode::with_unique_id(NodeContent::Entity(entity), None, 1_001);
    let other_title =
        BookmarkNode::with_unique_id(NodeContent::Entity(bookmark("b1", "Uno")), None, 1_000);

    assert_eq!(a, b);
    assert_ne!(a, other_id);
    assert_ne!(a, other_title);
}

#[test]
fn test_folder_equality_includes_children() {
    let empty = folder("f1", "Folder");
    let filled: BookmarkEntity = BookmarkFolder::new("f1", "Folder", None)
        .with_children(vec![Bookmark::new(
            "b1",
            "https://b1.com",
            "B1",
            false,
            Some("f1".to_string()),
        )
        .into()])
        .into();
    let a = BookmarkNode::with_unique_id(NodeContent::Entity(empty), None, 7);
    let b = BookmarkNode::with_unique_id(NodeContent::Entity(filled), None, 7);
    assert_ne!(a, b);
}

#[test]
fn test_spacer_and_bookmark_nodes_have_no_children() {
    let spacer = BookmarkNode::new(NodeContent::Spacer, None);
    assert!(spacer.is_spacer());
    assert!(!spacer.can_have_child_nodes());

    let leaf = BookmarkNode::new(NodeContent::Entity(bookmark("b1", "One")), None);
    assert!(!leaf.can_have_child_nodes());
    assert!(BookmarkNode::new(NodeContent::Entity(folder("f1", "F")), None).can_have_child_nodes());
}
