//! Presentation tree nodes.
//!
//! A [`BookmarkNode`] wraps one entity (or the synthetic root, or a spacer)
//! for display. Parents own their children; children hold a weak link back
//! so levels and index paths can be computed without reference cycles.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::bookmark::BookmarkEntity;

static NEXT_UNIQUE_ID: AtomicU64 = AtomicU64::new(1);

fn next_unique_id() -> u64 {
    NEXT_UNIQUE_ID.fetch_add(1, Ordering::Relaxed)
}

/// What a node stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Root,
    Entity(BookmarkEntity),
    /// Visual gap between sections. Never has children.
    Spacer,
}

struct NodeInner {
    unique_id: u64,
    content: NodeContent,
    parent: RefCell<Weak<NodeInner>>,
    children: RefCell<Vec<BookmarkNode>>,
}

/// Shared handle to a tree node.
#[derive(Clone)]
pub struct BookmarkNode(Rc<NodeInner>);

impl BookmarkNode {
    pub fn new(content: NodeContent, parent: Option<&BookmarkNode>) -> Self {
        Self::with_unique_id(content, parent, next_unique_id())
    }

    /// Builds a node with a caller-chosen id. Tests use this to compare trees.
    pub fn with_unique_id(content: NodeContent, parent: Option<&BookmarkNode>, unique_id: u64) -> Self {
        let parent = parent.map(|p| Rc::downgrade(&p.0)).unwrap_or_default();
        BookmarkNode(Rc::new(NodeInner {
            unique_id,
            content,
            parent: RefCell::new(parent),
            children: RefCell::new(Vec::new()),
        }))
    }

    pub fn generic_root_node() -> Self {
        Self::new(NodeContent::Root, None)
    }

    pub fn unique_id(&self) -> u64 {
        self.0.unique_id
    }

    pub fn content(&self) -> &NodeContent {
        &self.0.content
    }

    pub fn entity(&self) -> Option<&BookmarkEntity> {
        match &self.0.content {
            NodeContent::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self.0.content, NodeContent::Spacer)
    }

    pub fn can_have_child_nodes(&self) -> bool {
        match &self.0.content {
            NodeContent::Root => true,
            NodeContent::Entity(entity) => entity.is_folder(),
            NodeContent::Spacer => false,
        }
    }

    pub fn parent(&self) -> Option<BookmarkNode> {
        self.0.parent.borrow().upgrade().map(BookmarkNode)
    }

    /// Depth below the root. The root is level 0.
    pub fn level(&self) -> usize {
        self.parent().map_or(0, |p| p.level() + 1)
    }

    /// Position from the root: `[0]` for the root, `[0, i, ...]` below it.
    pub fn index_path(&self) -> Vec<usize> {
        match self.parent() {
            None => vec![0],
            Some(parent) => {
                let mut path = parent.index_path();
                path.push(parent.index_of_child(self).unwrap_or(0));
                path
            }
        }
    }

    pub fn child_nodes(&self) -> Vec<BookmarkNode> {
        self.0.children.borrow().clone()
    }

    /// Replaces the children, pointing each one back at this node.
    pub fn set_child_nodes(&self, children: Vec<BookmarkNode>) {
        for child in &children {
            *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        }
        *self.0.children.borrow_mut() = children;
    }

    pub fn number_of_child_nodes(&self) -> usize {
        self.0.children.borrow().len()
    }

    pub fn child_at_index(&self, index: usize) -> Option<BookmarkNode> {
        self.0.children.borrow().get(index).cloned()
    }

    pub fn index_of_child(&self, child: &BookmarkNode) -> Option<usize> {
        self.0
            .children
            .borrow()
            .iter()
            .position(|c| c.unique_id() == child.unique_id())
    }

    /// Direct child whose entity is structurally equal to `entity`.
    pub fn child_node_representing(&self, entity: &BookmarkEntity) -> Option<BookmarkNode> {
        self.0
            .children
            .borrow()
            .iter()
            .find(|c| c.represented_object_equals(entity))
            .cloned()
    }

    /// Any node below this one whose entity is structurally equal to `entity`.
    pub fn descendant_node_representing(&self, entity: &BookmarkEntity) -> Option<BookmarkNode> {
        for child in self.0.children.borrow().iter() {
            if child.represented_object_equals(entity) {
                return Some(child.clone());
            }
            if let Some(found) = child.descendant_node_representing(entity) {
                return Some(found);
            }
        }
        None
    }

    /// Any node below this one representing the entity with `id`.
    pub fn descendant_node_with_id(&self, id: &str) -> Option<BookmarkNode> {
        for child in self.0.children.borrow().iter() {
            if child.entity().is_some_and(|e| e.id() == id) {
                return Some(child.clone());
            }
            if let Some(found) = child.descendant_node_with_id(id) {
                return Some(found);
            }
        }
        None
    }

    pub fn represented_object_equals(&self, entity: &BookmarkEntity) -> bool {
        self.entity() == Some(entity)
    }

    pub fn represented_object_has_same_id(&self, entity: &BookmarkEntity) -> bool {
        self.entity().is_some_and(|e| e.has_same_id(entity))
    }

    /// Returns `true` if this node lies strictly above `node`.
    pub fn is_ancestor(&self, node: &BookmarkNode) -> bool {
        let mut cursor = node.parent();
        while let Some(current) = cursor {
            if current.unique_id() == self.unique_id() {
                return true;
            }
            cursor = current.parent();
        }
        false
    }

    /// Reuses the child representing `entity` or appends a new one.
    pub fn find_or_create_child_node(&self, entity: BookmarkEntity) -> BookmarkNode {
        if let Some(existing) = self.child_node_representing(&entity) {
            return existing;
        }
        let node = BookmarkNode::new(NodeContent::Entity(entity), Some(self));
        self.0.children.borrow_mut().push(node.clone());
        node
    }
}

impl PartialEq for BookmarkNode {
    fn eq(&self, other: &Self) -> bool {
        self.unique_id() == other.unique_id() && self.content() == other.content()
    }
}

impl fmt::Debug for BookmarkNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookmarkNode")
            .field("unique_id", &self.unique_id())
            .field("content", self.content())
            .field("children", &self.number_of_child_nodes())
            .finish()
    }
}
