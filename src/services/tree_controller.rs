//! Tree controller over bookmark nodes.
//!
//! The controller owns the root node and asks a [`TreeDataSource`] for the
//! children of an expandable node the first time they are needed. Subtrees
//! nobody has opened are never materialized.

use std::cell::RefCell;
use std::collections::HashSet;

use crate::managers::bookmark_manager::BookmarksSnapshot;
use crate::services::bookmark_node::{BookmarkNode, NodeContent};
use crate::types::bookmark::{BookmarkEntity, SortMode};

/// Supplies child nodes for a node of the tree.
pub trait TreeDataSource {
    fn child_nodes(&self, node: &BookmarkNode, sort_mode: SortMode) -> Vec<BookmarkNode>;
}

/// Which entities the sidebar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentMode {
    FoldersOnly,
    FoldersAndBookmarks,
}

/// Data source backed by a published bookmark snapshot.
pub struct BookmarkSidebarDataSource {
    top_level: Vec<BookmarkEntity>,
    content_mode: ContentMode,
}

impl BookmarkSidebarDataSource {
    pub fn new(top_level: Vec<BookmarkEntity>, content_mode: ContentMode) -> Self {
        Self {
            top_level,
            content_mode,
        }
    }

    pub fn from_snapshot(snapshot: &BookmarksSnapshot, content_mode: ContentMode) -> Self {
        Self::new(snapshot.list.top_level_entities().to_vec(), content_mode)
    }

    fn visible(&self, entities: &[BookmarkEntity]) -> Vec<BookmarkEntity> {
        entities
            .iter()
            .filter(|e| self.content_mode == ContentMode::FoldersAndBookmarks || e.is_folder())
            .cloned()
            .collect()
    }
}

impl TreeDataSource for BookmarkSidebarDataSource {
    fn child_nodes(&self, node: &BookmarkNode, sort_mode: SortMode) -> Vec<BookmarkNode> {
        let entities = match node.content() {
            NodeContent::Root => self.visible(&self.top_level),
            NodeContent::Entity(BookmarkEntity::Folder(folder)) => self.visible(&folder.children),
            _ => return Vec::new(),
        };
        sort_mode
            .sort(entities)
            .into_iter()
            .map(|entity| match node.child_node_representing(&entity) {
                Some(existing) => existing,
                None => BookmarkNode::new(NodeContent::Entity(entity), Some(node)),
            })
            .collect()
    }
}

pub struct BookmarkTreeController<D: TreeDataSource> {
    data_source: D,
    root: BookmarkNode,
    sort_mode: SortMode,
    /// Unique ids of nodes whose children have been fetched.
    loaded: RefCell<HashSet<u64>>,
}

impl<D: TreeDataSource> BookmarkTreeController<D> {
    /// Creates the controller with the root's children loaded.
    pub fn new(data_source: D, sort_mode: SortMode) -> Self {
        let controller = Self {
            data_source,
            root: BookmarkNode::generic_root_node(),
            sort_mode,
            loaded: RefCell::new(HashSet::new()),
        };
        controller.child_nodes(&controller.root);
        controller
    }

    pub fn data_source(&self) -> &D {
        &self.data_source
    }

    pub fn root_node(&self) -> &BookmarkNode {
        &self.root
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) {
        self.sort_mode = sort_mode;
        self.rebuild();
    }

    /// Replaces the data source and rebuilds, reusing nodes for unchanged entities.
    pub fn set_data_source(&mut self, data_source: D) {
        self.data_source = data_source;
        self.rebuild();
    }

    /// Children of `node`, fetched from the data source on first access.
    pub fn child_nodes(&self, node: &BookmarkNode) -> Vec<BookmarkNode> {
        let first_access =
            node.can_have_child_nodes() && self.loaded.borrow_mut().insert(node.unique_id());
        if first_access {
            node.set_child_nodes(self.data_source.child_nodes(node, self.sort_mode));
        }
        node.child_nodes()
    }

    pub fn is_loaded(&self, node: &BookmarkNode) -> bool {
        self.loaded.borrow().contains(&node.unique_id())
    }

    /// Refetches the children of every node loaded so far.
    ///
    /// Nodes replaced because their entity changed start out unloaded.
    pub fn rebuild(&self) {
        let mut previously = std::mem::take(&mut *self.loaded.borrow_mut());
        previously.insert(self.root.unique_id());
        self.reload(&self.root, &previously);
    }

    fn reload(&self, node: &BookmarkNode, previously: &HashSet<u64>) {
        if !previously.contains(&node.unique_id()) {
            return;
        }
        for child in self.child_nodes(node) {
            self.reload(&child, previously);
        }
    }

    /// Depth-first lookup of the node representing the entity with `entity`'s id.
    pub fn node(&self, representing: &BookmarkEntity) -> Option<BookmarkNode> {
        self.node_with_id(representing.id())
    }

    /// Depth-first lookup by entity id, loading subtrees as the search descends.
    pub fn node_with_id(&self, id: &str) -> Option<BookmarkNode> {
        let mut stack = vec![self.root.clone()];
        while let Some(node) = stack.pop() {
            if node.entity().is_some_and(|e| e.id() == id) {
                return Some(node);
            }
            let mut children = self.child_nodes(&node);
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// Calls `visitor` for every node in pre-order, starting with the root.
    pub fn visit_nodes<F: FnMut(&BookmarkNode)>(&self, mut visitor: F) {
        fn walk<D: TreeDataSource, F: FnMut(&BookmarkNode)>(
            controller: &BookmarkTreeController<D>,
            node: &BookmarkNode,
            visitor: &mut F,
        ) {
            visitor(node);
            for child in controller.child_nodes(node) {
                walk(controller, &child, visitor);
            }
        }
        walk(self, &self.root, &mut visitor);
    }
}

/// Remembers which folders are expanded across rebuilds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpansionState {
    expanded: HashSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expand(&mut self, node: &BookmarkNode) {
        if let Some(entity) = node.entity().filter(|e| e.is_folder()) {
            self.expanded.insert(entity.id().to_string());
        }
    }

    pub fn collapse(&mut self, node: &BookmarkNode) {
        if let Some(entity) = node.entity() {
            self.expanded.remove(entity.id());
        }
    }

    /// Ids of the expanded folders.
    pub fn expanded_ids(&self) -> &HashSet<String> {
        &self.expanded
    }

    pub fn is_expanded(&self, node: &BookmarkNode) -> bool {
        node.is_root() || node.entity().is_some_and(|e| self.expanded.contains(e.id()))
    }

    /// Nodes visible with the current expansion, root excluded.
    ///
    /// Only expanded folders have their children loaded.
    pub fn visible_nodes<D: TreeDataSource>(
        &self,
        controller: &BookmarkTreeController<D>,
    ) -> Vec<BookmarkNode> {
        let mut visible = Vec::new();
        let mut stack: Vec<BookmarkNode> = controller.child_nodes(controller.root_node());
        stack.reverse();
        while let Some(node) = stack.pop() {
            if self.is_expanded(&node) {
                let mut children = controller.child_nodes(&node);
                children.reverse();
                stack.extend(children);
            }
            visible.push(node);
        }
        visible
    }
}
