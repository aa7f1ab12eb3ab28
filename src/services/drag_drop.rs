//! Drop validation and execution for dragged bookmark entities.

use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait, BookmarkStore, FaviconManagement};
use crate::services::bookmark_node::{BookmarkNode, NodeContent};
use crate::types::bookmark::{BookmarkEntity, ParentFolder};
use crate::types::errors::BookmarkError;
use crate::types::pasteboard::PasteboardEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOperation {
    None,
    Move,
}

/// Destination folder for a drop on `destination`, or `None` if it cannot accept children.
fn destination_parent(destination: &BookmarkNode) -> Option<ParentFolder> {
    match destination.content() {
        NodeContent::Root => Some(ParentFolder::Root),
        NodeContent::Entity(BookmarkEntity::Folder(folder)) => {
            Some(ParentFolder::from_id(Some(folder.id.as_str())))
        }
        _ => None,
    }
}

/// Decides whether `dragged` may be dropped onto `destination`.
///
/// A folder can not be dropped onto itself or into its own subtree.
pub fn validate_drop(dragged: &[PasteboardEntity], destination: &BookmarkNode) -> DragOperation {
    let Some(parent) = destination_parent(destination) else {
        return DragOperation::None;
    };
    if dragged.is_empty() {
        return DragOperation::None;
    }

    let mut ancestors = Vec::new();
    let mut cursor = destination.parent();
    while let Some(node) = cursor {
        ancestors.extend(node.entity().map(|e| e.id().to_string()));
        cursor = node.parent();
    }

    for entity in dragged.iter().filter(|e| e.is_folder()) {
        if parent.id() == Some(entity.id()) || ancestors.iter().any(|id| id == entity.id()) {
            return DragOperation::None;
        }
    }
    DragOperation::Move
}

/// Validates and performs a drop, moving the dragged entities to `index`
/// inside `destination` (or appending when `index` is `None`).
///
/// Returns `Ok(false)` when the drop was rejected.
pub fn accept_drop<S: BookmarkStore, F: FaviconManagement>(
    manager: &mut BookmarkManager<S, F>,
    dragged: &[PasteboardEntity],
    destination: &BookmarkNode,
    index: Option<usize>,
) -> Result<bool, BookmarkError> {
    if validate_drop(dragged, destination) == DragOperation::None {
        log::debug!("event=drop_rejected module=drag_drop status=skipped");
        return Ok(false);
    }
    let Some(parent) = destination_parent(destination) else {
        return Ok(false);
    };
    let ids: Vec<String> = dragged.iter().map(|e| e.id().to_string()).collect();
    manager.move_objects(&ids, index, &parent)?;
    Ok(true)
}
