//! Authoritative in-memory bookmark hierarchy.
//!
//! Entities are stored flat, keyed by id; folders reference their children by
//! id in display order. Every mutation returns the information needed to undo
//! it so a failed persistence call can be rolled back exactly.

use std::collections::{HashMap, HashSet};

use crate::types::bookmark::{normalized_parent, Bookmark, BookmarkEntity, BookmarkFolder};
use crate::types::errors::StructuralError;

#[derive(Debug, Clone, PartialEq)]
enum RecordKind {
    Bookmark { url: String, is_favorite: bool },
    Folder { children: Vec<String> },
}

#[derive(Debug, Clone, PartialEq)]
struct Record {
    id: String,
    title: String,
    parent: Option<String>,
    kind: RecordKind,
}

/// Undo information for [`EntityArena::remove`].
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedEntity {
    pub entity: BookmarkEntity,
    parent: Option<String>,
    index: usize,
    /// `(position, id)` pairs in ascending position order.
    favorite_positions: Vec<(usize, String)>,
}

/// Undo information for [`EntityArena::update_bookmark`].
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkUpdate {
    pub previous: Bookmark,
    favorite_index: Option<usize>,
}

/// Undo information for [`EntityArena::move_entities`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoveBatch {
    children_before: Vec<(Option<String>, Vec<String>)>,
    parents_before: Vec<(String, Option<String>)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityArena {
    records: HashMap<String, Record>,
    root_children: Vec<String>,
    favorites: Vec<String>,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the arena from a loaded forest.
    ///
    /// `favorites_order` lists favorite bookmark ids in display order; favorites
    /// missing from it are appended in tree order.
    pub fn from_entities(
        top_level: &[BookmarkEntity],
        favorites_order: &[String],
    ) -> Result<Self, StructuralError> {
        let mut arena = Self::new();
        for entity in top_level {
            if entity.parent_id().is_some() {
                return Err(StructuralError::ParentMismatch {
                    child_id: entity.id().to_string(),
                    folder_id: crate::types::bookmark::ROOT_FOLDER_ID.to_string(),
                });
            }
            arena.insert(entity.clone(), None, None)?;
        }

        let mut listed = HashSet::new();
        let mut ordered: Vec<String> = favorites_order
            .iter()
            .filter(|id| arena.is_favorite(id) && listed.insert(id.to_string()))
            .cloned()
            .collect();
        ordered.extend(arena.favorites.iter().filter(|id| !listed.contains(*id)).cloned());
        arena.favorites = ordered;
        Ok(arena)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn is_folder(&self, id: &str) -> bool {
        matches!(
            self.records.get(id).map(|r| &r.kind),
            Some(RecordKind::Folder { .. })
        )
    }

    fn is_favorite(&self, id: &str) -> bool {
        matches!(
            self.records.get(id).map(|r| &r.kind),
            Some(RecordKind::Bookmark {
                is_favorite: true,
                ..
            })
        )
    }

    /// Parent of `id` with the root collapsed to `None`. Outer `None` means unknown id.
    pub fn parent_of(&self, id: &str) -> Option<Option<&str>> {
        self.records.get(id).map(|r| r.parent.as_deref())
    }

    fn children(&self, parent: Option<&str>) -> Option<&Vec<String>> {
        match parent {
            None => Some(&self.root_children),
            Some(id) => match self.records.get(id).map(|r| &r.kind) {
                Some(RecordKind::Folder { children }) => Some(children),
                _ => None,
            },
        }
    }

    fn children_mut(&mut self, parent: Option<&str>) -> Result<&mut Vec<String>, StructuralError> {
        match parent {
            None => Ok(&mut self.root_children),
            Some(id) => match self.records.get_mut(id).map(|r| &mut r.kind) {
                Some(RecordKind::Folder { children }) => Ok(children),
                _ => Err(StructuralError::MissingParent(id.to_string())),
            },
        }
    }

    /// Inserts `entity` (with any subtree) under `parent` at `index`, or at the end.
    pub fn insert(
        &mut self,
        entity: BookmarkEntity,
        parent: Option<&str>,
        index: Option<usize>,
    ) -> Result<(), StructuralError> {
        let parent = normalized_parent(parent);
        if self.children(parent).is_none() {
            return Err(StructuralError::MissingParent(parent.unwrap_or_default().to_string()));
        }

        let mut incoming = HashSet::new();
        collect_ids(&entity, &mut incoming)?;
        if let Some(id) = incoming.iter().find(|id| self.records.contains_key(id.as_str())) {
            return Err(StructuralError::DuplicateId(id.to_string()));
        }

        let id = entity.id().to_string();
        self.insert_records(entity, parent.map(str::to_string));
        let siblings = self.children_mut(parent)?;
        let index = index.unwrap_or(siblings.len()).min(siblings.len());
        siblings.insert(index, id);
        Ok(())
    }

    fn insert_records(&mut self, entity: BookmarkEntity, parent: Option<String>) {
        match entity {
            BookmarkEntity::Bookmark(bookmark) => {
                if bookmark.is_favorite {
                    self.favorites.push(bookmark.id.clone());
                }
                self.records.insert(
                    bookmark.id.clone(),
                    Record {
                        id: bookmark.id,
                        title: bookmark.title,
                        parent,
                        kind: RecordKind::Bookmark {
                            url: bookmark.url,
                            is_favorite: bookmark.is_favorite,
                        },
                    },
                );
            }
            BookmarkEntity::Folder(folder) => {
                let children = folder.children.iter().map(|c| c.id().to_string()).collect();
                self.records.insert(
                    folder.id.clone(),
                    Record {
                        id: folder.id.clone(),
                        title: folder.title,
                        parent,
                        kind: RecordKind::Folder { children },
                    },
                );
                for child in folder.children {
                    self.insert_records(child, Some(folder.id.clone()));
                }
            }
        }
    }

    /// Detaches `id` and its whole subtree.
    pub fn remove(&mut self, id: &str) -> Option<RemovedEntity> {
        let entity = self.entity(id)?;
        let parent = self.records.get(id)?.parent.clone();
        let siblings = self.children_mut(parent.as_deref()).ok()?;
        let index = siblings.iter().position(|c| c == id)?;
        siblings.remove(index);

        let mut subtree = HashSet::new();
        self.collect_subtree(id, &mut subtree);
        let favorite_positions = self
            .favorites
            .iter()
            .enumerate()
            .filter(|(_, fav)| subtree.contains(fav.as_str()))
            .map(|(pos, fav)| (pos, fav.clone()))
            .collect();
        self.favorites.retain(|fav| !subtree.contains(fav.as_str()));
        for removed in &subtree {
            self.records.remove(removed);
        }

        Some(RemovedEntity {
            entity,
            parent,
            index,
            favorite_positions,
        })
    }

    /// Puts a removed subtree back exactly where it was.
    pub fn restore(&mut self, removed: RemovedEntity) -> Result<(), StructuralError> {
        let RemovedEntity {
            entity,
            parent,
            index,
            favorite_positions,
        } = removed;
        let favorites_before = self.favorites.clone();
        self.insert(entity, parent.as_deref(), Some(index))?;
        self.favorites = favorites_before;
        for (position, id) in favorite_positions {
            let position = position.min(self.favorites.len());
            self.favorites.insert(position, id);
        }
        Ok(())
    }

    fn collect_subtree(&self, id: &str, out: &mut HashSet<String>) {
        out.insert(id.to_string());
        if let Some(RecordKind::Folder { children }) = self.records.get(id).map(|r| &r.kind) {
            for child in children {
                self.collect_subtree(child, out);
            }
        }
    }

    /// Overwrites url, title and favorite state of an existing bookmark.
    pub fn update_bookmark(&mut self, bookmark: &Bookmark) -> Option<BookmarkUpdate> {
        let previous = self.bookmark(&bookmark.id)?;
        let favorite_index = self.favorites.iter().position(|f| f == &bookmark.id);

        let record = self.records.get_mut(&bookmark.id)?;
        record.title = bookmark.title.clone();
        record.kind = RecordKind::Bookmark {
            url: bookmark.url.clone(),
            is_favorite: bookmark.is_favorite,
        };

        match (previous.is_favorite, bookmark.is_favorite) {
            (true, false) => self.favorites.retain(|f| f != &bookmark.id),
            (false, true) => self.favorites.push(bookmark.id.clone()),
            _ => {}
        }

        Some(BookmarkUpdate {
            previous,
            favorite_index,
        })
    }

    pub fn revert_update(&mut self, update: BookmarkUpdate) {
        let BookmarkUpdate {
            previous,
            favorite_index,
        } = update;
        let Some(record) = self.records.get_mut(&previous.id) else {
            return;
        };
        record.title = previous.title.clone();
        record.kind = RecordKind::Bookmark {
            url: previous.url.clone(),
            is_favorite: previous.is_favorite,
        };

        self.favorites.retain(|f| f != &previous.id);
        if let Some(index) = favorite_index {
            let index = index.min(self.favorites.len());
            self.favorites.insert(index, previous.id);
        }
    }

    /// Renames a folder, returning the old title.
    pub fn rename_folder(&mut self, id: &str, title: &str) -> Option<String> {
        let record = self.records.get_mut(id)?;
        if !matches!(record.kind, RecordKind::Folder { .. }) {
            return None;
        }
        Some(std::mem::replace(&mut record.title, title.to_string()))
    }

    /// Returns `true` if placing `id` under `new_parent` would make it its own ancestor.
    pub fn would_create_cycle(&self, id: &str, new_parent: Option<&str>) -> bool {
        let mut cursor = normalized_parent(new_parent);
        let mut visited = HashSet::new();
        while let Some(current) = cursor {
            if current == id {
                return true;
            }
            if !visited.insert(current) {
                return true;
            }
            cursor = self
                .records
                .get(current)
                .and_then(|r| normalized_parent(r.parent.as_deref()));
        }
        false
    }

    /// Relocates `ids` as one contiguous block under `new_parent`.
    ///
    /// `index` is a position in the destination as it looked before the move;
    /// `None` appends. Unknown ids are skipped. Nothing changes on error.
    pub fn move_entities(
        &mut self,
        ids: &[String],
        new_parent: Option<&str>,
        index: Option<usize>,
    ) -> Result<MoveBatch, StructuralError> {
        let new_parent = normalized_parent(new_parent);
        let Some(destination) = self.children(new_parent).cloned() else {
            return Err(StructuralError::MissingParent(
                new_parent.unwrap_or_default().to_string(),
            ));
        };

        let mut moving: Vec<String> = Vec::new();
        for id in ids {
            if self.contains(id) && !moving.contains(id) {
                moving.push(id.clone());
            }
        }
        if let Some(id) = moving.iter().find(|id| self.would_create_cycle(id, new_parent)) {
            return Err(StructuralError::CycleDetected {
                folder_id: id.clone(),
                parent_id: new_parent.unwrap_or_default().to_string(),
            });
        }

        let mut affected: Vec<Option<String>> = vec![new_parent.map(str::to_string)];
        let mut parents_before = Vec::with_capacity(moving.len());
        for id in &moving {
            let parent = self.records.get(id).and_then(|r| r.parent.clone());
            if !affected.contains(&parent) {
                affected.push(parent.clone());
            }
            parents_before.push((id.clone(), parent));
        }
        let children_before = affected
            .iter()
            .filter_map(|p| self.children(p.as_deref()).map(|c| (p.clone(), c.clone())))
            .collect();

        let target = index.unwrap_or(destination.len()).min(destination.len());
        let shift = destination[..target]
            .iter()
            .filter(|c| moving.contains(c))
            .count();

        for (id, parent) in &parents_before {
            if let Ok(siblings) = self.children_mut(parent.as_deref()) {
                siblings.retain(|c| c != id);
            }
        }
        let siblings = self.children_mut(new_parent)?;
        let at = (target - shift).min(siblings.len());
        siblings.splice(at..at, moving.iter().cloned());
        for id in &moving {
            if let Some(record) = self.records.get_mut(id) {
                record.parent = new_parent.map(str::to_string);
            }
        }

        Ok(MoveBatch {
            children_before,
            parents_before,
        })
    }

    pub fn revert_moves(&mut self, batch: MoveBatch) {
        for (parent, children) in batch.children_before {
            if let Ok(siblings) = self.children_mut(parent.as_deref()) {
                *siblings = children;
            }
        }
        for (id, parent) in batch.parents_before {
            if let Some(record) = self.records.get_mut(&id) {
                record.parent = parent;
            }
        }
    }

    /// Reorders favorites, placing `ids` as a block at `index`. Returns the previous order.
    pub fn move_favorites(&mut self, ids: &[String], index: Option<usize>) -> Vec<String> {
        let previous = self.favorites.clone();
        let mut moving: Vec<String> = Vec::new();
        for id in ids {
            if self.favorites.contains(id) && !moving.contains(id) {
                moving.push(id.clone());
            }
        }
        let target = index.unwrap_or(self.favorites.len()).min(self.favorites.len());
        let shift = self.favorites[..target]
            .iter()
            .filter(|f| moving.contains(f))
            .count();
        self.favorites.retain(|f| !moving.contains(f));
        let at = (target - shift).min(self.favorites.len());
        self.favorites.splice(at..at, moving);
        previous
    }

    pub fn restore_favorites_order(&mut self, order: Vec<String>) {
        self.favorites = order;
    }

    /// Materializes the entity `id` with its subtree.
    pub fn entity(&self, id: &str) -> Option<BookmarkEntity> {
        let record = self.records.get(id)?;
        Some(match &record.kind {
            RecordKind::Bookmark { url, is_favorite } => BookmarkEntity::Bookmark(Bookmark::new(
                record.id.clone(),
                url.clone(),
                record.title.clone(),
                *is_favorite,
                record.parent.clone(),
            )),
            RecordKind::Folder { children } => BookmarkEntity::Folder(
                BookmarkFolder::new(record.id.clone(), record.title.clone(), record.parent.clone())
                    .with_children(children.iter().filter_map(|c| self.entity(c)).collect()),
            ),
        })
    }

    pub fn bookmark(&self, id: &str) -> Option<Bookmark> {
        match self.entity(id)? {
            BookmarkEntity::Bookmark(bookmark) => Some(bookmark),
            BookmarkEntity::Folder(_) => None,
        }
    }

    pub fn folder(&self, id: &str) -> Option<BookmarkFolder> {
        match self.entity(id)? {
            BookmarkEntity::Folder(folder) => Some(folder),
            BookmarkEntity::Bookmark(_) => None,
        }
    }

    pub fn top_level_entities(&self) -> Vec<BookmarkEntity> {
        self.root_children
            .iter()
            .filter_map(|id| self.entity(id))
            .collect()
    }

    /// All bookmarks in depth-first display order.
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        let mut out = Vec::new();
        self.collect_bookmarks(&self.root_children, &mut out);
        out
    }

    fn collect_bookmarks(&self, ids: &[String], out: &mut Vec<Bookmark>) {
        for id in ids {
            let Some(record) = self.records.get(id) else {
                continue;
            };
            match &record.kind {
                RecordKind::Bookmark { .. } => out.extend(self.bookmark(id)),
                RecordKind::Folder { children } => self.collect_bookmarks(children, out),
            }
        }
    }

    pub fn favorites(&self) -> Vec<Bookmark> {
        self.favorites.iter().filter_map(|id| self.bookmark(id)).collect()
    }

    pub fn favorite_ids(&self) -> &[String] {
        &self.favorites
    }
}

fn collect_ids(entity: &BookmarkEntity, out: &mut HashSet<String>) -> Result<(), StructuralError> {
    if !out.insert(entity.id().to_string()) {
        return Err(StructuralError::DuplicateId(entity.id().to_string()));
    }
    if let BookmarkEntity::Folder(folder) = entity {
        for child in &folder.children {
            if child.parent_id() != Some(folder.id.as_str()) {
                return Err(StructuralError::ParentMismatch {
                    child_id: child.id().to_string(),
                    folder_id: folder.id.clone(),
                });
            }
            collect_ids(child, out)?;
        }
    }
    Ok(())
}
