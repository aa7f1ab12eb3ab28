//! Bookmark entity model.
//!
//! A bookmark store holds a forest of [`BookmarkEntity`] values: leaf
//! [`Bookmark`]s and [`BookmarkFolder`]s that own an ordered list of children.
//! Two synthetic containers exist outside the user-visible hierarchy: the
//! bookmarks root ([`ROOT_FOLDER_ID`]) and the favorites root
//! ([`FAVORITES_FOLDER_ID`]).

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::errors::StructuralError;

/// Identifier of the synthetic bookmarks root container.
pub const ROOT_FOLDER_ID: &str = "bookmarks_root";

/// Identifier of the synthetic favorites container.
pub const FAVORITES_FOLDER_ID: &str = "favorites_root";

/// Returns `true` if `id` names one of the two synthetic containers.
pub fn is_synthetic_root(id: &str) -> bool {
    id == ROOT_FOLDER_ID || id == FAVORITES_FOLDER_ID
}

/// Collapses the explicit root id to "no parent" so both spellings compare equal.
pub(crate) fn normalized_parent(parent: Option<&str>) -> Option<&str> {
    match parent {
        Some(ROOT_FOLDER_ID) | None => None,
        Some(id) => Some(id),
    }
}

/// A saved web address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub is_favorite: bool,
    pub parent_folder_id: Option<String>,
    /// Set to [`FAVORITES_FOLDER_ID`] exactly when `is_favorite` is true.
    pub favorites_folder_id: Option<String>,
}

impl Bookmark {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        is_favorite: bool,
        parent_folder_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            is_favorite,
            parent_folder_id,
            favorites_folder_id: is_favorite.then(|| FAVORITES_FOLDER_ID.to_string()),
        }
    }

    /// Creates a bookmark with a freshly generated id.
    pub fn with_new_id(
        url: impl Into<String>,
        title: impl Into<String>,
        is_favorite: bool,
        parent_folder_id: Option<String>,
    ) -> Self {
        Self::new(
            uuid::Uuid::new_v4().to_string(),
            url,
            title,
            is_favorite,
            parent_folder_id,
        )
    }

    /// Flips favorite membership, keeping the favorites pointer in sync.
    pub fn set_favorite(&mut self, is_favorite: bool) {
        self.is_favorite = is_favorite;
        self.favorites_folder_id = is_favorite.then(|| FAVORITES_FOLDER_ID.to_string());
    }

    /// Returns a copy of this bookmark pointing at `url`.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        normalized_parent(self.parent_folder_id.as_deref())
    }

    fn validate(&self) -> Result<(), StructuralError> {
        let consistent = match (self.is_favorite, self.favorites_folder_id.as_deref()) {
            (true, Some(FAVORITES_FOLDER_ID)) | (false, None) => true,
            _ => false,
        };
        if consistent {
            Ok(())
        } else {
            Err(StructuralError::InvalidFavoritesFolder(self.id.clone()))
        }
    }
}

impl PartialEq for Bookmark {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.url == other.url
            && self.title == other.title
            && self.is_favorite == other.is_favorite
            && self.parent_id() == other.parent_id()
    }
}

impl Eq for Bookmark {}

/// A container of bookmarks and other folders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkFolder {
    pub id: String,
    pub title: String,
    pub parent_folder_id: Option<String>,
    #[serde(default)]
    pub children: Vec<BookmarkEntity>,
}

impl BookmarkFolder {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        parent_folder_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            parent_folder_id,
            children: Vec::new(),
        }
    }

    pub fn with_new_id(title: impl Into<String>, parent_folder_id: Option<String>) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), title, parent_folder_id)
    }

    pub fn with_children(mut self, children: Vec<BookmarkEntity>) -> Self {
        self.children = children;
        self
    }

    /// The synthetic root container holding `children` as top-level entities.
    pub fn root(children: Vec<BookmarkEntity>) -> Self {
        Self::new(ROOT_FOLDER_ID, "Bookmarks", None).with_children(children)
    }

    pub fn parent_id(&self) -> Option<&str> {
        normalized_parent(self.parent_folder_id.as_deref())
    }

    pub fn child_bookmarks(&self) -> impl Iterator<Item = &Bookmark> {
        self.children.iter().filter_map(BookmarkEntity::as_bookmark)
    }

    pub fn child_folders(&self) -> impl Iterator<Item = &BookmarkFolder> {
        self.children.iter().filter_map(BookmarkEntity::as_folder)
    }

    /// Number of bookmarks in the whole subtree.
    pub fn total_bookmarks(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                BookmarkEntity::Bookmark(_) => 1,
                BookmarkEntity::Folder(folder) => folder.total_bookmarks(),
            })
            .sum()
    }

    /// Checks the subtree rooted here for structural consistency.
    ///
    /// Every child must point back at this folder, ids must be unique, and a
    /// folder must never appear beneath itself.
    pub fn validate(&self) -> Result<(), StructuralError> {
        let mut seen = HashSet::new();
        let mut ancestors = Vec::new();
        self.validate_subtree(&mut seen, &mut ancestors)
    }

    fn validate_subtree<'a>(
        &'a self,
        seen: &mut HashSet<&'a str>,
        ancestors: &mut Vec<&'a str>,
    ) -> Result<(), StructuralError> {
        if ancestors.contains(&self.id.as_str()) {
            return Err(StructuralError::CycleDetected {
                folder_id: self.id.clone(),
                parent_id: ancestors.last().map(|id| id.to_string()).unwrap_or_default(),
            });
        }
        if !seen.insert(self.id.as_str()) {
            return Err(StructuralError::DuplicateId(self.id.clone()));
        }

        let own_id = normalized_parent(Some(self.id.as_str()));
        ancestors.push(self.id.as_str());
        for child in &self.children {
            if child.parent_id() != own_id {
                return Err(StructuralError::ParentMismatch {
                    child_id: child.id().to_string(),
                    folder_id: self.id.clone(),
                });
            }
            match child {
                BookmarkEntity::Bookmark(bookmark) => {
                    bookmark.validate()?;
                    if !seen.insert(bookmark.id.as_str()) {
                        return Err(StructuralError::DuplicateId(bookmark.id.clone()));
                    }
                }
                BookmarkEntity::Folder(folder) => folder.validate_subtree(seen, ancestors)?,
            }
        }
        ancestors.pop();
        Ok(())
    }
}

impl PartialEq for BookmarkFolder {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.parent_id() == other.parent_id()
            && self.children == other.children
    }
}

impl Eq for BookmarkFolder {}

/// Either kind of node in the bookmark hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BookmarkEntity {
    Bookmark(Bookmark),
    Folder(BookmarkFolder),
}

impl BookmarkEntity {
    pub fn id(&self) -> &str {
        match self {
            BookmarkEntity::Bookmark(b) => &b.id,
            BookmarkEntity::Folder(f) => &f.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            BookmarkEntity::Bookmark(b) => &b.title,
            BookmarkEntity::Folder(f) => &f.title,
        }
    }

    /// Parent id with the root collapsed to `None`.
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            BookmarkEntity::Bookmark(b) => b.parent_id(),
            BookmarkEntity::Folder(f) => f.parent_id(),
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, BookmarkEntity::Folder(_))
    }

    pub fn as_bookmark(&self) -> Option<&Bookmark> {
        match self {
            BookmarkEntity::Bookmark(b) => Some(b),
            BookmarkEntity::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&BookmarkFolder> {
        match self {
            BookmarkEntity::Folder(f) => Some(f),
            BookmarkEntity::Bookmark(_) => None,
        }
    }

    /// Compares ids only, ignoring every other field.
    pub fn has_same_id(&self, other: &BookmarkEntity) -> bool {
        self.id() == other.id()
    }

    /// Checks this entity and, for folders, its whole subtree.
    pub fn validate(&self) -> Result<(), StructuralError> {
        match self {
            BookmarkEntity::Bookmark(bookmark) => bookmark.validate(),
            BookmarkEntity::Folder(folder) => folder.validate(),
        }
    }
}

impl From<Bookmark> for BookmarkEntity {
    fn from(bookmark: Bookmark) -> Self {
        BookmarkEntity::Bookmark(bookmark)
    }
}

impl From<BookmarkFolder> for BookmarkEntity {
    fn from(folder: BookmarkFolder) -> Self {
        BookmarkEntity::Folder(folder)
    }
}

/// Destination container for create and move operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParentFolder {
    Root,
    Parent(String),
}

impl ParentFolder {
    /// Folder id, or `None` for the root.
    pub fn id(&self) -> Option<&str> {
        match self {
            ParentFolder::Root => None,
            ParentFolder::Parent(id) => normalized_parent(Some(id.as_str())),
        }
    }

    pub fn from_id(id: Option<&str>) -> Self {
        match normalized_parent(id) {
            None => ParentFolder::Root,
            Some(id) => ParentFolder::Parent(id.to_string()),
        }
    }
}

/// A url/title pair used for bulk creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteInfo {
    pub url: String,
    pub title: String,
}

impl WebsiteInfo {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// Ordering applied to sibling entities when presenting a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortMode {
    #[default]
    Manual,
    NameAscending,
    NameDescending,
}

impl SortMode {
    /// Sorts siblings by case-insensitive title. `Manual` keeps stored order.
    pub fn sort(self, mut entities: Vec<BookmarkEntity>) -> Vec<BookmarkEntity> {
        match self {
            SortMode::Manual => {}
            SortMode::NameAscending => entities.sort_by(compare_titles),
            SortMode::NameDescending => entities.sort_by(|a, b| compare_titles(b, a)),
        }
        entities
    }
}

fn compare_titles(a: &BookmarkEntity, b: &BookmarkEntity) -> Ordering {
    a.title().to_lowercase().cmp(&b.title().to_lowercase())
}
