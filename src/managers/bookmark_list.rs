//! Url-keyed index over every bookmark in the store.
//!
//! The list answers "is this url bookmarked?" without walking the tree. It
//! keeps one entry per exact url (first write wins) and a second map keyed by
//! the lowercased url that groups every bookmark sharing that spelling.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::services::url_variants;
use crate::types::bookmark::{Bookmark, BookmarkEntity};

/// Lightweight projection of a bookmark stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentifiableBookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    pub is_favorite: bool,
    pub parent_folder_id: Option<String>,
}

impl From<&Bookmark> for IdentifiableBookmark {
    fn from(bookmark: &Bookmark) -> Self {
        Self {
            id: bookmark.id.clone(),
            url: bookmark.url.clone(),
            title: bookmark.title.clone(),
            is_favorite: bookmark.is_favorite,
            parent_folder_id: bookmark.parent_id().map(str::to_string),
        }
    }
}

impl IdentifiableBookmark {
    pub fn to_bookmark(&self) -> Bookmark {
        Bookmark::new(
            self.id.clone(),
            self.url.clone(),
            self.title.clone(),
            self.is_favorite,
            self.parent_folder_id.clone(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookmarkList {
    items: HashMap<String, IdentifiableBookmark>,
    lowercased_items: HashMap<String, Vec<IdentifiableBookmark>>,
    ordered_urls: Vec<String>,
    top_level_entities: Vec<BookmarkEntity>,
    favorites: Vec<Bookmark>,
}

impl BookmarkList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the index from a flat list of bookmarks plus the tree views kept alongside it.
    pub fn from_entities(
        bookmarks: &[Bookmark],
        top_level_entities: Vec<BookmarkEntity>,
        favorites: Vec<Bookmark>,
    ) -> Self {
        let mut list = Self {
            top_level_entities,
            favorites,
            ..Self::default()
        };
        for bookmark in bookmarks {
            list.insert(bookmark);
        }
        list
    }

    /// Adds `bookmark` unless its exact url is already indexed.
    pub fn insert(&mut self, bookmark: &Bookmark) {
        let position = self.ordered_urls.len();
        self.put(IdentifiableBookmark::from(bookmark), position);
    }

    /// Removes the entry for `bookmark.url`.
    pub fn remove(&mut self, bookmark: &Bookmark) {
        self.take(&bookmark.url);
    }

    /// Inserts `item` at `position` in insertion order. Lowercase buckets stay sorted by id.
    pub(crate) fn put(&mut self, item: IdentifiableBookmark, position: usize) {
        if self.items.contains_key(&item.url) {
            return;
        }
        let bucket = self
            .lowercased_items
            .entry(item.url.to_lowercase())
            .or_default();
        let slot = bucket.partition_point(|entry| entry.id < item.id);
        bucket.insert(slot, item.clone());
        let position = position.min(self.ordered_urls.len());
        self.ordered_urls.insert(position, item.url.clone());
        self.items.insert(item.url.clone(), item);
    }

    /// Removes the entry for `url`, reporting where it sat in insertion order.
    pub(crate) fn take(&mut self, url: &str) -> Option<(usize, IdentifiableBookmark)> {
        let item = self.items.remove(url)?;
        self.remove_lowercased(url, &item.id);
        let position = match self.ordered_urls.iter().position(|u| u == url) {
            Some(index) => {
                self.ordered_urls.remove(index);
                index
            }
            None => self.ordered_urls.len(),
        };
        Some((position, item))
    }

    /// Replaces the entry at `bookmark.url` in place. Unknown urls are ignored.
    pub fn update(&mut self, bookmark: &Bookmark) {
        let Some(existing) = self.items.get(&bookmark.url) else {
            return;
        };
        if existing.id != bookmark.id {
            return;
        }
        let item = IdentifiableBookmark::from(bookmark);
        if let Some(bucket) = self.lowercased_items.get_mut(&bookmark.url.to_lowercase()) {
            for entry in bucket.iter_mut().filter(|e| e.id == item.id) {
                *entry = item.clone();
            }
        }
        self.items.insert(bookmark.url.clone(), item);
    }

    /// Re-keys `bookmark` under `new_url`.
    ///
    /// Returns `None` when `bookmark.url` is not indexed or another bookmark
    /// already owns `new_url`.
    pub fn update_url(&mut self, bookmark: &Bookmark, new_url: &str) -> Option<Bookmark> {
        self.update_bookmark(bookmark, new_url, &bookmark.title, bookmark.is_favorite)
    }

    /// Applies url, title and favorite changes in one step with the same
    /// collision rules as [`BookmarkList::update_url`].
    pub fn update_bookmark(
        &mut self,
        bookmark: &Bookmark,
        new_url: &str,
        new_title: &str,
        new_is_favorite: bool,
    ) -> Option<Bookmark> {
        let existing = self.items.get(&bookmark.url)?;
        if existing.id != bookmark.id {
            return None;
        }
        if new_url != bookmark.url && self.items.contains_key(new_url) {
            return None;
        }

        let mut updated = bookmark.with_url(new_url);
        updated.title = new_title.to_string();
        updated.set_favorite(new_is_favorite);

        if new_url == bookmark.url {
            self.update(&updated);
            return Some(updated);
        }

        let position = self
            .take(&bookmark.url)
            .map_or(self.ordered_urls.len(), |(position, _)| position);
        self.put(IdentifiableBookmark::from(&updated), position);
        Some(updated)
    }

    fn remove_lowercased(&mut self, url: &str, id: &str) {
        let key = url.to_lowercase();
        if let Some(bucket) = self.lowercased_items.get_mut(&key) {
            bucket.retain(|entry| entry.id != id);
            if bucket.is_empty() {
                self.lowercased_items.remove(&key);
            }
        }
    }

    pub fn get(&self, url: &str) -> Option<&IdentifiableBookmark> {
        self.items.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.items.contains_key(url)
    }

    /// Every bookmark whose url matches `url` ignoring case.
    pub fn lowercased_items(&self, url: &str) -> &[IdentifiableBookmark] {
        self.lowercased_items
            .get(&url.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains_case_insensitive(&self, url: &str) -> bool {
        self.lowercased_items.contains_key(&url.to_lowercase())
    }

    /// Bookmarks in insertion order.
    pub fn bookmarks(&self) -> Vec<&IdentifiableBookmark> {
        self.ordered_urls
            .iter()
            .filter_map(|url| self.items.get(url))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Distinct hosts of all indexed urls.
    pub fn all_hosts(&self) -> HashSet<String> {
        self.items
            .keys()
            .filter_map(|url| url_variants::host(url))
            .collect()
    }

    pub fn top_level_entities(&self) -> &[BookmarkEntity] {
        &self.top_level_entities
    }

    pub fn favorites(&self) -> &[Bookmark] {
        &self.favorites
    }

    pub(crate) fn set_tree_views(
        &mut self,
        top_level_entities: Vec<BookmarkEntity>,
        favorites: Vec<Bookmark>,
    ) {
        self.top_level_entities = top_level_entities;
        self.favorites = favorites;
    }
}
