//! Bookmark manager for the bookmark core.
//!
//! Owns the in-memory bookmark hierarchy and its url index, and keeps both in
//! step with a [`BookmarkStore`]. Writes are applied to memory first, then
//! persisted; when the store rejects a write the in-memory change is undone
//! and the error is returned. Every settled change is published to
//! subscribers as an immutable [`BookmarksSnapshot`].
//!
//! Calls made before the first successful [`BookmarkManagerTrait::load_bookmarks`]
//! are ignored: queries answer "nothing" and mutations return `None`.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;

use crate::managers::bookmark_list::{BookmarkList, IdentifiableBookmark};
use crate::managers::entity_arena::{BookmarkUpdate, EntityArena, MoveBatch, RemovedEntity};
use crate::services::{bookmark_search, url_variants};
use crate::types::bookmark::{
    Bookmark, BookmarkEntity, BookmarkFolder, ParentFolder, WebsiteInfo,
};
use crate::types::errors::{BookmarkError, FaviconError, StoreError};

/// Persistence backend for bookmarks.
///
/// Top-level entities are reported with no parent. Implementations must
/// reject writes that would break the hierarchy.
pub trait BookmarkStore {
    fn load_all(&self) -> Result<Vec<BookmarkEntity>, StoreError>;
    /// Favorite bookmarks in display order.
    fn load_favorites(&self) -> Result<Vec<Bookmark>, StoreError>;
    fn save_bookmark(
        &mut self,
        bookmark: &Bookmark,
        parent: Option<&str>,
        index: Option<usize>,
    ) -> Result<(), StoreError>;
    fn save_folder(&mut self, folder: &BookmarkFolder, parent: Option<&str>) -> Result<(), StoreError>;
    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), StoreError>;
    fn update_folder(&mut self, folder: &BookmarkFolder) -> Result<(), StoreError>;
    fn update_folder_and_move(
        &mut self,
        folder: &BookmarkFolder,
        parent: &ParentFolder,
    ) -> Result<(), StoreError>;
    fn remove(&mut self, ids: &[String]) -> Result<(), StoreError>;
    fn move_objects(
        &mut self,
        ids: &[String],
        index: Option<usize>,
        parent: &ParentFolder,
    ) -> Result<(), StoreError>;
    fn move_favorites(&mut self, ids: &[String], index: Option<usize>) -> Result<(), StoreError>;
    fn save_bookmarks_in_new_folder(
        &mut self,
        websites: &[WebsiteInfo],
        folder_name: &str,
        parent: &ParentFolder,
    ) -> Result<(), StoreError>;
    fn fetch_folder(&self, id: &str) -> Result<Option<BookmarkFolder>, StoreError>;
    fn reset(&mut self) -> Result<(), StoreError>;
}

/// Favicon bookkeeping tied to bookmark lifetime. Failures are logged and ignored.
pub trait FaviconManagement {
    fn bookmark_added(&self, url: &str) -> Result<(), FaviconError>;
    fn bookmarks_removed(&self, urls: &[String]) -> Result<(), FaviconError>;
}

/// Favicon collaborator that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFavicons;

impl FaviconManagement for NoFavicons {
    fn bookmark_added(&self, _url: &str) -> Result<(), FaviconError> {
        Ok(())
    }

    fn bookmarks_removed(&self, _urls: &[String]) -> Result<(), FaviconError> {
        Ok(())
    }
}

/// Immutable view of the bookmarks published after every settled change.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarksSnapshot {
    pub list: BookmarkList,
}

impl BookmarksSnapshot {
    /// The synthetic root holding the top-level entities.
    pub fn root_folder(&self) -> BookmarkFolder {
        BookmarkFolder::root(self.list.top_level_entities().to_vec())
    }

    pub fn favorites(&self) -> &[Bookmark] {
        self.list.favorites()
    }

    pub fn search(&self, query: &str) -> Vec<BookmarkEntity> {
        bookmark_search::search(self.list.top_level_entities(), query)
    }

    pub fn bookmark_for_variant_url(&self, url: &str) -> Option<Bookmark> {
        variant_lookup(&self.list, url).map(IdentifiableBookmark::to_bookmark)
    }
}

fn variant_lookup<'a>(list: &'a BookmarkList, url: &str) -> Option<&'a IdentifiableBookmark> {
    url_variants::bookmark_url_variants(url)
        .iter()
        .find_map(|variant| list.get(variant))
}

pub type SnapshotReceiver = watch::Receiver<Option<Arc<BookmarksSnapshot>>>;

/// Trait defining the bookmark manager interface.
pub trait BookmarkManagerTrait {
    fn load_bookmarks(&mut self) -> Result<(), BookmarkError>;
    fn is_loaded(&self) -> bool;
    fn list(&self) -> Option<&BookmarkList>;
    fn root_folder(&self) -> Option<BookmarkFolder>;
    fn favorites(&self) -> Vec<Bookmark>;
    fn is_url_bookmarked(&self, url: &str) -> bool;
    fn is_url_favorited(&self, url: &str) -> bool;
    fn is_any_url_variant_bookmarked(&self, url: &str) -> bool;
    fn get_bookmark(&self, url: &str) -> Option<Bookmark>;
    fn get_bookmark_for_variant_url(&self, url: &str) -> Option<Bookmark>;
    fn get_bookmark_folder(&self, id: &str) -> Result<Option<BookmarkFolder>, BookmarkError>;
    fn all_hosts(&self) -> HashSet<String>;
    fn search(&self, query: &str) -> Vec<BookmarkEntity>;
    fn make_bookmark(
        &mut self,
        url: &str,
        title: &str,
        is_favorite: bool,
        index: Option<usize>,
        parent: &ParentFolder,
    ) -> Result<Option<Bookmark>, BookmarkError>;
    fn make_bookmarks(
        &mut self,
        websites: &[WebsiteInfo],
        folder_name: &str,
        parent: &ParentFolder,
    ) -> Result<(), BookmarkError>;
    fn make_folder(
        &mut self,
        title: &str,
        parent: &ParentFolder,
    ) -> Result<Option<BookmarkFolder>, BookmarkError>;
    fn remove_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError>;
    fn remove_folder(&mut self, folder: &BookmarkFolder) -> Result<(), BookmarkError>;
    fn remove_objects(&mut self, ids: &[String]) -> Result<(), BookmarkError>;
    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError>;
    fn update_url(
        &mut self,
        bookmark: &Bookmark,
        new_url: &str,
    ) -> Result<Option<Bookmark>, BookmarkError>;
    fn update_bookmark_fields(
        &mut self,
        bookmark: &Bookmark,
        new_url: &str,
        new_title: &str,
        new_is_favorite: bool,
    ) -> Result<Option<Bookmark>, BookmarkError>;
    fn update_folder(&mut self, folder: &BookmarkFolder) -> Result<(), BookmarkError>;
    fn update_folder_and_move(
        &mut self,
        folder: &BookmarkFolder,
        parent: &ParentFolder,
    ) -> Result<(), BookmarkError>;
    fn move_objects(
        &mut self,
        ids: &[String],
        index: Option<usize>,
        parent: &ParentFolder,
    ) -> Result<(), BookmarkError>;
    fn move_favorites(&mut self, ids: &[String], index: Option<usize>) -> Result<(), BookmarkError>;
    fn can_move_object(&self, id: &str, parent: &ParentFolder) -> bool;
    fn reset_bookmarks(&mut self) -> Result<(), BookmarkError>;
}

/// A reversible in-memory change awaiting persistence.
enum Delta {
    Created {
        id: String,
        url: Option<String>,
    },
    Removed {
        removed: Vec<RemovedEntity>,
        list_entries: Vec<(usize, IdentifiableBookmark)>,
        promoted: Vec<String>,
    },
    Updated {
        update: BookmarkUpdate,
        current: Bookmark,
        promoted: Option<String>,
    },
    Moved {
        batch: MoveBatch,
        list_before: Vec<IdentifiableBookmark>,
    },
    Renamed {
        id: String,
        previous_title: String,
        batch: Option<MoveBatch>,
    },
    FavoritesReordered(Vec<String>),
}

struct ManagerState {
    arena: EntityArena,
    list: BookmarkList,
}

impl ManagerState {
    fn from_store_contents(
        top_level: &[BookmarkEntity],
        favorites: &[Bookmark],
    ) -> Result<Self, BookmarkError> {
        let favorite_ids: Vec<String> = favorites.iter().map(|b| b.id.clone()).collect();
        let arena = EntityArena::from_entities(top_level, &favorite_ids)?;
        let list = BookmarkList::from_entities(
            &arena.bookmarks(),
            arena.top_level_entities(),
            arena.favorites(),
        );
        Ok(Self { arena, list })
    }

    fn refresh_tree_views(&mut self) {
        self.list
            .set_tree_views(self.arena.top_level_entities(), self.arena.favorites());
    }

    /// Index entry for `bookmark`, only if it belongs to the same id.
    fn indexed(&self, bookmark: &Bookmark) -> bool {
        self.list
            .get(&bookmark.url)
            .is_some_and(|item| item.id == bookmark.id)
    }

    /// Indexes the first remaining bookmark at `url`, if any, at `position`.
    fn promote_remaining(&mut self, url: &str, position: usize) -> bool {
        let Some(next) = self.arena.bookmarks().into_iter().find(|b| b.url == url) else {
            return false;
        };
        self.list.put(IdentifiableBookmark::from(&next), position);
        true
    }

    /// Detaches `ids` from the arena and the index.
    ///
    /// Returns the urls left with no bookmark at all.
    fn remove_entities(&mut self, ids: &[String]) -> (Delta, Vec<String>) {
        let mut removed = Vec::new();
        let mut list_entries = Vec::new();
        for id in ids {
            let Some(entity) = self.arena.remove(id) else {
                continue;
            };
            for bookmark in subtree_bookmarks(&entity.entity) {
                if !self.indexed(bookmark) {
                    continue;
                }
                if let Some(entry) = self.list.take(&bookmark.url) {
                    list_entries.push(entry);
                }
            }
            removed.push(entity);
        }

        let mut promoted = Vec::new();
        let mut urls = Vec::new();
        for (position, item) in &list_entries {
            if self.promote_remaining(&item.url, *position) {
                promoted.push(item.url.clone());
            } else {
                urls.push(item.url.clone());
            }
        }
        self.refresh_tree_views();
        (
            Delta::Removed {
                removed,
                list_entries,
                promoted,
            },
            urls,
        )
    }

    /// Re-syncs index projections of `ids` after their parent changed.
    fn reindex_parents(&mut self, ids: &[String]) {
        for id in ids {
            if let Some(bookmark) = self.arena.bookmark(id) {
                self.list.update(&bookmark);
            }
        }
    }

    fn revert(&mut self, delta: Delta) {
        match delta {
            Delta::Created { id, url } => {
                self.arena.remove(&id);
                if let Some(url) = url {
                    self.list.take(&url);
                }
            }
            Delta::Removed {
                removed,
                list_entries,
                promoted,
            } => {
                for url in &promoted {
                    self.list.take(url);
                }
                for entity in removed.into_iter().rev() {
                    if let Err(err) = self.arena.restore(entity) {
                        log::error!(
                            "event=rollback module=bookmarks status=error error={}",
                            err
                        );
                    }
                }
                for (position, item) in list_entries.into_iter().rev() {
                    self.list.put(item, position);
                }
            }
            Delta::Updated {
                update,
                current,
                promoted,
            } => {
                if let Some(url) = promoted {
                    self.list.take(&url);
                }
                let previous = update.previous.clone();
                self.list.update_bookmark(
                    &current,
                    &previous.url,
                    &previous.title,
                    previous.is_favorite,
                );
                self.arena.revert_update(update);
            }
            Delta::Moved { batch, list_before } => {
                self.arena.revert_moves(batch);
                for item in list_before {
                    self.list.update(&item.to_bookmark());
                }
            }
            Delta::Renamed {
                id,
                previous_title,
                batch,
            } => {
                if let Some(batch) = batch {
                    self.arena.revert_moves(batch);
                }
                self.arena.rename_folder(&id, &previous_title);
            }
            Delta::FavoritesReordered(order) => self.arena.restore_favorites_order(order),
        }
        self.refresh_tree_views();
    }
}

fn subtree_bookmarks(entity: &BookmarkEntity) -> Vec<&Bookmark> {
    match entity {
        BookmarkEntity::Bookmark(bookmark) => vec![bookmark],
        BookmarkEntity::Folder(folder) => folder.children.iter().flat_map(subtree_bookmarks).collect(),
    }
}

/// Bookmark manager backed by a [`BookmarkStore`].
pub struct BookmarkManager<S: BookmarkStore, F: FaviconManagement = NoFavicons> {
    store: S,
    favicons: F,
    state: Option<ManagerState>,
    publisher: watch::Sender<Option<Arc<BookmarksSnapshot>>>,
}

impl<S: BookmarkStore> BookmarkManager<S, NoFavicons> {
    pub fn new(store: S) -> Self {
        Self::with_favicons(store, NoFavicons)
    }
}

impl<S: BookmarkStore, F: FaviconManagement> BookmarkManager<S, F> {
    pub fn with_favicons(store: S, favicons: F) -> Self {
        let (publisher, _) = watch::channel(None);
        Self {
            store,
            favicons,
            state: None,
            publisher,
        }
    }

    /// Receives a new snapshot after every settled change. `None` until loaded.
    pub fn subscribe(&self) -> SnapshotReceiver {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> Option<Arc<BookmarksSnapshot>> {
        self.publisher.borrow().clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn publish(&self) {
        let snapshot = self.state.as_ref().map(|state| {
            Arc::new(BookmarksSnapshot {
                list: state.list.clone(),
            })
        });
        self.publisher.send_replace(snapshot);
    }

    fn loaded_state(&mut self, operation: &str) -> Option<&mut ManagerState> {
        if self.state.is_none() {
            log::warn!(
                "event={} module=bookmarks status=skipped reason=not_loaded",
                operation
            );
        }
        self.state.as_mut()
    }

    fn parent_exists(state: &ManagerState, parent: &ParentFolder) -> bool {
        parent.id().map_or(true, |id| state.arena.is_folder(id))
    }

    fn notify_removed(&self, urls: &[String]) {
        if urls.is_empty() {
            return;
        }
        if let Err(err) = self.favicons.bookmarks_removed(urls) {
            log::warn!("event=favicon_cleanup module=bookmarks status=error error={}", err);
        }
    }

    /// Runs `persist`; on failure undoes `delta` and maps the error.
    fn settle(
        &mut self,
        operation: &str,
        delta: Delta,
        persist: impl FnOnce(&mut S) -> Result<(), StoreError>,
    ) -> Result<(), BookmarkError> {
        match persist(&mut self.store) {
            Ok(()) => {
                log::debug!("event={} module=bookmarks status=ok", operation);
                self.publish();
                Ok(())
            }
            Err(err) => {
                log::error!(
                    "event={} module=bookmarks status=error error={}",
                    operation,
                    err
                );
                if let Some(state) = self.state.as_mut() {
                    state.revert(delta);
                }
                Err(BookmarkError::Persistence(err))
            }
        }
    }
}

impl<S: BookmarkStore, F: FaviconManagement> BookmarkManagerTrait for BookmarkManager<S, F> {
    /// Replaces in-memory state with the store's contents.
    ///
    /// On failure the previous state (or the unloaded state) is kept.
    fn load_bookmarks(&mut self) -> Result<(), BookmarkError> {
        let loaded = self
            .store
            .load_all()
            .and_then(|top_level| Ok((top_level, self.store.load_favorites()?)));
        let (top_level, favorites) = match loaded {
            Ok(contents) => contents,
            Err(err) => {
                log::error!("event=load_bookmarks module=bookmarks status=error error={}", err);
                return Err(BookmarkError::Persistence(err));
            }
        };

        let state = match ManagerState::from_store_contents(&top_level, &favorites) {
            Ok(state) => state,
            Err(err) => {
                log::error!("event=load_bookmarks module=bookmarks status=error error={}", err);
                return Err(err);
            }
        };
        log::info!(
            "event=load_bookmarks module=bookmarks status=ok entities={} bookmarks={}",
            state.arena.len(),
            state.list.len()
        );
        self.state = Some(state);
        self.publish();
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    fn list(&self) -> Option<&BookmarkList> {
        self.state.as_ref().map(|s| &s.list)
    }

    fn root_folder(&self) -> Option<BookmarkFolder> {
        self.state
            .as_ref()
            .map(|s| BookmarkFolder::root(s.arena.top_level_entities()))
    }

    fn favorites(&self) -> Vec<Bookmark> {
        self.state
            .as_ref()
            .map(|s| s.arena.favorites())
            .unwrap_or_default()
    }

    fn is_url_bookmarked(&self, url: &str) -> bool {
        self.list().is_some_and(|list| list.contains(url))
    }

    fn is_url_favorited(&self, url: &str) -> bool {
        self.list()
            .and_then(|list| list.get(url))
            .is_some_and(|item| item.is_favorite)
    }

    fn is_any_url_variant_bookmarked(&self, url: &str) -> bool {
        self.list()
            .is_some_and(|list| variant_lookup(list, url).is_some())
    }

    fn get_bookmark(&self, url: &str) -> Option<Bookmark> {
        let state = self.state.as_ref()?;
        let item = state.list.get(url)?;
        state.arena.bookmark(&item.id)
    }

    fn get_bookmark_for_variant_url(&self, url: &str) -> Option<Bookmark> {
        let state = self.state.as_ref()?;
        let item = variant_lookup(&state.list, url)?;
        state.arena.bookmark(&item.id)
    }

    fn get_bookmark_folder(&self, id: &str) -> Result<Option<BookmarkFolder>, BookmarkError> {
        self.store.fetch_folder(id).map_err(|err| {
            log::error!("event=fetch_folder module=bookmarks status=error error={}", err);
            BookmarkError::Persistence(err)
        })
    }

    fn all_hosts(&self) -> HashSet<String> {
        self.list().map(BookmarkList::all_hosts).unwrap_or_default()
    }

    fn search(&self, query: &str) -> Vec<BookmarkEntity> {
        match self.list() {
            Some(list) => bookmark_search::search(list.top_level_entities(), query),
            None => Vec::new(),
        }
    }

    fn make_bookmark(
        &mut self,
        url: &str,
        title: &str,
        is_favorite: bool,
        index: Option<usize>,
        parent: &ParentFolder,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let Some(state) = self.loaded_state("make_bookmark") else {
            return Ok(None);
        };
        if state.list.contains(url) {
            log::debug!("event=make_bookmark module=bookmarks status=skipped reason=duplicate");
            return Ok(None);
        }
        if !Self::parent_exists(state, parent) {
            log::warn!("event=make_bookmark module=bookmarks status=skipped reason=missing_parent");
            return Ok(None);
        }

        let bookmark = Bookmark::with_new_id(
            url,
            title,
            is_favorite,
            parent.id().map(str::to_string),
        );
        state
            .arena
            .insert(bookmark.clone().into(), parent.id(), index)?;
        state.list.insert(&bookmark);
        state.refresh_tree_views();

        let delta = Delta::Created {
            id: bookmark.id.clone(),
            url: Some(bookmark.url.clone()),
        };
        self.settle("make_bookmark", delta, |store| {
            store.save_bookmark(&bookmark, parent.id(), index)
        })?;
        if let Err(err) = self.favicons.bookmark_added(url) {
            log::warn!("event=favicon_add module=bookmarks status=error error={}", err);
        }
        Ok(Some(bookmark))
    }

    /// Creates a folder holding one bookmark per website, then reloads.
    ///
    /// Websites whose url is already bookmarked, or repeated in `websites`, are skipped.
    fn make_bookmarks(
        &mut self,
        websites: &[WebsiteInfo],
        folder_name: &str,
        parent: &ParentFolder,
    ) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("make_bookmarks") else {
            return Ok(());
        };
        if !Self::parent_exists(state, parent) {
            log::warn!("event=make_bookmarks module=bookmarks status=skipped reason=missing_parent");
            return Ok(());
        }

        let mut seen = HashSet::new();
        let fresh: Vec<WebsiteInfo> = websites
            .iter()
            .filter(|w| !state.list.contains(&w.url) && seen.insert(w.url.clone()))
            .cloned()
            .collect();

        if let Err(err) = self
            .store
            .save_bookmarks_in_new_folder(&fresh, folder_name, parent)
        {
            log::error!("event=make_bookmarks module=bookmarks status=error error={}", err);
            return Err(BookmarkError::Persistence(err));
        }
        log::info!(
            "event=make_bookmarks module=bookmarks status=ok count={}",
            fresh.len()
        );
        self.load_bookmarks()
    }

    fn make_folder(
        &mut self,
        title: &str,
        parent: &ParentFolder,
    ) -> Result<Option<BookmarkFolder>, BookmarkError> {
        let Some(state) = self.loaded_state("make_folder") else {
            return Ok(None);
        };
        if !Self::parent_exists(state, parent) {
            log::warn!("event=make_folder module=bookmarks status=skipped reason=missing_parent");
            return Ok(None);
        }

        let folder = BookmarkFolder::with_new_id(title, parent.id().map(str::to_string));
        state.arena.insert(folder.clone().into(), parent.id(), None)?;
        state.refresh_tree_views();

        let delta = Delta::Created {
            id: folder.id.clone(),
            url: None,
        };
        self.settle("make_folder", delta, |store| {
            store.save_folder(&folder, parent.id())
        })?;
        Ok(Some(folder))
    }

    fn remove_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("remove_bookmark") else {
            return Ok(());
        };
        if state.arena.bookmark(&bookmark.id).is_none() {
            log::debug!("event=remove_bookmark module=bookmarks status=skipped reason=not_found");
            return Ok(());
        }
        let ids = vec![bookmark.id.clone()];
        let (delta, urls) = state.remove_entities(&ids);
        self.settle("remove_bookmark", delta, |store| store.remove(&ids))?;
        self.notify_removed(&urls);
        Ok(())
    }

    fn remove_folder(&mut self, folder: &BookmarkFolder) -> Result<(), BookmarkError> {
        self.remove_objects(&[folder.id.clone()])
    }

    fn remove_objects(&mut self, ids: &[String]) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("remove_objects") else {
            return Ok(());
        };
        let known: Vec<String> = ids
            .iter()
            .filter(|id| state.arena.contains(id))
            .cloned()
            .collect();
        if known.is_empty() {
            return Ok(());
        }
        let (delta, urls) = state.remove_entities(&known);
        self.settle("remove_objects", delta, |store| store.remove(&known))?;
        self.notify_removed(&urls);
        Ok(())
    }

    /// Applies title and favorite changes to a bookmark at its current url.
    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError> {
        self.update_bookmark_fields(bookmark, &bookmark.url, &bookmark.title, bookmark.is_favorite)
            .map(|_| ())
    }

    fn update_url(
        &mut self,
        bookmark: &Bookmark,
        new_url: &str,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        self.update_bookmark_fields(bookmark, new_url, &bookmark.title, bookmark.is_favorite)
    }

    fn update_bookmark_fields(
        &mut self,
        bookmark: &Bookmark,
        new_url: &str,
        new_title: &str,
        new_is_favorite: bool,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        let Some(state) = self.loaded_state("update_bookmark") else {
            return Ok(None);
        };
        if !state.indexed(bookmark) {
            log::debug!("event=update_bookmark module=bookmarks status=skipped reason=not_found");
            return Ok(None);
        }
        let Some(current) = state.arena.bookmark(&bookmark.id) else {
            return Ok(None);
        };
        let Some(updated) =
            state
                .list
                .update_bookmark(&current, new_url, new_title, new_is_favorite)
        else {
            log::debug!("event=update_bookmark module=bookmarks status=skipped reason=url_taken");
            return Ok(None);
        };
        let Some(update) = state.arena.update_bookmark(&updated) else {
            return Ok(None);
        };
        let promoted = (current.url != updated.url
            && state.promote_remaining(&current.url, state.list.len()))
        .then(|| current.url.clone());
        state.refresh_tree_views();

        let delta = Delta::Updated {
            update,
            current: updated.clone(),
            promoted,
        };
        self.settle("update_bookmark", delta, |store| store.update_bookmark(&updated))?;
        Ok(Some(updated))
    }

    fn update_folder(&mut self, folder: &BookmarkFolder) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("update_folder") else {
            return Ok(());
        };
        let Some(previous_title) = state.arena.rename_folder(&folder.id, &folder.title) else {
            log::debug!("event=update_folder module=bookmarks status=skipped reason=not_found");
            return Ok(());
        };
        state.refresh_tree_views();

        let delta = Delta::Renamed {
            id: folder.id.clone(),
            previous_title,
            batch: None,
        };
        self.settle("update_folder", delta, |store| store.update_folder(folder))
    }

    /// Renames `folder` and moves it under `parent`, publishing even if nothing changed.
    fn update_folder_and_move(
        &mut self,
        folder: &BookmarkFolder,
        parent: &ParentFolder,
    ) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("update_folder_and_move") else {
            return Ok(());
        };
        if !state.arena.is_folder(&folder.id) {
            log::debug!(
                "event=update_folder_and_move module=bookmarks status=skipped reason=not_found"
            );
            return Ok(());
        }

        let ids = vec![folder.id.clone()];
        let batch = if state.arena.parent_of(&folder.id) == Some(parent.id()) {
            None
        } else {
            Some(state.arena.move_entities(&ids, parent.id(), None)?)
        };
        let previous_title = state
            .arena
            .rename_folder(&folder.id, &folder.title)
            .unwrap_or_default();
        state.refresh_tree_views();

        let delta = Delta::Renamed {
            id: folder.id.clone(),
            previous_title,
            batch,
        };
        let result = self.settle("update_folder_and_move", delta, |store| {
            store.update_folder_and_move(folder, parent)
        });
        if result.is_err() {
            self.publish();
        }
        result
    }

    /// Moves `ids` as a block to `index` within `parent`.
    ///
    /// Rejected with a structural error if any folder would land inside itself.
    fn move_objects(
        &mut self,
        ids: &[String],
        index: Option<usize>,
        parent: &ParentFolder,
    ) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("move_objects") else {
            return Ok(());
        };
        if !Self::parent_exists(state, parent) {
            log::warn!("event=move_objects module=bookmarks status=skipped reason=missing_parent");
            return Ok(());
        }

        let list_before: Vec<IdentifiableBookmark> = ids
            .iter()
            .filter_map(|id| state.arena.bookmark(id))
            .filter_map(|b| state.list.get(&b.url).filter(|item| item.id == b.id).cloned())
            .collect();
        let batch = match state.arena.move_entities(ids, parent.id(), index) {
            Ok(batch) => batch,
            Err(err) => {
                log::warn!("event=move_objects module=bookmarks status=rejected error={}", err);
                return Err(BookmarkError::Structural(err));
            }
        };
        state.reindex_parents(ids);
        state.refresh_tree_views();

        let delta = Delta::Moved { batch, list_before };
        self.settle("move_objects", delta, |store| {
            store.move_objects(ids, index, parent)
        })
    }

    fn move_favorites(&mut self, ids: &[String], index: Option<usize>) -> Result<(), BookmarkError> {
        let Some(state) = self.loaded_state("move_favorites") else {
            return Ok(());
        };
        let previous = state.arena.move_favorites(ids, index);
        state.refresh_tree_views();
        self.settle(
            "move_favorites",
            Delta::FavoritesReordered(previous),
            |store| store.move_favorites(ids, index),
        )
    }

    fn can_move_object(&self, id: &str, parent: &ParentFolder) -> bool {
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        state.arena.contains(id)
            && Self::parent_exists(state, parent)
            && !state.arena.would_create_cycle(id, parent.id())
    }

    /// Deletes every bookmark and folder, then reloads.
    fn reset_bookmarks(&mut self) -> Result<(), BookmarkError> {
        if self.loaded_state("reset_bookmarks").is_none() {
            return Ok(());
        }
        if let Err(err) = self.store.reset() {
            log::error!("event=reset_bookmarks module=bookmarks status=error error={}", err);
            return Err(BookmarkError::Persistence(err));
        }
        log::info!("event=reset_bookmarks module=bookmarks status=ok");
        self.load_bookmarks()
    }
}
