//! Thread-safe handle around [`BookmarkManager`].
//!
//! Mutations are queued on an async mutex and run one at a time on tokio's
//! blocking pool, so a slow store never stalls the async runtime. An accepted
//! mutation always runs to completion, even if the caller stops waiting.
//! Reads are served from the latest published snapshot without locking.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::managers::bookmark_manager::{
    BookmarkManager, BookmarkManagerTrait, BookmarkStore, BookmarksSnapshot, FaviconManagement,
    SnapshotReceiver,
};
use crate::types::bookmark::{Bookmark, BookmarkEntity, BookmarkFolder, ParentFolder, WebsiteInfo};
use crate::types::errors::BookmarkError;

pub struct SharedBookmarkManager<S: BookmarkStore, F: FaviconManagement> {
    inner: Arc<Mutex<BookmarkManager<S, F>>>,
    snapshots: SnapshotReceiver,
}

impl<S: BookmarkStore, F: FaviconManagement> Clone for SharedBookmarkManager<S, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            snapshots: self.snapshots.clone(),
        }
    }
}

impl<S, F> SharedBookmarkManager<S, F>
where
    S: BookmarkStore + Send + 'static,
    F: FaviconManagement + Send + 'static,
{
    pub fn new(manager: BookmarkManager<S, F>) -> Self {
        let snapshots = manager.subscribe();
        Self {
            inner: Arc::new(Mutex::new(manager)),
            snapshots,
        }
    }

    /// Runs `operation` with exclusive access to the manager.
    async fn run<T, Op>(&self, operation: Op) -> Result<T, BookmarkError>
    where
        T: Send + 'static,
        Op: FnOnce(&mut BookmarkManager<S, F>) -> Result<T, BookmarkError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        let guard = inner.lock_owned().await;
        tokio::task::spawn_blocking(move || {
            let mut manager = guard;
            operation(&mut *manager)
        })
        .await
        .map_err(|err| {
            log::error!("event=bookmark_task module=shared_manager status=error error={}", err);
            BookmarkError::Interrupted(err.to_string())
        })?
    }

    /// Latest published snapshot, `None` until the first load.
    pub fn snapshot(&self) -> Option<Arc<BookmarksSnapshot>> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    pub fn search(&self, query: &str) -> Vec<BookmarkEntity> {
        self.snapshot()
            .map(|snapshot| snapshot.search(query))
            .unwrap_or_default()
    }

    pub fn get_bookmark_for_variant_url(&self, url: &str) -> Option<Bookmark> {
        self.snapshot()?.bookmark_for_variant_url(url)
    }

    pub fn is_url_bookmarked(&self, url: &str) -> bool {
        self.snapshot()
            .is_some_and(|snapshot| snapshot.list.contains(url))
    }

    pub async fn load_bookmarks(&self) -> Result<(), BookmarkError> {
        self.run(|manager| manager.load_bookmarks()).await
    }

    pub async fn make_bookmark(
        &self,
        url: String,
        title: String,
        is_favorite: bool,
        index: Option<usize>,
        parent: ParentFolder,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        self.run(move |manager| manager.make_bookmark(&url, &title, is_favorite, index, &parent))
            .await
    }

    pub async fn make_bookmarks(
        &self,
        websites: Vec<WebsiteInfo>,
        folder_name: String,
        parent: ParentFolder,
    ) -> Result<(), BookmarkError> {
        self.run(move |manager| manager.make_bookmarks(&websites, &folder_name, &parent))
            .await
    }

    pub async fn make_folder(
        &self,
        title: String,
        parent: ParentFolder,
    ) -> Result<Option<BookmarkFolder>, BookmarkError> {
        self.run(move |manager| manager.make_folder(&title, &parent)).await
    }

    pub async fn remove_bookmark(&self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        self.run(move |manager| manager.remove_bookmark(&bookmark)).await
    }

    pub async fn remove_objects(&self, ids: Vec<String>) -> Result<(), BookmarkError> {
        self.run(move |manager| manager.remove_objects(&ids)).await
    }

    pub async fn update_bookmark(&self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        self.run(move |manager| manager.update_bookmark(&bookmark)).await
    }

    pub async fn update_url(
        &self,
        bookmark: Bookmark,
        new_url: String,
    ) -> Result<Option<Bookmark>, BookmarkError> {
        self.run(move |manager| manager.update_url(&bookmark, &new_url)).await
    }

    pub async fn update_folder_and_move(
        &self,
        folder: BookmarkFolder,
        parent: ParentFolder,
    ) -> Result<(), BookmarkError> {
        self.run(move |manager| manager.update_folder_and_move(&folder, &parent))
            .await
    }

    pub async fn move_objects(
        &self,
        ids: Vec<String>,
        index: Option<usize>,
        parent: ParentFolder,
    ) -> Result<(), BookmarkError> {
        self.run(move |manager| manager.move_objects(&ids, index, &parent))
            .await
    }

    pub async fn get_bookmark_folder(&self, id: String) -> Result<Option<BookmarkFolder>, BookmarkError> {
        self.run(move |manager| manager.get_bookmark_folder(&id)).await
    }
}
