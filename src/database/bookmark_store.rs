//! SQLite-backed [`BookmarkStore`].
//!
//! Bookmarks and folders live in `bookmark_entities`; top-level entities are
//! parented to the [`ROOT_FOLDER_ID`] row. Favorites are kept in a separate
//! ordered `favorites` table. Every multi-row write runs in a transaction.

use std::collections::{HashMap, HashSet};

use rusqlite::{params, Connection, OptionalExtension};

use super::connection::Database;
use crate::managers::bookmark_manager::BookmarkStore;
use crate::types::bookmark::{
    is_synthetic_root, normalized_parent, Bookmark, BookmarkEntity, BookmarkFolder, ParentFolder,
    WebsiteInfo, FAVORITES_FOLDER_ID, ROOT_FOLDER_ID,
};
use crate::types::errors::{StoreError, StructuralError};

struct EntityRow {
    id: String,
    title: String,
    url: Option<String>,
    is_folder: bool,
}

/// Creates the root and favorites containers if they are missing.
pub fn prepare_folders_structure(conn: &Connection) -> Result<(), rusqlite::Error> {
    let now = now();
    for (id, title) in [(ROOT_FOLDER_ID, "Bookmarks"), (FAVORITES_FOLDER_ID, "Favorites")] {
        conn.execute(
            "INSERT OR IGNORE INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
             VALUES (?1, ?2, NULL, 1, NULL, 0, ?3)",
            params![id, title, now],
        )?;
    }
    Ok(())
}

/// Returns `true` once the root container exists.
pub fn has_root_folder(conn: &Connection) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM bookmark_entities WHERE id = ?1",
        [ROOT_FOLDER_ID],
        |row| row.get(0),
    )
}

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

fn parent_key(parent: Option<&str>) -> &str {
    normalized_parent(parent).unwrap_or(ROOT_FOLDER_ID)
}

fn entity_parent(key: &str) -> Option<String> {
    normalized_parent(Some(key)).map(str::to_string)
}

fn exists(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    Ok(conn.query_row(
        "SELECT COUNT(*) > 0 FROM bookmark_entities WHERE id = ?1",
        [id],
        |row| row.get(0),
    )?)
}

fn ensure_folder(conn: &Connection, id: &str) -> Result<(), StoreError> {
    let is_folder: Option<bool> = conn
        .query_row(
            "SELECT is_folder FROM bookmark_entities WHERE id = ?1",
            [id],
            |row| row.get(0),
        )
        .optional()?;
    match is_folder {
        Some(true) if id != FAVORITES_FOLDER_ID => Ok(()),
        _ => Err(StructuralError::MissingParent(id.to_string()).into()),
    }
}

fn stored_parent(conn: &Connection, id: &str) -> Result<Option<String>, StoreError> {
    Ok(conn
        .query_row(
            "SELECT parent_id FROM bookmark_entities WHERE id = ?1",
            [id],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()?
        .flatten())
}

fn would_create_cycle(conn: &Connection, id: &str, new_parent: &str) -> Result<bool, StoreError> {
    let mut cursor = Some(new_parent.to_string());
    let mut visited = HashSet::new();
    while let Some(current) = cursor {
        if current == id || !visited.insert(current.clone()) {
            return Ok(true);
        }
        cursor = stored_parent(conn, &current)?;
    }
    Ok(false)
}

fn child_ids(conn: &Connection, parent: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id FROM bookmark_entities WHERE parent_id = ?1 ORDER BY position, rowid",
    )?;
    let ids = stmt
        .query_map([parent], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ids)
}

fn write_positions(conn: &Connection, ids: &[String]) -> Result<(), StoreError> {
    let mut stmt = conn.prepare("UPDATE bookmark_entities SET position = ?1 WHERE id = ?2")?;
    for (position, id) in ids.iter().enumerate() {
        stmt.execute(params![position as i64, id])?;
    }
    Ok(())
}

fn favorite_ids(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT bookmark_id FROM favorites ORDER BY position, rowid")?;
    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(ids)
}

fn write_favorites(conn: &Connection, ids: &[String]) -> Result<(), StoreError> {
    conn.execute("DELETE FROM favorites", [])?;
    let mut stmt = conn.prepare("INSERT INTO favorites (bookmark_id, position) VALUES (?1, ?2)")?;
    for (position, id) in ids.iter().enumerate() {
        stmt.execute(params![id, position as i64])?;
    }
    Ok(())
}

fn append_favorite(conn: &Connection, id: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO favorites (bookmark_id, position)
         VALUES (?1, (SELECT COALESCE(MAX(position), -1) + 1 FROM favorites))",
        [id],
    )?;
    Ok(())
}

/// Places `moving` as one block at `index` within `order`, `index` counted before removal.
fn splice_block(order: &mut Vec<String>, moving: &[String], index: Option<usize>) {
    let target = index.unwrap_or(order.len()).min(order.len());
    let shift = order[..target].iter().filter(|id| moving.contains(id)).count();
    order.retain(|id| !moving.contains(id));
    let at = (target - shift).min(order.len());
    order.splice(at..at, moving.iter().cloned());
}

/// Inserts a single entity row at `index` among the children of `parent`.
fn insert_row(
    conn: &Connection,
    entity: &BookmarkEntity,
    parent: &str,
    index: Option<usize>,
) -> Result<(), StoreError> {
    if exists(conn, entity.id())? {
        return Err(StructuralError::DuplicateId(entity.id().to_string()).into());
    }
    let url = entity.as_bookmark().map(|b| b.url.as_str());
    conn.execute(
        "INSERT INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![entity.id(), entity.title(), url, entity.is_folder(), parent, now()],
    )?;
    let mut order = child_ids(conn, parent)?;
    order.retain(|id| id != entity.id());
    let at = index.unwrap_or(order.len()).min(order.len());
    order.insert(at, entity.id().to_string());
    write_positions(conn, &order)?;

    match entity {
        BookmarkEntity::Bookmark(bookmark) if bookmark.is_favorite => {
            append_favorite(conn, &bookmark.id)
        }
        BookmarkEntity::Bookmark(_) => Ok(()),
        BookmarkEntity::Folder(folder) => {
            for child in &folder.children {
                insert_row(conn, child, &folder.id, None)?;
            }
            Ok(())
        }
    }
}

/// Moves `ids` under `parent` as a block at `index`.
fn move_rows(
    conn: &Connection,
    ids: &[String],
    index: Option<usize>,
    parent: &str,
) -> Result<(), StoreError> {
    ensure_folder(conn, parent)?;
    let mut moving: Vec<String> = Vec::new();
    for id in ids {
        if !is_synthetic_root(id) && exists(conn, id)? && !moving.contains(id) {
            moving.push(id.clone());
        }
    }
    for id in &moving {
        if would_create_cycle(conn, id, parent)? {
            return Err(StructuralError::CycleDetected {
                folder_id: id.clone(),
                parent_id: parent.to_string(),
            }
            .into());
        }
    }

    let mut order = child_ids(conn, parent)?;
    for id in &moving {
        conn.execute(
            "UPDATE bookmark_entities SET parent_id = ?1 WHERE id = ?2",
            params![parent, id],
        )?;
    }
    splice_block(&mut order, &moving, index);
    write_positions(conn, &order)
}

/// SQLite implementation of [`BookmarkStore`].
pub struct SqliteBookmarkStore {
    db: Database,
}

impl SqliteBookmarkStore {
    /// Wraps `db`, creating the root and favorites containers if needed.
    pub fn new(db: Database) -> Result<Self, StoreError> {
        prepare_folders_structure(db.connection())?;
        Ok(Self { db })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn conn(&self) -> &Connection {
        self.db.connection()
    }

    fn rows_by_parent(&self) -> Result<HashMap<String, Vec<EntityRow>>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT id, title, url, is_folder, parent_id FROM bookmark_entities
             WHERE parent_id IS NOT NULL ORDER BY position, rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(4)?,
                EntityRow {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    url: row.get(2)?,
                    is_folder: row.get(3)?,
                },
            ))
        })?;

        let mut by_parent: HashMap<String, Vec<EntityRow>> = HashMap::new();
        for row in rows {
            let (parent, entity) = row?;
            by_parent.entry(parent).or_default().push(entity);
        }
        Ok(by_parent)
    }

    fn build_children(
        parent: &str,
        by_parent: &HashMap<String, Vec<EntityRow>>,
        favorites: &HashSet<String>,
        visited: &mut HashSet<String>,
    ) -> Result<Vec<BookmarkEntity>, StoreError> {
        let Some(rows) = by_parent.get(parent) else {
            return Ok(Vec::new());
        };
        let mut children = Vec::with_capacity(rows.len());
        for row in rows {
            if !visited.insert(row.id.clone()) {
                log::warn!("event=load_bookmarks module=store status=skipped reason=revisited");
                continue;
            }
            let entity = match (&row.url, row.is_folder) {
                (Some(_), true) => {
                    return Err(StructuralError::FolderHasUrl(row.id.clone()).into());
                }
                (Some(url), false) => BookmarkEntity::Bookmark(Bookmark::new(
                    row.id.clone(),
                    url.clone(),
                    row.title.clone(),
                    favorites.contains(&row.id),
                    entity_parent(parent),
                )),
                (None, true) => BookmarkEntity::Folder(
                    BookmarkFolder::new(row.id.clone(), row.title.clone(), entity_parent(parent))
                        .with_children(Self::build_children(
                            &row.id, by_parent, favorites, visited,
                        )?),
                ),
                (None, false) => continue,
            };
            children.push(entity);
        }
        Ok(children)
    }
}

impl BookmarkStore for SqliteBookmarkStore {
    fn load_all(&self) -> Result<Vec<BookmarkEntity>, StoreError> {
        let by_parent = self.rows_by_parent()?;
        let favorites: HashSet<String> = favorite_ids(self.conn())?.into_iter().collect();
        let mut visited = HashSet::new();
        let entities = Self::build_children(ROOT_FOLDER_ID, &by_parent, &favorites, &mut visited)?;
        log::debug!(
            "event=load_all module=store status=ok entities={}",
            visited.len()
        );
        Ok(entities)
    }

    fn load_favorites(&self) -> Result<Vec<Bookmark>, StoreError> {
        let mut stmt = self.conn().prepare(
            "SELECT e.id, e.url, e.title, e.parent_id FROM favorites f
             JOIN bookmark_entities e ON e.id = f.bookmark_id
             WHERE e.is_folder = 0
             ORDER BY f.position, f.rowid",
        )?;
        let favorites = stmt
            .query_map([], |row| {
                let parent: Option<String> = row.get(3)?;
                Ok(Bookmark::new(
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    true,
                    parent.and_then(|p| entity_parent(&p)),
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(favorites)
    }

    fn save_bookmark(
        &mut self,
        bookmark: &Bookmark,
        parent: Option<&str>,
        index: Option<usize>,
    ) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        let parent = parent_key(parent);
        ensure_folder(&tx, parent)?;
        insert_row(&tx, &BookmarkEntity::Bookmark(bookmark.clone()), parent, index)?;
        tx.commit()?;
        Ok(())
    }

    fn save_folder(&mut self, folder: &BookmarkFolder, parent: Option<&str>) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        let parent = parent_key(parent);
        ensure_folder(&tx, parent)?;
        insert_row(&tx, &BookmarkEntity::Folder(folder.clone()), parent, None)?;
        tx.commit()?;
        Ok(())
    }

    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        let affected = tx.execute(
            "UPDATE bookmark_entities SET title = ?1, url = ?2 WHERE id = ?3 AND is_folder = 0",
            params![bookmark.title, bookmark.url, bookmark.id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound(bookmark.id.clone()));
        }
        if bookmark.is_favorite {
            append_favorite(&tx, &bookmark.id)?;
        } else {
            tx.execute("DELETE FROM favorites WHERE bookmark_id = ?1", [&bookmark.id])?;
        }
        tx.commit()?;
        Ok(())
    }

    fn update_folder(&mut self, folder: &BookmarkFolder) -> Result<(), StoreError> {
        let affected = self.conn().execute(
            "UPDATE bookmark_entities SET title = ?1 WHERE id = ?2 AND is_folder = 1",
            params![folder.title, folder.id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound(folder.id.clone()));
        }
        Ok(())
    }

    fn update_folder_and_move(
        &mut self,
        folder: &BookmarkFolder,
        parent: &ParentFolder,
    ) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        let affected = tx.execute(
            "UPDATE bookmark_entities SET title = ?1 WHERE id = ?2 AND is_folder = 1",
            params![folder.title, folder.id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound(folder.id.clone()));
        }
        let target = parent_key(parent.id());
        if stored_parent(&tx, &folder.id)?.as_deref() != Some(target) {
            move_rows(&tx, std::slice::from_ref(&folder.id), None, target)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, ids: &[String]) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        for id in ids.iter().filter(|id| !is_synthetic_root(id)) {
            tx.execute("DELETE FROM bookmark_entities WHERE id = ?1", [id])?;
        }
        tx.commit()?;
        log::debug!("event=remove module=store status=ok count={}", ids.len());
        Ok(())
    }

    fn move_objects(
        &mut self,
        ids: &[String],
        index: Option<usize>,
        parent: &ParentFolder,
    ) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        move_rows(&tx, ids, index, parent_key(parent.id()))?;
        tx.commit()?;
        Ok(())
    }

    fn move_favorites(&mut self, ids: &[String], index: Option<usize>) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        let mut order = favorite_ids(&tx)?;
        let moving: Vec<String> = ids
            .iter()
            .filter(|id| order.contains(id))
            .cloned()
            .collect();
        splice_block(&mut order, &moving, index);
        write_favorites(&tx, &order)?;
        tx.commit()?;
        Ok(())
    }

    fn save_bookmarks_in_new_folder(
        &mut self,
        websites: &[WebsiteInfo],
        folder_name: &str,
        parent: &ParentFolder,
    ) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        let parent = parent_key(parent.id());
        ensure_folder(&tx, parent)?;
        let folder = BookmarkFolder::with_new_id(folder_name, entity_parent(parent));
        let children: Vec<BookmarkEntity> = websites
            .iter()
            .map(|site| {
                Bookmark::with_new_id(&site.url, &site.title, false, Some(folder.id.clone())).into()
            })
            .collect();
        let folder = folder.with_children(children);
        insert_row(&tx, &BookmarkEntity::Folder(folder), parent, None)?;
        tx.commit()?;
        log::info!(
            "event=save_bookmarks_in_new_folder module=store status=ok count={}",
            websites.len()
        );
        Ok(())
    }

    fn fetch_folder(&self, id: &str) -> Result<Option<BookmarkFolder>, StoreError> {
        let row = self
            .conn()
            .query_row(
                "SELECT title, parent_id FROM bookmark_entities WHERE id = ?1 AND is_folder = 1",
                [id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .optional()?;
        let Some((title, parent)) = row else {
            return Ok(None);
        };

        let by_parent = self.rows_by_parent()?;
        let favorites: HashSet<String> = favorite_ids(self.conn())?.into_iter().collect();
        let mut visited = HashSet::from([id.to_string()]);
        let children = Self::build_children(id, &by_parent, &favorites, &mut visited)?;
        Ok(Some(
            BookmarkFolder::new(id, title, parent.and_then(|p| entity_parent(&p)))
                .with_children(children),
        ))
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        let tx = self.conn().unchecked_transaction()?;
        tx.execute("DELETE FROM favorites", [])?;
        tx.execute(
            "DELETE FROM bookmark_entities WHERE id NOT IN (?1, ?2)",
            params![ROOT_FOLDER_ID, FAVORITES_FOLDER_ID],
        )?;
        tx.commit()?;
        log::info!("event=reset module=store status=ok");
        Ok(())
    }
}
