//! One-shot import from the legacy bookmark database.
//!
//! The legacy layout keeps every entity in a single `legacy_bookmarks` table
//! with two special containers: a root folder and a favorites folder. Favorite
//! membership and order are columns on the bookmark row itself.
//!
//! The import runs once. A destination that already owns a root folder is
//! left untouched, so calling it on every startup is safe.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::bookmark_store::{has_root_folder, prepare_folders_structure};
use crate::types::bookmark::ROOT_FOLDER_ID;
use crate::types::errors::MigrationError;

pub const LEGACY_ROOT_FOLDER_ID: &str = "legacy_bookmarks_root";
pub const LEGACY_FAVORITES_FOLDER_ID: &str = "legacy_favorites_root";

/// Result of [`migrate_legacy_store`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The destination was already populated; nothing was read.
    AlreadyMigrated,
    /// `count` entities were copied.
    Migrated { count: usize },
    /// No legacy data was found. The empty structure was created.
    NothingToMigrate,
}

#[derive(Debug, Clone)]
struct LegacyRow {
    id: String,
    title: Option<String>,
    url: Option<String>,
    is_folder: bool,
    parent_id: Option<String>,
    favorites_root_id: Option<String>,
    favorites_position: Option<i64>,
    date_added: i64,
}

/// Creates the legacy table. Used by tests and tooling that seed old data.
pub fn create_legacy_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS legacy_bookmarks (
            id TEXT PRIMARY KEY,
            title TEXT,
            url TEXT,
            is_folder INTEGER NOT NULL DEFAULT 0,
            parent_id TEXT,
            position INTEGER NOT NULL DEFAULT 0,
            favorites_root_id TEXT,
            favorites_position INTEGER,
            date_added INTEGER NOT NULL DEFAULT 0
        );
        ",
    )
}

fn legacy_table_exists(conn: &Connection) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'legacy_bookmarks'",
        [],
        |row| row.get(0),
    )
}

fn read_legacy_rows(conn: &Connection) -> Result<Vec<LegacyRow>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, title, url, is_folder, parent_id, favorites_root_id, favorites_position, date_added
         FROM legacy_bookmarks
         ORDER BY position, date_added, rowid",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LegacyRow {
                id: row.get(0)?,
                title: row.get(1)?,
                url: row.get(2)?,
                is_folder: row.get(3)?,
                parent_id: row.get(4)?,
                favorites_root_id: row.get(5)?,
                favorites_position: row.get(6)?,
                date_added: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn is_legacy_container(id: &str) -> bool {
    id == LEGACY_ROOT_FOLDER_ID || id == LEGACY_FAVORITES_FOLDER_ID
}

/// Copies the legacy tree into `destination`.
///
/// Entities get fresh ids. Rows without a title, folders carrying a url and
/// bookmarks without one are dropped together with their subtrees. All writes
/// happen in one transaction; on failure the destination is left with just
/// the empty root structure.
///
/// # Errors
/// [`MigrationError::Source`] when the legacy rows cannot be read,
/// [`MigrationError::Destination`] when the import could not be written.
pub fn migrate_legacy_store(
    source: Option<&Connection>,
    destination: &Connection,
) -> Result<MigrationOutcome, MigrationError> {
    let started_at = Instant::now();
    let destination_error = |err: rusqlite::Error| MigrationError::Destination(err.to_string());

    if has_root_folder(destination).map_err(destination_error)? {
        log::info!("event=legacy_migration module=db status=skipped reason=already_migrated");
        return Ok(MigrationOutcome::AlreadyMigrated);
    }

    let rows = match source {
        Some(conn) => {
            let source_error = |err: rusqlite::Error| MigrationError::Source(err.to_string());
            if legacy_table_exists(conn).map_err(source_error)? {
                read_legacy_rows(conn).map_err(source_error)?
            } else {
                Vec::new()
            }
        }
        None => Vec::new(),
    };

    if rows.is_empty() {
        prepare_folders_structure(destination).map_err(destination_error)?;
        log::info!("event=legacy_migration module=db status=skipped reason=no_legacy_data");
        return Ok(MigrationOutcome::NothingToMigrate);
    }

    match write_rows(destination, &rows) {
        Ok(count) => {
            log::info!(
                "event=legacy_migration module=db status=ok count={} duration_ms={}",
                count,
                started_at.elapsed().as_millis()
            );
            Ok(MigrationOutcome::Migrated { count })
        }
        Err(err) => {
            log::error!(
                "event=legacy_migration module=db status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            prepare_folders_structure(destination).map_err(destination_error)?;
            Err(MigrationError::Destination(err.to_string()))
        }
    }
}

fn write_rows(destination: &Connection, rows: &[LegacyRow]) -> Result<usize, rusqlite::Error> {
    let mut children: HashMap<Option<&str>, Vec<&LegacyRow>> = HashMap::new();
    for row in rows {
        children.entry(row.parent_id.as_deref()).or_default().push(row);
    }

    // Entities stranded at the top level belong under the root, after its own children.
    let mut top_level: Vec<&LegacyRow> = children
        .get(&Some(LEGACY_ROOT_FOLDER_ID))
        .cloned()
        .unwrap_or_default();
    let mut stranded: Vec<&LegacyRow> = children
        .get(&None)
        .map(|rows| {
            rows.iter()
                .copied()
                .filter(|row| !is_legacy_container(&row.id))
                .collect()
        })
        .unwrap_or_default();
    stranded.sort_by_key(|row| row.date_added);
    top_level.extend(stranded);

    let tx = destination.unchecked_transaction()?;
    prepare_folders_structure(&tx)?;

    let mut insert = tx.prepare(
        "INSERT INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let mut new_ids: HashMap<&str, String> = HashMap::new();
    let mut queue: VecDeque<(Vec<&LegacyRow>, String)> = VecDeque::new();
    queue.push_back((top_level, ROOT_FOLDER_ID.to_string()));

    while let Some((level, parent)) = queue.pop_front() {
        let mut position = 0i64;
        for row in level {
            let Some(title) = row.title.as_deref().filter(|t| !t.is_empty()) else {
                log::warn!(
                    "event=legacy_migration module=db status=skipped_row reason=missing_title legacy_id={}",
                    row.id
                );
                continue;
            };
            if row.is_folder == row.url.is_some() {
                log::warn!(
                    "event=legacy_migration module=db status=skipped_row reason=url_mismatch legacy_id={} is_folder={}",
                    row.id,
                    row.is_folder
                );
                continue;
            }

            let id = Uuid::new_v4().to_string();
            insert.execute(params![
                id,
                title,
                row.url,
                row.is_folder,
                parent,
                position,
                row.date_added
            ])?;
            position += 1;

            if row.is_folder {
                let nested = children.get(&Some(row.id.as_str())).cloned().unwrap_or_default();
                queue.push_back((nested, id.clone()));
            }
            new_ids.insert(row.id.as_str(), id);
        }
    }
    drop(insert);

    let mut favorites: Vec<&LegacyRow> = rows
        .iter()
        .filter(|row| {
            !row.is_folder && row.favorites_root_id.as_deref() == Some(LEGACY_FAVORITES_FOLDER_ID)
        })
        .filter(|row| new_ids.contains_key(row.id.as_str()))
        .collect();
    // Rows without an explicit favorites position go last, oldest first.
    favorites.sort_by_key(|row| (row.favorites_position.is_none(), row.favorites_position, row.date_added));

    {
        let mut insert_favorite =
            tx.prepare("INSERT INTO favorites (bookmark_id, position) VALUES (?1, ?2)")?;
        for (position, row) in favorites.iter().enumerate() {
            if let Some(id) = new_ids.get(row.id.as_str()) {
                insert_favorite.execute(params![id, position as i64])?;
            }
        }
    }

    let count = new_ids.len();
    tx.commit()?;
    Ok(count)
}
