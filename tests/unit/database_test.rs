//! Unit tests for the bookmark database layer (connection + migrations).

use bookmark_core::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use bookmark_core::database::Database;

fn object_exists(db: &Database, kind: &str, name: &str) -> bool {
    db.connection()
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = ?1 AND name = ?2",
            [kind, name],
            |row| row.get(0),
        )
        .unwrap_or(false)
}

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_all_tables() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    for table in ["bookmark_entities", "favorites", "schema_version"] {
        assert!(
            object_exists(&db, "table", table),
            "Table '{}' should exist after migrations",
            table
        );
    }
}

#[test]
fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    for index in ["idx_bookmark_entities_parent", "idx_bookmark_entities_url"] {
        assert!(
            object_exists(&db, "index", index),
            "Index '{}' should exist after migrations",
            index
        );
    }
}

#[test]
fn test_schema_version_is_current() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
    assert_eq!(CURRENT_SCHEMA_VERSION, 2);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = bookmark_core::database::migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(get_schema_version(db.connection()), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("bookmarks.db");

    let db = Database::open(&db_path);
    assert!(db.is_ok(), "open with file path should succeed");
    assert!(db_path.exists(), "Database file should exist on disk");
}

#[test]
fn test_folder_row_rejects_url() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = db.connection().execute(
        "INSERT INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
         VALUES ('f-1', 'Folder', 'https://example.com', 1, NULL, 0, 0)",
        [],
    );
    assert!(result.is_err(), "A folder row carrying a url must be rejected");
}

#[test]
fn test_bookmark_row_requires_url() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let result = db.connection().execute(
        "INSERT INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
         VALUES ('b-1', 'Bookmark', NULL, 0, NULL, 0, 0)",
        [],
    );
    assert!(result.is_err(), "A bookmark row without a url must be rejected");
}

#[test]
fn test_deleting_folder_cascades_to_children() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();
    conn.execute_batch(
        "INSERT INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
         VALUES ('f-1', 'Folder', NULL, 1, NULL, 0, 0);
         INSERT INTO bookmark_entities (id, title, url, is_folder, parent_id, position, created_at)
         VALUES ('b-1', 'Child', 'https://example.com', 0, 'f-1', 0, 0);
         INSERT INTO favorites (bookmark_id, position) VALUES ('b-1', 0);",
    )
    .expect("seed rows");

    conn.execute("DELETE FROM bookmark_entities WHERE id = 'f-1'", [])
        .expect("delete folder");

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM bookmark_entities", [], |row| row.get(0))
        .unwrap();
    let favorites: i64 = conn
        .query_row("SELECT COUNT(*) FROM favorites", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
    assert_eq!(favorites, 0);
}
