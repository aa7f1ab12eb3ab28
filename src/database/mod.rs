//! Bookmark core database layer.
//!
//! Provides SQLite connection management, schema migrations, the SQLite
//! [`BookmarkStore`](crate::managers::bookmark_manager::BookmarkStore) and
//! the one-shot import from the legacy bookmark database.
//!
//! # Usage
//!
//! ```no_run
//! use bookmark_core::database::{Database, SqliteBookmarkStore};
//!
//! let db = Database::open("bookmarks.db").expect("failed to open database");
//! let store = SqliteBookmarkStore::new(db).expect("failed to prepare store");
//! ```

pub mod bookmark_store;
pub mod connection;
pub mod legacy_migration;
pub mod migrations;

pub use bookmark_store::SqliteBookmarkStore;
pub use connection::Database;
