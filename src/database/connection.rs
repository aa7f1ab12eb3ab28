//! SQLite connection management for the bookmark core.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

use super::migrations;

/// Owns the SQLite connection backing the bookmark store.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at `path` and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let started_at = Instant::now();
        log::info!("event=db_open module=db status=start mode=file");
        let conn = Connection::open(path).map_err(|err| {
            log::error!(
                "event=db_open module=db status=error mode=file duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            err
        })?;
        Self::bootstrap(conn, "file", started_at)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let started_at = Instant::now();
        let conn = Connection::open_in_memory()?;
        Self::bootstrap(conn, "memory", started_at)
    }

    fn bootstrap(conn: Connection, mode: &str, started_at: Instant) -> Result<Self, rusqlite::Error> {
        if let Err(err) = migrations::run_all(&conn) {
            log::error!(
                "event=db_migrate module=db status=error mode={} duration_ms={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
        log::info!(
            "event=db_open module=db status=ok mode={} schema_version={} duration_ms={}",
            mode,
            migrations::get_schema_version(&conn),
            started_at.elapsed().as_millis()
        );
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
