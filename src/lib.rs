//! Bookmark core: the data model, url index, tree presentation and SQLite
//! persistence behind a browser's bookmarks.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
