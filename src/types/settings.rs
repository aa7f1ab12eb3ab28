use serde::{Deserialize, Serialize};

use super::bookmark::SortMode;

/// Top-level settings container for the bookmark core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct BookmarkSettings {
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
    pub presentation: PresentationSettings,
    pub search: SearchSettings,
}

/// Where bookmark data lives on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Overrides the platform data directory location of `bookmarks.db`.
    pub database_path: Option<String>,
    /// Legacy database to import from on first start.
    pub legacy_database_path: Option<String>,
    pub migrate_on_startup: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            legacy_database_path: None,
            migrate_on_startup: true,
        }
    }
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `log` level filter spec, e.g. `"info"` or `"bookmark_core=debug"`.
    pub level: String,
    pub log_to_file: bool,
    /// Overrides the platform log directory.
    pub directory: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            directory: None,
        }
    }
}

/// How the bookmark tree is presented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresentationSettings {
    pub sort_mode: SortMode,
    /// Sidebar shows bookmarks as well as folders.
    pub show_bookmarks_in_sidebar: bool,
}

impl Default for PresentationSettings {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::Manual,
            show_bookmarks_in_sidebar: true,
        }
    }
}

/// Search behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    /// Maximum number of results returned. `0` means unlimited.
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { max_results: 0 }
    }
}
