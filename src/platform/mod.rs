//! Platform-specific locations for settings, the bookmark database and logs.
//!
//! The per-OS module is selected with `cfg(target_os)` at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Directory holding `settings.json`.
///
/// - **Linux**: `$XDG_CONFIG_HOME/bookmark-core` or `~/.config/bookmark-core`
/// - **macOS**: `~/Library/Application Support/BookmarkCore`
/// - **Windows**: `%APPDATA%/BookmarkCore`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Directory holding `bookmarks.db`.
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}

/// Default directory for rotated log files.
pub fn get_log_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_log_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_log_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_log_dir()
    }
}

/// Default location of the bookmark database.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join("bookmarks.db")
}
