// Config and data: ~/Library/Application Support/BookmarkCore
// Logs:            ~/Library/Logs/BookmarkCore

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "BookmarkCore";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join(APP_DIR)
}

pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}

pub fn get_log_dir() -> PathBuf {
    home_dir().join("Library").join("Logs").join(APP_DIR)
}
