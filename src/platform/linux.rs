// Linux follows the XDG base directory layout.
// Config: ~/.config/bookmark-core
// Data:   ~/.local/share/bookmark-core
// Logs:   ~/.local/state/bookmark-core/logs

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "bookmark-core";

fn xdg_dir(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> PathBuf {
    match xdg.filter(|value| !value.is_empty()) {
        Some(dir) => PathBuf::from(dir).join(APP_DIR),
        None => {
            let mut path = PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")));
            path.extend(fallback);
            path.join(APP_DIR)
        }
    }
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_CONFIG_HOME").ok(),
        env::var("HOME").ok(),
        &[".config"],
    )
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_DATA_HOME").ok(),
        env::var("HOME").ok(),
        &[".local", "share"],
    )
}

pub fn get_log_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_STATE_HOME").ok(),
        env::var("HOME").ok(),
        &[".local", "state"],
    )
    .join("logs")
}
