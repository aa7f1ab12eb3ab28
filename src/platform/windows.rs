// Config and data: %APPDATA%/BookmarkCore
// Logs:            %LOCALAPPDATA%/BookmarkCore/logs

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "BookmarkCore";

pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join(APP_DIR)
}

pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}

pub fn get_log_dir() -> PathBuf {
    let local_appdata = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local_appdata).join(APP_DIR).join("logs")
}
