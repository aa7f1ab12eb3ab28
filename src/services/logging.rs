//! Logging bootstrap for the bookmark core.
//!
//! Library code only emits through the `log` facade using
//! `event=... module=... status=...` lines. Binaries call [`init_logging`]
//! once at startup to route those records to stderr or rolling files.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

use crate::types::settings::LoggingSettings;

const LOG_FILE_BASENAME: &str = "bookmark-core";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: Option<PathBuf>,
    _logger: LoggerHandle,
}

/// Starts the global logger from settings.
///
/// Repeated calls with the same level and destination are no-ops; a call
/// asking for a different configuration is rejected.
///
/// # Errors
/// Returns a readable message when the level spec is invalid, the log
/// directory cannot be created, or the backend fails to start.
pub fn init_logging(settings: &LoggingSettings, default_dir: &Path) -> Result<(), String> {
    let level = settings.level.trim().to_string();
    let log_dir = settings.log_to_file.then(|| {
        settings
            .directory
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_dir.to_path_buf())
    });

    if let Some(state) = LOGGING_STATE.get() {
        return check_same(state, &level, &log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, String> {
        let logger = Logger::try_with_str(&level)
            .map_err(|err| format!("invalid log level `{}`: {}", level, err))?;

        let logger = match &log_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).map_err(|err| {
                    format!("failed to create log directory `{}`: {}", dir.display(), err)
                })?;
                logger
                    .log_to_file(FileSpec::default().directory(dir).basename(LOG_FILE_BASENAME))
                    .rotate(
                        Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                        Naming::Numbers,
                        Cleanup::KeepLogFiles(MAX_LOG_FILES),
                    )
                    .write_mode(WriteMode::BufferAndFlush)
                    .append()
                    .format_for_files(flexi_logger::detailed_format)
            }
            None => logger.log_to_stderr(),
        };
        let handle = logger
            .start()
            .map_err(|err| format!("failed to start logger: {}", err))?;

        log::info!(
            "event=logging_init module=logging status=ok level={} version={}",
            level,
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level: level.clone(),
            log_dir: log_dir.clone(),
            _logger: handle,
        })
    })?;

    check_same(state, &level, &log_dir)
}

fn check_same(state: &LoggingState, level: &str, log_dir: &Option<PathBuf>) -> Result<(), String> {
    if &state.log_dir != log_dir {
        return Err(format!(
            "logging already initialized with destination {:?}; refusing to switch to {:?}",
            state.log_dir, log_dir
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }
    Ok(())
}

/// Active `(level, log_dir)` or `None` before [`init_logging`].
pub fn logging_status() -> Option<(String, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level.clone(), state.log_dir.clone()))
}
