//! Bookmark core command-line front end.
//!
//! Opens the bookmark database from the user's settings, imports a legacy
//! database on first start, and runs one command against the bookmarks.

use std::path::PathBuf;
use std::process::ExitCode;

use bookmark_core::database::legacy_migration::{migrate_legacy_store, MigrationOutcome};
use bookmark_core::database::{Database, SqliteBookmarkStore};
use bookmark_core::managers::bookmark_manager::{BookmarkManager, NoFavicons};
use bookmark_core::managers::shared_manager::SharedBookmarkManager;
use bookmark_core::platform;
use bookmark_core::services::logging::init_logging;
use bookmark_core::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use bookmark_core::services::tree_controller::{
    BookmarkSidebarDataSource, BookmarkTreeController, ContentMode,
};
use bookmark_core::services::url_variants::bookmark_url_variants;
use bookmark_core::types::bookmark::{BookmarkEntity, ParentFolder};
use bookmark_core::types::settings::BookmarkSettings;

const USAGE: &str = "usage: bookmark-core <command> [args]

commands:
  list                         print the bookmark tree
  add <url> <title> [--favorite]
  folder <title>               create a top-level folder
  search <query>
  variants <url>               print the urls treated as equivalent
  migrate <legacy-db>          import a legacy database";

type Manager = SharedBookmarkManager<SqliteBookmarkStore, NoFavicons>;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().cloned() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let mut engine = SettingsEngine::new(std::env::var("BOOKMARK_CORE_SETTINGS").ok());
    let settings = match engine.load() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = init_logging(&settings.logging, &platform::get_log_dir()) {
        eprintln!("{}", err);
    }

    if command == "variants" {
        return match args.get(1) {
            Some(url) => {
                for variant in bookmark_url_variants(url) {
                    println!("{}", variant);
                }
                ExitCode::SUCCESS
            }
            None => usage_error(),
        };
    }

    let db = match open_database(&settings, &args) {
        Ok(db) => db,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };
    if command == "migrate" {
        return ExitCode::SUCCESS;
    }

    let manager = match start_manager(db).await {
        Ok(manager) => manager,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let result = match command.as_str() {
        "list" => {
            print_tree(&manager, &settings);
            Ok(())
        }
        "add" => match (args.get(1), args.get(2)) {
            (Some(url), Some(title)) => {
                let favorite = args.iter().any(|a| a == "--favorite");
                manager
                    .make_bookmark(url.clone(), title.clone(), favorite, None, ParentFolder::Root)
                    .await
                    .map(|created| match created {
                        Some(bookmark) => println!("added {}", bookmark.id),
                        None => println!("already bookmarked: {}", url),
                    })
            }
            _ => return usage_error(),
        },
        "folder" => match args.get(1) {
            Some(title) => manager
                .make_folder(title.clone(), ParentFolder::Root)
                .await
                .map(|created| {
                    if let Some(folder) = created {
                        println!("created {}", folder.id);
                    }
                }),
            None => return usage_error(),
        },
        "search" => match args.get(1) {
            Some(query) => {
                let mut results = manager.search(query);
                let limit = settings.search.max_results;
                if limit > 0 {
                    results.truncate(limit);
                }
                for entity in results {
                    print_entity(&entity, 0);
                }
                Ok(())
            }
            None => return usage_error(),
        },
        _ => return usage_error(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn usage_error() -> ExitCode {
    eprintln!("{}", USAGE);
    ExitCode::from(2)
}

fn open_database(settings: &BookmarkSettings, args: &[String]) -> Result<Database, String> {
    let path = settings
        .storage
        .database_path
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(platform::default_database_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let db = Database::open(&path).map_err(|err| err.to_string())?;

    let legacy_path = if args.first().map(String::as_str) == Some("migrate") {
        Some(args.get(1).cloned().ok_or_else(|| USAGE.to_string())?)
    } else if settings.storage.migrate_on_startup {
        settings.storage.legacy_database_path.clone()
    } else {
        None
    };

    let legacy = legacy_path
        .filter(|p| PathBuf::from(p).exists())
        .map(rusqlite::Connection::open)
        .transpose()
        .map_err(|err| err.to_string())?;
    match migrate_legacy_store(legacy.as_ref(), db.connection()) {
        Ok(MigrationOutcome::Migrated { count }) => println!("imported {} legacy entities", count),
        Ok(_) => {}
        Err(err) => return Err(err.to_string()),
    }
    Ok(db)
}

async fn start_manager(db: Database) -> Result<Manager, String> {
    let store = SqliteBookmarkStore::new(db).map_err(|err| err.to_string())?;
    let manager = SharedBookmarkManager::new(BookmarkManager::new(store));
    manager.load_bookmarks().await.map_err(|err| err.to_string())?;
    Ok(manager)
}

fn print_tree(manager: &Manager, settings: &BookmarkSettings) {
    let Some(snapshot) = manager.snapshot() else {
        return;
    };
    let mode = if settings.presentation.show_bookmarks_in_sidebar {
        ContentMode::FoldersAndBookmarks
    } else {
        ContentMode::FoldersOnly
    };
    let controller = BookmarkTreeController::new(
        BookmarkSidebarDataSource::from_snapshot(&snapshot, mode),
        settings.presentation.sort_mode,
    );
    controller.visit_nodes(|node| {
        if let Some(entity) = node.entity() {
            print_entity(entity, node.level().saturating_sub(1));
        }
    });
}

fn print_entity(entity: &BookmarkEntity, depth: usize) {
    let indent = "  ".repeat(depth);
    match entity {
        BookmarkEntity::Folder(folder) => println!("{}{}/", indent, folder.title),
        BookmarkEntity::Bookmark(bookmark) => {
            let star = if bookmark.is_favorite { " *" } else { "" };
            println!("{}{} <{}>{}", indent, bookmark.title, bookmark.url, star);
        }
    }
}
