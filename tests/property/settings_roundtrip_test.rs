//! Property-based tests for BookmarkSettings serialization round-trip.
//!
//! Settings written by the engine must read back unchanged for arbitrary
//! valid inputs.

use bookmark_core::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use bookmark_core::types::bookmark::SortMode;
use bookmark_core::types::settings::{
    BookmarkSettings, LoggingSettings, PresentationSettings, SearchSettings, StorageSettings,
};
use proptest::prelude::*;

fn arb_sort_mode() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::Manual),
        Just(SortMode::NameAscending),
        Just(SortMode::NameDescending),
    ]
}

fn arb_path() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("/[a-z0-9_]{1,12}(/[a-z0-9_.]{1,12}){0,3}")
}

fn arb_settings() -> impl Strategy<Value = BookmarkSettings> {
    (
        (arb_path(), arb_path(), any::<bool>()),
        (
            prop_oneof![Just("error"), Just("warn"), Just("info"), Just("debug")],
            any::<bool>(),
            arb_path(),
        ),
        (arb_sort_mode(), any::<bool>()),
        0usize..500,
    )
        .prop_map(
            |(
                (database_path, legacy_database_path, migrate_on_startup),
                (level, log_to_file, directory),
                (sort_mode, show_bookmarks_in_sidebar),
                max_results,
            )| BookmarkSettings {
                storage: StorageSettings {
                    database_path,
                    legacy_database_path,
                    migrate_on_startup,
                },
                logging: LoggingSettings {
                    level: level.to_string(),
                    log_to_file,
                    directory,
                },
                presentation: PresentationSettings {
                    sort_mode,
                    show_bookmarks_in_sidebar,
                },
                search: SearchSettings { max_results },
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// JSON serialization of any settings value is lossless.
    #[test]
    fn settings_json_roundtrip(settings in arb_settings()) {
        let json = serde_json::to_string(&settings).expect("serialize");
        let decoded: BookmarkSettings = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(decoded, settings);
    }

    /// Saving through the engine and loading with a new engine is lossless.
    #[test]
    fn settings_engine_disk_roundtrip(sort_mode in arb_sort_mode(), max_results in 0usize..1000) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.load().expect("load defaults");
        engine
            .set_value("presentation.sort_mode", serde_json::to_value(sort_mode).unwrap())
            .expect("set sort mode");
        engine
            .set_value("search.max_results", serde_json::json!(max_results))
            .expect("set max results");

        let mut reloaded = SettingsEngine::new(Some(path));
        let loaded = reloaded.load().expect("reload");
        prop_assert_eq!(loaded.presentation.sort_mode, sort_mode);
        prop_assert_eq!(loaded.search.max_results, max_results);
        prop_assert_eq!(&loaded, engine.get_settings());
    }
}
