use bookmark_core::types::errors::*;

// === StructuralError Tests ===

#[test]
fn structural_error_display_variants() {
    assert_eq!(
        StructuralError::FolderHasUrl("f-1".to_string()).to_string(),
        "Folder has a url: f-1"
    );
    assert_eq!(
        StructuralError::CycleDetected {
            folder_id: "a".to_string(),
            parent_id: "b".to_string(),
        }
        .to_string(),
        "Moving folder a under b would create a cycle"
    );
    assert_eq!(
        StructuralError::MissingParent("p".to_string()).to_string(),
        "Parent folder not found: p"
    );
    assert_eq!(
        StructuralError::DuplicateId("x".to_string()).to_string(),
        "Duplicate entity id: x"
    );
    assert_eq!(
        StructuralError::InvalidFavoritesFolder("b".to_string()).to_string(),
        "Invalid favorites folder for bookmark: b"
    );
    assert_eq!(
        StructuralError::ParentMismatch {
            child_id: "c".to_string(),
            folder_id: "f".to_string(),
        }
        .to_string(),
        "Entity c does not reference its containing folder f"
    );
}

#[test]
fn structural_error_implements_error_trait() {
    let err: Box<dyn std::error::Error> =
        Box::new(StructuralError::DuplicateId("id".to_string()));
    assert!(err.source().is_none());
}

// === StoreError Tests ===

#[test]
fn store_error_display_variants() {
    assert_eq!(
        StoreError::NotFound("b-1".to_string()).to_string(),
        "Stored entity not found: b-1"
    );
    assert_eq!(
        StoreError::Structural(StructuralError::MissingParent("p".to_string())).to_string(),
        "Store rejected write: Parent folder not found: p"
    );
    assert_eq!(
        StoreError::DatabaseError("disk full".to_string()).to_string(),
        "Bookmark store database error: disk full"
    );
}

#[test]
fn store_error_from_structural() {
    let err: StoreError = StructuralError::DuplicateId("x".to_string()).into();
    assert!(matches!(err, StoreError::Structural(StructuralError::DuplicateId(_))));
}

#[test]
fn store_error_from_rusqlite() {
    let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, StoreError::DatabaseError(_)));
}

// === BookmarkError Tests ===

#[test]
fn bookmark_error_display_variants() {
    assert_eq!(
        BookmarkError::Persistence(StoreError::NotFound("b".to_string())).to_string(),
        "Bookmark persistence failed: Stored entity not found: b"
    );
    assert_eq!(
        BookmarkError::Structural(StructuralError::MissingParent("p".to_string())).to_string(),
        "Invalid bookmark structure: Parent folder not found: p"
    );
    assert_eq!(
        BookmarkError::Interrupted("cancelled".to_string()).to_string(),
        "Bookmark task interrupted: cancelled"
    );
}

#[test]
fn bookmark_error_conversions() {
    let from_store: BookmarkError = StoreError::NotFound("x".to_string()).into();
    assert!(matches!(from_store, BookmarkError::Persistence(_)));

    let from_structural: BookmarkError = StructuralError::DuplicateId("x".to_string()).into();
    assert!(matches!(from_structural, BookmarkError::Structural(_)));
}

// === MigrationError Tests ===

#[test]
fn migration_error_display_variants() {
    assert_eq!(
        MigrationError::Source("locked".to_string()).to_string(),
        "Legacy bookmark source error: locked"
    );
    assert_eq!(
        MigrationError::Destination("readonly".to_string()).to_string(),
        "Bookmark migration write failed: readonly"
    );
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(
        SettingsError::InvalidKey("foo.bar".to_string()).to_string(),
        "Invalid settings key: foo.bar"
    );
    assert_eq!(
        SettingsError::InvalidValue("bad".to_string()).to_string(),
        "Invalid settings value: bad"
    );
    assert_eq!(
        SettingsError::IoError("denied".to_string()).to_string(),
        "Settings I/O error: denied"
    );
}

#[test]
fn all_errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StructuralError>();
    assert_send_sync::<StoreError>();
    assert_send_sync::<BookmarkError>();
    assert_send_sync::<MigrationError>();
    assert_send_sync::<SettingsError>();
    assert_send_sync::<PasteboardError>();
    assert_send_sync::<FaviconError>();
}
