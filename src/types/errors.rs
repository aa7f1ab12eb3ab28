use std::fmt;

// === StructuralError ===

/// Violations of the bookmark hierarchy's structural rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// A folder record carried a url.
    FolderHasUrl(String),
    /// Placing `folder_id` under `parent_id` would make the folder its own ancestor.
    CycleDetected { folder_id: String, parent_id: String },
    /// The referenced parent folder does not exist.
    MissingParent(String),
    /// Two entities share the same identifier.
    DuplicateId(String),
    /// Favorite flag and favorites container disagree.
    InvalidFavoritesFolder(String),
    /// A child does not point back at the folder that contains it.
    ParentMismatch { child_id: String, folder_id: String },
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::FolderHasUrl(id) => write!(f, "Folder has a url: {}", id),
            StructuralError::CycleDetected {
                folder_id,
                parent_id,
            } => write!(
                f,
                "Moving folder {} under {} would create a cycle",
                folder_id, parent_id
            ),
            StructuralError::MissingParent(id) => write!(f, "Parent folder not found: {}", id),
            StructuralError::DuplicateId(id) => write!(f, "Duplicate entity id: {}", id),
            StructuralError::InvalidFavoritesFolder(id) => {
                write!(f, "Invalid favorites folder for bookmark: {}", id)
            }
            StructuralError::ParentMismatch {
                child_id,
                folder_id,
            } => write!(
                f,
                "Entity {} does not reference its containing folder {}",
                child_id, folder_id
            ),
        }
    }
}

impl std::error::Error for StructuralError {}

// === StoreError ===

/// Errors reported by a bookmark persistence backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The referenced entity does not exist in the store.
    NotFound(String),
    /// The write would break the hierarchy.
    Structural(StructuralError),
    /// Underlying database failure.
    DatabaseError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "Stored entity not found: {}", id),
            StoreError::Structural(err) => write!(f, "Store rejected write: {}", err),
            StoreError::DatabaseError(msg) => write!(f, "Bookmark store database error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Structural(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

impl From<StructuralError> for StoreError {
    fn from(err: StructuralError) -> Self {
        StoreError::Structural(err)
    }
}

// === BookmarkError ===

/// Errors surfaced by the bookmark manager.
///
/// Duplicates, unknown ids and calls made before the first load are not
/// errors; those come back as `None` or `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkError {
    /// The persistence backend failed. In-memory state has been rolled back.
    Persistence(StoreError),
    /// The request would break the hierarchy and was rejected before any write.
    Structural(StructuralError),
    /// A serialized background task did not run to completion.
    Interrupted(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::Persistence(err) => write!(f, "Bookmark persistence failed: {}", err),
            BookmarkError::Structural(err) => write!(f, "Invalid bookmark structure: {}", err),
            BookmarkError::Interrupted(msg) => write!(f, "Bookmark task interrupted: {}", msg),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookmarkError::Persistence(err) => Some(err),
            BookmarkError::Structural(err) => Some(err),
            BookmarkError::Interrupted(_) => None,
        }
    }
}

impl From<StoreError> for BookmarkError {
    fn from(err: StoreError) -> Self {
        BookmarkError::Persistence(err)
    }
}

impl From<StructuralError> for BookmarkError {
    fn from(err: StructuralError) -> Self {
        BookmarkError::Structural(err)
    }
}

// === FaviconError ===

/// Errors from the favicon collaborator. Never fatal to a bookmark operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaviconError {
    /// Favicon storage failed.
    Storage(String),
}

impl fmt::Display for FaviconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaviconError::Storage(msg) => write!(f, "Favicon storage error: {}", msg),
        }
    }
}

impl std::error::Error for FaviconError {}

// === PasteboardError ===

/// Errors decoding or encoding a drag payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasteboardError {
    /// The payload was produced by an incompatible writer.
    UnsupportedVersion(u32),
    /// JSON encoding or decoding failed.
    Serialization(String),
    /// A folder payload carried a url.
    Structural(StructuralError),
}

impl fmt::Display for PasteboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasteboardError::UnsupportedVersion(v) => {
                write!(f, "Unsupported pasteboard version: {}", v)
            }
            PasteboardError::Serialization(msg) => {
                write!(f, "Pasteboard serialization error: {}", msg)
            }
            PasteboardError::Structural(err) => write!(f, "Invalid pasteboard entity: {}", err),
        }
    }
}

impl std::error::Error for PasteboardError {}

// === MigrationError ===

/// Errors raised while importing a legacy bookmark database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// Reading the legacy database failed.
    Source(String),
    /// Writing the current schema failed. The import was rolled back.
    Destination(String),
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationError::Source(msg) => write!(f, "Legacy bookmark source error: {}", msg),
            MigrationError::Destination(msg) => {
                write!(f, "Bookmark migration write failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for MigrationError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => write!(f, "Invalid settings value: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}
