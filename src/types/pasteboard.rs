//! Drag-and-drop payloads.
//!
//! Entities travel between views as small JSON documents carrying just
//! enough to identify them. The payload is versioned so a reader can reject
//! data written by an incompatible build.

use serde::{Deserialize, Serialize};

use super::bookmark::{BookmarkEntity, BookmarkFolder};
use super::errors::{PasteboardError, StructuralError};

/// Version written into every payload.
pub const PASTEBOARD_VERSION: u32 = 1;

/// A dragged bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteboardBookmark {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub is_favorite: bool,
}

/// A dragged folder. Children are not carried; the drop target resolves them by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasteboardFolder {
    pub id: String,
    pub name: String,
    /// Only present in malformed payloads. Decoding rejects folders that carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PasteboardEntity {
    Bookmark(PasteboardBookmark),
    Folder(PasteboardFolder),
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    entities: Vec<PasteboardEntity>,
}

impl PasteboardEntity {
    pub fn id(&self) -> &str {
        match self {
            PasteboardEntity::Bookmark(b) => &b.id,
            PasteboardEntity::Folder(f) => &f.id,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, PasteboardEntity::Folder(_))
    }

    /// Encodes a drag selection.
    pub fn encode(entities: &[PasteboardEntity]) -> Result<String, PasteboardError> {
        let envelope = Envelope {
            version: PASTEBOARD_VERSION,
            entities: entities.to_vec(),
        };
        serde_json::to_string(&envelope).map_err(|e| PasteboardError::Serialization(e.to_string()))
    }

    /// Decodes a drag selection written by [`PasteboardEntity::encode`].
    pub fn decode(json: &str) -> Result<Vec<PasteboardEntity>, PasteboardError> {
        let envelope: Envelope = serde_json::from_str(json)
            .map_err(|e| PasteboardError::Serialization(e.to_string()))?;
        if envelope.version != PASTEBOARD_VERSION {
            return Err(PasteboardError::UnsupportedVersion(envelope.version));
        }
        for entity in &envelope.entities {
            if let PasteboardEntity::Folder(folder) = entity {
                if folder.url.is_some() {
                    return Err(PasteboardError::Structural(StructuralError::FolderHasUrl(
                        folder.id.clone(),
                    )));
                }
            }
        }
        Ok(envelope.entities)
    }
}

impl From<&BookmarkEntity> for PasteboardEntity {
    fn from(entity: &BookmarkEntity) -> Self {
        match entity {
            BookmarkEntity::Bookmark(b) => PasteboardEntity::Bookmark(PasteboardBookmark {
                id: b.id.clone(),
                url: b.url.clone(),
                title: b.title.clone(),
                is_favorite: b.is_favorite,
            }),
            BookmarkEntity::Folder(f) => PasteboardEntity::Folder(f.into()),
        }
    }
}

impl From<&BookmarkFolder> for PasteboardFolder {
    fn from(folder: &BookmarkFolder) -> Self {
        PasteboardFolder {
            id: folder.id.clone(),
            name: folder.title.clone(),
            url: None,
        }
    }
}
