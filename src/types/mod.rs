// Bookmark core shared type definitions
// Entity model, drag payloads, settings and error types.

pub mod bookmark;
pub mod errors;
pub mod pasteboard;
pub mod settings;
