// Bookmark core state managers
// The manager owns the in-memory hierarchy and url index and keeps them in step with the store.

pub mod bookmark_list;
pub mod bookmark_manager;
pub mod entity_arena;
pub mod shared_manager;
