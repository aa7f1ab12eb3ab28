// Bookmark core services
// Stateless helpers and presentation: tree nodes, search, url variants, drag and drop, settings, logging.

pub mod bookmark_node;
pub mod bookmark_search;
pub mod drag_drop;
pub mod logging;
pub mod settings_engine;
pub mod tree_controller;
pub mod url_variants;
