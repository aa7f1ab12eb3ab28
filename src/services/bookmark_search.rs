//! Title search over the bookmark hierarchy.
//!
//! Titles and queries are folded the same way before comparison: accents are
//! stripped, case is lowered and every symbol becomes a word separator. Results
//! come back level by level, so a top-level match always precedes a nested one.

use std::collections::VecDeque;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::bookmark::BookmarkEntity;

/// Folds `text` into the form used for matching.
pub fn normalize_for_search(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn matches(normalized_title: &str, normalized_query: &str) -> bool {
    if normalized_title.contains(normalized_query) {
        return true;
    }
    normalized_query
        .split(' ')
        .all(|token| normalized_title.contains(token))
}

/// Returns every bookmark and folder whose title matches `query`.
///
/// An empty or whitespace-only query matches nothing.
pub fn search(top_level: &[BookmarkEntity], query: &str) -> Vec<BookmarkEntity> {
    let query = normalize_for_search(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    let mut queue: VecDeque<&BookmarkEntity> = top_level.iter().collect();
    while let Some(entity) = queue.pop_front() {
        if matches(&normalize_for_search(entity.title()), &query) {
            results.push(entity.clone());
        }
        if let BookmarkEntity::Folder(folder) = entity {
            queue.extend(folder.children.iter());
        }
    }
    log::debug!(
        "event=bookmark_search module=search status=ok results={}",
        results.len()
    );
    results
}
