//! Property-based tests for the url index.
//!
//! The list is checked against a plain model: the first bookmark written for
//! a url owns it, and the lowercase buckets hold exactly the owners whose
//! url lowercases to the key, ordered by id.

use std::collections::HashMap;

use bookmark_core::managers::bookmark_list::BookmarkList;
use bookmark_core::services::url_variants::bookmark_url_variants;
use bookmark_core::types::bookmark::Bookmark;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert { url: usize },
    Remove { url: usize },
}

const URLS: &[&str] = &[
    "https://example.com",
    "https://EXAMPLE.com",
    "https://Example.COM",
    "http://example.com/",
    "https://rust-lang.org/learn",
    "https://RUST-lang.org/learn",
];

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..URLS.len()).prop_map(|url| Op::Insert { url }),
        1 => (0..URLS.len()).prop_map(|url| Op::Remove { url }),
    ]
}

fn bookmark(id: usize, url: &str) -> Bookmark {
    Bookmark::new(format!("{:03}", id), url, "Title", false, None)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn list_matches_first_write_wins_model(
        ops in proptest::collection::vec(arb_op(), 1..60),
    ) {
        let mut list = BookmarkList::new();
        let mut model: HashMap<&str, String> = HashMap::new();

        for (id, op) in ops.iter().enumerate() {
            match op {
                Op::Insert { url } => {
                    let url = URLS[*url];
                    let bookmark = bookmark(id, url);
                    list.insert(&bookmark);
                    model.entry(url).or_insert(bookmark.id);
                }
                Op::Remove { url } => {
                    let url = URLS[*url];
                    if let Some(id) = model.remove(url) {
                        list.remove(&Bookmark::new(id, url, "Title", false, None));
                    }
                }
            }
        }

        prop_assert_eq!(list.len(), model.len());
        for url in URLS {
            prop_assert_eq!(
                list.get(url).map(|item| item.id.clone()),
                model.get(url).cloned()
            );

            let mut expected: Vec<String> = model
                .iter()
                .filter(|(owned, _)| owned.to_lowercase() == url.to_lowercase())
                .map(|(_, id)| id.clone())
                .collect();
            expected.sort();
            let bucket: Vec<String> = list
                .lowercased_items(url)
                .iter()
                .map(|item| item.id.clone())
                .collect();
            prop_assert_eq!(bucket, expected);
            prop_assert_eq!(list.contains_case_insensitive(url), model
                .keys()
                .any(|owned| owned.to_lowercase() == url.to_lowercase()));
        }
    }

    #[test]
    fn url_variants_are_symmetric(
        scheme in prop_oneof![Just("http"), Just("https")],
        host in "[a-z]{1,10}\\.(com|org)",
        path in "(/[a-z]{1,5}){0,2}/?",
    ) {
        let url = format!("{}://{}{}", scheme, host, path);
        let variants = bookmark_url_variants(&url);

        prop_assert_eq!(&variants[0], &url);
        for variant in &variants {
            prop_assert!(bookmark_url_variants(variant).contains(&url));
        }
    }
}
