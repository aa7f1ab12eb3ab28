// Url variant generation
// Bookmark lookups tolerate the common spellings of the same address:
// http vs https and a trailing slash on the path.

/// Splits `url` into a lowercase scheme and the remainder after `://`.
fn split_scheme(url: &str) -> Option<(String, &str)> {
    let (scheme, rest) = url.split_once("://")?;
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
    {
        return None;
    }
    Some((scheme.to_ascii_lowercase(), rest))
}

/// Returns the lowercase host of `url`, or `None` if it has no authority part.
pub fn host(url: &str) -> Option<String> {
    let (_, rest) = split_scheme(url)?;
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = if host_port.starts_with('[') {
        host_port.split_inclusive(']').next().unwrap_or_default()
    } else {
        host_port.split(':').next().unwrap_or_default()
    };
    if host.is_empty() {
        None
    } else {
        Some(host.to_lowercase())
    }
}

/// Every spelling of `url` a bookmark could be stored under, `url` itself first.
///
/// For http(s) urls without a query or fragment this is the scheme toggle
/// crossed with a trailing-slash toggle (four entries). With a query or
/// fragment only the scheme is toggled. Other schemes yield just `url`.
pub fn bookmark_url_variants(url: &str) -> Vec<String> {
    let Some((scheme, rest)) = split_scheme(url) else {
        return vec![url.to_string()];
    };
    let other_scheme = match scheme.as_str() {
        "http" => "https",
        "https" => "http",
        _ => return vec![url.to_string()],
    };

    let mut variants = vec![url.to_string(), format!("{}://{}", other_scheme, rest)];
    if !rest.contains(['?', '#']) {
        let toggled = match rest.strip_suffix('/') {
            Some(trimmed) => trimmed.to_string(),
            None => format!("{}/", rest),
        };
        variants.push(format!("{}://{}", scheme, toggled));
        variants.push(format!("{}://{}", other_scheme, toggled));
    }

    let mut unique = Vec::with_capacity(variants.len());
    for variant in variants {
        if !unique.contains(&variant) {
            unique.push(variant);
        }
    }
    unique
}
