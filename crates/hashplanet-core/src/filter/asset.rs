//! Static asset classification

use std::sync::LazyLock;

use regex::Regex;

static STATIC_ASSET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z0-9\s_\\.\-\(\):])+(\.html|\.md|\.txt)$").ok());

/// Check whether a stored path names a static asset (markup, markdown or
/// plain text) that a web server is likely to serve as-is.
#[must_use]
pub fn is_static_asset(path: &str) -> bool {
    STATIC_ASSET
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(path))
}
