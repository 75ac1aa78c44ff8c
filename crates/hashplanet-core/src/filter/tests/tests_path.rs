//! Tests for PathFilter

use rstest::rstest;

use crate::filter::{DEFAULT_EXTENSIONS, PathFilter};

#[rstest]
#[case("dist/jquery.js", true)]
#[case("dist/jquery.min.JS", true)]
#[case("css/site.css", true)]
#[case("LICENSE.txt", true)]
#[case("LICENSE", false)]
#[case("src/core.ts", false)]
#[case("img/logo.png", false)]
#[case("js", false)]
fn test_default_filter(#[case] path: &str, #[case] expected: bool) {
    assert_eq!(PathFilter::default().accepts(path), expected);
}

#[test]
fn test_default_extensions_constant() {
    assert_eq!(DEFAULT_EXTENSIONS, &["txt", "css", "js"]);
}

#[test]
fn test_from_pattern_none_is_default() {
    let filter = PathFilter::from_pattern(None).unwrap_or_default();
    assert!(matches!(filter, PathFilter::Extensions(_)));
    assert!(filter.accepts("a.js"));
    assert!(!filter.accepts("a.py"));
}

#[test]
fn test_exclude_pattern_rejects_matches() {
    let filter = PathFilter::from_pattern(Some(r"^(test|docs)/|\.png$"));
    let Ok(filter) = filter else {
        unreachable!("pattern is valid");
    };

    assert!(!filter.accepts("test/unit.js"));
    assert!(!filter.accepts("docs/index.html"));
    assert!(!filter.accepts("img/logo.png"));
    assert!(filter.accepts("src/core.js"));
    assert!(filter.accepts("LICENSE"));
}

#[test]
fn test_exclude_pattern_invalid() {
    assert!(PathFilter::from_pattern(Some("(unclosed")).is_err());
}

#[test]
fn test_custom_extensions_are_lowercased() {
    let filter = PathFilter::extensions(["HTML", "Md"]);
    assert!(filter.accepts("README.md"));
    assert!(filter.accepts("index.html"));
    assert!(!filter.accepts("app.js"));
}
