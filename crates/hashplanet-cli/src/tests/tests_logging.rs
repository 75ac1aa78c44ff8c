//! Tests for logging setup
//!
//! The global subscriber can only be installed once per process, so these
//! tests check the filter selection and that the filters build.

use tracing_subscriber::EnvFilter;

use crate::logging::filter_directive;

#[test]
fn test_verbose_selects_debug() {
    assert_eq!(filter_directive(true), "debug");
}

#[test]
fn test_default_selects_info() {
    assert_eq!(filter_directive(false), "info");
}

#[test]
fn test_directives_build_filters() {
    for verbose in [false, true] {
        let filter = EnvFilter::new(filter_directive(verbose));
        let debug_str = format!("{filter:?}").to_lowercase();
        assert!(debug_str.contains(filter_directive(verbose)));
    }
}
