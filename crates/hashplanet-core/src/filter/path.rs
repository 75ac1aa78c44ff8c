//! Path filter applied before hashing

use std::path::Path;

use regex::Regex;

/// Extensions accepted when no exclude pattern is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "css", "js"];

/// Decides whether a repository path is hashed and stored
#[derive(Debug, Clone)]
pub enum PathFilter {
    /// Accept only paths with one of these extensions (case-insensitive)
    Extensions(Vec<String>),
    /// Accept every path the pattern does not match
    Exclude(Regex),
}

impl PathFilter {
    /// Build a filter from an optional exclude pattern.
    ///
    /// Without a pattern the legacy extension allow-list is used.
    ///
    /// # Errors
    /// Returns an error if the pattern is not a valid regex.
    pub fn from_pattern(pattern: Option<&str>) -> Result<Self, regex::Error> {
        match pattern {
            Some(p) => Ok(Self::Exclude(Regex::new(p)?)),
            None => Ok(Self::default()),
        }
    }

    /// Accept only the given extensions
    #[must_use]
    pub fn extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Extensions(
            extensions
                .into_iter()
                .map(|ext| ext.into().to_lowercase())
                .collect(),
        )
    }

    /// Check whether a path should be hashed
    #[must_use]
    pub fn accepts(&self, path: &str) -> bool {
        match self {
            Self::Extensions(allowed) => Path::new(path)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext))),
            Self::Exclude(pattern) => !pattern.is_match(path),
        }
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::extensions(DEFAULT_EXTENSIONS.iter().copied())
    }
}
