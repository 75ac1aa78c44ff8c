//! Release tags

use git2::Oid;

/// A release tag peeled to the commit it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name, used as the version label
    pub label: String,
    /// Commit the tag resolves to
    pub commit: Oid,
    /// Committer time of that commit (seconds since epoch)
    pub time: i64,
}

impl Tag {
    /// Create a new tag
    #[must_use]
    pub fn new(label: impl Into<String>, commit: Oid, time: i64) -> Self {
        Self {
            label: label.into(),
            commit,
            time,
        }
    }
}

/// Extract the labels of a tag list, preserving order
#[must_use]
pub fn labels(tags: &[Tag]) -> Vec<String> {
    tags.iter().map(|tag| tag.label.clone()).collect()
}
