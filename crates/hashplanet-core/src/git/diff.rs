//! Diff engine: which files changed into each tag

use git2::Oid;
use tracing::{debug, info};

use super::{GitSource, SourceError, TreeFile};
use crate::filter::PathFilter;
use crate::version::Tag;

/// A file whose content became current at a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: String,
    /// Tag at which this content appeared
    pub tag: String,
    /// Blob holding the content
    pub blob: Oid,
}

/// Produces change records for a tag sequence
pub struct DiffEngine<'a> {
    source: &'a GitSource,
    filter: &'a PathFilter,
}

impl<'a> DiffEngine<'a> {
    /// Create a diff engine over a repository
    #[must_use]
    pub fn new(source: &'a GitSource, filter: &'a PathFilter) -> Self {
        Self { source, filter }
    }

    /// Every accepted file in the full tree of a tag
    ///
    /// # Errors
    /// Returns an error if the tag's tree cannot be read.
    pub fn snapshot(&self, tag: &Tag) -> Result<Vec<ChangeRecord>, SourceError> {
        info!("Retrieving files from the first tag {} ...", tag.label);
        let files = self.source.tree_files(tag.commit)?;
        Ok(self.records(files, tag))
    }

    /// Files added or modified between each consecutive pair of tags,
    /// attributed to the later tag of the pair
    ///
    /// # Errors
    /// Returns an error if any of the diffs cannot be computed.
    pub fn changes(&self, tags: &[Tag]) -> Result<Vec<ChangeRecord>, SourceError> {
        info!("Retrieving modified files across {} tags ...", tags.len());
        let mut records = Vec::new();

        for pair in tags.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            let files = self.source.changed_files(from.commit, to.commit)?;
            debug!("{} -> {}: {} changed files", from.label, to.label, files.len());
            records.extend(self.records(files, to));
        }

        Ok(records)
    }

    fn records(&self, files: Vec<TreeFile>, tag: &Tag) -> Vec<ChangeRecord> {
        files
            .into_iter()
            .filter(|file| self.filter.accepts(&file.path))
            .map(|file| ChangeRecord {
                path: file.path,
                tag: tag.label.clone(),
                blob: file.blob,
            })
            .collect()
    }
}
