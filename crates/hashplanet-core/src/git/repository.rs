//! Repository handle for a cloned or local git source

use std::path::Path;
use std::time::Duration;

use git2::build::RepoBuilder;
use git2::{Delta, ObjectType, Oid, Repository, TreeWalkMode, TreeWalkResult};
use tempfile::TempDir;
use thiserror::Error;
use tracing::debug;

use crate::version::Tag;

/// File modes of regular files (including the legacy group-writable mode)
const REGULAR_MODES: [i32; 3] = [0o100644, 0o100755, 0o100664];

/// Errors that can occur while reading a git source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to clone {url}: {source}")]
    Clone {
        url: String,
        #[source]
        source: git2::Error,
    },

    #[error("Clone of {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A regular file inside a tree or diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    /// Blob holding the file content
    pub blob: Oid,
}

/// Handle on a git repository.
///
/// Clones made through [`GitSource::clone_bare`] live in a temporary
/// directory that is removed when the handle is dropped.
pub struct GitSource {
    repo: Repository,
    _clone_dir: Option<TempDir>,
}

impl GitSource {
    /// Bare-clone a repository into a fresh temporary directory
    ///
    /// # Errors
    /// Returns an error if the temporary directory cannot be created or the
    /// clone fails.
    pub fn clone_bare(url: &str) -> Result<Self, SourceError> {
        let clone_dir = tempfile::Builder::new().prefix("hashplanet-").tempdir()?;

        debug!("Cloning repository {} into {}", url, clone_dir.path().display());
        let repo = RepoBuilder::new()
            .bare(true)
            .clone(url, clone_dir.path())
            .map_err(|source| SourceError::Clone {
                url: url.to_string(),
                source,
            })?;

        Ok(Self {
            repo,
            _clone_dir: Some(clone_dir),
        })
    }

    /// Open an existing repository in place
    ///
    /// # Errors
    /// Returns an error if no repository exists at `path`.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        Ok(Self {
            repo: Repository::open(path)?,
            _clone_dir: None,
        })
    }

    /// Location of the repository on disk
    #[must_use]
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    /// List all tags that resolve to a commit, oldest commit first.
    ///
    /// Tags with the same commit time are ordered by label.
    ///
    /// # Errors
    /// Returns an error if the tag list cannot be read.
    pub fn tags(&self) -> Result<Vec<Tag>, SourceError> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::with_capacity(names.len());

        for name in names.iter().flatten() {
            let commit = self
                .repo
                .find_reference(&format!("refs/tags/{name}"))
                .and_then(|reference| reference.peel_to_commit());

            match commit {
                Ok(commit) => tags.push(Tag::new(name, commit.id(), commit.time().seconds())),
                Err(e) => debug!("Skipping tag {} (not a commit): {}", name, e),
            }
        }

        tags.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.label.cmp(&b.label)));
        Ok(tags)
    }

    /// List every regular file in the tree of a commit, recursively
    ///
    /// # Errors
    /// Returns an error if the commit or its tree cannot be read.
    pub fn tree_files(&self, commit: Oid) -> Result<Vec<TreeFile>, SourceError> {
        let tree = self.repo.find_commit(commit)?.tree()?;
        let mut files = Vec::new();

        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() != Some(ObjectType::Blob) || !is_regular(entry.filemode()) {
                return TreeWalkResult::Ok;
            }
            match entry.name() {
                Some(name) => files.push(TreeFile {
                    path: format!("{root}{name}"),
                    blob: entry.id(),
                }),
                None => debug!("Skipping non UTF-8 path under {}", root),
            }
            TreeWalkResult::Ok
        })?;

        Ok(files)
    }

    /// List regular files added or modified between two commits.
    ///
    /// Deleted files are not reported. For renames, copies and type changes
    /// only the surviving blob is reported.
    ///
    /// # Errors
    /// Returns an error if either commit or the diff cannot be read.
    pub fn changed_files(&self, from: Oid, to: Oid) -> Result<Vec<TreeFile>, SourceError> {
        let old_tree = self.repo.find_commit(from)?.tree()?;
        let new_tree = self.repo.find_commit(to)?.tree()?;
        let diff = self
            .repo
            .diff_tree_to_tree(Some(&old_tree), Some(&new_tree), None)?;

        let mut files = Vec::new();
        for delta in diff.deltas() {
            if !matches!(
                delta.status(),
                Delta::Added | Delta::Modified | Delta::Renamed | Delta::Copied | Delta::Typechange
            ) {
                continue;
            }

            let new_file = delta.new_file();
            if !is_regular(i32::from(new_file.mode())) {
                continue;
            }
            match new_file.path().and_then(Path::to_str) {
                Some(path) => files.push(TreeFile {
                    path: path.to_string(),
                    blob: new_file.id(),
                }),
                None => debug!("Skipping non UTF-8 path in diff"),
            }
        }

        Ok(files)
    }

    /// Read the exact bytes of a blob
    ///
    /// # Errors
    /// Returns an error if the object is missing or is not a blob.
    pub fn read_blob(&self, id: Oid) -> Result<Vec<u8>, SourceError> {
        Ok(self.repo.find_blob(id)?.content().to_vec())
    }
}

fn is_regular(mode: i32) -> bool {
    REGULAR_MODES.contains(&mode)
}
