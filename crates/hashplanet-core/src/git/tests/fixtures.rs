//! Tagged repository builder for tests

#![allow(clippy::expect_used)]

use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// A throwaway repository with a deterministic commit clock
pub(crate) struct TestRepo {
    dir: TempDir,
    repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub(crate) fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("Failed to init repository");
        Self {
            dir,
            repo,
            clock: 1_600_000_000,
        }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Write a file into the working tree
    pub(crate) fn write(&self, rel: &str, contents: &[u8]) {
        let abs = self.dir.path().join(rel);
        if let Some(parent) = abs.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(&abs, contents).expect("Failed to write file");
    }

    /// Remove a file from the working tree
    pub(crate) fn remove(&self, rel: &str) {
        std::fs::remove_file(self.dir.path().join(rel)).expect("Failed to remove file");
    }

    /// Stage everything and commit, advancing the clock by one minute
    pub(crate) fn commit(&mut self, message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to open index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("Failed to stage files");
        index
            .update_all(["*"].iter(), None)
            .expect("Failed to stage removals");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        self.clock += 60;
        let sig = Signature::new("Test", "test@example.com", &Time::new(self.clock, 0))
            .expect("Failed to create signature");

        let parents: Vec<git2::Commit<'_>> = self
            .repo
            .head()
            .ok()
            .and_then(|h| h.target())
            .and_then(|oid| self.repo.find_commit(oid).ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .expect("Failed to commit")
    }

    /// Point a lightweight tag at a commit
    pub(crate) fn tag(&self, name: &str, commit: Oid) {
        let object = self
            .repo
            .find_object(commit, None)
            .expect("Failed to find commit");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Failed to create tag");
    }

    /// Commit the working tree and tag it
    pub(crate) fn release(&mut self, name: &str) -> Oid {
        let commit = self.commit(&format!("Release {name}"));
        self.tag(name, commit);
        commit
    }
}
