//! Content hasher: turns change records into digests

use std::collections::HashMap;

use git2::Oid;
use tracing::{debug, error};

use super::hash_bytes;
use crate::git::{ChangeRecord, GitSource};

/// A change record with the digest of its content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashedFile {
    pub path: String,
    pub tag: String,
    pub digest: String,
}

/// Reads blobs from a repository and hashes them.
///
/// Blobs shared by several records are read and hashed once.
pub struct ContentHasher<'a> {
    source: &'a GitSource,
    cache: HashMap<Oid, Option<String>>,
}

impl<'a> ContentHasher<'a> {
    #[must_use]
    pub fn new(source: &'a GitSource) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Hash every record, in order.
    ///
    /// Records whose blob is empty are dropped. Records whose blob cannot
    /// be read are logged and dropped; the rest of the batch continues.
    pub fn hash(&mut self, records: &[ChangeRecord]) -> Vec<HashedFile> {
        let mut hashed = Vec::with_capacity(records.len());

        for record in records {
            let Some(digest) = self.digest(record) else {
                continue;
            };
            hashed.push(HashedFile {
                path: record.path.clone(),
                tag: record.tag.clone(),
                digest,
            });
        }

        debug!("Hashed {} of {} change records", hashed.len(), records.len());
        hashed
    }

    fn digest(&mut self, record: &ChangeRecord) -> Option<String> {
        if let Some(cached) = self.cache.get(&record.blob) {
            return cached.clone();
        }

        let digest = match self.source.read_blob(record.blob) {
            Ok(content) if content.is_empty() => None,
            Ok(content) => Some(hash_bytes(&content)),
            Err(e) => {
                error!(
                    "Failed to read {} at {} (blob {}): {}",
                    record.path, record.tag, record.blob, e
                );
                None
            }
        };

        self.cache.insert(record.blob, digest.clone());
        digest
    }
}
