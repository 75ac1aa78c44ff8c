//! Merge of hashed changes into a session, with version backfill

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{HashUpsert, StoreError, StoreSession};
use crate::hasher::HashedFile;

/// Counters collected while merging one batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub files_created: usize,
    pub hashes_created: usize,
    /// Upserts that appended labels to an existing hash
    pub hashes_extended: usize,
    pub versions_created: usize,
}

impl MergeSummary {
    fn record(&mut self, upsert: &HashUpsert, technology: &str, digest: &str) {
        if upsert.created {
            self.hashes_created += 1;
            return;
        }
        if upsert.technology != technology {
            warn!(
                "Hash {} already belongs to {}, extending it with {} versions",
                digest, upsert.technology, technology
            );
        }
        if upsert.added > 0 {
            self.hashes_extended += 1;
        }
    }
}

/// Labels of `history` from `from` (inclusive) up to `to` (exclusive).
///
/// Empty when either label is unknown or `to` does not come after `from`.
#[must_use]
pub fn backfill(history: &[String], from: &str, to: &str) -> Vec<String> {
    let start = history.iter().position(|label| label == from);
    let end = history.iter().position(|label| label == to);

    match (start, end) {
        (Some(start), Some(end)) if start < end => history[start..end].to_vec(),
        _ => {
            debug!("No backfill range between {} and {}", from, to);
            Vec::new()
        }
    }
}

/// Merge the hashed changes of a tag batch.
///
/// `hashed` must be in tag order. `history` is the full ordered tag list of
/// the technology and `batch` the catch-up tags that produced `hashed`.
/// `baseline` holds the content already stored at the first tag of the
/// batch; it is not written, only used as the starting point of each path.
/// When a path changes, the digest it held before is extended with every
/// tag from where it was last seen up to the change.
/// Version rows for `batch` are written last.
///
/// # Errors
/// Returns the first store error; the caller is expected to roll back.
pub async fn merge_changes(
    session: &mut dyn StoreSession,
    technology: &str,
    hashed: &[HashedFile],
    baseline: &[HashedFile],
    history: &[String],
    batch: &[String],
) -> Result<MergeSummary, StoreError> {
    let mut summary = MergeSummary::default();
    let mut last_seen: HashMap<&str, (&str, &str)> = baseline
        .iter()
        .map(|file| (file.path.as_str(), (file.tag.as_str(), file.digest.as_str())))
        .collect();

    for file in hashed {
        if session.insert_file(technology, &file.path).await? {
            summary.files_created += 1;
        }

        if let Some(&(prev_tag, prev_digest)) = last_seen.get(file.path.as_str()) {
            let range = backfill(history, prev_tag, &file.tag);
            if !range.is_empty() {
                let upsert = session.upsert_hash(prev_digest, technology, &range).await?;
                summary.record(&upsert, technology, prev_digest);
            }
        }

        let upsert = session
            .upsert_hash(&file.digest, technology, std::slice::from_ref(&file.tag))
            .await?;
        summary.record(&upsert, technology, &file.digest);

        last_seen.insert(&file.path, (&file.tag, &file.digest));
    }

    for label in batch {
        if session.insert_version(technology, label).await? {
            summary.versions_created += 1;
        }
    }

    debug!("Merged {} hashed files for {}: {:?}", hashed.len(), technology, summary);
    Ok(summary)
}

/// Merge one fully enumerated release (no backfill).
///
/// The version row is written first, then every file is attributed to it.
///
/// # Errors
/// Returns the first store error; the caller is expected to roll back.
pub async fn merge_release(
    session: &mut dyn StoreSession,
    technology: &str,
    version: &str,
    hashed: &[HashedFile],
) -> Result<MergeSummary, StoreError> {
    let mut summary = MergeSummary::default();
    let labels = [version.to_string()];

    if session.insert_version(technology, version).await? {
        summary.versions_created += 1;
    }

    for file in hashed {
        if session.insert_file(technology, &file.path).await? {
            summary.files_created += 1;
        }
        let upsert = session.upsert_hash(&file.digest, technology, &labels).await?;
        summary.record(&upsert, technology, &file.digest);
    }

    Ok(summary)
}
