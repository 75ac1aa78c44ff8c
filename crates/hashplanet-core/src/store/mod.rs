//! Store module: Fingerprint persistence
//!
//! A [`FingerprintStore`] hands out transactional [`StoreSession`]s. Every
//! technology is ingested inside one session, committed on success and
//! rolled back on failure. Two backends implement the contract: Neo4j for
//! real runs and an in-memory store for dry runs and tests.

pub mod memory;
mod merge;
mod model;
pub mod neo4j;
mod queries;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub use memory::MemoryStore;
pub use merge::{MergeSummary, backfill, merge_changes, merge_release};
pub use model::{HashRecord, HashUpsert, StoreStats};
pub use neo4j::{Neo4jConfig, Neo4jStore};

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Neo4j error: {0}")]
    Neo4j(#[from] neo4rs::Error),

    #[error("Session already closed")]
    Closed,
}

/// A store that can open transactional sessions
#[async_trait]
pub trait FingerprintStore: Send + Sync {
    /// Open a new session
    ///
    /// # Errors
    /// Returns an error if the transaction cannot be started.
    async fn begin(&self) -> Result<Box<dyn StoreSession>, StoreError>;
}

/// One open transaction against a store.
///
/// Writes are visible to later calls in the same session and to other
/// sessions only after [`StoreSession::commit`]. Dropping a session without
/// committing discards its writes.
#[async_trait]
pub trait StoreSession: Send {
    /// Record a version of a technology. Returns `true` if it was new.
    async fn insert_version(&mut self, technology: &str, label: &str)
        -> Result<bool, StoreError>;

    /// Record a file path of a technology. Returns `true` if it was new.
    async fn insert_file(&mut self, technology: &str, path: &str) -> Result<bool, StoreError>;

    /// Create a hash owned by `technology`, or extend an existing hash's
    /// version set with the labels it does not hold yet.
    async fn upsert_hash(
        &mut self,
        digest: &str,
        technology: &str,
        versions: &[String],
    ) -> Result<HashUpsert, StoreError>;

    /// Versions of a technology in first-insertion order
    async fn get_versions(&mut self, technology: &str) -> Result<Vec<String>, StoreError>;

    async fn find_hash(&mut self, digest: &str) -> Result<Option<HashRecord>, StoreError>;

    /// Every stored file path, across technologies
    async fn file_paths(&mut self) -> Result<Vec<String>, StoreError>;

    async fn all_hashes(&mut self) -> Result<Vec<HashRecord>, StoreError>;

    async fn stats(&mut self) -> Result<StoreStats, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;

    async fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Finish a session according to the outcome of the work done in it.
///
/// `Ok` commits, `Err` rolls back and hands the original error back. A
/// failing rollback is logged; the original error wins.
///
/// # Errors
/// Returns the work error, or the commit error if committing fails.
pub async fn close_session<T, E>(
    mut session: Box<dyn StoreSession>,
    result: Result<T, E>,
) -> Result<T, E>
where
    E: From<StoreError>,
{
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = session.rollback().await {
                warn!("Rollback failed: {}", rollback);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests;
