//! Lookup: read-only queries against the fingerprint store

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::filter::is_static_asset;
use crate::hasher::{hash_bytes, hash_file};
use crate::store::{FingerprintStore, HashRecord, StoreError, StoreStats, close_session};

/// Technology and candidate versions for a matched digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub technology: String,
    pub versions: Vec<String>,
}

impl From<HashRecord> for Match {
    fn from(record: HashRecord) -> Self {
        Self {
            technology: record.technology,
            versions: record.versions,
        }
    }
}

/// Read side of the store.
///
/// Every call runs in its own short session.
#[derive(Clone)]
pub struct Lookup {
    store: Arc<dyn FingerprintStore>,
}

impl Lookup {
    #[must_use]
    pub fn new(store: Arc<dyn FingerprintStore>) -> Self {
        Self { store }
    }

    /// Exact match on a hex digest (case and surrounding whitespace ignored)
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn find_hash(&self, digest: &str) -> Result<Option<Match>, StoreError> {
        let digest = digest.trim().to_lowercase();
        let mut session = self.store.begin().await?;
        let result = session.find_hash(&digest).await;
        let record = close_session(session, result).await?;

        debug!("Lookup {}: {}", digest, if record.is_some() { "hit" } else { "miss" });
        Ok(record.map(Match::from))
    }

    /// Hash raw bytes and look them up
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn find_bytes(&self, content: &[u8]) -> Result<Option<Match>, StoreError> {
        self.find_hash(&hash_bytes(content)).await
    }

    /// Hash the UTF-8 bytes of a string and look them up
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn find_str(&self, text: &str) -> Result<Option<Match>, StoreError> {
        self.find_bytes(text.as_bytes()).await
    }

    /// Hash a local file and look it up. An unreadable file is no match.
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn find_file(&self, path: &Path) -> Result<Option<Match>, StoreError> {
        match hash_file(path) {
            Ok(digest) => self.find_hash(&digest).await,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    /// Versions of a technology in first-observation order
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn get_versions(&self, technology: &str) -> Result<Vec<String>, StoreError> {
        let mut session = self.store.begin().await?;
        let result = session.get_versions(technology).await;
        close_session(session, result).await
    }

    /// Stored paths that look like static assets, deduplicated and sorted
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn static_files(&self) -> Result<Vec<String>, StoreError> {
        let mut session = self.store.begin().await?;
        let result = session.file_paths().await;
        let mut paths: Vec<String> = close_session(session, result)
            .await?
            .into_iter()
            .filter(|path| is_static_asset(path))
            .collect();

        paths.sort();
        paths.dedup();
        Ok(paths)
    }

    /// Every stored hash
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn all_hashes(&self) -> Result<Vec<HashRecord>, StoreError> {
        let mut session = self.store.begin().await?;
        let result = session.all_hashes().await;
        close_session(session, result).await
    }

    /// Row counts per entity
    ///
    /// # Errors
    /// Returns an error if the store query fails.
    pub async fn stats(&self) -> Result<StoreStats, StoreError> {
        let mut session = self.store.begin().await?;
        let result = session.stats().await;
        close_session(session, result).await
    }
}
