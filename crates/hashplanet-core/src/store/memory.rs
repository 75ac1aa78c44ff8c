//! In-memory store backend

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{FingerprintStore, HashRecord, HashUpsert, StoreError, StoreSession, StoreStats};

#[derive(Debug, Clone, Default)]
struct Tables {
    versions: HashMap<String, Vec<String>>,
    files: BTreeSet<(String, String)>,
    hashes: BTreeMap<String, HashRecord>,
}

/// Store kept in process memory.
///
/// Only one session is open at a time; `begin` waits for the previous
/// session to finish. Writes are staged on a copy and published on commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FingerprintStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemorySession {
            guard: Some(guard),
            staged,
        }))
    }
}

struct MemorySession {
    guard: Option<OwnedMutexGuard<Tables>>,
    staged: Tables,
}

impl MemorySession {
    fn tables(&mut self) -> Result<&mut Tables, StoreError> {
        if self.guard.is_none() {
            return Err(StoreError::Closed);
        }
        Ok(&mut self.staged)
    }
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn insert_version(&mut self, technology: &str, label: &str) -> Result<bool, StoreError> {
        let versions = self
            .tables()?
            .versions
            .entry(technology.to_string())
            .or_default();
        if versions.iter().any(|v| v == label) {
            return Ok(false);
        }
        versions.push(label.to_string());
        Ok(true)
    }

    async fn insert_file(&mut self, technology: &str, path: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables()?
            .files
            .insert((technology.to_string(), path.to_string())))
    }

    async fn upsert_hash(
        &mut self,
        digest: &str,
        technology: &str,
        versions: &[String],
    ) -> Result<HashUpsert, StoreError> {
        let hashes = &mut self.tables()?.hashes;
        let created = !hashes.contains_key(digest);
        let record = hashes.entry(digest.to_string()).or_insert_with(|| HashRecord {
            digest: digest.to_string(),
            technology: technology.to_string(),
            versions: Vec::new(),
        });

        let mut added = 0;
        for version in versions {
            if !record.versions.contains(version) {
                record.versions.push(version.clone());
                added += 1;
            }
        }

        Ok(HashUpsert {
            created,
            technology: record.technology.clone(),
            added,
        })
    }

    async fn get_versions(&mut self, technology: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables()?
            .versions
            .get(technology)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_hash(&mut self, digest: &str) -> Result<Option<HashRecord>, StoreError> {
        Ok(self.tables()?.hashes.get(digest).cloned())
    }

    async fn file_paths(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .tables()?
            .files
            .iter()
            .map(|(_, path)| path.clone())
            .collect())
    }

    async fn all_hashes(&mut self) -> Result<Vec<HashRecord>, StoreError> {
        Ok(self.tables()?.hashes.values().cloned().collect())
    }

    async fn stats(&mut self) -> Result<StoreStats, StoreError> {
        let tables = self.tables()?;
        Ok(StoreStats {
            versions: tables.versions.values().map(Vec::len).sum(),
            files: tables.files.len(),
            hashes: tables.hashes.len(),
        })
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let mut guard = self.guard.take().ok_or(StoreError::Closed)?;
        *guard = std::mem::take(&mut self.staged);
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        self.guard.take().ok_or(StoreError::Closed)?;
        self.staged = Tables::default();
        Ok(())
    }
}
