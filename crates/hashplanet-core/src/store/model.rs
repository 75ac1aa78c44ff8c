//! Rows returned by the store

use serde::{Deserialize, Serialize};

/// A stored hash and the versions its content was observed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    pub digest: String,
    /// Technology that first recorded the digest
    pub technology: String,
    /// Version labels in insertion order, without duplicates
    pub versions: Vec<String>,
}

/// Outcome of [`StoreSession::upsert_hash`](super::StoreSession::upsert_hash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashUpsert {
    /// The hash did not exist before
    pub created: bool,
    /// Owning technology of the stored hash
    pub technology: String,
    /// Number of labels appended to the version set
    pub added: usize,
}

/// Row counts per entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub versions: usize,
    pub files: usize,
    pub hashes: usize,
}
