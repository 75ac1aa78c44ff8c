//! Neo4j query modules organized by entity

mod file;
mod hash;
mod read;
mod version;

use neo4rs::Row;
use serde::Deserialize;

// Re-export Neo4jSession for the impl blocks
pub(super) use super::neo4j::Neo4jSession;
use super::StoreError;

/// Read a column from a row
fn column<'a, T: Deserialize<'a>>(row: &'a Row, key: &str) -> Result<T, StoreError> {
    row.get(key)
        .map_err(|e| StoreError::Query(format!("Column {key}: {e}")))
}
