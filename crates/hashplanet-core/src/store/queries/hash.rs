//! Hash-related Neo4j queries

use neo4rs::{Query, Row};

use super::{Neo4jSession, column};
use crate::store::{HashRecord, HashUpsert, StoreError};

impl Neo4jSession {
    /// Create or extend a hash in a single statement.
    ///
    /// The unique constraint on `Hash.digest` serializes concurrent creation.
    /// The `SET` right after the `MERGE` takes the node's write lock before
    /// `h.versions` is read, so a concurrent extension of the same digest
    /// waits and then sees the committed list.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn merge_hash(
        &mut self,
        digest: &str,
        technology: &str,
        versions: &[String],
    ) -> Result<HashUpsert, StoreError> {
        let query = Query::new(
            r#"
            MERGE (h:Hash {digest: $digest})
            ON CREATE SET h.technology = $technology, h.versions = [], h._created = true
            SET h._lock = true
            WITH h, coalesce(h._created, false) AS created
            REMOVE h._lock, h._created
            WITH h, created, [v IN $versions WHERE NOT v IN h.versions] AS added
            SET h.versions = h.versions + added
            RETURN created, h.technology AS technology, size(added) AS added
            "#
            .to_string(),
        )
        .param("digest", digest)
        .param("technology", technology)
        .param("versions", versions.to_vec());

        let row = self.fetch_one(query).await?;
        let added: i64 = column(&row, "added")?;

        Ok(HashUpsert {
            created: column(&row, "created")?,
            technology: column(&row, "technology")?,
            added: usize::try_from(added).unwrap_or_default(),
        })
    }

    /// Look up a hash by digest
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn hash_by_digest(
        &mut self,
        digest: &str,
    ) -> Result<Option<HashRecord>, StoreError> {
        let query = Query::new(
            r#"
            MATCH (h:Hash {digest: $digest})
            RETURN h.digest AS digest, h.technology AS technology, h.versions AS versions
            "#
            .to_string(),
        )
        .param("digest", digest);

        self.fetch(query)
            .await?
            .first()
            .map(hash_record)
            .transpose()
    }

    /// Every stored hash, ordered by digest
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn every_hash(&mut self) -> Result<Vec<HashRecord>, StoreError> {
        let query = Query::new(
            r#"
            MATCH (h:Hash)
            RETURN h.digest AS digest, h.technology AS technology, h.versions AS versions
            ORDER BY h.digest
            "#
            .to_string(),
        );

        self.fetch(query).await?.iter().map(hash_record).collect()
    }
}

fn hash_record(row: &Row) -> Result<HashRecord, StoreError> {
    Ok(HashRecord {
        digest: column(row, "digest")?,
        technology: column(row, "technology")?,
        versions: column(row, "versions")?,
    })
}
