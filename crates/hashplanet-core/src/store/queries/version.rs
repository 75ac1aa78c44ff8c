//! Version-related Neo4j queries

use neo4rs::Query;

use super::{Neo4jSession, column};
use crate::store::StoreError;

impl Neo4jSession {
    /// Create a version if new, numbering it after the technology's
    /// existing versions
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn merge_version(
        &mut self,
        technology: &str,
        label: &str,
    ) -> Result<bool, StoreError> {
        let query = Query::new(
            r#"
            OPTIONAL MATCH (existing:Version {technology: $technology})
            WITH count(existing) AS seq
            MERGE (v:Version {technology: $technology, label: $label})
            ON CREATE SET v.seq = seq
            RETURN v.seq = seq AS created
            "#
            .to_string(),
        )
        .param("technology", technology)
        .param("label", label);

        let row = self.fetch_one(query).await?;
        column(&row, "created")
    }

    /// Version labels of a technology in insertion order
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn versions_of(
        &mut self,
        technology: &str,
    ) -> Result<Vec<String>, StoreError> {
        let query = Query::new(
            r#"
            MATCH (v:Version {technology: $technology})
            RETURN v.label AS label
            ORDER BY v.seq
            "#
            .to_string(),
        )
        .param("technology", technology);

        self.fetch(query)
            .await?
            .iter()
            .map(|row| column(row, "label"))
            .collect()
    }
}
