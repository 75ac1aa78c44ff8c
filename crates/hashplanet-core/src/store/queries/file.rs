//! File-related Neo4j queries

use neo4rs::Query;

use super::{Neo4jSession, column};
use crate::store::StoreError;

impl Neo4jSession {
    /// Create a file if new
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn merge_file(
        &mut self,
        technology: &str,
        path: &str,
    ) -> Result<bool, StoreError> {
        let query = Query::new(
            r#"
            OPTIONAL MATCH (existing:File {technology: $technology, path: $path})
            WITH existing IS NULL AS created
            MERGE (f:File {technology: $technology, path: $path})
            RETURN created
            "#
            .to_string(),
        )
        .param("technology", technology)
        .param("path", path);

        let row = self.fetch_one(query).await?;
        column(&row, "created")
    }

    /// Every stored file path
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub(in crate::store) async fn all_file_paths(&mut self) -> Result<Vec<String>, StoreError> {
        let query = Query::new("MATCH (f:File) RETURN f.path AS path".to_string());

        self.fetch(query)
            .await?
            .iter()
            .map(|row| column(row, "path"))
            .collect()
    }
}
