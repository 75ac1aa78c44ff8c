//! Statistics queries

use neo4rs::Query;

use super::{Neo4jSession, column};
use crate::store::{StoreError, StoreStats};

impl Neo4jSession {
    /// Count rows per entity
    ///
    /// # Errors
    /// Returns an error if a query fails.
    pub(in crate::store) async fn count_rows(&mut self) -> Result<StoreStats, StoreError> {
        Ok(StoreStats {
            versions: self.count_label("Version").await?,
            files: self.count_label("File").await?,
            hashes: self.count_label("Hash").await?,
        })
    }

    async fn count_label(&mut self, label: &str) -> Result<usize, StoreError> {
        let query = Query::new(format!("MATCH (n:{label}) RETURN count(n) AS count"));
        let row = self.fetch_one(query).await?;
        let count: i64 = column(&row, "count")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
