//! Neo4j store backend

use std::sync::Arc;

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query, Row, Txn};
use tracing::info;

use super::{FingerprintStore, HashRecord, HashUpsert, StoreError, StoreSession, StoreStats};

/// Configuration for Neo4j connection
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
}

impl Neo4jConfig {
    /// Create a new Neo4j configuration
    #[must_use]
    pub fn new(
        uri: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            user: user.into(),
            password: password.into(),
            database: None,
        }
    }

    /// Set the database name
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }
}

/// Fingerprint store backed by Neo4j
pub struct Neo4jStore {
    graph: Arc<Graph>,
}

impl Neo4jStore {
    /// Connect to Neo4j and ensure constraints and indexes exist
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(config: &Neo4jConfig) -> Result<Self, StoreError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password);

        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }

        let neo_config = builder
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        let graph = Graph::connect(neo_config).await?;

        let store = Self {
            graph: Arc::new(graph),
        };
        store.ensure_schema().await?;

        info!("Connected to Neo4j at {}", config.uri);
        Ok(store)
    }

    /// Create the digest constraint and lookup indexes if they don't exist
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let statements = [
            "CREATE CONSTRAINT hash_digest IF NOT EXISTS FOR (h:Hash) REQUIRE h.digest IS UNIQUE",
            "CREATE INDEX version_technology_label IF NOT EXISTS FOR (v:Version) ON (v.technology, v.label)",
            "CREATE INDEX file_technology_path IF NOT EXISTS FOR (f:File) ON (f.technology, f.path)",
        ];

        for statement in statements {
            self.graph.run(Query::new(statement.to_string())).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl FingerprintStore for Neo4jStore {
    async fn begin(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        let txn = self.graph.start_txn().await?;
        Ok(Box::new(Neo4jSession { txn: Some(txn) }))
    }
}

/// An open Neo4j transaction
pub struct Neo4jSession {
    txn: Option<Txn>,
}

impl Neo4jSession {
    fn txn(&mut self) -> Result<&mut Txn, StoreError> {
        self.txn.as_mut().ok_or(StoreError::Closed)
    }

    /// Run a query inside the transaction and collect every row
    pub(super) async fn fetch(&mut self, query: Query) -> Result<Vec<Row>, StoreError> {
        let txn = self.txn()?;
        let mut stream = txn.execute(query).await?;
        let mut rows = Vec::new();

        while let Some(row) = stream.next(txn.handle()).await? {
            rows.push(row);
        }

        Ok(rows)
    }

    /// Run a query that must return exactly one row
    pub(super) async fn fetch_one(&mut self, query: Query) -> Result<Row, StoreError> {
        self.fetch(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Query("Query returned no rows".to_string()))
    }
}

#[async_trait]
impl StoreSession for Neo4jSession {
    async fn insert_version(&mut self, technology: &str, label: &str) -> Result<bool, StoreError> {
        self.merge_version(technology, label).await
    }

    async fn insert_file(&mut self, technology: &str, path: &str) -> Result<bool, StoreError> {
        self.merge_file(technology, path).await
    }

    async fn upsert_hash(
        &mut self,
        digest: &str,
        technology: &str,
        versions: &[String],
    ) -> Result<HashUpsert, StoreError> {
        self.merge_hash(digest, technology, versions).await
    }

    async fn get_versions(&mut self, technology: &str) -> Result<Vec<String>, StoreError> {
        self.versions_of(technology).await
    }

    async fn find_hash(&mut self, digest: &str) -> Result<Option<HashRecord>, StoreError> {
        self.hash_by_digest(digest).await
    }

    async fn file_paths(&mut self) -> Result<Vec<String>, StoreError> {
        self.all_file_paths().await
    }

    async fn all_hashes(&mut self) -> Result<Vec<HashRecord>, StoreError> {
        self.every_hash().await
    }

    async fn stats(&mut self) -> Result<StoreStats, StoreError> {
        self.count_rows().await
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let txn = self.txn.take().ok_or(StoreError::Closed)?;
        txn.commit().await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), StoreError> {
        let txn = self.txn.take().ok_or(StoreError::Closed)?;
        txn.rollback().await?;
        Ok(())
    }
}
