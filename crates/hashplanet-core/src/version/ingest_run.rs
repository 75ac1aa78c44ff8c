//! Ingest run: metadata about one ingestion of one technology

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ingestion run of one technology
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRun {
    /// Unique identifier for this run
    pub id: String,
    /// Technology being ingested
    pub technology: String,
    /// Where the content comes from (git URL or package name)
    pub source: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Tags (or package versions) processed in this run
    pub tags_processed: usize,
    /// Content entries hashed in this run
    pub files_hashed: usize,
    /// New hash rows created
    pub hashes_created: usize,
    /// Existing hash rows whose version set grew
    pub hashes_extended: usize,
}

impl IngestRun {
    /// Start a new ingest run
    #[must_use]
    pub fn new(technology: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            technology: technology.into(),
            source: source.into(),
            started_at: Utc::now(),
            tags_processed: 0,
            files_hashed: 0,
            hashes_created: 0,
            hashes_extended: 0,
        }
    }

    /// True when the run found nothing new to record
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.tags_processed == 0 && self.files_hashed == 0
    }
}
