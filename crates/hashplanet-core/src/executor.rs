//! Executor: runs ingestion jobs concurrently

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::config::{IngestOptions, Job};
use crate::store::FingerprintStore;
use crate::version::IngestRun;

/// Outcome of a whole ingestion run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<IngestRun>,
    /// Technology and error message of every failed job
    pub failed: Vec<(String, String)>,
}

impl RunSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs jobs against one store, a bounded number at a time
pub struct Executor {
    store: Arc<dyn FingerprintStore>,
    options: IngestOptions,
}

impl Executor {
    #[must_use]
    pub fn new(store: Arc<dyn FingerprintStore>, options: IngestOptions) -> Self {
        Self { store, options }
    }

    /// Ingest every job. A failing job is logged and reported; the others
    /// keep running.
    pub async fn run(&self, jobs: Vec<Job>) -> RunSummary {
        info!(
            "Ingesting {} technologies ({} at a time)",
            jobs.len(),
            self.options.jobs.max(1)
        );

        let outcomes: Vec<_> = stream::iter(jobs)
            .map(|job| async move {
                let result = job
                    .resource
                    .ingest(self.store.as_ref(), &job, &self.options)
                    .await;
                (job.technology, result)
            })
            .buffer_unordered(self.options.jobs.max(1))
            .collect()
            .await;

        let mut summary = RunSummary::default();
        for (technology, result) in outcomes {
            match result {
                Ok(run) => summary.succeeded.push(run),
                Err(e) => {
                    warn!("Skipping {}: {}", technology, e);
                    summary.failed.push((technology, e.to_string()));
                }
            }
        }

        info!(
            "Run finished: {} succeeded, {} failed",
            summary.succeeded.len(),
            summary.failed.len()
        );
        summary
    }
}
