//! Resource module: Ingestion pipelines per source type
//!
//! A [`Resource`] names where a technology's releases come from. Each
//! variant runs its own pipeline and writes through one store session.

mod git;
mod npm;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub use npm::{NpmRegistry, REGISTRY_URL, RegistryError, Release, hash_tarball, order_releases};

use crate::config::{IngestOptions, Job};
use crate::git::SourceError;
use crate::store::{FingerprintStore, StoreError};
use crate::version::IngestRun;

/// Errors that can fail the ingestion of one technology
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Unknown resource: {0}")]
    UnknownResource(String),
}

/// Supported source types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Tagged git repository
    Git,
    /// Package on the npm registry
    Npm,
}

impl Resource {
    /// Name used in configuration
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Npm => "npm",
        }
    }

    /// Ingest one job with this resource's pipeline
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or the store fails;
    /// the job's session is rolled back in that case.
    pub async fn ingest(
        self,
        store: &dyn FingerprintStore,
        job: &Job,
        options: &IngestOptions,
    ) -> Result<IngestRun, IngestError> {
        match self {
            Self::Git => git::ingest(store, job, options).await,
            Self::Npm => npm::ingest(store, job, options).await,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Resource {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "git" => Ok(Self::Git),
            "npm" => Ok(Self::Npm),
            other => Err(IngestError::UnknownResource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests;
