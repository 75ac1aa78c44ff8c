//! Configuration: ingestion targets and run options

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::filter::PathFilter;
use crate::resource::Resource;

/// Default location of the targets file
pub const DEFAULT_CONFIG_PATH: &str = "tech_list.json";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Targets of one resource type
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetSection {
    #[serde(default)]
    pub targets: Vec<String>,
    /// Paths matching this pattern are never hashed
    #[serde(default)]
    pub exclude_regex: Option<String>,
}

/// The targets file
///
/// Sections other than `git` and `npm` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub git: Option<TargetSection>,
    #[serde(default)]
    pub npm: Option<TargetSection>,
}

/// One technology to ingest
#[derive(Debug, Clone)]
pub struct Job {
    pub resource: Resource,
    /// Git URL or package name
    pub target: String,
    pub technology: String,
    pub filter: PathFilter,
}

/// Knobs for an ingestion run
#[derive(Debug, Clone, Copy)]
pub struct IngestOptions {
    pub clone_timeout: Duration,
    pub request_timeout: Duration,
    /// Technologies ingested concurrently
    pub jobs: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            clone_timeout: Duration::from_secs(300),
            request_timeout: Duration::from_secs(10),
            jobs: 4,
        }
    }
}

impl Config {
    /// Read and parse a targets file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a targets document
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON of the right shape.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Expand every section into jobs, git targets first
    ///
    /// # Errors
    /// Returns an error if an exclude pattern does not compile.
    pub fn jobs(&self) -> Result<Vec<Job>, ConfigError> {
        let mut jobs = Vec::new();

        for (resource, section) in [(Resource::Git, &self.git), (Resource::Npm, &self.npm)] {
            let Some(section) = section else {
                continue;
            };
            let filter = PathFilter::from_pattern(section.exclude_regex.as_deref())?;

            jobs.extend(section.targets.iter().map(|target| Job {
                resource,
                target: target.clone(),
                technology: technology_name(resource, target),
                filter: filter.clone(),
            }));
        }

        Ok(jobs)
    }
}

/// Technology a target is recorded under.
///
/// For git, the last URL segment without trailing slashes or `.git`. For
/// npm, the package name itself.
#[must_use]
pub fn technology_name(resource: Resource, target: &str) -> String {
    match resource {
        Resource::Git => {
            let trimmed = target.trim_end_matches('/');
            let last = trimmed.rsplit('/').next().unwrap_or(trimmed);
            last.strip_suffix(".git").unwrap_or(last).to_string()
        }
        Resource::Npm => target.to_string(),
    }
}
