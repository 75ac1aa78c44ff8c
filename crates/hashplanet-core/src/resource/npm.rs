//! npm registry ingestion pipeline

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use serde::Deserialize;
use thiserror::Error;
use tracing::{Instrument, Span, debug, info, info_span, warn};

use super::IngestError;
use crate::config::{IngestOptions, Job};
use crate::filter::PathFilter;
use crate::hasher::{HashedFile, hash_bytes};
use crate::store::{FingerprintStore, StoreSession, close_session, merge_release};
use crate::version::IngestRun;

/// Public npm registry
pub const REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Errors that can occur while talking to a package registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] std::io::Error),
}

/// A published version of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub version: String,
    pub published: DateTime<Utc>,
    pub tarball: String,
}

#[derive(Debug, Default, Deserialize)]
struct PackageDocument {
    #[serde(default)]
    time: HashMap<String, String>,
    #[serde(default)]
    versions: HashMap<String, VersionDocument>,
}

#[derive(Debug, Deserialize)]
struct VersionDocument {
    dist: Dist,
}

#[derive(Debug, Deserialize)]
struct Dist {
    tarball: String,
}

/// Releases of a package document, oldest publish time first.
///
/// Versions without a parseable publish time are skipped.
///
/// # Errors
/// Returns an error if the document is not a package document.
pub fn order_releases(document: &str) -> Result<Vec<Release>, serde_json::Error> {
    let document: PackageDocument = serde_json::from_str(document)?;
    Ok(releases_of(document))
}

fn releases_of(document: PackageDocument) -> Vec<Release> {
    let mut releases: Vec<Release> = document
        .versions
        .into_iter()
        .filter_map(|(version, meta)| {
            let Some(published) = document
                .time
                .get(&version)
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            else {
                debug!("Skipping {} (no publish time)", version);
                return None;
            };
            Some(Release {
                version,
                published: published.with_timezone(&Utc),
                tarball: meta.dist.tarball,
            })
        })
        .collect();

    releases.sort_by(|a, b| {
        a.published
            .cmp(&b.published)
            .then_with(|| a.version.cmp(&b.version))
    });
    releases
}

/// Hash every regular file of a gzipped package tarball.
///
/// The first path component (`package/` for npm) is stripped. Rejected and
/// empty files are skipped.
///
/// # Errors
/// Returns an error if the archive is not a gzipped tar.
pub fn hash_tarball(
    archive: &[u8],
    filter: &PathFilter,
    version: &str,
) -> Result<Vec<HashedFile>, std::io::Error> {
    let mut archive = tar::Archive::new(GzDecoder::new(archive));
    let mut hashed = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let Some(path) = strip_root(&entry.path()?) else {
            continue;
        };
        if !filter.accepts(&path) {
            continue;
        }

        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        if content.is_empty() {
            continue;
        }

        hashed.push(HashedFile {
            path,
            tag: version.to_string(),
            digest: hash_bytes(&content),
        });
    }

    Ok(hashed)
}

fn strip_root(path: &Path) -> Option<String> {
    let parts: Vec<String> = path
        .iter()
        .skip(1)
        .map(|part| part.to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Client for an npm-compatible registry
#[derive(Debug, Clone)]
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Create a client for the public registry
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: REGISTRY_URL.to_string(),
        })
    }

    /// Point the client at another registry
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of a package document; the scope separator is escaped
    #[must_use]
    pub fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.replace('/', "%2F"))
    }

    /// Fetch the releases of a package, oldest first
    ///
    /// # Errors
    /// Returns an error if the request fails or the document is malformed.
    pub async fn releases(&self, name: &str) -> Result<Vec<Release>, RegistryError> {
        let url = self.package_url(name);
        debug!("Fetching {}", url);

        let document: PackageDocument = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(releases_of(document))
    }

    /// Download a release tarball
    ///
    /// # Errors
    /// Returns an error if the request fails.
    pub async fn download(&self, release: &Release) -> Result<Vec<u8>, RegistryError> {
        let bytes = self
            .client
            .get(&release.tarball)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(bytes.to_vec())
    }
}

/// Download every new release of a package and merge its files.
///
/// # Errors
/// Returns an error if the package document cannot be fetched or the store
/// fails. A release that cannot be downloaded or unpacked is skipped.
pub async fn ingest(
    store: &dyn FingerprintStore,
    job: &Job,
    options: &IngestOptions,
) -> Result<IngestRun, IngestError> {
    let registry = NpmRegistry::new(options.request_timeout)?;
    ingest_from(&registry, store, job).await
}

/// Same as [`ingest`] against an explicit registry client
///
/// # Errors
/// Returns an error if the package document cannot be fetched or the store
/// fails.
pub async fn ingest_from(
    registry: &NpmRegistry,
    store: &dyn FingerprintStore,
    job: &Job,
) -> Result<IngestRun, IngestError> {
    let mut run = IngestRun::new(&job.technology, &job.target);
    let span = info_span!("ingest", technology = %job.technology, run_id = %run.id);

    async move {
        let releases = registry.releases(&job.target).await?;
        info!("{} releases published", releases.len());

        let mut session = store.begin().await?;
        let result = process(session.as_mut(), registry, &releases, job, &mut run).await;
        close_session(session, result).await?;

        info!(
            "Ingested {}: {} new versions, {} files hashed",
            job.technology, run.tags_processed, run.files_hashed
        );
        Ok(run)
    }
    .instrument(span)
    .await
}

async fn process(
    session: &mut dyn StoreSession,
    registry: &NpmRegistry,
    releases: &[Release],
    job: &Job,
    run: &mut IngestRun,
) -> Result<(), IngestError> {
    let stored = session.get_versions(&job.technology).await?;

    for release in releases.iter().filter(|r| !stored.contains(&r.version)) {
        let Some(hashed) = fetch_release(registry, release, &job.filter).await else {
            continue;
        };

        let summary = merge_release(session, &job.technology, &release.version, &hashed).await?;
        run.tags_processed += 1;
        run.files_hashed += hashed.len();
        run.hashes_created += summary.hashes_created;
        run.hashes_extended += summary.hashes_extended;
    }

    Ok(())
}

/// Download and hash one release; failures are logged and yield `None`
async fn fetch_release(
    registry: &NpmRegistry,
    release: &Release,
    filter: &PathFilter,
) -> Option<Vec<HashedFile>> {
    debug!("Downloading {} ...", release.version);
    let archive = match registry.download(release).await {
        Ok(archive) => archive,
        Err(e) => {
            warn!("Failed to download {}: {}", release.version, e);
            return None;
        }
    };

    let filter = filter.clone();
    let version = release.version.clone();
    let span = Span::current();
    let unpacked =
        tokio::task::spawn_blocking(move || span.in_scope(|| hash_tarball(&archive, &filter, &version)))
            .await;

    match unpacked {
        Ok(Ok(hashed)) => Some(hashed),
        Ok(Err(e)) => {
            warn!("Failed to unpack {}: {}", release.version, e);
            None
        }
        Err(e) => {
            warn!("Unpacking {} was interrupted: {}", release.version, e);
            None
        }
    }
}
