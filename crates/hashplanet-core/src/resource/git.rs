//! Git ingestion pipeline

use std::collections::HashSet;
use std::time::Duration;

use tracing::{Instrument, Span, info, info_span};

use super::IngestError;
use crate::config::{IngestOptions, Job};
use crate::filter::PathFilter;
use crate::git::{DiffEngine, GitSource, SourceError};
use crate::hasher::{ContentHasher, HashedFile};
use crate::store::{FingerprintStore, StoreSession, close_session, merge_changes};
use crate::version::{IngestRun, catch_up, labels};

/// Output of the blocking part of the pipeline
struct Collected {
    /// Every tag in the repository, oldest first
    history: Vec<String>,
    /// Catch-up tags, including the diff baseline
    batch: Vec<String>,
    hashed: Vec<HashedFile>,
    /// Stored content at the first catch-up tag, for paths that change
    baseline: Vec<HashedFile>,
}

/// Clone a git target and merge every new tag into the store.
///
/// The clone happens before the session opens. Tag listing, diffing and
/// hashing run on the blocking pool; the merge runs inside one session
/// that is committed on success and rolled back on failure.
///
/// # Errors
/// Returns an error if the clone fails or times out, the repository cannot
/// be read, or the store fails.
pub async fn ingest(
    store: &dyn FingerprintStore,
    job: &Job,
    options: &IngestOptions,
) -> Result<IngestRun, IngestError> {
    let mut run = IngestRun::new(&job.technology, &job.target);
    let span = info_span!("ingest", technology = %job.technology, run_id = %run.id);

    async move {
        let source = clone_source(&job.target, options.clone_timeout).await?;

        let mut session = store.begin().await?;
        let result = process(session.as_mut(), source, job, &mut run).await;
        close_session(session, result).await?;

        info!(
            "Ingested {}: {} new tags, {} files hashed, {} hashes created, {} extended",
            job.technology, run.tags_processed, run.files_hashed, run.hashes_created, run.hashes_extended
        );
        Ok(run)
    }
    .instrument(span)
    .await
}

async fn clone_source(url: &str, timeout: Duration) -> Result<GitSource, IngestError> {
    info!("Cloning {} ...", url);

    let target = url.to_string();
    let span = Span::current();
    let task = tokio::task::spawn_blocking(move || span.in_scope(|| GitSource::clone_bare(&target)));

    match tokio::time::timeout(timeout, task).await {
        Ok(joined) => Ok(joined??),
        Err(_) => Err(SourceError::Timeout {
            url: url.to_string(),
            after: timeout,
        }
        .into()),
    }
}

async fn process(
    session: &mut dyn StoreSession,
    source: GitSource,
    job: &Job,
    run: &mut IngestRun,
) -> Result<(), IngestError> {
    let stored = session.get_versions(&job.technology).await?;
    info!("{} versions already stored", stored.len());

    let filter = job.filter.clone();
    let span = Span::current();
    let known = stored.clone();
    let collected = tokio::task::spawn_blocking(move || {
        span.in_scope(|| collect_hashes(&source, &filter, &known))
    })
    .await??;

    if collected.batch.is_empty() {
        info!("Already up to date");
        return Ok(());
    }

    let summary = merge_changes(
        session,
        &job.technology,
        &collected.hashed,
        &collected.baseline,
        &collected.history,
        &collected.batch,
    )
    .await?;

    run.tags_processed = collected
        .batch
        .iter()
        .filter(|label| !stored.contains(label))
        .count();
    run.files_hashed = collected.hashed.len();
    run.hashes_created = summary.hashes_created;
    run.hashes_extended = summary.hashes_extended;
    Ok(())
}

/// List tags, diff the catch-up range and hash every change
fn collect_hashes(
    source: &GitSource,
    filter: &PathFilter,
    stored: &[String],
) -> Result<Collected, SourceError> {
    let found = source.tags()?;
    let history = labels(&found);
    let tags = catch_up(stored, &found);

    if tags.is_empty() {
        return Ok(Collected {
            history,
            batch: Vec::new(),
            hashed: Vec::new(),
            baseline: Vec::new(),
        });
    }
    info!("Processing {} tags ({} found)", tags.len(), found.len());

    let engine = DiffEngine::new(source, filter);
    let mut records = Vec::new();
    if stored.is_empty() {
        if let Some(first) = tags.first() {
            records.extend(engine.snapshot(first)?);
        }
    }
    records.extend(engine.changes(&tags)?);

    // The first tag is already stored: its tree tells where each changed
    // path's current digest was last seen.
    let mut baseline = Vec::new();
    if !stored.is_empty() {
        if let Some(first) = tags.first() {
            let changed: HashSet<&str> = records.iter().map(|r| r.path.as_str()).collect();
            baseline = engine.snapshot(first)?;
            baseline.retain(|record| changed.contains(record.path.as_str()));
        }
    }

    let mut hasher = ContentHasher::new(source);
    let hashed = hasher.hash(&records);
    let baseline = hasher.hash(&baseline);

    Ok(Collected {
        history,
        batch: labels(&tags),
        hashed,
        baseline,
    })
}
