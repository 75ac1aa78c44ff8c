//! Ingest command: Fill the store from the targets file

use std::sync::Arc;

use anyhow::{Context, Result};
use hashplanet_core::{
    Config, Executor, FingerprintStore, IngestOptions, Job, Lookup, MemoryStore, RunSummary,
};
use tracing::info;

use crate::commands::output::{render_stats, render_summary};
use crate::types::{IngestArgs, StoreArgs};

/// Run the ingest command
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or the store
/// cannot be reached. Failing technologies are reported, not returned.
pub async fn run(args: &IngestArgs, store_args: &StoreArgs) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let jobs = config.jobs()?;

    if jobs.is_empty() {
        println!("No targets configured in {}", args.config.display());
        return Ok(());
    }

    let store: Arc<dyn FingerprintStore> = if args.dry_run {
        info!("Dry run: ingesting into memory");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(store_args.connect().await?)
    };

    let summary = run_jobs(Arc::clone(&store), jobs, args.options()).await;
    print!("{}", render_summary(&summary));

    if args.dry_run {
        let stats = Lookup::new(store).stats().await?;
        print!("{}", render_stats(&stats));
    }

    Ok(())
}

/// Ingest a job list into a store
pub async fn run_jobs(
    store: Arc<dyn FingerprintStore>,
    jobs: Vec<Job>,
    options: IngestOptions,
) -> RunSummary {
    Executor::new(store, options).run(jobs).await
}
