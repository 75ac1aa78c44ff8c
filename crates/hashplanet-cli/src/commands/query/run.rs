//! Query commands: lookup, versions, static files, hashes and stats

use anyhow::Result;
use hashplanet_core::Lookup;
use tracing::info;

use crate::commands::output::{render_hashes, render_lookup, render_stats, render_versions};
use crate::types::{LookupArgs, QueryCommands};

/// Run a query command
///
/// # Errors
/// Returns an error if the store query fails.
pub async fn run(cmd: QueryCommands, lookup: &Lookup) -> Result<()> {
    match cmd {
        QueryCommands::Lookup(args) => {
            run_lookup(lookup, &args).await?;
        }
        QueryCommands::Versions { technology } => {
            info!("Listing versions of {}...", technology);
            let versions = lookup.get_versions(&technology).await?;
            print!("{}", render_versions(&technology, &versions));
        }
        QueryCommands::StaticFiles => {
            info!("Listing static files...");
            for path in lookup.static_files().await? {
                println!("{path}");
            }
        }
        QueryCommands::Hashes => {
            info!("Listing hashes...");
            print!("{}", render_hashes(&lookup.all_hashes().await?));
        }
        QueryCommands::Stats => {
            print!("{}", render_stats(&lookup.stats().await?));
        }
    }

    Ok(())
}

async fn run_lookup(lookup: &Lookup, args: &LookupArgs) -> Result<()> {
    let found = if let Some(digest) = &args.hash {
        lookup.find_hash(digest).await?
    } else if let Some(path) = &args.file {
        lookup.find_file(path).await?
    } else if let Some(text) = &args.text {
        lookup.find_str(text).await?
    } else {
        None
    };

    print!("{}", render_lookup(found.as_ref()));
    Ok(())
}
