//! hashplanet: CLI for the content-fingerprint database

use std::sync::Arc;

use clap::Parser;
use hashplanet_cli::commands::{ingest, query};
use hashplanet_cli::logging::setup_logging;
use hashplanet_cli::{Cli, Commands};
use hashplanet_core::Lookup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.color);

    match cli.command {
        Commands::Ingest(args) => {
            ingest::run(&args, &cli.store).await?;
        }
        Commands::Query(cmd) => {
            let store = cli.store.connect().await?;
            query::run(cmd, &Lookup::new(Arc::new(store))).await?;
        }
    }

    Ok(())
}
