//! Command types shared between main and library

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use hashplanet_core::config::DEFAULT_CONFIG_PATH;
use hashplanet_core::{IngestOptions, Neo4jConfig, Neo4jStore};

#[derive(Parser)]
#[command(name = "hashplanet")]
#[command(author, version, about = "Content-fingerprint database for static web assets", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Colorize log output
    #[arg(long, global = true)]
    pub color: bool,

    #[command(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest every target of the configuration file
    Ingest(IngestArgs),

    #[command(flatten)]
    Query(QueryCommands),
}

#[derive(Subcommand)]
pub enum QueryCommands {
    /// Find the technology and versions of a digest, file or string
    Lookup(LookupArgs),
    /// List the versions of a technology in stored order
    Versions {
        /// Technology name
        technology: String,
    },
    /// List stored paths that look like static assets
    StaticFiles,
    /// List every stored hash
    Hashes,
    /// Show row counts
    Stats,
}

/// Neo4j connection flags
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Neo4j connection URI
    #[arg(long, global = true, default_value = "bolt://localhost:7687")]
    pub neo4j_uri: String,

    /// Neo4j username
    #[arg(long, global = true, default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, global = true, default_value = "")]
    pub neo4j_password: String,

    /// Neo4j database name
    #[arg(long, global = true)]
    pub neo4j_database: Option<String>,
}

impl StoreArgs {
    /// Connection settings for the store
    #[must_use]
    pub fn config(&self) -> Neo4jConfig {
        let config = Neo4jConfig::new(&self.neo4j_uri, &self.neo4j_user, &self.neo4j_password);
        match &self.neo4j_database {
            Some(db) => config.with_database(db),
            None => config,
        }
    }

    /// Connect to the store
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(&self) -> anyhow::Result<Neo4jStore> {
        Ok(Neo4jStore::connect(&self.config()).await?)
    }
}

#[derive(Debug, Clone, Args)]
pub struct IngestArgs {
    /// Targets file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Technologies ingested concurrently
    #[arg(long, default_value_t = 4)]
    pub jobs: usize,

    /// Seconds before a clone is abandoned
    #[arg(long, default_value_t = 300)]
    pub clone_timeout: u64,

    /// Seconds before a registry request is abandoned
    #[arg(long, default_value_t = 10)]
    pub request_timeout: u64,

    /// Ingest into memory and print statistics instead of writing to Neo4j
    #[arg(long)]
    pub dry_run: bool,
}

impl IngestArgs {
    #[must_use]
    pub fn options(&self) -> IngestOptions {
        IngestOptions {
            clone_timeout: Duration::from_secs(self.clone_timeout),
            request_timeout: Duration::from_secs(self.request_timeout),
            jobs: self.jobs,
        }
    }
}

/// Exactly one thing to look up
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct LookupArgs {
    /// Hex SHA-256 digest
    #[arg(long)]
    pub hash: Option<String>,

    /// Local file to hash
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// String to hash
    #[arg(long)]
    pub text: Option<String>,
}
