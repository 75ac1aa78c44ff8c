//! CLI commands

pub mod ingest;
pub mod output;
pub mod query;
