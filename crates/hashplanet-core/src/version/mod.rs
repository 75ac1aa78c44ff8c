//! Version module: Tags, catch-up and ingest runs
//!
//! Decides which release tags still need to be processed for a technology
//! and records metadata about each ingestion run.

mod catch_up;
mod ingest_run;
mod tag;

pub use catch_up::catch_up;
pub use ingest_run::IngestRun;
pub use tag::{Tag, labels};
