//! Ingest module: Run every configured target

mod run;

pub use run::{run, run_jobs};
