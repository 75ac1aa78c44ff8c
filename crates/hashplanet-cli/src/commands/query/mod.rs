//! Query module: Read-only commands against the store

mod run;

pub use run::run;
