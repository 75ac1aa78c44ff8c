//! hashplanet-cli library
//!
//! This module exposes the internal functionality of hashplanet-cli for testing purposes.

// Make commands module available for internal tests only
#[doc(hidden)]
pub mod commands;

pub mod logging;
pub mod types;
pub use types::{Cli, Commands, IngestArgs, LookupArgs, QueryCommands, StoreArgs};

#[cfg(test)]
mod tests;
