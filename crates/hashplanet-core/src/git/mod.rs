//! Git module: Repository access and tag diffing
//!
//! Reads tags, trees and blobs straight from the object database of a bare
//! clone. Nothing is ever checked out, so blob bytes are exactly what was
//! committed.

mod diff;
mod repository;

pub use diff::{ChangeRecord, DiffEngine};
pub use repository::{GitSource, SourceError, TreeFile};

#[cfg(test)]
pub(crate) mod tests;
