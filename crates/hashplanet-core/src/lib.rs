//! hashplanet-core: Core library for content-fingerprint ingestion
//!
//! This library walks the tag history of version-controlled sources (and the
//! release archives of package registries), hashes the exact bytes of every
//! file that changed between releases, and records which versions each digest
//! was observed in. A digest computed later from an unknown file can then be
//! matched back to a technology and a narrow set of candidate versions.
//!
//! # Pipeline
//!
//! - **catch-up** - decide which tags still need processing
//! - **diff** - list files added or modified between consecutive tags
//! - **hash** - SHA-256 over blob bytes read from the object database
//! - **merge** - upsert digests with retroactive version backfill

pub mod config;
pub mod executor;
pub mod filter;
pub mod git;
pub mod hasher;
pub mod lookup;
pub mod resource;
pub mod store;
pub mod version;

// Re-export commonly used types
pub use config::{Config, IngestOptions, Job};
pub use executor::{Executor, RunSummary};
pub use filter::{PathFilter, is_static_asset};
pub use git::{ChangeRecord, DiffEngine, GitSource};
pub use hasher::{ContentHasher, HashedFile, hash_bytes, hash_file};
pub use lookup::{Lookup, Match};
pub use resource::{IngestError, Resource};
pub use store::{
    FingerprintStore, MemoryStore, Neo4jConfig, Neo4jStore, StoreError, StoreSession, StoreStats,
};
pub use version::{IngestRun, Tag, catch_up};
