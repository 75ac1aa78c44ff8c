//! Hasher module: SHA-256 fingerprints of file content
//!
//! Digests are computed over the exact bytes of a blob or file, with no
//! normalisation, and rendered as 64 lowercase hex characters.

mod content;
mod digest;

pub use content::{ContentHasher, HashedFile};
pub use digest::{hash_bytes, hash_file};
