//! Raw digest helpers

use std::path::Path;

use sha2::{Digest, Sha256};

/// SHA-256 of a byte slice as lowercase hex
#[must_use]
pub fn hash_bytes(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// SHA-256 of a file's bytes as lowercase hex
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn hash_file(path: &Path) -> std::io::Result<String> {
    let content = std::fs::read(path)?;
    Ok(hash_bytes(&content))
}
