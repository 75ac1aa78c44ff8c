//! Filter module: Path selection and asset classification
//!
//! Decides which repository paths are worth hashing and which stored paths
//! are static assets a web server would typically expose.

mod asset;
mod path;

pub use asset::is_static_asset;
pub use path::{DEFAULT_EXTENSIONS, PathFilter};

#[cfg(test)]
mod tests;
