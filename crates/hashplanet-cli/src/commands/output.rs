//! Plain-text rendering of command results

use std::fmt::Write;

use hashplanet_core::store::HashRecord;
use hashplanet_core::{Match, RunSummary, StoreStats};

/// Render a lookup result
#[must_use]
pub fn render_lookup(found: Option<&Match>) -> String {
    match found {
        Some(m) => format!(
            "technology: {}\nversions:   {}\n",
            m.technology,
            m.versions.join(", ")
        ),
        None => "no match\n".to_string(),
    }
}

#[must_use]
pub fn render_versions(technology: &str, versions: &[String]) -> String {
    if versions.is_empty() {
        return format!("No versions stored for {technology}\n");
    }
    let mut out = String::new();
    for version in versions {
        let _ = writeln!(out, "{version}");
    }
    out
}

#[must_use]
pub fn render_hashes(hashes: &[HashRecord]) -> String {
    let mut out = String::new();
    for hash in hashes {
        let _ = writeln!(
            out,
            "{}  {:<20} {}",
            hash.digest,
            hash.technology,
            hash.versions.join(",")
        );
    }
    let _ = writeln!(out, "\n{} hashes", hashes.len());
    out
}

#[must_use]
pub fn render_stats(stats: &StoreStats) -> String {
    format!(
        "\n=== Store Statistics ===\n\n  Versions: {}\n  Files:    {}\n  Hashes:   {}\n",
        stats.versions, stats.files, stats.hashes
    )
}

#[must_use]
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    for run in &summary.succeeded {
        let _ = writeln!(
            out,
            "✓ {}: {} new versions, {} files, {} new hashes, {} extended",
            run.technology, run.tags_processed, run.files_hashed, run.hashes_created, run.hashes_extended
        );
    }
    for (technology, error) in &summary.failed {
        let _ = writeln!(out, "✗ {technology}: {error}");
    }
    out
}
