//! Tag catch-up: which tags still need to be ingested

use super::Tag;

/// Compute the tags to run the diff engine over.
///
/// `stored` holds the labels already ingested for a technology, in insertion
/// order. `found` holds the tags currently present in the source, ordered by
/// commit time. A tag is divergent when its index is past the end of
/// `stored` or its label differs from the stored label at the same index.
/// Every divergent tag is returned, in `found` order. The tag immediately
/// before the first divergent one is prepended so the first new tag has a
/// diff baseline.
///
/// Equal lengths are treated as fully caught up.
#[must_use]
pub fn catch_up(stored: &[String], found: &[Tag]) -> Vec<Tag> {
    let mut result: Vec<Tag> = Vec::new();

    if stored.len() == found.len() {
        return result;
    }

    for (idx, tag) in found.iter().enumerate() {
        if stored.get(idx) == Some(&tag.label) {
            continue;
        }

        if result.is_empty() && idx > 0 {
            result.push(found[idx - 1].clone());
        }
        result.push(tag.clone());
    }

    result
}
