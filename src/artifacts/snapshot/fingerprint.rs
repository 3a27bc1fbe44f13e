//! Whole-tree fingerprinting
//!
//! A fingerprint is a single digest summarizing a snapshot's entire
//! path-to-hash mapping. Entries are sorted by path before digesting, so
//! filesystem traversal order never affects the result.

use crate::artifacts::snapshot::FileEntry;
use crate::artifacts::snapshot::digest::Digest;

/// Compute the aggregate fingerprint of a set of file entries.
///
/// Digests the concatenation of `path + "\0" + hash` for every entry,
/// sorted by relative path. Two directory states with an identical
/// path-to-hash mapping always fingerprint the same, regardless of the
/// order the entries were collected in.
pub fn fingerprint(entries: &[FileEntry]) -> Digest {
    let mut sorted = entries.iter().collect::<Vec<_>>();
    sorted.sort_by(|left, right| left.path.cmp(&right.path));

    let mut buffer = Vec::new();
    for entry in sorted {
        buffer.extend_from_slice(entry.path.as_bytes());
        buffer.push(0);
        buffer.extend_from_slice(entry.hash.as_ref().as_bytes());
    }

    Digest::of_bytes(&buffer)
}
