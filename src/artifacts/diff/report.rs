//! Snapshot-level change report
//!
//! Compares two manifests by their path-to-hash mappings and buckets every
//! path into added, removed, modified or unchanged. Purely a manifest
//! computation; blob contents are never read here.

use crate::artifacts::snapshot::Snapshot;
use std::collections::BTreeSet;

/// Path-level summary of the changes between two snapshots
///
/// Every path present in either snapshot lands in exactly one bucket.
/// Sets are ordered so report output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
    pub modified: BTreeSet<String>,
    pub unchanged: BTreeSet<String>,
}

impl DiffReport {
    pub fn between(a: &Snapshot, b: &Snapshot) -> Self {
        let mut report = Self::default();

        for entry in b.entries() {
            match a.entry_for(&entry.path) {
                None => {
                    report.added.insert(entry.path.clone());
                }
                Some(before) if before.hash != entry.hash => {
                    report.modified.insert(entry.path.clone());
                }
                Some(_) => {
                    report.unchanged.insert(entry.path.clone());
                }
            }
        }

        for entry in a.entries() {
            if b.entry_for(&entry.path).is_none() {
                report.removed.insert(entry.path.clone());
            }
        }

        report
    }

    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Paths with a content difference, in order
    pub fn changed_paths(&self) -> impl Iterator<Item = &String> {
        self.removed
            .iter()
            .chain(self.added.iter())
            .chain(self.modified.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::snapshot::digest::Digest;
    use crate::artifacts::snapshot::FileEntry;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn snapshot(files: &[(&str, &[u8])]) -> Snapshot {
        let entries = files
            .iter()
            .map(|(path, content)| {
                FileEntry::new(
                    path.to_string(),
                    Digest::of_bytes(content),
                    content.len() as u64,
                )
            })
            .collect();
        Snapshot::create(entries, "")
    }

    fn paths(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[rstest]
    fn buckets_every_path_exactly_once() {
        let a = snapshot(&[
            ("kept.txt", b"same"),
            ("edited.txt", b"before"),
            ("gone.txt", b"bye"),
        ]);
        let b = snapshot(&[
            ("kept.txt", b"same"),
            ("edited.txt", b"after"),
            ("new.txt", b"hi"),
        ]);

        let report = DiffReport::between(&a, &b);

        assert_eq!(paths(&report.added), vec!["new.txt"]);
        assert_eq!(paths(&report.removed), vec!["gone.txt"]);
        assert_eq!(paths(&report.modified), vec!["edited.txt"]);
        assert_eq!(paths(&report.unchanged), vec!["kept.txt"]);
    }

    #[rstest]
    fn identical_snapshots_are_clean() {
        let a = snapshot(&[("a.txt", b"x"), ("b.txt", b"y")]);
        let b = snapshot(&[("a.txt", b"x"), ("b.txt", b"y")]);

        let report = DiffReport::between(&a, &b);

        assert!(report.is_clean());
        assert_eq!(report.unchanged.len(), 2);
    }

    #[rstest]
    fn direction_matters() {
        let a = snapshot(&[("only-in-a.txt", b"x")]);
        let b = snapshot(&[("only-in-b.txt", b"y")]);

        let forward = DiffReport::between(&a, &b);
        let backward = DiffReport::between(&b, &a);

        assert_eq!(paths(&forward.added), vec!["only-in-b.txt"]);
        assert_eq!(paths(&forward.removed), vec!["only-in-a.txt"]);
        assert_eq!(paths(&backward.added), vec!["only-in-a.txt"]);
        assert_eq!(paths(&backward.removed), vec!["only-in-b.txt"]);
    }

    #[rstest]
    fn empty_snapshots_produce_an_empty_report() {
        let report = DiffReport::between(&snapshot(&[]), &snapshot(&[]));

        assert_eq!(report, DiffReport::default());
    }
}
