//! One side of a file-level diff
//!
//! A target pairs a manifest entry with its blob content, or stands in
//! for the absent side when a file only exists in one snapshot.

use crate::areas::blob_store::BlobStore;
use crate::artifacts::diff::content::ContentKind;
use crate::artifacts::snapshot::FileEntry;
use crate::artifacts::snapshot::digest::Digest;

const NULL_PATH: &str = "/dev/null";

#[derive(Debug, Clone)]
pub struct DiffTarget {
    path: String,
    hash: Digest,
    content: ContentKind,
}

impl DiffTarget {
    /// Load a target from a manifest entry, reading its blob from storage
    pub fn from_entry(entry: &FileEntry, blobs: &BlobStore) -> anyhow::Result<Self> {
        let data = blobs.get(&entry.hash)?;

        Ok(Self {
            path: entry.path.clone(),
            hash: entry.hash.clone(),
            content: ContentKind::classify(&data),
        })
    }

    /// The absent side of an added or removed file
    pub fn from_nothing(path: &str) -> Self {
        Self {
            path: path.to_string(),
            hash: Digest::zero(),
            content: ContentKind::Text(Vec::new()),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.hash == Digest::zero()
    }

    pub fn hash(&self) -> &Digest {
        &self.hash
    }

    pub fn content(&self) -> &ContentKind {
        &self.content
    }

    /// Header path: `<prefix>/<path>`, or `/dev/null` for the absent side
    pub fn diff_path(&self, prefix: &str) -> String {
        if self.is_absent() {
            NULL_PATH.to_string()
        } else {
            format!("{}/{}", prefix, self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn absent_side_renders_as_dev_null() {
        let target = DiffTarget::from_nothing("new_file.txt");

        assert!(target.is_absent());
        assert_eq!(target.diff_path("a"), "/dev/null");
        assert_eq!(target.content(), &ContentKind::Text(Vec::new()));
    }

    #[rstest]
    fn present_side_carries_its_prefix() {
        let target = DiffTarget {
            path: "src/main.rs".to_string(),
            hash: Digest::of_bytes(b"fn main() {}"),
            content: ContentKind::classify(b"fn main() {}"),
        };

        assert!(!target.is_absent());
        assert_eq!(target.diff_path("b"), "b/src/main.rs");
    }
}
