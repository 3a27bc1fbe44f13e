//! Manifests and HEAD
//!
//! Manifests are pretty-printed JSON files under `.keep/manifests`, named
//! after their snapshot id (`<fingerprint>-<timestamp>.json`). `.keep/HEAD`
//! is a plain-text file holding the fingerprint of the most recent
//! snapshot; an empty HEAD means no snapshot exists yet.
//!
//! Manifests are immutable except for their message. All writes are
//! temp-file-then-rename so a crash never leaves a half-written manifest
//! or HEAD.

use crate::artifacts::core::StoreError;
use crate::artifacts::snapshot::digest::Digest;
use crate::artifacts::snapshot::{FileEntry, Snapshot, SnapshotId};
use derive_new::new;
use fake::rand;
use std::path::{Path, PathBuf};

/// Name of the HEAD file inside the store
pub const HEAD_FILE: &str = "HEAD";

/// Name of the manifests directory inside the store
const MANIFESTS_DIR: &str = "manifests";

#[derive(Debug, new)]
pub struct ManifestStore {
    /// Path to the store directory (typically `.keep`)
    path: Box<Path>,
}

impl ManifestStore {
    pub fn manifests_path(&self) -> Box<Path> {
        self.path.join(MANIFESTS_DIR).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_FILE).into_boxed_path()
    }

    fn manifest_path(&self, id: &SnapshotId) -> PathBuf {
        self.manifests_path().join(format!("{}.json", id))
    }

    /// Persist a new snapshot and advance HEAD to its fingerprint
    ///
    /// Snapshot ids have second resolution; a second snapshot with the same
    /// fingerprint within the same second would collide with an existing
    /// manifest and is refused rather than overwritten.
    pub fn create(&self, entries: Vec<FileEntry>, message: &str) -> anyhow::Result<Snapshot> {
        let snapshot = Snapshot::create(entries, message);

        if self.manifest_path(snapshot.id()).exists() {
            return Err(StoreError::storage(format!(
                "manifest {} already exists",
                snapshot.id()
            ))
            .into());
        }

        self.write_manifest(&snapshot)?;
        self.update_head(snapshot.fingerprint())?;

        Ok(snapshot)
    }

    /// Load every readable manifest, oldest first
    ///
    /// A malformed manifest is logged and skipped so one corrupt file never
    /// hides the rest of the history.
    pub fn list(&self) -> anyhow::Result<Vec<Snapshot>> {
        let manifests_path = self.manifests_path();
        let entries = std::fs::read_dir(&manifests_path).map_err(|err| {
            StoreError::repository(format!(
                "unable to read manifests directory {}: {}",
                manifests_path.display(),
                err
            ))
        })?;

        let mut snapshots = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| StoreError::repository(err.to_string()))?
                .path();
            if path.extension().is_none_or(|extension| extension != "json") {
                continue;
            }

            match self.load_manifest(&path) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping malformed manifest");
                }
            }
        }

        snapshots.sort_by(|left, right| {
            left.created_at()
                .cmp(right.created_at())
                .then_with(|| left.id().cmp(right.id()))
        });

        Ok(snapshots)
    }

    /// Load one manifest by id
    pub fn get(&self, id: &SnapshotId) -> anyhow::Result<Snapshot> {
        let path = self.manifest_path(id);

        if !path.exists() {
            return Err(StoreError::not_found("snapshot", id.as_ref()).into());
        }

        self.load_manifest(&path).map_err(|err| {
            StoreError::repository(format!("manifest {} is malformed: {:#}", id, err)).into()
        })
    }

    /// Rewrite a manifest with a new message, leaving everything else intact
    pub fn update_message(&self, id: &SnapshotId, message: &str) -> anyhow::Result<Snapshot> {
        let mut snapshot = self.get(id)?;
        snapshot.set_message(message);
        self.write_manifest(&snapshot)?;

        Ok(snapshot)
    }

    /// The fingerprint HEAD points at, if any snapshot exists
    pub fn head_fingerprint(&self) -> anyhow::Result<Option<Digest>> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&head_path).map_err(|err| {
            StoreError::repository(format!(
                "unable to read {}: {}",
                head_path.display(),
                err
            ))
        })?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(Digest::try_parse(content.to_string())?))
    }

    /// The snapshot HEAD points at: the most recent one with HEAD's fingerprint
    pub fn head(&self) -> anyhow::Result<Option<Snapshot>> {
        let Some(fingerprint) = self.head_fingerprint()? else {
            return Ok(None);
        };

        // list() is ordered oldest first
        Ok(self
            .list()?
            .into_iter()
            .filter(|snapshot| snapshot.fingerprint() == &fingerprint)
            .next_back())
    }

    pub fn update_head(&self, fingerprint: &Digest) -> anyhow::Result<()> {
        self.write_atomic(&self.head_path(), fingerprint.as_ref().as_bytes())
    }

    fn write_manifest(&self, snapshot: &Snapshot) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(snapshot).map_err(|err| {
            StoreError::storage(format!("unable to serialize manifest: {}", err))
        })?;

        self.write_atomic(&self.manifest_path(snapshot.id()), &content)
    }

    fn load_manifest(&self, path: &Path) -> anyhow::Result<Snapshot> {
        let stem = path
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("manifest file {} has no stem", path.display()))?
            .to_string_lossy()
            .to_string();
        let id = SnapshotId::try_parse(stem)?;

        let content = std::fs::read(path)?;
        let mut snapshot: Snapshot = serde_json::from_slice(&content)?;
        snapshot.assign_id(id);
        snapshot.validate()?;

        Ok(snapshot)
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let parent = path.parent().ok_or_else(|| {
            StoreError::storage(format!("invalid manifest path {}", path.display()))
        })?;
        let temp_path = parent.join(Self::generate_temp_name());

        std::fs::write(&temp_path, content).map_err(|err| {
            StoreError::storage(format!(
                "unable to write manifest file {}: {}",
                temp_path.display(),
                err
            ))
        })?;

        std::fs::rename(&temp_path, path).map_err(|err| {
            StoreError::storage(format!(
                "unable to rename manifest file to {}: {}",
                path.display(),
                err
            ))
        })?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-manifest-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::snapshot::digest::Digest;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    fn entry(path: &str, content: &[u8]) -> FileEntry {
        FileEntry::new(
            path.to_string(),
            Digest::of_bytes(content),
            content.len() as u64,
        )
    }

    #[fixture]
    fn store() -> (TempDir, ManifestStore) {
        let dir = TempDir::new().unwrap();
        let keep = dir.path().join(".keep");
        std::fs::create_dir_all(keep.join(MANIFESTS_DIR)).unwrap();
        let store = ManifestStore::new(keep.into_boxed_path());
        (dir, store)
    }

    #[rstest]
    fn create_then_get_round_trips(store: (TempDir, ManifestStore)) {
        let (_dir, store) = store;

        let created = store
            .create(vec![entry("a.txt", b"alpha")], "first snapshot")
            .unwrap();
        let loaded = store.get(created.id()).unwrap();

        assert_eq!(loaded.id(), created.id());
        assert_eq!(loaded.fingerprint(), created.fingerprint());
        assert_eq!(loaded.message(), "first snapshot");
        assert_eq!(loaded.entries(), created.entries());
    }

    #[rstest]
    fn create_advances_head(store: (TempDir, ManifestStore)) {
        let (_dir, store) = store;

        assert_eq!(store.head_fingerprint().unwrap(), None);

        let created = store.create(vec![entry("a.txt", b"alpha")], "").unwrap();

        assert_eq!(
            store.head_fingerprint().unwrap().as_ref(),
            Some(created.fingerprint())
        );
        assert_eq!(
            store.head().unwrap().map(|snapshot| snapshot.id().clone()),
            Some(created.id().clone())
        );
    }

    #[rstest]
    fn empty_head_file_means_no_snapshot(store: (TempDir, ManifestStore)) {
        let (_dir, store) = store;
        std::fs::write(store.head_path(), b"").unwrap();

        assert_eq!(store.head_fingerprint().unwrap(), None);
        assert!(store.head().unwrap().is_none());
    }

    #[rstest]
    fn missing_snapshot_is_a_not_found_error(store: (TempDir, ManifestStore)) {
        let (_dir, store) = store;

        let id = SnapshotId::compose(&Digest::of_bytes(b"ghost"), &chrono::Utc::now());
        let err = store.get(&id).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound {
                kind: "snapshot",
                ..
            })
        ));
    }

    #[rstest]
    fn update_message_leaves_the_rest_intact(store: (TempDir, ManifestStore)) {
        let (_dir, store) = store;
        let created = store
            .create(vec![entry("a.txt", b"alpha")], "before")
            .unwrap();

        let amended = store.update_message(created.id(), "after").unwrap();
        let reloaded = store.get(created.id()).unwrap();

        assert_eq!(amended.message(), "after");
        assert_eq!(reloaded.message(), "after");
        assert_eq!(reloaded.fingerprint(), created.fingerprint());
        assert_eq!(reloaded.created_at(), created.created_at());
        assert_eq!(reloaded.entries(), created.entries());
    }

    #[rstest]
    fn malformed_manifest_is_skipped_by_list_but_fails_get(store: (TempDir, ManifestStore)) {
        let (_dir, store) = store;
        let created = store.create(vec![entry("a.txt", b"alpha")], "").unwrap();

        let bogus_id = SnapshotId::compose(&Digest::of_bytes(b"bogus"), &chrono::Utc::now());
        let bogus_path = store.manifests_path().join(format!("{}.json", bogus_id));
        std::fs::write(&bogus_path, b"{ not json").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), created.id());

        let err = store.get(&bogus_id).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Repository(_))
        ));
    }

    #[rstest]
    fn unwritable_manifests_directory_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let keep = dir.path().join(".keep");
        std::fs::create_dir_all(&keep).unwrap();
        // a regular file where the manifests directory should be
        std::fs::write(keep.join(MANIFESTS_DIR), b"not a directory").unwrap();
        let store = ManifestStore::new(keep.into_boxed_path());

        let err = store
            .create(vec![entry("a.txt", b"alpha")], "")
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Storage(_))
        ));
    }
}
