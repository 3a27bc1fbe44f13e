use crate::areas::repository::Repository;
use crate::artifacts::snapshot::fingerprint::fingerprint;
use crate::artifacts::snapshot::{FileEntry, SnapshotOutcome};
use file_guard::Lock;
use std::io::Write;

impl Repository {
    /// Take a snapshot of the tracked root
    ///
    /// Scans the tree, skips unreadable files with a warning, and compares
    /// the resulting fingerprint against HEAD. An unchanged tree is a no-op
    /// and returns [`SnapshotOutcome::Unchanged`] without touching the
    /// store. Otherwise missing blobs are written first, then the manifest,
    /// then HEAD, so a reader never sees a manifest referencing a missing
    /// blob.
    ///
    /// # Locking
    ///
    /// Holds an exclusive lock on `.keep/LOCK` for the whole
    /// scan-to-HEAD-update sequence. The foreground command, the watcher
    /// and other processes all funnel through it, so at most one snapshot
    /// runs at a time; a second request blocks until the first completes.
    pub fn take_snapshot(&self, message: Option<&str>) -> anyhow::Result<SnapshotOutcome> {
        self.require_store()?;

        let mut lock_file = self.open_lock_file()?;
        let _lock = file_guard::lock(&mut lock_file, Lock::Exclusive, 0, 1)?;

        let (files, warnings) = self.workspace().scan()?;
        for warning in &warnings {
            tracing::warn!(path = %warning.path, reason = %warning.reason, "skipping unreadable file");
        }

        let entries = files
            .iter()
            .map(|file| FileEntry::new(file.path.clone(), file.hash.clone(), file.size))
            .collect::<Vec<_>>();
        let tree_fingerprint = fingerprint(&entries);

        if self.manifests().head_fingerprint()?.as_ref() == Some(&tree_fingerprint) {
            return Ok(SnapshotOutcome::Unchanged {
                fingerprint: tree_fingerprint,
            });
        }

        for file in &files {
            if !self.blobs().contains(&file.hash) {
                self.blobs().put(&file.data)?;
            }
        }

        let snapshot = self
            .manifests()
            .create(entries, message.unwrap_or_default())?;

        Ok(SnapshotOutcome::Created(snapshot))
    }

    /// `keep snapshot [-m MSG]`
    pub fn snapshot(&self, message: Option<&str>) -> anyhow::Result<()> {
        match self.take_snapshot(message)? {
            SnapshotOutcome::Created(snapshot) => {
                writeln!(
                    self.writer(),
                    "[{}] {}",
                    snapshot.id().to_short(),
                    snapshot.message()
                )?;
            }
            SnapshotOutcome::Unchanged { .. } => {
                writeln!(self.writer(), "Nothing to snapshot (tree unchanged)")?;
            }
        }

        Ok(())
    }
}
