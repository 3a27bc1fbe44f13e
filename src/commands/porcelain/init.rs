use crate::areas::repository::Repository;
use crate::artifacts::snapshot::INITIAL_SNAPSHOT_MESSAGE;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.exists() {
            writeln!(
                self.writer(),
                "Snapshot store already initialized in {}",
                self.path().display()
            )?;
            return Ok(());
        }

        fs::create_dir_all(self.blobs().blobs_path())
            .context("Failed to create .keep/blobs directory")?;

        fs::create_dir_all(self.manifests().manifests_path())
            .context("Failed to create .keep/manifests directory")?;

        fs::write(self.manifests().head_path(), b"")
            .context("Failed to create .keep/HEAD file")?;

        // record the state of the tree as it was at init time
        self.take_snapshot(Some(INITIAL_SNAPSHOT_MESSAGE))?;

        writeln!(
            self.writer(),
            "Initialized empty snapshot store in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
