use crate::areas::repository::Repository;
use crate::artifacts::snapshot::SnapshotId;
use std::io::Write;

impl Repository {
    /// `keep amend <id> -m MSG`: rewrite a snapshot's message, nothing else
    pub fn amend(&self, id: &SnapshotId, message: &str) -> anyhow::Result<()> {
        self.require_store()?;

        let snapshot = self.manifests().update_message(id, message)?;

        writeln!(
            self.writer(),
            "Amended message for snapshot {}",
            snapshot.id()
        )?;

        Ok(())
    }
}
