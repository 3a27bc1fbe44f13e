use crate::areas::repository::Repository;
use crate::artifacts::snapshot::SnapshotId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// `keep show <id>`: one snapshot's header and entry listing
    pub fn show(&self, id: &SnapshotId) -> anyhow::Result<()> {
        self.require_store()?;

        let snapshot = self.manifests().get(id)?;

        writeln!(
            self.writer(),
            "{}",
            format!("snapshot {}", snapshot.id()).yellow()
        )?;
        writeln!(self.writer(), "Fingerprint: {}", snapshot.fingerprint())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            snapshot.created_at().to_rfc2822()
        )?;
        if !snapshot.message().is_empty() {
            writeln!(self.writer())?;
            for message_line in snapshot.message().lines() {
                writeln!(self.writer(), "    {}", message_line)?;
            }
        }
        writeln!(self.writer())?;

        for entry in snapshot.entries() {
            writeln!(
                self.writer(),
                "{} {:>8} {}",
                entry.hash,
                entry.size,
                entry.path
            )?;
        }

        Ok(())
    }
}
