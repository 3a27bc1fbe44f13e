use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// `keep log`: every snapshot, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        self.require_store()?;

        let snapshots = self.manifests().list()?;

        for snapshot in snapshots.iter().rev() {
            writeln!(
                self.writer(),
                "{}",
                format!("snapshot {}", snapshot.id()).yellow()
            )?;
            writeln!(
                self.writer(),
                "Date:   {}",
                snapshot.created_at().to_rfc2822()
            )?;
            writeln!(self.writer())?;
            for message_line in snapshot.message().lines() {
                writeln!(self.writer(), "    {}", message_line)?;
            }
            writeln!(self.writer())?;
        }

        Ok(())
    }
}
