use crate::areas::repository::Repository;
use crate::artifacts::watch::ChangeWatcher;
use anyhow::Context;
use std::io::Write;
use std::time::Duration;

impl Repository {
    /// `keep watch [--quiet-period SECS]`: auto-snapshot until Ctrl-C
    pub async fn watch(&self, quiet_period: Duration) -> anyhow::Result<()> {
        self.require_store()?;

        let watcher = ChangeWatcher::spawn(self.path(), quiet_period)?;
        writeln!(
            self.writer(),
            "Watching {} (quiet period {}s, Ctrl-C to stop)",
            self.path().display(),
            quiet_period.as_secs()
        )?;

        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl-C")?;

        watcher.stop().await;
        writeln!(self.writer(), "Stopped watching {}", self.path().display())?;

        Ok(())
    }
}
