use crate::areas::repository::Repository;
use crate::artifacts::core::StoreError;
use crate::artifacts::diff::content::ContentKind;
use crate::artifacts::diff::diff_target::DiffTarget;
use crate::artifacts::diff::myers::{Edit, Hunk, MyersDiff};
use crate::artifacts::diff::report::DiffReport;
use crate::artifacts::snapshot::{Snapshot, SnapshotId};
use colored::Colorize;
use std::io::Write;

/// Content-level diff of one path between two snapshots
#[derive(Debug, Clone)]
pub enum FileDiff {
    Text(Vec<Hunk<String>>),
    Binary,
}

impl Repository {
    /// Path-level report of what changed between two snapshots
    pub fn diff_snapshots(&self, a: &SnapshotId, b: &SnapshotId) -> anyhow::Result<DiffReport> {
        self.require_store()?;

        let a = self.manifests().get(a)?;
        let b = self.manifests().get(b)?;

        Ok(DiffReport::between(&a, &b))
    }

    /// Unified diff of one path between two snapshots
    ///
    /// A side where the path is absent diffs as empty; a path absent from
    /// both snapshots is a `NotFound` error.
    pub fn unified_diff(
        &self,
        a: &SnapshotId,
        b: &SnapshotId,
        path: &str,
    ) -> anyhow::Result<FileDiff> {
        self.require_store()?;

        let a = self.manifests().get(a)?;
        let b = self.manifests().get(b)?;
        let (a_target, b_target) = self.load_targets(&a, &b, path)?;

        Ok(Self::diff_targets(&a_target, &b_target))
    }

    /// `keep diff <a> <b> [--path P]`
    pub fn diff(
        &self,
        a: &SnapshotId,
        b: &SnapshotId,
        path_filter: Option<&str>,
    ) -> anyhow::Result<()> {
        self.require_store()?;

        let a = self.manifests().get(a)?;
        let b = self.manifests().get(b)?;

        if let Some(path) = path_filter {
            return self.print_file_diff(&a, &b, path);
        }

        let report = DiffReport::between(&a, &b);
        self.print_summary(&report)?;
        for path in report.changed_paths() {
            self.print_file_diff(&a, &b, path)?;
        }

        Ok(())
    }

    fn print_summary(&self, report: &DiffReport) -> anyhow::Result<()> {
        for path in &report.added {
            writeln!(self.writer(), "{}", format!("added:    {}", path).green())?;
        }
        for path in &report.removed {
            writeln!(self.writer(), "{}", format!("removed:  {}", path).red())?;
        }
        for path in &report.modified {
            writeln!(
                self.writer(),
                "{}",
                format!("modified: {}", path).yellow()
            )?;
        }

        if !report.is_clean() {
            writeln!(self.writer())?;
        }

        Ok(())
    }

    fn print_file_diff(&self, a: &Snapshot, b: &Snapshot, path: &str) -> anyhow::Result<()> {
        let (a_target, b_target) = self.load_targets(a, b, path)?;

        writeln!(
            self.writer(),
            "{}",
            format!("diff --keep a/{} b/{}", path, path).bold()
        )?;
        writeln!(
            self.writer(),
            "index {}..{}",
            a_target.hash().to_short(),
            b_target.hash().to_short()
        )?;

        match Self::diff_targets(&a_target, &b_target) {
            FileDiff::Binary => {
                writeln!(
                    self.writer(),
                    "Binary files a/{} and b/{} differ",
                    path,
                    path
                )?;
            }
            FileDiff::Text(hunks) => {
                writeln!(self.writer(), "--- {}", a_target.diff_path("a"))?;
                writeln!(self.writer(), "+++ {}", b_target.diff_path("b"))?;

                for hunk in hunks {
                    writeln!(self.writer(), "{}", hunk.header().cyan())?;
                    for edit in hunk.edits() {
                        let line = match edit {
                            Edit::Delete { .. } => edit.as_string().red(),
                            Edit::Insert { .. } => edit.as_string().green(),
                            Edit::Equal { .. } => edit.as_string().normal(),
                        };
                        writeln!(self.writer(), "{}", line)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn load_targets(
        &self,
        a: &Snapshot,
        b: &Snapshot,
        path: &str,
    ) -> anyhow::Result<(DiffTarget, DiffTarget)> {
        let a_entry = a.entry_for(path);
        let b_entry = b.entry_for(path);

        if a_entry.is_none() && b_entry.is_none() {
            return Err(StoreError::not_found("path", path).into());
        }

        let a_target = match a_entry {
            Some(entry) => DiffTarget::from_entry(entry, self.blobs())?,
            None => DiffTarget::from_nothing(path),
        };
        let b_target = match b_entry {
            Some(entry) => DiffTarget::from_entry(entry, self.blobs())?,
            None => DiffTarget::from_nothing(path),
        };

        Ok((a_target, b_target))
    }

    fn diff_targets(a: &DiffTarget, b: &DiffTarget) -> FileDiff {
        match (a.content(), b.content()) {
            (ContentKind::Text(a_lines), ContentKind::Text(b_lines)) => {
                FileDiff::Text(MyersDiff::new(a_lines, b_lines).flatten_diff())
            }
            _ => FileDiff::Binary,
        }
    }
}
