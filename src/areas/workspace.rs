//! Workspace scanning
//!
//! The workspace is the tracked directory itself. Scanning walks it
//! recursively, skipping the `.keep` store, and produces one entry per
//! regular file: a `/`-separated relative path, the file bytes and their
//! digest. Files that vanish or fail to read mid-scan are skipped with a
//! warning instead of aborting the whole snapshot.

use crate::areas::repository::STORE_DIR;
use crate::artifacts::core::StoreError;
use crate::artifacts::snapshot::digest::Digest;
use bytes::Bytes;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, new)]
pub struct Workspace {
    /// Path to the tracked root
    path: Box<Path>,
}

/// One readable file found during a scan
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: String,
    pub data: Bytes,
    pub hash: Digest,
    pub size: u64,
}

/// A file that could not be read and was left out of the snapshot
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub path: String,
    pub reason: String,
}

impl Workspace {
    pub fn root(&self) -> &Path {
        &self.path
    }

    /// Walk the tracked root and collect every readable regular file
    ///
    /// Returns the files sorted by relative path, plus one warning per
    /// skipped file. The `.keep` store is never scanned.
    pub fn scan(&self) -> anyhow::Result<(Vec<ScannedFile>, Vec<ScanWarning>)> {
        if !self.path.is_dir() {
            return Err(StoreError::repository(format!(
                "tracked root {} is not a directory",
                self.path.display()
            ))
            .into());
        }

        let mut files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.path)
            .into_iter()
            .filter_entry(|entry| entry.file_name() != std::ffi::OsStr::new(STORE_DIR));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warnings.push(ScanWarning {
                        path: err
                            .path()
                            .map(|path| self.relative_path(path))
                            .unwrap_or_default(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            // symlinks to directories are not tracked either
            if file_type.is_symlink() && entry.path().is_dir() {
                continue;
            }

            let path = self.relative_path(entry.path());
            match std::fs::read(entry.path()) {
                Ok(data) => {
                    let hash = Digest::of_bytes(&data);
                    let size = data.len() as u64;
                    files.push(ScannedFile {
                        path,
                        data: data.into(),
                        hash,
                        size,
                    });
                }
                Err(err) => warnings.push(ScanWarning {
                    path,
                    reason: err.to_string(),
                }),
            }
        }

        files.sort_by(|left, right| left.path.cmp(&right.path));

        Ok((files, warnings))
    }

    /// Relative `/`-separated form of an absolute path inside the root
    fn relative_path(&self, path: &Path) -> String {
        path.strip_prefix(self.path.as_ref())
            .unwrap_or(path)
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}
