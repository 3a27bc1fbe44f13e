//! Repository facade
//!
//! Wires the workspace, blob store and manifest store together for one
//! tracked root, and owns the output writer the commands print to.
//!
//! ## Store layout
//!
//! ```text
//! <root>/.keep/
//!   blobs/       content-addressed blobs, one file per digest
//!   manifests/   <fingerprint>-<timestamp>.json snapshot records
//!   HEAD         fingerprint of the latest snapshot (may be empty)
//!   LOCK         lock file serializing snapshot writers
//! ```

use crate::areas::blob_store::BlobStore;
use crate::areas::manifest_store::ManifestStore;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::StoreError;
use anyhow::Context;
use std::cell::{RefCell, RefMut};
use std::io::Write;
use std::path::Path;

/// Name of the store directory inside the tracked root
pub const STORE_DIR: &str = ".keep";

/// Name of the blobs directory inside the store
pub const BLOBS_DIR: &str = "blobs";

/// Name of the lock file serializing snapshot writers
pub const LOCK_FILE: &str = "LOCK";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn Write + Send>>,
    workspace: Workspace,
    blobs: BlobStore,
    manifests: ManifestStore,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn Write + Send>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path)
                .with_context(|| format!("failed to create tracked root at {:?}", path))?;
        }
        let path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve tracked root at {:?}", path))?
            .into_boxed_path();

        Ok(Repository {
            workspace: Workspace::new(path.clone()),
            blobs: BlobStore::new(path.join(STORE_DIR).join(BLOBS_DIR).into_boxed_path()),
            manifests: ManifestStore::new(path.join(STORE_DIR).into_boxed_path()),
            writer: RefCell::new(writer),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_path(&self) -> Box<Path> {
        self.path.join(STORE_DIR).into_boxed_path()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write + Send>> {
        self.writer.borrow_mut()
    }

    pub fn exists(&self) -> bool {
        self.store_path().is_dir()
    }

    pub(crate) fn require_store(&self) -> anyhow::Result<()> {
        if !self.exists() {
            return Err(StoreError::repository(format!(
                "no snapshot store found in {}; run `keep init` first",
                self.path.display()
            ))
            .into());
        }

        Ok(())
    }

    /// Open the LOCK file for `file_guard` locking
    pub(crate) fn open_lock_file(&self) -> anyhow::Result<std::fs::File> {
        let lock_path = self.store_path().join(LOCK_FILE);

        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file at {:?}", lock_path))
    }
}
