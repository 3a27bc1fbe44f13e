//! Content-addressed blob storage
//!
//! Blobs live under `.keep/blobs/<digest>`, one file per unique content.
//! Identical content across files or snapshots is stored once. Writes go
//! to a temp file first and are renamed into place, so a crashed write
//! never leaves a partial blob under its final name.

use crate::artifacts::core::StoreError;
use crate::artifacts::snapshot::digest::Digest;
use bytes::Bytes;
use derive_new::new;
use fake::rand;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, new)]
pub struct BlobStore {
    /// Path to the blobs directory (typically `.keep/blobs`)
    path: Box<Path>,
}

impl BlobStore {
    pub fn blobs_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, digest: &Digest) -> bool {
        self.blob_path(digest).exists()
    }

    /// Store a byte buffer, returning its digest
    ///
    /// A blob whose digest already exists is not rewritten.
    pub fn put(&self, data: &[u8]) -> anyhow::Result<Digest> {
        let digest = Digest::of_bytes(data);
        let blob_path = self.blob_path(&digest);

        if !blob_path.exists() {
            self.write_blob(blob_path, data)?;
        }

        Ok(digest)
    }

    /// Read a blob back by digest
    pub fn get(&self, digest: &Digest) -> anyhow::Result<Bytes> {
        let blob_path = self.blob_path(digest);

        if !blob_path.exists() {
            return Err(StoreError::not_found("blob", digest.as_ref()).into());
        }

        std::fs::read(&blob_path)
            .map(Bytes::from)
            .map_err(|err| {
                StoreError::storage(format!(
                    "unable to read blob {}: {}",
                    blob_path.display(),
                    err
                ))
                .into()
            })
    }

    fn blob_path(&self, digest: &Digest) -> PathBuf {
        self.path.join(digest.as_ref())
    }

    fn write_blob(&self, blob_path: PathBuf, data: &[u8]) -> anyhow::Result<()> {
        let temp_path = self.path.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|err| {
                StoreError::storage(format!(
                    "unable to open blob file {}: {}",
                    temp_path.display(),
                    err
                ))
            })?;

        file.write_all(data).map_err(|err| {
            StoreError::storage(format!(
                "unable to write blob file {}: {}",
                temp_path.display(),
                err
            ))
        })?;

        // rename the temp file to its digest name to make the write atomic
        std::fs::rename(&temp_path, &blob_path).map_err(|err| {
            StoreError::storage(format!(
                "unable to rename blob file to {}: {}",
                blob_path.display(),
                err
            ))
        })?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-blob-{}", rand::random::<u32>())
    }
}
