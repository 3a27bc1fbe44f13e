use crate::areas::repository::Repository;
use crate::artifacts::snapshot::digest::Digest;
use std::io::Write;

impl Repository {
    /// `keep cat-blob <digest>`: raw blob bytes on the writer
    pub fn cat_blob(&self, digest: &Digest) -> anyhow::Result<()> {
        self.require_store()?;

        let data = self.blobs().get(digest)?;
        self.writer().write_all(&data)?;

        Ok(())
    }
}
