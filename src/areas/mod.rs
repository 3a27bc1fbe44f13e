//! Storage areas of the snapshot store
//!
//! - `workspace`: The tracked directory itself; scanning it into entries
//! - `blob_store`: Content-addressed blob storage under `.keep/blobs`
//! - `manifest_store`: Manifests and HEAD under `.keep`
//! - `repository`: Facade wiring the areas together

pub mod blob_store;
pub mod manifest_store;
pub mod repository;
pub mod workspace;
