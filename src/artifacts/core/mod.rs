//! Core utilities and shared types
//!
//! This module contains the error taxonomy shared across the storage areas.

use thiserror::Error;

/// Errors raised by the storage areas.
///
/// Commands propagate these through `anyhow`, so callers that need to
/// distinguish the categories can downcast. A no-op snapshot is *not* an
/// error; it is reported as [`SnapshotOutcome::Unchanged`].
///
/// [`SnapshotOutcome::Unchanged`]: crate::artifacts::snapshot::SnapshotOutcome
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tracked root or the snapshot store itself is missing, unreadable
    /// or holds a malformed record. Fatal for the operation, recoverable for
    /// the process.
    #[error("repository error: {0}")]
    Repository(String),

    /// A blob, manifest or HEAD write failed mid-snapshot. The snapshot is
    /// aborted with no partial state committed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Lookup of a nonexistent snapshot id or blob digest.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl StoreError {
    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}
