//! Snapshot records and fingerprints
//!
//! A snapshot (manifest) is an immutable record of one directory state:
//! an aggregate fingerprint, a creation timestamp, a user message and one
//! entry per tracked file. Only the message may change after creation.
//!
//! - `digest`: Content digests (SHA-1) for blobs and fingerprints
//! - `fingerprint`: Order-independent whole-tree fingerprinting

pub mod digest;
pub mod fingerprint;

use crate::artifacts::snapshot::digest::Digest;
use chrono::{DateTime, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Timestamp suffix used in snapshot identifiers and manifest file names.
const ID_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Message recorded when the change watcher triggers a snapshot.
pub const AUTO_SNAPSHOT_MESSAGE: &str = "Auto snapshot";

/// Message recorded for the snapshot taken right after `init`.
pub const INITIAL_SNAPSHOT_MESSAGE: &str = "Initial snapshot";

/// Snapshot identifier: `<fingerprint>-<creation timestamp>`
///
/// The fingerprint alone is only unique against the current HEAD; the
/// timestamp suffix disambiguates snapshots that share a fingerprint at
/// different points in time. The identifier doubles as the manifest file
/// stem under `.keep/manifests/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SnapshotId(String);

impl SnapshotId {
    pub fn compose(fingerprint: &Digest, created_at: &DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}",
            fingerprint,
            created_at.format(ID_TIMESTAMP_FORMAT)
        ))
    }

    /// Parse and validate a snapshot id from a string
    pub fn try_parse(raw: String) -> anyhow::Result<Self> {
        let (fingerprint, timestamp) = raw
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid snapshot id: {}", raw))?;

        Digest::try_parse(fingerprint.to_string())?;
        if timestamp.is_empty() || !timestamp.chars().all(|c| c.is_ascii_alphanumeric()) {
            anyhow::bail!("Invalid snapshot id timestamp: {}", raw);
        }

        Ok(Self(raw))
    }

    /// The fingerprint component of the id
    pub fn fingerprint(&self) -> Digest {
        // Validated at construction, the prefix is always a digest
        let (fingerprint, _) = self.0.split_once('-').unwrap_or((&self.0, ""));
        Digest::try_parse(fingerprint.to_string()).unwrap_or_else(|_| Digest::zero())
    }

    /// Abbreviated form for user-facing output
    pub fn to_short(&self) -> String {
        self.0.chars().take(7).collect()
    }
}

impl AsRef<str> for SnapshotId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One tracked file within a snapshot
///
/// `path` is a `/`-separated path relative to the tracked root, unique
/// within a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct FileEntry {
    pub path: String,
    pub hash: Digest,
    pub size: u64,
}

/// Snapshot manifest
///
/// Immutable once created, except for `message` which is user-editable
/// post-creation. Persisted as pretty-printed JSON under
/// `.keep/manifests/<id>.json`; the id itself is derived state and not
/// serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(skip)]
    id: SnapshotId,
    fingerprint: Digest,
    created_at: DateTime<Utc>,
    message: String,
    entries: Vec<FileEntry>,
}

impl Snapshot {
    /// Build a new snapshot record from scanned entries
    ///
    /// Sorts entries by path, computes the aggregate fingerprint and stamps
    /// the record with the current time.
    pub fn create(mut entries: Vec<FileEntry>, message: &str) -> Self {
        entries.sort_by(|left, right| left.path.cmp(&right.path));
        let fingerprint = fingerprint::fingerprint(&entries);
        let created_at = Utc::now();
        let id = SnapshotId::compose(&fingerprint, &created_at);

        Self {
            id,
            fingerprint,
            created_at,
            message: message.to_string(),
            entries,
        }
    }

    pub fn id(&self) -> &SnapshotId {
        &self.id
    }

    pub fn fingerprint(&self) -> &Digest {
        &self.fingerprint
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn entry_for(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.path == path)
    }

    pub(crate) fn assign_id(&mut self, id: SnapshotId) {
        self.id = id;
    }

    pub(crate) fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    /// Validate a manifest loaded from disk
    ///
    /// Checks path uniqueness and that the recorded fingerprint matches the
    /// identifier it was filed under.
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.path.as_str()) {
                anyhow::bail!("duplicate entry for path {}", entry.path);
            }
        }

        if self.id.fingerprint() != self.fingerprint {
            anyhow::bail!(
                "manifest {} records fingerprint {}",
                self.id,
                self.fingerprint
            );
        }

        Ok(())
    }
}

/// Result of a snapshot request
///
/// `Unchanged` is the no-op signal: the tree fingerprints the same as the
/// current HEAD, so no manifest and no blobs were written. It is distinct
/// from failure so callers can tell "nothing to do" from "failed".
#[derive(Debug, Clone)]
pub enum SnapshotOutcome {
    Created(Snapshot),
    Unchanged { fingerprint: Digest },
}
