//! Content digest (SHA-1 hash)
//!
//! Digests are 40-character hexadecimal strings identifying blob contents
//! and whole-tree fingerprints. Hash collisions are treated as equality;
//! their probability is adjacent to zero and the engine does not
//! special-case them.
//!
//! ## Storage
//!
//! Blobs are stored as `.keep/blobs/<digest>`, one file per unique digest.

use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};

/// Length of a digest in hexadecimal characters.
pub const DIGEST_LENGTH: usize = 40;

const ZERO_DIGEST_RAW: &str = "0000000000000000000000000000000000000000";

/// Content digest (SHA-1 hash)
///
/// A validated 40-character lowercase hexadecimal string. Serialized in
/// manifests as a plain JSON string and re-validated on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Parse and validate a digest from a string
    ///
    /// # Returns
    ///
    /// Validated digest or error if invalid length/characters
    pub fn try_parse(raw: String) -> anyhow::Result<Self> {
        if raw.len() != DIGEST_LENGTH {
            return Err(anyhow::anyhow!("Invalid digest length: {}", raw.len()));
        }
        if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid digest characters: {}", raw));
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Hash a byte buffer into a digest
    ///
    /// Pure function of the content; the same bytes always produce the same
    /// digest.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// The all-zero digest, used for the absent side of a diff
    pub fn zero() -> Self {
        Self(ZERO_DIGEST_RAW.to_string())
    }

    /// Get abbreviated form of the digest
    ///
    /// # Returns
    ///
    /// First 7 characters of the hash
    pub fn to_short(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Digest {
    type Error = anyhow::Error;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::try_parse(raw)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}
