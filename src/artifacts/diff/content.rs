//! Text/binary classification of blob contents
//!
//! Line diffs only make sense for text; binary blobs get a one-line
//! notice instead. A blob is binary when it contains a null byte or is
//! not valid UTF-8.

/// Blob content prepared for diffing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Lines without trailing newlines, ready for the line differ
    Text(Vec<String>),
    Binary,
}

impl ContentKind {
    pub fn classify(data: &[u8]) -> Self {
        if data.contains(&0) {
            return Self::Binary;
        }

        match std::str::from_utf8(data) {
            Ok(text) => Self::Text(text.lines().map(str::to_string).collect()),
            Err(_) => Self::Binary,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary)
    }
}
