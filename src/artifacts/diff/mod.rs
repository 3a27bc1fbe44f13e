//! Diffing between snapshots
//!
//! - `myers`: Myers' line diff and unified-diff hunk grouping
//! - `content`: Text/binary classification of blob contents
//! - `report`: Path-level change report between two manifests
//! - `diff_target`: One side of a file-level diff

pub mod content;
pub mod diff_target;
pub mod myers;
pub mod report;
