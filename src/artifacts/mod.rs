//! Snapshot data structures and algorithms
//!
//! This module contains the core types and algorithms of the store:
//!
//! - `core`: Shared error taxonomy
//! - `snapshot`: Snapshot records, file entries, digests and fingerprints
//! - `diff`: Snapshot comparison and line diffing (Myers' diff)
//! - `watch`: Filesystem event debouncing and the change watcher

pub mod core;
pub mod diff;
pub mod snapshot;
pub mod watch;
