//! `keep` — a directory-scoped snapshot store.
//!
//! Records point-in-time states of a file tree as content-addressed blobs
//! plus JSON manifests, detects no-op snapshots via an order-independent
//! fingerprint, debounces filesystem events into automatic snapshots, and
//! diffs any two snapshots down to per-file unified text diffs.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
