//! Filesystem watching and auto snapshots
//!
//! - `debounce`: Deadline state machine coalescing event bursts
//! - `watcher`: notify-driven watcher feeding the debounce task

pub mod debounce;
pub mod watcher;

pub use debounce::Debounce;
pub use watcher::{ChangeWatcher, DEFAULT_QUIET_PERIOD};
