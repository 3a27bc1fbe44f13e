//! User-facing commands
//!
//! Each command is an `impl Repository` block writing its output through
//! the repository's injected writer.

pub mod amend;
pub mod diff;
pub mod init;
pub mod log;
pub mod show;
pub mod snapshot;
pub mod watch;
