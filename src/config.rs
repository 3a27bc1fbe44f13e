//! Optional store configuration
//!
//! A `.config.json` file at the tracked root tunes the watcher. Missing
//! file means defaults; unknown keys are ignored so the file can carry
//! settings for other tools.

use crate::artifacts::watch::DEFAULT_QUIET_PERIOD;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the config file at the tracked root
pub const CONFIG_FILE: &str = ".config.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Watcher quiet period in seconds; `None` means the built-in default
    pub quiet_period_secs: Option<u64>,
}

impl Config {
    /// Load the config from the tracked root, falling back to defaults
    /// when the file is absent
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read(&path)
            .with_context(|| format!("failed to read config file at {:?}", path))?;

        serde_json::from_slice(&content)
            .with_context(|| format!("malformed config file at {:?}", path))
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn missing_file_falls_back_to_defaults() {
        let root = TempDir::new().unwrap();

        let config = Config::load(root.path()).unwrap();

        assert_eq!(config.quiet_period(), DEFAULT_QUIET_PERIOD);
    }

    #[rstest]
    fn quiet_period_is_read_from_the_file() {
        let root = TempDir::new().unwrap();
        root.child(CONFIG_FILE)
            .write_str(r#"{"quiet_period_secs": 7}"#)
            .unwrap();

        let config = Config::load(root.path()).unwrap();

        assert_eq!(config.quiet_period(), Duration::from_secs(7));
    }

    #[rstest]
    fn unknown_keys_are_ignored() {
        let root = TempDir::new().unwrap();
        root.child(CONFIG_FILE)
            .write_str(r#"{"theme": "dark", "quiet_period_secs": 3}"#)
            .unwrap();

        let config = Config::load(root.path()).unwrap();

        assert_eq!(config.quiet_period(), Duration::from_secs(3));
    }

    #[rstest]
    fn malformed_file_is_an_error() {
        let root = TempDir::new().unwrap();
        root.child(CONFIG_FILE).write_str("{ not json").unwrap();

        assert!(Config::load(root.path()).is_err());
    }
}
