#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub fn run_keep_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("keep").expect("Failed to find keep binary");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn init_store(dir: &Path) {
    run_keep_command(dir, &["init"]).assert().success();
}

/// Manifest files under `.keep/manifests`, oldest first
pub fn manifest_paths(dir: &Path) -> Vec<PathBuf> {
    let mut paths = std::fs::read_dir(dir.join(".keep/manifests"))
        .expect("Failed to read manifests directory")
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|extension| extension == "json"))
        .collect::<Vec<_>>();

    // created_at is RFC 3339, so it sorts lexicographically
    paths.sort_by_key(|path| {
        let manifest = read_manifest(path);
        (
            manifest["created_at"].as_str().unwrap().to_string(),
            path.clone(),
        )
    });
    paths
}

pub fn read_manifest(path: &Path) -> Value {
    let content = std::fs::read(path).expect("Failed to read manifest file");
    serde_json::from_slice(&content).expect("Failed to parse manifest file")
}

pub fn manifest_count(dir: &Path) -> usize {
    manifest_paths(dir).len()
}

/// Snapshot ids (manifest file stems), oldest first
pub fn snapshot_ids(dir: &Path) -> Vec<String> {
    manifest_paths(dir)
        .iter()
        .map(|path| path.file_stem().unwrap().to_string_lossy().to_string())
        .collect()
}

pub fn latest_snapshot_id(dir: &Path) -> String {
    snapshot_ids(dir)
        .pop()
        .expect("No snapshot recorded yet")
}

pub fn head_fingerprint(dir: &Path) -> String {
    std::fs::read_to_string(dir.join(".keep/HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}

pub fn blob_names(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir.join(".keep/blobs"))
        .expect("Failed to read blobs directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}
