//! File-based snapshot store with full-replace semantics.
//!
//! Each host has exactly one snapshot: the result of its most recent scan.
//! Storing a new result replaces the previous one wholesale; records are
//! never merged across scans.
//!
//! # Store Location
//!
//! Snapshots are stored in platform-specific directories:
//! - Linux: `~/.local/share/software-audit/snapshots/`
//! - macOS: `~/Library/Application Support/software-audit/snapshots/`
//! - Windows: `%LOCALAPPDATA%\software-audit\snapshots\`
//!
//! # Example
//!
//! ```no_run
//! use software_audit::{OsFamily, PackageRecord, ScanResult, SnapshotStore};
//!
//! let store = SnapshotStore::new();
//! let result = ScanResult::new("build-01", OsFamily::Debian, vec![PackageRecord::new("curl", "7.88.1")]);
//!
//! store.replace(&result).unwrap();
//!
//! let stored = store.load("build-01").unwrap();
//! assert_eq!(stored.records.len(), 1);
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::model::ScanResult;
use crate::platform::snapshot_dir;

/// One JSON snapshot per host.
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store in the default data directory.
    pub fn new() -> Self {
        Self {
            dir: snapshot_dir(),
        }
    }

    /// Creates a store rooted at `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ensures the store directory exists.
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("Failed to create snapshot directory {:?}", self.dir))?;
        }
        Ok(())
    }

    /// Converts a host name to a safe filename.
    fn snapshot_path(&self, host: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_file_stem(host)))
    }

    /// Replaces the stored snapshot for `result.host` with `result`.
    ///
    /// The new snapshot is written beside the old one and renamed over it,
    /// so a reader sees either the previous scan or this one.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn replace(&self, result: &ScanResult) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.snapshot_path(&result.host);
        let tmp = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(result)?;
        fs::write(&tmp, content).with_context(|| format!("Failed to write {:?}", tmp))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to replace {:?}", path))?;

        debug!(host = result.host.as_str(), path = %path.display(), "snapshot replaced");
        Ok(path)
    }

    /// Loads the latest snapshot for `host`, if one exists and is readable.
    pub fn load(&self, host: &str) -> Option<ScanResult> {
        let content = fs::read_to_string(self.snapshot_path(host)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Lists the hosts that have a snapshot, sorted.
    pub fn hosts(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut hosts = Vec::new();
        for entry in fs::read_dir(&self.dir)?.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(result) = fs::read_to_string(&path)
                    .ok()
                    .and_then(|c| serde_json::from_str::<ScanResult>(&c).ok())
                {
                    hosts.push(result.host);
                }
            }
        }
        hosts.sort();
        Ok(hosts)
    }

    /// Removes every stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directory cannot be read.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            for entry in fs::read_dir(&self.dir)?.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    let _ = fs::remove_file(path);
                }
            }
        }
        Ok(())
    }
}

/// Percent-encodes every byte outside `[A-Za-z0-9._-]`.
///
/// Distinct host names always map to distinct stems, and no stem contains a
/// path separator. A leading `.` is encoded too so `..` cannot escape.
fn encode_file_stem(host: &str) -> String {
    let mut stem = String::with_capacity(host.len());
    for (i, byte) in host.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric()
            || byte == b'-'
            || byte == b'_'
            || (byte == b'.' && i > 0);
        if keep {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
