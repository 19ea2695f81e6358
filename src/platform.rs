//! Operating system identification and platform paths.
//!
//! The running OS is resolved once per scan into an [`OsFamily`]. On Linux
//! the family comes from `/etc/os-release`; Windows and macOS are known at
//! compile time.

use crate::model::OsFamily;
use std::fs;
use std::path::PathBuf;

const OS_RELEASE: &str = "/etc/os-release";

const DEBIAN_IDS: &[&str] = &[
    "debian",
    "ubuntu",
    "linuxmint",
    "pop",
    "raspbian",
    "kali",
    "elementary",
];

const RHEL_IDS: &[&str] = &[
    "rhel",
    "fedora",
    "centos",
    "rocky",
    "almalinux",
    "ol",
    "amzn",
    "suse",
    "opensuse",
    "sles",
];

impl OsFamily {
    /// Detects the family of the running operating system.
    ///
    /// Unsupported systems and Linux hosts without a readable
    /// `/etc/os-release` resolve to [`OsFamily::Unknown`].
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            return OsFamily::Windows;
        }
        if cfg!(target_os = "macos") {
            return OsFamily::MacOS;
        }
        match fs::read_to_string(OS_RELEASE) {
            Ok(content) => parse_os_release(&content),
            Err(_) => OsFamily::Unknown,
        }
    }
}

/// Classifies the contents of an `os-release` file.
///
/// `ID` is checked first, then every token of `ID_LIKE`.
pub fn parse_os_release(content: &str) -> OsFamily {
    let mut id = None;
    let mut id_like = None;

    for line in content.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("ID=") {
            id = Some(unquote(value).to_lowercase());
        } else if let Some(value) = line.strip_prefix("ID_LIKE=") {
            id_like = Some(unquote(value).to_lowercase());
        }
    }

    let candidates = id
        .iter()
        .map(String::as_str)
        .chain(id_like.iter().flat_map(|like| like.split_whitespace()));

    for candidate in candidates {
        if DEBIAN_IDS.contains(&candidate) {
            return OsFamily::Debian;
        }
        if RHEL_IDS.contains(&candidate) || candidate.starts_with("opensuse") {
            return OsFamily::Rhel;
        }
    }

    OsFamily::Unknown
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"').trim_matches('\'')
}

/// Returns the directory holding per-host inventory snapshots.
///
/// Platform-specific locations:
/// - Linux: `~/.local/share/software-audit/snapshots/`
/// - macOS: `~/Library/Application Support/software-audit/snapshots/`
/// - Windows: `%LOCALAPPDATA%\software-audit\snapshots\`
///
/// Falls back to `./software-audit/snapshots/` if no data directory can be determined.
pub fn snapshot_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("software-audit")
        .join("snapshots")
}

/// Returns the default path of the inventory database.
///
/// Lives next to the snapshot directory, e.g.
/// `~/.local/share/software-audit/software_audit.sqlite` on Linux.
pub fn database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("software-audit")
        .join("software_audit.sqlite")
}
