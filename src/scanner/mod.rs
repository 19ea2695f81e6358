//! Per-source package collectors.
//!
//! This module provides the [`Scanner`] trait, one implementation per
//! source, and the fixed collector set for each operating system family.
//!
//! # Available Scanners
//!
//! | Scanner | Source | Output format |
//! |---------|--------|---------------|
//! | [`RegistryScanner`] | Windows uninstall keys | Registry values |
//! | [`WingetScanner`] | `winget list` | JSON |
//! | [`DpkgScanner`] | `dpkg-query -W` | Tab-delimited |
//! | [`RpmScanner`] | `rpm -qa` | Tab-delimited |
//! | [`SnapScanner`] | `snap list` | Whitespace columns with header |
//! | [`FlatpakScanner`] | `flatpak list` | Tab-delimited |
//! | [`SystemProfilerScanner`] | `system_profiler` | JSON |
//! | [`HomebrewScanner`] | `brew list --versions` | Whitespace columns |
//!
//! # Example
//!
//! ```no_run
//! use software_audit::host::SystemHost;
//! use software_audit::scanner::{collect, collector_set};
//! use software_audit::OsFamily;
//!
//! #[tokio::main]
//! async fn main() {
//!     let host = SystemHost::new();
//!     for scanner in collector_set(OsFamily::detect()) {
//!         let records = collect(scanner.as_ref(), &host).await;
//!         println!("{}: {} packages", scanner.name(), records.len());
//!     }
//! }
//! ```

mod dpkg;
mod flatpak;
mod homebrew;
mod registry;
mod rpm;
mod snap;
mod system_profiler;
mod winget;

pub use dpkg::DpkgScanner;
pub use flatpak::FlatpakScanner;
pub use homebrew::HomebrewScanner;
pub use registry::RegistryScanner;
pub use rpm::RpmScanner;
pub use snap::SnapScanner;
pub use system_profiler::SystemProfilerScanner;
pub use winget::WingetScanner;

use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{OsFamily, PackageRecord, Source};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Trait for collecting installed packages from one source.
///
/// `scan` may fail; callers go through [`collect`], which turns any failure
/// into an empty result so one broken source never affects another.
#[async_trait]
pub trait Scanner: Send + Sync {
    /// Returns the human-readable name of this scanner.
    fn name(&self) -> &'static str;

    /// Returns the source this scanner reads.
    fn source(&self) -> Source;

    /// Returns true if the backing tool is present on `host`.
    ///
    /// The default probes for [`Source::program`] on `PATH`.
    fn is_available(&self, host: &dyn HostEnv) -> bool {
        match self.source().program() {
            Some(program) => host.has_program(program),
            None => false,
        }
    }

    /// Reads the source and returns its packages with `host` left empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool can't be run or its output can't be parsed.
    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError>;
}

/// Returns the ordered collectors for an OS family.
///
/// Unknown systems get every Linux collector; the ones whose tool is missing
/// contribute nothing.
///
/// # Example
///
/// ```
/// use software_audit::scanner::collector_set;
/// use software_audit::{OsFamily, Source};
///
/// let sources: Vec<Source> = collector_set(OsFamily::Debian)
///     .iter()
///     .map(|s| s.source())
///     .collect();
/// assert_eq!(sources, vec![Source::Dpkg, Source::Snap, Source::Flatpak]);
/// ```
pub fn collector_set(os: OsFamily) -> Vec<Box<dyn Scanner>> {
    match os {
        OsFamily::Windows => vec![Box::new(RegistryScanner), Box::new(WingetScanner)],
        OsFamily::Debian => vec![
            Box::new(DpkgScanner),
            Box::new(SnapScanner),
            Box::new(FlatpakScanner),
        ],
        OsFamily::Rhel => vec![Box::new(RpmScanner)],
        OsFamily::MacOS => vec![Box::new(SystemProfilerScanner), Box::new(HomebrewScanner)],
        OsFamily::Unknown => vec![
            Box::new(DpkgScanner),
            Box::new(RpmScanner),
            Box::new(SnapScanner),
            Box::new(FlatpakScanner),
        ],
    }
}

/// Returns the scanner for a specific source.
pub fn get_scanner(source: Source) -> Box<dyn Scanner> {
    match source {
        Source::WindowsRegistry => Box::new(RegistryScanner),
        Source::Winget => Box::new(WingetScanner),
        Source::Dpkg => Box::new(DpkgScanner),
        Source::Rpm => Box::new(RpmScanner),
        Source::Snap => Box::new(SnapScanner),
        Source::Flatpak => Box::new(FlatpakScanner),
        Source::SystemProfiler => Box::new(SystemProfilerScanner),
        Source::Homebrew => Box::new(HomebrewScanner),
    }
}

/// Runs one scanner, degrading every failure to an empty result.
pub async fn collect(scanner: &dyn Scanner, host: &dyn HostEnv) -> Vec<PackageRecord> {
    if !scanner.is_available(host) {
        debug!(source = scanner.source().as_str(), "source not available, skipping");
        return Vec::new();
    }

    match scanner.scan(host).await {
        Ok(records) => {
            debug!(
                source = scanner.source().as_str(),
                count = records.len(),
                "collected packages"
            );
            records
        }
        Err(err) => {
            debug!(source = scanner.source().as_str(), error = %err, "source failed, no packages collected");
            Vec::new()
        }
    }
}

/// Splits `output` into lines of exactly `fields` values separated by `sep`.
///
/// Blank lines are ignored. A line with any other field count is skipped
/// with a warning; the remaining lines are still returned.
pub fn split_delimited<'a>(
    source: Source,
    output: &'a str,
    sep: char,
    fields: usize,
) -> Vec<Vec<&'a str>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(sep).collect();
            if parts.len() == fields {
                Some(parts)
            } else {
                warn!(
                    source = source.as_str(),
                    expected = fields,
                    found = parts.len(),
                    line,
                    "skipping malformed line"
                );
                None
            }
        })
        .collect()
}

/// Splits a whitespace-aligned listing into `(name, version)` pairs.
///
/// With `skip_header` the first line is dropped. Lines with fewer than two
/// tokens are skipped.
pub fn split_columns(output: &str, skip_header: bool) -> Vec<(&str, &str)> {
    output
        .lines()
        .skip(usize::from(skip_header))
        .filter_map(|line| {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(name), Some(version)) => Some((name, version)),
                _ => None,
            }
        })
        .collect()
}
