//! Whole-host scans.
//!
//! [`Inventory`] picks the collector set for the OS family, runs each
//! collector in order, concatenates their records and stamps every record
//! with the host name.

use crate::host::HostEnv;
use crate::model::{OsFamily, PackageRecord, ScanResult};
use crate::scanner::{collect, collector_set, Scanner};
use tracing::info;

pub struct Inventory<H> {
    host: H,
}

impl<H: HostEnv> Inventory<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Scans the running system, detecting its OS family first.
    pub async fn detect_and_scan(&self) -> ScanResult {
        self.scan(OsFamily::detect()).await
    }

    /// Scans the host as an `os` system.
    ///
    /// Never fails: sources that are missing or broken contribute nothing.
    pub async fn scan(&self, os: OsFamily) -> ScanResult {
        self.scan_with(os, |_| {}).await
    }

    /// Like [`scan`](Self::scan), calling `on_source` before each collector runs.
    pub async fn scan_with<F>(&self, os: OsFamily, mut on_source: F) -> ScanResult
    where
        F: FnMut(&dyn Scanner),
    {
        let mut records = Vec::new();

        for scanner in collector_set(os) {
            on_source(scanner.as_ref());
            records.extend(collect(scanner.as_ref(), &self.host).await);
        }

        let hostname = self.host.hostname();
        tag_host(&mut records, &hostname);

        info!(%os, host = hostname.as_str(), count = records.len(), "scan complete");

        ScanResult::new(hostname, os, records)
    }
}

/// Sets `host` on every record, overwriting whatever a collector put there.
pub fn tag_host(records: &mut [PackageRecord], host: &str) {
    for record in records {
        record.host = host.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::host::testing::{FakeHost, FakeRegistry};
    use crate::registry::{UninstallEntry, UNINSTALL_ROOTS};

    #[test]
    fn test_tag_host_is_total_and_idempotent() {
        let mut records = vec![
            PackageRecord::new("curl", "7.88.1"),
            PackageRecord {
                host: "stale".to_string(),
                ..PackageRecord::new("bash", "5.2")
            },
        ];

        tag_host(&mut records, "build-01");
        let once = records.clone();
        tag_host(&mut records, "build-01");

        assert_eq!(records, once);
        assert!(records.iter().all(|r| r.host == "build-01"));
    }

    #[tokio::test]
    async fn test_debian_host_with_dpkg_only() {
        let host = FakeHost::new("deb-01")
            .with_tool("dpkg-query", "curl\t7.88.1\tDebian curl maintainers\n");
        let inventory = Inventory::new(host);

        let result = inventory.scan(OsFamily::Debian).await;

        assert_eq!(result.host, "deb-01");
        assert_eq!(result.os, OsFamily::Debian);
        assert_eq!(
            result.records,
            vec![PackageRecord {
                name: "curl".to_string(),
                version: "7.88.1".to_string(),
                vendor: "Debian curl maintainers".to_string(),
                install_date: String::new(),
                host: "deb-01".to_string(),
            }]
        );
        assert_eq!(inventory.host().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_windows_host_skips_entry_without_display_name() {
        let registry = FakeRegistry::default()
            .with_entry(
                UNINSTALL_ROOTS[0],
                "Git_is1",
                UninstallEntry {
                    display_name: Some("Git".to_string()),
                    display_version: Some("2.45.2".to_string()),
                    publisher: Some("The Git Development Community".to_string()),
                    install_date: Some("20240708".to_string()),
                },
            )
            .with_entry(
                UNINSTALL_ROOTS[0],
                "{2B3E1A05-0000-0000-0000-000000000000}",
                UninstallEntry {
                    display_version: Some("10.0.1".to_string()),
                    ..UninstallEntry::default()
                },
            );
        let inventory = Inventory::new(FakeHost::new("win-01").with_registry(registry));

        let result = inventory.scan(OsFamily::Windows).await;

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].name, "Git");
        assert_eq!(result.records[0].install_date, "20240708");
        assert_eq!(result.records[0].host, "win-01");
    }

    #[tokio::test]
    async fn test_linux_host_without_tools_is_empty() {
        let inventory = Inventory::new(FakeHost::new("bare"));

        for os in [OsFamily::Debian, OsFamily::Rhel, OsFamily::Unknown] {
            let result = inventory.scan(os).await;
            assert!(result.is_empty());
            assert_eq!(result.host, "bare");
        }
        assert!(inventory.host().calls().is_empty());
    }

    #[tokio::test]
    async fn test_sources_concatenate_in_collector_order() {
        let host = FakeHost::new("deb-02")
            .with_tool("flatpak", "org.gimp.GIMP\t2.10.38\tflathub\n")
            .with_tool("snap", "Name Version Rev\nfirefox 128.0 4650\n")
            .with_tool("dpkg-query", "firefox-esr\t115.12.0esr\tMozilla\n");
        let inventory = Inventory::new(host);

        let result = inventory.scan(OsFamily::Debian).await;

        let rows: Vec<(&str, &str)> = result
            .records
            .iter()
            .map(|r| (r.name.as_str(), r.vendor.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("firefox-esr", "Mozilla"),
                ("firefox", "snap"),
                ("org.gimp.GIMP", "flathub"),
            ]
        );
        assert!(result.records.iter().all(|r| r.host == "deb-02"));
    }

    #[tokio::test]
    async fn test_broken_source_does_not_affect_siblings() {
        let host = FakeHost::new("mac-01")
            .with_tool("system_profiler", "not json at all")
            .with_tool("brew", "jq 1.7.1\n");
        let inventory = Inventory::new(host);

        let result = inventory.scan(OsFamily::MacOS).await;

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].name, "jq");
        assert_eq!(result.records[0].vendor, "Homebrew");
    }

    #[tokio::test]
    async fn test_failed_command_does_not_affect_siblings() {
        let host = FakeHost::new("win-02")
            .with_registry(FakeRegistry::default())
            .with_failing_tool(
                "winget",
                ScanError::Launch {
                    program: "winget".to_string(),
                    message: "permission denied".to_string(),
                },
            );
        let inventory = Inventory::new(host);

        let result = inventory.scan(OsFamily::Windows).await;

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_same_os_and_tools_give_same_records() {
        let host = FakeHost::new("rhel-01")
            .with_tool("rpm", "bash\t5.1.8-9.el9\tRed Hat, Inc.\nzlib\t1.2.11-40.el9\tRed Hat, Inc.\n")
            .with_tool("dpkg-query", "curl\t7.88.1\tDebian\n");
        let inventory = Inventory::new(host);

        let first = inventory.scan(OsFamily::Rhel).await;
        let second = inventory.scan(OsFamily::Rhel).await;

        assert_eq!(first.records.len(), 2);
        assert_eq!(first.records, second.records);
    }

    #[tokio::test]
    async fn test_unknown_os_runs_every_linux_collector() {
        let host = FakeHost::new("mixed")
            .with_tool("rpm", "bash\t5.1.8\t(none)\n")
            .with_tool("dpkg-query", "curl\t7.88.1\tDebian\n");
        let inventory = Inventory::new(host);

        let result = inventory.scan(OsFamily::Unknown).await;

        let names: Vec<&str> = result.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["curl", "bash"]);
    }

    #[tokio::test]
    async fn test_scan_with_reports_each_source() {
        let inventory = Inventory::new(FakeHost::new("bare"));
        let mut seen = Vec::new();

        inventory
            .scan_with(OsFamily::MacOS, |scanner| seen.push(scanner.source()))
            .await;

        assert_eq!(
            seen,
            vec![
                crate::model::Source::SystemProfiler,
                crate::model::Source::Homebrew
            ]
        );
    }
}
