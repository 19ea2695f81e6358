//! Persisting and exporting a finished scan.
//!
//! The host's stored inventory is replaced first. Reports are written
//! afterwards and their failures are collected rather than returned, so a
//! bad output directory never leaves the store holding the previous scan.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::db::PackageDb;
use crate::model::ScanResult;
use crate::output::{print_result, write_report, ExportFormat};
use crate::store::SnapshotStore;

/// Where a scan is persisted.
pub struct StoreTargets {
    pub database: PathBuf,
    pub snapshots: SnapshotStore,
}

/// What to do with a finished scan.
pub struct PublishOptions {
    pub formats: Vec<ExportFormat>,
    pub output_dir: PathBuf,
    /// Print every format to stdout instead of writing report files.
    pub to_stdout: bool,
    /// `None` leaves the stored inventory untouched.
    pub store: Option<StoreTargets>,
}

/// A report that could not be produced.
#[derive(Debug)]
pub struct ReportFailure {
    pub format: ExportFormat,
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct Published {
    pub database: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub reports: Vec<PathBuf>,
    pub failures: Vec<ReportFailure>,
}

impl Published {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Stores `result`, then exports it in each requested format.
///
/// # Errors
///
/// Returns an error only if storing fails. Report failures are listed in
/// [`Published::failures`].
pub fn publish(result: &ScanResult, options: &PublishOptions) -> Result<Published> {
    let mut published = Published::default();

    if let Some(store) = &options.store {
        let mut db = PackageDb::open(&store.database)?;
        db.replace_host(result)?;
        published.database = Some(store.database.clone());

        let path = store.snapshots.replace(result)?;
        debug!(path = %path.display(), "snapshot stored");
        published.snapshot = Some(path);
    }

    for format in &options.formats {
        let exported = if options.to_stdout || *format == ExportFormat::Table {
            print_result(result, *format).map(|_| None)
        } else {
            write_report(result, *format, &options.output_dir).map(Some)
        };

        match exported {
            Ok(Some(path)) => published.reports.push(path),
            Ok(None) => {}
            Err(error) => {
                warn!(%format, error = %format!("{:#}", error), "report failed");
                published.failures.push(ReportFailure {
                    format: *format,
                    error,
                });
            }
        }
    }

    Ok(published)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OsFamily, PackageRecord};
    use std::fs;

    fn sample() -> ScanResult {
        let records = vec![
            PackageRecord {
                host: "deb-01".to_string(),
                ..PackageRecord::new("curl", "7.88.1").with_vendor("Debian")
            },
            PackageRecord {
                host: "deb-01".to_string(),
                ..PackageRecord::new("bash", "5.2.15").with_vendor("Debian")
            },
        ];
        ScanResult::new("deb-01", OsFamily::Debian, records)
    }

    fn targets(root: &std::path::Path) -> StoreTargets {
        StoreTargets {
            database: root.join("data").join("inventory.sqlite"),
            snapshots: SnapshotStore::with_dir(root.join("data").join("snapshots")),
        }
    }

    #[test]
    fn test_store_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let options = PublishOptions {
            formats: vec![ExportFormat::Csv, ExportFormat::Json],
            output_dir: dir.path().join("reports"),
            to_stdout: false,
            store: Some(targets(dir.path())),
        };

        let published = publish(&sample(), &options).unwrap();

        assert!(!published.has_failures());
        assert_eq!(published.reports.len(), 2);
        assert!(dir.path().join("reports").join("report.csv").exists());
        assert!(dir.path().join("reports").join("report.json").exists());

        let db = PackageDb::open(&dir.path().join("data").join("inventory.sqlite")).unwrap();
        assert_eq!(db.count("deb-01").unwrap(), 2);
    }

    #[test]
    fn test_report_failure_still_stores_scan() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let options = PublishOptions {
            formats: vec![ExportFormat::Csv, ExportFormat::Json],
            output_dir: blocker.join("reports"),
            to_stdout: false,
            store: Some(targets(dir.path())),
        };

        let published = publish(&sample(), &options).unwrap();

        assert_eq!(published.failures.len(), 2);
        assert_eq!(published.failures[0].format, ExportFormat::Csv);
        assert!(published.reports.is_empty());

        let db = PackageDb::open(&dir.path().join("data").join("inventory.sqlite")).unwrap();
        assert_eq!(db.count("deb-01").unwrap(), 2);
        let snapshots = SnapshotStore::with_dir(dir.path().join("data").join("snapshots"));
        assert_eq!(snapshots.load("deb-01").unwrap().records.len(), 2);
    }

    #[test]
    fn test_store_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let options = PublishOptions {
            formats: vec![ExportFormat::Csv],
            output_dir: dir.path().join("reports"),
            to_stdout: false,
            store: Some(StoreTargets {
                database: blocker.join("inventory.sqlite"),
                snapshots: SnapshotStore::with_dir(dir.path().join("snapshots")),
            }),
        };

        assert!(publish(&sample(), &options).is_err());
    }

    #[test]
    fn test_without_store_only_reports() {
        let dir = tempfile::tempdir().unwrap();
        let options = PublishOptions {
            formats: vec![ExportFormat::Json],
            output_dir: dir.path().to_path_buf(),
            to_stdout: false,
            store: None,
        };

        let published = publish(&sample(), &options).unwrap();

        assert!(published.database.is_none());
        assert!(published.snapshot.is_none());
        assert_eq!(published.reports, vec![dir.path().join("report.json")]);
    }
}
