use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OsFamily, PackageRecord};

/// Point-in-time inventory of one host.
///
/// A result supersedes any earlier result for the same host; sinks replace,
/// they never merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub host: String,
    pub os: OsFamily,
    pub scan_time: DateTime<Utc>,
    pub records: Vec<PackageRecord>,
}

impl ScanResult {
    pub fn new(host: impl Into<String>, os: OsFamily, records: Vec<PackageRecord>) -> Self {
        Self {
            host: host.into(),
            os,
            scan_time: Utc::now(),
            records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
