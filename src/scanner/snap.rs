use super::split_columns;
use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;

/// Installed snaps. The channel name stands in for the vendor.
pub struct SnapScanner;

const VENDOR: &str = "snap";

#[async_trait]
impl super::Scanner for SnapScanner {
    fn name(&self) -> &'static str {
        "Snap Packages"
    }

    fn source(&self) -> Source {
        Source::Snap
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run("snap", &["list"])?;
        Ok(parse_snap_list(&output))
    }
}

fn parse_snap_list(output: &str) -> Vec<PackageRecord> {
    split_columns(output, true)
        .into_iter()
        .map(|(name, version)| PackageRecord::new(name, version).with_vendor(VENDOR))
        .collect()
}
