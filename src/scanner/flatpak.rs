use super::split_delimited;
use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;

/// Installed Flatpak applications. The remote origin is used as the vendor.
pub struct FlatpakScanner;

#[async_trait]
impl super::Scanner for FlatpakScanner {
    fn name(&self) -> &'static str {
        "Flatpak Applications"
    }

    fn source(&self) -> Source {
        Source::Flatpak
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run(
            "flatpak",
            &["list", "--app", "--columns=application,version,origin"],
        )?;
        Ok(parse_flatpak_list(&output))
    }
}

fn parse_flatpak_list(output: &str) -> Vec<PackageRecord> {
    split_delimited(Source::Flatpak, output, '\t', 3)
        .into_iter()
        .map(|fields| PackageRecord::new(fields[0], fields[1]).with_vendor(fields[2]))
        .collect()
}
