use super::split_delimited;
use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;

/// Installed packages from the Debian package database.
pub struct DpkgScanner;

const FORMAT: &str = "-f=${Package}\\t${Version}\\t${Maintainer}\\n";

#[async_trait]
impl super::Scanner for DpkgScanner {
    fn name(&self) -> &'static str {
        "Debian Packages"
    }

    fn source(&self) -> Source {
        Source::Dpkg
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run("dpkg-query", &["-W", FORMAT])?;
        Ok(parse_dpkg(&output))
    }
}

/// Parses `Package<TAB>Version<TAB>Maintainer` lines.
fn parse_dpkg(output: &str) -> Vec<PackageRecord> {
    split_delimited(Source::Dpkg, output, '\t', 3)
        .into_iter()
        .map(|fields| PackageRecord::new(fields[0], fields[1]).with_vendor(fields[2]))
        .collect()
}
