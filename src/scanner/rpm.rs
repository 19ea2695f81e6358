use super::split_delimited;
use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;

/// Installed packages from the RPM database.
pub struct RpmScanner;

const QUERY_FORMAT: &str = "%{NAME}\\t%{VERSION}-%{RELEASE}\\t%{VENDOR}\\n";

/// What rpm prints for an unset tag.
const UNSET_TAG: &str = "(none)";

#[async_trait]
impl super::Scanner for RpmScanner {
    fn name(&self) -> &'static str {
        "RPM Packages"
    }

    fn source(&self) -> Source {
        Source::Rpm
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run("rpm", &["-qa", "--qf", QUERY_FORMAT])?;
        Ok(parse_rpm(&output))
    }
}

fn parse_rpm(output: &str) -> Vec<PackageRecord> {
    split_delimited(Source::Rpm, output, '\t', 3)
        .into_iter()
        .map(|fields| {
            let vendor = if fields[2] == UNSET_TAG { "" } else { fields[2] };
            PackageRecord::new(fields[0], fields[1]).with_vendor(vendor)
        })
        .collect()
}
