use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Packages known to the winget source.
pub struct WingetScanner;

#[derive(Deserialize)]
struct WingetList {
    #[serde(rename = "InstalledPackages", default)]
    installed_packages: Vec<WingetPackage>,
}

#[derive(Deserialize)]
struct WingetPackage {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Version")]
    version: Option<String>,
    #[serde(rename = "Publisher")]
    publisher: Option<String>,
}

#[async_trait]
impl super::Scanner for WingetScanner {
    fn name(&self) -> &'static str {
        "winget Packages"
    }

    fn source(&self) -> Source {
        Source::Winget
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run(
            "winget",
            &["list", "--source", "winget", "--output", "json"],
        )?;
        Ok(parse_winget_json(&output))
    }
}

/// Output that isn't valid JSON yields no packages.
fn parse_winget_json(output: &str) -> Vec<PackageRecord> {
    let list: WingetList = match serde_json::from_str(output) {
        Ok(list) => list,
        Err(e) => {
            debug!(error = %e, "winget output is not valid JSON");
            return Vec::new();
        }
    };

    list.installed_packages
        .into_iter()
        .map(|pkg| {
            PackageRecord::new(pkg.name.unwrap_or_default(), pkg.version.unwrap_or_default())
                .with_vendor(pkg.publisher.unwrap_or_default())
        })
        .collect()
}
