use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Applications reported by macOS System Information.
///
/// `obtained_from` (e.g. `apple`, `mac_app_store`, `identified_developer`)
/// is used as the vendor.
pub struct SystemProfilerScanner;

const DATA_TYPE: &str = "SPApplicationsDataType";

#[derive(Deserialize)]
struct ProfilerReport {
    #[serde(rename = "SPApplicationsDataType", default)]
    applications: Vec<ProfilerApp>,
}

#[derive(Deserialize)]
struct ProfilerApp {
    #[serde(rename = "_name")]
    name: Option<String>,
    version: Option<String>,
    obtained_from: Option<String>,
}

#[async_trait]
impl super::Scanner for SystemProfilerScanner {
    fn name(&self) -> &'static str {
        "macOS Applications"
    }

    fn source(&self) -> Source {
        Source::SystemProfiler
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run("system_profiler", &[DATA_TYPE, "-json"])?;
        Ok(parse_profiler_json(&output))
    }
}

fn parse_profiler_json(output: &str) -> Vec<PackageRecord> {
    let report: ProfilerReport = match serde_json::from_str(output) {
        Ok(report) => report,
        Err(e) => {
            debug!(error = %e, "system_profiler output is not valid JSON");
            return Vec::new();
        }
    };

    report
        .applications
        .into_iter()
        .map(|app| {
            PackageRecord::new(app.name.unwrap_or_default(), app.version.unwrap_or_default())
                .with_vendor(app.obtained_from.unwrap_or_default())
        })
        .collect()
}
