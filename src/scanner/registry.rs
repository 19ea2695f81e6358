use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use crate::registry::{read_root, KeyOutcome, SkipReason, UNINSTALL_ROOTS};
use async_trait::async_trait;
use tracing::debug;

/// Programs registered under the Windows uninstall keys.
pub struct RegistryScanner;

#[async_trait]
impl super::Scanner for RegistryScanner {
    fn name(&self) -> &'static str {
        "Windows Installed Programs"
    }

    fn source(&self) -> Source {
        Source::WindowsRegistry
    }

    fn is_available(&self, host: &dyn HostEnv) -> bool {
        host.registry().is_some()
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let registry = host
            .registry()
            .ok_or_else(|| ScanError::ToolMissing("registry".to_string()))?;

        let mut records = Vec::new();

        for root in &UNINSTALL_ROOTS {
            let outcomes = match read_root(registry, root) {
                Ok(outcomes) => outcomes,
                Err(err) => {
                    debug!(%root, error = %err, "skipping uninstall root");
                    continue;
                }
            };

            for outcome in outcomes {
                match outcome {
                    KeyOutcome::Record(record) => records.push(record),
                    KeyOutcome::Skip {
                        subkey,
                        reason: SkipReason::Unreadable(err),
                    } => debug!(%root, subkey = subkey.as_str(), error = %err, "skipping unreadable key"),
                    KeyOutcome::Skip {
                        reason: SkipReason::MissingDisplayName,
                        ..
                    } => {}
                }
            }
        }

        Ok(records)
    }
}
