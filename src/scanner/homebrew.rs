use super::split_columns;
use crate::error::ScanError;
use crate::host::HostEnv;
use crate::model::{PackageRecord, Source};
use async_trait::async_trait;

/// Homebrew formulae. When several versions are installed side by side
/// only the first one listed is reported.
pub struct HomebrewScanner;

const VENDOR: &str = "Homebrew";

#[async_trait]
impl super::Scanner for HomebrewScanner {
    fn name(&self) -> &'static str {
        "Homebrew Packages"
    }

    fn source(&self) -> Source {
        Source::Homebrew
    }

    async fn scan(&self, host: &dyn HostEnv) -> Result<Vec<PackageRecord>, ScanError> {
        let output = host.run("brew", &["list", "--versions"])?;
        Ok(parse_brew_versions(&output))
    }
}

fn parse_brew_versions(output: &str) -> Vec<PackageRecord> {
    split_columns(output, false)
        .into_iter()
        .map(|(name, version)| PackageRecord::new(name, version).with_vendor(VENDOR))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeHost;
    use crate::scanner::Scanner;

    #[test]
    fn test_parse_brew_versions() {
        let output = "git 2.45.2\nopenssl@3 3.3.1 3.3.0\nwget 1.24.5\n";

        let records = parse_brew_versions(output);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "git");
        assert_eq!(records[0].version, "2.45.2");
        assert_eq!(records[1].name, "openssl@3");
        assert_eq!(records[1].version, "3.3.1");
        assert!(records.iter().all(|r| r.vendor == "Homebrew"));
    }

    #[test]
    fn test_parse_brew_versions_skips_bare_names() {
        let records = parse_brew_versions("broken-keg\n\njq 1.7.1\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "jq");
    }

    #[tokio::test]
    async fn test_scan() {
        let host = FakeHost::new("mac").with_tool("brew", "jq 1.7.1\n");
        let records = HomebrewScanner.scan(&host).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(host.calls(), vec!["brew list --versions"]);
    }
}
