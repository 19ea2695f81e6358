//! Read-only access to the Windows uninstall registry keys.
//!
//! Installers register themselves under `...\CurrentVersion\Uninstall`. The
//! machine hive is read through both the native and the `WOW6432Node` view so
//! 32-bit installs on 64-bit Windows are included, followed by the per-user
//! hive.
//!
//! Enumeration is per key: an unreadable key or one without a display name
//! becomes a [`KeyOutcome::Skip`] and never stops its siblings.

use crate::error::ScanError;
use crate::model::PackageRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hive {
    LocalMachine,
    CurrentUser,
}

impl Hive {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Hive::LocalMachine => "HKLM",
            Hive::CurrentUser => "HKCU",
        }
    }
}

/// A registry key whose subkeys each describe one installed program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UninstallRoot {
    pub hive: Hive,
    pub path: &'static str,
}

impl std::fmt::Display for UninstallRoot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\\{}", self.hive.abbreviation(), self.path)
    }
}

pub const UNINSTALL_ROOTS: [UninstallRoot; 3] = [
    UninstallRoot {
        hive: Hive::LocalMachine,
        path: r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
    },
    UninstallRoot {
        hive: Hive::LocalMachine,
        path: r"SOFTWARE\WOW6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
    },
    UninstallRoot {
        hive: Hive::CurrentUser,
        path: r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
    },
];

/// Named values read from one uninstall subkey.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UninstallEntry {
    pub display_name: Option<String>,
    pub display_version: Option<String>,
    pub publisher: Option<String>,
    pub install_date: Option<String>,
}

/// Read-only view of the uninstall keys.
pub trait RegistryReader: Send + Sync {
    /// Names of the subkeys directly under `root`.
    fn subkeys(&self, root: &UninstallRoot) -> Result<Vec<String>, ScanError>;

    /// Values of one subkey. Missing values are `None`, not errors.
    fn entry(&self, root: &UninstallRoot, subkey: &str) -> Result<UninstallEntry, ScanError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingDisplayName,
    Unreadable(ScanError),
}

/// Result of reading a single uninstall subkey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Record(PackageRecord),
    Skip { subkey: String, reason: SkipReason },
}

impl UninstallEntry {
    /// Converts the entry into a record, or `None` without a display name.
    pub fn into_record(self) -> Option<PackageRecord> {
        let name = self.display_name.filter(|name| !name.trim().is_empty())?;
        Some(
            PackageRecord::new(name, self.display_version.unwrap_or_default())
                .with_vendor(self.publisher.unwrap_or_default())
                .with_install_date(self.install_date.unwrap_or_default()),
        )
    }
}

/// Reads every subkey of `root`, one outcome per subkey.
pub fn read_root(
    reader: &dyn RegistryReader,
    root: &UninstallRoot,
) -> Result<Vec<KeyOutcome>, ScanError> {
    let subkeys = reader.subkeys(root)?;

    let outcomes = subkeys
        .into_iter()
        .map(|subkey| match reader.entry(root, &subkey) {
            Ok(entry) => match entry.into_record() {
                Some(record) => KeyOutcome::Record(record),
                None => KeyOutcome::Skip {
                    subkey,
                    reason: SkipReason::MissingDisplayName,
                },
            },
            Err(err) => KeyOutcome::Skip {
                subkey,
                reason: SkipReason::Unreadable(err),
            },
        })
        .collect();

    Ok(outcomes)
}

#[cfg(windows)]
pub use windows::WindowsRegistry;

#[cfg(windows)]
mod windows {
    use super::{Hive, RegistryReader, UninstallEntry, UninstallRoot};
    use crate::error::ScanError;
    use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ};
    use winreg::RegKey;

    /// Live registry of the running Windows host.
    pub struct WindowsRegistry;

    impl WindowsRegistry {
        fn open(&self, root: &UninstallRoot) -> Result<RegKey, ScanError> {
            let hive = match root.hive {
                Hive::LocalMachine => RegKey::predef(HKEY_LOCAL_MACHINE),
                Hive::CurrentUser => RegKey::predef(HKEY_CURRENT_USER),
            };
            hive.open_subkey_with_flags(root.path, KEY_READ)
                .map_err(|e| ScanError::Registry(format!("{root}: {e}")))
        }
    }

    impl RegistryReader for WindowsRegistry {
        fn subkeys(&self, root: &UninstallRoot) -> Result<Vec<String>, ScanError> {
            let key = self.open(root)?;
            // Names that fail to decode are dropped here; the rest still enumerate.
            Ok(key.enum_keys().filter_map(Result::ok).collect())
        }

        fn entry(&self, root: &UninstallRoot, subkey: &str) -> Result<UninstallEntry, ScanError> {
            let key = self
                .open(root)?
                .open_subkey_with_flags(subkey, KEY_READ)
                .map_err(|e| ScanError::Registry(format!("{root}\\{subkey}: {e}")))?;

            let value = |name: &str| key.get_value::<String, _>(name).ok();

            Ok(UninstallEntry {
                display_name: value("DisplayName"),
                display_version: value("DisplayVersion"),
                publisher: value("Publisher"),
                install_date: value("InstallDate"),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::FakeRegistry;

    #[test]
    fn test_uninstall_roots_order() {
        assert_eq!(UNINSTALL_ROOTS[0].hive, Hive::LocalMachine);
        assert!(UNINSTALL_ROOTS[1].path.contains("WOW6432Node"));
        assert_eq!(UNINSTALL_ROOTS[2].hive, Hive::CurrentUser);
        assert_eq!(
            UNINSTALL_ROOTS[2].to_string(),
            r"HKCU\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall"
        );
    }

    #[test]
    fn test_entry_without_display_name_is_dropped() {
        let entry = UninstallEntry {
            display_name: None,
            display_version: Some("1.0".to_string()),
            ..UninstallEntry::default()
        };
        assert_eq!(entry.into_record(), None);

        let entry = UninstallEntry {
            display_name: Some("  ".to_string()),
            ..UninstallEntry::default()
        };
        assert_eq!(entry.into_record(), None);
    }

    #[test]
    fn test_entry_missing_optional_values_default_to_empty() {
        let entry = UninstallEntry {
            display_name: Some("7-Zip 23.01 (x64)".to_string()),
            ..UninstallEntry::default()
        };
        let record = entry.into_record().unwrap();
        assert_eq!(record.name, "7-Zip 23.01 (x64)");
        assert_eq!(record.version, "");
        assert_eq!(record.vendor, "");
        assert_eq!(record.install_date, "");
    }

    #[test]
    fn test_read_root_skips_per_key() {
        let root = UNINSTALL_ROOTS[0];
        let registry = FakeRegistry::default()
            .with_entry(
                root,
                "7-Zip",
                UninstallEntry {
                    display_name: Some("7-Zip 23.01 (x64)".to_string()),
                    display_version: Some("23.01".to_string()),
                    publisher: Some("Igor Pavlov".to_string()),
                    install_date: Some("20240312".to_string()),
                },
            )
            .with_unreadable(root, "Locked")
            .with_entry(root, "KB5034441", UninstallEntry::default());

        let outcomes = read_root(&registry, &root).unwrap();

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(&outcomes[0], KeyOutcome::Record(r) if r.vendor == "Igor Pavlov"));
        assert!(matches!(
            &outcomes[1],
            KeyOutcome::Skip { subkey, reason: SkipReason::Unreadable(_) } if subkey == "Locked"
        ));
        assert!(matches!(
            &outcomes[2],
            KeyOutcome::Skip { reason: SkipReason::MissingDisplayName, .. }
        ));
    }

    #[test]
    fn test_read_root_missing_root_is_error() {
        let registry = FakeRegistry::default();
        assert!(read_root(&registry, &UNINSTALL_ROOTS[2]).is_err());
    }
}
