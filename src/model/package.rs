use serde::{Deserialize, Serialize};

/// The registry view or external tool that reports installed software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    WindowsRegistry,
    Winget,
    Dpkg,
    Rpm,
    Snap,
    Flatpak,
    SystemProfiler,
    Homebrew,
}

impl Source {
    pub const ALL: [Source; 8] = [
        Source::WindowsRegistry,
        Source::Winget,
        Source::Dpkg,
        Source::Rpm,
        Source::Snap,
        Source::Flatpak,
        Source::SystemProfiler,
        Source::Homebrew,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::WindowsRegistry => "registry",
            Source::Winget => "winget",
            Source::Dpkg => "dpkg",
            Source::Rpm => "rpm",
            Source::Snap => "snap",
            Source::Flatpak => "flatpak",
            Source::SystemProfiler => "system_profiler",
            Source::Homebrew => "homebrew",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Source::WindowsRegistry => "Windows Registry",
            Source::Winget => "winget",
            Source::Dpkg => "dpkg",
            Source::Rpm => "RPM",
            Source::Snap => "Snap",
            Source::Flatpak => "Flatpak",
            Source::SystemProfiler => "System Profiler",
            Source::Homebrew => "Homebrew",
        }
    }

    /// Executable that must be on `PATH` for this source, if any.
    pub fn program(&self) -> Option<&'static str> {
        match self {
            Source::WindowsRegistry => None,
            Source::Winget => Some("winget"),
            Source::Dpkg => Some("dpkg-query"),
            Source::Rpm => Some("rpm"),
            Source::Snap => Some("snap"),
            Source::Flatpak => Some("flatpak"),
            Source::SystemProfiler => Some("system_profiler"),
            Source::Homebrew => Some("brew"),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Operating system family. Each family maps to one fixed set of collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Debian,
    Rhel,
    MacOS,
    Unknown,
}

impl OsFamily {
    pub fn display_name(&self) -> &'static str {
        match self {
            OsFamily::Windows => "Windows",
            OsFamily::Debian => "Debian family",
            OsFamily::Rhel => "RHEL family",
            OsFamily::MacOS => "macOS",
            OsFamily::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One installed package, normalized across sources.
///
/// Every field is always present; sources that don't track an attribute
/// leave it empty. Field order is also the export column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    pub vendor: String,
    pub install_date: String,
    pub host: String,
}

impl PackageRecord {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_install_date(mut self, install_date: impl Into<String>) -> Self {
        self.install_date = install_date.into();
        self
    }
}
